use crate::error::CliError;
use serde_json::Value as JsonValue;

pub async fn write_json(json: &JsonValue, path: Option<&str>) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(json)?;
    match path {
        Some(path) => tokio::fs::write(path, rendered).await?,
        None => println!("{rendered}"),
    }
    Ok(())
}

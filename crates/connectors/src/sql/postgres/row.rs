use model::{
    core::{
        data_type::DataType,
        value::{FieldValue, Value},
    },
    records::row::RowData,
};
use rust_decimal::Decimal;
use tokio_postgres::{Row as PgRow, types::Json as PgJson};
use tracing::warn;

/// Converts a driver row into `RowData`, typing each field by its column's
/// Postgres type. Types without a `Value` counterpart come back as text.
pub struct PgRowReader<'a>(pub &'a PgRow);

impl PgRowReader<'_> {
    pub fn to_row_data(&self, table: &str) -> RowData {
        let field_values = self
            .0
            .columns()
            .iter()
            .map(|column| {
                let type_name = column.type_().name();
                let data_type = DataType::from_postgres_type(type_name).unwrap_or_else(|_| {
                    warn!("Unknown column type: {}", type_name);
                    DataType::Custom(type_name.to_string())
                });

                FieldValue {
                    name: column.name().to_string(),
                    value: self.get_value(&data_type, column.name()),
                    data_type,
                }
            })
            .collect();

        RowData::new(table, field_values)
    }

    pub fn get_value(&self, data_type: &DataType, name: &str) -> Option<Value> {
        let row = self.0;
        match data_type {
            DataType::Short => row.try_get::<_, Option<i16>>(name).ok()?.map(Value::SmallInt),
            DataType::Int => row.try_get::<_, Option<i32>>(name).ok()?.map(Value::Int32),
            DataType::Long => row.try_get::<_, Option<i64>>(name).ok()?.map(Value::Int),
            DataType::Float => row.try_get::<_, Option<f32>>(name).ok()?.map(Value::Float32),
            DataType::Double => row.try_get::<_, Option<f64>>(name).ok()?.map(Value::Float),
            DataType::Decimal => row
                .try_get::<_, Option<Decimal>>(name)
                .ok()?
                .map(|d| Value::String(d.to_string())),
            DataType::Boolean => row.try_get::<_, Option<bool>>(name).ok()?.map(Value::Boolean),
            DataType::Char | DataType::VarChar | DataType::String => {
                row.try_get::<_, Option<String>>(name).ok()?.map(Value::String)
            }
            DataType::Date => row
                .try_get::<_, Option<chrono::NaiveDate>>(name)
                .ok()?
                .map(Value::Date),
            DataType::Time => row
                .try_get::<_, Option<chrono::NaiveTime>>(name)
                .ok()?
                .map(|t| Value::String(t.to_string())),
            DataType::Timestamp => row
                .try_get::<_, Option<chrono::NaiveDateTime>>(name)
                .ok()?
                .map(Value::TimestampNaive),
            DataType::TimestampTz => row
                .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(name)
                .ok()?
                .map(Value::Timestamp),
            DataType::Uuid => row.try_get::<_, Option<uuid::Uuid>>(name).ok()?.map(Value::Uuid),
            DataType::Json => row
                .try_get::<_, Option<PgJson<serde_json::Value>>>(name)
                .ok()?
                .map(|json| Value::Json(json.0)),
            DataType::Bytea => row.try_get::<_, Option<Vec<u8>>>(name).ok()?.map(Value::Bytes),
            DataType::Null | DataType::Custom(_) => {
                row.try_get::<_, Option<String>>(name).ok()?.map(Value::String)
            }
        }
    }
}

//! Builds an `EntitySchema` for a table from `information_schema`.

use crate::error::DbError;
use model::{
    core::data_type::DataType,
    entity::{ColumnDef, EntitySchema},
};

pub const COL_COLUMN_NAME: &str = "column_name";
pub const COL_DATA_TYPE: &str = "data_type";
pub const COL_CONSTRAINT_TYPE: &str = "constraint_type";

pub const CONSTRAINT_PRIMARY_KEY: &str = "PRIMARY KEY";

/// One row of the column listing.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

/// One single-column primary key or unique constraint.
#[derive(Debug, Clone)]
pub struct UniqueInfo {
    pub column: String,
    pub constraint_type: String,
}

/// Parameters whose Postgres type has no typed binding in `Value` cannot be
/// compared against a cursor, so such columns are never sortable.
fn has_typed_binding(data_type: &DataType) -> bool {
    !matches!(
        data_type,
        DataType::Decimal | DataType::Time | DataType::Custom(_)
    ) && data_type.is_orderable()
}

pub fn build_schema(
    table: &str,
    columns: Vec<ColumnInfo>,
    uniques: Vec<UniqueInfo>,
) -> Result<EntitySchema, DbError> {
    if columns.is_empty() {
        return Err(DbError::UnknownTable(table.to_string()));
    }

    let primary_key = uniques
        .iter()
        .find(|u| u.constraint_type == CONSTRAINT_PRIMARY_KEY)
        .map(|u| u.column.clone())
        .ok_or_else(|| {
            DbError::InvalidMetadata(format!("table {table} has no single-column primary key"))
        })?;

    let mut builder = EntitySchema::builder(table);
    for column in columns {
        let data_type = DataType::from_postgres_type(&column.data_type)
            .unwrap_or_else(|_| DataType::Custom(column.data_type.clone()));

        let mut def = ColumnDef::new(&column.name, data_type);
        if !has_typed_binding(&def.data_type) {
            def = def.unsortable();
        }
        if uniques.iter().any(|u| u.column == column.name) {
            def = def.unique();
        }

        if column.name == primary_key {
            builder = builder.primary_key(&column.name, def.data_type.clone());
        }
        builder = builder.column(def);
    }

    Ok(builder.build())
}

//! Static description of a paginated entity: its table, primary key and the
//! columns callers are allowed to sort on.

use crate::core::data_type::DataType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    /// Whether the column may appear in a sort specification.
    pub sortable: bool,
    /// Whether the column alone identifies a row.
    pub unique: bool,
}

impl ColumnDef {
    pub fn new(name: &str, data_type: DataType) -> Self {
        ColumnDef {
            name: name.to_string(),
            sortable: data_type.is_orderable(),
            data_type,
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub table: String,
    pub primary_key: String,
    pub columns: Vec<ColumnDef>,
}

impl EntitySchema {
    pub fn builder(table: &str) -> EntitySchemaBuilder {
        EntitySchemaBuilder::new(table)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn is_sortable(&self, name: &str) -> bool {
        self.column(name).is_some_and(|c| c.sortable)
    }

    pub fn is_unique(&self, name: &str) -> bool {
        name == self.primary_key || self.column(name).is_some_and(|c| c.unique)
    }

    pub fn is_timestamp(&self, name: &str) -> bool {
        self.column(name).is_some_and(|c| c.data_type.is_timestamp())
    }

    pub fn data_type(&self, name: &str) -> Option<&DataType> {
        self.column(name).map(|c| &c.data_type)
    }
}

pub struct EntitySchemaBuilder {
    table: String,
    primary_key: Option<String>,
    columns: Vec<ColumnDef>,
}

impl EntitySchemaBuilder {
    pub fn new(table: &str) -> Self {
        EntitySchemaBuilder {
            table: table.to_string(),
            primary_key: None,
            columns: Vec::new(),
        }
    }

    /// Declares the primary key column; it is added as a unique column if it
    /// has not been declared yet.
    pub fn primary_key(mut self, name: &str, data_type: DataType) -> Self {
        if !self.columns.iter().any(|c| c.name == name) {
            self.columns.push(ColumnDef::new(name, data_type).unique());
        }
        self.primary_key = Some(name.to_string());
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        self
    }

    /// Finishes the schema. Without an explicit primary key, `id` is assumed.
    pub fn build(self) -> EntitySchema {
        EntitySchema {
            table: self.table,
            primary_key: self.primary_key.unwrap_or_else(|| "id".to_string()),
            columns: self.columns,
        }
    }
}

/// Maps logical entity names to their schemas.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, EntitySchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, schema: EntitySchema) {
        self.schemas.insert(name.to_string(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&EntitySchema> {
        self.schemas.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

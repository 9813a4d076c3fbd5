//! Parsing of user sort strings such as `-created_at,name` and the keyset
//! derived from them.

use model::{
    entity::EntitySchema,
    pagination::sort::{SortColumn, SortDirection, SortSpec},
};
use tracing::debug;

/// Parses a comma-separated sort string. Each token may carry a leading `+`
/// (ascending, the default) or `-` (descending). Names that are not
/// sortable columns of the entity are dropped.
pub fn parse_sort(raw: Option<&str>, entity: &EntitySchema) -> SortSpec {
    let mut spec = SortSpec::default();
    let Some(raw) = raw else {
        return spec;
    };

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (direction, name) = match token.chars().next().and_then(SortDirection::from_sign) {
            Some(direction) => (direction, &token[1..]),
            None => (SortDirection::Asc, token),
        };

        if entity.is_sortable(name) {
            spec.push(SortColumn {
                column: name.to_string(),
                direction,
            });
        } else {
            debug!(column = name, table = %entity.table, "Dropping unknown sort column");
        }
    }

    spec
}

/// The columns a page is actually ordered and resumed by.
///
/// An empty spec becomes the primary key ascending. Otherwise the primary
/// key is appended as a tie-breaker unless some sort column is already
/// unique; it follows the effective direction of the spec.
pub fn build_keyset(sort: &SortSpec, entity: &EntitySchema) -> SortSpec {
    if sort.is_empty() {
        return SortSpec::new(vec![SortColumn::asc(&entity.primary_key)]);
    }

    if sort
        .columns()
        .iter()
        .any(|c| entity.is_unique(&c.column))
    {
        return sort.clone();
    }

    let mut keyset = sort.clone();
    keyset.push(SortColumn {
        column: entity.primary_key.clone(),
        direction: sort.effective_direction(),
    });
    keyset
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{
        core::data_type::DataType,
        entity::ColumnDef,
    };

    fn users() -> EntitySchema {
        EntitySchema::builder("users")
            .primary_key("id", DataType::Long)
            .column(ColumnDef::new("name", DataType::VarChar))
            .column(ColumnDef::new("email", DataType::VarChar).unique())
            .column(ColumnDef::new("created_at", DataType::TimestampTz))
            .column(ColumnDef::new("profile", DataType::Json))
            .build()
    }

    #[test]
    fn test_parse_signs_and_order() {
        let spec = parse_sort(Some("-created_at,+name,id"), &users());
        assert_eq!(
            spec.columns(),
            &[
                SortColumn::desc("created_at"),
                SortColumn::asc("name"),
                SortColumn::asc("id"),
            ]
        );
    }

    #[test]
    fn test_unknown_and_unsortable_columns_are_dropped() {
        let spec = parse_sort(Some("salary,-name,profile,"), &users());
        assert_eq!(spec.columns(), &[SortColumn::desc("name")]);
    }

    #[test]
    fn test_empty_input_is_empty_spec() {
        assert!(parse_sort(None, &users()).is_empty());
        assert!(parse_sort(Some(""), &users()).is_empty());
        assert!(parse_sort(Some(" , "), &users()).is_empty());
    }

    #[test]
    fn test_keyset_defaults_to_primary_key() {
        let keyset = build_keyset(&SortSpec::default(), &users());
        assert_eq!(keyset.columns(), &[SortColumn::asc("id")]);
    }

    #[test]
    fn test_keyset_appends_tie_breaker_for_non_unique_sort() {
        let desc = build_keyset(&parse_sort(Some("-name"), &users()), &users());
        assert_eq!(desc.columns(), &[SortColumn::desc("name"), SortColumn::desc("id")]);

        let mixed = build_keyset(&parse_sort(Some("name,-created_at"), &users()), &users());
        assert_eq!(mixed.column_names(), vec!["name", "created_at", "id"]);
        assert_eq!(mixed.columns()[2].direction, SortDirection::Asc);
    }

    #[test]
    fn test_keyset_keeps_unique_sort() {
        let spec = parse_sort(Some("name,email"), &users());
        assert_eq!(build_keyset(&spec, &users()), spec);

        let spec = parse_sort(Some("-id"), &users());
        assert_eq!(build_keyset(&spec, &users()), spec);
    }
}

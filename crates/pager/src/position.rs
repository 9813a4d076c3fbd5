//! Conversions between rows, textual cursor positions and typed boundaries.

use crate::{codec::CursorCodec, error::CursorDecodeError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::{
    core::{data_type::DataType, value::Value},
    entity::EntitySchema,
    pagination::{cursor::CursorPosition, sort::SortSpec},
    records::row::RowData,
};
use planner::query::keyset::Boundary;

/// Snapshot of a row's keyset values. Timestamps use nanosecond RFC 3339.
pub fn position_from_row(row: &RowData, keyset: &SortSpec) -> CursorPosition {
    keyset
        .columns()
        .iter()
        .map(|c| (c.column.clone(), row.get_value(&c.column).cursor_text()))
        .collect()
}

pub fn encode_row(row: &RowData, keyset: &SortSpec) -> String {
    CursorCodec::encode(&position_from_row(row, keyset))
}

/// Decodes a cursor into typed values ordered by keyset position. Entries
/// for columns outside the keyset keep their token order at the end.
pub fn decode_boundary(
    cursor: Option<&str>,
    keyset: &SortSpec,
    entity: &EntitySchema,
) -> Result<Option<Boundary>, CursorDecodeError> {
    let Some(position) = cursor.map(CursorCodec::decode).transpose()?.flatten() else {
        return Ok(None);
    };

    let mut boundary = position
        .entries()
        .iter()
        .map(|(column, text)| {
            let data_type = entity
                .data_type(column)
                .ok_or_else(|| CursorDecodeError::UnknownColumn(column.clone()))?;
            let value = coerce_text(text, data_type).ok_or_else(|| {
                CursorDecodeError::InvalidValue {
                    column: column.clone(),
                    value: text.clone(),
                    expected: data_type.to_string(),
                }
            })?;
            Ok((column.clone(), value))
        })
        .collect::<Result<Boundary, CursorDecodeError>>()?;

    boundary.sort_by_key(|(column, _)| keyset.position(column).unwrap_or(usize::MAX));
    Ok(Some(boundary))
}

/// Parses cursor text back into a value of the column's type. Empty text
/// for a non-textual column is NULL.
pub fn coerce_text(text: &str, data_type: &DataType) -> Option<Value> {
    let textual = matches!(
        data_type,
        DataType::Char | DataType::VarChar | DataType::String | DataType::Custom(_)
    );
    if text.is_empty() && !textual {
        return Some(Value::Null);
    }

    match data_type {
        DataType::Short => text.parse().ok().map(Value::SmallInt),
        DataType::Int => text.parse().ok().map(Value::Int32),
        DataType::Long => text.parse().ok().map(Value::Int),
        DataType::Float => text.parse().ok().map(Value::Float32),
        DataType::Double => text.parse().ok().map(Value::Float),
        DataType::Boolean => text.parse().ok().map(Value::Boolean),
        DataType::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
        DataType::Timestamp => parse_naive_datetime(text).map(Value::TimestampNaive),
        DataType::TimestampTz => parse_datetime(text).map(Value::Timestamp),
        DataType::Uuid => uuid::Uuid::parse_str(text).ok().map(Value::Uuid),
        DataType::Json => serde_json::from_str(text).ok().map(Value::Json),
        DataType::Bytea | DataType::Null => None,
        DataType::Decimal
        | DataType::Time
        | DataType::Char
        | DataType::VarChar
        | DataType::String
        | DataType::Custom(_) => Some(Value::String(text.to_string())),
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    parse_naive_datetime(raw).map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use model::{
        entity::ColumnDef,
        pagination::sort::SortColumn,
    };

    fn events() -> EntitySchema {
        EntitySchema::builder("events")
            .primary_key("id", DataType::Int)
            .column(ColumnDef::new("kind", DataType::VarChar))
            .column(ColumnDef::new("happened_at", DataType::TimestampTz))
            .column(ColumnDef::new("logged_at", DataType::Timestamp))
            .build()
    }

    fn keyset() -> SortSpec {
        SortSpec::new(vec![SortColumn::desc("happened_at"), SortColumn::desc("id")])
    }

    #[test]
    fn test_row_round_trips_through_cursor() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let row = RowData::from_pairs(
            "events",
            [
                ("id", Value::Int32(7)),
                ("kind", Value::String("login".into())),
                ("happened_at", Value::Timestamp(at)),
            ],
        );

        let token = encode_row(&row, &keyset());
        let boundary = decode_boundary(Some(&token), &keyset(), &events())
            .unwrap()
            .unwrap();

        assert_eq!(
            boundary,
            vec![
                ("happened_at".to_string(), Value::Timestamp(at)),
                ("id".to_string(), Value::Int32(7)),
            ]
        );
    }

    #[test]
    fn test_entries_are_reordered_by_keyset() {
        let position: CursorPosition = [("id", "3"), ("happened_at", "2024-01-01T00:00:00+00:00")]
            .into_iter()
            .collect();
        let token = CursorCodec::encode(&position);

        let boundary = decode_boundary(Some(&token), &keyset(), &events())
            .unwrap()
            .unwrap();
        assert_eq!(boundary[0].0, "happened_at");
        assert_eq!(boundary[1], ("id".to_string(), Value::Int32(3)));
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let token = CursorCodec::encode(&CursorPosition::new().with_entry("salary", "10"));
        let err = decode_boundary(Some(&token), &keyset(), &events()).unwrap_err();
        assert!(matches!(err, CursorDecodeError::UnknownColumn(c) if c == "salary"));
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let token = CursorCodec::encode(&CursorPosition::new().with_entry("id", "seven"));
        let err = decode_boundary(Some(&token), &keyset(), &events()).unwrap_err();
        assert!(matches!(err, CursorDecodeError::InvalidValue { column, .. } if column == "id"));
    }

    #[test]
    fn test_absent_or_empty_cursor() {
        assert_eq!(decode_boundary(None, &keyset(), &events()).unwrap(), None);
        assert_eq!(decode_boundary(Some(""), &keyset(), &events()).unwrap(), None);
    }

    #[test]
    fn test_naive_timestamp_coercion() {
        let value = coerce_text("2024-02-03T04:05:06.000000007+00:00", &DataType::Timestamp);
        let expected = NaiveDate::from_ymd_opt(2024, 2, 3)
            .unwrap()
            .and_hms_nano_opt(4, 5, 6, 7)
            .unwrap();
        assert_eq!(value, Some(Value::TimestampNaive(expected)));
        assert_eq!(coerce_text("", &DataType::Long), Some(Value::Null));
        assert_eq!(coerce_text("", &DataType::VarChar), Some(Value::String(String::new())));
    }
}

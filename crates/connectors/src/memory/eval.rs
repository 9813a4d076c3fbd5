//! Evaluates `Select` ASTs against rows held in memory.

use crate::error::DbError;
use model::{core::value::Value, records::row::RowData};
use planner::query::ast::{
    common::OrderDir,
    expr::{BinaryOp, BinaryOperator, Expr},
    select::{OrderByExpr, Select},
};
use std::cmp::Ordering;

enum Operand {
    Scalar(Value),
    Row(Vec<Value>),
}

/// Whether a row satisfies a WHERE condition. Comparisons involving NULL
/// are never satisfied.
pub(crate) fn satisfies(condition: &Expr, row: &RowData) -> Result<bool, DbError> {
    match condition {
        Expr::BinaryOp(op) => match op.op {
            BinaryOperator::And => Ok(satisfies(&op.left, row)? && satisfies(&op.right, row)?),
            BinaryOperator::Or => Ok(satisfies(&op.left, row)? || satisfies(&op.right, row)?),
            _ => compare(op, row),
        },
        other => match evaluate(other, row)? {
            Operand::Scalar(Value::Boolean(b)) => Ok(b),
            Operand::Scalar(Value::Null) => Ok(false),
            _ => Err(DbError::UnsupportedQuery(format!(
                "not a condition: {other:?}"
            ))),
        },
    }
}

fn compare(op: &BinaryOp, row: &RowData) -> Result<bool, DbError> {
    let left = evaluate(&op.left, row)?;
    let right = evaluate(&op.right, row)?;

    let ordering = match (left, right) {
        (Operand::Scalar(a), Operand::Scalar(b)) => compare_values(&a, &b)?,
        (Operand::Row(a), Operand::Row(b)) if a.len() == b.len() => compare_rows(&a, &b)?,
        _ => {
            return Err(DbError::UnsupportedQuery(
                "row and scalar operands cannot be compared".to_string(),
            ));
        }
    };

    let Some(ordering) = ordering else {
        return Ok(false);
    };

    match op.op {
        BinaryOperator::Eq => Ok(ordering == Ordering::Equal),
        BinaryOperator::NotEq => Ok(ordering != Ordering::Equal),
        BinaryOperator::Lt => Ok(ordering == Ordering::Less),
        BinaryOperator::LtEq => Ok(ordering != Ordering::Greater),
        BinaryOperator::Gt => Ok(ordering == Ordering::Greater),
        BinaryOperator::GtEq => Ok(ordering != Ordering::Less),
        BinaryOperator::And | BinaryOperator::Or => Err(DbError::UnsupportedQuery(
            "logical operator used as a comparison".to_string(),
        )),
    }
}

/// `None` stands for an unknown (NULL) result.
fn compare_values(a: &Value, b: &Value) -> Result<Option<Ordering>, DbError> {
    if a.is_null() || b.is_null() {
        return Ok(None);
    }
    a.compare(b).map(Some).ok_or_else(|| {
        DbError::UnsupportedQuery(format!("cannot compare {a} with {b}"))
    })
}

/// Lexicographic row comparison: the first unequal pair decides.
fn compare_rows(a: &[Value], b: &[Value]) -> Result<Option<Ordering>, DbError> {
    for (x, y) in a.iter().zip(b) {
        match compare_values(x, y)? {
            Some(Ordering::Equal) => continue,
            other => return Ok(other),
        }
    }
    Ok(Some(Ordering::Equal))
}

fn evaluate(expr: &Expr, row: &RowData) -> Result<Operand, DbError> {
    match expr {
        Expr::Identifier(ident) => Ok(Operand::Scalar(row.get_value(&ident.name))),
        Expr::Value(value) => Ok(Operand::Scalar(value.clone())),
        Expr::Row(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match evaluate(item, row)? {
                    Operand::Scalar(v) => values.push(v),
                    Operand::Row(_) => {
                        return Err(DbError::UnsupportedQuery("nested row value".to_string()));
                    }
                }
            }
            Ok(Operand::Row(values))
        }
        Expr::BinaryOp(_) => Ok(Operand::Scalar(Value::Boolean(satisfies(expr, row)?))),
        Expr::Alias { expr, .. } => evaluate(expr, row),
        Expr::FunctionCall(func) => Err(DbError::UnsupportedQuery(format!(
            "function {} in a row context",
            func.name
        ))),
    }
}

/// Stable sort by the ORDER BY list. NULLs sort first ascending.
pub(crate) fn sort_rows(rows: &mut [RowData], order_by: &[OrderByExpr]) -> Result<(), DbError> {
    let mut keys = Vec::with_capacity(order_by.len());
    for order in order_by {
        let Expr::Identifier(ident) = &order.expr else {
            return Err(DbError::UnsupportedQuery(format!(
                "ORDER BY expression {:?}",
                order.expr
            )));
        };
        keys.push((ident.name.as_str(), order.direction.unwrap_or(OrderDir::Asc)));
    }

    rows.sort_by(|a, b| {
        for (column, direction) in &keys {
            let ordering = a
                .get_value(column)
                .compare(&b.get_value(column))
                .unwrap_or(Ordering::Equal);
            let ordering = match direction {
                OrderDir::Asc => ordering,
                OrderDir::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
    Ok(())
}

pub(crate) fn limit(query: &Select) -> Result<Option<usize>, DbError> {
    let Some(limit) = &query.limit else {
        return Ok(None);
    };
    let Expr::Value(value) = limit else {
        return Err(DbError::UnsupportedQuery(format!("LIMIT {limit:?}")));
    };
    value
        .as_i64()
        .and_then(|n| usize::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| DbError::UnsupportedQuery(format!("LIMIT {value}")))
}

/// Keeps the selected columns, in selection order.
pub(crate) fn project(row: &RowData, columns: &[Expr]) -> Result<RowData, DbError> {
    let mut pairs = Vec::with_capacity(columns.len());
    for column in columns {
        let Expr::Identifier(ident) = column else {
            return Err(DbError::UnsupportedQuery(format!("projection {column:?}")));
        };
        pairs.push((ident.name.as_str(), row.get_value(&ident.name)));
    }
    Ok(RowData::from_pairs(&row.entity, pairs))
}

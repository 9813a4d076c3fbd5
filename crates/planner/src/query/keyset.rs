//! Keyset boundary predicates: turns a decoded cursor position into the
//! row-value comparison that restricts a query to the rows strictly after or
//! before it, plus the ORDER BY/LIMIT that go with it.

use crate::query::{
    ast::{
        common::OrderDir,
        expr::{BinaryOp, BinaryOperator, Expr},
    },
    builder::select::{FromState, SelectBuilder},
    ident, value,
};
use model::{
    core::value::Value,
    pagination::{
        page::{BoundaryEdge, TraversalDirection},
        sort::{SortDirection, SortSpec},
    },
};
use tracing::debug;

/// Typed cursor values in keyset order.
pub type Boundary = Vec<(String, Value)>;

#[derive(Debug, Clone, Default)]
pub struct KeysetPagination {
    /// Columns the slice is ordered by, tie-breaker included.
    pub keyset: SortSpec,
    pub after: Option<Boundary>,
    pub before: Option<Boundary>,
}

impl KeysetPagination {
    pub fn new(keyset: SortSpec) -> Self {
        KeysetPagination {
            keyset,
            after: None,
            before: None,
        }
    }

    pub fn with_after(mut self, bound: Boundary) -> Self {
        self.after = Some(bound).filter(|b| !b.is_empty());
        self
    }

    pub fn with_before(mut self, bound: Boundary) -> Self {
        self.before = Some(bound).filter(|b| !b.is_empty());
        self
    }

    /// The boundary that decides the traversal. `before` is applied last and
    /// wins when both are present.
    pub fn edge(&self) -> Option<BoundaryEdge> {
        match (&self.after, &self.before) {
            (_, Some(_)) => Some(BoundaryEdge::Before),
            (Some(_), None) => Some(BoundaryEdge::After),
            (None, None) => None,
        }
    }

    pub fn direction(&self) -> TraversalDirection {
        match self.edge() {
            Some(edge) => boundary_rule(edge, self.keyset.effective_direction()).1,
            None => TraversalDirection::Next,
        }
    }

    /// The conjunction of every supplied boundary, `after` first.
    pub fn boundary_filter(&self) -> Option<Expr> {
        let effective = self.keyset.effective_direction();
        let after = self
            .after
            .as_ref()
            .map(|b| boundary_predicate(BoundaryEdge::After, effective, b).0);
        let before = self
            .before
            .as_ref()
            .map(|b| boundary_predicate(BoundaryEdge::Before, effective, b).0);

        match (after, before) {
            (Some(a), Some(b)) => Some(Expr::and(a, b)),
            (a, b) => a.or(b),
        }
    }

    /// Ordering sent to the store. Backward slices are fetched in reverse
    /// and flipped back by the caller.
    pub fn query_order(&self) -> SortSpec {
        match self.edge() {
            Some(BoundaryEdge::Before) => self.keyset.reversed(),
            _ => self.keyset.clone(),
        }
    }

    /// Adds the boundary filter, ordering and limit to a query.
    pub fn apply_to_builder(
        &self,
        mut builder: SelectBuilder<FromState>,
        limit: usize,
    ) -> SelectBuilder<FromState> {
        debug!(
            edge = ?self.edge(),
            keyset = ?self.keyset.column_names(),
            limit,
            "Applying keyset boundary"
        );

        if let Some(filter) = self.boundary_filter() {
            builder = builder.and_where(filter);
        }

        for column in self.query_order().columns() {
            builder = builder.order_by(ident(&column.column), Some(OrderDir::from(column.direction)));
        }

        builder.limit(value(Value::Int(i64::try_from(limit).unwrap_or(i64::MAX))))
    }
}

/// Comparison operator and resulting direction for a boundary edge under the
/// effective sort direction.
pub fn boundary_rule(
    edge: BoundaryEdge,
    effective: SortDirection,
) -> (BinaryOperator, TraversalDirection) {
    match (edge, effective) {
        (BoundaryEdge::After, SortDirection::Asc) => (BinaryOperator::Gt, TraversalDirection::Next),
        (BoundaryEdge::After, SortDirection::Desc) => (BinaryOperator::Lt, TraversalDirection::Prev),
        (BoundaryEdge::Before, SortDirection::Asc) => (BinaryOperator::Lt, TraversalDirection::Prev),
        (BoundaryEdge::Before, SortDirection::Desc) => (BinaryOperator::Gt, TraversalDirection::Next),
    }
}

/// Builds `(c1, .., cn) op (v1, .., vn)` for a boundary. A single column
/// degenerates to a plain comparison.
pub fn boundary_predicate(
    edge: BoundaryEdge,
    effective: SortDirection,
    bound: &[(String, Value)],
) -> (Expr, TraversalDirection) {
    let (op, direction) = boundary_rule(edge, effective);

    let expr = match bound {
        [(column, val)] => Expr::binary(ident(column), op, value(val.clone())),
        _ => Expr::binary(
            Expr::Row(bound.iter().map(|(c, _)| ident(c)).collect()),
            op,
            Expr::Row(bound.iter().map(|(_, v)| value(v.clone())).collect()),
        ),
    };

    (expr, direction)
}

/// Rewrites an ordering comparison between two rows of equal arity into its
/// lexicographic form:
///
/// `(a, b, c) > (x, y, z)` becomes
/// `a > x OR (a = x AND b > y) OR (a = x AND b = y AND c > z)`.
///
/// Only the last term keeps a non-strict operator. Returns `None` for
/// anything that is not such a comparison.
pub fn expand_row_comparison(op: &BinaryOp) -> Option<Expr> {
    if !matches!(
        op.op,
        BinaryOperator::Lt | BinaryOperator::LtEq | BinaryOperator::Gt | BinaryOperator::GtEq
    ) {
        return None;
    }

    let (Expr::Row(left), Expr::Row(right)) = (&op.left, &op.right) else {
        return None;
    };
    if left.is_empty() || left.len() != right.len() {
        return None;
    }

    let last = left.len() - 1;
    let mut expanded: Option<Expr> = None;

    for i in 0..left.len() {
        let term_op = if i == last { op.op } else { op.op.strict() };
        let mut term = Expr::binary(left[i].clone(), term_op, right[i].clone());

        for j in (0..i).rev() {
            let eq = Expr::binary(left[j].clone(), BinaryOperator::Eq, right[j].clone());
            term = Expr::and(eq, term);
        }

        expanded = Some(match expanded {
            Some(prev) => Expr::or(prev, term),
            None => term,
        });
    }

    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{dialect::Postgres, renderer::render_with},
        table_ref,
    };
    use model::pagination::sort::SortColumn;

    fn base() -> SelectBuilder<FromState> {
        SelectBuilder::new()
            .select(vec![ident("id"), ident("name")])
            .from(table_ref!("users"), None)
    }

    fn name_id(name: &str, id: i64) -> Boundary {
        vec![
            ("name".to_string(), Value::String(name.to_string())),
            ("id".to_string(), Value::Int(id)),
        ]
    }

    #[test]
    fn test_boundary_rules() {
        use BoundaryEdge::*;
        use SortDirection::*;

        assert_eq!(boundary_rule(After, Asc), (BinaryOperator::Gt, TraversalDirection::Next));
        assert_eq!(boundary_rule(After, Desc), (BinaryOperator::Lt, TraversalDirection::Prev));
        assert_eq!(boundary_rule(Before, Asc), (BinaryOperator::Lt, TraversalDirection::Prev));
        assert_eq!(boundary_rule(Before, Desc), (BinaryOperator::Gt, TraversalDirection::Next));
    }

    #[test]
    fn test_single_column_is_plain_comparison() {
        let (expr, direction) = boundary_predicate(
            BoundaryEdge::After,
            SortDirection::Asc,
            &[("id".to_string(), Value::Int(10))],
        );
        assert_eq!(expr, Expr::binary(ident("id"), BinaryOperator::Gt, value(Value::Int(10))));
        assert_eq!(direction, TraversalDirection::Next);
    }

    #[test]
    fn test_after_ascending_renders_row_comparison() {
        let keyset = SortSpec::new(vec![SortColumn::asc("name"), SortColumn::asc("id")]);
        let pagination = KeysetPagination::new(keyset).with_after(name_id("bob", 4));

        let (sql, params) = render_with(&pagination.apply_to_builder(base(), 10).build(), &Postgres);

        assert_eq!(
            sql,
            r#"SELECT "id", "name" FROM "users" WHERE (("name", "id") > ($1, $2)) ORDER BY "name" ASC, "id" ASC LIMIT $3"#
        );
        assert_eq!(
            params,
            vec![Value::String("bob".into()), Value::Int(4), Value::Int(10)]
        );
        assert_eq!(pagination.direction(), TraversalDirection::Next);
    }

    #[test]
    fn test_after_descending_flips_operator_and_direction() {
        let keyset = SortSpec::new(vec![SortColumn::desc("name"), SortColumn::desc("id")]);
        let pagination = KeysetPagination::new(keyset).with_after(name_id("bob", 4));

        let (sql, _) = render_with(&pagination.apply_to_builder(base(), 5).build(), &Postgres);

        assert!(sql.contains(r#"WHERE (("name", "id") < ($1, $2))"#));
        assert!(sql.contains(r#"ORDER BY "name" DESC, "id" DESC"#));
        assert_eq!(pagination.direction(), TraversalDirection::Prev);
    }

    #[test]
    fn test_before_reverses_query_order() {
        let keyset = SortSpec::new(vec![SortColumn::asc("id")]);
        let pagination = KeysetPagination::new(keyset)
            .with_before(vec![("id".to_string(), Value::Int(20))]);

        let (sql, _) = render_with(&pagination.apply_to_builder(base(), 5).build(), &Postgres);

        assert_eq!(
            sql,
            r#"SELECT "id", "name" FROM "users" WHERE ("id" < $1) ORDER BY "id" DESC LIMIT $2"#
        );
        assert_eq!(pagination.edge(), Some(BoundaryEdge::Before));
        assert_eq!(pagination.direction(), TraversalDirection::Prev);
    }

    #[test]
    fn test_both_boundaries_are_conjoined_and_before_decides() {
        let keyset = SortSpec::new(vec![SortColumn::desc("id")]);
        let pagination = KeysetPagination::new(keyset)
            .with_after(vec![("id".to_string(), Value::Int(50))])
            .with_before(vec![("id".to_string(), Value::Int(10))]);

        assert_eq!(
            pagination.boundary_filter(),
            Some(Expr::and(
                Expr::binary(ident("id"), BinaryOperator::Lt, value(Value::Int(50))),
                Expr::binary(ident("id"), BinaryOperator::Gt, value(Value::Int(10))),
            ))
        );
        assert_eq!(pagination.direction(), TraversalDirection::Next);
    }

    #[test]
    fn test_mixed_directions_use_ascending_rule() {
        let keyset = SortSpec::new(vec![SortColumn::asc("name"), SortColumn::desc("id")]);
        let pagination = KeysetPagination::new(keyset).with_after(name_id("bob", 4));

        let Some(Expr::BinaryOp(op)) = pagination.boundary_filter() else {
            panic!("expected a comparison");
        };
        assert_eq!(op.op, BinaryOperator::Gt);
        assert_eq!(pagination.direction(), TraversalDirection::Next);
    }

    #[test]
    fn test_no_boundary_leaves_where_empty() {
        let pagination = KeysetPagination::new(SortSpec::new(vec![SortColumn::asc("id")]))
            .with_after(Vec::new());
        let ast = pagination.apply_to_builder(base(), 20).build();

        assert!(ast.where_clause.is_none());
        assert_eq!(pagination.edge(), None);
        assert_eq!(pagination.direction(), TraversalDirection::Next);
    }

    #[test]
    fn test_oversized_limit_saturates() {
        let pagination = KeysetPagination::new(SortSpec::new(vec![SortColumn::asc("id")]));
        let (_, params) = render_with(&pagination.apply_to_builder(base(), usize::MAX).build(), &Postgres);
        assert_eq!(params, vec![Value::Int(i64::MAX)]);
    }

    #[test]
    fn test_expand_three_columns() {
        let op = BinaryOp {
            left: Expr::Row(vec![ident("a"), ident("b"), ident("c")]),
            op: BinaryOperator::GtEq,
            right: Expr::Row(vec![
                value(Value::Int(1)),
                value(Value::Int(2)),
                value(Value::Int(3)),
            ]),
        };

        let (sql, params) = render_with(&expand_row_comparison(&op).unwrap(), &Postgres);

        assert_eq!(
            sql,
            r#"((("a" > $1) OR (("a" = $2) AND ("b" > $3))) OR (("a" = $4) AND (("b" = $5) AND ("c" >= $6))))"#
        );
        assert_eq!(params.len(), 6);
    }

    #[test]
    fn test_expand_ignores_non_rows() {
        let op = BinaryOp {
            left: ident("a"),
            op: BinaryOperator::Gt,
            right: value(Value::Int(1)),
        };
        assert!(expand_row_comparison(&op).is_none());
    }
}

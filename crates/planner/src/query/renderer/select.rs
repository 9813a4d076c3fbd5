use crate::query::{
    ast::{
        common::OrderDir,
        select::{FromClause, OrderByExpr, Select},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        // 3. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }

        // 4. ORDER BY
        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                order.render(r);
            }
        }

        // 5. LIMIT
        if let Some(limit) = &self.limit {
            r.sql.push_str(" LIMIT ");
            limit.render(r);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        if let Some(schema) = &self.table.schema {
            r.sql.push_str(&r.dialect.quote_identifier(schema));
            r.sql.push('.');
        }
        r.sql.push_str(&r.dialect.quote_identifier(&self.table.name));
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier(alias));
        }
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        if let Some(dir) = &self.direction {
            let dir_str = match dir {
                OrderDir::Asc => "ASC",
                OrderDir::Desc => "DESC",
            };
            r.sql.push(' ');
            r.sql.push_str(dir_str);
        }
    }
}

#[cfg(test)]
mod tests {
    use model::core::value::Value;

    use crate::{
        query::{
            ast::{
                common::OrderDir,
                expr::{BinaryOperator, Expr},
            },
            builder::select::SelectBuilder,
            dialect::{MySql, Postgres},
            ident,
            renderer::render_with,
            value,
        },
        table_ref,
    };

    #[test]
    fn test_simple_select_postgres() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id"), ident("name")])
            .from(table_ref!("users"), None)
            .where_clause(Expr::binary(
                ident("id"),
                BinaryOperator::Eq,
                value(Value::Int(123)),
            ))
            .build();

        let (sql, params) = render_with(&ast, &Postgres);

        assert_eq!(sql, r#"SELECT "id", "name" FROM "users" WHERE ("id" = $1)"#);
        assert_eq!(params, vec![Value::Int(123)]);
    }

    #[test]
    fn test_simple_select_mysql() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id"), ident("name")])
            .from(table_ref!("users"), None)
            .where_clause(Expr::binary(
                ident("id"),
                BinaryOperator::Eq,
                value(Value::String("abc".to_string())),
            ))
            .build();

        let (sql, params) = render_with(&ast, &MySql);

        assert_eq!(sql, "SELECT `id`, `name` FROM `users` WHERE (`id` = ?)");
        assert_eq!(params, vec![Value::String("abc".to_string())]);
    }

    #[test]
    fn test_ordered_limited_select_postgres() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id")])
            .from(table_ref!("public", "users"), Some("u"))
            .order_by(ident("created_at"), Some(OrderDir::Desc))
            .order_by(ident("id"), Some(OrderDir::Desc))
            .limit(value(Value::Int(10)))
            .build();

        let (sql, params) = render_with(&ast, &Postgres);

        assert_eq!(
            sql,
            r#"SELECT "id" FROM "public"."users" AS "u" ORDER BY "created_at" DESC, "id" DESC LIMIT $1"#
        );
        assert_eq!(params, vec![Value::Int(10)]);
    }

    #[test]
    fn test_count_select_postgres() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id")])
            .from(table_ref!("users"), None)
            .where_clause(Expr::binary(
                ident("id"),
                BinaryOperator::Gt,
                value(Value::Int(5)),
            ))
            .limit(value(Value::Int(10)))
            .build()
            .to_count();

        let (sql, params) = render_with(&ast, &Postgres);

        assert_eq!(sql, r#"SELECT COUNT(*) FROM "users" WHERE ("id" > $1)"#);
        assert_eq!(params, vec![Value::Int(5)]);
    }
}

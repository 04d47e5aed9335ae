use futures::{
    TryFutureExt, TryStreamExt, future,
    stream::{BoxStream, StreamExt},
};
use sea_orm::{
    Condition, ConnectionTrait, DatabaseConnection, DbErr, StreamTrait,
    sea_query::{Alias, Asterisk, Expr, JoinType, Query, SelectStatement},
};
use tracing::trace;

use super::CrudRepository;
use crate::filtering::{ColumnRef, Page, find_column};

/// A table selected under an alias, with the columns to project.
#[derive(Clone, Copy, Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub alias: &'static str,
    pub columns: &'static [&'static str],
}

impl TableSpec {
    #[must_use]
    pub const fn column(&self, column: &'static str) -> ColumnRef {
        ColumnRef::new(self.alias, column)
    }

    /// Project every column as `alias_column`.
    fn select_columns(&self, select: &mut SelectStatement) {
        for column in self.columns {
            select.expr_as(
                Expr::col((Alias::new(self.alias), Alias::new(*column))),
                Alias::new(format!("{}_{column}", self.alias)),
            );
        }
    }
}

/// A left join from the primary table: `primary.local_column = joined.id`.
#[derive(Clone, Copy, Debug)]
pub struct JoinSpec {
    pub table: TableSpec,
    pub local_column: &'static str,
}

/// `SELECT <primary cols>, <joined cols> FROM primary AS e LEFT JOIN ... WHERE
/// condition ORDER BY ... LIMIT ... OFFSET ...`
#[must_use]
pub fn create_query<R: CrudRepository>(page: Option<&Page>, condition: Condition) -> SelectStatement {
    let table = R::TABLE;
    let mut select = Query::select();
    table.select_columns(&mut select);
    select.from_as(Alias::new(table.name), Alias::new(table.alias));

    if let Some(join) = R::JOIN {
        join.table.select_columns(&mut select);
        select.join_as(
            JoinType::LeftJoin,
            Alias::new(join.table.name),
            Alias::new(join.table.alias),
            Expr::col((Alias::new(table.alias), Alias::new(join.local_column)))
                .equals((Alias::new(join.table.alias), Alias::new("id"))),
        );
    }

    select.cond_where(condition);

    if let Some(page) = page {
        let columns = R::column_map();
        for order in &page.sort {
            match find_column(&columns, &order.property) {
                Some(column) => {
                    select.order_by(
                        (Alias::new(column.table), Alias::new(column.column)),
                        order.direction.into(),
                    );
                }
                None => trace!(property = %order.property, "Ignoring sort on unknown property"),
            }
        }
        select.limit(page.size).offset(page.offset());
    }

    select
}

/// Stream mapped rows for `select`. Rows are produced in cursor order and the
/// query is cancelled when the stream is dropped.
pub fn fetch<'a, R: CrudRepository>(
    db: &'a DatabaseConnection,
    select: &SelectStatement,
) -> BoxStream<'a, Result<R, DbErr>> {
    let statement = db.get_database_backend().build(select);
    trace!(entity = R::ENTITY_NAME, sql = %statement.sql, "Streaming query");

    async move { db.stream(statement).await }
        .map_ok(|rows| rows.and_then(|row| future::ready(R::process(&row))))
        .try_flatten_stream()
        .boxed()
}

/// `SELECT COUNT(*) FROM table AS alias WHERE condition`
pub async fn count_rows(
    db: &DatabaseConnection,
    table: &TableSpec,
    condition: Condition,
) -> Result<u64, DbErr> {
    let select = Query::select()
        .expr_as(Expr::col(Asterisk).count(), Alias::new("count"))
        .from_as(Alias::new(table.name), Alias::new(table.alias))
        .cond_where(condition)
        .to_owned();
    let statement = db.get_database_backend().build(&select);

    let count = match db.query_one(statement).await? {
        Some(row) => row.try_get::<i64>("", "count")?,
        None => 0,
    };
    u64::try_from(count).map_err(|e| DbErr::Type(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, Post, PostStatus};
    use crate::filtering::{Direction, SortOrder};
    use sea_orm::sea_query::SqliteQueryBuilder;

    #[test]
    fn test_post_query_joins_status_with_prefixed_columns() {
        let sql = create_query::<Post>(None, Condition::all()).to_string(SqliteQueryBuilder);
        assert!(sql.contains(r#""e"."title" AS "e_title""#), "{sql}");
        assert!(sql.contains(r#""postStatus"."status" AS "postStatus_status""#), "{sql}");
        assert!(sql.contains(r#"FROM "post" AS "e""#), "{sql}");
        assert!(
            sql.contains(r#"LEFT JOIN "post_status" AS "postStatus" ON "e"."post_status_id" = "postStatus"."id""#),
            "{sql}"
        );
        assert!(!sql.contains("WHERE"), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
    }

    #[test]
    fn test_comment_query_joins_post() {
        let sql = create_query::<Comment>(None, Condition::all()).to_string(SqliteQueryBuilder);
        assert!(
            sql.contains(r#"LEFT JOIN "post" AS "post" ON "e"."post_id" = "post"."id""#),
            "{sql}"
        );
        assert!(sql.contains(r#""post"."update_time" AS "post_update_time""#), "{sql}");
    }

    #[test]
    fn test_status_query_has_no_join() {
        let sql = create_query::<PostStatus>(None, Condition::all()).to_string(SqliteQueryBuilder);
        assert!(!sql.contains("JOIN"), "{sql}");
        assert!(sql.contains(r#""e"."status" AS "e_status""#), "{sql}");
    }

    #[test]
    fn test_paging_and_sorting() {
        let page = Page::new(2, 5)
            .sorted_by(SortOrder::desc("title"))
            .sorted_by(SortOrder {
                property: "nonsense".to_string(),
                direction: Direction::Asc,
            })
            .sorted_by(SortOrder::asc("postStatusId"));
        let sql = create_query::<Post>(Some(&page), Condition::all()).to_string(SqliteQueryBuilder);
        assert!(
            sql.contains(r#"ORDER BY "e"."title" DESC, "postStatus"."id" ASC"#),
            "{sql}"
        );
        assert!(sql.contains("LIMIT 5 OFFSET 10"), "{sql}");
        assert!(!sql.contains("nonsense"), "{sql}");
    }
}

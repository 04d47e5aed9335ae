use sea_orm::{
    Condition, DatabaseBackend,
    sea_query::{Alias, Expr},
};

use super::criteria::Criteria;

/// A column qualified by the alias of the table it is selected from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: &'static str,
    pub column: &'static str,
}

impl ColumnRef {
    #[must_use]
    pub const fn new(table: &'static str, column: &'static str) -> Self {
        Self { table, column }
    }

    /// `"table"."column"`
    #[must_use]
    pub fn expr(&self) -> Expr {
        Expr::col((Alias::new(self.table), Alias::new(self.column)))
    }
}

/// Look up the column a criteria field is mapped to.
#[must_use]
pub fn find_column<'a>(columns: &'a [(&str, ColumnRef)], field: &str) -> Option<&'a ColumnRef> {
    columns
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| column)
}

/// Compile criteria into a single conjunctive condition.
///
/// Filters are visited in declaration order and every predicate they emit is
/// ANDed in. Fields without an entry in `columns` are skipped. With no criteria,
/// or no set constraints, the result is an empty condition and the query gets
/// no `WHERE` clause.
#[must_use]
pub fn build_conditions<C: Criteria>(
    criteria: Option<&C>,
    columns: &[(&str, ColumnRef)],
    backend: DatabaseBackend,
) -> Condition {
    let mut condition = Condition::all();
    let Some(criteria) = criteria else {
        return condition;
    };

    for (field, filter) in criteria.filters() {
        let Some(column) = find_column(columns, field) else {
            tracing::trace!(field, "No column mapped for criteria field, skipping");
            continue;
        };
        for expr in filter.conditions(column, backend) {
            condition = condition.add(expr);
        }
    }

    condition
}

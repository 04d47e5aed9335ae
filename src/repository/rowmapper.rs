use sea_orm::{DbErr, QueryResult, TryGetable};

/// Builds a value from the `{prefix}_{column}` columns of a joined row.
///
/// Only the value's own columns are read; related values are attached by the
/// repository after mapping.
pub trait RowMapper: Sized {
    /// # Errors
    ///
    /// Returns a [`DbErr`] when a required column is NULL, missing or of the wrong type.
    fn map_row(row: &RowReader<'_>) -> Result<Self, DbErr>;

    /// Map the left-joined side of a row, or `None` when the join found nothing.
    ///
    /// # Errors
    ///
    /// Propagates [`RowMapper::map_row`] failures.
    fn map_joined(row: &QueryResult, prefix: &str) -> Result<Option<Self>, DbErr> {
        let reader = RowReader::new(row, prefix);
        if reader.get::<Option<i64>>("id")?.is_none() {
            return Ok(None);
        }
        Self::map_row(&reader).map(Some)
    }

    /// Map the primary side of a row.
    ///
    /// # Errors
    ///
    /// Propagates [`RowMapper::map_row`] failures.
    fn map_prefixed(row: &QueryResult, prefix: &str) -> Result<Self, DbErr> {
        Self::map_row(&RowReader::new(row, prefix))
    }
}

/// Typed access to one table's columns within a row.
pub struct RowReader<'a> {
    row: &'a QueryResult,
    prefix: String,
}

impl<'a> RowReader<'a> {
    #[must_use]
    pub fn new(row: &'a QueryResult, prefix: &str) -> Self {
        Self {
            row,
            prefix: format!("{prefix}_"),
        }
    }

    /// Read `{prefix}_{column}`. Use an `Option` type for nullable columns.
    ///
    /// # Errors
    ///
    /// Returns a [`DbErr`] when the column is missing, NULL for a non-optional
    /// type, or cannot be converted.
    pub fn get<T: TryGetable>(&self, column: &str) -> Result<T, DbErr> {
        self.row.try_get(&self.prefix, column)
    }
}

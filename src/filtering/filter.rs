//! Typed filter primitives.
//!
//! A filter holds optional constraints on a single field. Each set constraint
//! becomes one predicate on the qualified column it is mapped to, and all of
//! them are ANDed together by [`build_conditions`](super::build_conditions).

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    DatabaseBackend, Value,
    sea_query::{Expr, LikeExpr, SimpleExpr},
};

use super::conditions::ColumnRef;

/// A scalar type that can be held by a filter and bound as a query parameter.
pub trait FilterValue: Clone + PartialEq + fmt::Debug + Into<Value> + Send + Sync + 'static {
    /// Parse a single query-string value.
    ///
    /// # Errors
    ///
    /// Returns a human readable reason when the raw value is not valid for the type.
    fn parse_param(raw: &str) -> Result<Self, String>;

    /// Query parameter for this value.
    fn to_value(&self) -> Value {
        self.clone().into()
    }
}

impl FilterValue for i64 {
    fn parse_param(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|e| format!("'{raw}' is not a valid integer: {e}"))
    }
}

impl FilterValue for bool {
    fn parse_param(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(format!("'{raw}' is not a valid boolean")),
        }
    }
}

impl FilterValue for String {
    fn parse_param(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FilterValue for DateTime<FixedOffset> {
    fn parse_param(raw: &str) -> Result<Self, String> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map_err(|e| format!("'{raw}' is not an RFC 3339 timestamp: {e}"))
    }

    fn to_value(&self) -> Value {
        to_utc(self).into()
    }
}

/// The same instant at offset zero.
///
/// Timestamps are stored and compared in this form, so `SQLite`'s text
/// comparison orders them by instant.
#[must_use]
pub fn to_utc(value: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    value.with_timezone(&Utc).fixed_offset()
}

/// Object-safe view of any filter, used by the condition builder and the
/// query-string parser.
pub trait FieldFilter: fmt::Debug + Send + Sync {
    /// Predicates for every constraint that is set, in a fixed order.
    fn conditions(&self, column: &ColumnRef, backend: DatabaseBackend) -> Vec<SimpleExpr>;

    /// Apply one `field.operator=value` parameter.
    ///
    /// Returns `Ok(false)` when the operator is not supported by this filter.
    ///
    /// # Errors
    ///
    /// Returns the parse failure reason when the value does not fit the filter type.
    fn apply_param(&mut self, operator: &str, raw: &str) -> Result<bool, String>;
}

/// Equality, presence and membership constraints.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub specified: Option<bool>,
    pub is_in: Option<Vec<T>>,
    pub not_in: Option<Vec<T>>,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            specified: None,
            is_in: None,
            not_in: None,
        }
    }
}

impl<T: FilterValue> Filter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_equals(mut self, value: T) -> Self {
        self.equals = Some(value);
        self
    }

    #[must_use]
    pub fn with_not_equals(mut self, value: T) -> Self {
        self.not_equals = Some(value);
        self
    }

    #[must_use]
    pub fn with_specified(mut self, specified: bool) -> Self {
        self.specified = Some(specified);
        self
    }

    #[must_use]
    pub fn with_in(mut self, values: Vec<T>) -> Self {
        self.is_in = Some(values);
        self
    }

    #[must_use]
    pub fn with_not_in(mut self, values: Vec<T>) -> Self {
        self.not_in = Some(values);
        self
    }

    fn push_conditions(&self, column: &ColumnRef, out: &mut Vec<SimpleExpr>) {
        if let Some(value) = &self.equals {
            out.push(column.expr().eq(bind(value)));
        }
        if let Some(value) = &self.not_equals {
            out.push(column.expr().ne(bind(value)));
        }
        match self.specified {
            Some(true) => out.push(column.expr().is_not_null()),
            Some(false) => out.push(column.expr().is_null()),
            None => {}
        }
        if let Some(values) = &self.is_in {
            out.push(column.expr().is_in(values.iter().map(bind)));
        }
        if let Some(values) = &self.not_in {
            out.push(column.expr().is_not_in(values.iter().map(bind)));
        }
    }

    fn apply_base_param(&mut self, operator: &str, raw: &str) -> Result<bool, String> {
        match operator {
            "equals" => self.equals = Some(T::parse_param(raw)?),
            "notEquals" => self.not_equals = Some(T::parse_param(raw)?),
            "specified" => self.specified = Some(bool::parse_param(raw)?),
            "in" => self.is_in = Some(parse_list(raw)?),
            "notIn" => self.not_in = Some(parse_list(raw)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl<T: FilterValue> FieldFilter for Filter<T> {
    fn conditions(&self, column: &ColumnRef, _backend: DatabaseBackend) -> Vec<SimpleExpr> {
        let mut out = Vec::new();
        self.push_conditions(column, &mut out);
        out
    }

    fn apply_param(&mut self, operator: &str, raw: &str) -> Result<bool, String> {
        self.apply_base_param(operator, raw)
    }
}

/// Delegating builders for filters that embed a [`Filter`] as `base`.
macro_rules! base_builders {
    ($value:ty) => {
        #[must_use]
        pub fn with_equals(mut self, value: $value) -> Self {
            self.base.equals = Some(value);
            self
        }

        #[must_use]
        pub fn with_not_equals(mut self, value: $value) -> Self {
            self.base.not_equals = Some(value);
            self
        }

        #[must_use]
        pub fn with_specified(mut self, specified: bool) -> Self {
            self.base.specified = Some(specified);
            self
        }

        #[must_use]
        pub fn with_in(mut self, values: Vec<$value>) -> Self {
            self.base.is_in = Some(values);
            self
        }

        #[must_use]
        pub fn with_not_in(mut self, values: Vec<$value>) -> Self {
            self.base.not_in = Some(values);
            self
        }
    };
}

/// [`Filter`] plus ordering bounds, for numeric and temporal fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeFilter<T> {
    pub base: Filter<T>,
    pub greater_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than: Option<T>,
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            base: Filter::default(),
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: FilterValue> RangeFilter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    base_builders!(T);

    #[must_use]
    pub fn with_greater_than(mut self, value: T) -> Self {
        self.greater_than = Some(value);
        self
    }

    #[must_use]
    pub fn with_greater_than_or_equal(mut self, value: T) -> Self {
        self.greater_than_or_equal = Some(value);
        self
    }

    #[must_use]
    pub fn with_less_than(mut self, value: T) -> Self {
        self.less_than = Some(value);
        self
    }

    #[must_use]
    pub fn with_less_than_or_equal(mut self, value: T) -> Self {
        self.less_than_or_equal = Some(value);
        self
    }
}

impl<T: FilterValue> FieldFilter for RangeFilter<T> {
    fn conditions(&self, column: &ColumnRef, _backend: DatabaseBackend) -> Vec<SimpleExpr> {
        let mut out = Vec::new();
        self.base.push_conditions(column, &mut out);
        if let Some(value) = &self.greater_than {
            out.push(column.expr().gt(bind(value)));
        }
        if let Some(value) = &self.greater_than_or_equal {
            out.push(column.expr().gte(bind(value)));
        }
        if let Some(value) = &self.less_than {
            out.push(column.expr().lt(bind(value)));
        }
        if let Some(value) = &self.less_than_or_equal {
            out.push(column.expr().lte(bind(value)));
        }
        out
    }

    fn apply_param(&mut self, operator: &str, raw: &str) -> Result<bool, String> {
        match operator {
            "greaterThan" => self.greater_than = Some(T::parse_param(raw)?),
            "greaterThanOrEqual" => self.greater_than_or_equal = Some(T::parse_param(raw)?),
            "lessThan" => self.less_than = Some(T::parse_param(raw)?),
            "lessThanOrEqual" => self.less_than_or_equal = Some(T::parse_param(raw)?),
            _ => return self.base.apply_base_param(operator, raw),
        }
        Ok(true)
    }
}

/// [`Filter`] plus case-sensitive substring matching.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StringFilter {
    pub base: Filter<String>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    base_builders!(String);

    #[must_use]
    pub fn with_contains(mut self, needle: impl Into<String>) -> Self {
        self.contains = Some(needle.into());
        self
    }

    #[must_use]
    pub fn with_does_not_contain(mut self, needle: impl Into<String>) -> Self {
        self.does_not_contain = Some(needle.into());
        self
    }
}

impl FieldFilter for StringFilter {
    fn conditions(&self, column: &ColumnRef, backend: DatabaseBackend) -> Vec<SimpleExpr> {
        let mut out = Vec::new();
        self.base.push_conditions(column, &mut out);
        if let Some(needle) = &self.contains {
            out.push(substring_match(column, needle, backend));
        }
        if let Some(needle) = &self.does_not_contain {
            out.push(substring_match(column, needle, backend).not());
        }
        out
    }

    fn apply_param(&mut self, operator: &str, raw: &str) -> Result<bool, String> {
        match operator {
            "contains" => self.contains = Some(raw.to_string()),
            "doesNotContain" => self.does_not_contain = Some(raw.to_string()),
            _ => return self.base.apply_base_param(operator, raw),
        }
        Ok(true)
    }
}

pub type LongFilter = RangeFilter<i64>;
pub type BooleanFilter = Filter<bool>;
pub type ZonedDateTimeFilter = RangeFilter<DateTime<FixedOffset>>;

fn bind<T: FilterValue>(value: &T) -> Value {
    value.to_value()
}

fn parse_list<T: FilterValue>(raw: &str) -> Result<Vec<T>, String> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',').map(T::parse_param).collect()
}

/// Case-sensitive "column contains needle" for the given backend.
///
/// `LIKE` is case-insensitive for ASCII on `SQLite` and under the default
/// `MySQL` collations, so those backends use `GLOB` and `LIKE BINARY`.
fn substring_match(column: &ColumnRef, needle: &str, backend: DatabaseBackend) -> SimpleExpr {
    match backend {
        DatabaseBackend::Sqlite => Expr::cust_with_exprs(
            "$1 GLOB $2",
            [
                SimpleExpr::from(column.expr()),
                SimpleExpr::from(Expr::val(glob_pattern(needle))),
            ],
        ),
        DatabaseBackend::MySql => Expr::cust_with_exprs(
            "$1 LIKE BINARY $2",
            [
                SimpleExpr::from(column.expr()),
                SimpleExpr::from(Expr::val(like_pattern(needle))),
            ],
        ),
        _ => column
            .expr()
            .like(LikeExpr::new(like_pattern(needle)).escape('\\')),
    }
}

/// `%needle%` with `%`, `_` and `\` escaped by a backslash.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `*needle*` with `GLOB` metacharacters wrapped in single-character classes.
pub(crate) fn glob_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('*');
    for c in needle.chars() {
        match c {
            '*' | '?' | '[' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('*');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{Alias, Asterisk, Condition, PostgresQueryBuilder, Query, SqliteQueryBuilder};

    const TITLE: ColumnRef = ColumnRef::new("e", "title");
    const ID: ColumnRef = ColumnRef::new("e", "id");

    fn render(exprs: Vec<SimpleExpr>, backend: DatabaseBackend) -> String {
        let mut condition = Condition::all();
        for expr in exprs {
            condition = condition.add(expr);
        }
        let query = Query::select()
            .column(Asterisk)
            .from(Alias::new("post"))
            .cond_where(condition)
            .to_owned();
        match backend {
            DatabaseBackend::Postgres => query.to_string(PostgresQueryBuilder),
            _ => query.to_string(SqliteQueryBuilder),
        }
    }

    #[test]
    fn test_empty_filter_contributes_nothing() {
        assert!(LongFilter::new().conditions(&ID, DatabaseBackend::Sqlite).is_empty());
        assert!(StringFilter::new().conditions(&TITLE, DatabaseBackend::Sqlite).is_empty());
        assert!(BooleanFilter::new().conditions(&ID, DatabaseBackend::Sqlite).is_empty());
    }

    #[test]
    fn test_equals_and_range_predicates() {
        let filter = LongFilter::new()
            .with_equals(5)
            .with_greater_than(1)
            .with_less_than_or_equal(10);
        let exprs = filter.conditions(&ID, DatabaseBackend::Sqlite);
        assert_eq!(exprs.len(), 3);

        let sql = render(exprs, DatabaseBackend::Sqlite);
        assert!(sql.contains(r#""e"."id" = 5"#), "{sql}");
        assert!(sql.contains(r#""e"."id" > 1"#), "{sql}");
        assert!(sql.contains(r#""e"."id" <= 10"#), "{sql}");
    }

    #[test]
    fn test_specified_maps_to_null_checks() {
        let present = render(
            LongFilter::new().with_specified(true).conditions(&ID, DatabaseBackend::Sqlite),
            DatabaseBackend::Sqlite,
        );
        assert!(present.contains("IS NOT NULL"), "{present}");

        let absent = render(
            LongFilter::new().with_specified(false).conditions(&ID, DatabaseBackend::Sqlite),
            DatabaseBackend::Sqlite,
        );
        assert!(absent.contains("IS NULL"), "{absent}");
        assert!(!absent.contains("NOT NULL"), "{absent}");
    }

    #[test]
    fn test_in_list() {
        let sql = render(
            LongFilter::new().with_in(vec![1, 2]).conditions(&ID, DatabaseBackend::Sqlite),
            DatabaseBackend::Sqlite,
        );
        assert!(sql.contains(r#""e"."id" IN (1, 2)"#), "{sql}");
    }

    #[test]
    fn test_timestamps_bind_at_offset_zero() {
        let local = DateTime::parse_from_rfc3339("2024-01-01T10:00:00+02:00").unwrap();
        assert_eq!(to_utc(&local), local);
        assert_eq!(to_utc(&local).to_rfc3339(), "2024-01-01T08:00:00+00:00");
        assert_eq!(local.to_value(), Value::from(to_utc(&local)));
    }

    #[test]
    fn test_not_equals_and_empty_lists() {
        let sql = render(
            LongFilter::new().with_not_equals(3).conditions(&ID, DatabaseBackend::Sqlite),
            DatabaseBackend::Sqlite,
        );
        assert!(sql.contains(r#""e"."id" <> 3"#), "{sql}");

        let none = render(
            LongFilter::new().with_in(Vec::new()).conditions(&ID, DatabaseBackend::Sqlite),
            DatabaseBackend::Sqlite,
        );
        assert!(none.contains("1 = 2"), "{none}");
        let all = render(
            LongFilter::new().with_not_in(Vec::new()).conditions(&ID, DatabaseBackend::Sqlite),
            DatabaseBackend::Sqlite,
        );
        assert!(all.contains("1 = 1"), "{all}");
    }

    #[test]
    fn test_last_write_wins() {
        let filter = LongFilter::new().with_equals(1).with_equals(2);
        assert_eq!(filter.base.equals, Some(2));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = StringFilter::new().with_contains("A");
        let copy = original.clone().with_contains("B");
        assert_eq!(original.contains.as_deref(), Some("A"));
        assert_eq!(copy.contains.as_deref(), Some("B"));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_contains_uses_glob_on_sqlite() {
        let sql = render(
            StringFilter::new().with_contains("A").conditions(&TITLE, DatabaseBackend::Sqlite),
            DatabaseBackend::Sqlite,
        );
        assert!(sql.contains("GLOB '*A*'"), "{sql}");
    }

    #[test]
    fn test_contains_uses_like_on_postgres() {
        let sql = render(
            StringFilter::new().with_contains("A").conditions(&TITLE, DatabaseBackend::Postgres),
            DatabaseBackend::Postgres,
        );
        assert!(sql.contains("LIKE"), "{sql}");
        assert!(sql.contains("%A%"), "{sql}");
    }

    #[test]
    fn test_does_not_contain_is_negated() {
        let sql = render(
            StringFilter::new()
                .with_does_not_contain("Z")
                .conditions(&TITLE, DatabaseBackend::Sqlite),
            DatabaseBackend::Sqlite,
        );
        assert!(sql.contains("NOT"), "{sql}");
        assert!(sql.contains("'*Z*'"), "{sql}");
    }

    #[test]
    fn test_patterns_escape_metacharacters() {
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
        assert_eq!(glob_pattern("a*b?[c"), "*a[*]b[?][[]c*");
        assert_eq!(glob_pattern("plain"), "*plain*");
    }

    #[test]
    fn test_apply_param_operators() {
        let mut filter = LongFilter::new();
        assert_eq!(filter.apply_param("equals", "7"), Ok(true));
        assert_eq!(filter.apply_param("greaterThanOrEqual", "3"), Ok(true));
        assert_eq!(filter.apply_param("in", "1,2,3"), Ok(true));
        assert_eq!(filter.apply_param("contains", "x"), Ok(false));
        assert!(filter.apply_param("lessThan", "abc").is_err());

        assert_eq!(filter.base.equals, Some(7));
        assert_eq!(filter.greater_than_or_equal, Some(3));
        assert_eq!(filter.base.is_in, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_apply_param_string_and_temporal() {
        let mut title = StringFilter::new();
        assert_eq!(title.apply_param("doesNotContain", "Draft"), Ok(true));
        assert_eq!(title.apply_param("specified", "true"), Ok(true));
        assert_eq!(title.does_not_contain.as_deref(), Some("Draft"));
        assert_eq!(title.base.specified, Some(true));

        let mut created = ZonedDateTimeFilter::new();
        assert_eq!(
            created.apply_param("lessThan", "2024-01-01T00:00:00+02:00"),
            Ok(true)
        );
        assert!(created.apply_param("lessThan", "yesterday").is_err());
    }
}

//! # Criteria Filtering
//!
//! Typed per-field filters, per-entity criteria bundles and the compiler that
//! turns them into a `sea_orm::Condition` over qualified columns.
//!
//! ## Query Parameter Examples
//!
//! ```text
//! GET /api/posts?title.contains=Rust
//! GET /api/posts?id.in=1,2,3&postStatusId.specified=true
//! GET /api/posts?createTime.greaterThanOrEqual=2024-01-01T00:00:00Z
//! GET /api/comments?postId.equals=5&sort=createTime,desc&page=0&size=20
//! ```
//!
//! Supported operators are `equals`, `notEquals`, `specified`, `in`, `notIn`
//! on every filter, `greaterThan`, `greaterThanOrEqual`, `lessThan`,
//! `lessThanOrEqual` on [`RangeFilter`], and `contains` / `doesNotContain` on
//! [`StringFilter`]. String matching is case-sensitive on every backend.

pub mod conditions;
pub mod criteria;
pub mod filter;
pub mod pagination;
pub mod params;

pub use conditions::{ColumnRef, build_conditions, find_column};
pub use criteria::Criteria;
pub use filter::{
    BooleanFilter, FieldFilter, Filter, FilterValue, LongFilter, RangeFilter, StringFilter,
    ZonedDateTimeFilter, to_utc,
};
pub use pagination::{Direction, Page, SortOrder, pagination_headers};
pub use params::{ParamError, parse_criteria};

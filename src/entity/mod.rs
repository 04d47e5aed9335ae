//! Table definitions. The domain types in [`crate::domain`] are mapped from
//! joined query rows; these entities drive inserts, updates and schema bootstrap.

pub mod comment;
pub mod post;
pub mod post_status;

use std::fmt;

use super::filter::FieldFilter;

/// A per-entity bundle of optional field filters plus a `distinct` flag.
///
/// Implementations are generated with [`define_criteria!`](crate::define_criteria).
pub trait Criteria: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Set filters, paired with their field names, in declaration order.
    fn filters(&self) -> Vec<(&'static str, &dyn FieldFilter)>;

    /// The filter for `field`, created empty on first access.
    ///
    /// Returns `None` for names the criteria does not declare.
    fn filter_mut(&mut self, field: &str) -> Option<&mut dyn FieldFilter>;

    /// Defaults to `true` when never set.
    fn distinct(&self) -> bool;

    fn set_distinct(&mut self, distinct: bool);
}

/// Declare a criteria struct and its [`Criteria`] implementation.
///
/// Each entry is `field: FilterType => "queryName"`; the query name is both the
/// key used by the column map and the prefix of `name.operator=value` parameters.
///
/// ```rust,ignore
/// define_criteria! {
///     /// Filters over posts.
///     PostCriteria {
///         id: LongFilter => "id",
///         title: StringFilter => "title",
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_criteria {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($field:ident : $filter:ty => $param:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            $(pub $field: Option<$filter>,)*
            pub distinct: Option<bool>,
        }

        impl $crate::filtering::Criteria for $name {
            fn filters(&self) -> Vec<(&'static str, &dyn $crate::filtering::FieldFilter)> {
                let mut filters: Vec<(&'static str, &dyn $crate::filtering::FieldFilter)> =
                    Vec::new();
                $(
                    if let Some(filter) = &self.$field {
                        filters.push(($param, filter as &dyn $crate::filtering::FieldFilter));
                    }
                )*
                filters
            }

            fn filter_mut(
                &mut self,
                field: &str,
            ) -> Option<&mut dyn $crate::filtering::FieldFilter> {
                match field {
                    $(
                        $param => Some(
                            self.$field.get_or_insert_with(Default::default)
                                as &mut dyn $crate::filtering::FieldFilter,
                        ),
                    )*
                    _ => None,
                }
            }

            fn distinct(&self) -> bool {
                self.distinct.unwrap_or(true)
            }

            fn set_distinct(&mut self, distinct: bool) {
                self.distinct = Some(distinct);
            }
        }
    };
}

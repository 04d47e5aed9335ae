use thiserror::Error;
use tracing::trace;

use super::criteria::Criteria;

/// A query-string parameter that could not be turned into criteria or paging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Invalid value for '{field}.{operator}': {reason}")]
    InvalidFilterValue {
        field: String,
        operator: String,
        reason: String,
    },
    #[error("Invalid value '{value}' for parameter '{name}'")]
    InvalidParameter { name: String, value: String },
}

impl ParamError {
    pub(crate) fn invalid_parameter(name: &str, value: &str) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Build criteria from `field.operator=value` pairs plus `distinct=bool`.
///
/// Parameters naming an unknown field or an operator the field's filter does
/// not support are ignored, as are paging and other unrelated parameters.
///
/// # Errors
///
/// Returns [`ParamError`] when a recognised parameter carries a value that
/// does not parse for the field type.
pub fn parse_criteria<C: Criteria>(params: &[(String, String)]) -> Result<C, ParamError> {
    let mut criteria = C::default();

    for (key, value) in params {
        if key == "distinct" {
            let distinct = match value.trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                _ => return Err(ParamError::invalid_parameter(key, value)),
            };
            criteria.set_distinct(distinct);
            continue;
        }

        let Some((field, operator)) = key.split_once('.') else {
            continue;
        };
        let Some(filter) = criteria.filter_mut(field) else {
            trace!(field, "Ignoring parameter for unknown criteria field");
            continue;
        };
        match filter.apply_param(operator, value) {
            Ok(true) => {}
            Ok(false) => trace!(field, operator, "Ignoring unsupported filter operator"),
            Err(reason) => {
                return Err(ParamError::InvalidFilterValue {
                    field: field.to_string(),
                    operator: operator.to_string(),
                    reason,
                });
            }
        }
    }

    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_criteria;
    use crate::filtering::{BooleanFilter, LongFilter, StringFilter};

    define_criteria! {
        SampleCriteria {
            id: LongFilter => "id",
            title: StringFilter => "title",
            published: BooleanFilter => "published",
        }
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_known_operators() {
        let criteria: SampleCriteria = parse_criteria(&params(&[
            ("id.greaterThan", "3"),
            ("title.contains", "Rust"),
            ("published.equals", "true"),
            ("distinct", "false"),
        ]))
        .unwrap();

        assert_eq!(criteria.id.unwrap().greater_than, Some(3));
        assert_eq!(criteria.title.unwrap().contains.as_deref(), Some("Rust"));
        assert_eq!(criteria.published.unwrap().equals, Some(true));
        assert_eq!(criteria.distinct, Some(false));
    }

    #[test]
    fn test_unknown_fields_and_paging_are_ignored() {
        let criteria: SampleCriteria = parse_criteria(&params(&[
            ("author.equals", "x"),
            ("page", "2"),
            ("sort", "id,desc"),
        ]))
        .unwrap();
        assert_eq!(criteria, SampleCriteria::default());
    }

    #[test]
    fn test_bad_value_is_rejected() {
        let err = parse_criteria::<SampleCriteria>(&params(&[("id.equals", "abc")])).unwrap_err();
        assert!(matches!(
            err,
            ParamError::InvalidFilterValue { ref field, ref operator, .. }
                if field == "id" && operator == "equals"
        ));

        let err = parse_criteria::<SampleCriteria>(&params(&[("distinct", "maybe")])).unwrap_err();
        assert_eq!(err, ParamError::invalid_parameter("distinct", "maybe"));
    }

    #[test]
    fn test_distinct_defaults_to_true() {
        let criteria: SampleCriteria = parse_criteria(&[]).unwrap();
        assert!(criteria.distinct());
    }
}

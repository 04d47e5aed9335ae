use axum::http::{HeaderMap, HeaderName, HeaderValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alert {
    Created,
    Updated,
    Deleted,
}

impl Alert {
    fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// `X-{app}-alert: {app}.{entity}.{action}` and `X-{app}-params: {param}`.
///
/// Headers whose name or value would be invalid are left out.
#[must_use]
pub fn entity_alert_headers(application: &str, alert: Alert, entity: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let message = format!("{application}.{entity}.{}", alert.as_str());
    insert(&mut headers, &format!("x-{application}-alert"), &message);
    insert(&mut headers, &format!("x-{application}-params"), param);
    headers
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!(name, "Skipping invalid alert header"),
    }
}

use axum::http::{HeaderMap, HeaderValue, header::LINK};
use sea_orm::Order;
use url_escape::encode_component;

use super::params::ParamError;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// Sort on a criteria field name; resolved through the entity's column map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    #[must_use]
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    #[must_use]
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// Zero-based page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl Page {
    #[must_use]
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    #[must_use]
    pub fn sorted_by(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Read `page`, `size` and repeated `sort=prop[,prop...][,asc|desc]` parameters.
    ///
    /// A missing `size` falls back to `default_size`; sizes are clamped to
    /// `1..=max_size`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidParameter`] for non-numeric `page` or `size`.
    pub fn from_params(
        params: &[(String, String)],
        default_size: u64,
        max_size: u64,
    ) -> Result<Self, ParamError> {
        let mut page = Self::new(0, default_size);

        for (key, value) in params {
            match key.as_str() {
                "page" => {
                    page.page = value
                        .trim()
                        .parse()
                        .map_err(|_| ParamError::invalid_parameter(key, value))?;
                }
                "size" => {
                    page.size = value
                        .trim()
                        .parse()
                        .map_err(|_| ParamError::invalid_parameter(key, value))?;
                }
                "sort" => page.sort.extend(parse_sort(value)),
                _ => {}
            }
        }

        page.size = page.size.clamp(1, max_size.max(1));
        let in_range = page
            .page
            .checked_mul(page.size)
            .is_some_and(|offset| i64::try_from(offset).is_ok());
        if !in_range {
            return Err(ParamError::invalid_parameter("page", &page.page.to_string()));
        }
        Ok(page)
    }
}

/// `title,desc` => [title desc]; `a,b` => [a asc, b asc]; `a,b,desc` => [a desc, b desc]
fn parse_sort(value: &str) -> Vec<SortOrder> {
    let mut parts: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let direction = match parts.last().map(|p| p.to_ascii_lowercase()) {
        Some(last) if last == "desc" => {
            parts.pop();
            Direction::Desc
        }
        Some(last) if last == "asc" => {
            parts.pop();
            Direction::Asc
        }
        _ => Direction::Asc,
    };

    parts
        .into_iter()
        .map(|property| SortOrder {
            property: property.to_string(),
            direction,
        })
        .collect()
}

/// Build `X-Total-Count` and RFC 5988 `Link` headers for a page of results.
///
/// Links keep every parameter from `params` except `page` and `size`, which are
/// replaced for each relation.
#[must_use]
pub fn pagination_headers(
    base_path: &str,
    params: &[(String, String)],
    page: &Page,
    total_count: u64,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(total_count));

    let size = page.size.max(1);
    let total_pages = total_count.div_ceil(size);
    let last_page = total_pages.saturating_sub(1);

    let mut links = Vec::with_capacity(4);
    if let Some(next) = page.page.checked_add(1).filter(|next| *next < total_pages) {
        links.push(prepare_link(base_path, params, next, size, "next"));
    }
    if page.page > 0 {
        links.push(prepare_link(base_path, params, page.page - 1, size, "prev"));
    }
    links.push(prepare_link(base_path, params, last_page, size, "last"));
    links.push(prepare_link(base_path, params, 0, size, "first"));

    if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(LINK, value);
    } else {
        tracing::warn!(base_path, "Skipping Link header with invalid characters");
    }

    headers
}

fn prepare_link(
    base_path: &str,
    params: &[(String, String)],
    page: u64,
    size: u64,
    rel: &str,
) -> String {
    let mut query: Vec<String> = params
        .iter()
        .filter(|(key, _)| key != "page" && key != "size")
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect();
    query.push(format!("page={page}"));
    query.push(format!("size={size}"));
    format!("<{base_path}?{}>; rel=\"{rel}\"", query.join("&"))
}

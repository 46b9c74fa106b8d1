//! Pagination types shared by list endpoints.

use serde::Serialize;

use crate::error::ApiError;

/// Query string of a list page link. `None` fields are omitted.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageQuery<'a> {
    /// Major filter to carry over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrera: Option<&'a str>,
    /// Search filter to carry over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a str>,
    /// Target page; omitted for the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl PageQuery<'_> {
    /// Renders `base` followed by the URL-encoded query, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the query cannot be encoded.
    pub fn link(&self, base: &str) -> Result<String, ApiError> {
        let query =
            serde_urlencoded::to_string(self).map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(if query.is_empty() {
            base.to_string()
        } else {
            format!("{base}?{query}")
        })
    }
}

/// `?page=` value that selects the final page.
pub const LAST_PAGE: &str = "last";

/// The slice of a list that one page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub page: u32,
    /// Number of pages; at least 1 so an empty list still has page 1.
    pub total_pages: u32,
    /// Index of the first item on the page.
    pub offset: u64,
    /// Maximum items on the page.
    pub limit: u64,
}

impl PageWindow {
    /// Resolves the raw `?page=` value against a list of `total` items.
    ///
    /// An absent or empty value is the first page and [`LAST_PAGE`] is the
    /// final one.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPage`] if the page is not a positive
    /// integer or lies past the last page.
    pub fn resolve(raw_page: Option<&str>, total: u64, page_size: u32) -> Result<Self, ApiError> {
        let limit = u64::from(page_size.max(1));
        let total_pages = u32::try_from(total.div_ceil(limit).max(1)).unwrap_or(u32::MAX);
        let page = match raw_page.map(str::trim) {
            None | Some("") => 1,
            Some(LAST_PAGE) => total_pages,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| ApiError::InvalidPage(raw.to_string()))?,
        };
        if page > total_pages {
            return Err(ApiError::InvalidPage(page.to_string()));
        }
        Ok(Self {
            page,
            total_pages,
            offset: u64::from(page - 1) * limit,
            limit,
        })
    }

    /// Returns `true` if a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_a_first_page() {
        let Ok(window) = PageWindow::resolve(None, 0, 10) else {
            panic!("page 1 always exists");
        };
        assert_eq!(window.total_pages, 1);
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn computes_offsets() {
        let Ok(window) = PageWindow::resolve(Some("3"), 25, 10) else {
            panic!("page 3 exists");
        };
        assert_eq!(window.offset, 20);
        assert_eq!(window.total_pages, 3);
        assert!(window.has_previous());
        assert!(!window.has_next());
    }

    #[test]
    fn empty_page_is_the_first() {
        for raw in ["", "  "] {
            let Ok(window) = PageWindow::resolve(Some(raw), 25, 10) else {
                panic!("empty page selects page 1");
            };
            assert_eq!(window.page, 1);
            assert_eq!(window.offset, 0);
        }
    }

    #[test]
    fn last_selects_the_final_page() {
        let Ok(window) = PageWindow::resolve(Some(LAST_PAGE), 25, 10) else {
            panic!("last page exists");
        };
        assert_eq!(window.page, 3);
        assert_eq!(window.offset, 20);

        let Ok(empty) = PageWindow::resolve(Some(LAST_PAGE), 0, 10) else {
            panic!("an empty list still has a last page");
        };
        assert_eq!(empty.page, 1);
    }

    #[test]
    fn rejects_bad_pages() {
        for raw in ["0", "-1", "abc", "4"] {
            let result = PageWindow::resolve(Some(raw), 25, 10);
            assert!(matches!(result, Err(ApiError::InvalidPage(_))), "{raw}");
        }
    }

    #[test]
    fn links_encode_filters() {
        let query = PageQuery {
            carrera: Some("Ingeniería & Redes"),
            search: None,
            page: Some(2),
        };
        let Ok(link) = query.link("/api/estudiantes/") else {
            panic!("link should encode");
        };
        assert_eq!(
            link,
            "/api/estudiantes/?carrera=Ingenier%C3%ADa+%26+Redes&page=2"
        );
    }

    #[test]
    fn first_page_link_has_no_query() {
        let query = PageQuery {
            carrera: None,
            search: None,
            page: None,
        };
        assert_eq!(query.link("/api/estudiantes/").ok().as_deref(), Some("/api/estudiantes/"));
    }
}

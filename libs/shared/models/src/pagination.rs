use serde::{Deserialize, Serialize};

/// `?page=&size=&search=` as sent by the listing pages. Pages are zero-based.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub size: u64,
}

impl PageQuery {
    /// A missing or zero size falls back to `default_size`.
    pub fn window(&self, default_size: u64) -> PageWindow {
        let size = match self.size {
            Some(size) if size > 0 => size,
            _ => default_size,
        };
        PageWindow {
            page: self.page.unwrap_or(0),
            size,
        }
    }

    /// Search term with surrounding whitespace removed, if anything is left.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

impl PageWindow {
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.size)
    }
}

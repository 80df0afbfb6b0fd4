// crates/sirsi-core/src/pagination.rs
//
// Cursor-based pagination shared by every registry.
//
// Each stored record carries a monotonically increasing sequence number
// assigned at insertion. A page token encodes the sequence number of the last
// record a page returned; the next page starts strictly after it. Inserts only
// ever take higher sequence numbers, so issued tokens never shift.

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// Page size used when the caller sends none (or zero).
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Hard upper bound on a single page.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Position after which the next page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(pub u64);

impl Cursor {
    /// Encode as an opaque token string.
    pub fn encode(&self) -> String {
        format!("p{:x}", self.0)
    }

    /// Decode a token produced by [`Cursor::encode`].
    pub fn decode(token: &str) -> Result<Self, AdminError> {
        token
            .strip_prefix('p')
            .and_then(|hex| u64::from_str_radix(hex, 16).ok())
            .map(Cursor)
            .ok_or_else(|| AdminError::Validation(format!("Malformed page token: {}", token)))
    }
}

/// Pagination parameters of a list call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    pub page_token: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PageRequest {
    pub fn first(page_size: u32) -> Self {
        Self {
            page_token: None,
            page_size: Some(page_size),
        }
    }

    pub fn after(token: impl Into<String>, page_size: u32) -> Self {
        Self {
            page_token: Some(token.into()),
            page_size: Some(page_size),
        }
    }

    /// Effective page size after applying the default and the cap.
    pub fn limit(&self) -> usize {
        match self.page_size {
            None | Some(0) => DEFAULT_PAGE_SIZE as usize,
            Some(n) => n.min(MAX_PAGE_SIZE) as usize,
        }
    }

    /// Decoded cursor, `None` for the first page. Empty tokens count as absent.
    pub fn cursor(&self) -> Result<Option<Cursor>, AdminError> {
        match self.page_token.as_deref() {
            None | Some("") => Ok(None),
            Some(token) => Cursor::decode(token).map(Some),
        }
    }
}

/// `{totalCount}` block returned alongside every list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    pub total_count: u64,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token for the following page; `None` once the listing is exhausted.
    pub next_page_token: Option<String>,
    /// Number of records matching the filter, across all pages.
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_page_token: None,
            total_count: 0,
        }
    }

    pub fn pagination(&self) -> PaginationResponse {
        PaginationResponse {
            total_count: self.total_count,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_page_token: self.next_page_token,
            total_count: self.total_count,
        }
    }
}

/// Slice an ordered `(sequence, item)` iterator into a page.
///
/// `matching` must already be filtered and sorted by ascending sequence;
/// `total_count` is the number of filter matches overall.
pub fn paginate<T>(
    matching: impl Iterator<Item = (u64, T)>,
    request: &PageRequest,
    total_count: u64,
) -> Result<Page<T>, AdminError> {
    let after = request.cursor()?;
    let limit = request.limit();

    let mut items = Vec::with_capacity(limit.min(64));
    let mut last_seq = None;
    let mut has_more = false;

    for (seq, item) in matching.filter(|(seq, _)| after.map_or(true, |c| *seq > c.0)) {
        if items.len() == limit {
            has_more = true;
            break;
        }
        last_seq = Some(seq);
        items.push(item);
    }

    let next_page_token = match (has_more, last_seq) {
        (true, Some(seq)) => Some(Cursor(seq).encode()),
        _ => None,
    };

    Ok(Page {
        items,
        next_page_token,
        total_count,
    })
}

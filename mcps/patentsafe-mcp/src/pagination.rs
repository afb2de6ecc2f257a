//! In-memory pagination of search results
//!
//! The search endpoint returns the full match list in one response; large
//! result sets are handed to the client one page at a time. The remainder
//! is parked under an opaque token, popped when the client asks for the
//! next page.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::types::{Document, PsError, SearchPage};

struct Pending {
    documents: Vec<Document>,
    total: usize,
}

/// Token-keyed store of not-yet-delivered search results
pub struct Paginator {
    page_size: usize,
    pending: Mutex<HashMap<String, Pending>>,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Cut the first page off a result set. When more remains, the rest
    /// is stored and the page carries a token for it.
    pub fn paginate(&self, mut documents: Vec<Document>, total: usize) -> SearchPage {
        if documents.len() <= self.page_size {
            return SearchPage {
                documents,
                next_page_token: None,
                total,
            };
        }

        let remainder = documents.split_off(self.page_size);
        let token = Uuid::new_v4().simple().to_string();
        self.pending.lock().expect("paginator lock poisoned").insert(
            token.clone(),
            Pending {
                documents: remainder,
                total,
            },
        );

        SearchPage {
            documents,
            next_page_token: Some(token),
            total,
        }
    }

    /// Retrieve the next page for a token. Tokens are single-use: the
    /// stored remainder is removed and re-paginated, so each token is
    /// replaced by the one on the page it produces.
    pub fn next_page(&self, token: &str) -> Result<SearchPage, PsError> {
        let pending = self
            .pending
            .lock()
            .expect("paginator lock poisoned")
            .remove(token)
            .ok_or(PsError::UnknownPageToken)?;

        Ok(self.paginate(pending.documents, pending.total))
    }
}

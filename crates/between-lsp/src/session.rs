//! Open documents, keyed by URI.
//!
//! Owned by the server loop; only one message is processed at a time, so no
//! locking is involved. Sync is full-text only: every update replaces the
//! whole document and reruns the pipeline.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use lsp_types::Url;

use crate::analysis::DocumentState;

#[derive(Debug, Default)]
pub struct Session {
    documents: HashMap<Url, DocumentState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document, replacing any previous state for the URI.
    pub fn open(&mut self, uri: Url, text: String) -> &DocumentState {
        let state = DocumentState::analyze(text);
        match self.documents.entry(uri) {
            Entry::Occupied(mut entry) => {
                entry.insert(state);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(state),
        }
    }

    /// Replace the text of an open document. `None` if the URI is not open.
    pub fn apply_full_replace(&mut self, uri: &Url, text: String) -> Option<&DocumentState> {
        let slot = self.documents.get_mut(uri)?;
        *slot = DocumentState::analyze(text);
        Some(slot)
    }

    /// Forget a document, returning its last state.
    pub fn close(&mut self, uri: &Url) -> Option<DocumentState> {
        self.documents.remove(uri)
    }

    pub fn get(&self, uri: &Url) -> Option<&DocumentState> {
        self.documents.get(uri)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

//! The document/filter boundary.
//!
//! A [`Filter`] turns a [`RawDocument`] into an event stream. The session
//! re-reads every document through its filter on each recheck, so filters
//! must be deterministic for unchanged input.

mod json;
mod tsv;

use std::fs;
use std::path::Path;

pub use json::JsonFilter;
pub use tsv::TsvFilter;

use super::{Event, RawDocument};
use crate::charset;
use crate::error::FilterError;
use crate::utils::uri_to_path;

pub trait Filter {
    /// Filter configuration id this filter answers to.
    fn config_id(&self) -> &str;

    /// File extensions (lowercase, without dot) this filter is guessed for.
    fn extensions(&self) -> &[&str];

    fn read(&self, document: &RawDocument) -> Result<Vec<Event>, FilterError>;
}

/// Maps filter configuration ids to filters.
pub struct FilterRegistry {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterRegistry {
    pub fn empty() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn register(&mut self, filter: Box<dyn Filter>) {
        self.filters.retain(|f| f.config_id() != filter.config_id());
        self.filters.push(filter);
    }

    pub fn get(&self, config_id: &str) -> Option<&dyn Filter> {
        self.filters
            .iter()
            .find(|f| f.config_id() == config_id)
            .map(|f| f.as_ref())
    }

    /// Guesses the filter configuration id from a file extension.
    pub fn guess_config_id(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.filters
            .iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
            .map(|f| f.config_id())
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(JsonFilter));
        registry.register(Box::new(TsvFilter));
        registry
    }
}

/// Reads and decodes the content of a document.
pub(crate) fn read_content(document: &RawDocument) -> Result<String, FilterError> {
    let path = uri_to_path(&document.input_uri);
    let bytes = fs::read(&path).map_err(|source| FilterError::Io {
        path: path.clone(),
        source,
    })?;
    charset::decode(&bytes, &document.encoding)
}

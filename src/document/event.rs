use super::unit::TextUnit;
use crate::locale::LocaleId;

/// Events produced by a filter while reading a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartDocument(StartDocument),
    StartSubDocument(StartSubDocument),
    TextUnit(TextUnit),
    EndSubDocument,
    EndDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartDocument {
    pub name: String,
    pub multilingual: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartSubDocument {
    pub id: String,
    pub name: Option<String>,
}

impl StartSubDocument {
    /// The name, falling back to the id.
    pub fn name_or_id(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A document registered in a session: where it lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub input_uri: String,
    pub filter_config_id: String,
    pub encoding: String,
    pub source_locale: LocaleId,
    pub target_locale: LocaleId,
}

impl RawDocument {
    pub fn new(
        input_uri: &str,
        filter_config_id: &str,
        encoding: &str,
        source_locale: LocaleId,
        target_locale: LocaleId,
    ) -> Self {
        Self {
            input_uri: input_uri.to_string(),
            filter_config_id: filter_config_id.to_string(),
            encoding: encoding.to_string(),
            source_locale,
            target_locale,
        }
    }
}

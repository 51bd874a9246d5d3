//! Bilingual JSON documents.
//!
//! ```json
//! {
//!   "multilingual": true,
//!   "units": [
//!     {
//!       "id": "1",
//!       "source": "Hello <b>world</b>",
//!       "targets": { "fr": ["Bonjour ", {"open": "b", "data": "<b>"}, "monde", {"close": "b", "data": "</b>"}] }
//!     }
//!   ],
//!   "subDocuments": [{ "id": "sd1", "name": "menu", "units": [] }]
//! }
//! ```
//!
//! A container is a string, a list of parts (text or code objects), or an
//! object with `segments`, `properties`, `allowedCharacters`, `storageSize`
//! and `issues`. Plain strings are never parsed for markup.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{Filter, read_content};
use crate::document::{
    Annotations, Code, CodedText, Container, Event, RawDocument, Segment, StartDocument,
    StartSubDocument, StorageSize, TagType, TextUnit,
};
use crate::error::FilterError;
use crate::issues::IssueAnnotation;
use crate::locale::LocaleId;

pub struct JsonFilter;

impl Filter for JsonFilter {
    fn config_id(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn read(&self, document: &RawDocument) -> Result<Vec<Event>, FilterError> {
        let content = read_content(document)?;
        parse_document(&content, &document.input_uri)
    }
}

/// Parses a JSON document into events; `name` becomes the document name.
pub fn parse_document(content: &str, name: &str) -> Result<Vec<Event>, FilterError> {
    let dto: DocumentDto = serde_json::from_str(content).map_err(|source| FilterError::Json {
        path: name.to_string(),
        source,
    })?;

    let mut events = vec![Event::StartDocument(StartDocument {
        name: name.to_string(),
        multilingual: dto.multilingual,
    })];
    for unit in dto.units {
        events.push(Event::TextUnit(unit.into_text_unit(name)?));
    }
    for sub in dto.sub_documents {
        events.push(Event::StartSubDocument(StartSubDocument {
            id: sub.id,
            name: sub.name,
        }));
        for unit in sub.units {
            events.push(Event::TextUnit(unit.into_text_unit(name)?));
        }
        events.push(Event::EndSubDocument);
    }
    events.push(Event::EndDocument);
    Ok(events)
}

// ============================================================
// Wire types
// ============================================================

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentDto {
    #[serde(default = "default_true")]
    multilingual: bool,
    #[serde(default)]
    units: Vec<UnitDto>,
    #[serde(default)]
    sub_documents: Vec<SubDocumentDto>,
}

#[derive(Deserialize)]
struct SubDocumentDto {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    units: Vec<UnitDto>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdDto {
    Text(String),
    Number(i64),
}

impl IdDto {
    fn into_string(self) -> String {
        match self {
            IdDto::Text(id) => id,
            IdDto::Number(id) => id.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct UnitDto {
    id: IdDto,
    #[serde(default)]
    name: Option<String>,
    #[serde(default = "default_true")]
    translatable: bool,
    source: ContainerDto,
    #[serde(default)]
    targets: BTreeMap<String, ContainerDto>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContainerDto {
    Content(ContentDto),
    Full(FullContainerDto),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullContainerDto {
    #[serde(default)]
    content: Option<ContentDto>,
    #[serde(default)]
    segments: Vec<SegmentDto>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    allowed_characters: Option<String>,
    #[serde(default)]
    storage_size: Option<StorageSize>,
    #[serde(default)]
    issues: Vec<IssueAnnotation>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentDto {
    Content(ContentDto),
    Full {
        #[serde(default)]
        id: Option<IdDto>,
        content: ContentDto,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentDto {
    Text(String),
    Parts(Vec<PartDto>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PartDto {
    Text(String),
    Code(CodeDto),
}

#[derive(Deserialize)]
struct CodeDto {
    #[serde(default)]
    open: Option<String>,
    #[serde(default)]
    close: Option<String>,
    #[serde(default)]
    ph: Option<String>,
    #[serde(default)]
    data: String,
    #[serde(default)]
    id: Option<i32>,
}

// ============================================================
// Conversion
// ============================================================

impl UnitDto {
    fn into_text_unit(self, path: &str) -> Result<TextUnit, FilterError> {
        let id = self.id.into_string();
        let source = self.source.into_container(path, &id)?;
        let mut unit = TextUnit::new(&id, source);
        unit.name = self.name;
        unit.translatable = self.translatable;
        for (locale, target) in self.targets {
            let target = target.into_container(path, &id)?;
            unit.set_target(&LocaleId::new(&locale), target);
        }
        Ok(unit)
    }
}

impl ContainerDto {
    fn into_container(self, path: &str, tu_id: &str) -> Result<Container, FilterError> {
        match self {
            ContainerDto::Content(content) => {
                Ok(Container::from_coded(content.into_coded(path, tu_id)?))
            }
            ContainerDto::Full(full) => {
                let mut segments = Vec::new();
                if let Some(content) = full.content {
                    segments.push(Segment::new("0", content.into_coded(path, tu_id)?));
                }
                for (index, segment) in full.segments.into_iter().enumerate() {
                    let (id, content) = match segment {
                        SegmentDto::Content(content) => (index.to_string(), content),
                        SegmentDto::Full { id, content } => (
                            id.map_or_else(|| index.to_string(), IdDto::into_string),
                            content,
                        ),
                    };
                    segments.push(Segment::new(&id, content.into_coded(path, tu_id)?));
                }
                Ok(Container {
                    segments,
                    properties: full.properties,
                    annotations: Annotations {
                        allowed_characters: full.allowed_characters,
                        storage_size: full.storage_size,
                        issues: full.issues,
                    },
                })
            }
        }
    }
}

impl ContentDto {
    fn into_coded(self, path: &str, tu_id: &str) -> Result<CodedText, FilterError> {
        let mut coded = CodedText::new();
        match self {
            ContentDto::Text(text) => {
                coded.append_text(&text);
            }
            ContentDto::Parts(parts) => {
                for part in parts {
                    match part {
                        PartDto::Text(text) => {
                            coded.append_text(&text);
                        }
                        PartDto::Code(code) => append_code(&mut coded, code, path, tu_id)?,
                    }
                }
            }
        }
        Ok(coded)
    }
}

fn append_code(
    coded: &mut CodedText,
    code: CodeDto,
    path: &str,
    tu_id: &str,
) -> Result<(), FilterError> {
    let (tag_type, kind) = match (code.open, code.close, code.ph) {
        (Some(kind), None, None) => (TagType::Opening, kind),
        (None, Some(kind), None) => (TagType::Closing, kind),
        (None, None, Some(kind)) => (TagType::Placeholder, kind),
        _ => {
            return Err(FilterError::Invalid {
                path: path.to_string(),
                message: format!(
                    "code in unit '{}' must have exactly one of 'open', 'close' or 'ph'",
                    tu_id
                ),
            });
        }
    };
    match code.id {
        Some(id) => coded.push_code(Code::new(id, tag_type, &kind, &code.data)),
        None => coded.append_code(tag_type, &kind, &code.data),
    };
    Ok(())
}

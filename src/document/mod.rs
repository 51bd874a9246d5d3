//! The bilingual document model consumed by the checkers.
//!
//! This module provides:
//! - [`CodedText`]: text with inline codes and its plain/coded/display projections
//! - [`TextUnit`], [`Container`], [`Segment`]: the unit/segment hierarchy
//! - [`Event`]: what a filter yields while reading a document
//! - [`filter`]: the filter boundary and the built-in filters

pub mod coded_text;
mod event;
pub mod filter;
mod unit;

pub use coded_text::{Code, CodedText, Fragment, TagType};
pub use event::{Event, RawDocument, StartDocument, StartSubDocument};
pub use unit::{
    Annotations, Container, LineBreak, PROP_APPROVED, PROP_HAS_HIDDEN_TEXT, Segment, StorageSize,
    TextUnit,
};

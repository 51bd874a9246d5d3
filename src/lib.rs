//! Transcheck - quality verification for translated documents
//!
//! Transcheck is a CLI tool and library that checks bilingual documents
//! (source text paired with its translation) for translation-quality issues:
//! missing or empty targets, whitespace and inline-code mismatches, pattern
//! and length problems, terminology, character-set constraints and more.
//! Findings are kept in a session that can be saved, reloaded and rechecked
//! while remembering which issues were suppressed.
//!
//! ## Module Structure
//!
//! - `charset`: Encodability checks for named character sets
//! - `checkers`: Leaf checkers and the `QualityChecker` orchestrator
//! - `cli`: Command-line interface layer
//! - `config`: Parameters, config file discovery and the flat session form
//! - `document`: Bilingual object model and document filters
//! - `error`: Library error types
//! - `issues`: Issue model, severity, signature and ordering
//! - `locale`: Locale identifiers
//! - `report`: HTML, tab-delimited and XML reports
//! - `session`: Session state and the binary session file
//! - `utils`: Shared utility functions

pub mod charset;
pub mod checkers;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod issues;
pub mod locale;
pub mod report;
pub mod session;
pub mod utils;

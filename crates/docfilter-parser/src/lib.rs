//! docfilter Parser - definitions and query parameters
//!
//! This crate turns external input into core types:
//! - YAML filter definitions into [`FilterDefinition`](docfilter_core::FilterDefinition)s
//! - raw query parameters into a populated [`Filter`](docfilter_core::Filter)

pub mod definition;
pub mod error;
pub mod params;
pub mod yaml_parser;

// Re-export main parser types
pub use definition::{DefinitionParser, DefinitionRegistry};
pub use error::{ParseError, Result};
pub use params::ParamsParser;
pub use yaml_parser::{UnknownKey, YamlParser};

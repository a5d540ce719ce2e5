//! Builder pattern for FilterEngine

use crate::config::EngineConfig;
use crate::engine::FilterEngine;
use crate::error::Result;
use docfilter_compiler::{CompilerOptions, ConditionCompiler};
use docfilter_core::FilterDefinition;
use docfilter_parser::{DefinitionParser, DefinitionRegistry, ParamsParser};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for FilterEngine
///
/// # Example
///
/// ```rust,ignore
/// use docfilter_sdk::FilterEngineBuilder;
///
/// let engine = FilterEngineBuilder::new()
///     .add_definition_file("filters/blog.yaml")
///     .build()?;
///
/// let query = engine.query("PostFilter", [("views__gte", "100"), ("order_by", "-views")])?;
/// ```
pub struct FilterEngineBuilder {
    config: EngineConfig,
    definitions: Vec<Arc<FilterDefinition>>,
}

impl FilterEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            definitions: Vec::new(),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a definition file
    pub fn add_definition_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.definition_files.push(path.into());
        self
    }

    /// Add definition content directly (alternative to file path)
    pub fn add_definition_content(mut self, content: impl Into<String>) -> Self {
        self.config.definition_contents.push(content.into());
        self
    }

    /// Register a definition built in code
    ///
    /// Definitions loaded from files and contents may refer to it by name.
    pub fn add_definition(mut self, definition: Arc<FilterDefinition>) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Set compiler options
    pub fn with_compiler_options(mut self, options: CompilerOptions) -> Self {
        self.config.compiler_options = options;
        self
    }

    /// Enable ordering validation
    pub fn validate_ordering(mut self, enable: bool) -> Self {
        self.config.validate_ordering = enable;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<FilterEngine> {
        let mut registry = DefinitionRegistry::new();

        for definition in self.definitions {
            registry.insert(definition)?;
        }

        for path in &self.config.definition_files {
            tracing::debug!(path = %path.display(), "Loading filter definitions");
            let content = std::fs::read_to_string(path)?;
            let parsed = DefinitionParser::parse_all_with(&content, &registry)?;
            registry.extend(parsed)?;
        }

        for content in &self.config.definition_contents {
            let parsed = DefinitionParser::parse_all_with(content, &registry)?;
            registry.extend(parsed)?;
        }

        tracing::info!(definitions = registry.len(), "Filter engine ready");

        Ok(FilterEngine::new(
            registry,
            ConditionCompiler::with_options(self.config.compiler_options),
            ParamsParser::new().validate_ordering(self.config.validate_ordering),
        ))
    }
}

impl Default for FilterEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

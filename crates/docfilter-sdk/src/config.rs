//! Configuration types for FilterEngine

use crate::error::{Result, SdkError};
use docfilter_compiler::CompilerOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Definition file path(s)
    pub definition_files: Vec<PathBuf>,

    /// Definition contents - alternative to file paths
    #[serde(skip)]
    pub definition_contents: Vec<String>,

    /// Compiler options
    pub compiler_options: CompilerOptions,

    /// Check ordering values against each definition's model fields
    pub validate_ordering: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            definition_files: Vec::new(),
            definition_contents: Vec::new(),
            compiler_options: CompilerOptions::default(),
            validate_ordering: true,
        }
    }

    /// Load configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| SdkError::ConfigError(e.to_string()))
    }

    /// Add a definition file
    pub fn with_definition_file(mut self, path: PathBuf) -> Self {
        self.definition_files.push(path);
        self
    }

    /// Add definition content
    pub fn with_definition_content(mut self, content: String) -> Self {
        self.definition_contents.push(content);
        self
    }

    /// Set compiler options
    pub fn with_compiler_options(mut self, options: CompilerOptions) -> Self {
        self.compiler_options = options;
        self
    }

    /// Enable ordering validation
    pub fn validate_ordering(mut self, enable: bool) -> Self {
        self.validate_ordering = enable;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

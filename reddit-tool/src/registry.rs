//! The tool registry.

use std::collections::HashMap;

use reddit_types::{ToolDefinition, ToolError};

/// Errors from registering tools.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A tool with this name is already registered.
    #[error("tool already registered: {0}")]
    Duplicate(String),
}

/// Registry of tool definitions, keyed by name.
///
/// Definitions are immutable once registered. Iteration follows
/// registration order so `tools/list` output is stable.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<(), RegistryError> {
        if self.index.contains_key(&definition.name) {
            return Err(RegistryError::Duplicate(definition.name));
        }
        tracing::debug!(tool = %definition.name, "registering tool");
        self.index.insert(definition.name.clone(), self.tools.len());
        self.tools.push(definition);
        Ok(())
    }

    /// Look up a tool by name.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] of kind `UnknownTool` if no such tool exists.
    pub fn lookup(&self, name: &str) -> Result<&ToolDefinition, ToolError> {
        self.get(name).ok_or_else(|| ToolError::unknown_tool(name))
    }

    /// Get a tool by name, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// All definitions, in registration order.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Iterate over definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

//! Tool schemas and the call envelope.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ToolError};

/// Primitive type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    /// A JSON string.
    String,
    /// A JSON integer. Floats are rejected even when integral.
    Integer,
    /// A JSON boolean.
    Boolean,
}

impl ArgType {
    /// JSON Schema `type` keyword for this argument type.
    #[must_use]
    pub fn json_schema_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

/// One declared argument of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgSpec {
    /// Argument name as it appears in the argument object.
    pub name: String,
    /// Declared primitive type.
    pub ty: ArgType,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Value used when the argument is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Inclusive bounds for integer arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(i64, i64)>,
    /// Strings that are blank after trimming count as missing.
    #[serde(default)]
    pub non_empty: bool,
    /// Description shown to MCP clients.
    #[serde(default)]
    pub description: String,
}

impl ArgSpec {
    /// A required string argument.
    #[must_use]
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ArgType::String,
            required: true,
            default: None,
            range: None,
            non_empty: false,
            description: description.into(),
        }
    }

    /// A required integer argument.
    #[must_use]
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            ty: ArgType::Integer,
            ..Self::string(name, description)
        }
    }

    /// A required boolean argument.
    #[must_use]
    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            ty: ArgType::Boolean,
            ..Self::string(name, description)
        }
    }

    /// Mark the argument optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Make the argument optional with a default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.required = false;
        self.default = Some(value.into());
        self
    }

    /// Restrict an integer argument to `min..=max`.
    #[must_use]
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Reject blank strings.
    #[must_use]
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }
}

/// Shape of a tool's success payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// An ordered [`PostListing`](crate::PostListing).
    PostListing,
    /// A [`CommentThread`](crate::CommentThread).
    CommentThread,
    /// A [`SubredditInfo`](crate::SubredditInfo) record.
    SubredditInfo,
    /// A [`CreatedComment`](crate::CreatedComment).
    CreatedComment,
    /// A [`CreatedPost`](crate::CreatedPost).
    CreatedPost,
}

/// A named operation with a fixed argument and result schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Description shown to MCP clients.
    pub description: String,
    /// Declared arguments, in order.
    pub args: Vec<ArgSpec>,
    /// Shape of the success payload.
    pub result: ResultKind,
    /// Whether the tool performs a write against Reddit.
    #[serde(default)]
    pub mutating: bool,
}

impl ToolDefinition {
    /// Find an argument by name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|a| a.name == name)
    }

    /// Render the argument list as a JSON Schema object.
    #[must_use]
    pub fn input_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for arg in &self.args {
            let mut prop = serde_json::Map::new();
            prop.insert("type".into(), arg.ty.json_schema_type().into());
            if !arg.description.is_empty() {
                prop.insert("description".into(), arg.description.clone().into());
            }
            if let Some(default) = &arg.default {
                prop.insert("default".into(), default.clone());
            }
            if let Some((min, max)) = arg.range {
                prop.insert("minimum".into(), min.into());
                prop.insert("maximum".into(), max.into());
            }
            if arg.non_empty {
                prop.insert("minLength".into(), 1.into());
            }
            properties.insert(arg.name.clone(), serde_json::Value::Object(prop));
            if arg.required {
                required.push(serde_json::Value::String(arg.name.clone()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// A single invocation of a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Name of the tool to invoke.
    pub tool: String,
    /// Argument object.
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

impl ToolCallRequest {
    /// Create a request from a tool name and a JSON value.
    ///
    /// Non-object values yield an empty argument map.
    #[must_use]
    pub fn new(tool: impl Into<String>, args: serde_json::Value) -> Self {
        let args = match args {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            tool: tool.into(),
            args,
        }
    }
}

/// Outcome of a tool call, tagged on `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolCallResult {
    /// The tool ran and produced a payload.
    Success {
        /// The structured payload.
        payload: serde_json::Value,
    },
    /// The call failed.
    Error {
        /// Failure classification.
        kind: ErrorKind,
        /// Human-readable detail.
        message: String,
    },
}

impl ToolCallResult {
    /// A success result.
    #[must_use]
    pub fn success(payload: serde_json::Value) -> Self {
        Self::Success { payload }
    }

    /// Whether this is an error result.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Convert into the payload or a [`ToolError`].
    pub fn into_result(self) -> Result<serde_json::Value, ToolError> {
        match self {
            Self::Success { payload } => Ok(payload),
            Self::Error { kind, message } => Err(ToolError { kind, message }),
        }
    }
}

impl From<ToolError> for ToolCallResult {
    fn from(err: ToolError) -> Self {
        Self::Error {
            kind: err.kind,
            message: err.message,
        }
    }
}

impl From<Result<serde_json::Value, ToolError>> for ToolCallResult {
    fn from(result: Result<serde_json::Value, ToolError>) -> Self {
        match result {
            Ok(payload) => Self::Success { payload },
            Err(err) => err.into(),
        }
    }
}

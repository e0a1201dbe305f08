//! Request dispatch: registry lookup, validation, adapter execution.

use std::fmt;
use std::sync::Arc;

use reddit_adapter::RedditAdapter;
use reddit_tool::{ToolRegistry, validate};
use reddit_types::{ToolCallRequest, ToolCallResult, ToolError};
use serde_json::Value;

/// Where a request is in its lifecycle.
///
/// Every request runs `Idle → Validating → Executing → Responding → Idle`
/// and may skip straight to `Responding` when lookup or validation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request in flight.
    Idle,
    /// Looking up the tool and checking arguments.
    Validating,
    /// The adapter is talking to Reddit.
    Executing,
    /// The result is being returned to the transport.
    Responding,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Executing => "executing",
            Self::Responding => "responding",
        };
        f.write_str(name)
    }
}

/// Routes tool-call requests to the adapter.
///
/// Arguments are validated against the registry before the adapter sees
/// them, so a `MissingArgument`, `TypeMismatch`, or `OutOfRange` request
/// never reaches Reddit. Requests are independent; concurrent calls share
/// only the immutable registry and adapter.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    adapter: RedditAdapter,
}

impl Dispatcher {
    /// Create a dispatcher over `registry` and `adapter`.
    #[must_use]
    pub fn new(registry: ToolRegistry, adapter: RedditAdapter) -> Self {
        Self {
            registry: Arc::new(registry),
            adapter,
        }
    }

    /// A dispatcher serving the built-in Reddit tool set.
    #[must_use]
    pub fn reddit(adapter: RedditAdapter) -> Self {
        Self::new(ToolRegistry::reddit(), adapter)
    }

    /// The registry requests are validated against.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one request.
    ///
    /// Never fails: every outcome, including an unknown tool, is a
    /// [`ToolCallResult`].
    pub async fn dispatch(&self, request: ToolCallRequest) -> ToolCallResult {
        let tool = request.tool.as_str();
        let result = self.run(tool, &request.args).await;

        enter(tool, Phase::Responding);
        match &result {
            Ok(_) => tracing::debug!(tool, "tool call succeeded"),
            Err(err) => {
                tracing::debug!(tool, kind = %err.kind, error = %err.message, "tool call failed");
            }
        }
        enter(tool, Phase::Idle);

        result.into()
    }

    async fn run(
        &self,
        tool: &str,
        args: &serde_json::Map<String, Value>,
    ) -> Result<Value, ToolError> {
        enter(tool, Phase::Validating);
        let definition = self.registry.lookup(tool)?;
        let validated = validate(definition, args)?;

        enter(tool, Phase::Executing);
        self.adapter.execute(&definition.name, &validated).await
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tools", &self.registry.len())
            .field("adapter", &self.adapter)
            .finish()
    }
}

fn enter(tool: &str, phase: Phase) {
    tracing::debug!(tool, %phase, "dispatch phase");
}

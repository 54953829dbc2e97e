//! Language-model boundary
//!
//! The pipeline treats the model call as an opaque function: text in,
//! text out (or an error). Concrete providers live outside this
//! workspace and implement [`ModelClient`].

use crate::error::{CoreError, Result};
use crate::state::{StageMessage, ToolInvocation};
use async_trait::async_trait;

/// Request for one model completion
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt for the stage
    pub system: String,
    /// Conversation context assembled by the calling stage
    pub messages: Vec<StageMessage>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, messages: Vec<StageMessage>) -> Self {
        Self {
            system: system.into(),
            messages,
        }
    }
}

/// One model turn: free text plus any requested tool calls
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    /// Non-empty when the model requests tool sub-steps
    pub tool_calls: Vec<ToolInvocation>,
}

impl Completion {
    /// A final text response with no tool calls
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn is_final(&self) -> bool {
        self.tool_calls.is_empty()
    }
}

/// Opaque language-model client used by every reasoning stage
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion>;
}

/// Closed set of actionable decisions extracted from the final
/// free-text trade decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

impl TradeSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl std::str::FromStr for TradeSignal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "HOLD" => Ok(Self::Hold),
            other => Err(CoreError::Model(format!(
                "unrecognized trade signal: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

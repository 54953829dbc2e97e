//! Shared types for the trading debate pipeline
//!
//! This crate defines the state record threaded through every pipeline
//! stage, the run configuration, the model-client boundary, and the
//! error taxonomy used across the workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod state;

pub use config::{ContextBudget, RunConfig};
pub use error::{CoreError, Result};
pub use logging::init_tracing;
pub use model::{Completion, CompletionRequest, ModelClient, TradeSignal};
pub use state::{
    AnalysisState, DebateRole, InvestmentDebateState, MessageRole, RiskDebateState, RiskRole,
    StageMessage, ToolInvocation,
};

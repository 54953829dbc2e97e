//! Workflow graph for the trading debate pipeline
//!
//! Builds a directed graph of named stages from a list of enabled
//! analysts, wires in the conditional routing rules, and drives the
//! graph to completion under a global recursion limit:
//!
//! analysts (with bounded tool loops) -> bull/bear investment debate ->
//! research manager -> trader -> three-party risk debate -> risk manager.

pub mod builder;
pub mod conditional;
pub mod council;
pub mod engine;
pub mod error;
pub mod node;
pub mod propagate;
pub mod signal;
pub mod stages;

pub use builder::{DebateGraph, GraphBuilder};
pub use conditional::ConditionalRouter;
pub use council::TradingCouncil;
pub use engine::{Orchestrator, RunOutcome};
pub use error::{GraphError, Result};
pub use node::{AnalystKind, NodeId};
pub use propagate::{InvocationArgs, Propagator};
pub use signal::{ModelSignalExtractor, SignalExtractor};
pub use stages::Stage;

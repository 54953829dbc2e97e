//! Stage implementations
//!
//! Each stage consumes and mutates the shared [`AnalysisState`].
//! Exactly one stage owns each state field; every other stage reads it.

mod analysts;
mod managers;
mod researchers;
mod risk;

pub use analysts::{AnalystStage, ClearStage, ToolStage};
pub use managers::{ResearchManagerStage, RiskManagerStage, TraderStage};
pub use researchers::DebaterStage;
pub use risk::RiskDebaterStage;

use crate::error::Result;
use async_trait::async_trait;
use council_core::AnalysisState;

/// One named step in the workflow graph
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage name for logging and error reporting
    fn name(&self) -> String;

    /// Execute the stage against the shared state
    async fn run(&self, state: &mut AnalysisState) -> Result<()>;
}

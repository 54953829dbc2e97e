//! Orchestration engine
//!
//! Drives the workflow graph to completion for one run. Traversal is a
//! single-threaded function-call chain with no internal parallelism;
//! the only bound is the stage-transition recursion limit.

use crate::builder::DebateGraph;
use crate::error::{GraphError, Result};
use crate::node::NodeId;
use crate::propagate::InvocationArgs;
use crate::signal::SignalExtractor;
use council_core::{AnalysisState, TradeSignal};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one complete orchestration run
pub struct RunOutcome {
    /// Final state after the risk manager's decision
    pub state: AnalysisState,
    /// Extracted BUY/SELL/HOLD signal
    pub signal: TradeSignal,
    /// Stages in execution order, for diagnostics
    pub visited: Vec<NodeId>,
}

/// Drives a [`DebateGraph`] from its entry stage to the terminal node
pub struct Orchestrator {
    signal: Arc<dyn SignalExtractor>,
}

impl Orchestrator {
    pub fn new(signal: Arc<dyn SignalExtractor>) -> Self {
        Self { signal }
    }

    /// Run the graph to completion on the given initial state.
    ///
    /// Exceeding the recursion limit indicates a debate or tool loop
    /// that did not terminate as expected and fails the run.
    pub async fn run(
        &self,
        graph: &DebateGraph,
        mut state: AnalysisState,
        args: InvocationArgs,
    ) -> Result<RunOutcome> {
        let mut current = graph.entry();
        let mut visited = Vec::new();
        let mut transitions = 0_u32;

        while current != NodeId::End {
            transitions += 1;
            if transitions > args.recursion_limit {
                return Err(GraphError::RecursionLimit {
                    limit: args.recursion_limit,
                });
            }

            let stage = graph.stage(current).ok_or_else(|| {
                GraphError::Configuration(format!("no stage registered for node '{current}'"))
            })?;
            debug!(stage = %current, transition = transitions, "running stage");
            stage.run(&mut state).await?;

            visited.push(current);
            current = graph.next(current, &state);
        }

        info!(
            ticker = %state.ticker,
            trade_date = %state.trade_date,
            stages = visited.len(),
            debate_exchanges = state.investment_debate.count,
            risk_exchanges = state.risk_debate.count,
            market_report_len = state.market_report.len(),
            sentiment_report_len = state.sentiment_report.len(),
            news_report_len = state.news_report.len(),
            fundamentals_report_len = state.fundamentals_report.len(),
            "orchestration run complete"
        );

        let signal = self.signal.extract(&state.final_trade_decision).await?;
        Ok(RunOutcome {
            state,
            signal,
            visited,
        })
    }
}

//! State initialization and graph invocation parameters

use council_core::AnalysisState;

/// Parameters controlling one graph invocation
#[derive(Debug, Clone, Copy)]
pub struct InvocationArgs {
    /// Safety bound on the total number of stage transitions
    pub recursion_limit: u32,
}

/// Builds the initial state and the invocation parameters for a run
#[derive(Debug, Clone, Copy)]
pub struct Propagator {
    max_recursion_limit: u32,
}

impl Default for Propagator {
    fn default() -> Self {
        Self {
            max_recursion_limit: 100,
        }
    }
}

impl Propagator {
    pub fn new(max_recursion_limit: u32) -> Self {
        Self {
            max_recursion_limit,
        }
    }

    /// Fresh state for one run: empty reports, zeroed debate counters,
    /// and the seed message that triggers the first analyst
    pub fn create_initial_state(
        &self,
        ticker: &str,
        company_name: &str,
        trade_date: &str,
    ) -> AnalysisState {
        AnalysisState::new(ticker, company_name, trade_date)
    }

    /// Invocation parameters for the orchestration engine
    pub fn invocation_args(&self) -> InvocationArgs {
        InvocationArgs {
            recursion_limit: self.max_recursion_limit,
        }
    }
}

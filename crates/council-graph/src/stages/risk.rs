//! Three-party risk debate stages

use crate::error::Result;
use crate::node::NodeId;
use crate::stages::Stage;
use async_trait::async_trait;
use council_core::{
    AnalysisState, CompletionRequest, ContextBudget, ModelClient, RiskRole, StageMessage,
};
use std::sync::Arc;

/// One posture in the risk debate.
///
/// Argues its posture over the trader's plan and the other postures'
/// latest responses, then records the turn so the router can pick the
/// next speaker from the explicit role tag.
pub struct RiskDebaterStage {
    role: RiskRole,
    model: Arc<dyn ModelClient>,
    budget: ContextBudget,
}

impl RiskDebaterStage {
    pub fn new(role: RiskRole, model: Arc<dyn ModelClient>, budget: ContextBudget) -> Self {
        Self {
            role,
            model,
            budget,
        }
    }

    fn system_prompt(&self) -> &'static str {
        match self.role {
            RiskRole::Risky => {
                "You are the aggressive risk analyst. Advocate the high-reward case for the \
                 trader's plan and challenge the cautious views."
            }
            RiskRole::Safe => {
                "You are the conservative risk analyst. Stress downside protection and challenge \
                 the aggressive view of the trader's plan."
            }
            RiskRole::Neutral => {
                "You are the neutral risk analyst. Weigh both sides of the trader's plan and \
                 point out what each overstates."
            }
        }
    }

    /// Latest responses of the two other postures
    fn counterparts(&self, state: &AnalysisState) -> (String, String) {
        let debate = &state.risk_debate;
        match self.role {
            RiskRole::Risky => (
                debate.current_safe_response.clone(),
                debate.current_neutral_response.clone(),
            ),
            RiskRole::Safe => (
                debate.current_risky_response.clone(),
                debate.current_neutral_response.clone(),
            ),
            RiskRole::Neutral => (
                debate.current_risky_response.clone(),
                debate.current_safe_response.clone(),
            ),
        }
    }
}

#[async_trait]
impl Stage for RiskDebaterStage {
    fn name(&self) -> String {
        match self.role {
            RiskRole::Risky => NodeId::Risky.to_string(),
            RiskRole::Safe => NodeId::Safe.to_string(),
            RiskRole::Neutral => NodeId::Neutral.to_string(),
        }
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<()> {
        let (first, second) = self.counterparts(state);
        let context = format!(
            "Trader's plan:\n{}\n\nReports:\n{}\n\nDiscussion so far:\n{}\n\n\
             Other analysts' latest arguments:\n{}\n{}",
            self.budget.apply(&state.trader_investment_plan),
            self.budget.apply(&state.combined_reports()),
            self.budget.apply(&state.risk_debate.history),
            self.budget.apply(&first),
            self.budget.apply(&second),
        );

        let request =
            CompletionRequest::new(self.system_prompt(), vec![StageMessage::user(context)]);
        let completion = self.model.complete(request).await?;

        state.risk_debate.record_turn(self.role, completion.content);
        Ok(())
    }
}

//! Bull and bear researcher stages

use crate::error::Result;
use crate::node::NodeId;
use crate::stages::Stage;
use async_trait::async_trait;
use council_core::{
    AnalysisState, CompletionRequest, ContextBudget, DebateRole, ModelClient, StageMessage,
};
use std::sync::Arc;

/// One side of the investment debate.
///
/// Builds its argument from the four analyst reports, the shared
/// transcript and the opponent's last response, then records the turn
/// under its explicit role tag.
pub struct DebaterStage {
    role: DebateRole,
    model: Arc<dyn ModelClient>,
    budget: ContextBudget,
}

impl DebaterStage {
    pub fn new(role: DebateRole, model: Arc<dyn ModelClient>, budget: ContextBudget) -> Self {
        Self {
            role,
            model,
            budget,
        }
    }

    fn system_prompt(&self) -> &'static str {
        match self.role {
            DebateRole::Bull => {
                "You are the bull researcher. Argue for the investment, drawing on the analyst \
                 reports, and rebut the bear's latest points."
            }
            DebateRole::Bear => {
                "You are the bear researcher. Argue against the investment, drawing on the \
                 analyst reports, and rebut the bull's latest points."
            }
        }
    }
}

#[async_trait]
impl Stage for DebaterStage {
    fn name(&self) -> String {
        match self.role {
            DebateRole::Bull => NodeId::Bull.to_string(),
            DebateRole::Bear => NodeId::Bear.to_string(),
        }
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<()> {
        let debate = &state.investment_debate;
        let opponent_last = debate
            .current_response
            .as_ref()
            .map(|(_, text)| text.as_str())
            .unwrap_or_default();
        let context = format!(
            "Reports:\n{}\n\nDebate so far:\n{}\n\nOpponent's last argument:\n{}",
            self.budget.apply(&state.combined_reports()),
            self.budget.apply(&debate.history),
            self.budget.apply(opponent_last),
        );

        let request =
            CompletionRequest::new(self.system_prompt(), vec![StageMessage::user(context)]);
        let completion = self.model.complete(request).await?;

        state
            .investment_debate
            .record_turn(self.role, completion.content);
        Ok(())
    }
}

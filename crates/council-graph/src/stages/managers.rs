//! Decision stages: research manager, trader, risk manager

use crate::error::Result;
use crate::node::NodeId;
use crate::stages::Stage;
use async_trait::async_trait;
use council_core::{AnalysisState, CompletionRequest, ContextBudget, ModelClient, StageMessage};
use std::sync::Arc;

/// Judges the investment debate and produces the investment plan
pub struct ResearchManagerStage {
    model: Arc<dyn ModelClient>,
    budget: ContextBudget,
}

impl ResearchManagerStage {
    pub fn new(model: Arc<dyn ModelClient>, budget: ContextBudget) -> Self {
        Self { model, budget }
    }
}

#[async_trait]
impl Stage for ResearchManagerStage {
    fn name(&self) -> String {
        NodeId::ResearchManager.to_string()
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<()> {
        let context = format!(
            "Reports:\n{}\n\nInvestment debate transcript:\n{}",
            self.budget.apply(&state.combined_reports()),
            self.budget.apply(&state.investment_debate.history),
        );
        let request = CompletionRequest::new(
            "You are the research manager. Judge the bull/bear debate and write an investment \
             plan with a clear recommendation.",
            vec![StageMessage::user(context)],
        );
        let completion = self.model.complete(request).await?;

        state.investment_debate.judge_decision = completion.content.clone();
        state.investment_plan = completion.content;
        Ok(())
    }
}

/// Turns the investment plan into a concrete trading plan
pub struct TraderStage {
    model: Arc<dyn ModelClient>,
    budget: ContextBudget,
}

impl TraderStage {
    pub fn new(model: Arc<dyn ModelClient>, budget: ContextBudget) -> Self {
        Self { model, budget }
    }
}

#[async_trait]
impl Stage for TraderStage {
    fn name(&self) -> String {
        NodeId::Trader.to_string()
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<()> {
        let context = format!(
            "Ticker: {}\nTrade date: {}\n\nInvestment plan:\n{}",
            state.ticker,
            state.trade_date,
            self.budget.apply(&state.investment_plan),
        );
        let request = CompletionRequest::new(
            "You are the trader. Turn the investment plan into a concrete trade proposal.",
            vec![StageMessage::user(context)],
        );
        let completion = self.model.complete(request).await?;

        state.trader_investment_plan = completion.content;
        Ok(())
    }
}

/// Judges the risk debate and issues the final trade decision
pub struct RiskManagerStage {
    model: Arc<dyn ModelClient>,
    budget: ContextBudget,
}

impl RiskManagerStage {
    pub fn new(model: Arc<dyn ModelClient>, budget: ContextBudget) -> Self {
        Self { model, budget }
    }
}

#[async_trait]
impl Stage for RiskManagerStage {
    fn name(&self) -> String {
        NodeId::RiskManager.to_string()
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<()> {
        let context = format!(
            "Trader's plan:\n{}\n\nRisk discussion transcript:\n{}",
            self.budget.apply(&state.trader_investment_plan),
            self.budget.apply(&state.risk_debate.history),
        );
        let request = CompletionRequest::new(
            "You are the risk manager. Judge the risk discussion and issue the final trade \
             decision.",
            vec![StageMessage::user(context)],
        );
        let completion = self.model.complete(request).await?;

        state.risk_debate.judge_decision = completion.content.clone();
        state.final_trade_decision = completion.content;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_core::Completion;

    struct EchoModel(&'static str);

    #[async_trait]
    impl ModelClient for EchoModel {
        async fn complete(&self, _request: CompletionRequest) -> council_core::Result<Completion> {
            Ok(Completion::text(self.0))
        }
    }

    #[tokio::test]
    async fn test_research_manager_writes_plan_and_judgement() {
        let stage = ResearchManagerStage::new(
            Arc::new(EchoModel("invest, sized small")),
            ContextBudget::default(),
        );
        let mut state = AnalysisState::new("AAPL", "Apple Inc.", "2024-05-10");

        stage.run(&mut state).await.unwrap();

        assert_eq!(state.investment_plan, "invest, sized small");
        assert_eq!(state.investment_debate.judge_decision, "invest, sized small");
    }

    #[tokio::test]
    async fn test_risk_manager_writes_final_decision() {
        let stage = RiskManagerStage::new(
            Arc::new(EchoModel("final: BUY")),
            ContextBudget::default(),
        );
        let mut state = AnalysisState::new("AAPL", "Apple Inc.", "2024-05-10");

        stage.run(&mut state).await.unwrap();

        assert_eq!(state.final_trade_decision, "final: BUY");
        assert_eq!(state.risk_debate.judge_decision, "final: BUY");
    }
}

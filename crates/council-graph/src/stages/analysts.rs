//! Analyst, tool and message-clear stages

use crate::error::{GraphError, Result};
use crate::node::{AnalystKind, NodeId};
use crate::stages::Stage;
use async_trait::async_trait;
use council_core::{
    AnalysisState, Completion, CompletionRequest, ContextBudget, ModelClient, StageMessage,
};
use council_data::{DataOperation, VendorRouter};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// An analyst's reasoning step.
///
/// Calls the model with the current message buffer. A response that
/// requests tools is appended to the buffer and routed back through
/// the tool stage; a final response writes the analyst's report field,
/// exactly once per run.
pub struct AnalystStage {
    kind: AnalystKind,
    model: Arc<dyn ModelClient>,
    budget: ContextBudget,
}

impl AnalystStage {
    pub fn new(kind: AnalystKind, model: Arc<dyn ModelClient>, budget: ContextBudget) -> Self {
        Self {
            kind,
            model,
            budget,
        }
    }

    fn system_prompt(&self) -> String {
        let focus = match self.kind {
            AnalystKind::Market => "price history and technical indicators",
            AnalystKind::Social => "social-media sentiment",
            AnalystKind::News => "news and world events",
            AnalystKind::Fundamentals => "company fundamentals",
        };
        format!(
            "You are a financial analyst covering {focus}. Use the available data tools as \
             needed, then write a report for the ticker under analysis."
        )
    }

    fn write_report(&self, state: &mut AnalysisState, report: String) {
        let field = match self.kind {
            AnalystKind::Market => &mut state.market_report,
            AnalystKind::Social => &mut state.sentiment_report,
            AnalystKind::News => &mut state.news_report,
            AnalystKind::Fundamentals => &mut state.fundamentals_report,
        };
        *field = report;
    }
}

#[async_trait]
impl Stage for AnalystStage {
    fn name(&self) -> String {
        NodeId::Analyst(self.kind).to_string()
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<()> {
        let messages = state
            .messages
            .iter()
            .map(|m| StageMessage {
                role: m.role,
                content: self.budget.apply(&m.content),
                tool_calls: m.tool_calls.clone(),
            })
            .collect();
        let request = CompletionRequest::new(self.system_prompt(), messages);
        let completion: Completion = self.model.complete(request).await?;

        debug!(
            analyst = %self.kind,
            tool_calls = completion.tool_calls.len(),
            "analyst turn completed"
        );

        let is_final = completion.is_final();
        state.messages.push(StageMessage::assistant(
            completion.content.clone(),
            completion.tool_calls,
        ));
        if is_final {
            self.write_report(state, completion.content);
        }
        Ok(())
    }
}

/// Executes the tool calls requested by the preceding analyst turn
/// through the vendor routing layer, then hands control back to the
/// same analyst.
pub struct ToolStage {
    kind: AnalystKind,
    router: VendorRouter,
}

impl ToolStage {
    pub fn new(kind: AnalystKind, router: VendorRouter) -> Self {
        Self { kind, router }
    }
}

#[async_trait]
impl Stage for ToolStage {
    fn name(&self) -> String {
        NodeId::Tools(self.kind).to_string()
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<()> {
        let pending = state
            .last_message()
            .map(|m| m.tool_calls.clone())
            .unwrap_or_default();
        if pending.is_empty() {
            return Err(GraphError::Stage {
                node: self.name(),
                message: "tool stage reached without pending tool calls".to_string(),
            });
        }

        for call in pending {
            let operation =
                DataOperation::from_str(&call.operation).map_err(|e| GraphError::Stage {
                    node: self.name(),
                    message: e,
                })?;
            // Vendor exhaustion fails the stage and, with no recovery
            // stage in the graph, the enclosing run.
            let result = self.router.execute(operation, &call.args).await?;
            state.messages.push(StageMessage::tool_result(result));
        }
        Ok(())
    }
}

/// Resets the transient message buffer after an analyst finalizes
pub struct ClearStage {
    kind: AnalystKind,
}

impl ClearStage {
    pub fn new(kind: AnalystKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Stage for ClearStage {
    fn name(&self) -> String {
        NodeId::Clear(self.kind).to_string()
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<()> {
        state.clear_messages();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_core::ToolInvocation;
    use mockall::mock;

    mock! {
        pub Model {}

        #[async_trait]
        impl ModelClient for Model {
            async fn complete(
                &self,
                request: CompletionRequest,
            ) -> council_core::Result<Completion>;
        }
    }

    fn state() -> AnalysisState {
        AnalysisState::new("AAPL", "Apple Inc.", "2024-05-10")
    }

    #[tokio::test]
    async fn test_final_response_writes_owning_report() {
        let mut model = MockModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Ok(Completion::text("market looks strong")));
        let stage = AnalystStage::new(
            AnalystKind::Market,
            Arc::new(model),
            ContextBudget::default(),
        );

        let mut state = state();
        stage.run(&mut state).await.unwrap();

        assert_eq!(state.market_report, "market looks strong");
        assert!(state.sentiment_report.is_empty());
        assert!(!state.last_message().unwrap().has_tool_calls());
    }

    #[tokio::test]
    async fn test_tool_request_defers_report() {
        let mut model = MockModel::new();
        model.expect_complete().times(1).returning(|_| {
            Ok(Completion {
                content: String::new(),
                tool_calls: vec![ToolInvocation {
                    operation: "get_news".to_string(),
                    args: serde_json::Value::Null,
                }],
            })
        });
        let stage =
            AnalystStage::new(AnalystKind::News, Arc::new(model), ContextBudget::default());

        let mut state = state();
        stage.run(&mut state).await.unwrap();

        assert!(state.news_report.is_empty());
        assert!(state.last_message().unwrap().has_tool_calls());
    }

    #[tokio::test]
    async fn test_clear_stage_empties_buffer() {
        let mut state = state();
        state
            .messages
            .push(StageMessage::assistant("report", Vec::new()));
        ClearStage::new(AnalystKind::Market)
            .run(&mut state)
            .await
            .unwrap();
        assert!(state.messages.is_empty());
    }

    #[tokio::test]
    async fn test_tool_stage_rejects_unknown_operation() {
        use council_data::{VendorConfig, VendorRegistry};
        let router = VendorRouter::new(VendorConfig::default(), VendorRegistry::new()).unwrap();
        let stage = ToolStage::new(AnalystKind::Market, router);

        let mut state = state();
        state.messages.push(StageMessage::assistant(
            "",
            vec![ToolInvocation {
                operation: "get_astrology".to_string(),
                args: serde_json::Value::Null,
            }],
        ));
        let err = stage.run(&mut state).await.err();
        assert!(matches!(err, Some(GraphError::Stage { .. })));
    }
}

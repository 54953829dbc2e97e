//! Top-level facade for running a full analysis council

use crate::builder::GraphBuilder;
use crate::engine::{Orchestrator, RunOutcome};
use crate::error::Result;
use crate::node::AnalystKind;
use crate::propagate::Propagator;
use crate::signal::{ModelSignalExtractor, SignalExtractor};
use council_core::{AnalysisState, ModelClient, RunConfig, TradeSignal};
use council_data::VendorRouter;
use std::sync::Arc;
use tracing::info;

/// Wires the model, the vendor router and the run configuration into a
/// reusable entry point. All collaborators are injected; the council
/// holds no global state.
pub struct TradingCouncil {
    builder: GraphBuilder,
    propagator: Propagator,
    orchestrator: Orchestrator,
}

impl TradingCouncil {
    /// Build a council with the default model-backed signal extractor
    pub fn new(
        model: Arc<dyn ModelClient>,
        vendor_router: VendorRouter,
        config: RunConfig,
    ) -> Self {
        let extractor = Arc::new(ModelSignalExtractor::new(model.clone()));
        Self::with_signal_extractor(model, vendor_router, config, extractor)
    }

    pub fn with_signal_extractor(
        model: Arc<dyn ModelClient>,
        vendor_router: VendorRouter,
        config: RunConfig,
        extractor: Arc<dyn SignalExtractor>,
    ) -> Self {
        let propagator = Propagator::new(config.max_recursion_limit);
        Self {
            builder: GraphBuilder::new(model, vendor_router, config),
            propagator,
            orchestrator: Orchestrator::new(extractor),
        }
    }

    /// Run the full pipeline for one ticker and trade date and return
    /// the final state together with the extracted trade signal.
    pub async fn run(
        &self,
        selected: &[AnalystKind],
        ticker: &str,
        company_name: &str,
        trade_date: &str,
    ) -> Result<(AnalysisState, TradeSignal)> {
        info!(%ticker, %trade_date, analysts = selected.len(), "starting council run");
        let graph = self.builder.build(selected)?;
        let state = self
            .propagator
            .create_initial_state(ticker, company_name, trade_date);

        let RunOutcome { state, signal, .. } = self
            .orchestrator
            .run(&graph, state, self.propagator.invocation_args())
            .await?;
        Ok((state, signal))
    }

    /// As [`run`](Self::run), with analysts given by configuration name
    pub async fn run_with_names(
        &self,
        names: &[String],
        ticker: &str,
        company_name: &str,
        trade_date: &str,
    ) -> Result<(AnalysisState, TradeSignal)> {
        let graph = self.builder.build_from_names(names)?;
        let state = self
            .propagator
            .create_initial_state(ticker, company_name, trade_date);

        let RunOutcome { state, signal, .. } = self
            .orchestrator
            .run(&graph, state, self.propagator.invocation_args())
            .await?;
        Ok((state, signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_core::{Completion, CompletionRequest};
    use council_data::{VendorConfig, VendorRegistry};

    struct EchoModel;

    #[async_trait]
    impl ModelClient for EchoModel {
        async fn complete(&self, _request: CompletionRequest) -> council_core::Result<Completion> {
            Ok(Completion::text("HOLD"))
        }
    }

    fn council() -> TradingCouncil {
        let router = VendorRouter::new(VendorConfig::default(), VendorRegistry::new()).unwrap();
        let config = RunConfig::builder()
            .max_debate_rounds(1)
            .max_risk_discuss_rounds(1)
            .build()
            .unwrap();
        TradingCouncil::new(Arc::new(EchoModel), router, config)
    }

    #[tokio::test]
    async fn test_run_returns_state_and_signal() {
        let (state, signal) = council()
            .run(&[AnalystKind::Market], "AAPL", "Apple Inc.", "2024-05-10")
            .await
            .unwrap();

        assert_eq!(state.ticker, "AAPL");
        assert!(!state.final_trade_decision.is_empty());
        assert_eq!(signal, TradeSignal::Hold);
    }

    #[tokio::test]
    async fn test_run_with_unknown_name_fails() {
        let result = council()
            .run_with_names(
                &["astrology".to_string()],
                "AAPL",
                "Apple Inc.",
                "2024-05-10",
            )
            .await;
        assert!(result.is_err());
    }
}

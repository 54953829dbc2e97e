//! Signal extraction: free-text decision to a closed trade signal

use crate::error::{GraphError, Result};
use async_trait::async_trait;
use council_core::{CompletionRequest, ModelClient, StageMessage, TradeSignal};
use std::sync::Arc;
use tracing::warn;

/// Maps the free-text final trade decision to BUY/SELL/HOLD
#[async_trait]
pub trait SignalExtractor: Send + Sync {
    async fn extract(&self, decision_text: &str) -> Result<TradeSignal>;
}

/// Delegates classification to a model call, with a conservative
/// keyword fallback when the model's answer is not one of the three
/// signals.
pub struct ModelSignalExtractor {
    model: Arc<dyn ModelClient>,
}

impl ModelSignalExtractor {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Keyword scan over the raw decision text. Defaults to HOLD when
    /// nothing matches.
    fn keyword_fallback(decision_text: &str) -> TradeSignal {
        let upper = decision_text.to_ascii_uppercase();
        if upper.contains("SELL") {
            TradeSignal::Sell
        } else if upper.contains("BUY") {
            TradeSignal::Buy
        } else {
            TradeSignal::Hold
        }
    }
}

#[async_trait]
impl SignalExtractor for ModelSignalExtractor {
    async fn extract(&self, decision_text: &str) -> Result<TradeSignal> {
        let request = CompletionRequest::new(
            "Extract the investment decision from the report: answer with exactly one of BUY, \
             SELL or HOLD and nothing else.",
            vec![StageMessage::user(decision_text)],
        );
        let completion = self
            .model
            .complete(request)
            .await
            .map_err(|e| GraphError::Model(e.to_string()))?;

        match completion.content.parse::<TradeSignal>() {
            Ok(signal) => Ok(signal),
            Err(_) => {
                let fallback = Self::keyword_fallback(decision_text);
                warn!(
                    answer = %completion.content,
                    fallback = %fallback,
                    "signal classification returned free text, using keyword fallback"
                );
                Ok(fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_core::Completion;

    struct FixedModel(&'static str);

    #[async_trait]
    impl ModelClient for FixedModel {
        async fn complete(&self, _request: CompletionRequest) -> council_core::Result<Completion> {
            Ok(Completion::text(self.0))
        }
    }

    #[tokio::test]
    async fn test_clean_answer_is_parsed() {
        let extractor = ModelSignalExtractor::new(Arc::new(FixedModel("BUY")));
        assert_eq!(
            extractor.extract("long reasoning...").await.unwrap(),
            TradeSignal::Buy
        );
    }

    #[tokio::test]
    async fn test_free_text_answer_falls_back_to_keywords() {
        let extractor = ModelSignalExtractor::new(Arc::new(FixedModel("I think we should wait")));
        assert_eq!(
            extractor
                .extract("the committee recommends we SELL the position")
                .await
                .unwrap(),
            TradeSignal::Sell
        );
    }

    #[tokio::test]
    async fn test_no_keywords_defaults_to_hold() {
        let extractor = ModelSignalExtractor::new(Arc::new(FixedModel("unclear")));
        assert_eq!(
            extractor.extract("no clear direction").await.unwrap(),
            TradeSignal::Hold
        );
    }
}

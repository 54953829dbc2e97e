//! Run configuration for the debate pipeline

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Context-window budget applied centrally when stages assemble
/// prompt context.
///
/// Truncation strategy: keep the head of the text up to `max_chars`
/// and append a marker. Applied in one place so individual stages
/// carry no per-call magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    /// Maximum characters of any single context section
    pub max_chars: usize,
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self { max_chars: 4000 }
    }
}

impl ContextBudget {
    /// Truncate `text` to the budget, appending a marker when cut.
    pub fn apply(&self, text: &str) -> String {
        if text.chars().count() <= self.max_chars {
            return text.to_string();
        }
        let head: String = text.chars().take(self.max_chars).collect();
        format!("{head}\n...(truncated)")
    }
}

/// Configuration for one orchestration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum bull/bear debate rounds (one round = both sides speak)
    pub max_debate_rounds: u32,

    /// Maximum risk-discussion rounds (one round = all three postures speak)
    pub max_risk_discuss_rounds: u32,

    /// Safety bound on the total number of stage transitions in one run
    pub max_recursion_limit: u32,

    /// Context budget applied to prompt assembly
    pub context_budget: ContextBudget,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_debate_rounds: 1,
            max_risk_discuss_rounds: 1,
            max_recursion_limit: 100,
            context_budget: ContextBudget::default(),
        }
    }
}

impl RunConfig {
    /// Create a new configuration builder
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_debate_rounds == 0 {
            return Err(CoreError::Config(
                "max_debate_rounds must be at least 1".to_string(),
            ));
        }
        if self.max_risk_discuss_rounds == 0 {
            return Err(CoreError::Config(
                "max_risk_discuss_rounds must be at least 1".to_string(),
            ));
        }
        if self.max_recursion_limit == 0 {
            return Err(CoreError::Config(
                "max_recursion_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`RunConfig`]
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    max_debate_rounds: Option<u32>,
    max_risk_discuss_rounds: Option<u32>,
    max_recursion_limit: Option<u32>,
    context_budget: Option<ContextBudget>,
}

impl RunConfigBuilder {
    /// Set the maximum investment-debate rounds
    pub fn max_debate_rounds(mut self, rounds: u32) -> Self {
        self.max_debate_rounds = Some(rounds);
        self
    }

    /// Set the maximum risk-discussion rounds
    pub fn max_risk_discuss_rounds(mut self, rounds: u32) -> Self {
        self.max_risk_discuss_rounds = Some(rounds);
        self
    }

    /// Set the stage-transition safety limit
    pub fn max_recursion_limit(mut self, limit: u32) -> Self {
        self.max_recursion_limit = Some(limit);
        self
    }

    /// Set the context budget
    pub fn context_budget(mut self, budget: ContextBudget) -> Self {
        self.context_budget = Some(budget);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<RunConfig> {
        let defaults = RunConfig::default();
        let config = RunConfig {
            max_debate_rounds: self.max_debate_rounds.unwrap_or(defaults.max_debate_rounds),
            max_risk_discuss_rounds: self
                .max_risk_discuss_rounds
                .unwrap_or(defaults.max_risk_discuss_rounds),
            max_recursion_limit: self
                .max_recursion_limit
                .unwrap_or(defaults.max_recursion_limit),
            context_budget: self.context_budget.unwrap_or(defaults.context_budget),
        };
        config.validate()?;
        Ok(config)
    }
}

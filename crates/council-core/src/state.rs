//! Analysis state threaded through every pipeline stage
//!
//! One [`AnalysisState`] is created fresh per run, owned by the
//! orchestration engine, mutated by exactly one stage per field, and
//! discarded after the final state is logged.

use serde::{Deserialize, Serialize};

/// Role tag for the investment debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebateRole {
    /// Argues for the investment
    Bull,
    /// Argues against the investment
    Bear,
}

/// Role tag for the three-party risk debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskRole {
    /// Aggressive, high-reward posture
    Risky,
    /// Conservative posture
    Safe,
    /// Balanced posture
    Neutral,
}

impl RiskRole {
    /// Speaking order is fixed: risky -> safe -> neutral -> risky.
    pub fn next(self) -> Self {
        match self {
            Self::Risky => Self::Safe,
            Self::Safe => Self::Neutral,
            Self::Neutral => Self::Risky,
        }
    }
}

/// Sender of a transient stage message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Seed message that triggers the first analyst
    User,
    /// Model output from an analyst turn
    Assistant,
    /// Result of a tool invocation
    Tool,
}

/// A tool call requested by an analyst turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Abstract data operation name (e.g. "get_stock_data")
    pub operation: String,
    /// JSON arguments forwarded to the vendor layer
    pub args: serde_json::Value,
}

/// One entry in the per-stage transient message buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageMessage {
    pub role: MessageRole,
    pub content: String,
    /// Non-empty only on assistant messages that request tools
    pub tool_calls: Vec<ToolInvocation>,
}

impl StageMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolInvocation>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool_result(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Whether this message requests a tool invocation
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// State of the bull/bear investment debate
///
/// `count` increases by exactly one per debate turn; the debate
/// terminates once `count >= 2 * max_debate_rounds`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvestmentDebateState {
    pub bull_history: String,
    pub bear_history: String,
    /// Interleaved transcript of both speakers
    pub history: String,
    /// Last speaker's text, tagged by role
    pub current_response: Option<(DebateRole, String)>,
    pub judge_decision: String,
    /// Number of exchanges so far
    pub count: u32,
}

impl InvestmentDebateState {
    /// Record one debate turn. Updates the speaker's own history, the
    /// shared transcript, the tagged current response and the count.
    pub fn record_turn(&mut self, role: DebateRole, argument: impl Into<String>) {
        let argument = argument.into();
        match role {
            DebateRole::Bull => {
                self.bull_history.push('\n');
                self.bull_history.push_str(&argument);
            }
            DebateRole::Bear => {
                self.bear_history.push('\n');
                self.bear_history.push_str(&argument);
            }
        }
        self.history.push('\n');
        self.history.push_str(&argument);
        self.current_response = Some((role, argument));
        self.count += 1;
    }

    /// Role tag of the last speaker, if any
    pub fn last_speaker(&self) -> Option<DebateRole> {
        self.current_response.as_ref().map(|(role, _)| *role)
    }
}

/// State of the three-party risk debate
///
/// Terminates once `count >= 3 * max_risk_discuss_rounds`; the next
/// speaker is a deterministic function of `latest_speaker`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskDebateState {
    pub risky_history: String,
    pub safe_history: String,
    pub neutral_history: String,
    /// Interleaved transcript of all three speakers
    pub history: String,
    /// Which role spoke last
    pub latest_speaker: Option<RiskRole>,
    pub current_risky_response: String,
    pub current_safe_response: String,
    pub current_neutral_response: String,
    pub judge_decision: String,
    /// Number of exchanges so far
    pub count: u32,
}

impl RiskDebateState {
    /// Record one risk-debate turn for the given role.
    pub fn record_turn(&mut self, role: RiskRole, argument: impl Into<String>) {
        let argument = argument.into();
        let (role_history, current) = match role {
            RiskRole::Risky => (&mut self.risky_history, &mut self.current_risky_response),
            RiskRole::Safe => (&mut self.safe_history, &mut self.current_safe_response),
            RiskRole::Neutral => (&mut self.neutral_history, &mut self.current_neutral_response),
        };
        role_history.push('\n');
        role_history.push_str(&argument);
        *current = argument.clone();
        self.history.push('\n');
        self.history.push_str(&argument);
        self.latest_speaker = Some(role);
        self.count += 1;
    }
}

/// The single mutable record passed through every stage of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisState {
    /// Ticker symbol under analysis
    pub ticker: String,
    /// Full company name, resolved once at run start
    pub company_name: String,
    /// ISO trade date (YYYY-MM-DD)
    pub trade_date: String,

    /// Transient message buffer for the currently-active analyst.
    /// Reset by each analyst's clear stage.
    pub messages: Vec<StageMessage>,

    // Per-analyst reports, each written once by its owning stage
    pub market_report: String,
    pub sentiment_report: String,
    pub news_report: String,
    pub fundamentals_report: String,

    pub investment_debate: InvestmentDebateState,
    /// Research manager output
    pub investment_plan: String,

    pub trader_investment_plan: String,

    pub risk_debate: RiskDebateState,
    /// Risk manager output
    pub final_trade_decision: String,
}

impl AnalysisState {
    /// Create the initial state for a run. Counts start at zero, all
    /// report fields start empty, and the seed user message triggers
    /// the first analyst.
    pub fn new(
        ticker: impl Into<String>,
        company_name: impl Into<String>,
        trade_date: impl Into<String>,
    ) -> Self {
        let ticker = ticker.into();
        Self {
            messages: vec![StageMessage::user(ticker.clone())],
            ticker,
            company_name: company_name.into(),
            trade_date: trade_date.into(),
            market_report: String::new(),
            sentiment_report: String::new(),
            news_report: String::new(),
            fundamentals_report: String::new(),
            investment_debate: InvestmentDebateState::default(),
            investment_plan: String::new(),
            trader_investment_plan: String::new(),
            risk_debate: RiskDebateState::default(),
            final_trade_decision: String::new(),
        }
    }

    /// Last message in the transient buffer, if any
    pub fn last_message(&self) -> Option<&StageMessage> {
        self.messages.last()
    }

    /// Reset the transient message buffer after an analyst finalizes
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Concatenation of all four analyst reports, used as debate context
    pub fn combined_reports(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}\n\n{}",
            self.market_report, self.sentiment_report, self.news_report, self.fundamentals_report
        )
    }
}

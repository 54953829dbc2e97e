//! Conditional routing rules
//!
//! Pure decision functions that, given the current state, name the
//! next stage at each branch point of the graph.

use crate::node::{AnalystKind, NodeId};
use council_core::{AnalysisState, DebateRole, RiskRole, RunConfig};

/// Transition functions used at the graph's branch points
#[derive(Debug, Clone, Copy)]
pub struct ConditionalRouter {
    max_debate_rounds: u32,
    max_risk_discuss_rounds: u32,
}

impl ConditionalRouter {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            max_debate_rounds: config.max_debate_rounds,
            max_risk_discuss_rounds: config.max_risk_discuss_rounds,
        }
    }

    /// After an analyst's reasoning step: route to its tool stage when
    /// the latest output requests a tool invocation, else to its clear
    /// stage. The tool loop is bounded only by the engine's global
    /// recursion limit.
    pub fn after_analyst(&self, kind: AnalystKind, state: &AnalysisState) -> NodeId {
        match state.last_message() {
            Some(message) if message.has_tool_calls() => NodeId::Tools(kind),
            _ => NodeId::Clear(kind),
        }
    }

    /// After a bull or bear turn: hand over to the research manager
    /// once the exchange budget is spent, otherwise alternate speakers.
    /// Bull speaks first when nobody has spoken yet.
    pub fn after_debater(&self, state: &AnalysisState) -> NodeId {
        let debate = &state.investment_debate;
        if debate.count >= 2 * self.max_debate_rounds {
            return NodeId::ResearchManager;
        }
        match debate.last_speaker() {
            Some(DebateRole::Bull) => NodeId::Bear,
            Some(DebateRole::Bear) | None => NodeId::Bull,
        }
    }

    /// After a risk-debate turn: hand over to the risk manager once
    /// the exchange budget is spent, otherwise cycle
    /// risky -> safe -> neutral -> risky.
    pub fn after_risk_debater(&self, state: &AnalysisState) -> NodeId {
        let debate = &state.risk_debate;
        if debate.count >= 3 * self.max_risk_discuss_rounds {
            return NodeId::RiskManager;
        }
        match debate.latest_speaker {
            None => NodeId::Risky,
            Some(speaker) => match speaker.next() {
                RiskRole::Risky => NodeId::Risky,
                RiskRole::Safe => NodeId::Safe,
                RiskRole::Neutral => NodeId::Neutral,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_core::{StageMessage, ToolInvocation};

    fn router(debate_rounds: u32, risk_rounds: u32) -> ConditionalRouter {
        let config = RunConfig::builder()
            .max_debate_rounds(debate_rounds)
            .max_risk_discuss_rounds(risk_rounds)
            .build()
            .unwrap();
        ConditionalRouter::new(&config)
    }

    fn state() -> AnalysisState {
        AnalysisState::new("AAPL", "Apple Inc.", "2024-05-10")
    }

    #[test]
    fn test_analyst_routes_to_tools_on_tool_call() {
        let router = router(1, 1);
        let mut state = state();
        state.messages.push(StageMessage::assistant(
            "",
            vec![ToolInvocation {
                operation: "get_stock_data".to_string(),
                args: serde_json::Value::Null,
            }],
        ));
        assert_eq!(
            router.after_analyst(AnalystKind::Market, &state),
            NodeId::Tools(AnalystKind::Market)
        );
    }

    #[test]
    fn test_analyst_routes_to_clear_on_final_response() {
        let router = router(1, 1);
        let mut state = state();
        state
            .messages
            .push(StageMessage::assistant("final report", Vec::new()));
        assert_eq!(
            router.after_analyst(AnalystKind::News, &state),
            NodeId::Clear(AnalystKind::News)
        );
    }

    #[test]
    fn test_bull_speaks_first() {
        let router = router(1, 1);
        let state = state();
        assert_eq!(router.after_debater(&state), NodeId::Bull);
    }

    #[test]
    fn test_debate_alternates_speakers() {
        let router = router(2, 1);
        let mut state = state();
        state
            .investment_debate
            .record_turn(DebateRole::Bull, "bull case");
        assert_eq!(router.after_debater(&state), NodeId::Bear);
        state
            .investment_debate
            .record_turn(DebateRole::Bear, "bear case");
        assert_eq!(router.after_debater(&state), NodeId::Bull);
    }

    #[test]
    fn test_debate_terminates_after_two_n_exchanges() {
        // Property: exactly 2N exchanges for every N >= 1.
        for n in 1..=4_u32 {
            let router = router(n, 1);
            let mut state = state();
            let mut exchanges = 0;
            let mut next = router.after_debater(&state);
            while next != NodeId::ResearchManager {
                let role = match next {
                    NodeId::Bull => DebateRole::Bull,
                    NodeId::Bear => DebateRole::Bear,
                    other => panic!("unexpected node {other}"),
                };
                if exchanges == 0 {
                    assert_eq!(role, DebateRole::Bull, "bull must open the debate");
                }
                state.investment_debate.record_turn(role, "argument");
                exchanges += 1;
                next = router.after_debater(&state);
            }
            assert_eq!(exchanges, 2 * n);
        }
    }

    #[test]
    fn test_risk_debate_cycles_and_terminates_after_three_m() {
        for m in 1..=3_u32 {
            let router = router(1, m);
            let mut state = state();
            let mut spoken = Vec::new();
            let mut next = router.after_risk_debater(&state);
            while next != NodeId::RiskManager {
                let role = match next {
                    NodeId::Risky => RiskRole::Risky,
                    NodeId::Safe => RiskRole::Safe,
                    NodeId::Neutral => RiskRole::Neutral,
                    other => panic!("unexpected node {other}"),
                };
                state.risk_debate.record_turn(role, "argument");
                spoken.push(role);
                next = router.after_risk_debater(&state);
            }
            assert_eq!(spoken.len() as u32, 3 * m);
            // Cycle order holds across rounds.
            for (i, role) in spoken.iter().enumerate() {
                let expected = match i % 3 {
                    0 => RiskRole::Risky,
                    1 => RiskRole::Safe,
                    _ => RiskRole::Neutral,
                };
                assert_eq!(*role, expected);
            }
        }
    }
}

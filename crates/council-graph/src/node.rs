//! Node identity for the workflow graph

use serde::{Deserialize, Serialize};

/// The analyst stages that can be enabled for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalystKind {
    /// Price action and technical indicators
    Market,
    /// Social-media sentiment
    Social,
    /// News and world events
    News,
    /// Company fundamentals
    Fundamentals,
}

impl AnalystKind {
    /// All analysts in their canonical order
    pub const ALL: [Self; 4] = [Self::Market, Self::Social, Self::News, Self::Fundamentals];

    /// Configuration-key form of the analyst name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Social => "social",
            Self::News => "news",
            Self::Fundamentals => "fundamentals",
        }
    }
}

impl std::str::FromStr for AnalystKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "market" => Ok(Self::Market),
            "social" | "sentiment" => Ok(Self::Social),
            "news" => Ok(Self::News),
            "fundamentals" => Ok(Self::Fundamentals),
            other => Err(format!("unknown analyst type: {other}")),
        }
    }
}

impl std::fmt::Display for AnalystKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named stage in the workflow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// An analyst's reasoning step
    Analyst(AnalystKind),
    /// An analyst's tool-execution step
    Tools(AnalystKind),
    /// Resets the analyst's transient message buffer
    Clear(AnalystKind),
    Bull,
    Bear,
    ResearchManager,
    Trader,
    Risky,
    Safe,
    Neutral,
    RiskManager,
    /// Terminal marker, not an executable stage
    End,
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analyst(kind) => write!(f, "{kind} analyst"),
            Self::Tools(kind) => write!(f, "{kind} tools"),
            Self::Clear(kind) => write!(f, "{kind} msg clear"),
            Self::Bull => f.write_str("bull researcher"),
            Self::Bear => f.write_str("bear researcher"),
            Self::ResearchManager => f.write_str("research manager"),
            Self::Trader => f.write_str("trader"),
            Self::Risky => f.write_str("risky analyst"),
            Self::Safe => f.write_str("safe analyst"),
            Self::Neutral => f.write_str("neutral analyst"),
            Self::RiskManager => f.write_str("risk manager"),
            Self::End => f.write_str("end"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_analyst_kind_parsing() {
        assert_eq!(AnalystKind::from_str("market"), Ok(AnalystKind::Market));
        assert_eq!(AnalystKind::from_str("sentiment"), Ok(AnalystKind::Social));
        assert!(AnalystKind::from_str("astrology").is_err());
    }

    #[test]
    fn test_node_display() {
        assert_eq!(
            NodeId::Analyst(AnalystKind::Market).to_string(),
            "market analyst"
        );
        assert_eq!(NodeId::RiskManager.to_string(), "risk manager");
    }
}

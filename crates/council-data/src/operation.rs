//! Abstract data operations and their static categories

use serde::{Deserialize, Serialize};

/// Abstract data operations the pipeline can request.
///
/// Every vendor implementing an operation accepts the same argument
/// shape as every other vendor implementing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOperation {
    GetStockData,
    GetIndicators,
    GetFundamentals,
    GetBalanceSheet,
    GetCashflow,
    GetIncomeStatement,
    GetNews,
    GetGlobalNews,
    GetInsiderSentiment,
    GetInsiderTransactions,
}

/// Static classification of operations, used for category-level
/// vendor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationCategory {
    /// OHLCV price data
    CoreStockApis,
    /// Technical analysis indicators
    TechnicalIndicators,
    /// Company fundamentals
    FundamentalData,
    /// News, public and insider
    NewsData,
}

impl DataOperation {
    /// All operations, in their fixed declaration order
    pub const ALL: [Self; 10] = [
        Self::GetStockData,
        Self::GetIndicators,
        Self::GetFundamentals,
        Self::GetBalanceSheet,
        Self::GetCashflow,
        Self::GetIncomeStatement,
        Self::GetNews,
        Self::GetGlobalNews,
        Self::GetInsiderSentiment,
        Self::GetInsiderTransactions,
    ];

    /// The category this operation belongs to
    pub fn category(&self) -> OperationCategory {
        match self {
            Self::GetStockData => OperationCategory::CoreStockApis,
            Self::GetIndicators => OperationCategory::TechnicalIndicators,
            Self::GetFundamentals
            | Self::GetBalanceSheet
            | Self::GetCashflow
            | Self::GetIncomeStatement => OperationCategory::FundamentalData,
            Self::GetNews
            | Self::GetGlobalNews
            | Self::GetInsiderSentiment
            | Self::GetInsiderTransactions => OperationCategory::NewsData,
        }
    }

    /// Configuration-key form of the operation name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetStockData => "get_stock_data",
            Self::GetIndicators => "get_indicators",
            Self::GetFundamentals => "get_fundamentals",
            Self::GetBalanceSheet => "get_balance_sheet",
            Self::GetCashflow => "get_cashflow",
            Self::GetIncomeStatement => "get_income_statement",
            Self::GetNews => "get_news",
            Self::GetGlobalNews => "get_global_news",
            Self::GetInsiderSentiment => "get_insider_sentiment",
            Self::GetInsiderTransactions => "get_insider_transactions",
        }
    }
}

impl std::str::FromStr for DataOperation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown data operation: {s}"))
    }
}

impl std::fmt::Display for DataOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OperationCategory {
    /// Configuration-key form of the category name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoreStockApis => "core_stock_apis",
            Self::TechnicalIndicators => "technical_indicators",
            Self::FundamentalData => "fundamental_data",
            Self::NewsData => "news_data",
        }
    }
}

impl std::fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

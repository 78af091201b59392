//! Strata fund types
//!
//! Every strata scheme maintains two statutory funds: the administrative
//! fund for day-to-day running costs, and the capital works fund for
//! long-term maintenance. Levy schedules, ledger accounts and budgets are
//! all scoped by fund.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The statutory fund a monetary record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundType {
    Admin,
    CapitalWorks,
}

impl FundType {
    /// All fund types, in reporting order
    pub const ALL: [FundType; 2] = [FundType::Admin, FundType::CapitalWorks];

    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FundType::Admin => "admin",
            FundType::CapitalWorks => "capital_works",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            FundType::Admin => "Administrative Fund",
            FundType::CapitalWorks => "Capital Works Fund",
        }
    }
}

impl fmt::Display for FundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FundType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(FundType::Admin),
            "capital_works" => Ok(FundType::CapitalWorks),
            other => Err(CoreError::validation(format!(
                "Unknown fund type: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for fund in FundType::ALL {
            let parsed: FundType = fund.as_str().parse().unwrap();
            assert_eq!(parsed, fund);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&FundType::CapitalWorks).unwrap();
        assert_eq!(json, "\"capital_works\"");
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rolling lookback window for the supply price chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl Timeframe {
    /// Lookback window relative to "now". `None` keeps the whole history.
    /// Windows are fixed day counts so results do not depend on month lengths.
    pub fn window(self) -> Option<Duration> {
        match self {
            Timeframe::OneMonth => Some(Duration::days(30)),
            Timeframe::ThreeMonths => Some(Duration::days(90)),
            Timeframe::SixMonths => Some(Duration::days(180)),
            Timeframe::OneYear => Some(Duration::days(365)),
            Timeframe::All => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneMonth => "1m",
            Timeframe::ThreeMonths => "3m",
            Timeframe::SixMonths => "6m",
            Timeframe::OneYear => "1y",
            Timeframe::All => "all",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown timeframe: {0}")]
pub struct ParseTimeframeError(String);

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "1m" => Ok(Timeframe::OneMonth),
            "3m" => Ok(Timeframe::ThreeMonths),
            "6m" => Ok(Timeframe::SixMonths),
            "1y" => Ok(Timeframe::OneYear),
            "all" => Ok(Timeframe::All),
            other => Err(ParseTimeframeError(other.to_string())),
        }
    }
}

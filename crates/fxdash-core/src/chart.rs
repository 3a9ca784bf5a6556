//! Plotly-compatible candlestick figure documents.
//!
//! The browser hands the serialized figure straight to `Plotly.react`, so the
//! field names follow plotly's figure schema.

use serde::{Deserialize, Serialize};

use crate::BarSeries;

/// Chart title prefix; the pair string follows it.
pub const TITLE_PREFIX: &str = "Exchange Rate: ";

/// Figure with zero or one candlestick trace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandlestickFigure {
    pub data: Vec<CandlestickTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickTrace {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

impl CandlestickFigure {
    /// Blank figure shown whenever the pipeline stops early.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Field-for-field mapping of a series; no resampling or gap filling.
    pub fn from_series(series: &BarSeries, title: &str) -> Self {
        let bars = &series.bars;
        let trace = CandlestickTrace {
            kind: String::from("candlestick"),
            x: bars.iter().map(|bar| bar.date.clone()).collect(),
            open: bars.iter().map(|bar| bar.open).collect(),
            high: bars.iter().map(|bar| bar.high).collect(),
            low: bars.iter().map(|bar| bar.low).collect(),
            close: bars.iter().map(|bar| bar.close).collect(),
        };

        Self {
            data: vec![trace],
            layout: Layout {
                title: Some(Title {
                    text: format!("{TITLE_PREFIX}{title}"),
                }),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn title(&self) -> Option<&str> {
        self.layout.title.as_ref().map(|title| title.text.as_str())
    }
}

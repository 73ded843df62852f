//! The loose-but-typed data model shared by every chart spec.
//!
//! These types sit between the protocol's untyped JSON arguments and the
//! renderers' strict expectations. They all derive serde so a chart spec can
//! round-trip through JSON without loss, and they all carry `validate`
//! methods the adapters call before any geometry is computed.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{ChartsmithError, Result};

/// A label paired with a numeric value; the workhorse of bar-family charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// An x value that may be numeric or textual.
///
/// Temporal values travel as RFC 3339 text; the adapter sniffs the first
/// non-null x of a series and decides whether the series is numeric,
/// categorical, or temporal. Subsequent xs must conform to that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Text(String),
}

impl XValue {
    /// Interprets this value as a temporal instant, if it parses as RFC 3339.
    pub fn as_instant(&self) -> Option<OffsetDateTime> {
        match self {
            XValue::Number(_) => None,
            XValue::Text(s) => OffsetDateTime::parse(s, &Rfc3339).ok(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            XValue::Number(n) => Some(*n),
            XValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            XValue::Number(_) => None,
            XValue::Text(s) => Some(s),
        }
    }
}

/// A single `{x, y}` observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: XValue,
    pub y: f64,
    /// Per-point marker size; 0 means "use the chart default".
    #[serde(default)]
    pub size: f64,
}

/// An ordered sequence of observations with presentation hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    /// Explicit series color; when absent the categorical palette assigns
    /// one by series index.
    #[serde(default)]
    pub color: Option<String>,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }
}

/// A recursive `{label, value, children}` node.
///
/// The effective value of an internal node is the sum of its leaf
/// descendants; a stored `value` on an internal node is ignored by layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub label: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Sum of leaf descendant values (or own value for a leaf).
    pub fn total(&self) -> f64 {
        if self.is_leaf() {
            self.value
        } else {
            self.children.iter().map(TreeNode::total).sum()
        }
    }

    /// Height of the tree rooted here; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Rejects negative leaf values anywhere in the tree.
    pub fn validate(&self) -> Result<()> {
        if self.is_leaf() {
            if self.value < 0.0 {
                return Err(ChartsmithError::Data(format!(
                    "leaf '{}' has negative value {}",
                    self.label, self.value
                )));
            }
            return Ok(());
        }
        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }
}

/// Row/column labels plus a dense 2-D numeric array. Missing cells are not
/// permitted; ragged rows are a data error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn validate(&self) -> Result<()> {
        if self.values.len() != self.rows.len() {
            return Err(ChartsmithError::Data(format!(
                "matrix has {} rows of values but {} row labels",
                self.values.len(),
                self.rows.len()
            )));
        }
        for (i, row) in self.values.iter().enumerate() {
            if row.len() != self.cols.len() {
                return Err(ChartsmithError::Data(format!(
                    "matrix row {} has {} cells but {} column labels",
                    i,
                    row.len(),
                    self.cols.len()
                )));
            }
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// Minimum and maximum over all cells; `None` for an empty matrix.
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        let mut extent: Option<(f64, f64)> = None;
        for row in &self.values {
            for &v in row {
                extent = Some(match extent {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        }
        extent
    }
}

/// One OHLC bar. The timestamp travels as RFC 3339 text and is parsed when
/// the time scale is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl OhlcBar {
    pub fn instant(&self) -> Result<OffsetDateTime> {
        OffsetDateTime::parse(&self.timestamp, &Rfc3339).map_err(|e| {
            ChartsmithError::Data(format!("bad timestamp '{}': {}", self.timestamp, e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if self.low > body_low || self.high < body_high {
            return Err(ChartsmithError::Data(format!(
                "bar at {} violates low <= open/close <= high",
                self.timestamp
            )));
        }
        self.instant().map(|_| ())
    }
}

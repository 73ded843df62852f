//! Chartsmith is a Model Context Protocol server that turns JSON tool
//! calls into SVG charts. A single long-lived process speaks line-delimited
//! JSON-RPC 2.0 over stdio and exposes ~29 chart tools, each backed by a
//! typed spec, a deterministic scale/layout kernel, and a pure SVG
//! renderer. The same renderers compose into named multi-chart galleries.
//!
//! The crate splits along the data flow of one call: the [`mcp`] layer
//! parses and validates, [`chart`] specs describe what to draw, the
//! [`scale`] and [`layout`] kernels turn data into geometry, and
//! [`render`] writes the geometry as SVG text.

pub mod chart;
pub mod data;
pub mod error;
pub mod gallery;
pub mod layout;
pub mod mcp;
pub mod render;
pub mod scale;
pub mod theme;
pub mod unit;
pub mod visual;

pub mod prelude {
    pub use crate::data::{LabeledValue, Matrix, OhlcBar, Series, SeriesPoint, TreeNode, XValue};
    pub use crate::error::{ChartsmithError, Result};
    pub use crate::mcp::server::{McpServer, ServerConfig};
    pub use crate::scale::{BandScale, LinearScale, OrdinalScale, PositionScale, TimeScale};
    pub use crate::theme::Theme;
    pub use crate::visual::color::{ColorMap, ColorPalette};
    pub use crate::visual::shape::PointShape;
}

use thiserror::Error;

/// The main error type for the chartsmith crate.
///
/// One enum covers both sides of the system: the protocol kinds that map to
/// JSON-RPC error codes at the dispatcher boundary, and the domain kinds
/// (data, scale, layout, render) raised while turning a chart spec into SVG.
/// It uses the `thiserror` crate so `Display` and `std::error::Error` come
/// for free and the `?` operator converts underlying library errors.
#[derive(Error, Debug)]
pub enum ChartsmithError {
    /// Malformed JSON on an input line.
    #[error("parse error: {0}")]
    Parse(String),

    /// The JSON was valid but is not a JSON-RPC 2.0 envelope.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown JSON-RPC method name.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// A non-initialize request arrived before the handshake.
    #[error("server not initialized")]
    NotInitialized,

    /// Tool name not present in the registry.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Schema validation failed for a tool call.
    ///
    /// `path` is the JSON pointer of the first offending field, so clients
    /// can point at exactly what to fix.
    #[error("invalid arguments at {path}: {reason}")]
    InvalidArguments { path: String, reason: String },

    /// An input line exceeded the configured maximum message size.
    #[error("message too large: {0} bytes")]
    MessageTooLarge(usize),

    /// An implementation-defined work ceiling was exceeded.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),

    /// Error related to chart data handling or validation.
    ///
    /// Covers empty required data, unknown endpoints in flow data,
    /// mismatched lengths, zero totals, and similar conditions that make a
    /// chart unrenderable.
    #[error("data error: {0}")]
    Data(String),

    /// Error related to scale construction or unit arithmetic.
    #[error("scale error: {0}")]
    Scale(String),

    /// Error from a layout algorithm (e.g. flow conservation violated).
    #[error("layout error: {0}")]
    Layout(String),

    /// Error during SVG generation.
    #[error("render error: {0}")]
    Render(String),

    /// Formatting error during string building.
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// I/O error from the transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartsmithError {
    /// Stable JSON-RPC error code for this error kind.
    ///
    /// The standard codes (-32700..-32600) follow JSON-RPC 2.0; the -320xx
    /// block is server-defined and must never be renumbered, since clients
    /// match on it.
    pub fn rpc_code(&self) -> i64 {
        match self {
            ChartsmithError::Parse(_) | ChartsmithError::Json(_) => -32700,
            ChartsmithError::InvalidRequest(_) => -32600,
            ChartsmithError::MethodNotFound(_) => -32601,
            ChartsmithError::InvalidArguments { .. } => -32602,
            ChartsmithError::NotInitialized => -32002,
            ChartsmithError::ToolNotFound(_) => -32001,
            ChartsmithError::ResourceLimit(_) => -32003,
            ChartsmithError::MessageTooLarge(_) => -32004,
            // Everything raised by adapters, layouts, and renderers surfaces
            // as a tool execution failure.
            ChartsmithError::Data(_)
            | ChartsmithError::Scale(_)
            | ChartsmithError::Layout(_)
            | ChartsmithError::Render(_)
            | ChartsmithError::Fmt(_)
            | ChartsmithError::Io(_) => -32000,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChartsmithError>;

//! Tool declarations and the process-wide registry.
//!
//! One declaration per tool: name, description, JSON-Schema-shaped input
//! description, and the adapter that handles the call. The registry is
//! populated once at first use from the fixed list below and is read-only
//! afterwards; `tools/list` reports it in registration order.

use std::sync::OnceLock;

use ahash::AHashMap;
use serde_json::{json, Value};

use crate::mcp::adapters;
use crate::mcp::adapters::ToolHandler;
use crate::mcp::protocol::ToolInfo;

pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

impl ToolDef {
    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema.clone(),
        }
    }
}

pub struct ToolRegistry {
    tools: Vec<ToolDef>,
    index: AHashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn get(&self, name: &str) -> Option<&ToolDef> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDef> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// The process-wide registry; initialized once, never mutated.
pub fn global() -> &'static ToolRegistry {
    static REGISTRY: OnceLock<ToolRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let tools = declarations();
        let mut index = AHashMap::with_capacity(tools.len());
        for (i, t) in tools.iter().enumerate() {
            index.insert(t.name, i);
        }
        ToolRegistry { tools, index }
    })
}

// --- Shared schema fragments -------------------------------------------

fn labeled_values_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "label": {"type": "string"},
                "value": {"type": "number"}
            },
            "required": ["label", "value"]
        }
    })
}

fn series_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "color": {"type": "string"},
                "points": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "x": {},
                            "y": {"type": "number"},
                            "size": {"type": "number", "default": 0}
                        },
                        "required": ["x", "y"]
                    }
                }
            },
            "required": ["name", "points"]
        }
    })
}

fn tree_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "label": {"type": "string"},
            "value": {"type": "number", "default": 0},
            "children": {"type": "array"}
        },
        "required": ["label"]
    })
}

fn matrix_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "rows": {"type": "array", "items": {"type": "string"}},
            "cols": {"type": "array", "items": {"type": "string"}},
            "values": {
                "type": "array",
                "items": {"type": "array", "items": {"type": "number"}}
            }
        },
        "required": ["rows", "cols", "values"]
    })
}

fn groups_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "label": {"type": "string"},
                "values": {"type": "array", "items": {"type": "number"}}
            },
            "required": ["label", "values"]
        }
    })
}

fn stack_layers_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "color": {"type": "string"},
                "values": {"type": "array", "items": {"type": "number"}}
            },
            "required": ["name", "values"]
        }
    })
}

fn value_rows_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "color": {"type": "string"},
                "values": {"type": "array", "items": {"type": "number"}}
            },
            "required": ["name", "values"]
        }
    })
}

fn dims(width: i64, height: i64) -> (Value, Value) {
    (
        json!({"type": "integer", "default": width}),
        json!({"type": "integer", "default": height}),
    )
}

// --- Declarations ------------------------------------------------------

fn declarations() -> Vec<ToolDef> {
    let mut tools = Vec::with_capacity(29);

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "bar_chart",
        description: "Generate a vertical bar chart from labeled values as SVG.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "data": labeled_values_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "color": {"type": "string"},
                "show_values": {"type": "boolean", "default": true},
                "show_axes": {"type": "boolean", "default": true},
                "show_grid": {"type": "boolean", "default": false}
            },
            "required": ["data"]
        }),
        handler: adapters::bar_chart,
    });

    let (w, h) = dims(600, 600);
    tools.push(ToolDef {
        name: "pie_chart",
        description: "Generate a pie or donut chart with percentage labels as SVG.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "data": labeled_values_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "donut_ratio": {"type": "number", "default": 0},
                "show_percentages": {"type": "boolean", "default": true},
                "show_legend": {"type": "boolean", "default": true}
            },
            "required": ["data"]
        }),
        handler: adapters::pie_chart,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "line_chart",
        description: "Generate a multi-series line chart; x values may be numbers, categories, or RFC 3339 timestamps.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "series": series_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "smooth": {"type": "boolean", "default": false},
                "tension": {"type": "number", "default": 0.5},
                "show_points": {"type": "boolean", "default": false},
                "show_axes": {"type": "boolean", "default": true},
                "show_grid": {"type": "boolean", "default": false},
                "show_legend": {"type": "boolean", "default": true}
            },
            "required": ["series"]
        }),
        handler: adapters::line_chart,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "scatter_plot",
        description: "Generate a scatter plot with configurable marker shapes and per-point sizes.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "series": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "color": {"type": "string"},
                            "shape": {"type": "string", "enum": ["circle", "square", "diamond", "triangle", "cross", "x", "dot"]},
                            "points": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "x": {},
                                        "y": {"type": "number"},
                                        "size": {"type": "number", "default": 0}
                                    },
                                    "required": ["x", "y"]
                                }
                            }
                        },
                        "required": ["name", "points"]
                    }
                },
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "marker_size": {"type": "number", "default": 4},
                "show_axes": {"type": "boolean", "default": true},
                "show_grid": {"type": "boolean", "default": false},
                "show_legend": {"type": "boolean", "default": true}
            },
            "required": ["series"]
        }),
        handler: adapters::scatter_plot,
    });

    let (w, h) = dims(800, 500);
    tools.push(ToolDef {
        name: "heatmap",
        description: "Generate a matrix heatmap with a perceptual colormap.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "matrix": matrix_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "colormap": {"type": "string", "enum": ["viridis", "plasma", "inferno", "magma", "cividis", "rdbu"]},
                "show_values": {"type": "boolean", "default": false}
            },
            "required": ["matrix"]
        }),
        handler: adapters::heatmap,
    });

    let (w, h) = dims(800, 500);
    tools.push(ToolDef {
        name: "treemap",
        description: "Generate a squarified treemap from a value tree.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "root": tree_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "padding": {"type": "number", "default": 2},
                "show_labels": {"type": "boolean", "default": true}
            },
            "required": ["root"]
        }),
        handler: adapters::treemap,
    });

    let (w, h) = dims(600, 600);
    tools.push(ToolDef {
        name: "sunburst",
        description: "Generate a sunburst chart (radial partition) from a value tree.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "root": tree_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "inner_ratio": {"type": "number", "default": 0.2}
            },
            "required": ["root"]
        }),
        handler: adapters::sunburst,
    });

    let (w, h) = dims(600, 600);
    tools.push(ToolDef {
        name: "circle_packing",
        description: "Generate a nested circle packing chart from a value tree.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "root": tree_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "padding": {"type": "number", "default": 2}
            },
            "required": ["root"]
        }),
        handler: adapters::circle_packing,
    });

    let (w, h) = dims(800, 500);
    tools.push(ToolDef {
        name: "icicle",
        description: "Generate an icicle chart (rectangular partition) from a value tree.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "root": tree_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"}
            },
            "required": ["root"]
        }),
        handler: adapters::icicle,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "boxplot",
        description: "Generate box-and-whisker plots per labeled group with outliers.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "groups": groups_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"}
            },
            "required": ["groups"]
        }),
        handler: adapters::boxplot,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "violin",
        description: "Generate violin plots (mirrored kernel densities) per labeled group.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "groups": groups_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "bandwidth": {"type": "number", "default": 0}
            },
            "required": ["groups"]
        }),
        handler: adapters::violin,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "histogram",
        description: "Generate a binned histogram of numeric values.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "values": {"type": "array", "items": {"type": "number"}},
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "bins": {"type": "integer", "default": 20},
                "color": {"type": "string"},
                "show_axes": {"type": "boolean", "default": true}
            },
            "required": ["values"]
        }),
        handler: adapters::histogram,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "ridgeline",
        description: "Generate a ridgeline plot: overlapping density rows, one per group.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "groups": groups_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "bandwidth": {"type": "number", "default": 0},
                "overlap": {"type": "number", "default": 0.5}
            },
            "required": ["groups"]
        }),
        handler: adapters::ridgeline,
    });

    let (w, h) = dims(1000, 600);
    tools.push(ToolDef {
        name: "candlestick",
        description: "Generate a candlestick chart from OHLC bars with an optional volume band.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "bars": ohlc_bars_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "show_volume": {"type": "boolean", "default": true}
            },
            "required": ["bars"]
        }),
        handler: adapters::candlestick,
    });

    let (w, h) = dims(1000, 600);
    tools.push(ToolDef {
        name: "ohlc",
        description: "Generate an open-high-low-close bar chart.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "bars": ohlc_bars_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"}
            },
            "required": ["bars"]
        }),
        handler: adapters::ohlc,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "lollipop",
        description: "Generate a lollipop chart (stems with dots) from labeled values.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "data": labeled_values_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "color": {"type": "string"},
                "show_axes": {"type": "boolean", "default": true}
            },
            "required": ["data"]
        }),
        handler: adapters::lollipop,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "density",
        description: "Generate a kernel density estimate of numeric values as a filled curve.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "values": {"type": "array", "items": {"type": "number"}},
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "bandwidth": {"type": "number", "default": 0},
                "color": {"type": "string"},
                "show_axes": {"type": "boolean", "default": true}
            },
            "required": ["values"]
        }),
        handler: adapters::density,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "connected_scatter",
        description: "Generate a connected scatter plot: one series as a line with labeled markers.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "series": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "color": {"type": "string"},
                        "points": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "x": {},
                                    "y": {"type": "number"},
                                    "size": {"type": "number", "default": 0}
                                },
                                "required": ["x", "y"]
                            }
                        }
                    },
                    "required": ["name", "points"]
                },
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "smooth": {"type": "boolean", "default": false},
                "tension": {"type": "number", "default": 0.5},
                "point_labels": {"type": "array", "items": {"type": "string"}},
                "show_axes": {"type": "boolean", "default": true}
            },
            "required": ["series"]
        }),
        handler: adapters::connected_scatter,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "stacked_area",
        description: "Generate a stacked area chart over shared x positions.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "x": {"type": "array"},
                "series": stack_layers_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "show_axes": {"type": "boolean", "default": true},
                "show_legend": {"type": "boolean", "default": true}
            },
            "required": ["x", "series"]
        }),
        handler: adapters::stacked_area,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "streamchart",
        description: "Generate a streamgraph with a wiggle, silhouette, expand, or zero baseline.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "x": {"type": "array"},
                "series": stack_layers_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "offset": {"type": "string", "enum": ["wiggle", "silhouette", "expand", "zero"], "default": "wiggle"},
                "show_legend": {"type": "boolean", "default": true}
            },
            "required": ["x", "series"]
        }),
        handler: adapters::streamchart,
    });

    let (w, h) = dims(500, 500);
    tools.push(ToolDef {
        name: "correlogram",
        description: "Generate a correlogram: a matrix of correlations in [-1, 1] as sized, diverging-colored discs.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "matrix": matrix_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"}
            },
            "required": ["matrix"]
        }),
        handler: adapters::correlogram,
    });

    let (w, h) = dims(600, 600);
    tools.push(ToolDef {
        name: "radar",
        description: "Generate a radar (spider) chart over at least three axes.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "axes": {"type": "array", "items": {"type": "string"}},
                "series": value_rows_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "max_value": {"type": "number"},
                "rings": {"type": "integer", "default": 4},
                "show_legend": {"type": "boolean", "default": true}
            },
            "required": ["axes", "series"]
        }),
        handler: adapters::radar,
    });

    let (w, h) = dims(800, 400);
    tools.push(ToolDef {
        name: "parallel",
        description: "Generate a parallel coordinates plot, one polyline per row.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "dimensions": {"type": "array", "items": {"type": "string"}},
                "rows": value_rows_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"}
            },
            "required": ["dimensions", "rows"]
        }),
        handler: adapters::parallel,
    });

    let (w, h) = dims(800, 500);
    tools.push(ToolDef {
        name: "wordcloud",
        description: "Generate a word cloud with deterministic spiral placement.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "words": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "text": {"type": "string"},
                            "weight": {"type": "number"}
                        },
                        "required": ["text", "weight"]
                    }
                },
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "min_font_size": {"type": "number", "default": 12},
                "max_font_size": {"type": "number", "default": 52}
            },
            "required": ["words"]
        }),
        handler: adapters::wordcloud,
    });

    let (w, h) = dims(900, 500);
    tools.push(ToolDef {
        name: "sankey",
        description: "Generate a Sankey flow diagram from named nodes and weighted links.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "nodes": {"type": "array", "items": {"type": "string"}},
                "links": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "source": {"type": "string"},
                            "target": {"type": "string"},
                            "value": {"type": "number"}
                        },
                        "required": ["source", "target", "value"]
                    }
                },
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "node_width": {"type": "number", "default": 18},
                "node_padding": {"type": "number", "default": 12},
                "iterations": {"type": "integer", "default": 32}
            },
            "required": ["nodes", "links"]
        }),
        handler: adapters::sankey,
    });

    let (w, h) = dims(600, 600);
    tools.push(ToolDef {
        name: "chord",
        description: "Generate a chord diagram from a square relation matrix.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "labels": {"type": "array", "items": {"type": "string"}},
                "matrix": matrix_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "pad_angle": {"type": "number", "default": 0.04}
            },
            "required": ["labels", "matrix"]
        }),
        handler: adapters::chord,
    });

    let (w, h) = dims(600, 600);
    tools.push(ToolDef {
        name: "circular_bar",
        description: "Generate a circular bar chart: bars arranged radially around the center.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "data": labeled_values_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"},
                "inner_ratio": {"type": "number", "default": 0.25}
            },
            "required": ["data"]
        }),
        handler: adapters::circular_bar,
    });

    let (w, h) = dims(800, 500);
    tools.push(ToolDef {
        name: "dendrogram",
        description: "Generate a dendrogram from a clustering tree; internal node values are merge heights.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "root": tree_schema(),
                "width": w,
                "height": h,
                "title": {"type": "string"}
            },
            "required": ["root"]
        }),
        handler: adapters::dendrogram,
    });

    tools.push(ToolDef {
        name: "generate_gallery",
        description: "Compose a named gallery of chart variants into a single SVG grid.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "gallery_type": {
                    "type": "string",
                    "description": "One of: bar, line, pie, scatter, area, radar"
                }
            },
            "required": ["gallery_type"]
        }),
        handler: adapters::generate_gallery,
    });

    tools
}

fn ohlc_bars_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "timestamp": {"type": "string"},
                "open": {"type": "number"},
                "high": {"type": "number"},
                "low": {"type": "number"},
                "close": {"type": "number"},
                "volume": {"type": "number"}
            },
            "required": ["timestamp", "open", "high", "low", "close"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: [&str; 29] = [
        "bar_chart",
        "pie_chart",
        "line_chart",
        "scatter_plot",
        "heatmap",
        "treemap",
        "sunburst",
        "circle_packing",
        "icicle",
        "boxplot",
        "violin",
        "histogram",
        "ridgeline",
        "candlestick",
        "ohlc",
        "lollipop",
        "density",
        "connected_scatter",
        "stacked_area",
        "streamchart",
        "correlogram",
        "radar",
        "parallel",
        "wordcloud",
        "sankey",
        "chord",
        "circular_bar",
        "dendrogram",
        "generate_gallery",
    ];

    #[test]
    fn all_tools_registered() {
        let reg = global();
        assert_eq!(reg.len(), EXPECTED.len());
        for name in EXPECTED {
            assert!(reg.get(name).is_some(), "tool {} missing", name);
        }
    }

    #[test]
    fn every_tool_has_description_and_object_schema() {
        for tool in global().iter() {
            assert!(!tool.description.is_empty(), "{} has no description", tool.name);
            assert_eq!(tool.input_schema["type"], "object", "{} schema not an object", tool.name);
        }
    }

    #[test]
    fn data_bearing_tools_declare_required_input() {
        for tool in global().iter() {
            let required = tool.input_schema["required"].as_array();
            assert!(
                required.is_some_and(|r| !r.is_empty()),
                "{} declares nothing required",
                tool.name
            );
        }
    }
}

//! End-to-end protocol scenarios driven through the server loop.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use chartsmith::mcp::server::McpServer;

/// Runs one request line through an already-initialized server and parses
/// the response.
fn call(server: &mut McpServer, request: Value) -> Option<Value> {
    server
        .handle_line(&serde_json::to_string(&request).unwrap())
        .map(|resp| serde_json::to_value(resp).unwrap())
}

fn initialized() -> McpServer {
    let mut server = McpServer::new();
    let _ = call(&mut server, json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {}}));
    server
}

fn call_tool(server: &mut McpServer, name: &str, arguments: Value) -> Value {
    call(
        server,
        json!({"jsonrpc": "2.0", "id": 42, "method": "tools/call",
               "params": {"name": name, "arguments": arguments}}),
    )
    .unwrap()
}

/// Extracts the SVG document from a successful tool result.
fn svg_of(response: &Value) -> String {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let body = text.strip_prefix("```svg\n").unwrap();
    body.strip_suffix("\n```").unwrap().to_string()
}

#[test]
fn initialize_handshake() {
    let mut server = McpServer::new();
    let resp = call(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
    )
    .unwrap();
    assert_eq!(resp["result"]["serverInfo"]["name"], "chartsmith");
    assert!(resp["result"]["capabilities"]["tools"].is_object());
    assert_eq!(resp["id"], 1);
}

#[test]
fn tools_list_contains_the_advertised_surface() {
    let mut server = initialized();
    let resp = call(&mut server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).unwrap();
    let tools = resp["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 29);

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in ["bar_chart", "pie_chart", "line_chart", "heatmap", "treemap", "generate_gallery"] {
        assert!(names.contains(&expected), "{} missing from tools/list", expected);
    }
    for tool in tools {
        assert!(!tool["description"].as_str().unwrap().is_empty());
        assert!(tool["inputSchema"]["required"].is_array());
    }
}

#[test]
fn tools_list_is_stable_across_calls() {
    let mut server = initialized();
    let a = call(&mut server, json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list"})).unwrap();
    let b = call(&mut server, json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list"})).unwrap();
    assert_eq!(a, b);
}

#[test]
fn bar_chart_end_to_end() {
    let mut server = initialized();
    let resp = call_tool(
        &mut server,
        "bar_chart",
        json!({
            "data": [
                {"label": "A", "value": 10.0},
                {"label": "B", "value": 20.0},
                {"label": "C", "value": 15.0}
            ],
            "width": 800,
            "height": 400
        }),
    );
    let svg = svg_of(&resp);

    // Marks carry an opacity attribute; the document background does not.
    let bar_rects: Vec<&str> =
        svg.lines().filter(|l| l.starts_with("<rect") && l.contains("opacity=")).collect();
    assert_eq!(bar_rects.len(), 3);
    for label in ["10", "20", "15"] {
        assert!(svg.contains(&format!(">{}<", label)), "value label {} missing", label);
    }

    // The tallest bar belongs to value 20.
    let heights: Vec<f64> = bar_rects
        .iter()
        .map(|l| {
            let key = r#"height=""#;
            let start = l.find(key).unwrap() + key.len();
            l[start..].split('"').next().unwrap().parse().unwrap()
        })
        .collect();
    let max = heights.iter().cloned().fold(0.0, f64::max);
    assert_eq!(heights[1], max);
}

#[test]
fn pie_chart_with_zero_total_fails_as_tool_execution() {
    let mut server = initialized();
    let resp = call_tool(
        &mut server,
        "pie_chart",
        json!({"data": [{"label": "a", "value": 0.0}, {"label": "b", "value": 0.0}]}),
    );
    assert_eq!(resp["error"]["code"], -32000);
    assert!(resp["error"]["message"].as_str().unwrap().contains("total value is zero"));
    assert!(resp.get("result").is_none() || resp["result"].is_null());
}

#[test]
fn invalid_arguments_carry_a_json_pointer() {
    let mut server = initialized();
    let resp = call_tool(&mut server, "bar_chart", json!({"width": 800}));
    assert_eq!(resp["error"]["code"], -32602);
    assert!(resp["error"]["message"].as_str().unwrap().contains("/data"));
}

#[test]
fn treemap_leaf_areas_match_value_shares() {
    let mut server = initialized();
    let resp = call_tool(
        &mut server,
        "treemap",
        json!({
            "root": {
                "label": "root",
                "children": [
                    {"label": "a", "value": 50.0},
                    {"label": "b", "value": 30.0},
                    {"label": "c", "value": 20.0}
                ]
            },
            "width": 600,
            "height": 400,
            "padding": 0,
            "show_labels": false
        }),
    );
    let svg = svg_of(&resp);
    let mut areas = Vec::new();
    for line in svg.lines().filter(|l| l.starts_with("<rect") && l.contains("opacity=")) {
        let get = |key: &str| -> f64 {
            let start = line.find(key).unwrap() + key.len();
            line[start..].split('"').next().unwrap().parse().unwrap()
        };
        areas.push(get(r#"width=""#) * get(r#"height=""#));
    }
    assert_eq!(areas.len(), 3);
    let total: f64 = areas.iter().sum();
    let mut shares: Vec<f64> = areas.iter().map(|a| a / total).collect();
    shares.sort_by(|a, b| b.partial_cmp(a).unwrap());
    for (share, expected) in shares.iter().zip([0.5, 0.3, 0.2]) {
        assert!(
            (share / expected - 1.0).abs() < 0.05,
            "share {} expected {}",
            share,
            expected
        );
    }
}

/// Universal invariant: every registered tool renders a single fenced SVG
/// from a minimal valid argument set.
#[test]
fn every_tool_renders_svg_from_minimal_arguments() {
    let tree = json!({
        "label": "root",
        "children": [
            {"label": "a", "value": 3.0},
            {"label": "b", "value": 7.0}
        ]
    });
    let series = json!([{
        "name": "s",
        "points": [{"x": 0.0, "y": 1.0}, {"x": 1.0, "y": 3.0}, {"x": 2.0, "y": 2.0}]
    }]);
    let groups = json!([
        {"label": "g1", "values": [1.0, 2.0, 2.5, 3.0, 4.0]},
        {"label": "g2", "values": [2.0, 3.0, 3.5, 5.0]}
    ]);
    let bars = json!([
        {"timestamp": "2024-03-01T00:00:00Z", "open": 10.0, "high": 12.0, "low": 9.0, "close": 11.0},
        {"timestamp": "2024-03-02T00:00:00Z", "open": 11.0, "high": 13.0, "low": 10.5, "close": 12.5}
    ]);

    let cases: Vec<(&str, Value)> = vec![
        ("bar_chart", json!({"data": [{"label": "a", "value": 1.0}]})),
        ("pie_chart", json!({"data": [{"label": "a", "value": 1.0}, {"label": "b", "value": 2.0}]})),
        ("line_chart", json!({"series": series})),
        ("scatter_plot", json!({"series": series})),
        ("heatmap", json!({"matrix": {"rows": ["r"], "cols": ["c1", "c2"], "values": [[1.0, 2.0]]}})),
        ("treemap", json!({"root": tree})),
        ("sunburst", json!({"root": tree})),
        ("circle_packing", json!({"root": tree})),
        ("icicle", json!({"root": tree})),
        ("boxplot", json!({"groups": groups})),
        ("violin", json!({"groups": groups})),
        ("histogram", json!({"values": [1.0, 2.0, 2.0, 3.0, 5.0]})),
        ("ridgeline", json!({"groups": groups})),
        ("candlestick", json!({"bars": bars})),
        ("ohlc", json!({"bars": bars})),
        ("lollipop", json!({"data": [{"label": "a", "value": 4.0}]})),
        ("density", json!({"values": [1.0, 2.0, 2.5, 3.0, 4.0]})),
        ("connected_scatter", json!({"series": series[0]})),
        ("stacked_area", json!({"x": [0.0, 1.0, 2.0], "series": [
            {"name": "a", "values": [1.0, 2.0, 1.5]},
            {"name": "b", "values": [2.0, 1.0, 2.5]}
        ]})),
        ("streamchart", json!({"x": [0.0, 1.0, 2.0], "series": [
            {"name": "a", "values": [1.0, 2.0, 1.5]},
            {"name": "b", "values": [2.0, 1.0, 2.5]}
        ]})),
        ("correlogram", json!({"matrix": {"rows": ["a", "b"], "cols": ["a", "b"],
                                           "values": [[1.0, -0.5], [-0.5, 1.0]]}})),
        ("radar", json!({"axes": ["x", "y", "z"], "series": [
            {"name": "s", "values": [1.0, 2.0, 3.0]}
        ]})),
        ("parallel", json!({"dimensions": ["d1", "d2"], "rows": [
            {"name": "r", "values": [1.0, 2.0]}
        ]})),
        ("wordcloud", json!({"words": [{"text": "rust", "weight": 5.0}, {"text": "svg", "weight": 2.0}]})),
        ("sankey", json!({"nodes": ["a", "b"], "links": [{"source": "a", "target": "b", "value": 3.0}]})),
        ("chord", json!({"labels": ["a", "b"], "matrix": {"rows": ["a", "b"], "cols": ["a", "b"],
                                                           "values": [[0.0, 2.0], [1.0, 0.0]]}})),
        ("circular_bar", json!({"data": [{"label": "a", "value": 2.0}, {"label": "b", "value": 3.0}]})),
        ("dendrogram", json!({"root": tree})),
        ("generate_gallery", json!({"gallery_type": "bar"})),
    ];
    assert_eq!(cases.len(), 29);

    let mut server = initialized();
    for (name, args) in cases {
        let resp = call_tool(&mut server, name, args);
        assert!(
            resp.get("error").is_none() || resp["error"].is_null(),
            "tool {} failed: {}",
            name,
            resp["error"]
        );
        let content = resp["result"]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1, "tool {} must return exactly one content item", name);
        let svg = svg_of(&resp);
        assert!(svg.contains("<svg"), "tool {} output has no <svg", name);
        assert!(svg.ends_with("</svg>"), "tool {} output does not end with </svg>", name);
    }
}

#[test]
fn rendering_the_same_call_twice_is_byte_identical() {
    let mut server = initialized();
    let args = json!({"data": [{"label": "a", "value": 3.0}, {"label": "b", "value": 5.0}]});
    let first = svg_of(&call_tool(&mut server, "bar_chart", args.clone()));
    let second = svg_of(&call_tool(&mut server, "bar_chart", args));
    assert_eq!(first, second);
}

#[test]
fn oversized_line_is_rejected_without_killing_the_server() {
    let mut server = initialized();
    let huge = format!(
        r#"{{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{{"name":"bar_chart","arguments":{{"pad":"{}"}}}}}}"#,
        "x".repeat(5 * 1024 * 1024)
    );
    let resp = server.handle_line(&huge).unwrap();
    let value = serde_json::to_value(resp).unwrap();
    assert_eq!(value["error"]["code"], -32004);

    let ok = call(&mut server, json!({"jsonrpc": "2.0", "id": 10, "method": "tools/list"})).unwrap();
    assert!(ok["result"]["tools"].is_array());
}

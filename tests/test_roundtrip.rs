//! Serde round-trips: every chart spec survives JSON encode/decode intact.

use chartsmith::chart::bar::BarChartSpec;
use chartsmith::chart::distribution::{HistogramSpec, ValueGroup, ViolinSpec};
use chartsmith::chart::finance::CandlestickSpec;
use chartsmith::chart::flow::{FlowLink, SankeySpec};
use chartsmith::chart::heatmap::HeatmapSpec;
use chartsmith::chart::hierarchy::TreemapSpec;
use chartsmith::chart::line::LineChartSpec;
use chartsmith::chart::pie::PieChartSpec;
use chartsmith::prelude::*;

fn round_trip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let encoded = serde_json::to_string(value).unwrap();
    let decoded: T = serde_json::from_str(&encoded).unwrap();
    assert_eq!(&decoded, value);
}

fn sample_tree() -> TreeNode {
    TreeNode {
        label: "root".into(),
        value: 0.0,
        children: vec![
            TreeNode { label: "a".into(), value: 4.0, children: vec![] },
            TreeNode {
                label: "b".into(),
                value: 0.0,
                children: vec![TreeNode { label: "b1".into(), value: 2.0, children: vec![] }],
            },
        ],
    }
}

#[test]
fn bar_spec_round_trips() {
    round_trip(&BarChartSpec {
        width: 640.0,
        height: 360.0,
        title: Some("Revenue".into()),
        data: vec![
            LabeledValue { label: "Q1".into(), value: 12.5 },
            LabeledValue { label: "Q2".into(), value: 17.0 },
        ],
        color: Some("#336699".into()),
        show_values: false,
        show_axes: true,
        show_grid: true,
    });
}

#[test]
fn pie_spec_round_trips() {
    round_trip(&PieChartSpec {
        width: 600.0,
        height: 600.0,
        title: None,
        data: vec![LabeledValue { label: "x".into(), value: 3.0 }],
        donut_ratio: 0.4,
        show_percentages: true,
        show_legend: false,
    });
}

#[test]
fn line_spec_round_trips_with_mixed_x_kinds() {
    round_trip(&LineChartSpec {
        width: 800.0,
        height: 400.0,
        title: None,
        series: vec![Series {
            name: "s".into(),
            color: None,
            points: vec![
                SeriesPoint { x: XValue::Number(1.5), y: 2.0, size: 0.0 },
                SeriesPoint { x: XValue::Text("2024-01-01T00:00:00Z".into()), y: 3.0, size: 4.0 },
            ],
        }],
        smooth: true,
        tension: 0.65,
        show_points: true,
        show_axes: true,
        show_grid: false,
        show_legend: true,
    });
}

#[test]
fn tree_and_matrix_specs_round_trip() {
    round_trip(&TreemapSpec {
        width: 800.0,
        height: 500.0,
        title: Some("disk".into()),
        root: sample_tree(),
        padding: 1.5,
        show_labels: true,
    });
    round_trip(&HeatmapSpec {
        width: 700.0,
        height: 500.0,
        title: None,
        matrix: Matrix {
            rows: vec!["r1".into()],
            cols: vec!["c1".into(), "c2".into()],
            values: vec![vec![0.5, -1.25]],
        },
        colormap: Some("plasma".into()),
        show_values: true,
    });
}

#[test]
fn distribution_specs_round_trip() {
    round_trip(&HistogramSpec {
        width: 800.0,
        height: 400.0,
        title: None,
        values: vec![1.0, 2.0, 2.0, 3.5],
        bins: 12,
        color: None,
        show_axes: true,
    });
    round_trip(&ViolinSpec {
        width: 800.0,
        height: 400.0,
        title: None,
        groups: vec![ValueGroup { label: "g".into(), values: vec![1.0, 2.0, 3.0] }],
        bandwidth: 0.8,
    });
}

#[test]
fn finance_and_flow_specs_round_trip() {
    round_trip(&CandlestickSpec {
        width: 1000.0,
        height: 600.0,
        title: None,
        bars: vec![OhlcBar {
            timestamp: "2024-03-01T00:00:00Z".into(),
            open: 10.0,
            high: 12.0,
            low: 9.0,
            close: 11.0,
            volume: Some(5000.0),
        }],
        show_volume: true,
    });
    round_trip(&SankeySpec {
        width: 900.0,
        height: 500.0,
        title: Some("energy".into()),
        nodes: vec!["a".into(), "b".into()],
        links: vec![FlowLink { source: "a".into(), target: "b".into(), value: 2.0 }],
        node_width: 18.0,
        node_padding: 12.0,
        iterations: 32,
    });
}

#[test]
fn leaf_children_are_omitted_from_the_wire_form() {
    let tree = sample_tree();
    let encoded = serde_json::to_value(&tree).unwrap();
    // Leaves serialize without a children key at all.
    assert!(encoded["children"][0].get("children").is_none());
    let decoded: TreeNode = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, tree);
}

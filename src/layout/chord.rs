use std::f64::consts::TAU;

use crate::error::{ChartsmithError, Result};

/// The arc occupied by one entity on the circle.
#[derive(Debug, Clone)]
pub struct ChordGroup {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Total weighted relations (outgoing plus incoming).
    pub value: f64,
}

/// A sub-arc within an entity's arc, feeding one ribbon end.
#[derive(Debug, Clone, Copy)]
pub struct SubArc {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// A ribbon connecting an outgoing sub-arc to an incoming sub-arc.
#[derive(Debug, Clone)]
pub struct ChordRibbon {
    pub source: SubArc,
    pub target: SubArc,
    pub value: f64,
}

/// Chord layout over a square relation matrix.
///
/// Each entity's arc is proportional to the sum of its outgoing and
/// incoming weights. Within the arc, outgoing sub-arcs are packed first
/// (by target index), then incoming (by source index), both
/// proportionally. `pad_angle` separates adjacent groups.
pub fn chord_layout(matrix: &[Vec<f64>], pad_angle: f64) -> Result<(Vec<ChordGroup>, Vec<ChordRibbon>)> {
    let n = matrix.len();
    if n == 0 {
        return Err(ChartsmithError::Data("chord matrix is empty".into()));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(ChartsmithError::Data(format!(
                "chord matrix row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            )));
        }
        for &v in row {
            if v < 0.0 {
                return Err(ChartsmithError::Data("chord matrix has negative weights".into()));
            }
        }
    }

    let totals: Vec<f64> = (0..n)
        .map(|i| {
            let out: f64 = matrix[i].iter().sum();
            let inc: f64 = matrix.iter().map(|row| row[i]).sum();
            out + inc
        })
        .collect();
    let grand: f64 = totals.iter().sum();
    if grand <= 0.0 {
        return Err(ChartsmithError::Data("chord matrix has zero total weight".into()));
    }

    let pad_total = pad_angle * n as f64;
    let sweep_per_unit = (TAU - pad_total).max(0.0) / grand;

    let mut groups = Vec::with_capacity(n);
    let mut ribbon_ends: Vec<Vec<Option<SubArc>>> = vec![vec![None; n]; n]; // [i][j] outgoing
    let mut incoming_ends: Vec<Vec<Option<SubArc>>> = vec![vec![None; n]; n]; // [i][j] incoming at i from j

    let mut cursor = 0.0;
    for i in 0..n {
        let start = cursor;
        let sweep = totals[i] * sweep_per_unit;
        groups.push(ChordGroup { index: i, start_angle: start, end_angle: start + sweep, value: totals[i] });

        // Outgoing sub-arcs first, then incoming, packed proportionally.
        let mut sub_cursor = start;
        for j in 0..n {
            let v = matrix[i][j];
            if v > 0.0 {
                let sub_sweep = v * sweep_per_unit;
                ribbon_ends[i][j] = Some(SubArc {
                    index: i,
                    start_angle: sub_cursor,
                    end_angle: sub_cursor + sub_sweep,
                });
                sub_cursor += sub_sweep;
            }
        }
        for j in 0..n {
            let v = matrix[j][i];
            if v > 0.0 {
                let sub_sweep = v * sweep_per_unit;
                incoming_ends[i][j] = Some(SubArc {
                    index: i,
                    start_angle: sub_cursor,
                    end_angle: sub_cursor + sub_sweep,
                });
                sub_cursor += sub_sweep;
            }
        }

        cursor = start + sweep + pad_angle;
    }

    let mut ribbons = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if matrix[i][j] > 0.0 {
                let source = ribbon_ends[i][j].expect("outgoing sub-arc exists");
                let target = incoming_ends[j][i].expect("incoming sub-arc exists");
                ribbons.push(ChordRibbon { source, target, value: matrix[i][j] });
            }
        }
    }

    Ok((groups, ribbons))
}

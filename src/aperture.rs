use crate::error::ComplexityError;
use crate::plan::{JawWindow, LeafBank};

use serde::Serialize;

/// Default MLC leaf width in millimeters.
pub const DEFAULT_LEAF_WIDTH_MM: f64 = 5.0;

/// Aperture geometry metrics for a single control point.
///
/// Produced by [`compute`] as a pure function of the leaf bank and jaw
/// window. The monitor-unit fields (`MU`, `MUrel`, `MUcumrel`) and `AAV`
/// depend on the whole beam and are filled during beam aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApertureResult {
    /// 1-based control point index, filled during beam aggregation.
    pub index: usize,
    #[serde(rename = "minAperture")]
    pub min_aperture: f64,
    #[serde(rename = "maxAperture")]
    pub max_aperture: f64,
    #[serde(rename = "avgAperture")]
    pub avg_aperture: f64,
    /// Maximum possible leaf-pair span in this control point (`posMax`).
    #[serde(rename = "maxApertureNoAlign")]
    pub max_aperture_no_align: f64,
    /// Jaw window width `|y1 - y2|`.
    #[serde(rename = "yDiff")]
    pub y_diff: f64,
    /// Total leaf pairs in the bank.
    #[serde(rename = "totalMLC")]
    pub total_mlc: usize,
    /// Leaf pairs inside the jaw window.
    #[serde(rename = "activeMLC")]
    pub active_mlc: usize,
    #[serde(rename = "lowestActiveMLC")]
    pub lowest_active_mlc: usize,
    #[serde(rename = "highestActiveMLC")]
    pub highest_active_mlc: usize,
    /// Aperture outline length including the travel-axis end caps.
    pub perimeter: f64,
    /// Perimeter before the end-cap and jaw-width additions.
    #[serde(rename = "perimeterNoMLCSize")]
    pub perimeter_no_mlc_size: f64,
    /// Open area, `sum(apertures) * leaf_width`.
    pub area: f64,
    /// Leaf sequence variability in `[0, 1]`.
    #[serde(rename = "LSV")]
    pub lsv: f64,
    /// Sum of `|right - left|` over the entire bank, active or not.
    #[serde(rename = "sumAllApertures")]
    pub sum_all_apertures: f64,
    #[serde(rename = "nAperturesG0")]
    pub n_apertures_g0: usize,
    #[serde(rename = "nAperturesLeq2")]
    pub n_apertures_leq2: usize,
    #[serde(rename = "nAperturesLeq5")]
    pub n_apertures_leq5: usize,
    #[serde(rename = "nAperturesLeq10")]
    pub n_apertures_leq10: usize,
    #[serde(rename = "nAperturesLeq20")]
    pub n_apertures_leq20: usize,
    /// Left edge snapshot over the entire bank, for plan-level normalization.
    #[serde(rename = "leftBank")]
    pub left_bank: Vec<f64>,
    /// Right edge snapshot over the entire bank.
    #[serde(rename = "rightBank")]
    pub right_bank: Vec<f64>,
    /// Monitor units delivered between this control point and the next.
    #[serde(rename = "MU")]
    pub mu: f64,
    #[serde(rename = "MUrel")]
    pub mu_rel: f64,
    #[serde(rename = "MUcumrel")]
    pub mu_cum_rel: f64,
    /// Active aperture / leaf-travel-range ratio, filled during beam
    /// aggregation.
    #[serde(rename = "AAV")]
    pub aav: f64,
}

/// Compute aperture geometry metrics for one control point.
///
/// The active leaf range is derived from the jaw window by converting each
/// jaw edge to a leaf index with `center + trunc(y / leaf_width)`. The
/// quotient is truncated toward zero for negative coordinates as well,
/// matching integer-division semantics; indices are clamped to the physical
/// bank.
///
/// # Errors
///
/// Returns an error if the jaw window leaves no active leaf pairs.
pub fn compute(
    leaf_bank: &LeafBank,
    jaw: JawWindow,
    leaf_width: f64,
) -> Result<ApertureResult, ComplexityError> {
    let pairs = leaf_bank.pair_count();
    let center = (pairs / 2) as i64;

    let min_index = center + (jaw.y1 / leaf_width).trunc() as i64;
    let max_index = center + (jaw.y2 / leaf_width).trunc() as i64;
    let lo = min_index.clamp(0, pairs as i64);
    let hi = max_index.clamp(0, pairs as i64);
    if lo >= hi {
        return Err(ComplexityError::EmptyActiveRange {
            y1: jaw.y1,
            y2: jaw.y2,
        });
    }
    let (lo, hi) = (lo as usize, hi as usize);
    let active = hi - lo;

    // Maximum possible leaf-pair span across the active range, the LSV
    // normalizer.
    let pos_max = (lo..hi)
        .map(|i| leaf_bank.right(i))
        .fold(f64::NEG_INFINITY, f64::max)
        - (lo..hi)
            .map(|i| leaf_bank.left(i))
            .fold(f64::INFINITY, f64::min);

    let apertures: Vec<f64> = (lo..hi).map(|i| leaf_bank.aperture(i)).collect();

    let perimeter_no_mlc_size = open_field_perimeter(leaf_bank, lo, hi, &apertures);
    let y_diff = jaw.width();
    let perimeter = perimeter_no_mlc_size + apertures[active - 1] + 2.0 * y_diff;

    let lsv = leaf_sequence_variability(leaf_bank, lo, hi, pos_max);

    let aperture_sum: f64 = apertures.iter().sum();
    let area = aperture_sum * leaf_width;
    let sum_all_apertures: f64 = (0..pairs).map(|i| leaf_bank.aperture(i)).sum();

    Ok(ApertureResult {
        index: 0,
        min_aperture: apertures.iter().cloned().fold(f64::INFINITY, f64::min),
        max_aperture: apertures.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        avg_aperture: aperture_sum / active as f64,
        max_aperture_no_align: pos_max,
        y_diff,
        total_mlc: pairs,
        active_mlc: active,
        lowest_active_mlc: lo,
        highest_active_mlc: hi - 1,
        perimeter,
        perimeter_no_mlc_size,
        area,
        lsv,
        sum_all_apertures,
        n_apertures_g0: apertures.iter().filter(|&&a| a > 0.0).count(),
        n_apertures_leq2: apertures.iter().filter(|&&a| a <= 2.0).count(),
        n_apertures_leq5: apertures.iter().filter(|&&a| a <= 5.0).count(),
        n_apertures_leq10: apertures.iter().filter(|&&a| a <= 10.0).count(),
        n_apertures_leq20: apertures.iter().filter(|&&a| a <= 20.0).count(),
        left_bank: leaf_bank.left_half().to_vec(),
        right_bank: leaf_bank.right_half().to_vec(),
        mu: 0.0,
        mu_rel: 0.0,
        mu_cum_rel: 0.0,
        aav: 0.0,
    })
}

/// Perimeter contribution of the leaf-defined field edge, before the
/// end-cap and jaw-width closure terms.
///
/// Consecutive apertures are classified four ways (disjoint, previous wraps
/// current, current wraps previous, partial overlap); each class contributes
/// the exposed edge length of the step between the two apertures.
fn open_field_perimeter(bank: &LeafBank, lo: usize, hi: usize, apertures: &[f64]) -> f64 {
    let mut perimeter = apertures[0];
    for i in (lo + 1)..hi {
        let (l_prev, r_prev) = (bank.left(i - 1), bank.right(i - 1));
        let (l, r) = (bank.left(i), bank.right(i));
        let a_prev = apertures[i - 1 - lo];
        let a = apertures[i - lo];

        perimeter += if r <= l_prev || l >= r_prev {
            // Disjoint: both apertures fully exposed.
            a + a_prev
        } else if r <= r_prev && l >= l_prev {
            // Previous wraps current.
            a_prev - a
        } else if r > r_prev && l < l_prev {
            // Current wraps previous.
            a - a_prev
        } else {
            // Partial overlap: the two edge steps.
            (l - l_prev).abs() + (r - r_prev).abs()
        };
    }
    perimeter
}

/// Leaf sequence variability over the active range.
///
/// Unit smoothness: constant leaf positions yield 1. A degenerate range
/// where all active leaves coincide (`pos_max == 0`) yields 0; a single
/// active pair has no leaf-to-leaf variation and yields 1.
fn leaf_sequence_variability(bank: &LeafBank, lo: usize, hi: usize, pos_max: f64) -> f64 {
    if pos_max <= 0.0 {
        return 0.0;
    }
    let steps = hi - lo - 1;
    if steps == 0 {
        return 1.0;
    }
    let mut left_acc = 0.0;
    let mut right_acc = 0.0;
    for i in lo..hi - 1 {
        left_acc += pos_max - (bank.left(i) - bank.left(i + 1)).abs();
        right_acc += pos_max - (bank.right(i) - bank.right(i + 1)).abs();
    }
    let norm = steps as f64 * pos_max;
    (left_acc / norm) * (right_acc / norm)
}

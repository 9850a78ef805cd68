use crate::aperture::{self, ApertureResult};
use crate::error::ComplexityError;
use crate::plan::Beam;

use log::debug;
use ndarray::{Array2, Axis};
use rayon::prelude::*;
use serde::Serialize;

/// Control points with an average aperture or jaw width at or below this
/// threshold count toward the small-field indicators.
const SMALL_FIELD_THRESHOLD_MM: f64 = 10.0;

/// Modulation-complexity scores aggregated over one beam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamMetrics {
    #[serde(rename = "MUbeam")]
    pub mu_beam: f64,
    #[serde(rename = "M")]
    pub m: f64,
    #[serde(rename = "MCS")]
    pub mcs: f64,
    #[serde(rename = "MCSV")]
    pub mcsv: f64,
    #[serde(rename = "MFC")]
    pub mfc: f64,
    #[serde(rename = "BI")]
    pub bi: f64,
    #[serde(rename = "SAS2")]
    pub sas2: f64,
    #[serde(rename = "SAS5")]
    pub sas5: f64,
    #[serde(rename = "SAS10")]
    pub sas10: f64,
    #[serde(rename = "SAS20")]
    pub sas20: f64,
    #[serde(rename = "avgApertureLessThan1cm")]
    pub avg_aperture_less_than_1cm: usize,
    #[serde(rename = "yDiffLessThan1cm")]
    pub y_diff_less_than_1cm: usize,
    /// Per-control-point results in delivery order.
    pub sequence: Vec<ApertureResult>,
}

/// MU-weighted aggregate over all beams of a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanMetrics {
    #[serde(rename = "MUplan")]
    pub mu_plan: f64,
    #[serde(rename = "Mplan")]
    pub m_plan: f64,
    #[serde(rename = "MCSplan")]
    pub mcs_plan: f64,
    #[serde(rename = "MCSVplan")]
    pub mcsv_plan: f64,
    #[serde(rename = "MFCplan")]
    pub mfc_plan: f64,
    #[serde(rename = "PI")]
    pub pi: f64,
    #[serde(rename = "nCP")]
    pub n_cp: usize,
    #[serde(rename = "avgApertureLessThan1cm")]
    pub avg_aperture_less_than_1cm: usize,
    #[serde(rename = "yDiffLessThan1cm")]
    pub y_diff_less_than_1cm: usize,
    /// Per-beam scores in plan order.
    pub beams: Vec<BeamMetrics>,
}

/// Aggregate one beam's control points into beam-level scores.
///
/// Control points are processed strictly in sequence order: each point's MU
/// depends on the next point's cumulative weight, and MCSV couples adjacent
/// pairs.
///
/// # Errors
///
/// Fails if the beam has fewer than 2 control points, if any control
/// point's geometry is invalid (the failure carries the control-point
/// index), or if the per-beam leaf-travel normalization factor is zero.
pub fn aggregate_beam(beam: &Beam, leaf_width: f64) -> Result<BeamMetrics, ComplexityError> {
    let n = beam.control_points.len();
    if n < 2 {
        return Err(ComplexityError::EmptyBeam { count: n });
    }

    let mut sequence = Vec::with_capacity(n);
    for (k, cp) in beam.control_points.iter().enumerate() {
        let mut result = aperture::compute(&cp.leaf_bank, cp.jaw, leaf_width)
            .map_err(|e| e.at_control_point(cp.index))?;
        result.index = cp.index;

        // The terminal control point carries no dose.
        result.mu = if k + 1 < n {
            (beam.control_points[k + 1].cumulative_weight - cp.cumulative_weight)
                * beam.monitor_units
                / beam.final_cumulative_weight
        } else {
            0.0
        };
        result.mu_rel = result.mu / beam.monitor_units;
        result.mu_cum_rel = cp.cumulative_weight + result.mu_rel;
        sequence.push(result);
    }

    apply_aperture_normalization(&mut sequence)?;

    let mu_beam = beam.monitor_units;
    let m = sequence
        .iter()
        .map(|cp| cp.mu * cp.perimeter / cp.area)
        .sum::<f64>()
        / mu_beam;
    let mcs = sequence
        .iter()
        .map(|cp| cp.aav * cp.lsv * cp.mu_rel)
        .sum::<f64>();
    let mcsv = sequence
        .windows(2)
        .map(|w| (w[0].aav + w[1].aav) / 2.0 * ((w[0].lsv + w[1].lsv) / 2.0) * w[0].mu_rel)
        .sum::<f64>();
    let mfc = sequence.iter().map(|cp| cp.area * cp.mu_rel).sum::<f64>();
    let bi = sequence
        .iter()
        .map(|cp| cp.mu_rel * cp.perimeter.powi(2) / (4.0 * std::f64::consts::PI * cp.area))
        .sum::<f64>();

    let mut sas = [0.0; 4];
    for cp in &sequence {
        if cp.n_apertures_g0 == 0 {
            // Skip convention: a fully closed control point contributes no
            // small-aperture term.
            debug!(
                "control point {} has no open apertures, skipping SAS term",
                cp.index
            );
            continue;
        }
        let g0 = cp.n_apertures_g0 as f64;
        sas[0] += cp.n_apertures_leq2 as f64 / g0 * cp.mu_rel;
        sas[1] += cp.n_apertures_leq5 as f64 / g0 * cp.mu_rel;
        sas[2] += cp.n_apertures_leq10 as f64 / g0 * cp.mu_rel;
        sas[3] += cp.n_apertures_leq20 as f64 / g0 * cp.mu_rel;
    }

    let avg_aperture_less_than_1cm = sequence
        .iter()
        .filter(|cp| cp.avg_aperture <= SMALL_FIELD_THRESHOLD_MM)
        .count();
    let y_diff_less_than_1cm = sequence
        .iter()
        .filter(|cp| cp.y_diff <= SMALL_FIELD_THRESHOLD_MM)
        .count();

    debug!(
        "aggregated beam: {} control points, MCS {:.4}, MCSV {:.4}",
        n, mcs, mcsv
    );

    Ok(BeamMetrics {
        mu_beam,
        m,
        mcs,
        mcsv,
        mfc,
        bi,
        sas2: sas[0],
        sas5: sas[1],
        sas10: sas[2],
        sas20: sas[3],
        avg_aperture_less_than_1cm,
        y_diff_less_than_1cm,
        sequence,
    })
}

/// Fill each control point's `AAV` from the beam-wide leaf-travel extrema.
///
/// The normalization factor is the summed per-pair travel range over the
/// whole beam: for each leaf pair, the extreme right position minus the
/// extreme left position across all control points.
fn apply_aperture_normalization(
    sequence: &mut [ApertureResult],
) -> Result<(), ComplexityError> {
    let n = sequence.len();
    let pairs = sequence[0].left_bank.len();
    for cp in sequence.iter() {
        if cp.left_bank.len() != pairs {
            return Err(
                ComplexityError::MalformedControlPoint {
                    field: "a leaf bank consistent with the rest of the beam",
                }
                .at_control_point(cp.index),
            );
        }
    }

    let lefts = Array2::from_shape_fn((n, pairs), |(k, i)| sequence[k].left_bank[i]);
    let rights = Array2::from_shape_fn((n, pairs), |(k, i)| sequence[k].right_bank[i]);
    let max_right = rights.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v));
    let min_left = lefts.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v));
    let norm_factor = (&max_right - &min_left).mapv(f64::abs).sum();

    if norm_factor == 0.0 {
        return Err(ComplexityError::ZeroTravelRange);
    }
    for cp in sequence.iter_mut() {
        cp.aav = cp.sum_all_apertures / norm_factor;
    }
    Ok(())
}

/// Aggregate a plan's beams into MU-weighted plan-level scores.
///
/// Beams are independent and are computed in parallel; results are joined
/// in plan order before the weighted reduction. Any beam failure aborts the
/// whole plan and carries the 1-based beam index.
pub fn aggregate_plan(beams: &[Beam], leaf_width: f64) -> Result<PlanMetrics, ComplexityError> {
    if beams.is_empty() {
        return Err(ComplexityError::EmptyPlan);
    }

    let beam_metrics: Vec<BeamMetrics> = beams
        .par_iter()
        .enumerate()
        .map(|(b, beam)| aggregate_beam(beam, leaf_width).map_err(|e| e.in_beam(b + 1)))
        .collect::<Result<Vec<_>, _>>()?;

    let mu_plan: f64 = beam_metrics.iter().map(|b| b.mu_beam).sum();
    let weighted = |score: fn(&BeamMetrics) -> f64| -> f64 {
        beam_metrics
            .iter()
            .map(|b| b.mu_beam * score(b))
            .sum::<f64>()
            / mu_plan
    };

    Ok(PlanMetrics {
        mu_plan,
        m_plan: weighted(|b| b.m),
        mcs_plan: weighted(|b| b.mcs),
        mcsv_plan: weighted(|b| b.mcsv),
        mfc_plan: weighted(|b| b.mfc),
        pi: weighted(|b| b.bi),
        n_cp: beam_metrics.iter().map(|b| b.sequence.len()).sum(),
        avg_aperture_less_than_1cm: beam_metrics
            .iter()
            .map(|b| b.avg_aperture_less_than_1cm)
            .sum(),
        y_diff_less_than_1cm: beam_metrics.iter().map(|b| b.y_diff_less_than_1cm).sum(),
        beams: beam_metrics,
    })
}

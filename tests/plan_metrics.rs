//! Canonical hand-computed scenario: one beam, three control points with
//! constant symmetric leaves, plus the record-shape contract for report and
//! persistence consumers.

use rtplan_complexity::{
    Beam, ControlPoint, JawWindow, LeafBank, aggregate_beam, aggregate_plan,
};

const EPS: f64 = 1e-9;

/// Beam with `L = 4` pairs at ±10 mm, jaws (-5, 5), cumulative weights
/// [0, 0.5, 1.0], 100 MU.
fn golden_beam() -> Beam {
    let jaw = JawWindow::new(-5.0, 5.0);
    let bank = || {
        LeafBank::new(vec![
            -10.0, -10.0, -10.0, -10.0, 10.0, 10.0, 10.0, 10.0,
        ])
        .unwrap()
    };
    Beam::new(
        100.0,
        1.0,
        vec![
            ControlPoint::new(1, 0.0, bank(), jaw),
            ControlPoint::new(2, 0.5, bank(), jaw),
            ControlPoint::new(3, 1.0, bank(), jaw),
        ],
    )
    .unwrap()
}

#[test]
fn golden_beam_scores() {
    let metrics = aggregate_beam(&golden_beam(), 5.0).unwrap();

    let mus: Vec<f64> = metrics.sequence.iter().map(|cp| cp.mu).collect();
    assert_eq!(mus, vec![50.0, 50.0, 0.0]);
    let mu_rels: Vec<f64> = metrics.sequence.iter().map(|cp| cp.mu_rel).collect();
    assert_eq!(mu_rels, vec![0.5, 0.5, 0.0]);

    for cp in &metrics.sequence {
        assert!((cp.aav - 1.0).abs() < EPS);
        assert!((cp.lsv - 1.0).abs() < EPS);
        assert!((cp.perimeter - 60.0).abs() < EPS);
        assert!((cp.area - 200.0).abs() < EPS);
    }

    // M = (1/100) * 2 * (50 * 60 / 200).
    assert!((metrics.m - 0.3).abs() < EPS);
    assert!((metrics.mcs - 1.0).abs() < EPS);
    assert!((metrics.mcsv - 1.0).abs() < EPS);
    assert!((metrics.mfc - 200.0).abs() < EPS);
    // BI = 1 * 60^2 / (4 * pi * 200) = 9 / (2 * pi).
    assert!((metrics.bi - 4.5 / std::f64::consts::PI).abs() < EPS);
    assert!((metrics.sas20 - 1.0).abs() < EPS);
    assert_eq!(metrics.sas2, 0.0);
    assert_eq!(metrics.sas5, 0.0);
    assert_eq!(metrics.sas10, 0.0);
    // 20 mm apertures are not small fields; the 10 mm jaw window is.
    assert_eq!(metrics.avg_aperture_less_than_1cm, 0);
    assert_eq!(metrics.y_diff_less_than_1cm, 3);
}

#[test]
fn golden_plan_mirrors_its_single_beam() {
    let plan = aggregate_plan(&[golden_beam()], 5.0).unwrap();

    assert!((plan.mu_plan - 100.0).abs() < EPS);
    assert!((plan.m_plan - 0.3).abs() < EPS);
    assert!((plan.mcs_plan - 1.0).abs() < EPS);
    assert!((plan.mcsv_plan - 1.0).abs() < EPS);
    assert!((plan.mfc_plan - 200.0).abs() < EPS);
    assert!((plan.pi - 4.5 / std::f64::consts::PI).abs() < EPS);
    assert_eq!(plan.n_cp, 3);
    assert_eq!(plan.avg_aperture_less_than_1cm, 0);
    assert_eq!(plan.y_diff_less_than_1cm, 3);
    assert_eq!(plan.beams.len(), 1);
}

#[test]
fn mu_cum_rel_tracks_cumulative_weight() {
    let metrics = aggregate_beam(&golden_beam(), 5.0).unwrap();
    let cum: Vec<f64> = metrics.sequence.iter().map(|cp| cp.mu_cum_rel).collect();
    assert!((cum[0] - 0.5).abs() < EPS);
    assert!((cum[1] - 1.0).abs() < EPS);
    assert!((cum[2] - 1.0).abs() < EPS);
}

#[test]
fn records_serialize_with_canonical_field_names() {
    let plan = aggregate_plan(&[golden_beam()], 5.0).unwrap();
    let value = serde_json::to_value(&plan).unwrap();

    for key in [
        "MUplan",
        "Mplan",
        "MCSplan",
        "MCSVplan",
        "MFCplan",
        "PI",
        "nCP",
        "avgApertureLessThan1cm",
        "yDiffLessThan1cm",
        "beams",
    ] {
        assert!(value.get(key).is_some(), "missing plan field {key}");
    }

    let beam = &value["beams"][0];
    for key in [
        "MUbeam", "M", "MCS", "MCSV", "MFC", "BI", "SAS2", "SAS5", "SAS10", "SAS20", "sequence",
    ] {
        assert!(beam.get(key).is_some(), "missing beam field {key}");
    }

    let cp = &beam["sequence"][0];
    for key in [
        "index",
        "minAperture",
        "maxAperture",
        "avgAperture",
        "maxApertureNoAlign",
        "yDiff",
        "totalMLC",
        "activeMLC",
        "lowestActiveMLC",
        "highestActiveMLC",
        "perimeter",
        "perimeterNoMLCSize",
        "area",
        "LSV",
        "sumAllApertures",
        "nAperturesG0",
        "nAperturesLeq2",
        "nAperturesLeq5",
        "nAperturesLeq10",
        "nAperturesLeq20",
        "MU",
        "MUrel",
        "MUcumrel",
        "AAV",
    ] {
        assert!(cp.get(key).is_some(), "missing control point field {key}");
    }
    assert_eq!(cp["index"], 1);
    assert_eq!(cp["totalMLC"], 4);
    assert_eq!(cp["activeMLC"], 2);
}

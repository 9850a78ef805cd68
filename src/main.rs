use rtplan_complexity::{
    Beam, ControlPoint, DEFAULT_LEAF_WIDTH_MM, JawWindow, LeafBank, aggregate_plan,
};

/// Small demonstration: score a synthetic two-beam plan and print the plan
/// record as JSON.
fn main() {
    let jaw = JawWindow::new(-20.0, 20.0);
    let open = |span: f64| {
        LeafBank::new(
            (0..16)
                .map(|_| -span)
                .chain((0..16).map(|_| span))
                .collect(),
        )
        .expect("bank length is even")
    };

    let sweep = Beam::new(
        120.0,
        1.0,
        vec![
            ControlPoint::new(1, 0.0, open(30.0), jaw),
            ControlPoint::new(2, 0.4, open(20.0), jaw),
            ControlPoint::new(3, 0.8, open(10.0), jaw),
            ControlPoint::new(4, 1.0, open(5.0), jaw),
        ],
    )
    .expect("beam bookkeeping should be positive");

    let static_field = Beam::new(
        80.0,
        1.0,
        vec![
            ControlPoint::new(1, 0.0, open(25.0), jaw),
            ControlPoint::new(2, 1.0, open(25.0), jaw),
        ],
    )
    .expect("beam bookkeeping should be positive");

    let plan = aggregate_plan(&[sweep, static_field], DEFAULT_LEAF_WIDTH_MM)
        .expect("synthetic plan should aggregate");

    println!(
        "{}",
        serde_json::to_string_pretty(&plan).expect("plan record should serialize")
    );
}

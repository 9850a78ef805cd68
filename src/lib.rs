//! # Treatment-plan complexity metrics
//!
//! This crate computes modulation-complexity scores for radiotherapy
//! treatment plans from the geometric description of a beam's multi-leaf
//! collimator (MLC) and jaw positions over its control-point sequence.
//!
//! It is deliberately free of any DICOM or imaging dependency: the input is
//! the in-memory data model of [`plan`] (flat leaf-position arrays, jaw
//! windows, monitor-unit bookkeeping), typically filled by a plan-extraction
//! collaborator. Per control point, [`aperture::compute`] derives the
//! aperture geometry (perimeter, area, leaf sequence variability,
//! small-aperture counts); [`metrics::aggregate_beam`] folds a beam's
//! control points into beam-level scores (M, MCS, MCSV, MFC, BI, SAS), and
//! [`metrics::aggregate_plan`] combines beams into an MU-weighted plan
//! summary. Beams are independent and are computed in parallel using rayon.
//!
//! Input conventions:
//!  - Leaf positions are signed millimeters from isocenter; a bank of `2·L`
//!    values holds the left edges at `[0, L)` and the right edges at
//!    `[L, 2L)`.
//!  - Control points are ordered by increasing cumulative meterset weight;
//!    the terminal control point delivers no dose.
//!  - The engine trusts its geometric inputs; it does not validate clinical
//!    plausibility.
//!
//! The computation is deterministic and never degrades gracefully: invalid
//! geometry aborts the enclosing beam, a failing beam aborts the plan, and
//! the error carries the beam and control-point indices of the offending
//! input.
//!
//! # Examples
//!
//! ## Scoring a single-beam plan
//!
//! ```
//! # use rtplan_complexity::{
//! #     aggregate_plan, Beam, ControlPoint, JawWindow, LeafBank, DEFAULT_LEAF_WIDTH_MM,
//! # };
//! let jaw = JawWindow::new(-5.0, 5.0);
//! let bank = || LeafBank::new(vec![-10.0, -10.0, 10.0, 10.0]).unwrap();
//! let beam = Beam::new(
//!     100.0,
//!     1.0,
//!     vec![
//!         ControlPoint::new(1, 0.0, bank(), jaw),
//!         ControlPoint::new(2, 0.5, bank(), jaw),
//!         ControlPoint::new(3, 1.0, bank(), jaw),
//!     ],
//! )
//! .expect("beam bookkeeping should be positive");
//!
//! let plan = aggregate_plan(&[beam], DEFAULT_LEAF_WIDTH_MM)
//!     .expect("plan should aggregate");
//! assert_eq!(plan.n_cp, 3);
//! assert!((plan.mcs_plan - 1.0).abs() < 1e-9);
//! ```

pub mod aperture;
pub mod error;
pub mod metrics;
pub mod plan;

pub use aperture::{ApertureResult, DEFAULT_LEAF_WIDTH_MM, compute};
pub use error::ComplexityError;
pub use metrics::{BeamMetrics, PlanMetrics, aggregate_beam, aggregate_plan};
pub use plan::{Beam, ControlPoint, JawWindow, LeafBank};

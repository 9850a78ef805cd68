use thiserror::Error;

/// Errors produced while computing aperture and complexity metrics.
///
/// The engine never degrades gracefully: a geometry failure aborts the
/// enclosing beam, a beam failure aborts the plan. The `Beam` and
/// `ControlPoint` variants wrap the underlying failure with the index
/// needed to locate the malformed input.
#[derive(Debug, Error, PartialEq)]
pub enum ComplexityError {
    #[error("leaf bank length must be even and non-zero, got {len}")]
    MalformedLeafBank { len: usize },

    #[error("no active leaf pairs inside jaw window ({y1}, {y2})")]
    EmptyActiveRange { y1: f64, y2: f64 },

    #[error("leaf travel range is zero, aperture normalization is undefined")]
    ZeroTravelRange,

    #[error("beam has {count} control points, at least 2 are required")]
    EmptyBeam { count: usize },

    #[error("control point is missing {field}")]
    MalformedControlPoint { field: &'static str },

    #[error("monitor units must be positive, got {value}")]
    NonPositiveMonitorUnits { value: f64 },

    #[error("final cumulative meterset weight must be positive, got {value}")]
    NonPositiveFinalWeight { value: f64 },

    #[error("plan contains no beams")]
    EmptyPlan,

    #[error("beam {beam}: {source}")]
    Beam {
        beam: usize,
        source: Box<ComplexityError>,
    },

    #[error("control point {control_point}: {source}")]
    ControlPoint {
        control_point: usize,
        source: Box<ComplexityError>,
    },
}

impl ComplexityError {
    /// Wrap an error with the 1-based index of the beam it occurred in.
    pub(crate) fn in_beam(self, beam: usize) -> Self {
        ComplexityError::Beam {
            beam,
            source: Box::new(self),
        }
    }

    /// Wrap an error with the index of the control point it occurred at.
    pub(crate) fn at_control_point(self, control_point: usize) -> Self {
        ComplexityError::ControlPoint {
            control_point,
            source: Box::new(self),
        }
    }
}

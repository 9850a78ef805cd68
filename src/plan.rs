use crate::error::ComplexityError;

use serde::Serialize;

/// Paired MLC leaf edge positions for one control point.
///
/// The bank holds `2 * L` signed positions in millimeters from isocenter:
/// indices `[0, L)` are the left edge of each leaf pair, `[L, 2L)` the right
/// edge of the corresponding pair (pair `i` has its left edge at `i` and its
/// right edge at `L + i`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafBank(Vec<f64>);

impl LeafBank {
    /// Build a leaf bank from a flat position array.
    ///
    /// # Errors
    ///
    /// Returns an error if the array length is odd or zero.
    pub fn new(positions: Vec<f64>) -> Result<Self, ComplexityError> {
        if positions.is_empty() || positions.len() % 2 != 0 {
            return Err(ComplexityError::MalformedLeafBank {
                len: positions.len(),
            });
        }
        Ok(Self(positions))
    }

    /// Number of leaf pairs `L`.
    pub fn pair_count(&self) -> usize {
        self.0.len() / 2
    }

    /// Left edge position of pair `i`.
    #[inline]
    pub fn left(&self, i: usize) -> f64 {
        self.0[i]
    }

    /// Right edge position of pair `i`.
    #[inline]
    pub fn right(&self, i: usize) -> f64 {
        self.0[self.pair_count() + i]
    }

    /// All left edge positions, one per pair.
    pub fn left_half(&self) -> &[f64] {
        &self.0[..self.pair_count()]
    }

    /// All right edge positions, one per pair.
    pub fn right_half(&self) -> &[f64] {
        &self.0[self.pair_count()..]
    }

    /// Open gap of pair `i`.
    #[inline]
    pub fn aperture(&self, i: usize) -> f64 {
        (self.left(i) - self.right(i)).abs()
    }
}

/// Active window along the leaf-travel axis, in millimeters.
///
/// `y1` and `y2` need not be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JawWindow {
    pub y1: f64,
    pub y2: f64,
}

impl JawWindow {
    pub fn new(y1: f64, y2: f64) -> Self {
        Self { y1, y2 }
    }

    /// Window width `|y1 - y2|`.
    pub fn width(&self) -> f64 {
        (self.y1 - self.y2).abs()
    }
}

/// One discrete beam configuration along the delivery sequence.
///
/// Immutable after construction; the extraction collaborator creates one per
/// plan load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPoint {
    /// 1-based position in the beam's delivery sequence.
    pub index: usize,
    /// Cumulative meterset weight in `[0, 1]`.
    pub cumulative_weight: f64,
    pub leaf_bank: LeafBank,
    pub jaw: JawWindow,
}

impl ControlPoint {
    pub fn new(
        index: usize,
        cumulative_weight: f64,
        leaf_bank: LeafBank,
        jaw: JawWindow,
    ) -> Self {
        Self {
            index,
            cumulative_weight,
            leaf_bank,
            jaw,
        }
    }
}

/// A radiation beam: monitor-unit bookkeeping plus its ordered control
/// points (ordered by increasing cumulative meterset weight).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beam {
    pub monitor_units: f64,
    /// Normalizing denominator for MU fractions. The last control point's
    /// cumulative weight need not equal it exactly.
    pub final_cumulative_weight: f64,
    pub control_points: Vec<ControlPoint>,
}

impl Beam {
    /// Build a beam from extracted plan data.
    ///
    /// # Errors
    ///
    /// Returns an error if `monitor_units` or `final_cumulative_weight` is
    /// not positive.
    pub fn new(
        monitor_units: f64,
        final_cumulative_weight: f64,
        control_points: Vec<ControlPoint>,
    ) -> Result<Self, ComplexityError> {
        if !(monitor_units > 0.0) {
            return Err(ComplexityError::NonPositiveMonitorUnits {
                value: monitor_units,
            });
        }
        if !(final_cumulative_weight > 0.0) {
            return Err(ComplexityError::NonPositiveFinalWeight {
                value: final_cumulative_weight,
            });
        }
        Ok(Self {
            monitor_units,
            final_cumulative_weight,
            control_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_bank_rejects_odd_and_empty_arrays() {
        assert_eq!(
            LeafBank::new(vec![]),
            Err(ComplexityError::MalformedLeafBank { len: 0 })
        );
        assert_eq!(
            LeafBank::new(vec![1.0, 2.0, 3.0]),
            Err(ComplexityError::MalformedLeafBank { len: 3 })
        );
    }

    #[test]
    fn leaf_bank_indexing_convention() {
        let bank = LeafBank::new(vec![-1.0, -2.0, 3.0, 4.0]).unwrap();
        assert_eq!(bank.pair_count(), 2);
        assert_eq!(bank.left(0), -1.0);
        assert_eq!(bank.right(0), 3.0);
        assert_eq!(bank.left(1), -2.0);
        assert_eq!(bank.right(1), 4.0);
        assert_eq!(bank.aperture(1), 6.0);
        assert_eq!(bank.left_half(), &[-1.0, -2.0]);
        assert_eq!(bank.right_half(), &[3.0, 4.0]);
    }

    #[test]
    fn jaw_window_width_is_unordered() {
        assert_eq!(JawWindow::new(5.0, -5.0).width(), 10.0);
        assert_eq!(JawWindow::new(-5.0, 5.0).width(), 10.0);
    }

    #[test]
    fn beam_rejects_non_positive_bookkeeping() {
        assert_eq!(
            Beam::new(0.0, 1.0, vec![]),
            Err(ComplexityError::NonPositiveMonitorUnits { value: 0.0 })
        );
        assert_eq!(
            Beam::new(100.0, 0.0, vec![]),
            Err(ComplexityError::NonPositiveFinalWeight { value: 0.0 })
        );
    }
}

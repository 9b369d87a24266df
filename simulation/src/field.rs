//! Constant electromagnetic field tensor.

use crate::vector::{dot, FourVector};

/// A 4x4 real antisymmetric matrix F^μν for a homogeneous E/B field.
///
/// Row/column 0 carries the electric components, rows 1..3 the magnetic
/// component along z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTensor {
    pub rows: [FourVector; 4],
}

impl FieldTensor {
    /// Build the tensor for a constant field with E = (EX, 0, EZ) and B = (0, 0, BZ)
    pub fn constant_eb(ex: f64, ez: f64, bz: f64) -> Self {
        Self {
            rows: [
                [0.0, ex, 0.0, ez],
                [-ex, 0.0, -bz, 0.0],
                [0.0, bz, 0.0, 0.0],
                [-ez, 0.0, 0.0, 0.0],
            ],
        }
    }

    /// The field-free tensor
    #[cfg(test)]
    pub(crate) fn vacuum() -> Self {
        Self::constant_eb(0.0, 0.0, 0.0)
    }

    /// Dot product of row `i` with `v`
    pub fn row_dot(&self, i: usize, v: &FourVector) -> f64 {
        dot(&self.rows[i], v)
    }

    /// Check F[i][j] == -F[j][i] for every pair
    pub fn is_antisymmetric(&self) -> bool {
        (0..4).all(|i| (0..4).all(|j| self.rows[i][j] == -self.rows[j][i]))
    }
}

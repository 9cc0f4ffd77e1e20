use crate::base::ParamHardening;
use serde::{Deserialize, Serialize};

/// Implements the hardening-location corrector
///
/// The yield plateau shortens as the plastic strain accumulated on the plateau grows:
///
/// ```text
/// h = clamp(1 - a1 εp, limit, 1)
/// ```
///
/// The factor never increases (ratchet).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HardeningLocation {
    /// Holds the current factor h ∈ [limit, 1]
    pub factor: f64,

    /// Holds the rate a1
    pub a1: f64,

    /// Holds the floor of the factor
    pub limit: f64,
}

impl HardeningLocation {
    /// Allocates a new instance with h = 1
    pub fn new(param: &ParamHardening) -> Self {
        HardeningLocation {
            factor: 1.0,
            a1: param.a1,
            limit: param.limit,
        }
    }

    /// Updates the factor given a plastic strain estimate
    ///
    /// Returns true if the factor decreased; then the backbone constants must be recomputed.
    /// Non-positive estimates are ignored.
    pub fn update(&mut self, plastic_strain: f64) -> bool {
        if !(plastic_strain > 0.0) {
            return false;
        }
        let candidate = f64::min(f64::max(1.0 - self.a1 * plastic_strain, self.limit), 1.0);
        if candidate < self.factor {
            self.factor = candidate;
            return true;
        }
        false
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::HardeningLocation;
    use crate::base::ParamHardening;
    use approx::assert_abs_diff_eq;

    #[test]
    fn update_works() {
        let mut hl = HardeningLocation::new(&ParamHardening::default());
        assert_eq!(hl.factor, 1.0);
        assert!(!hl.update(0.0));
        assert!(!hl.update(-0.01));
        assert!(hl.update(0.1));
        assert_abs_diff_eq!(hl.factor, 1.0 - 0.43, epsilon = 1e-15);
    }

    #[test]
    fn update_is_idempotent_and_ratchets() {
        let mut hl = HardeningLocation::new(&ParamHardening::default());
        hl.update(0.05);
        let h = hl.factor;
        assert!(!hl.update(0.05));
        assert_eq!(hl.factor, h);
        // smaller plastic strains do not recover the plateau
        assert!(!hl.update(0.01));
        assert_eq!(hl.factor, h);
    }

    #[test]
    fn factor_is_clamped_to_the_floor() {
        let mut hl = HardeningLocation::new(&ParamHardening { a1: 4.3, limit: 0.01 });
        assert!(hl.update(10.0));
        assert_eq!(hl.factor, 0.01);
        assert!(!hl.update(100.0));
        assert_eq!(hl.factor, 0.01);
    }
}

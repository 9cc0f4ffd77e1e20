//! Conversions between engineering and natural (logarithmic) measures
//!
//! The curve equations are written in terms of the natural strain and the
//! corresponding Biot-type stress:
//!
//! ```text
//! εₙ = ln(1 + ε)
//! σₙ = σ (1 + ε)
//! ```

/// Returns the natural strain corresponding to an engineering strain
#[inline]
pub fn natural_strain(engineering: f64) -> f64 {
    f64::ln(1.0 + engineering)
}

/// Returns the engineering strain corresponding to a natural strain
#[inline]
pub fn engineering_strain(natural: f64) -> f64 {
    f64::exp(natural) - 1.0
}

/// Returns the natural stress given the engineering stress and strain
#[inline]
pub fn natural_stress(stress: f64, engineering: f64) -> f64 {
    stress * (1.0 + engineering)
}

/// Returns the engineering stress given the natural stress and strain
#[inline]
pub fn engineering_stress(stress: f64, natural: f64) -> f64 {
    stress * f64::exp(-natural)
}

/// Returns the engineering tangent modulus given the natural tangent, stress and strain
///
/// ```text
/// dσ/dε = (dσₙ/dεₙ - σₙ) exp(-2 εₙ)
/// ```
#[inline]
pub fn engineering_tangent(tangent: f64, stress: f64, natural: f64) -> f64 {
    (tangent - stress) * f64::exp(-2.0 * natural)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn strain_conversions_are_inverse() {
        for eps in [-0.5, -0.01, 0.0, 0.002, 0.12] {
            assert_abs_diff_eq!(engineering_strain(natural_strain(eps)), eps, epsilon = 1e-15);
        }
    }

    #[test]
    fn stress_conversions_are_inverse() {
        let eps = 0.05;
        let sig = 500.0;
        let sig_n = natural_stress(sig, eps);
        assert_abs_diff_eq!(sig_n, 525.0, epsilon = 1e-12);
        assert_abs_diff_eq!(engineering_stress(sig_n, natural_strain(eps)), sig, epsilon = 1e-12);
    }

    #[test]
    fn engineering_tangent_matches_finite_difference() {
        // σₙ(εₙ) = a εₙ²  ⇒  σ(ε) = a ln(1+ε)² / (1+ε)
        let a = 3000.0;
        let sig = |eps: f64| a * f64::powi(f64::ln(1.0 + eps), 2) / (1.0 + eps);
        let eps = 0.03;
        let h = 1e-6;
        let num = (sig(eps + h) - sig(eps - h)) / (2.0 * h);
        let en = natural_strain(eps);
        let ana = engineering_tangent(2.0 * a * en, a * en * en, en);
        assert_abs_diff_eq!(ana, num, epsilon = 1e-6);
    }
}

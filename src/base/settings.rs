use super::{RebarError, RebarResult};
use serde::{Deserialize, Serialize};

/// Holds the numerical settings of the reinforcing steel model
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Maximum number of nested pairs of transition curves kept in memory
    pub max_nesting: usize,

    /// Width of the bisection interval that starts the Newton refinement of the curve fit
    pub fit_bisection_tol: f64,

    /// Tolerance on the residual of the curve fit
    pub fit_tolerance: f64,

    /// Maximum number of Newton iterations of the curve fit
    pub fit_max_iterations: usize,

    /// Most compressive engineering strain accepted by set_trial_strain
    pub min_engineering_strain: f64,

    /// Residual buckled capacity as a fraction of the yield stress
    pub buckling_floor: f64,

    /// Natural strain step for the numerical derivative of the buckled stress
    pub buckling_step: f64,

    /// Tangent reported by a failed bar as a fraction of Young's modulus
    pub failed_tangent_ratio: f64,
}

impl Settings {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Settings {
            max_nesting: 10,
            fit_bisection_tol: 1e-4,
            fit_tolerance: 1e-13,
            fit_max_iterations: 50,
            min_engineering_strain: -0.95,
            buckling_floor: 0.2,
            buckling_step: 1e-7,
            failed_tangent_ratio: 1e-10,
        }
    }

    /// Checks whether the settings are consistent or not
    pub fn validate(&self) -> RebarResult<()> {
        let fail = |msg: String| Err(RebarError::InvalidParameter(msg));
        if self.max_nesting < 1 {
            return fail(format!("max_nesting = {} must be ≥ 1", self.max_nesting));
        }
        if !(self.fit_bisection_tol > 0.0 && self.fit_bisection_tol < 0.5) {
            return fail(format!("fit_bisection_tol = {:?} must be in (0, 0.5)", self.fit_bisection_tol));
        }
        if !(self.fit_tolerance > 0.0) {
            return fail(format!("fit_tolerance = {:?} must be > 0", self.fit_tolerance));
        }
        if self.fit_max_iterations < 1 {
            return fail(format!("fit_max_iterations = {} must be ≥ 1", self.fit_max_iterations));
        }
        if !(self.min_engineering_strain > -1.0 && self.min_engineering_strain < 0.0) {
            return fail(format!(
                "min_engineering_strain = {:?} must be in (-1, 0)",
                self.min_engineering_strain
            ));
        }
        if !(self.buckling_floor >= 0.0 && self.buckling_floor <= 1.0) {
            return fail(format!("buckling_floor = {:?} must be in [0, 1]", self.buckling_floor));
        }
        if !(self.buckling_step > 0.0) {
            return fail(format!("buckling_step = {:?} must be > 0", self.buckling_step));
        }
        if !(self.failed_tangent_ratio > 0.0) {
            return fail(format!("failed_tangent_ratio = {:?} must be > 0", self.failed_tangent_ratio));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

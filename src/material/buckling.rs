use super::Backbone;
use crate::base::{ParamBuckling, Settings};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};

/// Implements the buckling post-processor
///
/// Maps the ideal (non-buckled) compressive stress to a reduced stress as a function of the
/// net compressive strain εc measured from the last point on the tension envelope.
/// The tangent is computed by central differences of the same reduction function.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Buckling {
    /// Holds the buckling model
    pub model: ParamBuckling,

    /// Holds the natural yield stress
    pub fy: f64,

    /// Holds the natural yield strain
    pub ey: f64,

    /// Holds Young's modulus
    pub young: f64,

    /// Holds the residual capacity as a fraction of the yield stress
    pub floor: f64,

    /// Holds the strain step of the numerical derivative
    pub step: f64,
}

impl Buckling {
    /// Allocates a new instance
    pub fn new(model: ParamBuckling, backbone: &Backbone, settings: &Settings) -> Self {
        Buckling {
            model,
            fy: backbone.fyp,
            ey: backbone.eyp,
            young: backbone.ee,
            floor: settings.buckling_floor,
            step: settings.buckling_step,
        }
    }

    /// Indicates whether a buckling model is selected
    pub fn is_active(&self) -> bool {
        self.model != ParamBuckling::None
    }

    /// Returns the buckled stress
    ///
    /// # Input
    ///
    /// * `ec` -- net compressive strain (positive in compression)
    /// * `stress` -- ideal stress (negative in compression)
    pub fn stress(&self, ec: f64, stress: f64) -> f64 {
        if !(ec > 0.0 && stress < 0.0) {
            return stress;
        }
        let fc = -stress;
        let reduced = match self.model {
            ParamBuckling::None => fc,
            ParamBuckling::GomesAppleton { slenderness, beta, r } => {
                let mechanism = beta * (4.0 * SQRT_2 / (3.0 * PI)) * self.fy / (slenderness * f64::sqrt(ec));
                if mechanism < fc {
                    let limited = f64::min(f64::max(self.floor * self.fy, mechanism), fc);
                    fc - r * (fc - limited)
                } else {
                    fc
                }
            }
            ParamBuckling::DhakalMaekawa { slenderness, alpha } => {
                let root = f64::sqrt(self.fy / 100.0) * slenderness;
                let e_star = f64::max(self.ey * (55.0 - 2.3 * root), 7.0 * self.ey);
                let ratio = f64::min(f64::max(alpha * (1.1 - 0.016 * root), 0.0), 1.0);
                if ec <= self.ey {
                    fc
                } else if ec <= e_star {
                    fc * (1.0 - (1.0 - ratio) * (ec - self.ey) / (e_star - self.ey))
                } else {
                    let f = fc * ratio - 0.02 * self.young * (ec - e_star);
                    f64::min(f64::max(f, self.floor * self.fy), fc)
                }
            }
        };
        -reduced
    }

    /// Returns the buckled stress and tangent given the ideal response
    ///
    /// # Input
    ///
    /// * `ec` -- net compressive strain (positive in compression)
    /// * `stress` -- ideal stress
    /// * `tangent` -- ideal tangent
    pub fn response(&self, ec: f64, stress: f64, tangent: f64) -> (f64, f64) {
        if !self.is_active() || !(ec > 0.0 && stress < 0.0) {
            return (stress, tangent);
        }
        let h = self.step;
        let fwd = self.stress(ec - h, stress + tangent * h);
        let bwd = self.stress(ec + h, stress - tangent * h);
        (self.stress(ec, stress), (fwd - bwd) / (2.0 * h))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

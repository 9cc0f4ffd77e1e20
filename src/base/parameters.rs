use super::{RebarError, RebarResult};
use serde::{Deserialize, Serialize};

/// Holds parameters for the buckling post-processor
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParamBuckling {
    /// No buckling reduction
    None,

    /// Plastic-mechanism model by Gomes and Appleton
    GomesAppleton {
        /// Slenderness ratio L/D
        slenderness: f64,

        /// Amplification factor of the mechanism strength
        beta: f64,

        /// Reduction factor (0 = no reduction; 1 = full reduction)
        r: f64,
    },

    /// Interpolation model by Dhakal and Maekawa
    DhakalMaekawa {
        /// Slenderness ratio L/D
        slenderness: f64,

        /// Coefficient of the residual capacity (0.75 for linear hardening; 1.0 for elastic-perfectly plastic)
        alpha: f64,
    },
}

/// Holds the low-cycle fatigue parameters (Coffin-Manson)
///
/// ```text
/// εp = cf (2 Nf)^(-alpha)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamFatigue {
    /// Ductility coefficient
    pub cf: f64,

    /// Ductility exponent
    pub alpha: f64,

    /// Strength degradation rate
    pub cd: f64,
}

/// Holds the shape parameters of the Menegotto-Pinto transition curves
///
/// ```text
/// R = r1 - r2 ξ / (r3 + ξ)
/// ```
///
/// where ξ is the plastic strain spanned by the curve divided by the yield strain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamCurve {
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
}

/// Holds the parameters of the hardening-location corrector
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamHardening {
    /// Rate of shortening of the yield plateau with the plastic strain
    pub a1: f64,

    /// Minimum (floor) of the hardening-location factor
    pub limit: f64,
}

/// Holds the parameters of the reinforcing steel model
///
/// All values are engineering quantities; the conversion to natural measures is done once by the model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSteel {
    /// Yield stress fy
    pub fy: f64,

    /// Ultimate stress fu
    pub fu: f64,

    /// Young's modulus E
    pub young: f64,

    /// Tangent modulus at the onset of strain hardening Esh
    pub young_sh: f64,

    /// Strain at the onset of strain hardening εsh
    pub esh: f64,

    /// Strain at the ultimate stress εu
    pub eu: f64,

    /// Buckling model
    #[serde(default = "ParamBuckling::none")]
    pub buckling: ParamBuckling,

    /// Fatigue parameters
    #[serde(default)]
    pub fatigue: ParamFatigue,

    /// Transition-curve shape parameters
    #[serde(default)]
    pub curve: ParamCurve,

    /// Hardening-location parameters
    #[serde(default)]
    pub hardening: ParamHardening,
}

impl ParamBuckling {
    fn none() -> Self {
        ParamBuckling::None
    }
}

impl Default for ParamFatigue {
    fn default() -> Self {
        ParamFatigue {
            cf: 0.26,
            alpha: 0.506,
            cd: 0.389,
        }
    }
}

impl ParamFatigue {
    /// Returns parameters that disable the fatigue damage
    pub fn disabled() -> Self {
        ParamFatigue {
            cf: 0.0,
            alpha: 0.0,
            cd: 0.0,
        }
    }

    /// Indicates whether the damage is computed or not
    pub fn enabled(&self) -> bool {
        self.cf > 0.0 && self.alpha > 0.0
    }
}

impl Default for ParamCurve {
    fn default() -> Self {
        ParamCurve {
            r1: 20.0,
            r2: 18.5,
            r3: 0.15,
        }
    }
}

impl Default for ParamHardening {
    fn default() -> Self {
        ParamHardening { a1: 4.3, limit: 0.01 }
    }
}

impl ParamSteel {
    /// Checks whether the parameters are consistent or not
    pub fn validate(&self) -> RebarResult<()> {
        let fail = |msg: String| Err(RebarError::InvalidParameter(msg));
        if !(self.young > 0.0) {
            return fail(format!("young = {:?} must be > 0", self.young));
        }
        if !(self.fy > 0.0) {
            return fail(format!("fy = {:?} must be > 0", self.fy));
        }
        if !(self.fu > self.fy) {
            return fail(format!("fu = {:?} must be > fy = {:?}", self.fu, self.fy));
        }
        let ey = self.fy / self.young;
        if !(self.esh > ey) {
            return fail(format!("esh = {:?} must be > fy/young = {:?}", self.esh, ey));
        }
        if !(self.eu > self.esh) {
            return fail(format!("eu = {:?} must be > esh = {:?}", self.eu, self.esh));
        }
        if !(self.young_sh > 0.0 && self.young_sh < self.young) {
            return fail(format!("young_sh = {:?} must be in (0, young)", self.young_sh));
        }
        match self.buckling {
            ParamBuckling::None => (),
            ParamBuckling::GomesAppleton { slenderness, beta, r } => {
                if !(slenderness > 0.0) {
                    return fail(format!("slenderness = {:?} must be > 0", slenderness));
                }
                if !(beta > 0.0) {
                    return fail(format!("beta = {:?} must be > 0", beta));
                }
                if !(r >= 0.0 && r <= 1.0) {
                    return fail(format!("r = {:?} must be in [0, 1]", r));
                }
            }
            ParamBuckling::DhakalMaekawa { slenderness, alpha } => {
                if !(slenderness > 0.0) {
                    return fail(format!("slenderness = {:?} must be > 0", slenderness));
                }
                if !(alpha > 0.0) {
                    return fail(format!("alpha = {:?} must be > 0", alpha));
                }
            }
        }
        let f = &self.fatigue;
        if !(f.cf >= 0.0 && f.alpha >= 0.0 && f.cd >= 0.0) {
            return fail(format!("fatigue parameters {:?} must be ≥ 0", f));
        }
        let c = &self.curve;
        if !(c.r1 >= 1.0 && c.r2 >= 0.0 && c.r3 > 0.0) {
            return fail(format!("curve parameters {:?} require r1 ≥ 1, r2 ≥ 0 and r3 > 0", c));
        }
        let h = &self.hardening;
        if !(h.a1 >= 0.0) {
            return fail(format!("a1 = {:?} must be ≥ 0", h.a1));
        }
        if !(h.limit > 0.0 && h.limit <= 1.0) {
            return fail(format!("limit = {:?} must be in (0, 1]", h.limit));
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

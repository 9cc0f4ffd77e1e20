use crate::base::{ParamCurve, RebarError, RebarResult, Settings};
use serde::{Deserialize, Serialize};

/// Relative tolerance below which the curve degenerates to the secant line
const LINEAR_TOLERANCE: f64 = 1e-4;

/// Holds a point of the stress-strain response (natural measures)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub strain: f64,
    pub stress: f64,
    pub tangent: f64,
}

impl Anchor {
    /// Allocates a new instance
    pub fn new(strain: f64, stress: f64, tangent: f64) -> Self {
        Anchor { strain, stress, tangent }
    }
}

/// Implements a Menegotto-Pinto transition curve between two anchors
///
/// ```text
///                             ⎛            1 - Q       ⎞
/// σ(ε) = σin + Ein (ε - εin)  ⎜ Q + ────────────────── ⎟
///                             ⎝     (1 + |x|^R)^(1/R)  ⎠
///
///      Ein (ε - εin)
/// x = ───────────────
///       σch - σin
/// ```
///
/// The parameters (R, Q, σch) are such that the curve starts at (εin, σin) with
/// tangent Ein and ends at (εout, σout) with tangent Eout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionCurve {
    /// Strain at the start anchor
    pub ein: f64,

    /// Stress at the start anchor
    pub fin: f64,

    /// Tangent at the start anchor
    pub ee_in: f64,

    /// Strain at the far anchor
    pub eout: f64,

    /// Stress at the far anchor
    pub fout: f64,

    /// Tangent at the far anchor
    pub ee_out: f64,

    /// Shape exponent R (zero if linear)
    pub rr: f64,

    /// Characteristic stress σch locating the corner of the curve
    pub fch: f64,

    /// Ratio Q between the asymptotic and the initial slopes (one if linear)
    pub qq: f64,

    /// Secant modulus between the anchors
    pub ee_sec: f64,

    /// Tangent of the parent branch at the start anchor
    pub ee_return: f64,
}

/// Returns the shape exponent R for a curve spanning (Δε, Δσ)
///
/// ```text
/// R = r1 - r2 ξ / (r3 + ξ)     ξ = |Δε - Δσ/E| / εy
/// ```
pub fn shape_exponent(delta_strain: f64, delta_stress: f64, young: f64, eyp: f64, param: &ParamCurve) -> f64 {
    let xi = f64::abs(delta_strain - delta_stress / young) / eyp;
    f64::max(param.r1 - param.r2 * xi / (param.r3 + xi), 1.0)
}

impl TransitionCurve {
    /// Fits a new curve from `start` to `target`
    ///
    /// # Input
    ///
    /// * `start` -- start anchor; its tangent is the initial slope Ein
    /// * `target` -- far anchor; its tangent is the final slope Eout
    /// * `ee_return` -- tangent of the parent branch at the start anchor
    /// * `rr` -- shape exponent R (increased if the target cannot be represented)
    /// * `settings` -- tolerances of the solver
    ///
    /// # Errors
    ///
    /// * [RebarError::NonFinite] if the solver generates a non-finite value
    /// * [RebarError::NoConvergence] if the Newton refinement exceeds the iteration cap
    pub fn fit(start: Anchor, target: Anchor, ee_return: f64, rr: f64, settings: &Settings) -> RebarResult<Self> {
        let delta_strain = target.strain - start.strain;
        let delta_stress = target.stress - start.stress;
        let ee_sec = if delta_strain != 0.0 {
            delta_stress / delta_strain
        } else {
            start.tangent
        };
        let mut curve = TransitionCurve {
            ein: start.strain,
            fin: start.stress,
            ee_in: start.tangent,
            eout: target.strain,
            fout: target.stress,
            ee_out: target.tangent,
            rr: 0.0,
            fch: start.stress,
            qq: 1.0,
            ee_sec,
            ee_return,
        };
        if !ee_sec.is_finite() {
            return Err(RebarError::NonFinite("secant modulus"));
        }
        if delta_strain == 0.0 || !(start.tangent > 0.0) {
            return Ok(curve);
        }

        // the solution exists if Eout < Esec < Ein
        let s = ee_sec / start.tangent;
        let t = target.tangent / start.tangent;
        if !(s > 0.0 && s < 1.0 - LINEAR_TOLERANCE && t < s) {
            return Ok(curve);
        }
        let rhs = (s - t) / (1.0 - s);
        if rhs <= LINEAR_TOLERANCE {
            return Ok(curve);
        }

        // φ(u) ranges over (0, R)
        let mut r = f64::max(rr, 1.0);
        if rhs >= r / 1.1 {
            r = 1.1 * rhs;
        }

        // bracket the root by bisection
        let mut lo = 0.0;
        let mut hi = 1.0;
        while hi - lo > settings.fit_bisection_tol {
            let mid = 0.5 * (lo + hi);
            if phi(mid, r) < rhs {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        // refine with safeguarded Newton iterations
        let mut u = 0.5 * (lo + hi);
        let mut it = 0;
        loop {
            let res = phi(u, r) - rhs;
            if !res.is_finite() {
                return Err(RebarError::NonFinite("residual"));
            }
            if f64::abs(res) <= settings.fit_tolerance * f64::max(1.0, rhs) {
                break;
            }
            if it == settings.fit_max_iterations {
                return Err(RebarError::NoConvergence(it));
            }
            if res < 0.0 {
                lo = u;
            } else {
                hi = u;
            }
            let d = phi_deriv(u, r);
            let mut next = if d > 0.0 { u - res / d } else { 0.5 * (lo + hi) };
            if !next.is_finite() {
                return Err(RebarError::NonFinite("Newton update"));
            }
            if next <= lo || next >= hi {
                next = 0.5 * (lo + hi);
            }
            if next == u {
                break;
            }
            u = next;
            it += 1;
        }

        let xi = f64::powf(1.0 - f64::powf(u, r), 1.0 / r) / u;
        let fch = start.stress + start.tangent * delta_strain / xi;
        if !xi.is_finite() || !fch.is_finite() {
            return Err(RebarError::NonFinite("corner stress"));
        }
        if fch == start.stress {
            return Ok(curve);
        }
        curve.rr = r;
        curve.qq = (s - u) / (1.0 - u);
        curve.fch = fch;
        log::trace!("transition curve fitted: R = {:?}, Q = {:?}, iterations = {}", r, curve.qq, it);
        Ok(curve)
    }

    /// Returns the stress at a natural strain
    pub fn stress(&self, strain: f64) -> f64 {
        let de = strain - self.ein;
        if self.is_linear() {
            return self.fin + self.ee_sec * de;
        }
        let x = f64::abs(self.ee_in * de / (self.fch - self.fin));
        let den = f64::powf(1.0 + f64::powf(x, self.rr), 1.0 / self.rr);
        self.fin + self.ee_in * de * (self.qq + (1.0 - self.qq) / den)
    }

    /// Returns the tangent modulus at a natural strain
    pub fn tangent(&self, strain: f64) -> f64 {
        if self.is_linear() {
            return self.ee_sec;
        }
        let x = f64::abs(self.ee_in * (strain - self.ein) / (self.fch - self.fin));
        let c = f64::powf(1.0 + f64::powf(x, self.rr), -(1.0 + self.rr) / self.rr);
        self.ee_in * (self.qq + (1.0 - self.qq) * c)
    }

    /// Indicates whether the curve degenerated to the secant line or not
    pub fn is_linear(&self) -> bool {
        self.qq == 1.0
    }

    /// Returns the start anchor
    pub fn start(&self) -> Anchor {
        Anchor::new(self.ein, self.fin, self.ee_in)
    }

    /// Returns the far anchor
    pub fn target(&self) -> Anchor {
        Anchor::new(self.eout, self.fout, self.ee_out)
    }

    /// Returns the start point with the tangent of the parent branch
    pub fn return_anchor(&self) -> Anchor {
        Anchor::new(self.ein, self.fin, self.ee_return)
    }
}

/// Auxiliary function φ(u) = u (1 - uᴿ) / (1 - u), monotonically increasing in (0, 1)
fn phi(u: f64, r: f64) -> f64 {
    u * (1.0 - f64::powf(u, r)) / (1.0 - u)
}

/// Derivative of φ(u)
fn phi_deriv(u: f64, r: f64) -> f64 {
    (1.0 - (r + 1.0) * f64::powf(u, r) + r * f64::powf(u, r + 1.0)) / f64::powi(1.0 - u, 2)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

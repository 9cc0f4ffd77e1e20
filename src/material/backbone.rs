use crate::base::ParamSteel;
use serde::{Deserialize, Serialize};

/// Exponent of the Ramberg-Osgood transition between the elastic line and the yield plateau
pub const RAMBERG_OSGOOD_EXPONENT: f64 = 20.0;

/// Width of the smoothing window after the hardening onset (fraction of the plateau length)
const WINDOW_FRACTION: f64 = 0.1;

/// Maximum number of bisections when inverting the backbone
const N_MAX_BISECTIONS: usize = 200;

/// Implements the monotonic envelope (backbone) in natural strain and stress
///
/// The backbone is odd-symmetric and C¹ continuous. For x = |εₙ|:
///
/// ```text
/// 1. x ≤ εsh:         σ = (E - Ey) x / (1 + |(E - Ey) x / σy0|^N)^(1/N) + Ey x
/// 2. εsh < x < εsh+w: σ = L + (H - L) t (2 - t),  t = (x - εsh) / w
/// 3. εsh+w ≤ x ≤ εsu: σ = H = σsu + Esu (x - εsu) + D ((εsu - x) / (εsu - εsh))^p
/// 4. x > εsu:         σ = σsu + Esu (x - εsu)
/// ```
///
/// where L is the tangent line at the hardening onset and (Ey, σy0) define the yield plateau line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Backbone {
    /// Young's modulus
    pub ee: f64,

    /// Natural yield strain
    pub eyp: f64,

    /// Natural yield stress
    pub fyp: f64,

    /// Slope of the yield plateau line
    pub ee_plat: f64,

    /// Intercept of the yield plateau line
    pub fy0: f64,

    /// Natural strain at the hardening onset (unmodified)
    pub eshp0: f64,

    /// Natural strain at the ultimate point (unmodified)
    pub esup0: f64,

    /// Natural stress at the ultimate point
    pub fsup: f64,

    /// Tangent at the ultimate point
    pub ee_su: f64,

    /// Tangent at the hardening onset
    pub ee_sh: f64,

    /// Hardening-location factor used to compute the derived constants below
    pub factor: f64,

    /// Natural strain at the hardening onset
    pub eshp: f64,

    /// Natural stress at the hardening onset
    pub fshp: f64,

    /// Tangent of the plateau at the hardening onset
    pub ee_shp: f64,

    /// Natural strain at the ultimate point
    pub esup: f64,

    /// Width of the smoothing window after the hardening onset
    pub window: f64,

    /// Coefficient D of the hardening curve
    pub dd: f64,

    /// Exponent p of the hardening curve
    pub pp: f64,
}

impl Backbone {
    /// Allocates a new instance
    ///
    /// **Note:** `param` must have been validated already.
    pub fn new(param: &ParamSteel, factor: f64) -> Self {
        let ee = param.young;
        let ey = param.fy / ee;
        let eyp = f64::ln(1.0 + ey);
        let fyp = param.fy * (1.0 + ey);
        let eshp0 = f64::ln(1.0 + param.esh);
        let fshp0 = param.fy * (1.0 + param.esh);
        let ee_plat = (fshp0 - fyp) / (eshp0 - eyp);
        let fsup = param.fu * (1.0 + param.eu);
        let mut backbone = Backbone {
            ee,
            eyp,
            fyp,
            ee_plat,
            fy0: fyp - ee_plat * eyp,
            eshp0,
            esup0: f64::ln(1.0 + param.eu),
            fsup,
            ee_su: fsup, // zero engineering slope at the ultimate point
            ee_sh: param.young_sh * f64::powi(1.0 + param.esh, 2) + fshp0,
            factor: 1.0,
            eshp: eshp0,
            fshp: fshp0,
            ee_shp: ee_plat,
            esup: 0.0,
            window: 0.0,
            dd: 0.0,
            pp: 1.0,
        };
        backbone.set_factor(factor);
        backbone
    }

    /// Recomputes the derived constants for a new hardening-location factor
    ///
    /// The yield plateau is shortened to `eyp + factor (eshp0 - eyp)` and the hardening
    /// curve is translated by the same amount.
    pub fn set_factor(&mut self, factor: f64) {
        self.factor = factor;
        self.eshp = self.eyp + factor * (self.eshp0 - self.eyp);
        self.fshp = self.ramberg_osgood(self.eshp);
        self.ee_shp = self.ramberg_osgood_tangent(self.eshp);
        self.esup = self.esup0 - (self.eshp0 - self.eshp);
        let ll = self.esup - self.eshp;
        self.window = WINDOW_FRACTION * f64::min(self.eshp - self.eyp, ll);
        self.dd = self.fshp - self.fsup + self.ee_su * ll;
        self.pp = if self.dd < 0.0 {
            f64::max((self.ee_su - self.ee_sh) * ll / self.dd, 1.0)
        } else {
            1.0
        };
    }

    /// Returns the stress at a natural strain
    pub fn stress(&self, strain: f64) -> f64 {
        let (f, _) = self.eval(strain.abs());
        if strain < 0.0 {
            -f
        } else {
            f
        }
    }

    /// Returns the tangent modulus at a natural strain
    pub fn tangent(&self, strain: f64) -> f64 {
        let (_, df) = self.eval(strain.abs());
        df
    }

    /// Returns the stress and the tangent modulus at a natural strain
    pub fn response(&self, strain: f64) -> (f64, f64) {
        let (f, df) = self.eval(strain.abs());
        if strain < 0.0 {
            (-f, df)
        } else {
            (f, df)
        }
    }

    /// Returns the natural strain corresponding to a stress (inverse of the backbone)
    pub fn strain_at(&self, stress: f64) -> f64 {
        if stress == 0.0 {
            return 0.0;
        }
        let target = stress.abs();
        let mut lo = 0.0;
        let mut hi = self.eshp;
        for _ in 0..N_MAX_BISECTIONS {
            if self.eval(hi).0 >= target {
                break;
            }
            lo = hi;
            hi *= 2.0;
        }
        for _ in 0..N_MAX_BISECTIONS {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            if self.eval(mid).0 < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let x = 0.5 * (lo + hi);
        if stress < 0.0 {
            -x
        } else {
            x
        }
    }

    /// Evaluates the stress and tangent for x = |εₙ|
    fn eval(&self, x: f64) -> (f64, f64) {
        if x <= self.eshp {
            return (self.ramberg_osgood(x), self.ramberg_osgood_tangent(x));
        }
        if x < self.eshp + self.window {
            let t = (x - self.eshp) / self.window;
            let lam = t * (2.0 - t);
            let (h, dh) = self.hardening(x);
            let l = self.fshp + self.ee_shp * (x - self.eshp);
            let f = l + (h - l) * lam;
            let df = self.ee_shp + (dh - self.ee_shp) * lam + (h - l) * (2.0 - 2.0 * t) / self.window;
            return (f, df);
        }
        if x <= self.esup {
            return self.hardening(x);
        }
        (self.fsup + self.ee_su * (x - self.esup), self.ee_su)
    }

    /// Smooth transition from the elastic line to the yield plateau line
    fn ramberg_osgood(&self, x: f64) -> f64 {
        let a = self.ee - self.ee_plat;
        let z = a * x / self.fy0;
        let den = f64::powf(1.0 + f64::powf(z, RAMBERG_OSGOOD_EXPONENT), 1.0 / RAMBERG_OSGOOD_EXPONENT);
        a * x / den + self.ee_plat * x
    }

    /// Derivative of the Ramberg-Osgood transition
    fn ramberg_osgood_tangent(&self, x: f64) -> f64 {
        let n = RAMBERG_OSGOOD_EXPONENT;
        let a = self.ee - self.ee_plat;
        let z = a * x / self.fy0;
        a * f64::powf(1.0 + f64::powf(z, n), -(n + 1.0) / n) + self.ee_plat
    }

    /// Power-law hardening curve and its derivative
    fn hardening(&self, x: f64) -> (f64, f64) {
        let ll = self.esup - self.eshp;
        let r = f64::max((self.esup - x) / ll, 0.0);
        let f = self.fsup + self.ee_su * (x - self.esup) + self.dd * f64::powf(r, self.pp);
        let df = self.ee_su - self.dd * self.pp / ll * f64::powf(r, self.pp - 1.0);
        (f, df)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

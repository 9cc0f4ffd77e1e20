use super::{Anchor, Backbone, BranchStack, FatigueState, HardeningLocation};
use crate::base::{ParamSteel, RebarError, RebarResult, Settings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the branch governing the response
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    /// Elastic loading from the origin (before first yielding)
    Virgin,

    /// Monotonic envelope in tension
    TensionEnvelope,

    /// Monotonic envelope in compression
    CompressionEnvelope,

    /// Transition curve at the top of the branch stack
    Transition,
}

impl Branch {
    /// Returns the side of an envelope branch (+1 tension; -1 compression; 0 otherwise)
    pub fn side(&self) -> f64 {
        match self {
            Branch::TensionEnvelope => 1.0,
            Branch::CompressionEnvelope => -1.0,
            _ => 0.0,
        }
    }

    /// Returns the envelope branch of a side
    pub fn envelope(side: f64) -> Self {
        if side > 0.0 {
            Branch::TensionEnvelope
        } else {
            Branch::CompressionEnvelope
        }
    }

    /// Returns a numeric code used by the flat state vector
    pub fn code(&self) -> f64 {
        match self {
            Branch::Virgin => 0.0,
            Branch::TensionEnvelope => 1.0,
            Branch::CompressionEnvelope => 2.0,
            Branch::Transition => 3.0,
        }
    }

    /// Returns the branch corresponding to a numeric code
    pub fn from_code(code: f64) -> RebarResult<Self> {
        match code as i64 {
            _ if code.fract() != 0.0 => Err(RebarError::InvalidState(format!("branch code = {:?} is invalid", code))),
            0 => Ok(Branch::Virgin),
            1 => Ok(Branch::TensionEnvelope),
            2 => Ok(Branch::CompressionEnvelope),
            3 => Ok(Branch::Transition),
            _ => Err(RebarError::InvalidState(format!("branch code = {:?} is invalid", code))),
        }
    }
}

/// Holds the state of a reinforcing bar
///
/// Strains, stresses and tangents are natural measures. The model keeps a trial and a
/// committed copy of this structure; the trial copy is always derived from the committed one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SteelState {
    /// Holds the strain
    pub strain: f64,

    /// Holds the stress after buckling and strength degradation
    pub stress: f64,

    /// Holds the tangent after buckling and strength degradation
    pub tangent: f64,

    /// Holds the stress of the active branch
    pub ideal_stress: f64,

    /// Holds the tangent of the active branch
    pub ideal_tangent: f64,

    /// Holds the active branch
    pub branch: Branch,

    /// Holds the nested transition curves
    pub stack: BranchStack,

    /// Holds the origin of the tension envelope
    pub shift_tension: f64,

    /// Holds the origin of the compression envelope
    pub shift_compression: f64,

    /// Holds the last reversal point on the tension envelope
    pub return_tension: Option<Anchor>,

    /// Holds the last reversal point on the compression envelope
    pub return_compression: Option<Anchor>,

    /// Holds the hardening-location factor
    pub hardening: HardeningLocation,

    /// Holds the backbone consistent with the hardening-location factor
    pub backbone: Backbone,

    /// Holds the strain of the last point on the tension envelope (or the largest virgin strain)
    pub buckling_reference: f64,

    /// Holds the fatigue history
    pub fatigue: FatigueState,

    /// Holds the strength reduction factor
    pub scale_factor: f64,

    /// Indicates that the bar failed by low-cycle fatigue
    pub failed: bool,
}

impl SteelState {
    /// Allocates a new instance in the virgin state
    pub fn new(param: &ParamSteel, settings: &Settings) -> Self {
        let hardening = HardeningLocation::new(&param.hardening);
        SteelState {
            strain: 0.0,
            stress: 0.0,
            tangent: param.young,
            ideal_stress: 0.0,
            ideal_tangent: param.young,
            branch: Branch::Virgin,
            stack: BranchStack::new(settings.max_nesting),
            shift_tension: 0.0,
            shift_compression: 0.0,
            return_tension: None,
            return_compression: None,
            hardening,
            backbone: Backbone::new(param, hardening.factor),
            buckling_reference: 0.0,
            fatigue: FatigueState::new(),
            scale_factor: 1.0,
            failed: false,
        }
    }

    /// Returns the branch id
    ///
    /// 0 is the virgin branch, 1 and 2 are the tension and compression envelopes, and
    /// 3, 4, 5, ... are the nested transition curves.
    pub fn branch_id(&self) -> usize {
        match self.branch {
            Branch::Virgin => 0,
            Branch::TensionEnvelope => 1,
            Branch::CompressionEnvelope => 2,
            Branch::Transition => self.stack.branch_id(),
        }
    }

    /// Returns the anchors of the active transition curve, if any
    pub fn active_anchors(&self) -> Option<(Anchor, Anchor)> {
        match self.branch {
            Branch::Transition => self.stack.top().map(|curve| (curve.start(), curve.target())),
            _ => None,
        }
    }
}

impl fmt::Display for SteelState {
    /// Returns a nicely formatted string representing the state
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(v) => {
                write!(f, "ε = {:.1$}", self.strain, v)?;
                write!(f, "\nσ = {:.1$}", self.stress, v)?;
                write!(f, "\nE = {:.1$}", self.tangent, v)?;
            }
            None => {
                write!(f, "ε = {:?}", self.strain)?;
                write!(f, "\nσ = {:?}", self.stress)?;
                write!(f, "\nE = {:?}", self.tangent)?;
            }
        }
        write!(f, "\nbranch = {:?} ({})", self.branch, self.branch_id())?;
        write!(f, "\nh = {:?}", self.hardening.factor)?;
        write!(f, "\ndamage = {:?}", self.fatigue.cumulative_damage)?;
        write!(f, "\nfailed = {}", self.failed)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Branch, SteelState};
    use crate::base::{RebarError, SampleParams, Settings};

    #[test]
    fn new_works() {
        let state = SteelState::new(&SampleParams::param_steel(), &Settings::new());
        assert_eq!(state.branch, Branch::Virgin);
        assert_eq!(state.branch_id(), 0);
        assert_eq!(state.tangent, 200_000.0);
        assert_eq!(state.hardening.factor, 1.0);
        assert_eq!(state.backbone.factor, 1.0);
        assert_eq!(state.stack.capacity(), 21);
        assert!(state.active_anchors().is_none());
    }

    #[test]
    fn branch_codes_work() {
        for branch in [
            Branch::Virgin,
            Branch::TensionEnvelope,
            Branch::CompressionEnvelope,
            Branch::Transition,
        ] {
            assert_eq!(Branch::from_code(branch.code()).unwrap(), branch);
        }
        assert!(matches!(Branch::from_code(4.0), Err(RebarError::InvalidState(_))));
        assert!(matches!(Branch::from_code(0.5), Err(RebarError::InvalidState(_))));
        assert_eq!(Branch::envelope(1.0), Branch::TensionEnvelope);
        assert_eq!(Branch::envelope(-1.0).side(), -1.0);
        assert_eq!(Branch::Transition.side(), 0.0);
    }

    #[test]
    fn display_works() {
        let state = SteelState::new(&SampleParams::param_steel(), &Settings::new());
        assert_eq!(
            format!("{:.2}", state),
            "ε = 0.00\n\
             σ = 0.00\n\
             E = 200000.00\n\
             branch = Virgin (0)\n\
             h = 1.0\n\
             damage = 0.0\n\
             failed = false"
        );
    }
}

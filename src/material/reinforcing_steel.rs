use super::{Anchor, Buckling, SteelState, UniaxialMaterial};
use crate::base::{engineering_strain, engineering_stress, engineering_tangent, natural_strain};
use crate::base::{ParamSteel, RebarError, RebarResult, Settings};
use serde::Serialize;

/// Implements the cyclic uniaxial model for reinforcing steel bars
///
/// The response follows a natural-strain backbone with a yield plateau and strain hardening,
/// Menegotto-Pinto transition curves between reversal points (with memory of nested
/// reversals), a shortening of the yield plateau with the accumulated plastic strain,
/// strength degradation by low-cycle fatigue, and an optional reduction by bar buckling.
///
/// # Examples
///
/// ```
/// use rebar::prelude::*;
///
/// fn main() -> Result<(), RebarError> {
///     let param = SampleParams::param_steel();
///     let mut steel = ReinforcingSteel::new(&param, &Settings::new())?;
///     steel.set_trial_strain(0.02, 0.0)?;
///     steel.commit_state()?;
///     assert_eq!(steel.branch_id(), 1);
///     steel.set_trial_strain(0.002, 0.0)?;
///     assert_eq!(steel.branch_id(), 3);
///     assert!(steel.stress() < 0.0);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct ReinforcingSteel {
    /// Holds the material parameters
    pub(crate) param: ParamSteel,

    /// Holds the numerical settings
    pub(crate) settings: Settings,

    /// Holds the buckling post-processor
    pub(crate) buckling: Buckling,

    /// Holds the last accepted state
    pub(crate) committed: SteelState,

    /// Holds the state under evaluation
    pub(crate) trial: SteelState,
}

impl ReinforcingSteel {
    /// Allocates a new instance in the virgin state
    pub fn new(param: &ParamSteel, settings: &Settings) -> RebarResult<Self> {
        param.validate()?;
        settings.validate()?;
        let committed = SteelState::new(param, settings);
        let buckling = Buckling::new(param.buckling, &committed.backbone, settings);
        Ok(ReinforcingSteel {
            param: *param,
            settings: *settings,
            buckling,
            trial: committed.clone(),
            committed,
        })
    }

    /// Returns the material parameters
    pub fn param(&self) -> &ParamSteel {
        &self.param
    }

    /// Returns the numerical settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the trial state
    pub fn trial(&self) -> &SteelState {
        &self.trial
    }

    /// Returns the committed state
    pub fn committed(&self) -> &SteelState {
        &self.committed
    }

    /// Returns the trial natural strain
    pub fn natural_strain(&self) -> f64 {
        self.trial.strain
    }

    /// Returns the trial natural stress
    pub fn natural_stress(&self) -> f64 {
        self.trial.stress
    }

    /// Returns the trial natural tangent
    pub fn natural_tangent(&self) -> f64 {
        self.trial.tangent
    }

    /// Returns the anchors (natural measures) of the active transition curve, if any
    pub fn active_anchors(&self) -> Option<(Anchor, Anchor)> {
        self.trial.active_anchors()
    }

    /// Returns the hardening-location factor
    pub fn hardening_factor(&self) -> f64 {
        self.trial.hardening.factor
    }

    /// Returns the sum of the plastic strains of all half cycles
    pub fn cumulative_plastic_strain(&self) -> f64 {
        self.trial.fatigue.cumulative_plastic
    }

    /// Returns the strength reduction factor
    pub fn scale_factor(&self) -> f64 {
        self.trial.scale_factor
    }

    /// Indicates whether the bar failed by low-cycle fatigue
    pub fn failed(&self) -> bool {
        self.trial.failed
    }
}

impl UniaxialMaterial for ReinforcingSteel {
    /// Computes the trial state from the last committed state and a new strain
    ///
    /// # Errors
    ///
    /// * [RebarError::StrainOutOfRange] if the strain is not finite or below the compressive limit;
    ///   the model is not modified
    /// * [RebarError::NoConvergence] or [RebarError::NonFinite] if a transition curve cannot be fitted;
    ///   the trial state is reset to the committed state
    fn set_trial_strain(&mut self, strain: f64, _strain_rate: f64) -> RebarResult<()> {
        let limit = self.settings.min_engineering_strain;
        if !strain.is_finite() || strain <= limit {
            log::warn!("trial strain {:?} rejected (limit = {:?})", strain, limit);
            return Err(RebarError::StrainOutOfRange { strain, limit });
        }
        self.trial = self.committed.clone();
        let natural = natural_strain(strain);
        if self.committed.failed {
            self.trial.strain = natural;
            return Ok(());
        }
        if let Err(err) = self.trial.update(natural, &self.param, &self.settings, &self.buckling) {
            log::warn!("trial strain {:?} failed: {}", strain, err);
            self.trial = self.committed.clone();
            return Err(err);
        }
        Ok(())
    }

    fn strain(&self) -> f64 {
        engineering_strain(self.trial.strain)
    }

    fn stress(&self) -> f64 {
        if self.trial.failed {
            return 0.0;
        }
        engineering_stress(self.trial.stress, self.trial.strain)
    }

    fn tangent(&self) -> f64 {
        if self.trial.failed {
            return self.settings.failed_tangent_ratio * self.param.young;
        }
        engineering_tangent(self.trial.tangent, self.trial.stress, self.trial.strain)
    }

    fn initial_tangent(&self) -> f64 {
        self.param.young
    }

    fn commit_state(&mut self) -> RebarResult<()> {
        if self.trial.failed && !self.committed.failed {
            log::info!(
                "bar failed by low-cycle fatigue at ε = {:?} (damage = {:?})",
                self.strain(),
                self.trial.fatigue.cumulative_damage
            );
        }
        self.committed = self.trial.clone();
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> RebarResult<()> {
        self.trial = self.committed.clone();
        Ok(())
    }

    fn revert_to_start(&mut self) -> RebarResult<()> {
        self.committed = SteelState::new(&self.param, &self.settings);
        self.trial = self.committed.clone();
        Ok(())
    }

    fn branch_id(&self) -> usize {
        self.trial.branch_id()
    }

    fn cumulative_damage(&self) -> f64 {
        self.trial.fatigue.cumulative_damage
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

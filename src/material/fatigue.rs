use crate::base::ParamFatigue;
use serde::{Deserialize, Serialize};

/// Steep reduction of the scale factor once the cumulative damage exceeds one
const OVERDAMAGE_PENALTY: f64 = 10.0;

/// Returns the plastic strain of a half cycle
///
/// ```text
/// εp = max(0, |Δε/2| - |Δσ/2| / E)
/// ```
pub fn plastic_strain_of(half_amplitude: f64, stress_amplitude: f64, young: f64) -> f64 {
    f64::max(0.0, f64::abs(half_amplitude) - f64::abs(stress_amplitude) / young)
}

/// Returns the damage of a half cycle (Coffin-Manson with Miner's rule)
///
/// ```text
/// D = (εp / cf)^(1/alpha)
/// ```
///
/// Returns zero if the fatigue parameters are unset.
pub fn damage(plastic_strain: f64, param: &ParamFatigue) -> f64 {
    if !param.enabled() {
        return 0.0;
    }
    f64::powf(plastic_strain / param.cf, 1.0 / param.alpha)
}

/// Returns the strength reduction factor
///
/// ```text
/// φ = 1 - cd D - 10 max(0, D - 1)
/// ```
///
/// A negative value means that the bar has failed.
pub fn scale_factor(cumulative_damage: f64, param: &ParamFatigue) -> f64 {
    1.0 - param.cd * cumulative_damage - OVERDAMAGE_PENALTY * f64::max(0.0, cumulative_damage - 1.0)
}

/// Holds the fatigue history
///
/// The contributions of the open (current) half cycle are kept separately so that
/// each evaluation replaces them instead of adding them again.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FatigueState {
    /// Holds the strain at the start of the open half cycle
    pub reversal_strain: f64,

    /// Holds the stress at the start of the open half cycle
    pub reversal_stress: f64,

    /// Holds the plastic strain of the open half cycle
    pub open_plastic: f64,

    /// Holds the damage of the open half cycle
    pub open_damage: f64,

    /// Holds the sum of plastic strains of all half cycles
    pub cumulative_plastic: f64,

    /// Holds the sum of damages of all half cycles
    pub cumulative_damage: f64,
}

impl FatigueState {
    /// Allocates a new instance (the first half cycle starts at the origin)
    pub fn new() -> Self {
        FatigueState {
            reversal_strain: 0.0,
            reversal_stress: 0.0,
            open_plastic: 0.0,
            open_damage: 0.0,
            cumulative_plastic: 0.0,
            cumulative_damage: 0.0,
        }
    }

    /// Closes the open half cycle and starts a new one at a reversal point
    pub fn start_half_cycle(&mut self, strain: f64, stress: f64) {
        self.reversal_strain = strain;
        self.reversal_stress = stress;
        self.open_plastic = 0.0;
        self.open_damage = 0.0;
    }

    /// Updates the contributions of the open half cycle given the current point
    ///
    /// The open contributions never decrease; hence the cumulative values never decrease.
    pub fn update(&mut self, strain: f64, stress: f64, young: f64, param: &ParamFatigue) {
        let half_amplitude = 0.5 * (strain - self.reversal_strain);
        let stress_amplitude = 0.5 * (stress - self.reversal_stress);
        let ep = plastic_strain_of(half_amplitude, stress_amplitude, young);
        if ep <= self.open_plastic {
            return;
        }
        let dd = damage(ep, param);
        self.cumulative_plastic += ep - self.open_plastic;
        self.cumulative_damage += dd - self.open_damage;
        self.open_plastic = ep;
        self.open_damage = dd;
    }

    /// Returns the strength reduction factor
    pub fn scale_factor(&self, param: &ParamFatigue) -> f64 {
        scale_factor(self.cumulative_damage, param)
    }
}

impl Default for FatigueState {
    fn default() -> Self {
        FatigueState::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{damage, plastic_strain_of, scale_factor, FatigueState};
    use crate::base::ParamFatigue;
    use approx::assert_abs_diff_eq;

    #[test]
    fn plastic_strain_of_works() {
        assert_eq!(plastic_strain_of(0.001, 400.0, 200_000.0), 0.0);
        assert_abs_diff_eq!(plastic_strain_of(-0.01, 400.0, 200_000.0), 0.008, epsilon = 1e-15);
        assert_abs_diff_eq!(plastic_strain_of(0.01, -400.0, 200_000.0), 0.008, epsilon = 1e-15);
    }

    #[test]
    fn damage_works() {
        let param = ParamFatigue::default();
        assert_eq!(damage(0.0, &param), 0.0);
        assert_abs_diff_eq!(damage(0.26, &param), 1.0, epsilon = 1e-15);
        let expected = f64::powf(0.01 / 0.26, 1.0 / 0.506);
        assert_abs_diff_eq!(damage(0.01, &param), expected, epsilon = 1e-15);
        assert_eq!(damage(0.1, &ParamFatigue::disabled()), 0.0);
    }

    #[test]
    fn scale_factor_works() {
        let param = ParamFatigue::default();
        assert_eq!(scale_factor(0.0, &param), 1.0);
        assert_abs_diff_eq!(scale_factor(0.5, &param), 1.0 - 0.389 * 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(scale_factor(1.1, &param), 1.0 - 0.389 * 1.1 - 1.0, epsilon = 1e-14);
        assert!(scale_factor(1.1, &param) < 0.0);
        assert_eq!(scale_factor(0.0, &ParamFatigue::disabled()), 1.0);
    }

    #[test]
    fn open_half_cycle_is_not_counted_twice() {
        let param = ParamFatigue::default();
        let mut state = FatigueState::new();
        state.update(0.02, 500.0, 200_000.0, &param);
        let first = state.cumulative_damage;
        assert!(first > 0.0);
        state.update(0.02, 500.0, 200_000.0, &param);
        assert_eq!(state.cumulative_damage, first);
        // moving back inside the half cycle does not reduce the damage
        state.update(0.015, 450.0, 200_000.0, &param);
        assert_eq!(state.cumulative_damage, first);
        state.update(0.03, 520.0, 200_000.0, &param);
        let ep = plastic_strain_of(0.015, 260.0, 200_000.0);
        assert_abs_diff_eq!(state.cumulative_plastic, ep, epsilon = 1e-15);
        assert_abs_diff_eq!(state.cumulative_damage, damage(ep, &param), epsilon = 1e-15);
    }

    #[test]
    fn new_half_cycles_accumulate() {
        let param = ParamFatigue::default();
        let mut state = FatigueState::new();
        state.update(0.02, 500.0, 200_000.0, &param);
        let first = state.cumulative_damage;
        state.start_half_cycle(0.02, 500.0);
        assert_eq!(state.open_damage, 0.0);
        state.update(-0.02, -500.0, 200_000.0, &param);
        let ep = plastic_strain_of(-0.02, -500.0, 200_000.0);
        assert_abs_diff_eq!(state.cumulative_damage, first + damage(ep, &param), epsilon = 1e-15);
    }

    #[test]
    fn disabled_fatigue_keeps_zero_damage() {
        let param = ParamFatigue::disabled();
        let mut state = FatigueState::new();
        state.update(0.05, 600.0, 200_000.0, &param);
        assert!(state.cumulative_plastic > 0.0);
        assert_eq!(state.cumulative_damage, 0.0);
        assert_eq!(state.scale_factor(&param), 1.0);
    }
}

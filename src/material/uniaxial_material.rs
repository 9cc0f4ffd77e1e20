use crate::base::RebarResult;

/// Specifies the essential functions for uniaxial material models
///
/// The outer solver calls [UniaxialMaterial::set_trial_strain], reads the stress and tangent,
/// and then accepts the step with [UniaxialMaterial::commit_state] or rejects it with
/// [UniaxialMaterial::revert_to_last_commit]. All quantities are engineering measures.
pub trait UniaxialMaterial: Send {
    /// Computes the trial state from the last committed state and a new strain
    ///
    /// The strain rate is accepted for compatibility with rate-dependent models.
    fn set_trial_strain(&mut self, strain: f64, strain_rate: f64) -> RebarResult<()>;

    /// Returns the trial strain
    fn strain(&self) -> f64;

    /// Returns the trial stress
    fn stress(&self) -> f64;

    /// Returns the trial tangent modulus
    fn tangent(&self) -> f64;

    /// Returns the initial tangent modulus
    fn initial_tangent(&self) -> f64;

    /// Accepts the trial state
    fn commit_state(&mut self) -> RebarResult<()>;

    /// Discards the trial state
    fn revert_to_last_commit(&mut self) -> RebarResult<()>;

    /// Resets the history to the virgin state
    fn revert_to_start(&mut self) -> RebarResult<()>;

    /// Returns an integer identifying the active branch of the response
    fn branch_id(&self) -> usize;

    /// Returns the cumulative damage index
    fn cumulative_damage(&self) -> f64;
}

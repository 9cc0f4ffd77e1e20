use approx::assert_abs_diff_eq;
use rebar::prelude::*;

/// Returns a strain history with small reversals nested within large ones
fn nested_path(n: usize) -> StrainPath {
    let mut path = StrainPath::new();
    for k in 1..=n {
        let t = k as f64;
        path.push(0.02 * f64::sin(0.07 * t) + 0.004 * f64::sin(0.9 * t) + 0.006 * f64::sin(0.23 * t));
    }
    path
}

#[test]
fn test_revert_is_idempotent() -> Result<(), RebarError> {
    let mut steel = ReinforcingSteel::new(&SampleParams::param_steel(), &Settings::new())?;
    for strain in &nested_path(300).strains {
        let before = steel.to_flat();
        let committed = steel.committed().clone();
        steel.set_trial_strain(*strain, 0.0)?;
        assert_eq!(steel.committed(), &committed);
        let trial = steel.to_flat();
        let (stress, tangent) = (steel.stress(), steel.tangent());

        steel.revert_to_last_commit()?;
        assert_eq!(steel.to_flat(), before);
        steel.revert_to_last_commit()?;
        assert_eq!(steel.to_flat(), before);

        steel.set_trial_strain(*strain, 0.0)?;
        assert_eq!(steel.stress(), stress);
        assert_eq!(steel.tangent(), tangent);
        assert_eq!(steel.to_flat(), trial);
        steel.commit_state()?;
    }
    Ok(())
}

#[test]
fn test_damage_never_decreases() -> Result<(), RebarError> {
    let mut steel = ReinforcingSteel::new(&SampleParams::param_steel(), &Settings::new())?;
    let responses = nested_path(600).follow(&mut steel)?;
    for pair in responses.windows(2) {
        assert!(pair[1].damage >= pair[0].damage);
    }
    assert!(steel.cumulative_damage() > 0.0);
    assert!(steel.scale_factor() < 1.0);
    assert!(!steel.failed());
    Ok(())
}

#[test]
fn test_branches_are_coherent() -> Result<(), RebarError> {
    for max_nesting in [1, 2, 10] {
        let mut settings = Settings::new();
        settings.max_nesting = max_nesting;
        let mut steel = ReinforcingSteel::new(&SampleParams::param_steel(), &settings)?;
        let mut deepest = 0;
        for strain in &nested_path(600).strains {
            steel.set_trial_strain(*strain, 0.0)?;
            let id = steel.branch_id();
            let depth = steel.trial().stack.depth();
            assert!(depth <= 2 * max_nesting + 1);
            deepest = usize::max(deepest, depth);
            match steel.active_anchors() {
                Some((start, target)) => {
                    assert!(id >= 3);
                    let x = steel.natural_strain();
                    let (lo, hi) = (f64::min(start.strain, target.strain), f64::max(start.strain, target.strain));
                    assert!(x >= lo - 1e-12 && x <= hi + 1e-12, "strain {} is outside [{}, {}]", x, lo, hi);
                    assert!(steel.tangent() > 0.0);
                }
                None => {
                    assert!(id <= 2);
                    assert_eq!(depth, 0);
                }
            }
            assert!(steel.stress().is_finite() && steel.tangent().is_finite());
            steel.commit_state()?;
        }
        assert!(deepest >= 3);
    }
    Ok(())
}

#[test]
fn test_loop_energy_does_not_increase() -> Result<(), RebarError> {
    let mut path = StrainPath::new();
    path.linear_to(0.02, 50);
    for _ in 0..5 {
        path.linear_to(-0.02, 100).linear_to(0.02, 100);
    }

    // with fatigue, the loops shrink after the first one
    let mut steel = ReinforcingSteel::new(&SampleParams::param_steel(), &Settings::new())?;
    let energies = loop_energies(&path.follow(&mut steel)?);
    assert_eq!(energies.len(), 5);
    assert_abs_diff_eq!(energies[0], 27.6, epsilon = 0.05);
    assert!(energies[1] <= energies[0]);
    for i in 1..4 {
        assert!(energies[i + 1] < energies[i]);
    }

    // without fatigue, the loops stabilize
    let mut steel = ReinforcingSteel::new(&SampleParams::param_steel_no_fatigue(), &Settings::new())?;
    let energies = loop_energies(&path.follow(&mut steel)?);
    assert_eq!(energies.len(), 5);
    for i in 0..4 {
        assert!(energies[i + 1] <= energies[i] * (1.0 + 1e-9));
    }
    assert_abs_diff_eq!(energies[4], energies[3], epsilon = 1e-6);
    Ok(())
}

use rebar::prelude::*;

fn nested_strain(k: usize) -> f64 {
    let t = k as f64;
    0.02 * f64::sin(0.07 * t) + 0.004 * f64::sin(0.9 * t) + 0.006 * f64::sin(0.23 * t)
}

fn assert_same_future(
    a: &mut ReinforcingSteel,
    b: &mut ReinforcingSteel,
    from: usize,
    to: usize,
) -> Result<(), RebarError> {
    for k in from..to {
        let strain = nested_strain(k);
        a.set_trial_strain(strain, 0.0)?;
        b.set_trial_strain(strain, 0.0)?;
        assert_eq!(a.stress(), b.stress());
        assert_eq!(a.tangent(), b.tangent());
        assert_eq!(a.branch_id(), b.branch_id());
        assert_eq!(a.cumulative_damage(), b.cumulative_damage());
        a.commit_state()?;
        b.commit_state()?;
    }
    Ok(())
}

#[test]
fn test_flat_state_round_trip() -> Result<(), RebarError> {
    let mut settings = Settings::new();
    settings.max_nesting = 2;
    let mut steel = ReinforcingSteel::new(&SampleParams::param_steel_gomes_appleton(), &settings)?;
    for k in 1..250 {
        steel.set_trial_strain(nested_strain(k), 0.0)?;
        steel.commit_state()?;
    }
    // uncommitted trial
    steel.set_trial_strain(nested_strain(250), 0.0)?;

    let data = steel.to_flat();
    let mut copy = ReinforcingSteel::from_flat(&data)?;
    assert_eq!(copy.to_flat(), data);
    assert_eq!(copy.stress(), steel.stress());
    assert_eq!(copy.branch_id(), steel.branch_id());

    steel.revert_to_last_commit()?;
    copy.revert_to_last_commit()?;
    assert_same_future(&mut steel, &mut copy, 250, 600)
}

#[test]
fn test_json_round_trip() -> Result<(), RebarError> {
    let mut steel = ReinforcingSteel::new(&SampleParams::param_steel(), &Settings::new())?;
    for k in 1..300 {
        steel.set_trial_strain(nested_strain(k), 0.0)?;
        steel.commit_state()?;
    }
    let path = "/tmp/rebar/test_json_round_trip.json";
    steel.write_json(path)?;
    let mut copy = ReinforcingSteel::read_json(path)?;
    assert_eq!(copy.to_flat(), steel.to_flat());
    assert_same_future(&mut steel, &mut copy, 300, 600)
}

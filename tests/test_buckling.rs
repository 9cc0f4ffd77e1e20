use rebar::prelude::*;

fn compare(buckled_param: &ParamSteel) -> Result<(), RebarError> {
    let mut plain = ReinforcingSteel::new(&SampleParams::param_steel_no_fatigue(), &Settings::new())?;
    let mut buckled = ReinforcingSteel::new(buckled_param, &Settings::new())?;
    let mut path = StrainPath::new();
    path.linear_to(0.02, 40).linear_to(-0.01, 60).linear_to(0.03, 80).linear_to(-0.02, 100);
    let mut reduced = 0;
    for strain in &path.strains {
        plain.set_trial_strain(*strain, 0.0)?;
        buckled.set_trial_strain(*strain, 0.0)?;

        // buckling only modifies the output; the ideal response is the same
        assert_eq!(buckled.trial().ideal_stress, plain.natural_stress());
        assert_eq!(buckled.branch_id(), plain.branch_id());
        if plain.stress() >= 0.0 {
            assert_eq!(buckled.stress(), plain.stress());
        } else {
            assert!(buckled.stress() <= 0.0);
            assert!(buckled.stress() >= plain.stress());
            if buckled.stress() > plain.stress() + 1.0 {
                reduced += 1;
            }
        }
        assert!(buckled.tangent().is_finite());
        plain.commit_state()?;
        buckled.commit_state()?;
    }
    assert!(reduced > 10);
    Ok(())
}

#[test]
fn test_gomes_appleton_reduces_compression() -> Result<(), RebarError> {
    compare(&SampleParams::param_steel_gomes_appleton())
}

#[test]
fn test_dhakal_maekawa_reduces_compression() -> Result<(), RebarError> {
    compare(&SampleParams::param_steel_dhakal_maekawa())
}

#[test]
fn test_buckling_reference_follows_the_tension_envelope() -> Result<(), RebarError> {
    let mut steel = ReinforcingSteel::new(&SampleParams::param_steel_gomes_appleton(), &Settings::new())?;
    steel.set_trial_strain(0.001, 0.0)?;
    steel.commit_state()?;
    steel.set_trial_strain(0.0, 0.0)?;
    steel.commit_state()?;
    assert_eq!(steel.committed().buckling_reference, rebar::base::natural_strain(0.001));
    steel.set_trial_strain(0.02, 0.0)?;
    steel.commit_state()?;
    assert_eq!(steel.branch_id(), 1);
    assert_eq!(steel.committed().buckling_reference, rebar::base::natural_strain(0.02));
    steel.set_trial_strain(0.01, 0.0)?;
    assert_eq!(steel.trial().buckling_reference, rebar::base::natural_strain(0.02));
    Ok(())
}

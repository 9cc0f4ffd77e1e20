use super::{ParamBuckling, ParamCurve, ParamFatigue, ParamHardening, ParamSteel};

/// Holds samples of reinforcing steel parameters
pub struct SampleParams {}

impl SampleParams {
    /// Returns parameters of a Grade 60 bar (MPa)
    pub fn param_steel() -> ParamSteel {
        ParamSteel {
            fy: 420.0,         // MPa
            fu: 630.0,         // MPa
            young: 200_000.0,  // MPa
            young_sh: 5_000.0, // MPa
            esh: 0.008,        // [-]
            eu: 0.12,          // [-]
            buckling: ParamBuckling::None,
            fatigue: ParamFatigue::default(),
            curve: ParamCurve::default(),
            hardening: ParamHardening::default(),
        }
    }

    /// Returns parameters of a Grade 60 bar without fatigue damage
    pub fn param_steel_no_fatigue() -> ParamSteel {
        ParamSteel {
            fatigue: ParamFatigue::disabled(),
            ..SampleParams::param_steel()
        }
    }

    /// Returns parameters of a slender bar with the Gomes-Appleton buckling model
    pub fn param_steel_gomes_appleton() -> ParamSteel {
        ParamSteel {
            buckling: ParamBuckling::GomesAppleton {
                slenderness: 8.0,
                beta: 1.0,
                r: 1.0,
            },
            fatigue: ParamFatigue::disabled(),
            ..SampleParams::param_steel()
        }
    }

    /// Returns parameters of a slender bar with the Dhakal-Maekawa buckling model
    pub fn param_steel_dhakal_maekawa() -> ParamSteel {
        ParamSteel {
            buckling: ParamBuckling::DhakalMaekawa {
                slenderness: 8.0,
                alpha: 1.0,
            },
            fatigue: ParamFatigue::disabled(),
            ..SampleParams::param_steel()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

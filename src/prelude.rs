//! Makes available common structures needed to drive the model
//!
//! You may write `use rebar::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{ParamBuckling, ParamCurve, ParamFatigue, ParamHardening, ParamSteel};
pub use crate::base::{RebarError, RebarResult, SampleParams, Settings};
pub use crate::material::{dissipated_energy, loop_energies, write_responses_csv};
pub use crate::material::{PathInput, ReinforcingSteel, Response, ResponsePlot, StrainPath, UniaxialMaterial};

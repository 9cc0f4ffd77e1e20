//! Implements the base structures: parameters, settings, errors and strain measures

mod conversions;
mod error;
mod parameters;
mod sample_params;
mod settings;
pub use crate::base::conversions::*;
pub use crate::base::error::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_params::*;
pub use crate::base::settings::*;

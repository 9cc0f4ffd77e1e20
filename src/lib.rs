//! Cyclic uniaxial constitutive model for reinforcing steel bars
//!
//! The model returns the stress and tangent of a bar under an arbitrary axial strain history,
//! including the yield plateau, strain hardening, the Bauschinger effect (Menegotto-Pinto
//! transition curves with memory of nested reversals), low-cycle fatigue and bar buckling.
//!
//! All input and output quantities are engineering measures; the internal computations use
//! natural (true) strains and stresses.

pub mod base;
pub mod material;
pub mod prelude;

pub use crate::base::{RebarError, RebarResult};

//! Implements the reinforcing steel model and its components

mod backbone;
mod branch_stack;
mod buckling;
mod fatigue;
mod hardening;
mod reinforcing_steel;
mod response_plot;
mod state_codec;
mod state_machine;
mod steel_state;
mod strain_path;
mod transition_curve;
mod uniaxial_material;
pub use crate::material::backbone::*;
pub use crate::material::branch_stack::*;
pub use crate::material::buckling::*;
pub use crate::material::fatigue::*;
pub use crate::material::hardening::*;
pub use crate::material::reinforcing_steel::*;
pub use crate::material::response_plot::*;
pub use crate::material::state_codec::*;
pub use crate::material::steel_state::*;
pub use crate::material::strain_path::*;
pub use crate::material::transition_curve::*;
pub use crate::material::uniaxial_material::*;

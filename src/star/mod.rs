mod assemble;
mod dimensions;
mod models;
mod reshape;

pub use assemble::{assemble, AssemblyStats, StarSchema};
pub use dimensions::{build_dimensions, Dimension, Dimensions};
pub use models::*;
pub use reshape::{reshape, MultiValuedFamily, Reshaped, RoleValue};

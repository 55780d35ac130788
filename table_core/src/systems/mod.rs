pub mod collision;
pub mod movement;
pub mod prediction;

pub use collision::*;
pub use movement::*;
pub use prediction::*;

mod percent;
mod shares;
mod tiers;

pub use percent::*;
pub use shares::*;
pub use tiers::*;

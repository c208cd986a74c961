mod inbox;
mod node_status;
mod progress;
mod task;

pub use inbox::*;
pub use node_status::*;
pub use progress::*;
pub use task::*;

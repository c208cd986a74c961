pub mod artifact;
pub mod conversion;
pub mod definition;
pub mod editor;

pub use artifact::*;
pub use conversion::*;
pub use definition::*;
pub use editor::*;

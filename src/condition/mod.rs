pub mod evaluator;
pub mod field;
pub mod operator;
pub mod routing;
pub mod value;

pub use evaluator::*;
pub use field::*;
pub use operator::*;
pub use routing::*;
pub use value::*;

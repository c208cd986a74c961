mod editor;
mod index;
pub mod rules;
mod validator;

pub use editor::GraphEditor;
pub use index::WorkflowGraph;
pub use rules::{GraphRule, RuleContext};
pub use validator::*;

pub mod constructors;
pub mod node;

pub use node::{Node, Operands, Operator, OperatorKind, Pattern, PatternField};

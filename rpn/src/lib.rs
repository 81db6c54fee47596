pub use crate::rpneval::{BinaryOp, EvalErr, Evaluator, EvaluatorBuilder, UnaryOp};

mod rpneval;

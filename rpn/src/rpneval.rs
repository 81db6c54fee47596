use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use num_traits::{Num, Pow};

/// Binary operation over the value type, applied as `op(left, right)`.
pub type BinaryOp<T> = Box<dyn Fn(T, T) -> T + Send + Sync>;
/// Unary operation over the value type.
pub type UnaryOp<T> = Box<dyn Fn(T) -> T + Send + Sync>;

#[derive(Debug, PartialEq)]
pub enum EvalErr {
    /// An operator token found fewer operands on the stack than its arity.
    MalformedExpression(String),
    /// A token that is neither a registered operator nor a parseable literal.
    InvalidToken(String),
    /// The stack didn't end holding exactly one value (payload: how many).
    UnbalancedExpression(usize),
}

impl fmt::Display for EvalErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErr::MalformedExpression(op) => {
                write!(f, "operator '{}' found too few operands", op)
            }
            EvalErr::InvalidToken(token) => write!(f, "invalid token '{}'", token),
            EvalErr::UnbalancedExpression(0) => write!(f, "expression produced no value"),
            EvalErr::UnbalancedExpression(depth) => {
                write!(f, "expression left {} values on the stack", depth)
            }
        }
    }
}

impl std::error::Error for EvalErr {}

// Operator set installed by Evaluator::new and EvaluatorBuilder::build.
// Only exists for types with a general power operation, hence the Pow bound.
fn default_binary_ops<T>() -> HashMap<String, BinaryOp<T>>
where
    T: Num + Pow<T, Output = T> + 'static,
{
    let mut ops: HashMap<String, BinaryOp<T>> = HashMap::new();
    ops.insert("+".to_string(), Box::new(|a, b| a + b));
    ops.insert("-".to_string(), Box::new(|a, b| a - b));
    ops.insert("*".to_string(), Box::new(|a, b| a * b));
    ops.insert("x".to_string(), Box::new(|a, b| a * b)); // alias of '*'
    ops.insert("/".to_string(), Box::new(|a, b| a / b));
    ops.insert("^".to_string(), Box::new(|a, b| a.pow(b)));
    ops
}

/// Evaluates postfix expressions over values of type `T`.
///
/// Operator tables are fixed at construction; `eval` builds its operand
/// stack locally, so a shared `Evaluator` can serve several threads as long
/// as the registered operations are thread-safe (the boxed callables are
/// `Send + Sync` by their type).
pub struct Evaluator<T> {
    binary_ops: HashMap<String, BinaryOp<T>>,
    unary_ops: HashMap<String, UnaryOp<T>>,
}

impl<T> Evaluator<T>
where
    T: Num + Pow<T, Output = T> + 'static,
{
    /// An evaluator with the default binary set `+ - * x / ^` and no unary
    /// operators. For value types without a power operation build the
    /// tables by hand and use `with_ops`.
    pub fn new() -> Self {
        Evaluator {
            binary_ops: default_binary_ops(),
            unary_ops: HashMap::new(),
        }
    }
}

impl<T> Default for Evaluator<T>
where
    T: Num + Pow<T, Output = T> + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Evaluator<T> {
    /// Start assembling an evaluator from the default operator set.
    pub fn builder() -> EvaluatorBuilder<T> {
        EvaluatorBuilder {
            binary_ops: HashMap::new(),
            unary_ops: HashMap::new(),
            replace_defaults: false,
        }
    }

    /// An evaluator using exactly the supplied tables, no defaults. This
    /// places no numeric bounds on `T` beyond what the callables themselves
    /// capture.
    pub fn with_ops(
        binary_ops: HashMap<String, BinaryOp<T>>,
        unary_ops: HashMap<String, UnaryOp<T>>,
    ) -> Self {
        Evaluator {
            binary_ops,
            unary_ops,
        }
    }

    /// Evaluate a space-separated postfix expression down to a single value.
    ///
    /// Tokens are maximal runs of non-space characters, processed left to
    /// right. A token matching a registered operator symbol is dispatched
    /// against the stack; anything else must parse as a literal via
    /// `T::from_str` and is pushed. Numeric behavior (overflow, rounding,
    /// division by zero) is whatever `T`'s own operations do.
    pub fn eval(&self, input: &str) -> Result<T, EvalErr>
    where
        T: FromStr,
    {
        let mut stack = Vec::new();

        for token in input.split(' ').filter(|t| !t.is_empty()) {
            if let Some(op) = self.binary_ops.get(token) {
                // right operand sits on top of the stack
                let r = stack
                    .pop()
                    .ok_or_else(|| EvalErr::MalformedExpression(token.to_string()))?;
                let l = stack
                    .pop()
                    .ok_or_else(|| EvalErr::MalformedExpression(token.to_string()))?;
                stack.push(op(l, r));
            } else if let Some(op) = self.unary_ops.get(token) {
                let o = stack
                    .pop()
                    .ok_or_else(|| EvalErr::MalformedExpression(token.to_string()))?;
                stack.push(op(o));
            } else {
                match token.parse::<T>() {
                    Ok(value) => stack.push(value),
                    Err(_) => return Err(EvalErr::InvalidToken(token.to_string())),
                }
            }
        }

        let result = stack.pop().ok_or(EvalErr::UnbalancedExpression(0))?;
        if stack.is_empty() {
            Ok(result)
        } else {
            Err(EvalErr::UnbalancedExpression(stack.len() + 1))
        }
    }
}

/// Assembles an `Evaluator`. Supplied binary entries extend the default set
/// (winning on symbol collision) unless `replace_defaults` is called, in
/// which case they become the whole table. Unary entries are always taken
/// verbatim since there are no default unary operators.
pub struct EvaluatorBuilder<T> {
    binary_ops: HashMap<String, BinaryOp<T>>,
    unary_ops: HashMap<String, UnaryOp<T>>,
    replace_defaults: bool,
}

impl<T: 'static> EvaluatorBuilder<T> {
    pub fn binary_op<F>(mut self, symbol: &str, op: F) -> Self
    where
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        self.binary_ops.insert(symbol.to_string(), Box::new(op));
        self
    }

    pub fn unary_op<F>(mut self, symbol: &str, op: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.unary_ops.insert(symbol.to_string(), Box::new(op));
        self
    }

    /// Discard the default binary set; only explicitly added operators will
    /// be recognized.
    pub fn replace_defaults(mut self) -> Self {
        self.replace_defaults = true;
        self
    }

    pub fn build(self) -> Evaluator<T>
    where
        T: Num + Pow<T, Output = T>,
    {
        let binary_ops = if self.replace_defaults {
            self.binary_ops
        } else {
            let mut ops = default_binary_ops();
            ops.extend(self.binary_ops);
            ops
        };
        Evaluator {
            binary_ops,
            unary_ops: self.unary_ops,
        }
    }
}

use std::rc::Rc;

use thiserror::Error;

/// The value carried between elements. There is deliberately no tri-state
/// or floating variant: an input that cannot be driven is a construction
/// error, not a runtime unknown.
pub type Signal = bool;

/// Shared handle to an element. Inputs are wired by cloning handles, so a
/// single `Vcc` or `Switch` can feed any number of gates.
pub type ElementRef = Rc<dyn Element>;

/// Default recursion budget for [`Element::evaluate`].
///
/// Deep enough for any realistic combinational nesting, shallow enough to
/// turn a cyclic subtree into [`EvaluationError::DepthExceeded`] before
/// the real stack runs out.
pub const MAX_EVAL_DEPTH: usize = 2048;

/// Remaining recursion budget, threaded through [`Element::eval`].
#[derive(Clone, Copy, Debug)]
pub struct Depth {
    remaining: usize,
    limit: usize,
}

impl Depth {
    pub fn root() -> Self {
        Self::limited(MAX_EVAL_DEPTH)
    }

    pub fn limited(limit: usize) -> Self {
        Depth {
            remaining: limit,
            limit,
        }
    }

    /// Spends one level of budget. Every `eval` implementation calls this
    /// exactly once before evaluating its inputs.
    pub fn deeper(self, element: &'static str) -> Result<Self, EvaluationError> {
        match self.remaining.checked_sub(1) {
            Some(remaining) => Ok(Depth { remaining, ..self }),
            None => Err(EvaluationError::DepthExceeded {
                element,
                limit: self.limit,
            }),
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::root()
    }
}

/// Anything that can be evaluated to a [`Signal`].
///
/// Evaluation is demand-driven and re-entrant: every call recomputes from
/// the current inputs, recursing to the source elements, and it is fine to
/// evaluate the same shared element several times within one outer call.
/// Nothing caches its last output.
pub trait Element {
    /// Element kind as it should appear in error reports.
    fn kind(&self) -> &'static str;

    /// Recursive step. Implementations spend a depth level via
    /// [`Depth::deeper`] and evaluate their inputs with the reduced
    /// budget.
    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError>;

    /// Evaluates this element with the default recursion budget.
    fn evaluate(&self) -> Result<Signal, EvaluationError> {
        self.eval(Depth::root())
    }

    /// Evaluates with a caller-chosen recursion budget.
    fn evaluate_depth_limited(&self, limit: usize) -> Result<Signal, EvaluationError> {
        self.eval(Depth::limited(limit))
    }
}

/// Rejected wiring, reported when an element is created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("{element} requires at least one input")]
    NoInputs { element: &'static str },
    #[error("{element} must be at least one bit wide")]
    ZeroWidth { element: &'static str },
}

/// Failure during recursive evaluation. There are no partial results: an
/// evaluation either resolves the whole subtree or returns one of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("evaluation depth limit {limit} exceeded at {element}; wiring likely contains a cycle")]
    DepthExceeded { element: &'static str, limit: usize },
    #[error("{element} reached with an unresolved input")]
    MissingInput { element: &'static str },
}

pub mod components;
pub mod gates;

mod element;
pub use element::{
    ConstructionError, Depth, Element, ElementRef, EvaluationError, Signal, MAX_EVAL_DEPTH,
};
pub use gates::{And, Ground, Inverter, Nand, Or, Switch, Vcc, Xor};

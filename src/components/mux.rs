use std::rc::Rc;

use crate::element::{Depth, Element, ElementRef, EvaluationError, Signal};
use crate::gates::{And, Inverter, Or};

/// Two-way multiplexer: `select` true picks `i1`, false picks `i0`.
///
/// Built structurally as `Or(And(select, i1), And(Inverter(select), i0))`
/// rather than as a native conditional, so it stays pure gate composition.
pub struct Multiplexer2 {
    out: ElementRef,
}

impl Multiplexer2 {
    pub fn new(select: ElementRef, i0: ElementRef, i1: ElementRef) -> Self {
        let pick1 = And::from_inputs(vec![select.clone(), i1]);
        let inverted: ElementRef = Rc::new(Inverter::new(select));
        let pick0 = And::from_inputs(vec![inverted, i0]);
        let out = Rc::new(Or::from_inputs(vec![Rc::new(pick1), Rc::new(pick0)]));
        Multiplexer2 { out }
    }
}

impl Element for Multiplexer2 {
    fn kind(&self) -> &'static str {
        "Multiplexer2"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        let depth = depth.deeper(self.kind())?;
        self.out.eval(depth)
    }
}

/// Four-way multiplexer with two select lines.
///
/// Same Or-of-Ands pattern as [`Multiplexer2`]: each input gets an AND arm
/// gated by the matching decode of the select pair, and the arms merge in
/// one OR. Each select line and its inversion are single shared elements
/// feeding two arms apiece.
pub struct Multiplexer4 {
    out: ElementRef,
}

impl Multiplexer4 {
    /// `select[0]` is the low bit: the chosen input index is
    /// `select[1] * 2 + select[0]`.
    pub fn new(select: [ElementRef; 2], inputs: [ElementRef; 4]) -> Self {
        let [s0, s1] = select;
        let n0: ElementRef = Rc::new(Inverter::new(s0.clone()));
        let n1: ElementRef = Rc::new(Inverter::new(s1.clone()));
        let [i0, i1, i2, i3] = inputs;
        let arms: Vec<ElementRef> = vec![
            Rc::new(And::from_inputs(vec![n1.clone(), n0.clone(), i0])),
            Rc::new(And::from_inputs(vec![n1, s0.clone(), i1])),
            Rc::new(And::from_inputs(vec![s1.clone(), n0, i2])),
            Rc::new(And::from_inputs(vec![s1, s0, i3])),
        ];
        Multiplexer4 {
            out: Rc::new(Or::from_inputs(arms)),
        }
    }
}

impl Element for Multiplexer4 {
    fn kind(&self) -> &'static str {
        "Multiplexer4"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        let depth = depth.deeper(self.kind())?;
        self.out.eval(depth)
    }
}

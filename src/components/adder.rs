use std::rc::Rc;

use crate::components::bus::Bus;
use crate::element::{ConstructionError, Element, ElementRef, EvaluationError, Signal};
use crate::gates::{And, Or, Xor};

/// Adds two bits: `sum = Xor(i0, i1)`, `cout = And(i0, i1)`.
///
/// The outputs are ordinary shared elements, so they can feed further
/// circuitry; `evaluate` is a convenience that resolves both.
pub struct HalfAdder {
    pub sum: ElementRef,
    pub cout: ElementRef,
}

impl HalfAdder {
    pub fn new(i0: ElementRef, i1: ElementRef) -> Self {
        let sum = Rc::new(Xor::from_inputs(vec![i0.clone(), i1.clone()]));
        let cout = Rc::new(And::from_inputs(vec![i0, i1]));
        HalfAdder { sum, cout }
    }

    /// Returns `(sum, carry_out)`, recomputed from the current inputs.
    pub fn evaluate(&self) -> Result<(Signal, Signal), EvaluationError> {
        Ok((self.sum.evaluate()?, self.cout.evaluate()?))
    }
}

/// Adds two bits and a carry, chained out of two [`HalfAdder`]s.
pub struct FullAdder {
    pub sum: ElementRef,
    pub cout: ElementRef,
}

impl FullAdder {
    pub fn new(cin: ElementRef, i0: ElementRef, i1: ElementRef) -> Self {
        let h0 = HalfAdder::new(i0, i1);
        let h1 = HalfAdder::new(cin, h0.sum);
        let cout = Rc::new(Or::from_inputs(vec![h0.cout, h1.cout]));
        FullAdder { sum: h1.sum, cout }
    }

    /// Returns `(sum, carry_out)`, recomputed from the current inputs.
    pub fn evaluate(&self) -> Result<(Signal, Signal), EvaluationError> {
        Ok((self.sum.evaluate()?, self.cout.evaluate()?))
    }
}

/// Chain of [`FullAdder`]s over two switch-backed input buses.
pub struct RippleCarryAdder<const BITS: usize> {
    pub input_a: Bus<BITS>,
    pub input_b: Bus<BITS>,
    pub sum: [ElementRef; BITS],
    pub cout: ElementRef,
}

impl<const BITS: usize> RippleCarryAdder<BITS> {
    pub fn new(cin: ElementRef) -> Result<Self, ConstructionError> {
        if BITS == 0 {
            return Err(ConstructionError::ZeroWidth {
                element: "RippleCarryAdder",
            });
        }

        let input_a = Bus::new();
        let input_b = Bus::new();
        let mut carry = cin;
        let sum = std::array::from_fn(|i| {
            let adder = FullAdder::new(carry.clone(), input_a.line(i), input_b.line(i));
            carry = adder.cout;
            adder.sum
        });
        Ok(RippleCarryAdder {
            input_a,
            input_b,
            sum,
            cout: carry,
        })
    }
}

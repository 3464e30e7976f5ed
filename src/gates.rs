use std::cell::Cell;

use crate::element::{ConstructionError, Depth, Element, ElementRef, EvaluationError, Signal};

/// Supply rail: no inputs, always true.
pub struct Vcc;

impl Element for Vcc {
    fn kind(&self) -> &'static str {
        "Vcc"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        depth.deeper(self.kind())?;
        Ok(true)
    }
}

/// Ground rail: no inputs, always false.
pub struct Ground;

impl Element for Ground {
    fn kind(&self) -> &'static str {
        "Ground"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        depth.deeper(self.kind())?;
        Ok(false)
    }
}

/// Negates its single input.
pub struct Inverter {
    input: ElementRef,
}

impl Inverter {
    pub fn new(input: ElementRef) -> Self {
        Self { input }
    }
}

impl Element for Inverter {
    fn kind(&self) -> &'static str {
        "Inverter"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        let depth = depth.deeper(self.kind())?;
        Ok(!self.input.eval(depth)?)
    }
}

macro_rules! nary_gate {
    ( $(#[$doc:meta])* $name:ident ) => {
        $(#[$doc])*
        pub struct $name {
            inputs: Vec<ElementRef>,
        }

        impl $name {
            pub fn new(inputs: Vec<ElementRef>) -> Result<Self, ConstructionError> {
                if inputs.is_empty() {
                    return Err(ConstructionError::NoInputs {
                        element: stringify!($name),
                    });
                }
                Ok(Self::from_inputs(inputs))
            }

            pub(crate) fn from_inputs(inputs: Vec<ElementRef>) -> Self {
                debug_assert!(!inputs.is_empty());
                Self { inputs }
            }
        }
    };
}

nary_gate! {
    /// True iff every input is true.
    And
}

nary_gate! {
    /// True iff at least one input is true.
    Or
}

nary_gate! {
    /// One-hot: true iff exactly one input is true. For two inputs this is
    /// ordinary exclusive-or; for more it is NOT pairwise parity.
    Xor
}

impl Element for And {
    fn kind(&self) -> &'static str {
        "And"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        let depth = depth.deeper(self.kind())?;
        // No short-circuit: every call walks the full subtree, so a cycle
        // or unresolved input is reported even behind a dominant sibling.
        let mut all = true;
        for input in &self.inputs {
            all &= input.eval(depth)?;
        }
        Ok(all)
    }
}

impl Element for Or {
    fn kind(&self) -> &'static str {
        "Or"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        let depth = depth.deeper(self.kind())?;
        let mut any = false;
        for input in &self.inputs {
            any |= input.eval(depth)?;
        }
        Ok(any)
    }
}

impl Element for Xor {
    fn kind(&self) -> &'static str {
        "Xor"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        let depth = depth.deeper(self.kind())?;
        let mut active = 0usize;
        for input in &self.inputs {
            if input.eval(depth)? {
                active += 1;
            }
        }
        Ok(active == 1)
    }
}

/// Negated And over the same input list.
///
/// Built by composition (an [`Inverter`] over an [`And`]) rather than as
/// its own reduction.
pub struct Nand {
    inner: Inverter,
}

impl Nand {
    pub fn new(inputs: Vec<ElementRef>) -> Result<Self, ConstructionError> {
        if inputs.is_empty() {
            return Err(ConstructionError::NoInputs { element: "Nand" });
        }
        let and = And::from_inputs(inputs);
        Ok(Self {
            inner: Inverter::new(std::rc::Rc::new(and)),
        })
    }
}

impl Element for Nand {
    fn kind(&self) -> &'static str {
        "Nand"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        let depth = depth.deeper(self.kind())?;
        self.inner.eval(depth)
    }
}

/// Wraps one input and adds a togglable inversion flag, the only mutable
/// state in the system.
///
/// `flip()` has no effect until the next `evaluate()`, which reads the
/// flag at call time. Flipping while an evaluation of the same switch is
/// in flight is unsupported; everything here is single-threaded.
pub struct Switch {
    input: ElementRef,
    flipped: Cell<bool>,
}

impl Switch {
    pub fn new(input: ElementRef) -> Self {
        Self {
            input,
            flipped: Cell::new(false),
        }
    }

    /// Toggles the inversion flag. No recomputation happens here.
    pub fn flip(&self) {
        self.flipped.set(!self.flipped.get());
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped.get()
    }
}

impl Element for Switch {
    fn kind(&self) -> &'static str {
        "Switch"
    }

    fn eval(&self, depth: Depth) -> Result<Signal, EvaluationError> {
        let depth = depth.deeper(self.kind())?;
        Ok(self.input.eval(depth)? ^ self.flipped.get())
    }
}

pub mod ops {
    use std::rc::Rc;

    use super::{And, Ground, Inverter, Nand, Or, Switch, Vcc, Xor};
    use crate::element::{ConstructionError, ElementRef};

    pub use crate::{and, nand, or, xor};

    macro_rules! gate_fn_gen {
        ( $gate_lowercase:ident, $gate_uppercase:ident ) => {
            pub fn $gate_lowercase(
                inputs: Vec<ElementRef>,
            ) -> Result<ElementRef, ConstructionError> {
                Ok(Rc::new($gate_uppercase::new(inputs)?))
            }
        };
    }

    gate_fn_gen!(and, And);
    gate_fn_gen!(or, Or);
    gate_fn_gen!(xor, Xor);
    gate_fn_gen!(nand, Nand);

    pub fn vcc() -> ElementRef {
        Rc::new(Vcc)
    }

    pub fn ground() -> ElementRef {
        Rc::new(Ground)
    }

    pub fn inverter(input: ElementRef) -> ElementRef {
        Rc::new(Inverter::new(input))
    }

    pub fn switch(input: ElementRef) -> Rc<Switch> {
        Rc::new(Switch::new(input))
    }

    #[macro_export]
    macro_rules! and {
        ( $( $inputs:expr ),+ ) => {
            and(vec!($($inputs.clone()),+))
        };
    }

    #[macro_export]
    macro_rules! or {
        ( $( $inputs:expr ),+ ) => {
            or(vec!($($inputs.clone()),+))
        };
    }

    #[macro_export]
    macro_rules! xor {
        ( $( $inputs:expr ),+ ) => {
            xor(vec!($($inputs.clone()),+))
        };
    }

    #[macro_export]
    macro_rules! nand {
        ( $( $inputs:expr ),+ ) => {
            nand(vec!($($inputs.clone()),+))
        };
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::ops::*;
    use super::*;

    fn sig(val: bool) -> ElementRef {
        if val {
            vcc()
        } else {
            ground()
        }
    }

    fn signals(bits: u32, n: usize) -> Vec<ElementRef> {
        (0..n).map(|i| sig(bits & (1 << i) != 0)).collect()
    }

    fn gate_test_gen(
        name: &str,
        f: fn(Vec<ElementRef>) -> Result<ElementRef, ConstructionError>,
        expecteds: [bool; 4],
    ) {
        let combos = [(false, false), (false, true), (true, false), (true, true)];
        for ((in_a, in_b), expected) in combos.into_iter().zip(expecteds) {
            let out = f(vec![sig(in_a), sig(in_b)]).unwrap();
            let result = out.evaluate().unwrap();
            assert_eq!(result, expected, "{in_a} {name} {in_b} = {expected}");
        }
    }

    #[test]
    fn sources() {
        assert_eq!(Vcc.evaluate(), Ok(true));
        assert_eq!(Ground.evaluate(), Ok(false));
    }

    #[test]
    fn inverter_negates() {
        assert_eq!(Inverter::new(vcc()).evaluate(), Ok(false));
        assert_eq!(Inverter::new(ground()).evaluate(), Ok(true));
    }

    #[test]
    fn gate_tests() {
        gate_test_gen("and", and, [false, false, false, true]);
        gate_test_gen("or", or, [false, true, true, true]);
        gate_test_gen("xor", xor, [false, true, true, false]);
        gate_test_gen("nand", nand, [true, true, true, false]);
    }

    #[test]
    fn and_is_exhaustively_conjunction_up_to_four_inputs() {
        for n in 1..=4usize {
            for bits in 0..(1u32 << n) {
                let out = and(signals(bits, n)).unwrap();
                let expected = bits == (1 << n) - 1;
                assert_eq!(out.evaluate(), Ok(expected), "and over {bits:04b}");
            }
        }
    }

    #[test]
    fn or_is_disjunction_for_three_inputs() {
        for bits in 0..8u32 {
            let out = or(signals(bits, 3)).unwrap();
            assert_eq!(out.evaluate(), Ok(bits != 0), "or over {bits:03b}");
        }
    }

    #[test]
    fn xor_is_one_hot_for_three_inputs() {
        for bits in 0..8u32 {
            let out = xor(signals(bits, 3)).unwrap();
            let expected = bits.count_ones() == 1;
            assert_eq!(out.evaluate(), Ok(expected), "xor over {bits:03b}");
        }
    }

    #[test]
    fn nand_always_negates_and() {
        for n in 1..=3usize {
            for bits in 0..(1u32 << n) {
                let nand_out = nand(signals(bits, n)).unwrap();
                let and_out = and(signals(bits, n)).unwrap();
                assert_eq!(
                    nand_out.evaluate().unwrap(),
                    !and_out.evaluate().unwrap(),
                    "nand vs and over {bits:b}"
                );
            }
        }
    }

    #[test]
    fn gates_reject_empty_input_lists() {
        assert_eq!(
            And::new(Vec::new()).err(),
            Some(ConstructionError::NoInputs { element: "And" })
        );
        assert_eq!(
            Or::new(Vec::new()).err(),
            Some(ConstructionError::NoInputs { element: "Or" })
        );
        assert_eq!(
            Xor::new(Vec::new()).err(),
            Some(ConstructionError::NoInputs { element: "Xor" })
        );
        assert_eq!(
            Nand::new(Vec::new()).err(),
            Some(ConstructionError::NoInputs { element: "Nand" })
        );
    }

    #[test]
    fn switch_flip_laws() {
        let base = vcc();
        let s = switch(base.clone());
        assert_eq!(s.evaluate(), base.evaluate());
        s.flip();
        assert_eq!(s.evaluate(), Ok(!base.evaluate().unwrap()));
        s.flip();
        assert_eq!(s.evaluate(), base.evaluate());
    }

    #[test]
    fn flip_takes_effect_on_next_evaluation_only() {
        let s = switch(ground());
        assert_eq!(s.evaluate(), Ok(false));
        s.flip();
        s.flip();
        s.flip();
        assert_eq!(s.evaluate(), Ok(true));
    }

    #[test]
    fn reevaluation_is_stable() {
        let a = sig(true);
        let b = sig(false);
        let out = or(vec![
            and(vec![a.clone(), b.clone()]).unwrap(),
            xor(vec![a, b]).unwrap(),
        ])
        .unwrap();
        let first = out.evaluate();
        assert_eq!(out.evaluate(), first);
        assert_eq!(out.evaluate(), first);
    }

    #[test]
    fn shared_element_feeds_many_gates() {
        let rail = vcc();
        let out = and(vec![rail.clone(), rail.clone(), rail.clone()]).unwrap();
        assert_eq!(out.evaluate(), Ok(true));
        assert_eq!(Rc::strong_count(&rail), 4);
    }

    #[test]
    fn macros_build_gates_from_shared_handles() {
        let a = vcc();
        let b = ground();
        let out = or!(and!(a, b).unwrap(), xor!(a, b).unwrap()).unwrap();
        assert_eq!(out.evaluate(), Ok(true));
    }

    #[test]
    fn deep_but_acyclic_wiring_stays_within_budget() {
        let mut line = ground();
        for _ in 0..64 {
            line = inverter(line);
        }
        assert_eq!(line.evaluate(), Ok(false));
        assert_eq!(
            line.evaluate_depth_limited(8),
            Err(EvaluationError::DepthExceeded {
                element: "Inverter",
                limit: 8,
            })
        );
    }
}

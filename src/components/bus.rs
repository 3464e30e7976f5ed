use std::ops::{BitAnd, Shl};
use std::rc::Rc;

use num_traits::Unsigned;

use crate::element::{Element, ElementRef, EvaluationError};
use crate::gates::{Ground, Switch};

/// Fixed-width bundle of switch-backed lines, used to drive multi-bit
/// inputs from integers in tests and benches.
///
/// Every line is a [`Switch`] over one shared [`Ground`], so an unflipped
/// line reads false and `set` reduces to flipping the lines whose flag
/// disagrees with the target bit.
pub struct Bus<const BITS: usize> {
    lines: [Rc<Switch>; BITS],
}

impl<const BITS: usize> Bus<BITS> {
    pub fn new() -> Self {
        let ground: ElementRef = Rc::new(Ground);
        Bus {
            lines: std::array::from_fn(|_| Rc::new(Switch::new(ground.clone()))),
        }
    }

    /// Shared handle to one line, for wiring into a circuit.
    pub fn line(&self, bit: usize) -> ElementRef {
        self.lines[bit].clone()
    }

    pub fn read<T>(&self) -> Result<T, EvaluationError>
    where
        T: Unsigned + Shl<usize, Output = T>,
    {
        let mut sum = T::zero();
        for (bit, line) in self.lines.iter().enumerate() {
            if line.evaluate()? {
                sum = sum + (T::one() << bit);
            }
        }
        Ok(sum)
    }

    pub fn set<T>(&self, val: T)
    where
        T: Unsigned + Copy + BitAnd<T, Output = T> + Shl<usize, Output = T>,
    {
        for (bit, line) in self.lines.iter().enumerate() {
            let bit_val = !(val & (T::one() << bit)).is_zero();
            if line.is_flipped() != bit_val {
                line.flip();
            }
        }
    }
}

impl<const BITS: usize> Default for Bus<BITS> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a slice of output lines as an unsigned integer, line 0 being the
/// least significant bit.
pub fn read_lines<T>(lines: &[ElementRef]) -> Result<T, EvaluationError>
where
    T: Unsigned + Shl<usize, Output = T>,
{
    let mut sum = T::zero();
    for (bit, line) in lines.iter().enumerate() {
        if line.evaluate()? {
            sum = sum + (T::one() << bit);
        }
    }
    Ok(sum)
}

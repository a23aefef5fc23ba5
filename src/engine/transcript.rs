//! A value-free record of every gate executed by the engine.
//!
//! Two computations over inputs of the same public shape must produce the same transcript,
//! otherwise the control flow depended on private data.

use serde::{Deserialize, Serialize};

use crate::Error;

/// A single gate executed by the engine. Carries no secret data, only public parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gate {
    /// A private number contributed by the party.
    Input(usize),
    /// A private boolean contributed by the party.
    InputBit(usize),
    /// A public number.
    Constant,
    /// A public boolean.
    ConstantBit,
    /// Local addition.
    Add,
    /// Local subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Equality test.
    Eq,
    /// Less-than test.
    Lt,
    /// Local negation.
    Not,
    /// Conjunction.
    And,
    /// Oblivious selection.
    Select,
    /// Boolean to number conversion.
    Lift,
    /// Square root.
    Sqrt,
    /// Binary logarithm.
    Log2,
    /// Binary exponential.
    Exp2,
    /// Disclosure of a number.
    Reveal,
    /// Disclosure of a boolean.
    RevealBit,
    /// Termination of the joint computation.
    Abort,
}

/// The ordered gates executed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    gates: Vec<Gate>,
}

impl Transcript {
    pub(crate) fn push(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    /// All gates in execution order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// How often the given gate was executed.
    pub fn count(&self, gate: Gate) -> usize {
        self.gates.iter().filter(|g| **g == gate).count()
    }

    /// Number of disclosures of numbers and booleans.
    pub fn reveals(&self) -> usize {
        self.count(Gate::Reveal) + self.count(Gate::RevealBit)
    }

    /// A BLAKE3 digest of the serialized gate sequence.
    pub fn digest(&self) -> Result<blake3::Hash, Error> {
        let serialized = bincode::serialize(&self.gates)?;
        Ok(blake3::hash(&serialized))
    }
}

//! Secret-shared values and booleans held by the simulated parties.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A number additively shared over `Z_2^64`: the value is the wrapping sum of all shares.
///
/// Share `i` is held by party `i`. No single share says anything about the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedValue(pub(crate) Vec<u64>);

/// A boolean XOR-shared between the parties: the value is the XOR of all shares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedBit(pub(crate) Vec<bool>);

impl SharedValue {
    /// The share held by the given party.
    pub fn party_share(&self, party: usize) -> Option<u64> {
        self.0.get(party).copied()
    }

    pub(crate) fn reconstruct(&self) -> i64 {
        self.0.iter().fold(0u64, |acc, s| acc.wrapping_add(*s)) as i64
    }
}

impl SharedBit {
    /// The share held by the given party.
    pub fn party_share(&self, party: usize) -> Option<bool> {
        self.0.get(party).copied()
    }

    pub(crate) fn reconstruct(&self) -> bool {
        self.0.iter().fold(false, |acc, s| acc ^ s)
    }

    /// Negation only needs one party to flip its share.
    pub(crate) fn negate(&self) -> SharedBit {
        let mut shares = self.0.clone();
        if let Some(first) = shares.first_mut() {
            *first = !*first;
        }
        SharedBit(shares)
    }
}

impl Add for &SharedValue {
    type Output = SharedValue;

    fn add(self, rhs: Self) -> Self::Output {
        let SharedValue(a) = self;
        let SharedValue(b) = rhs;
        SharedValue(a.iter().zip(b).map(|(a, b)| a.wrapping_add(*b)).collect())
    }
}

impl Sub for &SharedValue {
    type Output = SharedValue;

    fn sub(self, rhs: Self) -> Self::Output {
        let SharedValue(a) = self;
        let SharedValue(b) = rhs;
        SharedValue(a.iter().zip(b).map(|(a, b)| a.wrapping_sub(*b)).collect())
    }
}

//! A (semi-)trusted dealer evaluating the non-linear gates of the simulated engine.
//!
//! The dealer receives the shares of a gate's inputs from all parties, reconstructs them,
//! evaluates the gate and deals fresh random shares of the output. Comparisons and selections are
//! evaluated with constant-time primitives, so that the dealer's own execution does not depend on
//! the secrets either.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater};

use crate::{
    engine::shares::{SharedBit, SharedValue},
    fixed::FixedPointConfig,
};

const SIGN_BIT: u64 = 1 << 63;

pub(crate) struct Dealer {
    parties: usize,
    config: FixedPointConfig,
    rng: ChaCha20Rng,
}

impl Dealer {
    pub(crate) fn new(parties: usize, config: FixedPointConfig, seed: [u8; 32]) -> Self {
        Self {
            parties,
            config,
            rng: ChaCha20Rng::from_seed(seed),
        }
    }

    /// Splits `value` into fresh random additive shares.
    pub(crate) fn share_value(&mut self, value: i64) -> SharedValue {
        let mut shares: Vec<u64> = (1..self.parties).map(|_| self.rng.next_u64()).collect();
        let masked = shares
            .iter()
            .fold(value as u64, |acc, s| acc.wrapping_sub(*s));
        shares.insert(0, masked);
        SharedValue(shares)
    }

    /// Splits `bit` into fresh random XOR shares.
    pub(crate) fn share_bit(&mut self, bit: bool) -> SharedBit {
        let mut shares: Vec<bool> = (1..self.parties).map(|_| self.rng.random()).collect();
        let masked = shares.iter().fold(bit, |acc, s| acc ^ s);
        shares.insert(0, masked);
        SharedBit(shares)
    }

    pub(crate) fn mul(&mut self, a: &SharedValue, b: &SharedValue) -> SharedValue {
        let product = self
            .config
            .mul(a.reconstruct(), b.reconstruct(), &mut self.rng);
        self.share_value(product)
    }

    pub(crate) fn div(&mut self, a: &SharedValue, b: &SharedValue) -> SharedValue {
        let quotient = self.config.div(a.reconstruct(), b.reconstruct());
        self.share_value(quotient)
    }

    pub(crate) fn eq(&mut self, a: &SharedValue, b: &SharedValue) -> SharedBit {
        let equal = (a.reconstruct() as u64).ct_eq(&(b.reconstruct() as u64));
        self.share_bit(equal.into())
    }

    pub(crate) fn lt(&mut self, a: &SharedValue, b: &SharedValue) -> SharedBit {
        // flipping the sign bit maps two's complement order onto unsigned order
        let a = (a.reconstruct() as u64) ^ SIGN_BIT;
        let b = (b.reconstruct() as u64) ^ SIGN_BIT;
        self.share_bit(b.ct_gt(&a).into())
    }

    pub(crate) fn and(&mut self, a: &SharedBit, b: &SharedBit) -> SharedBit {
        let both = Choice::from(a.reconstruct() as u8) & Choice::from(b.reconstruct() as u8);
        self.share_bit(both.into())
    }

    pub(crate) fn select(
        &mut self,
        cond: &SharedBit,
        a: &SharedValue,
        b: &SharedValue,
    ) -> SharedValue {
        let choice = Choice::from(cond.reconstruct() as u8);
        let selected = u64::conditional_select(
            &(b.reconstruct() as u64),
            &(a.reconstruct() as u64),
            choice,
        );
        self.share_value(selected as i64)
    }

    pub(crate) fn lift(&mut self, bit: &SharedBit) -> SharedValue {
        let choice = Choice::from(bit.reconstruct() as u8);
        let lifted = u64::conditional_select(&0, &(self.config.one() as u64), choice);
        self.share_value(lifted as i64)
    }

    /// Evaluates an approximated real function on the decoded input.
    pub(crate) fn approximate(&mut self, a: &SharedValue, f: impl Fn(f64) -> f64) -> SharedValue {
        let input = self.config.decode(a.reconstruct());
        let output = self.config.encode_saturating(f(input));
        self.share_value(output)
    }
}

//! The contract of the secret arithmetic engine that all statistics are written against.

use std::fmt;

use crate::Error;

/// A secure arithmetic engine shared by all parties of a joint computation.
///
/// A statistic is described once as a fixed sequence of calls on this trait. Loop bounds and
/// branches may only depend on public shape; a secret [`Substrate::Bit`] can only be consumed by
/// [`Substrate::select`], [`Substrate::select_bit`], [`Substrate::lift`], the boolean gates, or
/// be made public with [`Substrate::reveal_bit`].
pub trait Substrate {
    /// A secret fixed-point number.
    type Value: Clone + fmt::Debug;
    /// A secret boolean. Deliberately has no conversion to `bool`.
    type Bit: Clone + fmt::Debug;

    /// The number of parties taking part in the computation.
    fn parties(&self) -> usize;

    /// Secret-shares a private number contributed by `party`.
    fn input(&mut self, party: usize, value: f64) -> Result<Self::Value, Error>;

    /// Secret-shares a private boolean contributed by `party`.
    fn input_bit(&mut self, party: usize, bit: bool) -> Result<Self::Bit, Error>;

    /// Lifts a public constant into the secret domain.
    fn constant(&mut self, value: f64) -> Self::Value;

    /// Lifts a public boolean into the secret domain.
    fn constant_bit(&mut self, bit: bool) -> Self::Bit;

    /// `a + b`
    fn add(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// `a - b`
    fn sub(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// `a * b`
    fn mul(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// `a / b`. Dividing by a secret zero does not fault, the result is unspecified.
    fn div(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// `a == b`
    fn eq(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Bit;

    /// `a < b`
    fn lt(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Bit;

    /// `a > b`
    fn gt(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Bit {
        self.lt(b, a)
    }

    /// `a <= b`
    fn le(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Bit {
        let gt = self.lt(b, a);
        self.not(&gt)
    }

    /// `a >= b`
    fn ge(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Bit {
        let lt = self.lt(a, b);
        self.not(&lt)
    }

    /// `!a`
    fn not(&mut self, a: &Self::Bit) -> Self::Bit;

    /// `a & b`
    fn and(&mut self, a: &Self::Bit, b: &Self::Bit) -> Self::Bit;

    /// `a | b`
    fn or(&mut self, a: &Self::Bit, b: &Self::Bit) -> Self::Bit {
        let not_a = self.not(a);
        let not_b = self.not(b);
        let neither = self.and(&not_a, &not_b);
        self.not(&neither)
    }

    /// Oblivious `if cond { a } else { b }` on numbers.
    fn select(&mut self, cond: &Self::Bit, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Oblivious `if cond { a } else { b }` on booleans.
    fn select_bit(&mut self, cond: &Self::Bit, a: &Self::Bit, b: &Self::Bit) -> Self::Bit {
        let take_a = self.and(cond, a);
        let not_cond = self.not(cond);
        let take_b = self.and(&not_cond, b);
        self.or(&take_a, &take_b)
    }

    /// Converts a secret boolean into the secret number `0` or `1`.
    fn lift(&mut self, bit: &Self::Bit) -> Self::Value;

    /// Fixed-point approximation of the square root.
    fn sqrt(&mut self, a: &Self::Value) -> Self::Value;

    /// Fixed-point approximation of the binary logarithm.
    fn log2(&mut self, a: &Self::Value) -> Self::Value;

    /// Fixed-point approximation of `2^a`.
    fn exp2(&mut self, a: &Self::Value) -> Self::Value;

    /// Makes a secret number public to all parties.
    ///
    /// This is a synchronization point: it completes only once all parties agree on the value.
    fn reveal(&mut self, a: &Self::Value) -> Result<f64, Error>;

    /// Makes a secret boolean public to all parties.
    fn reveal_bit(&mut self, a: &Self::Bit) -> Result<bool, Error>;

    /// Terminates the joint computation for every party with a public message.
    ///
    /// Returns the error that the caller should propagate. There is no recovery: every later
    /// reveal fails with the same error.
    fn abort(&mut self, message: &str) -> Error;
}

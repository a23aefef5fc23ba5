//! An in-process simulation of the secret arithmetic engine for `n` parties.
//!
//! Every party holds one additive share of each secret number (and one XOR share of each secret
//! boolean). Linear gates are computed locally on the shares, non-linear gates are delegated to a
//! trusted dealer. All gates are recorded in a [`Transcript`], which makes the
//! data-independence of a computation observable.

use tracing::{debug, trace, warn};

use crate::{
    Error,
    fixed::FixedPointConfig,
    substrate::Substrate,
};

mod dealer;
mod shares;
mod transcript;

use dealer::Dealer;
pub use shares::{SharedBit, SharedValue};
pub use transcript::{Gate, Transcript};

/// Simulates a joint computation of several parties in a single process.
pub struct SimulatedEngine {
    parties: usize,
    config: FixedPointConfig,
    dealer: Dealer,
    transcript: Transcript,
    aborted: Option<String>,
}

impl std::fmt::Debug for SimulatedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedEngine")
            .field("parties", &self.parties)
            .field("config", &self.config)
            .field("gates", &self.transcript.gates().len())
            .field("aborted", &self.aborted)
            .finish()
    }
}

impl SimulatedEngine {
    /// Creates an engine for `parties` parties, seeding the dealer from the OS.
    pub fn new(parties: usize, config: FixedPointConfig) -> Result<Self, Error> {
        Self::from_seed(parties, config, rand::random())
    }

    /// Creates an engine whose share randomness is derived from `seed`, for reproducible runs.
    pub fn with_seed(parties: usize, config: FixedPointConfig, seed: u64) -> Result<Self, Error> {
        let mut expanded = [0; 32];
        expanded[..8].copy_from_slice(&seed.to_le_bytes());
        Self::from_seed(parties, config, expanded)
    }

    fn from_seed(parties: usize, config: FixedPointConfig, seed: [u8; 32]) -> Result<Self, Error> {
        if parties < 2 {
            return Err(Error::TooFewParties(parties));
        }
        config.validate()?;
        debug!(parties, ?config, "Starting simulated engine");
        Ok(Self {
            parties,
            config,
            dealer: Dealer::new(parties, config, seed),
            transcript: Transcript::default(),
            aborted: None,
        })
    }

    /// The fixed-point format of this computation.
    pub fn config(&self) -> &FixedPointConfig {
        &self.config
    }

    /// The gates executed so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The abort message, if the computation was aborted.
    pub fn aborted(&self) -> Option<&str> {
        self.aborted.as_deref()
    }

    fn check_party(&self, party: usize) -> Result<(), Error> {
        if party < self.parties {
            Ok(())
        } else {
            Err(Error::PartyDoesNotExist(party))
        }
    }

    fn check_aborted(&self) -> Result<(), Error> {
        match &self.aborted {
            Some(message) => Err(Error::Aborted(message.clone())),
            None => Ok(()),
        }
    }

    fn public_share(&self, encoded: i64) -> SharedValue {
        let mut shares = vec![0; self.parties];
        shares[0] = encoded as u64;
        SharedValue(shares)
    }
}

impl Substrate for SimulatedEngine {
    type Value = SharedValue;
    type Bit = SharedBit;

    fn parties(&self) -> usize {
        self.parties
    }

    fn input(&mut self, party: usize, value: f64) -> Result<SharedValue, Error> {
        self.check_party(party)?;
        let encoded = self.config.encode(value)?;
        self.transcript.push(Gate::Input(party));
        Ok(self.dealer.share_value(encoded))
    }

    fn input_bit(&mut self, party: usize, bit: bool) -> Result<SharedBit, Error> {
        self.check_party(party)?;
        self.transcript.push(Gate::InputBit(party));
        Ok(self.dealer.share_bit(bit))
    }

    fn constant(&mut self, value: f64) -> SharedValue {
        self.transcript.push(Gate::Constant);
        self.public_share(self.config.encode_saturating(value))
    }

    fn constant_bit(&mut self, bit: bool) -> SharedBit {
        self.transcript.push(Gate::ConstantBit);
        let mut shares = vec![false; self.parties];
        shares[0] = bit;
        SharedBit(shares)
    }

    fn add(&mut self, a: &SharedValue, b: &SharedValue) -> SharedValue {
        self.transcript.push(Gate::Add);
        a + b
    }

    fn sub(&mut self, a: &SharedValue, b: &SharedValue) -> SharedValue {
        self.transcript.push(Gate::Sub);
        a - b
    }

    fn mul(&mut self, a: &SharedValue, b: &SharedValue) -> SharedValue {
        self.transcript.push(Gate::Mul);
        self.dealer.mul(a, b)
    }

    fn div(&mut self, a: &SharedValue, b: &SharedValue) -> SharedValue {
        self.transcript.push(Gate::Div);
        self.dealer.div(a, b)
    }

    fn eq(&mut self, a: &SharedValue, b: &SharedValue) -> SharedBit {
        self.transcript.push(Gate::Eq);
        self.dealer.eq(a, b)
    }

    fn lt(&mut self, a: &SharedValue, b: &SharedValue) -> SharedBit {
        self.transcript.push(Gate::Lt);
        self.dealer.lt(a, b)
    }

    fn not(&mut self, a: &SharedBit) -> SharedBit {
        self.transcript.push(Gate::Not);
        a.negate()
    }

    fn and(&mut self, a: &SharedBit, b: &SharedBit) -> SharedBit {
        self.transcript.push(Gate::And);
        self.dealer.and(a, b)
    }

    fn select(&mut self, cond: &SharedBit, a: &SharedValue, b: &SharedValue) -> SharedValue {
        self.transcript.push(Gate::Select);
        self.dealer.select(cond, a, b)
    }

    fn lift(&mut self, bit: &SharedBit) -> SharedValue {
        self.transcript.push(Gate::Lift);
        self.dealer.lift(bit)
    }

    fn sqrt(&mut self, a: &SharedValue) -> SharedValue {
        self.transcript.push(Gate::Sqrt);
        self.dealer.approximate(a, f64::sqrt)
    }

    fn log2(&mut self, a: &SharedValue) -> SharedValue {
        self.transcript.push(Gate::Log2);
        self.dealer.approximate(a, f64::log2)
    }

    fn exp2(&mut self, a: &SharedValue) -> SharedValue {
        self.transcript.push(Gate::Exp2);
        self.dealer.approximate(a, f64::exp2)
    }

    fn reveal(&mut self, a: &SharedValue) -> Result<f64, Error> {
        self.check_aborted()?;
        self.transcript.push(Gate::Reveal);
        let value = self.config.decode(a.reconstruct());
        trace!(value, "Revealed value to all parties");
        Ok(value)
    }

    fn reveal_bit(&mut self, a: &SharedBit) -> Result<bool, Error> {
        self.check_aborted()?;
        self.transcript.push(Gate::RevealBit);
        let bit = a.reconstruct();
        trace!(bit, "Revealed bit to all parties");
        Ok(bit)
    }

    fn abort(&mut self, message: &str) -> Error {
        self.transcript.push(Gate::Abort);
        warn!(message, "Aborting the joint computation");
        let message = self.aborted.get_or_insert_with(|| message.to_string());
        Error::Aborted(message.clone())
    }
}

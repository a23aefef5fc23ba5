//! Data-oblivious statistics over columns contributed by mutually distrusting parties.
//!
//! Every aggregate in this crate is written as a fixed arithmetic circuit: the sequence of
//! operations that is executed, and the cells that are touched, depend only on public shape (the
//! number of rows and columns), never on the private values. Secret values are only ever turned
//! into public ones by an explicit `reveal`, which normally happens once, on the final result.
//!
//! ## Main Components
//!
//! * [`substrate`]: The [`substrate::Substrate`] trait, the contract of the secret arithmetic
//!   engine (add/sub/mul/div, comparisons, oblivious `select`, `reveal`, `abort`).
//! * [`engine`]: [`engine::SimulatedEngine`], an in-process multi-party implementation of the
//!   contract using additive shares and a trusted dealer for non-linear gates.
//! * [`column`]: Secret columns and tables whose cells carry an explicit presence flag instead of
//!   a reserved "missing" constant.
//! * [`input`]: Parsing of the line-oriented per-party input records.
//! * [`stats`]: The aggregates (mean, median, mode, variance, covariance, correlation,
//!   geometric/harmonic mean, linear regression), the oblivious equi-join and the filter.
//!
//! ## Example
//!
//! ```
//! use mpcstats::{
//!     column::SecretColumn,
//!     engine::SimulatedEngine,
//!     fixed::FixedPointConfig,
//!     stats,
//!     substrate::Substrate,
//! };
//!
//! # fn main() -> Result<(), mpcstats::Error> {
//! let mut engine = SimulatedEngine::new(2, FixedPointConfig::default())?;
//! let heights = [Some(170.0), Some(160.0), None, Some(180.0)];
//! let column = SecretColumn::from_party(&mut engine, 0, &heights)?;
//!
//! let median = stats::median(&mut engine, &column);
//! assert_eq!(engine.reveal(&median)?, 170.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Security Properties
//!
//! Secret booleans ([`substrate::Substrate::Bit`]) cannot drive native control flow: the only way
//! to branch on one is to reveal it first. The single function that does so mid-computation is
//! [`stats::geometric_mean`], which reveals one aggregate validity bit per precondition and aborts
//! the joint computation if it is violated.
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod column;
pub mod engine;
pub mod fixed;
pub mod input;
pub mod stats;
pub mod substrate;

mod error;

pub use error::Error;

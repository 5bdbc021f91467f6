//! Oblivious RAM primitive protocols for two-party secure computation.
//!
//! Two mutually distrusting parties jointly compute over secret-shared data
//! without revealing their shares or any intermediate value. This crate
//! provides the three batched primitives the ORAM layer is built from:
//!
//! - [`DifferenceCalculator`]: reconstructs to
//!   `indicator * (minuend - subtrahend)`.
//! - [`ObliviousDeltaCalculator`]: reconstructs to `alpha ? delta1 : delta0`,
//!   the correction primitive of GGM-tree distributed point functions.
//! - [`SinglePointArrayGenerator`]: batched secret-shared unit vectors with a
//!   secret nonzero position, in `ceil(log2(n))` interactive rounds.
//!
//! Interactive share operations are delegated to an execution engine (see
//! [`engine`]); correction openings travel over the party's I/O channel.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(unsafe_code)]
#![deny(clippy::all)]

mod delta;
mod difference;
pub mod engine;
mod factory;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;
mod single_point;

use async_trait::async_trait;

pub use delta::ObliviousDeltaCalculator;
pub use difference::DifferenceCalculator;
pub use factory::Factory;
pub use single_point::SinglePointArrayGenerator;

use engine::EngineError;
use oram2pc_core::CoreError;
use std::{error::Error, fmt::Display, io::Error as IoError};

/// A trait for computing a conditioned batched subtraction over secret shares.
#[async_trait]
pub trait CalculateDifference<Ctx, R> {
    /// Computes shares of `indicator * (minuend - subtrahend)` per batch
    /// element.
    ///
    /// When the combined indicator is 0 the output reconstructs to an exact
    /// zero.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `indicator` - XOR shares of the indicator bits.
    /// * `minuend` - Additive shares of the minuends.
    /// * `subtrahend` - Additive shares of the subtrahends.
    async fn calculate_difference(
        &mut self,
        ctx: &mut Ctx,
        indicator: Vec<bool>,
        minuend: Vec<R>,
        subtrahend: Vec<R>,
    ) -> Result<Vec<R>, OramError>;
}

/// A trait for batched oblivious 1-of-2 selection over secret shares.
#[async_trait]
pub trait CalculateDelta<Ctx, R> {
    /// Computes shares of `alpha ? delta1 : delta0` per batch element,
    /// without either party learning the selector or the candidates.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `delta0` - Shares of the candidates selected when `alpha` is 0.
    /// * `delta1` - Shares of the candidates selected when `alpha` is 1.
    /// * `alpha` - XOR shares of the selector bits.
    async fn calculate_delta(
        &mut self,
        ctx: &mut Ctx,
        delta0: Vec<R>,
        delta1: Vec<R>,
        alpha: Vec<bool>,
    ) -> Result<Vec<R>, OramError>;
}

/// A trait for generating batched secret-shared single-point arrays.
#[async_trait]
pub trait GenerateSinglePointArrays<Ctx, R> {
    /// Generates one array of `array_length` shares per batch instance.
    ///
    /// Each reconstructed array is zero everywhere except for a single one at
    /// the instance's secret index. `index_bits` holds
    /// `ceil(log2(array_length))` batches of XOR bit shares, most significant
    /// level first; the combined bits of instance `i` form its secret index,
    /// which must be below `array_length`.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `index_bits` - The per-level index bit share batches.
    /// * `array_length` - The length of each generated array.
    async fn generate_single_point_arrays(
        &mut self,
        ctx: &mut Ctx,
        index_bits: Vec<Vec<bool>>,
        array_length: usize,
    ) -> Result<Vec<Vec<R>>, OramError>;
}

/// An ORAM primitive error.
#[derive(Debug, thiserror::Error)]
pub struct OramError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl OramError {
    fn new<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the error was caused by input batches of unequal
    /// length.
    pub fn is_length_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::LengthMismatch)
    }

    /// Returns `true` if the error was caused by an invalid configuration.
    pub fn is_config(&self) -> bool {
        matches!(self.kind, ErrorKind::Config)
    }

    /// Returns `true` if the error was caused by the execution engine.
    pub fn is_engine(&self) -> bool {
        matches!(self.kind, ErrorKind::Engine)
    }

    /// Returns `true` if the error was caused by the channel to the peer.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }
}

impl Display for OramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::LengthMismatch => write!(f, "length mismatch"),
            ErrorKind::Config => write!(f, "configuration error"),
            ErrorKind::Engine => write!(f, "engine error"),
            ErrorKind::Io => write!(f, "io error"),
        }?;

        if let Some(source) = self.source.as_ref() {
            write!(f, " caused by: {source}")?;
        }

        Ok(())
    }
}

#[derive(Debug)]
enum ErrorKind {
    LengthMismatch,
    Config,
    Engine,
    Io,
}

impl From<CoreError> for OramError {
    fn from(value: CoreError) -> Self {
        let kind = if value.is_length_mismatch() {
            ErrorKind::LengthMismatch
        } else {
            ErrorKind::Config
        };

        Self::new(kind, value)
    }
}

impl From<EngineError> for OramError {
    fn from(value: EngineError) -> Self {
        let kind = if value.is_io() {
            ErrorKind::Io
        } else {
            ErrorKind::Engine
        };

        Self::new(kind, value)
    }
}

impl From<IoError> for OramError {
    fn from(value: IoError) -> Self {
        Self::new(ErrorKind::Io, value)
    }
}

//! The execution engine interface.
//!
//! The engine executes batched secret-shared wire operations between the two
//! parties. It is an external collaborator: this crate only consumes the two
//! operations the primitives need, plus the engine's traffic counters. Calling
//! an engine method submits the batch; awaiting the future reads the result,
//! suspending until the underlying interaction completes.

use async_trait::async_trait;
use std::{error::Error, fmt::Display, io::Error as IoError};

/// Batched conversion of XOR bit shares into ring shares.
///
/// The output reconstructs (by ring addition) to the embedded value of the
/// combined bit: `one` where the bits XOR to 1, `zero` elsewhere. One
/// interactive round per batch.
#[async_trait]
pub trait BitToRing<Ctx, R> {
    /// Converts the party's bit shares into ring shares of the same values.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `bits` - The party's XOR shares of the bits.
    async fn bit_to_ring(&mut self, ctx: &mut Ctx, bits: Vec<bool>) -> Result<Vec<R>, EngineError>;
}

/// Batched secure multiplication of ring shares.
///
/// The output reconstructs to the element-wise product of the two
/// reconstructed operand batches. One interactive round per batch.
#[async_trait]
pub trait RingMul<Ctx, R> {
    /// Multiplies the shared operand batches element-wise.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `lhs` - The party's shares of the left operands.
    /// * `rhs` - The party's shares of the right operands.
    async fn mul(
        &mut self,
        ctx: &mut Ctx,
        lhs: Vec<R>,
        rhs: Vec<R>,
    ) -> Result<Vec<R>, EngineError>;
}

/// Cumulative traffic counters of an engine, per party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficStats {
    /// Bytes sent to the peer.
    pub bytes_sent: u64,
    /// Bytes received from the peer.
    pub bytes_recv: u64,
}

/// Access to an engine's traffic counters.
pub trait Traffic {
    /// Returns the cumulative traffic statistics.
    fn traffic(&self) -> TrafficStats;
}

/// An engine providing every operation the ORAM primitives consume over `R`.
pub trait ShareEngine<Ctx, R>: BitToRing<Ctx, R> + RingMul<Ctx, R> + Traffic {}

impl<Ctx, R, E> ShareEngine<Ctx, R> for E where E: BitToRing<Ctx, R> + RingMul<Ctx, R> + Traffic {}

/// An execution engine error.
#[derive(Debug, thiserror::Error)]
pub struct EngineError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl EngineError {
    /// Creates a new engine error caused by a rejected or failed operation.
    pub fn engine<E>(source: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self {
            kind: ErrorKind::Engine,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if the error was caused by the channel to the peer.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
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
    Engine,
    Io,
}

impl From<IoError> for EngineError {
    fn from(value: IoError) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(Box::new(value)),
        }
    }
}

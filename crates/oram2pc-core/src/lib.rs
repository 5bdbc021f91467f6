//! Core cryptographic building blocks for the two-party ORAM primitives:
//! the 128-bit block type, the AES-based PRG and the fixed-key PRP used for
//! GGM doubling, the ring abstraction over secret-shared values, and the
//! sans-io share math of the difference, oblivious-delta, and single-point
//! array protocols.
//!
//! Everything in this crate is local computation over one party's shares;
//! the interactive drivers live in the `oram2pc` crate.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]

pub mod block;
pub mod delta;
pub mod diff;
pub mod msgs;
pub mod prg;
pub mod prp;
pub mod ring;
pub mod tree;

pub use block::Block;
pub use ring::Ring;

use std::{error::Error, fmt::Display};

/// An error in the share math of one of the ORAM primitives.
#[derive(Debug, thiserror::Error)]
pub struct CoreError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl CoreError {
    pub(crate) fn new<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    /// Returns `true` if this is a length mismatch error.
    pub fn is_length_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::LengthMismatch)
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self.kind, ErrorKind::Config)
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::LengthMismatch => write!(f, "length mismatch"),
            ErrorKind::Config => write!(f, "configuration error"),
        }?;

        if let Some(source) = self.source.as_ref() {
            write!(f, " caused by: {source}")?;
        }

        Ok(())
    }
}

#[derive(Debug)]
pub(crate) enum ErrorKind {
    LengthMismatch,
    Config,
}

//! Share math of the conditioned difference protocol.
//!
//! The parties hold XOR shares of an indicator bit and additive shares of a
//! minuend and a subtrahend. The reconstructed output is
//! `indicator * (minuend - subtrahend)`: the difference where the indicator
//! is set and an exact zero where it is not. Only the subtraction is local;
//! the bit conversion and the product are engine operations driven by the
//! `oram2pc` crate.

use crate::{CoreError, ErrorKind, Ring};

/// Validates the input batches of a difference calculation.
///
/// # Arguments
///
/// * `indicator` - The party's XOR shares of the indicator bits.
/// * `minuend` - The party's additive shares of the minuends.
/// * `subtrahend` - The party's additive shares of the subtrahends.
pub fn check_difference_inputs<R: Ring>(
    indicator: &[bool],
    minuend: &[R],
    subtrahend: &[R],
) -> Result<(), CoreError> {
    if indicator.len() != minuend.len() || minuend.len() != subtrahend.len() {
        return Err(CoreError::new(
            ErrorKind::LengthMismatch,
            format!(
                "batches have unequal length: {}, {}, {}",
                indicator.len(),
                minuend.len(),
                subtrahend.len()
            ),
        ));
    }

    if indicator.is_empty() {
        return Err(CoreError::new(
            ErrorKind::Config,
            "batch length must be non-zero",
        ));
    }

    Ok(())
}

/// Computes the party's share of `minuend - subtrahend`.
///
/// Subtraction is linear, so it is applied share-wise with no interaction.
pub fn subtract_shares<R: Ring>(minuend: &[R], subtrahend: &[R]) -> Vec<R> {
    minuend
        .iter()
        .zip(subtrahend)
        .map(|(&m, &s)| m.sub(s))
        .collect()
}

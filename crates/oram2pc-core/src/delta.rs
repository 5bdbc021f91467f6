//! Share math of the oblivious 1-of-2 selection protocol.
//!
//! The parties hold additive shares of two candidates and XOR shares of a
//! selector bit `alpha`. The reconstructed output is
//! `delta0 + alpha * (delta1 - delta0)`, i.e. the candidate matching the
//! combined selector, with neither party learning the selector or the
//! unselected candidate. The selector conversion and the product are engine
//! operations; the candidate difference and the final addition are local.

use crate::{CoreError, ErrorKind, Ring};

/// Validates the input batches of an oblivious delta calculation.
///
/// # Arguments
///
/// * `delta0` - The party's shares of the candidates selected when `alpha` is 0.
/// * `delta1` - The party's shares of the candidates selected when `alpha` is 1.
/// * `alpha` - The party's XOR shares of the selector bits.
pub fn check_delta_inputs<R: Ring>(
    delta0: &[R],
    delta1: &[R],
    alpha: &[bool],
) -> Result<(), CoreError> {
    if delta0.len() != delta1.len() || delta1.len() != alpha.len() {
        return Err(CoreError::new(
            ErrorKind::LengthMismatch,
            format!(
                "batches have unequal length: {}, {}, {}",
                delta0.len(),
                delta1.len(),
                alpha.len()
            ),
        ));
    }

    if delta0.is_empty() {
        return Err(CoreError::new(
            ErrorKind::Config,
            "batch length must be non-zero",
        ));
    }

    Ok(())
}

/// Computes the party's share of `delta1 - delta0`.
pub fn candidate_difference<R: Ring>(delta0: &[R], delta1: &[R]) -> Vec<R> {
    delta1
        .iter()
        .zip(delta0)
        .map(|(&d1, &d0)| d1.sub(d0))
        .collect()
}

/// Adds the selected correction back onto the `delta0` shares.
///
/// `correction` are the party's shares of `alpha * (delta1 - delta0)`.
pub fn apply_selection<R: Ring>(delta0: &[R], correction: &[R]) -> Vec<R> {
    delta0
        .iter()
        .zip(correction)
        .map(|(&d0, &c)| d0.add(c))
        .collect()
}

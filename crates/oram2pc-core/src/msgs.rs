//! Message types exchanged while opening level corrections.

use serde::{Deserialize, Serialize};

use crate::{
    tree::{LevelCorrection, LevelSums},
    Block, CoreError, ErrorKind,
};

/// One party's shares of a level's corrections, one entry per instance.
///
/// Both parties send theirs and XOR the two to open the corrections; the
/// opened values are pseudorandom sums of PRP outputs and reveal nothing
/// about the index bits.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionOpening {
    pub seeds: Vec<Block>,
    pub tau_even: Vec<bool>,
    pub tau_odd: Vec<bool>,
}

impl CorrectionOpening {
    /// Builds this party's opening from its correction word shares and tau
    /// bit shares.
    pub fn new(seeds: Vec<Block>, tau_even: Vec<bool>, tau_odd: Vec<bool>) -> Self {
        Self {
            seeds,
            tau_even,
            tau_odd,
        }
    }

    /// Combines this party's opening with the peer's, yielding the opened
    /// per-instance corrections.
    pub fn open(self, peer: Self) -> Result<Vec<LevelCorrection>, CoreError> {
        if self.seeds.len() != peer.seeds.len()
            || self.tau_even.len() != peer.tau_even.len()
            || self.tau_odd.len() != peer.tau_odd.len()
            || self.seeds.len() != self.tau_even.len()
            || self.seeds.len() != self.tau_odd.len()
        {
            return Err(CoreError::new(
                ErrorKind::LengthMismatch,
                format!(
                    "correction openings have unequal lengths: {} seeds vs {}",
                    self.seeds.len(),
                    peer.seeds.len()
                ),
            ));
        }

        Ok(self
            .seeds
            .into_iter()
            .zip(peer.seeds)
            .zip(self.tau_even.into_iter().zip(peer.tau_even))
            .zip(self.tau_odd.into_iter().zip(peer.tau_odd))
            .map(|(((seed, peer_seed), (even, peer_even)), (odd, peer_odd))| LevelCorrection {
                seed: seed ^ peer_seed,
                tau_even: even ^ peer_even,
                tau_odd: odd ^ peer_odd,
            })
            .collect())
    }
}

/// Builds a party's tau shares into an opening together with its correction
/// word shares.
pub fn correction_opening(
    seed_shares: Vec<Block>,
    sums: &LevelSums,
    alpha: &[bool],
    first_party: bool,
) -> CorrectionOpening {
    let (tau_even, tau_odd) = crate::tree::tau_shares(sums, alpha, first_party);

    CorrectionOpening::new(seed_shares, tau_even, tau_odd)
}

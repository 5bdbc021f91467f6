//! Per-party state of the PRG-doubling (GGM) tree underlying single-point
//! array generation.
//!
//! Each party holds one tree per batch instance. A node is a seed block plus a
//! control bit; the two parties' local values are equal at every node except
//! on the path to the secret index, where the control bits XOR to one. Every
//! level doubles the frontier through the fixed-key PRP and is then repaired
//! with one opened correction per instance: the seed correction word cancels
//! the seed discrepancy on the lose side of the path node, and the two tau
//! bits steer the control bits so the combined bit stays one exactly on the
//! path. After the last level the combined leaf control bits form the unit
//! indicator vector.
//!
//! All functions here are local to one party; selecting and opening the
//! corrections is interactive and lives in the `oram2pc` crate.

use rand::Rng;

use crate::{prp::FIXED_KEY_PRP, Block, CoreError, ErrorKind};

/// Returns the tree width `ceil(log2(array_length))`.
///
/// `array_length` must be at least 2.
pub fn tree_width(array_length: usize) -> usize {
    (usize::BITS - (array_length - 1).leading_zeros()) as usize
}

/// Validates the inputs of a single-point array generation, returning the
/// tree width and the number of batch instances.
///
/// # Arguments
///
/// * `index_bits` - The per-level batches of index bit shares, most
///   significant level first.
/// * `array_length` - The length of each generated array.
pub fn check_generator_inputs(
    index_bits: &[Vec<bool>],
    array_length: usize,
) -> Result<(usize, usize), CoreError> {
    if array_length < 2 {
        return Err(CoreError::new(
            ErrorKind::Config,
            format!("array length must be at least 2, got {array_length}"),
        ));
    }

    let width = tree_width(array_length);

    if index_bits.len() != width {
        return Err(CoreError::new(
            ErrorKind::Config,
            format!(
                "expected {} index bit batches for array length {}, got {}",
                width,
                array_length,
                index_bits.len()
            ),
        ));
    }

    let instances = index_bits[0].len();

    if index_bits.iter().any(|level| level.len() != instances) {
        return Err(CoreError::new(
            ErrorKind::LengthMismatch,
            "index bit batches have unequal lengths".to_string(),
        ));
    }

    if instances == 0 {
        return Err(CoreError::new(
            ErrorKind::Config,
            "batch length must be non-zero",
        ));
    }

    Ok((width, instances))
}

/// One opened per-instance level correction.
#[derive(Debug, Clone, Copy)]
pub struct LevelCorrection {
    /// The seed correction word.
    pub seed: Block,
    /// The control bit correction for even children.
    pub tau_even: bool,
    /// The control bit correction for odd children.
    pub tau_odd: bool,
}

/// A party's local XOR-sums over one expanded level, per instance.
///
/// Summed over one party's children, all off-path terms cancel against the
/// peer's, so the combined sums equal the path node's child discrepancies.
#[derive(Debug, Clone)]
pub struct LevelSums {
    /// XOR-sum of the even children's seeds.
    pub even_seeds: Vec<Block>,
    /// XOR-sum of the odd children's seeds.
    pub odd_seeds: Vec<Block>,
    /// XOR-sum of the even children's control bits.
    pub even_bits: Vec<bool>,
    /// XOR-sum of the odd children's control bits.
    pub odd_bits: Vec<bool>,
}

/// Computes this party's shares of the two tau control-bit corrections.
///
/// The combined corrections are `tau_even = sum_even ^ alpha ^ 1` and
/// `tau_odd = sum_odd ^ alpha`; exactly one party contributes the constant.
pub fn tau_shares(
    sums: &LevelSums,
    alpha: &[bool],
    first_party: bool,
) -> (Vec<bool>, Vec<bool>) {
    let even = sums
        .even_bits
        .iter()
        .zip(alpha)
        .map(|(&sum, &a)| sum ^ a ^ first_party)
        .collect();
    let odd = sums
        .odd_bits
        .iter()
        .zip(alpha)
        .map(|(&sum, &a)| sum ^ a)
        .collect();

    (even, odd)
}

/// A party's frontier of GGM trees, one tree per batch instance.
#[derive(Debug, Clone)]
pub struct GgmFrontier {
    /// Node seeds, instance-major.
    seeds: Vec<Block>,
    /// Node control bits, instance-major.
    ctrl: Vec<bool>,
    instances: usize,
    width: usize,
}

impl GgmFrontier {
    /// Creates the root frontier with one random seed per instance.
    ///
    /// Each party samples its roots locally; together they form an XOR
    /// sharing of a random value. `initial_control` must differ between the
    /// parties so the combined root control bit is one.
    pub fn root<R: Rng + ?Sized>(instances: usize, initial_control: bool, rng: &mut R) -> Self {
        let seeds = (0..instances).map(|_| rng.gen()).collect();

        Self {
            seeds,
            ctrl: vec![initial_control; instances],
            instances,
            width: 1,
        }
    }

    /// Returns the number of nodes per instance.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of batch instances.
    pub fn instances(&self) -> usize {
        self.instances
    }

    /// Expands every node into its two children through the fixed-key PRP.
    ///
    /// Children land at positions `2i` and `2i + 1`; the raw control bits are
    /// the children's least significant bits.
    pub fn expand(self) -> ExpandedLevel {
        let mut seeds = Vec::with_capacity(self.seeds.len() * 2);
        let mut bits = Vec::with_capacity(self.seeds.len() * 2);

        for &seed in &self.seeds {
            let [left, right] = FIXED_KEY_PRP.expand(seed);
            seeds.push(left);
            seeds.push(right);
            bits.push(left.lsb());
            bits.push(right.lsb());
        }

        ExpandedLevel {
            seeds,
            bits,
            parent_ctrl: self.ctrl,
            instances: self.instances,
            width: self.width * 2,
        }
    }

    /// Consumes the leaf frontier, returning each instance's first
    /// `array_length` control bit shares.
    ///
    /// The combined bits form the unit indicator at the secret index; the
    /// padding leaves beyond `array_length` are discarded.
    pub fn into_indicator_shares(self, array_length: usize) -> Vec<Vec<bool>> {
        self.ctrl
            .chunks(self.width)
            .map(|instance| instance[..array_length].to_vec())
            .collect()
    }
}

/// A frontier after expansion, awaiting its level correction.
#[derive(Debug, Clone)]
pub struct ExpandedLevel {
    seeds: Vec<Block>,
    bits: Vec<bool>,
    parent_ctrl: Vec<bool>,
    instances: usize,
    width: usize,
}

impl ExpandedLevel {
    /// Computes the party's per-instance even/odd XOR-sums.
    pub fn sums(&self) -> LevelSums {
        let mut even_seeds = Vec::with_capacity(self.instances);
        let mut odd_seeds = Vec::with_capacity(self.instances);
        let mut even_bits = Vec::with_capacity(self.instances);
        let mut odd_bits = Vec::with_capacity(self.instances);

        for (seeds, bits) in self
            .seeds
            .chunks(self.width)
            .zip(self.bits.chunks(self.width))
        {
            let mut even_seed = Block::ZERO;
            let mut odd_seed = Block::ZERO;
            let mut even_bit = false;
            let mut odd_bit = false;

            for (j, (&seed, &bit)) in seeds.iter().zip(bits).enumerate() {
                if j % 2 == 0 {
                    even_seed ^= seed;
                    even_bit ^= bit;
                } else {
                    odd_seed ^= seed;
                    odd_bit ^= bit;
                }
            }

            even_seeds.push(even_seed);
            odd_seeds.push(odd_seed);
            even_bits.push(even_bit);
            odd_bits.push(odd_bit);
        }

        LevelSums {
            even_seeds,
            odd_seeds,
            even_bits,
            odd_bits,
        }
    }

    /// Applies the opened corrections, gated per node on the parent's control
    /// bit, and returns the corrected next frontier.
    pub fn apply_corrections(
        self,
        corrections: &[LevelCorrection],
    ) -> Result<GgmFrontier, CoreError> {
        if corrections.len() != self.instances {
            return Err(CoreError::new(
                ErrorKind::LengthMismatch,
                format!(
                    "expected {} level corrections, got {}",
                    self.instances,
                    corrections.len()
                ),
            ));
        }

        let mut seeds = self.seeds;
        let mut bits = self.bits;
        let parent_width = self.width / 2;

        for (inst, correction) in corrections.iter().enumerate() {
            for j in 0..self.width {
                if !self.parent_ctrl[inst * parent_width + j / 2] {
                    continue;
                }

                seeds[inst * self.width + j] ^= correction.seed;
                bits[inst * self.width + j] ^= if j % 2 == 0 {
                    correction.tau_even
                } else {
                    correction.tau_odd
                };
            }
        }

        Ok(GgmFrontier {
            seeds,
            ctrl: bits,
            instances: self.instances,
            width: self.width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rstest::rstest;

    use crate::prg::Prg;

    // Runs both parties of the tree construction locally, playing the
    // interactive correction selection in the clear.
    fn simulate(array_length: usize, index: usize) -> Vec<bool> {
        let width = tree_width(array_length);
        let mut rng = Prg::from_seed(Block::from(array_length as u128 ^ (index as u128) << 64));

        let mut party0 = GgmFrontier::root(1, true, &mut rng);
        let mut party1 = GgmFrontier::root(1, false, &mut rng);

        for level in 0..width {
            let alpha = (index >> (width - 1 - level)) & 1 == 1;

            let expanded0 = party0.expand();
            let expanded1 = party1.expand();
            let sums0 = expanded0.sums();
            let sums1 = expanded1.sums();

            // The lose side is the one the path does not take.
            let seed = if alpha {
                sums0.even_seeds[0] ^ sums1.even_seeds[0]
            } else {
                sums0.odd_seeds[0] ^ sums1.odd_seeds[0]
            };

            // Party 0 holds the whole alpha share, party 1 holds zero.
            let (even0, odd0) = tau_shares(&sums0, &[alpha], true);
            let (even1, odd1) = tau_shares(&sums1, &[false], false);

            let correction = LevelCorrection {
                seed,
                tau_even: even0[0] ^ even1[0],
                tau_odd: odd0[0] ^ odd1[0],
            };

            party0 = expanded0.apply_corrections(&[correction]).unwrap();
            party1 = expanded1.apply_corrections(&[correction]).unwrap();
        }

        let shares0 = party0.into_indicator_shares(array_length);
        let shares1 = party1.into_indicator_shares(array_length);

        shares0[0]
            .iter()
            .zip(&shares1[0])
            .map(|(&a, &b)| a ^ b)
            .collect()
    }

    #[test]
    fn test_tree_width() {
        assert_eq!(tree_width(2), 1);
        assert_eq!(tree_width(4), 2);
        assert_eq!(tree_width(5), 3);
        assert_eq!(tree_width(8), 3);
        assert_eq!(tree_width(16384), 14);
    }

    #[rstest]
    #[case(4, 0)]
    #[case(4, 2)]
    #[case(4, 3)]
    #[case(8, 5)]
    #[case(16, 0)]
    #[case(16, 15)]
    #[case(6, 4)]
    #[case(100, 99)]
    fn test_single_point_indicator(#[case] array_length: usize, #[case] index: usize) {
        let combined = simulate(array_length, index);

        assert_eq!(combined.len(), array_length);
        for (j, &bit) in combined.iter().enumerate() {
            assert_eq!(bit, j == index, "position {j}");
        }
    }

    #[test]
    fn test_check_generator_inputs() {
        let bits = vec![vec![true, false], vec![false, false]];
        assert_eq!(check_generator_inputs(&bits, 4).unwrap(), (2, 2));

        // Wrong level count for the array length.
        assert!(check_generator_inputs(&bits, 8).unwrap_err().is_config());

        // Degenerate array length.
        assert!(check_generator_inputs(&[], 0).unwrap_err().is_config());
        assert!(check_generator_inputs(&[], 1).unwrap_err().is_config());

        // Ragged batches.
        let ragged = vec![vec![true, false], vec![false]];
        assert!(check_generator_inputs(&ragged, 4)
            .unwrap_err()
            .is_length_mismatch());

        // Empty batches.
        let empty = vec![vec![], vec![]];
        assert!(check_generator_inputs(&empty, 4).unwrap_err().is_config());
    }
}

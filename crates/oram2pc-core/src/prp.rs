//! Fixed-key PRP used for GGM doubling.

use aes::{
    cipher::{BlockEncrypt, KeyInit},
    Aes128,
};
use once_cell::sync::Lazy;

use crate::Block;

/// The fixed-key PRP instance shared by all tree expansions.
///
/// Both parties expand with the same fixed keys, so equal seeds expand to
/// equal children.
pub static FIXED_KEY_PRP: Lazy<TwoKeyPrp> = Lazy::new(|| {
    TwoKeyPrp::new([
        Block::new(*b"oram2pc-ggm-left"),
        Block::new(*b"oram2pc-ggm-rght"),
    ])
});

/// A two-key PRP expanding one block into two.
///
/// Each child is `AES_k(seed) ^ seed` under the respective fixed key, the
/// usual correlation-robust construction for GGM trees.
pub struct TwoKeyPrp([Aes128; 2]);

impl TwoKeyPrp {
    /// Creates a new PRP from the two provided keys.
    pub fn new(keys: [Block; 2]) -> Self {
        Self(keys.map(|k| Aes128::new(&k.to_bytes().into())))
    }

    /// Expands a seed into its left and right children.
    #[inline]
    pub fn expand(&self, seed: Block) -> [Block; 2] {
        let mut blocks = [aes::Block::from(seed.to_bytes()); 2];
        self.0[0].encrypt_block(&mut blocks[0]);
        self.0[1].encrypt_block(&mut blocks[1]);

        [
            Block::new(blocks[0].into()) ^ seed,
            Block::new(blocks[1].into()) ^ seed,
        ]
    }
}

opaque_debug::implement!(TwoKeyPrp);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_deterministic() {
        let seed = Block::from(42u128);

        assert_eq!(FIXED_KEY_PRP.expand(seed), FIXED_KEY_PRP.expand(seed));
    }

    #[test]
    fn test_expand_children_differ() {
        let [left, right] = FIXED_KEY_PRP.expand(Block::from(7u128));

        assert_ne!(left, right);
    }

    #[test]
    fn test_expand_seeds_diverge() {
        let a = FIXED_KEY_PRP.expand(Block::ZERO);
        let b = FIXED_KEY_PRP.expand(Block::ONES);

        assert_ne!(a[0], b[0]);
        assert_ne!(a[1], b[1]);
    }
}

//! AES-based PRG.

use aes::{
    cipher::{BlockEncrypt, KeyInit},
    Aes128,
};
use rand::Rng;
use rand_core::{
    block::{BlockRng, BlockRngCore},
    CryptoRng, RngCore, SeedableRng,
};

use crate::Block;

const BLOCKS_PER_GEN: usize = 8;

/// The PRG core.
#[derive(Clone)]
struct PrgCore {
    aes: Aes128,
    counter: u64,
}

impl BlockRngCore for PrgCore {
    type Item = u32;
    type Results = [u32; 4 * BLOCKS_PER_GEN];

    // Computes 8 encrypted counter blocks at a time.
    #[inline(always)]
    fn generate(&mut self, results: &mut Self::Results) {
        let mut blocks = [aes::Block::default(); BLOCKS_PER_GEN];
        for block in blocks.iter_mut() {
            block[..8].copy_from_slice(&self.counter.to_le_bytes());
            self.counter += 1;
        }
        self.aes.encrypt_blocks(&mut blocks);

        let bytes: &mut [u8] = bytemuck::cast_slice_mut(results);
        for (chunk, block) in bytes.chunks_exact_mut(16).zip(blocks.iter()) {
            chunk.copy_from_slice(block);
        }
    }
}

impl SeedableRng for PrgCore {
    type Seed = Block;

    #[inline(always)]
    fn from_seed(seed: Self::Seed) -> Self {
        let aes = Aes128::new(&seed.to_bytes().into());
        Self { aes, counter: 0 }
    }
}

impl CryptoRng for PrgCore {}

/// AES-based PRG.
///
/// AES128 in counter mode, keyed with the seed block.
#[derive(Clone)]
pub struct Prg(BlockRng<PrgCore>);

opaque_debug::implement!(Prg);

impl RngCore for Prg {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline(always)]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl SeedableRng for Prg {
    type Seed = Block;

    #[inline(always)]
    fn from_seed(seed: Self::Seed) -> Self {
        Prg(BlockRng::<PrgCore>::from_seed(seed))
    }

    #[inline(always)]
    fn from_rng<R: RngCore>(rng: R) -> Result<Self, rand_core::Error> {
        BlockRng::<PrgCore>::from_rng(rng).map(Prg)
    }
}

impl CryptoRng for Prg {}

impl Prg {
    /// New Prg with a random seed.
    #[inline(always)]
    pub fn new() -> Self {
        Prg::from_seed(rand::random::<Block>())
    }

    /// Generates a random bool value.
    #[inline(always)]
    pub fn random_bool(&mut self) -> bool {
        self.gen()
    }

    /// Fills a bool slice with random values.
    #[inline(always)]
    pub fn random_bools(&mut self, buf: &mut [bool]) {
        for bit in buf.iter_mut() {
            *bit = self.gen();
        }
    }

    /// Generates a random block.
    #[inline(always)]
    pub fn random_block(&mut self) -> Block {
        self.gen()
    }

    /// Fills a block slice with random values.
    #[inline(always)]
    pub fn random_blocks(&mut self, buf: &mut [Block]) {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(buf);
        self.fill_bytes(bytes);
    }
}

impl Default for Prg {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

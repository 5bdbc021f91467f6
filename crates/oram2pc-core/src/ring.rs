//! The ring abstraction over secret-shared values.

use std::fmt::Debug;

use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};

use crate::Block;

/// A finite commutative ring of fixed bit width.
///
/// Arithmetic shares of a ring element combine by [`Ring::add`]; the supported
/// widths are the closed set of implementations. The unsigned integers
/// implement the wrapping rings Z_2^k; [`Block`] implements the Boolean ring
/// where addition is XOR and multiplication is bitwise AND, which is the
/// instantiation used for correction-word selection inside the GGM tree.
pub trait Ring:
    Copy + Clone + Debug + Default + PartialEq + Eq + Send + Sync + Unpin + Serialize + DeserializeOwned + 'static
{
    /// The bit width of the ring.
    const BITS: usize;

    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Adds two elements.
    fn add(self, rhs: Self) -> Self;

    /// Subtracts `rhs` from `self`.
    fn sub(self, rhs: Self) -> Self;

    /// Multiplies two elements.
    fn mul(self, rhs: Self) -> Self;

    /// Negates the element.
    fn neg(self) -> Self;

    /// Embeds a bit as `zero` or `one`.
    fn from_bit(bit: bool) -> Self;

    /// Samples a uniform element.
    fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! impl_ring {
    ($($ty:ty),*) => {
        $(
            impl Ring for $ty {
                const BITS: usize = <$ty>::BITS as usize;

                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn one() -> Self {
                    1
                }

                #[inline]
                fn add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline]
                fn sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                #[inline]
                fn mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                #[inline]
                fn neg(self) -> Self {
                    self.wrapping_neg()
                }

                #[inline]
                fn from_bit(bit: bool) -> Self {
                    bit as $ty
                }

                #[inline]
                fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
                    rng.gen()
                }
            }
        )*
    };
}

impl_ring!(u8, u16, u32, u64);

// The Boolean ring GF(2)^128: addition is XOR, multiplication is bitwise AND,
// one is the all-ones mask. `from_bit(true)` is the full mask, so multiplying
// by an embedded bit is a bitwise mux.
impl Ring for Block {
    const BITS: usize = 128;

    #[inline]
    fn zero() -> Self {
        Block::ZERO
    }

    #[inline]
    fn one() -> Self {
        Block::ONES
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self ^ rhs
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self ^ rhs
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline]
    fn neg(self) -> Self {
        self
    }

    #[inline]
    fn from_bit(bit: bool) -> Self {
        if bit {
            Block::ONES
        } else {
            Block::ZERO
        }
    }

    #[inline]
    fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }
}

//! Two-to-one hash oracles used to compute the inner nodes of a commitment tree.

use core::{convert::Infallible, fmt::Debug, marker::PhantomData};

use crate::Felt;

#[cfg(test)]
mod tests;

// RE-EXPORTS
// ================================================================================================

pub use winter_crypto::{
    Digest, ElementHasher, Hasher,
    hashers::{Blake3_256, Rp64_256, Sha3_256},
};

// HASH ORACLE
// ================================================================================================

/// A deterministic two-to-one hash function over tree nodes.
///
/// Every inner node of a commitment tree is computed as `merge(left, right)`. The tree never looks
/// inside a digest; it only requires that the same inputs always produce the same output.
///
/// An oracle may fail (for example, when it is backed by an external service). A failure aborts
/// the mutation in progress, and the tree guarantees that none of that mutation's writes are
/// applied.
pub trait HashOracle: Send + Sync {
    /// Node values produced and consumed by this oracle.
    type Digest: Copy + Eq + Debug + Send + Sync;

    /// Error returned when the oracle cannot produce a digest.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Returns the parent of the `left` and `right` nodes.
    fn merge(&self, left: Self::Digest, right: Self::Digest) -> Result<Self::Digest, Self::Error>;
}

impl<O: HashOracle> HashOracle for &O {
    type Digest = O::Digest;
    type Error = O::Error;

    fn merge(&self, left: Self::Digest, right: Self::Digest) -> Result<Self::Digest, Self::Error> {
        (**self).merge(left, right)
    }
}

// MERGE ORACLE
// ================================================================================================

/// Adapts a [Hasher] into an infallible [HashOracle] using [Hasher::merge].
pub struct MergeOracle<H>(PhantomData<fn() -> H>);

impl<H> MergeOracle<H> {
    /// Returns a new oracle backed by the hasher `H`.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<H> Default for MergeOracle<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for MergeOracle<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for MergeOracle<H> {}

impl<H> Debug for MergeOracle<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("MergeOracle").field(&core::any::type_name::<H>()).finish()
    }
}

impl<H: Hasher> HashOracle for MergeOracle<H> {
    type Digest = H::Digest;
    type Error = Infallible;

    #[inline(always)]
    fn merge(&self, left: Self::Digest, right: Self::Digest) -> Result<Self::Digest, Self::Error> {
        Ok(H::merge(&[left, right]))
    }
}

impl<H: ElementHasher<BaseField = Felt>> MergeOracle<H> {
    /// Hashes a sequence of field elements into a leaf value.
    ///
    /// This is how an application typically turns the secret values behind a commitment into the
    /// leaf it appends to the tree.
    pub fn hash_elements(&self, elements: &[Felt]) -> H::Digest {
        H::hash_elements(elements)
    }
}

// TYPE ALIASES
// ================================================================================================

/// Rescue Prime over the 64-bit base field, producing digests of 4 field elements.
pub type Rpo = MergeOracle<Rp64_256>;

/// BLAKE3 with 256-bit output.
pub type Blake3 = MergeOracle<Blake3_256<Felt>>;

/// Digest produced by the [Rpo] oracle.
pub type RpoDigest = <Rp64_256 as Hasher>::Digest;

use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use siphasher::sip128::{Hasher128, SipHasher13};

/// A value that can identify a memoized call.
///
/// Arguments are stored by value in the cache, so they must be cloneable, and
/// they must be comparable and hashable to serve as a map key. This is
/// implemented for every type that fulfills these bounds, in particular for
/// tuples of such types.
pub trait Key: Clone + Eq + Hash {}

impl<T: Clone + Eq + Hash> Key for T {}

/// Ensure a type is suitable as an argument of a memoized function.
pub fn assert_key<T: Key>() {}

/// Produce a 128-bit hash of a value.
#[inline]
pub fn hash<T: Hash + ?Sized>(value: &T) -> u128 {
    let mut state = SipHasher13::new();
    value.hash(&mut state);
    state.finish128().as_u128()
}

/// The arguments of a call together with their precomputed hash.
///
/// Hashing a composite only writes the precomputed hash, so the store can use
/// a passthrough hasher. Equality checks the hash before it compares the
/// arguments themselves, so two different argument lists never share an
/// entry, even if their hashes collide.
#[derive(Clone)]
pub struct Composite<K> {
    /// The precomputed hash of `args`.
    hash: u128,
    /// The owned arguments.
    args: K,
}

impl<K: Key> Composite<K> {
    /// Hash the arguments and wrap them.
    #[inline]
    pub fn new(args: K) -> Self {
        Self { hash: hash(&args), args }
    }
}

impl<K> Composite<K> {
    /// The precomputed hash.
    #[inline]
    pub fn hash128(&self) -> u128 {
        self.hash
    }
}

impl<K> Hash for Composite<K> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u128(self.hash);
    }
}

impl<K: Eq> Eq for Composite<K> {}

impl<K: PartialEq> PartialEq for Composite<K> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.args == other.args
    }
}

impl<K: Debug> Debug for Composite<K> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.args.fmt(f)
    }
}

use crate::key::Composite;
use crate::passthrough::PassthroughHashMap;

/// Maps from composite keys to memoized results.
///
/// The store never evicts. It only grows until it is dropped together with
/// the wrapper that owns it.
pub struct Store<K, Out> {
    map: PassthroughHashMap<Composite<K>, Out>,
}

impl<K: Eq, Out> Store<K, Out> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { map: PassthroughHashMap::default() }
    }

    /// Look for a memoized result.
    #[inline]
    pub fn lookup(&self, key: &Composite<K>) -> Option<&Out> {
        self.map.get(key)
    }

    /// Insert a result.
    ///
    /// If the key is already present, the new result replaces the old one.
    pub fn insert(&mut self, key: Composite<K>, output: Out) {
        self.map.insert(key, output);
    }

    /// The number of memoized results.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing was memoized yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Eq, Out> Default for Store<K, Out> {
    fn default() -> Self {
        Self::new()
    }
}

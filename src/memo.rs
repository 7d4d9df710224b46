use std::any::type_name;
use std::fmt::{self, Debug, Formatter};
use std::sync::LazyLock;

use crate::guard::Guard;
use crate::key::{Composite, Key};
use crate::stats::Stats;
use crate::store::Store;

/// A handle through which a memoized function calls itself.
///
/// Memoized functions receive a `&dyn Recurse` as their first argument. Every
/// call made through it is a full cache lookup, so recursive algorithms get
/// all their sub-problems memoized without being restructured.
pub trait Recurse<Args, Out> {
    /// Call the memoized function, using a cached result if there is one.
    fn call(&self, args: Args) -> Out;
}

/// Memoize a function that may call itself through a [`Recurse`] handle.
///
/// Functions with several arguments take them as a tuple.
///
/// ```
/// let binomial = recall::memoize(|binomial, (n, k): (u64, u64)| -> u64 {
///     if k == 0 || k == n {
///         1
///     } else {
///         binomial.call((n - 1, k - 1)) + binomial.call((n - 1, k))
///     }
/// });
///
/// assert_eq!(binomial.call((30, 15)), 155_117_520);
/// ```
pub fn memoize<Args, Out, F>(fun: F) -> Memo<Args, Out, F>
where
    Args: Key,
    Out: Clone,
    F: Fn(&dyn Recurse<Args, Out>, Args) -> Out,
{
    Memo {
        fun,
        cache: Guard::default(),
        stats: Stats::new(),
        admit: admit_all,
    }
}

/// Memoize a function whose computation can fail with an error.
///
/// Only `Ok` results are cached. An `Err` is returned to the caller and the
/// next call with the same arguments computes again.
pub fn memoize_fallible<Args, T, E, F>(fun: F) -> Memo<Args, Result<T, E>, F>
where
    Args: Key,
    T: Clone,
    E: Clone,
    F: Fn(&dyn Recurse<Args, Result<T, E>>, Args) -> Result<T, E>,
{
    memoize(fun).cache_if(Result::is_ok)
}

/// A memoized function together with its private cache.
///
/// The cache is guarded by a reentrant lock that is held for the whole
/// duration of a call, including the execution of the function on a miss.
/// Nested calls from the same thread re-enter the lock; calls from other
/// threads wait until the outermost call finishes. Consequently, a function
/// which blocks on another thread calling into the same `Memo` deadlocks.
///
/// Cloning a `Memo` clones the function but not the cache: the clone starts
/// out empty.
pub struct Memo<Args, Out, F> {
    /// The underlying function.
    fun: F,
    /// Maps from arguments to memoized results.
    cache: Guard<Store<Args, Out>>,
    /// Hit and miss counters.
    stats: Stats,
    /// Decides whether a computed output is stored.
    admit: fn(&Out) -> bool,
}

impl<Args, Out, F> Memo<Args, Out, F>
where
    Args: Key,
    Out: Clone,
    F: Fn(&dyn Recurse<Args, Out>, Args) -> Out,
{
    /// Call the function, or return the cached result for these arguments.
    ///
    /// A panic in the function propagates to the caller and leaves the cache
    /// as it was before the call.
    pub fn call(&self, args: Args) -> Out {
        dispatch(
            type_name::<F>(),
            &self.cache,
            &self.stats,
            self.admit,
            args,
            |args| (self.fun)(self, args),
        )
    }

    /// Only cache outputs for which `admit` returns `true`.
    pub fn cache_if(mut self, admit: fn(&Out) -> bool) -> Self {
        self.admit = admit;
        self
    }

    /// Whether a result for these arguments is cached.
    pub fn is_cached(&self, args: &Args) -> bool {
        let key = Composite::new(args.clone());
        self.cache.enter().read(|store| store.lookup(&key).is_some())
    }

    /// The number of cached results.
    pub fn len(&self) -> usize {
        self.cache.enter().read(Store::len)
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.enter().read(Store::is_empty)
    }

    /// Hit and miss counters of this instance.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

impl<Args, Out, F> Recurse<Args, Out> for Memo<Args, Out, F>
where
    Args: Key,
    Out: Clone,
    F: Fn(&dyn Recurse<Args, Out>, Args) -> Out,
{
    #[inline]
    fn call(&self, args: Args) -> Out {
        Memo::call(self, args)
    }
}

impl<Args: Key, Out, F: Clone> Clone for Memo<Args, Out, F> {
    fn clone(&self) -> Self {
        Self {
            fun: self.fun.clone(),
            cache: Guard::default(),
            stats: Stats::new(),
            admit: self.admit,
        }
    }
}

impl<Args, Out, F> Debug for Memo<Args, Out, F> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Memo")
            .field("fun", &type_name::<F>())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// A cache for a single memoized free function, usable in a `static`.
pub struct Cache<Args, Out> {
    /// Maps from arguments to memoized results.
    store: LazyLock<Guard<Store<Args, Out>>>,
    /// Hit and miss counters.
    stats: Stats,
}

impl<Args: Key, Out> Cache<Args, Out> {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self {
            store: LazyLock::new(Guard::default),
            stats: Stats::new(),
        }
    }

    /// Hit and miss counters of this cache.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// The number of cached results.
    pub fn len(&self) -> usize {
        self.store.enter().read(Store::len)
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.store.enter().read(Store::is_empty)
    }
}

impl<Args: Key, Out> Default for Cache<Args, Out> {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute a function or use a cached result for it.
///
/// Recursion happens by the function calling its memoized wrapper, which
/// enters `cache` again.
pub fn cached<Args, Out, F>(
    name: &'static str,
    cache: &Cache<Args, Out>,
    args: Args,
    func: F,
) -> Out
where
    Args: Key,
    Out: Clone,
    F: FnOnce(Args) -> Out,
{
    dispatch(name, &cache.store, &cache.stats, admit_all, args, func)
}

/// The default admission predicate.
fn admit_all<Out>(_: &Out) -> bool {
    true
}

/// Look up a call in the cache, or compute and store its result.
fn dispatch<Args, Out>(
    name: &'static str,
    cache: &Guard<Store<Args, Out>>,
    stats: &Stats,
    admit: fn(&Out) -> bool,
    args: Args,
    compute: impl FnOnce(Args) -> Out,
) -> Out
where
    Args: Key,
    Out: Clone,
{
    // Held until the result is stored, nested calls re-enter it.
    let entered = cache.enter();
    let key = Composite::new(args.clone());

    if let Some(output) = entered.read(|store| store.lookup(&key).cloned()) {
        stats.record_hit();
        tracing::trace!(target: "recall", func = name, hash = key.hash128() as u64, "hit");

        #[cfg(feature = "testing")]
        crate::testing::register_hit();

        return output;
    }

    stats.record_miss();
    tracing::trace!(
        target: "recall",
        func = name,
        hash = key.hash128() as u64,
        nested = entered.reentered(),
        "miss",
    );

    let output = compute(args);

    if admit(&output) {
        entered.write(|store| store.insert(key, output.clone()));
    } else {
        tracing::trace!(target: "recall", func = name, "output rejected, not cached");
    }

    #[cfg(feature = "testing")]
    crate::testing::register_miss();

    output
}

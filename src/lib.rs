//! Memoized calls whose recursive sub-calls go through the cache.
//!
//! A memoized function receives a [`Recurse`] handle as its first argument.
//! Calling the handle looks up its own cache, so every step of a naive
//! recursive algorithm is computed at most once:
//!
//! ```
//! let fib = recall::memoize(|fib, n: u64| -> u64 {
//!     if n < 2 { n } else { fib.call(n - 1) + fib.call(n - 2) }
//! });
//!
//! assert_eq!(fib.call(90), 2_880_067_194_370_816_120);
//! ```
//!
//! Free functions can instead be annotated with [`#[memoize]`](macro@memoize),
//! which backs them with a `static` cache. They recurse by calling themselves.
//!
//! Caches never evict. Each [`Memo`] owns its cache and guards it with a
//! reentrant lock for the duration of a call, so concurrent callers are
//! serialized while recursive calls on the same thread pass through.

mod guard;
mod key;
mod memo;
mod passthrough;
mod stats;
mod store;
#[cfg(feature = "testing")]
mod testing;

pub use crate::key::Key;
pub use crate::memo::{memoize, memoize_fallible, Memo, Recurse};
pub use crate::stats::Stats;
#[cfg(feature = "macros")]
pub use recall_macros::memoize;

/// These are implementation details. Do not rely on them!
#[doc(hidden)]
pub mod internal {
    pub use crate::key::assert_key;
    pub use crate::memo::{cached, Cache};
    #[cfg(feature = "testing")]
    pub use crate::testing::last_was_hit;
}

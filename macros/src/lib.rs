extern crate proc_macro;

macro_rules! bail {
    ($item:expr, $fmt:literal $($tts:tt)*) => {
        return Err(Error::new_spanned(
            &$item,
            format!(concat!("recall: ", $fmt) $($tts)*)
        ))
    }
}

mod memoize;

use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{parse_quote, Error, Result};

/// Memoize a free function.
///
/// The function is backed by its own `static` cache. Recursive calls go
/// through the cache as well, so this turns a naive recursive definition into
/// a memoized one:
///
/// ```ignore
/// #[recall::memoize]
/// fn fib(n: u64) -> u64 {
///     if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
/// }
///
/// assert_eq!(fib(80), 23_416_728_348_467_685);
/// ```
///
/// All arguments must be simple identifiers of owned types that are
/// `Clone + Eq + Hash + Send`. The return type must be `Clone + Send`.
/// Generic functions, methods and `async` functions are not supported.
///
/// Every returned value is cached, `Err`s included. A panic caches nothing.
/// Use `recall::memoize_fallible` for computations whose errors should be
/// retried.
#[proc_macro_attribute]
pub fn memoize(_: TokenStream, stream: TokenStream) -> TokenStream {
    let func = syn::parse_macro_input!(stream as syn::ItemFn);
    memoize::expand(func)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

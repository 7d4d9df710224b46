//! This example compares a naive Fibonacci implementation with the same
//! recursion memoized through a handle and through the attribute.

use std::time::Instant;

use recall::{memoize, Recurse};

fn main() {
    let n = 40;

    // Every call recomputes both sub-problems.
    let start = Instant::now();
    println!("fib without memoize: {}", naive(n));
    println!("naive: {:?}", start.elapsed());

    // The closure routes its recursion through the cache.
    let start = Instant::now();
    let fib = memoize(|fib, n: u64| -> u64 {
        if n < 2 { n } else { fib.call(n - 1) + fib.call(n - 2) }
    });
    println!("fib with closure memoize: {}", fib.call(n));
    println!("closure: {:?} ({:?})", start.elapsed(), fib.stats());

    // A named function works just as well.
    let start = Instant::now();
    let fib = memoize(body);
    println!("fib with function memoize: {}", fib.call(n));
    println!("function: {:?}", start.elapsed());

    // The attribute recurses by name.
    let start = Instant::now();
    println!("fib with attribute memoize: {}", attributed(n));
    println!("attribute: {:?}", start.elapsed());
}

fn naive(n: u64) -> u64 {
    if n < 2 { n } else { naive(n - 1) + naive(n - 2) }
}

fn body(fib: &dyn Recurse<u64, u64>, n: u64) -> u64 {
    if n < 2 { n } else { fib.call(n - 1) + fib.call(n - 2) }
}

#[recall::memoize]
fn attributed(n: u64) -> u64 {
    if n < 2 { n } else { attributed(n - 1) + attributed(n - 2) }
}

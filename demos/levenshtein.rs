//! This example computes edit distances with and without memoization. The
//! memoized version caches every pair of positions into the two strings.

use std::time::Instant;

use recall::memoize;

fn main() {
    let (a, b) = ("0x7c682a13b4d", "0x7d642b13b4e");

    let start = Instant::now();
    println!("edit distance without memoize: {}", naive(a.as_bytes(), b.as_bytes()));
    println!("naive: {:?}", start.elapsed());

    let start = Instant::now();
    println!("edit distance with memoize: {}", memoized(a, b));
    println!("memoized: {:?}", start.elapsed());

    // Far beyond what the naive version can finish.
    let (a, b) = (
        "0x7c682a13b4d456e567f9678234098d",
        "0x7d642b13b4e546e566782183037c89",
    );
    let start = Instant::now();
    println!("edit distance with memoize: {}", memoized(a, b));
    println!("memoized (long): {:?}", start.elapsed());
}

fn naive(a: &[u8], b: &[u8]) -> usize {
    match (a, b) {
        ([], rest) | (rest, []) => rest.len(),
        ([x, a_rest @ ..], [y, b_rest @ ..]) => (naive(a_rest, b) + 1)
            .min(naive(a, b_rest) + 1)
            .min(naive(a_rest, b_rest) + usize::from(x != y)),
    }
}

fn memoized(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let lev = memoize(|lev, (i, j): (usize, usize)| -> usize {
        if i == a.len() {
            return b.len() - j;
        }
        if j == b.len() {
            return a.len() - i;
        }
        (lev.call((i + 1, j)) + 1)
            .min(lev.call((i, j + 1)) + 1)
            .min(lev.call((i + 1, j + 1)) + usize::from(a[i] != b[j]))
    });
    let distance = lev.call((0, 0));
    println!("cached positions: {}", lev.len());
    distance
}

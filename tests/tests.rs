use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use recall::{memoize, memoize_fallible, Memo, Recurse};

/// Iterative reference for the Fibonacci numbers.
fn fib_reference(n: u64) -> u64 {
    let (mut a, mut b) = (0, 1);
    for _ in 0..n {
        (a, b) = (b, a + b);
    }
    a
}

/// Dynamic programming reference for the edit distance.
fn levenshtein_reference(a: &str, b: &str) -> usize {
    let b = b.as_bytes();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, x) in a.bytes().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &y) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + usize::from(x != y));
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Edit distance over positions into both strings, memoized per position pair.
fn levenshtein_memoized(a: &str, b: &str) -> usize {
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
    lev.call((0, 0))
}

fn fib_body(fib: &dyn Recurse<u64, u64>, n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fib.call(n - 1) + fib.call(n - 2),
    }
}

/// Test that a repeated call does not compute again.
#[test]
fn test_hit_does_not_compute() {
    let runs = AtomicUsize::new(0);
    let sum = memoize(|_, (a, b): (u32, u32)| {
        runs.fetch_add(1, Ordering::SeqCst);
        a + b
    });

    assert_eq!(sum.call((2, 4)), 6);
    assert_eq!(sum.call((2, 3)), 5);
    assert_eq!(sum.call((2, 3)), 5);
    assert_eq!(sum.call((4, 2)), 6);
    assert_eq!(sum.call((2, 4)), 6);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert_eq!(sum.stats().hits(), 2);
    assert_eq!(sum.stats().misses(), 3);
}

/// Test Fibonacci through the recursion handle.
#[test]
fn test_fibonacci() {
    let fib = memoize(fib_body);
    assert_eq!(fib.call(0), 0);
    assert_eq!(fib.call(1), 1);
    assert_eq!(fib.call(10), 55);
    for n in 0..=40 {
        assert_eq!(fib.call(n), fib_reference(n), "fib({n})");
    }

    // Every sub-problem was computed exactly once.
    assert_eq!(fib.len(), 41);
    assert_eq!(fib.stats().misses(), 41);
}

/// Test that every recursive step goes through the cache.
#[test]
fn test_recursive_steps_are_memoized() {
    let runs = AtomicUsize::new(0);
    let fib = memoize(|fib, n: u64| -> u64 {
        runs.fetch_add(1, Ordering::SeqCst);
        if n < 2 { n } else { fib.call(n - 1) + fib.call(n - 2) }
    });

    assert_eq!(fib.call(40), 102_334_155);
    assert_eq!(runs.load(Ordering::SeqCst), 41);
    assert_eq!(fib.call(39), 63_245_986);
    assert_eq!(runs.load(Ordering::SeqCst), 41);
}

/// Test the edit distance over two arguments.
#[test]
fn test_levenshtein() {
    let (a, b) = ("0x7c682a13b4d", "0x7d642b13b4e");
    assert_eq!(levenshtein_memoized(a, b), levenshtein_reference(a, b));
    assert_eq!(levenshtein_memoized(a, b), 4);

    let (a, b) = (
        "0x7c682a13b4d456e567f9678234098d",
        "0x7d642b13b4e546e566782183037c89",
    );
    assert_eq!(levenshtein_memoized(a, b), levenshtein_reference(a, b));
    assert_eq!(levenshtein_memoized("", "abc"), 3);
    assert_eq!(levenshtein_memoized("kitten", "sitting"), 3);
}

/// Test that the cache only ever grows.
#[test]
fn test_monotonic_growth() {
    let fib = memoize(fib_body);
    assert!(fib.is_empty());

    let mut sizes = vec![fib.len()];
    for n in [5, 3, 12, 12, 0, 20, 7, 25, 1] {
        fib.call(n);
        sizes.push(fib.len());
    }

    assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]), "{sizes:?}");
    assert_eq!(fib.len(), 26);
}

/// Test that a clone starts with an empty cache.
#[test]
fn test_clone_starts_empty() {
    let runs = AtomicUsize::new(0);
    let square = memoize(|_, x: i64| {
        runs.fetch_add(1, Ordering::SeqCst);
        x * x
    });

    assert_eq!(square.call(9), 81);
    assert_eq!(square.call(9), 81);
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let copy = square.clone();
    assert!(copy.is_empty());
    assert_eq!(copy.stats().total(), 0);
    assert_eq!(copy.call(9), 81);
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    // The original is unaffected by the copy.
    assert_eq!(square.len(), 1);
    assert_eq!(square.call(9), 81);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Test that a panicking computation leaves no entry behind.
#[test]
fn test_panic_does_not_poison() {
    let fail = Cell::new(true);
    let runs = Cell::new(0);
    let id = memoize(|_, x: u32| {
        runs.set(runs.get() + 1);
        if x == 13 && fail.get() {
            panic!("unlucky number");
        }
        x
    });

    assert_eq!(id.call(12), 12);
    let result = panic::catch_unwind(AssertUnwindSafe(|| id.call(13)));
    assert!(result.is_err());
    assert!(!id.is_cached(&13));
    assert_eq!(id.len(), 1);

    // The same call retries from scratch.
    let result = panic::catch_unwind(AssertUnwindSafe(|| id.call(13)));
    assert!(result.is_err());
    assert_eq!(runs.get(), 3);

    fail.set(false);
    assert_eq!(id.call(13), 13);
    assert!(id.is_cached(&13));
    assert_eq!(runs.get(), 4);
}

/// Test a panic deep inside a recursion.
#[test]
fn test_nested_panic_keeps_completed_calls() {
    let fail = Cell::new(true);
    let triangle = memoize(|triangle, n: u64| -> u64 {
        let below = if n == 0 { 0 } else { triangle.call(n - 1) };
        if n == 3 && fail.get() {
            panic!("failed at three");
        }
        n + below
    });

    let result = panic::catch_unwind(AssertUnwindSafe(|| triangle.call(6)));
    assert!(result.is_err());

    // Calls below the failure completed, the failing one and its callers did not.
    for n in 0..3 {
        assert!(triangle.is_cached(&n));
    }
    for n in 3..=6 {
        assert!(!triangle.is_cached(&n));
    }

    fail.set(false);
    let misses = triangle.stats().misses();
    assert_eq!(triangle.call(6), 21);
    assert_eq!(triangle.stats().misses() - misses, 4);
}

/// Test that only successful results of a fallible function are cached.
#[test]
fn test_fallible_errors_are_not_cached() {
    let runs = AtomicUsize::new(0);
    let parse = memoize_fallible(|_, text: String| -> Result<i32, String> {
        runs.fetch_add(1, Ordering::SeqCst);
        text.trim().parse::<i32>().map_err(|err| err.to_string())
    });

    assert!(parse.call("x".into()).is_err());
    assert!(parse.call("x".into()).is_err());
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(!parse.is_cached(&"x".into()));

    assert_eq!(parse.call(" 5".into()), Ok(5));
    assert_eq!(parse.call(" 5".into()), Ok(5));
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert_eq!(parse.len(), 1);
}

/// Test that a fallible recursion propagates errors from sub-calls.
#[test]
fn test_fallible_recursion() {
    let depth = memoize_fallible(|depth, path: Vec<u8>| -> Result<usize, String> {
        match path.split_last() {
            None => Ok(0),
            Some((0, _)) => Err("zero segment".into()),
            Some((_, rest)) => Ok(depth.call(rest.to_vec())? + 1),
        }
    });

    assert_eq!(depth.call(vec![1, 2, 3]), Ok(3));
    assert_eq!(depth.len(), 4);
    assert_eq!(depth.call(vec![0, 2, 3]), Err("zero segment".into()));
    assert!(!depth.is_cached(&vec![0, 2, 3]));
    assert!(!depth.is_cached(&vec![0]));
    assert_eq!(depth.len(), 4);
}

/// Test recursive calls from many threads at once.
#[test]
fn test_concurrent_recursion() {
    let runs = AtomicUsize::new(0);
    let fib = memoize(|fib, n: u64| -> u64 {
        runs.fetch_add(1, Ordering::SeqCst);
        if n < 2 { n } else { fib.call(n - 1) + fib.call(n - 2) }
    });

    thread::scope(|scope| {
        for t in 0..8u64 {
            let fib = &fib;
            scope.spawn(move || {
                // Mix overlapping and disjoint keys in a different order per thread.
                for i in 0..60 {
                    let n = (i * 7 + t * 13) % 61;
                    assert_eq!(fib.call(n), fib_reference(n));
                }
            });
        }
    });

    assert_eq!(fib.len(), 61);
    assert_eq!(runs.load(Ordering::SeqCst), 61);
    for n in 0..=60 {
        assert!(fib.is_cached(&n));
        assert_eq!(fib.call(n), fib_reference(n));
    }
}

/// Test that racing callers on one key compute it once.
#[test]
fn test_concurrent_same_key() {
    let runs = AtomicUsize::new(0);
    let slow = memoize(|_, x: u32| {
        runs.fetch_add(1, Ordering::SeqCst);
        thread::sleep(std::time::Duration::from_millis(5));
        x + 1
    });

    thread::scope(|scope| {
        for _ in 0..16 {
            scope.spawn(|| assert_eq!(slow.call(41), 42));
        }
    });

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(slow.stats().hits(), 15);
}

/// Test that a memo can be named and passed around.
#[test]
fn test_named_type() {
    fn build() -> Memo<u64, u64, fn(&dyn Recurse<u64, u64>, u64) -> u64> {
        memoize(fib_body as fn(&dyn Recurse<u64, u64>, u64) -> u64)
    }

    let fib = build();
    let handle: &dyn Recurse<u64, u64> = &fib;
    assert_eq!(handle.call(30), 832_040);
    assert_eq!(fib.len(), 31);
    assert!(format!("{fib:?}").starts_with("Memo"));
}

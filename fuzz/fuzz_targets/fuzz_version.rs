#![no_main]

use std::cmp::Ordering;

use libfuzzer_sys::fuzz_target;
use pubspec_lsp::version::{compare, is_newer};

fuzz_target!(|data: (&str, &str)| {
    let (a, b) = data;

    let forward = compare(a, b);
    let backward = compare(b, a);

    match (forward, backward) {
        (Ok(ab), Ok(ba)) => {
            assert_eq!(ab, ba.reverse(), "comparison must be antisymmetric");
            assert_eq!(compare(a, a), Ok(Ordering::Equal), "comparison must be reflexive");
            assert_eq!(is_newer(a, a), Ok(false), "a version is never newer than itself");
            assert_eq!(is_newer(a, b), Ok(ab == Ordering::Less));
        }
        (Err(_), Err(_)) => {}
        _ => panic!("a malformed side must fail both directions"),
    }
});

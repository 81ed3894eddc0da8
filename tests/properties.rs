//! Property-based checks over random byte strings, in the style of the
//! teacher crate's `construct/sacak0/tests.rs`. Lengths are scaled down
//! from spec.md's "maximum-size input" boundary case to keep `cargo test`
//! fast; `large_smoke_test` below re-checks at a size close to that
//! boundary and is `#[ignore]`d by default.

use proptest::prelude::*;
use sacabwt::{bwt, inverse_bwt, sa_search, sa_simplesearch, suffix_array, sufcheck, SuffixArray};

macro_rules! bytes {
    ($range:expr) => {
        prop::collection::vec(any::<u8>(), $range)
    };
}

fn is_permutation_of_0n(sa: &[u32], n: usize) -> bool {
    if sa.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &x in sa {
        let x = x as usize;
        if x >= n || seen[x] {
            return false;
        }
        seen[x] = true;
    }
    true
}

fn is_sorted_order(t: &[u8], sa: &[u32]) -> bool {
    for w in sa.windows(2) {
        if t[w[0] as usize..] >= t[w[1] as usize..] {
            return false;
        }
    }
    true
}

proptest! {
    #[test]
    fn suffix_array_is_a_permutation(s in bytes!(0..2000_usize)) {
        let sa = suffix_array(&s);
        prop_assert!(is_permutation_of_0n(&sa, s.len()));
    }

    #[test]
    fn suffix_array_is_sorted(s in bytes!(0..2000_usize)) {
        let sa = suffix_array(&s);
        prop_assert!(is_sorted_order(&s, &sa));
    }

    #[test]
    fn suffix_array_passes_sufcheck(s in bytes!(0..2000_usize)) {
        let sa = suffix_array(&s);
        prop_assert_eq!(sufcheck(&s, &sa, false), 0);
    }

    #[test]
    fn bwt_round_trips(s in bytes!(0..2000_usize)) {
        let (b, idx) = bwt(&s);
        let restored = inverse_bwt(&b, idx).unwrap();
        prop_assert_eq!(restored, s);
    }

    #[test]
    fn search_agrees_with_naive_scan(s in bytes!(1..500_usize), pat in bytes!(1..8_usize)) {
        let sa = suffix_array(&s);
        let (count, first) = sa_search(&s, &pat, &sa);

        let mut expected: Vec<usize> = (0..=s.len().saturating_sub(pat.len()))
            .filter(|&i| s[i..].starts_with(&pat[..]))
            .collect();
        expected.sort();

        if count == 0 {
            prop_assert!(expected.is_empty());
        } else {
            let mut found: Vec<usize> = (0..count)
                .map(|o| sa[(first + o) as usize] as usize)
                .collect();
            found.sort();
            prop_assert_eq!(found, expected);
        }
    }

    #[test]
    fn bucketed_search_agrees_with_naive_scan(s in bytes!(1..500_usize), pat in bytes!(1..8_usize)) {
        let mut sa = SuffixArray::new(&s[..]);
        sa.enable_buckets();

        let mut expected: Vec<usize> = (0..=s.len().saturating_sub(pat.len()))
            .filter(|&i| s[i..].starts_with(&pat[..]))
            .collect();
        expected.sort();

        let mut found: Vec<usize> = sa.search_all(&pat[..]).iter().map(|&i| i as usize).collect();
        found.sort();
        prop_assert_eq!(found, expected.clone());

        prop_assert_eq!(sa.contains(&pat[..]), !expected.is_empty());
    }

    #[test]
    fn simplesearch_agrees_with_naive_scan(s in bytes!(1..500_usize), c in any::<u8>()) {
        let sa = suffix_array(&s);
        let (count, first) = sa_simplesearch(&s, &sa, c);

        let mut expected: Vec<usize> = (0..s.len()).filter(|&i| s[i] == c).collect();
        expected.sort();

        if count == 0 {
            prop_assert!(expected.is_empty());
        } else {
            let mut found: Vec<usize> = (0..count)
                .map(|o| sa[(first + o) as usize] as usize)
                .collect();
            found.sort();
            prop_assert_eq!(found, expected);
        }
    }
}

#[test]
#[ignore]
fn large_smoke_test() {
    use rand::{thread_rng, Rng};

    let mut rng = thread_rng();
    let n = 200_000usize;
    let s: Vec<u8> = (0..n).map(|_| rng.gen_range(0, 4)).collect();

    let sa = suffix_array(&s);
    assert!(is_permutation_of_0n(&sa, s.len()));
    assert!(is_sorted_order(&s, &sa));
    assert_eq!(sufcheck(&s, &sa, false), 0);

    let (b, idx) = bwt(&s);
    assert_eq!(inverse_bwt(&b, idx).unwrap(), s);
}

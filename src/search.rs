//! Pattern search and suffix-array validation over a constructed SA.
//!
//! Ported from `sa_search`/`sa_simplesearch`/`sufcheck` in upstream
//! libdivsufsort (`examples/original_source/include/utils.hpp`). Binary
//! search with LCP memoization: each half-interval carries the match depth
//! already established against its boundary, so re-comparison never
//! restarts from zero.

/// Validates that `sa` is a correct suffix array of `t`.
///
/// Returns `0` on success, matching upstream's status codes: `-1` invalid
/// arguments, `-2` an index out of `[0, n)`, `-3` suffixes out of order,
/// `-4` a suffix in the wrong bucket position. When `verbose` is set,
/// failures are also printed to stderr, as upstream does.
pub fn sufcheck(t: &[u8], sa: &[u32], verbose: bool) -> i32 {
    let n = t.len();
    if sa.len() != n {
        if verbose {
            eprintln!("sufcheck: Invalid arguments.");
        }
        return -1;
    }
    if n == 0 {
        if verbose {
            eprintln!("sufcheck: Done.");
        }
        return 0;
    }

    for (i, &s) in sa.iter().enumerate() {
        if s as usize >= n {
            if verbose {
                eprintln!("sufcheck: Out of the range [0,{}].\n  SA[{}]={}", n - 1, i, s);
            }
            return -2;
        }
    }

    for i in 1..n {
        if t[sa[i - 1] as usize] > t[sa[i] as usize] {
            if verbose {
                eprintln!(
                    "sufcheck: Suffixes in wrong order.\n  T[SA[{}]={}]={} > T[SA[{}]={}]={}",
                    i - 1,
                    sa[i - 1],
                    t[sa[i - 1] as usize],
                    i,
                    sa[i],
                    t[sa[i] as usize]
                );
            }
            return -3;
        }
    }

    let mut c = [0i64; 256];
    for &b in t {
        c[b as usize] += 1;
    }
    let mut p = 0i64;
    for ch in c.iter_mut() {
        let cnt = *ch;
        *ch = p;
        p += cnt;
    }

    let last_c = t[n - 1] as usize;
    let mut q = c[last_c];
    c[last_c] += 1;

    for i in 0..n {
        let sp = sa[i] as i64;
        let (ch, t_idx): (usize, i64) = if sp > 0 {
            let p = sp - 1;
            (t[p as usize] as usize, c[t[p as usize] as usize])
        } else {
            ((t[n - 1]) as usize, q)
        };
        let p = if sp > 0 { sp - 1 } else { (n - 1) as i64 };

        if t_idx < 0 || sa[t_idx as usize] as i64 != p {
            if verbose {
                eprintln!(
                    "sufcheck: Suffix in wrong position.\n  SA[{}]={} or\n  SA[{}]={}",
                    t_idx,
                    if t_idx >= 0 { sa[t_idx as usize] as i64 } else { -1 },
                    i,
                    sa[i]
                );
            }
            return -4;
        }
        if t_idx != q {
            c[ch] += 1;
            if c[ch] >= n as i64 || t[sa[c[ch] as usize] as usize] as usize != ch {
                c[ch] = -1;
            }
        }
    }

    if verbose {
        eprintln!("sufcheck: Done.");
    }
    0
}

fn compare_from(t: &[u8], p: &[u8], suf: usize, match_len: &mut usize) -> i32 {
    let mut i = suf + *match_len;
    let mut j = *match_len;
    let mut r = 0i32;
    while i < t.len() && j < p.len() {
        r = t[i] as i32 - p[j] as i32;
        if r != 0 {
            break;
        }
        i += 1;
        j += 1;
    }
    *match_len = j;
    if r == 0 {
        if j != p.len() {
            -1
        } else {
            0
        }
    } else {
        r
    }
}

/// Finds the contiguous range of `sa` whose suffixes start with `pat`.
///
/// Returns `(count, first_index)`: `sa[first_index..first_index+count]` are
/// exactly the matching suffixes, in SA order. `count == 0` means no match;
/// `first_index` is then the insertion point.
pub fn sa_search(t: &[u8], pat: &[u8], sa: &[u32]) -> (i32, i32) {
    if sa.is_empty() || t.is_empty() {
        return (0, -1);
    }
    if pat.is_empty() {
        return (sa.len() as i32, 0);
    }

    let mut i = 0usize;
    let mut j = 0usize;
    let mut k = 0usize;
    let mut lmatch = 0usize;
    let mut rmatch = 0usize;
    let mut size = sa.len();
    let mut half = size >> 1;

    while size > 0 {
        let mut m = lmatch.min(rmatch);
        let r = compare_from(t, pat, sa[i + half] as usize, &mut m);
        if r < 0 {
            i += half + 1;
            half -= (size & 1) ^ 1;
            lmatch = m;
        } else if r > 0 {
            rmatch = m;
        } else {
            let mut lsize = half;
            j = i;
            let mut rsize = size - half - 1;
            k = i + half + 1;

            let mut llmatch = lmatch;
            let mut lrmatch = m;
            let mut lhalf = lsize >> 1;
            while lsize > 0 {
                let mut lm = llmatch.min(lrmatch);
                let r = compare_from(t, pat, sa[j + lhalf] as usize, &mut lm);
                if r < 0 {
                    j += lhalf + 1;
                    lhalf -= (lsize & 1) ^ 1;
                    llmatch = lm;
                } else {
                    lrmatch = lm;
                }
                lsize = lhalf;
                lhalf >>= 1;
            }

            let mut rlmatch = m;
            let mut rrmatch = rmatch;
            let mut rhalf = rsize >> 1;
            while rsize > 0 {
                let mut rm = rlmatch.min(rrmatch);
                let r = compare_from(t, pat, sa[k + rhalf] as usize, &mut rm);
                if r <= 0 {
                    k += rhalf + 1;
                    rhalf -= (rsize & 1) ^ 1;
                    rlmatch = rm;
                } else {
                    rrmatch = rm;
                }
                rsize = rhalf;
                rhalf >>= 1;
            }

            break;
        }
        size = half;
        half >>= 1;
    }

    let idx = if k > j { j } else { i };
    ((k as i32) - (j as i32), idx as i32)
}

/// Finds the contiguous range of `sa` whose suffixes start with byte `c`.
pub fn sa_simplesearch(t: &[u8], sa: &[u32], c: u8) -> (i32, i32) {
    if sa.is_empty() || t.is_empty() {
        return (0, -1);
    }
    let c = c as i32;

    let rank = |p: u32| -> i32 {
        if (p as usize) < t.len() {
            t[p as usize] as i32 - c
        } else {
            -1
        }
    };

    let mut i = 0usize;
    let mut j;
    let mut k;
    let mut size = sa.len();
    let mut half = size >> 1;

    loop {
        if size == 0 {
            return (0, i as i32);
        }
        let r = rank(sa[i + half]);
        if r < 0 {
            i += half + 1;
            half -= (size & 1) ^ 1;
        } else if r == 0 {
            let mut lsize = half;
            j = i;
            let mut rsize = size - half - 1;
            k = i + half + 1;

            let mut lhalf = lsize >> 1;
            while lsize > 0 {
                let r = rank(sa[j + lhalf]);
                if r < 0 {
                    j += lhalf + 1;
                    lhalf -= (lsize & 1) ^ 1;
                }
                lsize = lhalf;
                lhalf >>= 1;
            }

            let mut rhalf = rsize >> 1;
            while rsize > 0 {
                let r = rank(sa[k + rhalf]);
                if r <= 0 {
                    k += rhalf + 1;
                    rhalf -= (rsize & 1) ^ 1;
                }
                rsize = rhalf;
                rhalf >>= 1;
            }

            let idx = if k > j { j } else { i };
            return ((k as i32) - (j as i32), idx as i32);
        } else {
            // rmatch branch: narrowing continues with the same size/half update.
        }
        size = half;
        half >>= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divsufsort::suffix_array;

    #[test]
    fn sufcheck_accepts_correct_sa() {
        let t = b"mississippi";
        let sa = suffix_array(t);
        assert_eq!(sufcheck(t, &sa, false), 0);
    }

    #[test]
    fn sufcheck_rejects_shuffled_sa() {
        let t = b"banana";
        let mut sa = suffix_array(t);
        sa.swap(0, 1);
        assert_ne!(sufcheck(t, &sa, false), 0);
    }

    #[test]
    fn sufcheck_empty() {
        assert_eq!(sufcheck(b"", &[], false), 0);
    }

    #[test]
    fn search_finds_all_occurrences() {
        let t = b"banana";
        let sa = suffix_array(t);
        let (count, first) = sa_search(t, b"ana", &sa);
        assert_eq!(count, 2);
        let mut found: Vec<usize> = (0..count).map(|o| sa[(first + o) as usize] as usize).collect();
        found.sort();
        assert_eq!(found, vec![1, 3]);
    }

    #[test]
    fn search_missing_pattern() {
        let t = b"banana";
        let sa = suffix_array(t);
        let (count, _) = sa_search(t, b"xyz", &sa);
        assert_eq!(count, 0);
    }

    #[test]
    fn search_empty_pattern_matches_everything() {
        let t = b"banana";
        let sa = suffix_array(t);
        let (count, first) = sa_search(t, b"", &sa);
        assert_eq!(count, sa.len() as i32);
        assert_eq!(first, 0);
    }

    #[test]
    fn simplesearch_finds_character() {
        let t = b"banana";
        let sa = suffix_array(t);
        let (count, first) = sa_simplesearch(t, &sa, b'a');
        assert_eq!(count, 3);
        let mut found: Vec<usize> = (0..count).map(|o| sa[(first + o) as usize] as usize).collect();
        found.sort();
        assert_eq!(found, vec![1, 3, 5]);
    }
}

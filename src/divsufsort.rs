//! Bucket-induction driver (C5): classifies suffixes, sorts the B* set via
//! [`crate::sssort`]/[`crate::trsort`], then induces the full suffix array
//! in two linear passes.
//!
//! Ported from `sort_typeBstar`/`construct_SA` in upstream libdivsufsort
//! (`examples/original_source/include/divsufsort.hpp`). `bucket_B` serves
//! both the `BUCKET_B(c0,c1)` and `BUCKET_BSTAR(c0,c1)` views via swapped
//! index order, exactly as upstream's macro pair.

use crate::sssort::sssort;
use crate::trsort::trsort;

const ALPHABET: i32 = 256;

#[inline]
fn bucket_b_idx(c0: i32, c1: i32) -> usize {
    (c1 * ALPHABET + c0) as usize
}

#[inline]
fn bucket_bstar_idx(c0: i32, c1: i32) -> usize {
    (c0 * ALPHABET + c1) as usize
}

#[cfg(feature = "parallel")]
struct SendPtr<T>(*mut T);
#[cfg(feature = "parallel")]
unsafe impl<T> Send for SendPtr<T> {}
#[cfg(feature = "parallel")]
unsafe impl<T> Sync for SendPtr<T> {}

/// Classifies every suffix as type A/B/B*, counts per-bucket occurrences,
/// writes the B* starting positions into the tail of `sa`, sorts the B*
/// substrings, ranks them via [`trsort`], and scatters the B* suffixes back
/// into their final bucket slots. Returns `m`, the B* suffix count.
///
/// # Safety
/// `t` must be valid for `n` bytes, `sa` valid for `n` elements,
/// `bucket_a` valid for 256 elements, `bucket_b` valid for `256*256`
/// elements and zero-initialized.
pub(crate) unsafe fn sort_typebstar(t: *const u8, sa: *mut i32, bucket_a: *mut i32, bucket_b: *mut i32, n: i32) -> i32 {
    let mut m = n;
    let mut i = n - 1;
    let mut c0 = *t.offset(i as isize) as i32;
    let mut c1;

    while i >= 0 {
        loop {
            c1 = c0;
            *bucket_a.offset(c1 as isize) += 1;
            i -= 1;
            if i < 0 {
                break;
            }
            c0 = *t.offset(i as isize) as i32;
            if c0 < c1 {
                break;
            }
        }
        if i >= 0 {
            *bucket_b.offset(bucket_bstar_idx(c0, c1) as isize) += 1;
            m -= 1;
            *sa.offset(m as isize) = i;
            i -= 1;
            c1 = c0;
            while i >= 0 {
                c0 = *t.offset(i as isize) as i32;
                if c0 > c1 {
                    break;
                }
                *bucket_b.offset(bucket_b_idx(c0, c1) as isize) += 1;
                i -= 1;
                c1 = c0;
            }
        }
    }
    m = n - m;

    let mut ii = 0i32;
    let mut jj = 0i32;
    for c0 in 0..ALPHABET {
        let tmp = ii + *bucket_a.offset(c0 as isize);
        *bucket_a.offset(c0 as isize) = ii + jj;
        ii = tmp + *bucket_b.offset(bucket_b_idx(c0, c0) as isize);
        for c1 in (c0 + 1)..ALPHABET {
            jj += *bucket_b.offset(bucket_bstar_idx(c0, c1) as isize);
            *bucket_b.offset(bucket_bstar_idx(c0, c1) as isize) = jj;
            ii += *bucket_b.offset(bucket_b_idx(c0, c1) as isize);
        }
    }

    if m > 0 {
        let pab = sa.offset((n - m) as isize);
        let isab = sa.offset(m as isize);

        let mut i = m - 2;
        while i >= 0 {
            let tpos = *pab.offset(i as isize);
            let c0 = *t.offset(tpos as isize) as i32;
            let c1 = *t.offset((tpos + 1) as isize) as i32;
            let idx = bucket_b.offset(bucket_bstar_idx(c0, c1) as isize);
            *idx -= 1;
            *sa.offset(*idx as isize) = i;
            i -= 1;
        }
        {
            let tpos = *pab.offset((m - 1) as isize);
            let c0 = *t.offset(tpos as isize) as i32;
            let c1 = *t.offset((tpos + 1) as isize) as i32;
            let idx = bucket_b.offset(bucket_bstar_idx(c0, c1) as isize);
            *idx -= 1;
            *sa.offset(*idx as isize) = m - 1;
        }

        sort_bstar_substrings(t, pab, sa, bucket_b, n, m);

        let mut i = m - 1;
        while i >= 0 {
            if *sa.offset(i as isize) >= 0 {
                let j = i;
                loop {
                    *isab.offset(*sa.offset(i as isize) as isize) = i;
                    i -= 1;
                    if !(i >= 0 && *sa.offset(i as isize) >= 0) {
                        break;
                    }
                }
                *sa.offset((i + 1) as isize) = i - j;
                if i <= 0 {
                    break;
                }
            }
            let j = i;
            loop {
                let v = !*sa.offset(i as isize);
                *sa.offset(i as isize) = v;
                *isab.offset(v as isize) = j;
                i -= 1;
                if !(*sa.offset(i as isize) < 0) {
                    break;
                }
            }
            *isab.offset(*sa.offset(i as isize) as isize) = j;
        }

        trsort(isab, sa, m, 1);

        let mut i = n - 1;
        let mut j = m;
        let mut c0 = *t.offset(i as isize) as i32;
        while i >= 0 {
            let mut c1;
            loop {
                i -= 1;
                c1 = c0;
                if !(i >= 0) {
                    break;
                }
                c0 = *t.offset(i as isize) as i32;
                if c0 < c1 {
                    break;
                }
            }
            if i >= 0 {
                let tpos = i;
                loop {
                    i -= 1;
                    c1 = c0;
                    if !(i >= 0) {
                        break;
                    }
                    c0 = *t.offset(i as isize) as i32;
                    if c0 > c1 {
                        break;
                    }
                }
                j -= 1;
                let isab_j = *isab.offset(j as isize);
                *sa.offset(isab_j as isize) = if tpos == 0 || 1 < (tpos - i) { tpos } else { !tpos };
            }
        }

        *bucket_b.offset(bucket_b_idx(ALPHABET - 1, ALPHABET - 1) as isize) = n;
        let mut k = m - 1;
        for c0 in (0..=(ALPHABET - 2)).rev() {
            let mut i = *bucket_a.offset((c0 + 1) as isize) - 1;
            for c1 in ((c0 + 1)..ALPHABET).rev() {
                let t_ = i - *bucket_b.offset(bucket_b_idx(c0, c1) as isize);
                *bucket_b.offset(bucket_b_idx(c0, c1) as isize) = i;

                let mut j = *bucket_b.offset(bucket_bstar_idx(c0, c1) as isize);
                i = t_;
                while j <= k {
                    *sa.offset(i as isize) = *sa.offset(k as isize);
                    i -= 1;
                    k -= 1;
                    j += 1;
                }
            }
            *bucket_b.offset(bucket_bstar_idx(c0, c0 + 1) as isize) = i - *bucket_b.offset(bucket_b_idx(c0, c0) as isize) + 1;
            *bucket_b.offset(bucket_b_idx(c0, c0) as isize) = i;
        }
    }

    m
}

#[cfg(not(feature = "parallel"))]
unsafe fn sort_bstar_substrings(t: *const u8, pab: *const i32, sa: *mut i32, bucket_b: *mut i32, n: i32, m: i32) {
    let buf = sa.offset(m as isize);
    let bufsize = n - 2 * m;
    let mut j = m;
    for c0 in (0..=(ALPHABET - 2)).rev() {
        let mut c1 = ALPHABET - 1;
        while c0 < c1 {
            let i = *bucket_b.offset(bucket_bstar_idx(c0, c1) as isize);
            if 1 < (j - i) {
                sssort(t, pab, sa.offset(i as isize), sa.offset(j as isize), buf, bufsize, 2, n, *sa.offset(i as isize) == m - 1);
            }
            j = i;
            c1 -= 1;
        }
    }
}

#[cfg(feature = "parallel")]
unsafe fn sort_bstar_substrings(t: *const u8, pab: *const i32, sa: *mut i32, bucket_b: *mut i32, n: i32, m: i32) {
    use std::sync::Mutex;

    let num_threads = rayon::current_num_threads().max(1) as i32;
    let bufsize = (n - 2 * m) / num_threads;
    let base_buf = sa.offset(m as isize);

    let cursor = Mutex::new((ALPHABET - 2, ALPHABET - 1, m));
    let t_send = SendPtr(t as *mut u8);
    let pab_send = SendPtr(pab as *mut i32);
    let sa_send = SendPtr(sa);
    let bucket_b_send = SendPtr(bucket_b);
    let buf_send = SendPtr(base_buf);

    rayon::scope(|scope| {
        for tid in 0..num_threads {
            let cursor = &cursor;
            let t_send = &t_send;
            let pab_send = &pab_send;
            let sa_send = &sa_send;
            let bucket_b_send = &bucket_b_send;
            let buf_send = &buf_send;
            scope.spawn(move |_| {
                let t = t_send.0 as *const u8;
                let pab = pab_send.0 as *const i32;
                let sa = sa_send.0;
                let bucket_b = bucket_b_send.0;
                let curbuf = buf_send.0.offset((tid * bufsize) as isize);

                loop {
                    let (k, l) = {
                        let mut guard = cursor.lock().unwrap();
                        let (ref mut c0, ref mut c1, ref mut j) = *guard;
                        let mut l = *j;
                        let mut k = 0;
                        if l > 0 {
                            let mut d0 = *c0;
                            let mut d1 = *c1;
                            loop {
                                k = *bucket_b.offset(bucket_bstar_idx(d0, d1) as isize);
                                d1 -= 1;
                                if d1 <= d0 {
                                    d1 = ALPHABET - 1;
                                    d0 -= 1;
                                    if d0 < 0 {
                                        break;
                                    }
                                }
                                if (l - k) <= 1 {
                                    l = k;
                                    if l <= 0 {
                                        break;
                                    }
                                } else {
                                    break;
                                }
                            }
                            *c0 = d0;
                            *c1 = d1;
                            *j = k;
                        }
                        (k, l)
                    };
                    if l == 0 {
                        break;
                    }
                    sssort(
                        t,
                        pab,
                        sa.offset(k as isize),
                        sa.offset(l as isize),
                        curbuf,
                        bufsize,
                        2,
                        n,
                        *sa.offset(k as isize) == m - 1,
                    );
                }
            });
        }
    });
}

/// Induces the full suffix array from the sorted/ranked B* suffixes.
///
/// # Safety
/// Same requirements as [`sort_typebstar`]; `m` must be the value it
/// returned for this `(t, n)`.
pub(crate) unsafe fn construct_sa(t: *const u8, sa: *mut i32, bucket_a: *mut i32, bucket_b: *mut i32, n: i32, m: i32) {
    let mut c2;
    if m > 0 {
        for c1 in (0..=(ALPHABET - 2)).rev() {
            let mut i = sa.offset(*bucket_b.offset(bucket_bstar_idx(c1, c1 + 1) as isize) as isize);
            let mut j = sa.offset((*bucket_a.offset((c1 + 1) as isize) - 1) as isize);
            let mut k = j;
            c2 = -1;
            while i <= j {
                let s = *j;
                if s > 0 {
                    *j = !s;
                    let mut s = s - 1;
                    let c0 = *t.offset(s as isize) as i32;
                    if s > 0 && (*t.offset((s - 1) as isize) as i32) > c0 {
                        s = !s;
                    }
                    if c0 != c2 {
                        if c2 >= 0 {
                            *bucket_b.offset(bucket_b_idx(c2, c1) as isize) = k.offset_from(sa) as i32;
                        }
                        c2 = c0;
                        k = sa.offset(*bucket_b.offset(bucket_b_idx(c2, c1) as isize) as isize);
                    }
                    *k = s;
                    k = k.offset(-1);
                } else {
                    *j = !s;
                }
                j = j.offset(-1);
            }
        }
    }

    c2 = *t.offset((n - 1) as isize) as i32;
    let mut k = sa.offset(*bucket_a.offset(c2 as isize) as isize);
    *k = if (*t.offset((n - 2) as isize) as i32) < c2 { !(n - 1) } else { n - 1 };
    k = k.offset(1);

    let mut i = sa;
    let j = sa.offset(n as isize);
    while i < j {
        let s = *i;
        if s > 0 {
            let s2 = s - 1;
            let c0 = *t.offset(s2 as isize) as i32;
            let s_final = if s2 == 0 || (*t.offset((s2 - 1) as isize) as i32) < c0 { !s2 } else { s2 };
            if c0 != c2 {
                *bucket_a.offset(c2 as isize) = k.offset_from(sa) as i32;
                c2 = c0;
                k = sa.offset(*bucket_a.offset(c2 as isize) as isize);
            }
            *k = s_final;
            k = k.offset(1);
        } else {
            *i = !s;
        }
        i = i.offset(1);
    }
}

/// Maximum input length: `i32::MAX - 1`, matching upstream's signed 32-bit
/// index budget (one value is reserved as the bit-complement sentinel).
pub const MAX_LENGTH: usize = (i32::MAX as usize) - 1;

/// Builds the suffix array of `t` over the byte alphabet.
///
/// Returns a permutation of `0..t.len()` such that `t[sa[i]..]` is
/// non-decreasing in `i`. Panics if `t.len() > MAX_LENGTH`.
pub fn suffix_array(t: &[u8]) -> Vec<u32> {
    let n = t.len();
    assert!(n <= MAX_LENGTH, "input too long for suffix_array (max {})", MAX_LENGTH);

    match n {
        0 => return Vec::new(),
        1 => return vec![0],
        2 => {
            return if t[0] < t[1] { vec![0, 1] } else { vec![1, 0] };
        }
        _ => {}
    }

    let n32 = n as i32;
    let mut sa = vec![0i32; n];
    let mut bucket_a = [0i32; 256];
    let mut bucket_b: Box<[i32; 65536]> = Box::new([0i32; 65536]);

    unsafe {
        let m = sort_typebstar(t.as_ptr(), sa.as_mut_ptr(), bucket_a.as_mut_ptr(), bucket_b.as_mut_ptr(), n32);
        construct_sa(t.as_ptr(), sa.as_mut_ptr(), bucket_a.as_mut_ptr(), bucket_b.as_mut_ptr(), n32, m);
    }

    sa.into_iter().map(|x| x as u32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sa(t: &[u8]) -> Vec<u32> {
        let mut idx: Vec<u32> = (0..t.len() as u32).collect();
        idx.sort_by(|&a, &b| t[a as usize..].cmp(&t[b as usize..]));
        idx
    }

    fn check(s: &str) {
        let sa = suffix_array(s.as_bytes());
        assert_eq!(sa, naive_sa(s.as_bytes()), "mismatch for {:?}", s);
    }

    #[test]
    fn empty() {
        assert_eq!(suffix_array(b""), Vec::<u32>::new());
    }

    #[test]
    fn single_byte() {
        assert_eq!(suffix_array(b"a"), vec![0]);
    }

    #[test]
    fn two_bytes() {
        assert_eq!(suffix_array(b"ba"), vec![1, 0]);
        assert_eq!(suffix_array(b"ab"), vec![0, 1]);
    }

    #[test]
    fn banana() {
        assert_eq!(suffix_array(b"banana"), vec![5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn mississippi() {
        check("mississippi");
    }

    #[test]
    fn abracadabra() {
        check("abracadabra");
    }

    #[test]
    fn all_equal() {
        check("aaaaaaaaaa");
    }

    #[test]
    fn increasing() {
        check("abcdefghij");
    }

    #[test]
    fn decreasing() {
        check("jihgfedcba");
    }

    #[test]
    fn alternating() {
        check("abababababab");
    }

    #[test]
    fn tandem_repeats() {
        check("aabaabaabaabaab");
        check("aaabaaabaaab");
    }

    #[test]
    fn adversarial_ab_blocks() {
        let s = "a".repeat(20) + "b" + &"a".repeat(20) + "b" + &"a".repeat(20);
        check(&s);
    }

    #[test]
    fn bytes_with_low_values() {
        assert_eq!(suffix_array(b"\x02\x01\x00"), vec![2, 1, 0]);
    }

    #[test]
    fn fibonacci_word() {
        let mut a = String::from("a");
        let mut b = String::from("ab");
        for _ in 0..8 {
            let next = b.clone() + &a;
            a = b;
            b = next;
        }
        check(&b);
    }
}

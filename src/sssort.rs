//! Substring sorter (C3): bounded-depth, multikey-introsort + block-merge
//! sort of a contiguous range of B* suffix indices.
//!
//! Ported from `sssort.c` of upstream libdivsufsort (see
//! `examples/original_source/include/sssort.hpp`). The translation keeps the
//! original pointer-arithmetic shape: `pa` is the base of the B* position
//! array (`PAb`), and `first`/`last`/etc. are raw pointers into the caller's
//! exclusive sub-slice of the working `SA` array. Every entry point is
//! `unsafe` and documents the aliasing/disjointness it requires, per
//! spec.md §9.

use crate::common::{ilg, isqrt, SS_BLOCKSIZE, SS_INSERTIONSORT_THRESHOLD, SS_MISORT_STACKSIZE, SS_SMERGE_STACKSIZE};
use crate::stack::FixedStack;

#[inline]
unsafe fn ss_compare(t: *const u8, p1: *const i32, p2: *const i32, depth: i32) -> i32 {
    let mut u1 = t.offset((depth as isize) + (*p1 as isize));
    let mut u2 = t.offset((depth as isize) + (*p2 as isize));
    let u1n = t.offset((*p1.offset(1) + 2) as isize);
    let u2n = t.offset((*p2.offset(1) + 2) as isize);
    while u1 < u1n && u2 < u2n && *u1 == *u2 {
        u1 = u1.offset(1);
        u2 = u2.offset(1);
    }
    if u1 < u1n {
        if u2 < u2n {
            *u1 as i32 - *u2 as i32
        } else {
            1
        }
    } else if u2 < u2n {
        -1
    } else {
        0
    }
}

/// Insertion sort for small groups (below `SS_INSERTIONSORT_THRESHOLD`).
unsafe fn ss_insertionsort(t: *const u8, pa: *const i32, first: *mut i32, last: *mut i32, depth: i32) {
    let mut i = last.offset(-2);
    while first <= i {
        let x = *i;
        let mut j = i.offset(1);
        let mut r;
        loop {
            r = ss_compare(t, pa.offset(x as isize), pa.offset(*j as isize), depth);
            if r <= 0 {
                break;
            }
            loop {
                *j.offset(-1) = *j;
                j = j.offset(1);
                if !(j < last && *j < 0) {
                    break;
                }
            }
            if last <= j {
                break;
            }
        }
        if r == 0 {
            *j = !*j;
        }
        *j.offset(-1) = x;
        i = i.offset(-1);
    }
}

unsafe fn ss_fixdown(td: *const u8, pa: *const i32, sa: *mut i32, mut i: i32, size: i32) {
    let v = *sa.offset(i as isize);
    let mut c = *td.offset(*pa.offset(v as isize) as isize) as i32;
    loop {
        let j = 2 * i + 1;
        if j >= size {
            break;
        }
        let mut k = j;
        let mut d = *td.offset(*pa.offset(*sa.offset(k as isize) as isize) as isize) as i32;
        let jj = j + 1;
        if jj < size {
            let e = *td.offset(*pa.offset(*sa.offset(jj as isize) as isize) as isize) as i32;
            if d < e {
                k = jj;
                d = e;
            }
        }
        if d <= c {
            break;
        }
        *sa.offset(i as isize) = *sa.offset(k as isize);
        i = k;
    }
    *sa.offset(i as isize) = v;
}

unsafe fn ss_heapsort(td: *const u8, pa: *const i32, sa: *mut i32, size: i32) {
    let mut m = size;
    if size % 2 == 0 {
        m -= 1;
        if *td.offset(*pa.offset(*sa.offset((m / 2) as isize) as isize) as isize)
            < *td.offset(*pa.offset(*sa.offset(m as isize) as isize) as isize)
        {
            sa.offset(m as isize).swap(sa.offset((m / 2) as isize));
        }
    }

    let mut i = m / 2 - 1;
    while i >= 0 {
        ss_fixdown(td, pa, sa, i, m);
        i -= 1;
    }
    if size % 2 == 0 {
        sa.swap(sa.offset(m as isize));
        ss_fixdown(td, pa, sa, 0, m);
    }
    let mut i = m - 1;
    while i > 0 {
        let t = *sa;
        *sa = *sa.offset(i as isize);
        ss_fixdown(td, pa, sa, 0, i);
        *sa.offset(i as isize) = t;
        i -= 1;
    }
}

unsafe fn ss_median3(td: *const u8, pa: *const i32, v1: *mut i32, v2: *mut i32, v3: *mut i32) -> *mut i32 {
    let (mut v1, mut v2) = (v1, v2);
    if *td.offset(*pa.offset(*v1 as isize) as isize) > *td.offset(*pa.offset(*v2 as isize) as isize) {
        core::mem::swap(&mut v1, &mut v2);
    }
    if *td.offset(*pa.offset(*v2 as isize) as isize) > *td.offset(*pa.offset(*v3 as isize) as isize) {
        if *td.offset(*pa.offset(*v1 as isize) as isize) > *td.offset(*pa.offset(*v3 as isize) as isize) {
            return v1;
        }
        return v3;
    }
    v2
}

unsafe fn ss_median5(
    td: *const u8,
    pa: *const i32,
    v1: *mut i32,
    v2: *mut i32,
    v3: *mut i32,
    v4: *mut i32,
    v5: *mut i32,
) -> *mut i32 {
    let (mut v1, mut v2, mut v3, mut v4, mut v5) = (v1, v2, v3, v4, v5);
    let key = |p: *mut i32| -> u8 { *td.offset(*pa.offset(*p as isize) as isize) };
    if key(v2) > key(v3) {
        core::mem::swap(&mut v2, &mut v3);
    }
    if key(v4) > key(v5) {
        core::mem::swap(&mut v4, &mut v5);
    }
    if key(v2) > key(v4) {
        core::mem::swap(&mut v2, &mut v4);
        core::mem::swap(&mut v3, &mut v5);
    }
    if key(v1) > key(v3) {
        core::mem::swap(&mut v1, &mut v3);
    }
    if key(v1) > key(v4) {
        core::mem::swap(&mut v1, &mut v4);
        core::mem::swap(&mut v3, &mut v5);
    }
    if key(v3) > key(v4) {
        return v4;
    }
    v3
}

unsafe fn ss_pivot(td: *const u8, pa: *const i32, first: *mut i32, last: *mut i32) -> *mut i32 {
    let mut t = last.offset_from(first) as i32;
    let middle = first.offset((t / 2) as isize);

    if t <= 512 {
        if t <= 32 {
            return ss_median3(td, pa, first, middle, last.offset(-1));
        } else {
            t >>= 2;
            return ss_median5(
                td,
                pa,
                first,
                first.offset(t as isize),
                middle,
                last.offset(-1 - t as isize),
                last.offset(-1),
            );
        }
    }
    t >>= 3;
    let first = ss_median3(td, pa, first, first.offset(t as isize), first.offset((t << 1) as isize));
    let middle = ss_median3(td, pa, middle.offset(-(t as isize)), middle, middle.offset(t as isize));
    let last = ss_median3(
        td,
        pa,
        last.offset(-1 - (t << 1) as isize),
        last.offset(-1 - t as isize),
        last.offset(-1),
    );
    ss_median3(td, pa, first, middle, last)
}

/// Binary (two-way) partition for substrings, keyed by `PA[*p]+depth >= PA[*p+1]+1`.
unsafe fn ss_partition(pa: *const i32, first: *mut i32, last: *mut i32, depth: i32) -> *mut i32 {
    let mut a = first.offset(-1);
    let mut b = last;
    loop {
        a = a.offset(1);
        while a < b && (*pa.offset(*a as isize) + depth) >= (*pa.offset((*a + 1) as isize) + 1) {
            *a = !*a;
            a = a.offset(1);
        }
        if !(a < b) {
            b = b.offset(-1);
        } else {
            b = b.offset(-1);
            while a < b && (*pa.offset(*b as isize) + depth) < (*pa.offset((*b + 1) as isize) + 1) {
                b = b.offset(-1);
            }
        }
        if b <= a {
            break;
        }
        let t = !*b;
        *b = *a;
        *a = t;
    }
    if first < a {
        *first = !*first;
    }
    a
}

struct MiFrame {
    first: *mut i32,
    last: *mut i32,
    depth: i32,
    limit: i32,
}

/// Multikey introsort for medium-size groups (block phase).
unsafe fn ss_mintrosort(t: *const u8, pa: *const i32, first: *mut i32, last: *mut i32, depth: i32) {
    let mut stack: FixedStack<MiFrame, SS_MISORT_STACKSIZE> = FixedStack::new();
    let (mut first, mut last, mut depth) = (first, last, depth);
    let mut limit = ilg(last.offset_from(first) as i32);

    loop {
        if last.offset_from(first) as i32 <= SS_INSERTIONSORT_THRESHOLD {
            if last.offset_from(first) > 1 {
                ss_insertionsort(t, pa, first, last, depth);
            }
            if stack.is_empty() {
                return;
            }
            let f = stack.pop();
            first = f.first;
            last = f.last;
            depth = f.depth;
            limit = f.limit;
            continue;
        }

        let td = t.offset(depth as isize);
        if limit == 0 {
            ss_heapsort(td, pa, first, last.offset_from(first) as i32);
            limit = -1;
        } else {
            limit -= 1;
        }
        if limit < 0 {
            let mut a = first.offset(1);
            let mut v = *td.offset(*pa.offset(*first as isize) as isize) as i32;
            let mut x;
            while a < last {
                x = *td.offset(*pa.offset(*a as isize) as isize) as i32;
                if x != v {
                    if a.offset_from(first) > 1 {
                        break;
                    }
                    v = x;
                    first = a;
                }
                a = a.offset(1);
            }
            if (*td.offset((*pa.offset(*first as isize) - 1) as isize) as i32) < v {
                first = ss_partition(pa, first, a, depth);
            }
            if a.offset_from(first) <= last.offset_from(a) {
                if a.offset_from(first) > 1 {
                    stack.push(MiFrame { first: a, last, depth, limit: -1 });
                    last = a;
                    depth += 1;
                    limit = ilg(a.offset_from(first) as i32);
                } else {
                    first = a;
                    limit = -1;
                }
            } else if last.offset_from(a) > 1 {
                stack.push(MiFrame { first, last: a, depth: depth + 1, limit: ilg(a.offset_from(first) as i32) });
                first = a;
                limit = -1;
            } else {
                last = a;
                depth += 1;
                limit = ilg(a.offset_from(first) as i32);
            }
            continue;
        }

        // choose pivot
        let pivot = ss_pivot(td, pa, first, last);
        let v = *td.offset(*pa.offset(*pivot as isize) as isize) as i32;
        first.swap(pivot);

        // partition
        let mut b = first;
        let mut x;
        loop {
            b = b.offset(1);
            if !(b < last) {
                break;
            }
            x = *td.offset(*pa.offset(*b as isize) as isize) as i32;
            if x != v {
                break;
            }
        }
        let mut a = b;
        if a < last && x < v {
            loop {
                b = b.offset(1);
                if !(b < last) {
                    break;
                }
                x = *td.offset(*pa.offset(*b as isize) as isize) as i32;
                if x > v {
                    break;
                }
                if x == v {
                    b.swap(a);
                    a = a.offset(1);
                }
            }
        }
        let mut c = last;
        loop {
            c = c.offset(-1);
            if !(b < c) {
                break;
            }
            x = *td.offset(*pa.offset(*c as isize) as isize) as i32;
            if x != v {
                break;
            }
        }
        let mut d = c;
        if b < d && x > v {
            loop {
                c = c.offset(-1);
                if !(b < c) {
                    break;
                }
                x = *td.offset(*pa.offset(*c as isize) as isize) as i32;
                if x < v {
                    break;
                }
                if x == v {
                    c.swap(d);
                    d = d.offset(-1);
                }
            }
        }
        while b < c {
            b.swap(c);
            loop {
                b = b.offset(1);
                if !(b < c) {
                    break;
                }
                x = *td.offset(*pa.offset(*b as isize) as isize) as i32;
                if x > v {
                    break;
                }
                if x == v {
                    b.swap(a);
                    a = a.offset(1);
                }
            }
            loop {
                c = c.offset(-1);
                if !(b < c) {
                    break;
                }
                x = *td.offset(*pa.offset(*c as isize) as isize) as i32;
                if x < v {
                    break;
                }
                if x == v {
                    c.swap(d);
                    d = d.offset(-1);
                }
            }
        }

        if a <= d {
            let mut c = b.offset(-1);
            let mut s = a.offset_from(first);
            let mut tlen = b.offset_from(a);
            if s > tlen {
                s = tlen;
            }
            let (mut e, mut f) = (first, b.offset(-s));
            while s > 0 {
                e.swap(f);
                s -= 1;
                e = e.offset(1);
                f = f.offset(1);
            }
            s = d.offset_from(c);
            tlen = last.offset_from(d) - 1;
            if s > tlen {
                s = tlen;
            }
            let (mut e, mut f) = (b, last.offset(-s));
            while s > 0 {
                e.swap(f);
                s -= 1;
                e = e.offset(1);
                f = f.offset(1);
            }

            let a2 = first.offset(b.offset_from(a));
            let c2 = last.offset(-(d.offset_from(c)));
            let b2 = if v <= (*td.offset((*pa.offset(*a2 as isize) - 1) as isize) as i32) {
                a2
            } else {
                ss_partition(pa, a2, c2, depth)
            };

            if a2.offset_from(first) <= last.offset_from(c2) {
                if last.offset_from(c2) <= c2.offset_from(b2) {
                    stack.push(MiFrame { first: b2, last: c2, depth: depth + 1, limit: ilg(c2.offset_from(b2) as i32) });
                    stack.push(MiFrame { first: c2, last, depth, limit });
                    last = a2;
                } else if a2.offset_from(first) <= c2.offset_from(b2) {
                    stack.push(MiFrame { first: c2, last, depth, limit });
                    stack.push(MiFrame { first: b2, last: c2, depth: depth + 1, limit: ilg(c2.offset_from(b2) as i32) });
                    last = a2;
                } else {
                    stack.push(MiFrame { first: c2, last, depth, limit });
                    stack.push(MiFrame { first, last: a2, depth, limit });
                    first = b2;
                    last = c2;
                    depth += 1;
                    limit = ilg(c2.offset_from(b2) as i32);
                }
            } else if a2.offset_from(first) <= c2.offset_from(b2) {
                stack.push(MiFrame { first: b2, last: c2, depth: depth + 1, limit: ilg(c2.offset_from(b2) as i32) });
                stack.push(MiFrame { first, last: a2, depth, limit });
                first = c2;
            } else if last.offset_from(c2) <= c2.offset_from(b2) {
                stack.push(MiFrame { first, last: a2, depth, limit });
                stack.push(MiFrame { first: b2, last: c2, depth: depth + 1, limit: ilg(c2.offset_from(b2) as i32) });
                first = c2;
            } else {
                stack.push(MiFrame { first, last: a2, depth, limit });
                stack.push(MiFrame { first: c2, last, depth, limit });
                first = b2;
                last = c2;
                depth += 1;
                limit = ilg(c2.offset_from(b2) as i32);
            }
        } else {
            limit += 1;
            if (*td.offset((*pa.offset(*first as isize) - 1) as isize) as i32) < v {
                first = ss_partition(pa, first, last, depth);
                limit = ilg(last.offset_from(first) as i32);
            }
            depth += 1;
        }
    }
}

trait PtrSwap {
    unsafe fn swap(self, other: Self);
}
impl PtrSwap for *mut i32 {
    #[inline]
    unsafe fn swap(self, other: Self) {
        core::ptr::swap(self, other);
    }
}

unsafe fn ss_blockswap(a: *mut i32, b: *mut i32, n: i32) {
    let mut a = a;
    let mut b = b;
    let mut n = n;
    while n > 0 {
        a.swap(b);
        n -= 1;
        a = a.offset(1);
        b = b.offset(1);
    }
}

unsafe fn ss_rotate(first: *mut i32, middle: *mut i32, last: *mut i32) {
    let mut first = first;
    let mut middle = middle;
    let mut last = last;
    let mut l = middle.offset_from(first);
    let mut r = last.offset_from(middle);
    while l > 0 && r > 0 {
        if l == r {
            ss_blockswap(first, middle, l as i32);
            break;
        }
        if l < r {
            let mut a = last.offset(-1);
            let mut b = middle.offset(-1);
            let mut t = *a;
            loop {
                *a = *b;
                a = a.offset(-1);
                *b = *a;
                b = b.offset(-1);
                if b < first {
                    *a = t;
                    last = a;
                    r -= l + 1;
                    if r <= l {
                        break;
                    }
                    a = a.offset(-1);
                    b = middle.offset(-1);
                    t = *a;
                }
            }
        } else {
            let mut a = first;
            let mut b = middle;
            let mut t = *a;
            loop {
                *a = *b;
                a = a.offset(1);
                *b = *a;
                b = b.offset(1);
                if last <= b {
                    *a = t;
                    first = a.offset(1);
                    l -= r + 1;
                    if l <= r {
                        break;
                    }
                    a = a.offset(1);
                    b = middle;
                    t = *a;
                }
            }
        }
        l = middle.offset_from(first);
        r = last.offset_from(middle);
    }
}

unsafe fn ss_inplacemerge(t: *const u8, pa: *const i32, first: *mut i32, middle: *mut i32, last: *mut i32, depth: i32) {
    let mut first = first;
    let mut middle = middle;
    let mut last = last;
    loop {
        let (x, p): (i32, *const i32) = if *last.offset(-1) < 0 {
            (1, pa.offset(!*last.offset(-1) as isize))
        } else {
            (0, pa.offset(*last.offset(-1) as isize))
        };

        let mut a = first;
        let mut len = middle.offset_from(first);
        let mut half = len >> 1;
        let mut r = -1;
        while len > 0 {
            let b = a.offset(half);
            let bv = if *b >= 0 { *b } else { !*b };
            let q = ss_compare(t, pa.offset(bv as isize), p, depth);
            if q < 0 {
                a = b.offset(1);
                half -= ((len & 1) ^ 1) as isize;
            } else {
                r = q;
            }
            len = half;
            half >>= 1;
        }

        if a < middle {
            if r == 0 {
                *a = !*a;
            }
            ss_rotate(a, middle, last);
            last = last.offset(-middle.offset_from(a));
            middle = a;
            if first == middle {
                break;
            }
        }
        last = last.offset(-1);
        if x != 0 {
            while *last.offset(-1) < 0 {
                last = last.offset(-1);
            }
        }
        if middle == last {
            break;
        }
    }
}

unsafe fn ss_mergeforward(t: *const u8, pa: *const i32, first: *mut i32, middle: *mut i32, last: *mut i32, buf: *mut i32, depth: i32) {
    let bufend = buf.offset(middle.offset_from(first) - 1);
    ss_blockswap(buf, first, middle.offset_from(first) as i32);

    let mut a = first;
    let tmp = *a;
    let mut b = buf;
    let mut c = middle;
    loop {
        let r = ss_compare(t, pa.offset(*b as isize), pa.offset(*c as isize), depth);
        if r < 0 {
            loop {
                *a = *b;
                a = a.offset(1);
                if bufend <= b {
                    *bufend = tmp;
                    return;
                }
                *b = *a;
                b = b.offset(1);
                if *b >= 0 {
                    break;
                }
            }
        } else if r > 0 {
            loop {
                *a = *c;
                a = a.offset(1);
                *c = *a;
                c = c.offset(1);
                if last <= c {
                    while b < bufend {
                        *a = *b;
                        a = a.offset(1);
                        *b = *a;
                        b = b.offset(1);
                    }
                    *a = *b;
                    *b = tmp;
                    return;
                }
                if *c >= 0 {
                    break;
                }
            }
        } else {
            *c = !*c;
            loop {
                *a = *b;
                a = a.offset(1);
                if bufend <= b {
                    *bufend = tmp;
                    return;
                }
                *b = *a;
                b = b.offset(1);
                if *b >= 0 {
                    break;
                }
            }
            loop {
                *a = *c;
                a = a.offset(1);
                *c = *a;
                c = c.offset(1);
                if last <= c {
                    while b < bufend {
                        *a = *b;
                        a = a.offset(1);
                        *b = *a;
                        b = b.offset(1);
                    }
                    *a = *b;
                    *b = tmp;
                    return;
                }
                if *c >= 0 {
                    break;
                }
            }
        }
    }
}

unsafe fn ss_mergebackward(t: *const u8, pa: *const i32, first: *mut i32, middle: *mut i32, last: *mut i32, buf: *mut i32, depth: i32) {
    let bufend = buf.offset(last.offset_from(middle) - 1);
    ss_blockswap(buf, middle, last.offset_from(middle) as i32);

    let mut x = 0i32;
    let mut p1 = if *bufend < 0 {
        x |= 1;
        pa.offset(!*bufend as isize)
    } else {
        pa.offset(*bufend as isize)
    };
    let mut p2 = if *middle.offset(-1) < 0 {
        x |= 2;
        pa.offset(!*middle.offset(-1) as isize)
    } else {
        pa.offset(*middle.offset(-1) as isize)
    };

    let mut a = last.offset(-1);
    let tmp = *a;
    let mut b = bufend;
    let mut c = middle.offset(-1);
    loop {
        let r = ss_compare(t, p1, p2, depth);
        if r > 0 {
            if x & 1 != 0 {
                loop {
                    *a = *b;
                    a = a.offset(-1);
                    *b = *a;
                    b = b.offset(-1);
                    if *b >= 0 {
                        break;
                    }
                }
                x ^= 1;
            }
            *a = *b;
            a = a.offset(-1);
            if b <= buf {
                *buf = tmp;
                break;
            }
            *b = *a;
            b = b.offset(-1);
            if *b < 0 {
                p1 = pa.offset(!*b as isize);
                x |= 1;
            } else {
                p1 = pa.offset(*b as isize);
            }
        } else if r < 0 {
            if x & 2 != 0 {
                loop {
                    *a = *c;
                    a = a.offset(-1);
                    *c = *a;
                    c = c.offset(-1);
                    if *c >= 0 {
                        break;
                    }
                }
                x ^= 2;
            }
            *a = *c;
            a = a.offset(-1);
            *c = *a;
            c = c.offset(-1);
            if c < first {
                while buf < b {
                    *a = *b;
                    a = a.offset(-1);
                    *b = *a;
                    b = b.offset(-1);
                }
                *a = *b;
                *b = tmp;
                break;
            }
            if *c < 0 {
                p2 = pa.offset(!*c as isize);
                x |= 2;
            } else {
                p2 = pa.offset(*c as isize);
            }
        } else {
            if x & 1 != 0 {
                loop {
                    *a = *b;
                    a = a.offset(-1);
                    *b = *a;
                    b = b.offset(-1);
                    if *b >= 0 {
                        break;
                    }
                }
                x ^= 1;
            }
            *a = !*b;
            a = a.offset(-1);
            if b <= buf {
                *buf = tmp;
                break;
            }
            *b = *a;
            b = b.offset(-1);
            if x & 2 != 0 {
                loop {
                    *a = *c;
                    a = a.offset(-1);
                    *c = *a;
                    c = c.offset(-1);
                    if *c >= 0 {
                        break;
                    }
                }
                x ^= 2;
            }
            *a = *c;
            a = a.offset(-1);
            *c = *a;
            c = c.offset(-1);
            if c < first {
                while buf < b {
                    *a = *b;
                    a = a.offset(-1);
                    *b = *a;
                    b = b.offset(-1);
                }
                *a = *b;
                *b = tmp;
                break;
            }
            if *b < 0 {
                p1 = pa.offset(!*b as isize);
                x |= 1;
            } else {
                p1 = pa.offset(*b as isize);
            }
            if *c < 0 {
                p2 = pa.offset(!*c as isize);
                x |= 2;
            } else {
                p2 = pa.offset(*c as isize);
            }
        }
    }
}

struct SmFrame {
    first: *mut i32,
    middle: *mut i32,
    last: *mut i32,
    check: i32,
}

/// Divide-and-conquer block merge with a bounded scratch buffer.
unsafe fn ss_swapmerge(
    t: *const u8,
    pa: *const i32,
    first: *mut i32,
    middle: *mut i32,
    last: *mut i32,
    buf: *mut i32,
    bufsize: i32,
    depth: i32,
) {
    #[inline]
    unsafe fn get_idx(a: i32) -> i32 {
        if a >= 0 {
            a
        } else {
            !a
        }
    }
    #[inline]
    unsafe fn merge_check(t: *const u8, pa: *const i32, a: *mut i32, b: *mut i32, c: i32, depth: i32) {
        if (c & 1 != 0) || ((c & 2 != 0) && ss_compare(t, pa.offset(get_idx(*a.offset(-1)) as isize), pa.offset(*a as isize), depth) == 0) {
            *a = !*a;
        }
        if (c & 4 != 0) && ss_compare(t, pa.offset(get_idx(*b.offset(-1)) as isize), pa.offset(*b as isize), depth) == 0 {
            *b = !*b;
        }
    }

    let mut stack: FixedStack<SmFrame, SS_SMERGE_STACKSIZE> = FixedStack::new();
    let (mut first, mut middle, mut last) = (first, middle, last);
    let mut check = 0i32;

    loop {
        if last.offset_from(middle) <= bufsize as isize {
            if first < middle && middle < last {
                ss_mergebackward(t, pa, first, middle, last, buf, depth);
            }
            merge_check(t, pa, first, last, check, depth);
            if stack.is_empty() {
                return;
            }
            let f = stack.pop();
            first = f.first;
            middle = f.middle;
            last = f.last;
            check = f.check;
            continue;
        }

        if middle.offset_from(first) <= bufsize as isize {
            if first < middle {
                ss_mergeforward(t, pa, first, middle, last, buf, depth);
            }
            merge_check(t, pa, first, last, check, depth);
            if stack.is_empty() {
                return;
            }
            let f = stack.pop();
            first = f.first;
            middle = f.middle;
            last = f.last;
            check = f.check;
            continue;
        }

        let mut m = 0isize;
        let mut len = core::cmp::min(middle.offset_from(first), last.offset_from(middle));
        let mut half = len >> 1;
        while len > 0 {
            if ss_compare(
                t,
                pa.offset(get_idx(*middle.offset(m + half)) as isize),
                pa.offset(get_idx(*middle.offset(-m - half - 1)) as isize),
                depth,
            ) < 0
            {
                m += half + 1;
                half -= ((len & 1) ^ 1) as isize;
            }
            len = half;
            half >>= 1;
        }

        if m > 0 {
            let lm = middle.offset(-m);
            let rm = middle.offset(m);
            ss_blockswap(lm, middle, m as i32);
            let mut l = middle;
            let mut r = middle;
            let mut next = 0i32;
            if rm < last {
                if *rm < 0 {
                    *rm = !*rm;
                    if first < lm {
                        while *l.offset(-1) < 0 {
                            l = l.offset(-1);
                        }
                        next |= 4;
                    }
                    next |= 1;
                } else if first < lm {
                    while *r < 0 {
                        r = r.offset(1);
                    }
                    next |= 2;
                }
            }

            if l.offset_from(first) <= last.offset_from(r) {
                stack.push(SmFrame { first: r, middle: rm, last, check: (next & 3) | (check & 4) });
                middle = lm;
                last = l;
                check = (check & 3) | (next & 4);
            } else {
                if (next & 2 != 0) && r == middle {
                    next ^= 6;
                }
                stack.push(SmFrame { first, middle: lm, last: l, check: (check & 3) | (next & 4) });
                first = r;
                middle = rm;
                check = (next & 3) | (check & 4);
            }
        } else {
            if ss_compare(t, pa.offset(get_idx(*middle.offset(-1)) as isize), pa.offset(*middle as isize), depth) == 0 {
                *middle = !*middle;
            }
            merge_check(t, pa, first, last, check, depth);
            if stack.is_empty() {
                return;
            }
            let f = stack.pop();
            first = f.first;
            middle = f.middle;
            last = f.last;
            check = f.check;
        }
    }
}

/// Sorts the B* position range `[first, last)` (indices into `pa`'s target
/// array) by their substring content, up to two symbols past the boundary
/// of the next B* position. `buf`/`bufsize` is scratch carved from the
/// caller's `SA` (spec.md §4.3); `n` is the input length; `last_is_tail`
/// marks that the final slot represents position `n-2`, handled specially.
///
/// # Safety
/// `first..last` and `buf..buf+bufsize` must be disjoint, valid, exclusive
/// ranges within the same backing allocation; `pa` must be valid to read at
/// every index stored in `[first, last)` and one past it.
pub(crate) unsafe fn sssort(
    t: *const u8,
    pa: *const i32,
    first: *mut i32,
    last: *mut i32,
    buf: *mut i32,
    bufsize: i32,
    depth: i32,
    n: i32,
    last_is_tail: bool,
) {
    let mut first = if last_is_tail { first.offset(1) } else { first };
    let (mut buf, mut bufsize) = (buf, bufsize);

    let middle;
    let limit;
    if bufsize < SS_BLOCKSIZE
        && bufsize < (last.offset_from(first) as i32)
        && bufsize < isqrt(last.offset_from(first) as i32, SS_BLOCKSIZE)
    {
        let mut lim = isqrt(last.offset_from(first) as i32, SS_BLOCKSIZE);
        if SS_BLOCKSIZE < lim {
            lim = SS_BLOCKSIZE;
        }
        buf = last.offset(-(lim as isize));
        middle = buf;
        bufsize = lim;
        limit = lim;
    } else {
        middle = last;
        limit = 0;
    }

    let mut a = first;
    let mut i = 0i32;
    while SS_BLOCKSIZE < middle.offset_from(a) as i32 {
        ss_mintrosort(t, pa, a, a.offset(SS_BLOCKSIZE as isize), depth);

        let mut curbufsize = last.offset_from(a.offset(SS_BLOCKSIZE as isize)) as i32;
        let mut curbuf = a.offset(SS_BLOCKSIZE as isize);
        if curbufsize <= bufsize {
            curbufsize = bufsize;
            curbuf = buf;
        }
        let mut b = a;
        let mut k = SS_BLOCKSIZE;
        let mut j = i;
        while j & 1 != 0 {
            ss_swapmerge(t, pa, b.offset(-(k as isize)), b, b.offset(k as isize), curbuf, curbufsize, depth);
            b = b.offset(-(k as isize));
            k <<= 1;
            j >>= 1;
        }
        a = a.offset(SS_BLOCKSIZE as isize);
        i += 1;
    }

    ss_mintrosort(t, pa, a, middle, depth);

    let mut k = SS_BLOCKSIZE;
    while i != 0 {
        if i & 1 != 0 {
            ss_swapmerge(t, pa, a.offset(-(k as isize)), a, middle, buf, bufsize, depth);
            a = a.offset(-(k as isize));
        }
        k <<= 1;
        i >>= 1;
    }

    if limit != 0 {
        ss_mintrosort(t, pa, middle, last, depth);
        ss_inplacemerge(t, pa, first, middle, last, depth);
    }

    if last_is_tail {
        // Insert the trailing B* position (`n - 2`) by linear scan: it was
        // excluded from the sort above (`first` was bumped past it).
        let orig_first = first.offset(-1);
        let pai = [*pa.offset(*orig_first as isize), n - 2];
        let mut a = first;
        let i = *orig_first;
        while a < last && (*a < 0 || ss_compare(t, pai.as_ptr(), pa.offset(*a as isize), depth) > 0) {
            *a.offset(-1) = *a;
            a = a.offset(1);
        }
        *a.offset(-1) = i;
    }
}

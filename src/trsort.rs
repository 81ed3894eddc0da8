//! Tandem-repeat sorter (C4): depth-doubling ternary-partition introsort
//! over the inverse suffix array of the B* set.
//!
//! Ported from `trsort.c` of upstream libdivsufsort (see
//! `examples/original_source/include/trsort.hpp`). `ISA`/`SA` are raw
//! pointers into the caller's B* inverse-SA and SA sub-arrays; `ISAd` walks
//! doubling offsets into `ISA` as the depth of comparison doubles each
//! outer round.

use crate::common::{ilg, TR_INSERTIONSORT_THRESHOLD, TR_STACKSIZE};
use crate::stack::FixedStack;

#[inline]
unsafe fn tr_insertionsort(isad: *const i32, first: *mut i32, last: *mut i32) {
    let mut a = first.offset(1);
    while a < last {
        let t = *a;
        let mut b = a.offset(-1);
        let mut r = *isad.offset(t as isize) - *isad.offset(*b as isize);
        while r < 0 {
            loop {
                *b.offset(1) = *b;
                b = b.offset(-1);
                if !(first <= b && *b < 0) {
                    break;
                }
            }
            if b < first {
                break;
            }
            r = *isad.offset(t as isize) - *isad.offset(*b as isize);
        }
        if r == 0 {
            *b = !*b;
        }
        *b.offset(1) = t;
        a = a.offset(1);
    }
}

unsafe fn tr_fixdown(isad: *const i32, sa: *mut i32, mut i: i32, size: i32) {
    let v = *sa.offset(i as isize);
    let c = *isad.offset(v as isize);
    loop {
        let j = 2 * i + 1;
        if j >= size {
            break;
        }
        let mut k = j;
        let mut d = *isad.offset(*sa.offset(k as isize) as isize);
        let jj = j + 1;
        if jj < size {
            let e = *isad.offset(*sa.offset(jj as isize) as isize);
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

unsafe fn tr_heapsort(isad: *const i32, sa: *mut i32, size: i32) {
    let mut m = size;
    if size % 2 == 0 {
        m -= 1;
        if *isad.offset(*sa.offset((m / 2) as isize) as isize) < *isad.offset(*sa.offset(m as isize) as isize) {
            core::ptr::swap(sa.offset(m as isize), sa.offset((m / 2) as isize));
        }
    }
    let mut i = m / 2 - 1;
    while i >= 0 {
        tr_fixdown(isad, sa, i, m);
        i -= 1;
    }
    if size % 2 == 0 {
        core::ptr::swap(sa, sa.offset(m as isize));
        tr_fixdown(isad, sa, 0, m);
    }
    let mut i = m - 1;
    while i > 0 {
        let t = *sa;
        *sa = *sa.offset(i as isize);
        tr_fixdown(isad, sa, 0, i);
        *sa.offset(i as isize) = t;
        i -= 1;
    }
}

unsafe fn tr_median3(isad: *const i32, v1: *mut i32, v2: *mut i32, v3: *mut i32) -> *mut i32 {
    let (mut v1, mut v2) = (v1, v2);
    if *isad.offset(*v1 as isize) > *isad.offset(*v2 as isize) {
        core::mem::swap(&mut v1, &mut v2);
    }
    if *isad.offset(*v2 as isize) > *isad.offset(*v3 as isize) {
        if *isad.offset(*v1 as isize) > *isad.offset(*v3 as isize) {
            return v1;
        }
        return v3;
    }
    v2
}

unsafe fn tr_median5(isad: *const i32, v1: *mut i32, v2: *mut i32, v3: *mut i32, v4: *mut i32, v5: *mut i32) -> *mut i32 {
    let (mut v1, mut v2, mut v3, mut v4, mut v5) = (v1, v2, v3, v4, v5);
    let key = |p: *mut i32| -> i32 { *isad.offset(*p as isize) };
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

unsafe fn tr_pivot(isad: *const i32, first: *mut i32, last: *mut i32) -> *mut i32 {
    let mut t = last.offset_from(first) as i32;
    let middle = first.offset((t / 2) as isize);

    if t <= 512 {
        if t <= 32 {
            return tr_median3(isad, first, middle, last.offset(-1));
        }
        t >>= 2;
        return tr_median5(isad, first, first.offset(t as isize), middle, last.offset(-1 - t as isize), last.offset(-1));
    }
    t >>= 3;
    let first = tr_median3(isad, first, first.offset(t as isize), first.offset((t << 1) as isize));
    let middle = tr_median3(isad, middle.offset(-(t as isize)), middle, middle.offset(t as isize));
    let last = tr_median3(isad, last.offset(-1 - (t << 1) as isize), last.offset(-1 - t as isize), last.offset(-1));
    tr_median3(isad, first, middle, last)
}

struct TrBudget {
    chance: i32,
    remain: i32,
    incval: i32,
    count: i32,
}

impl TrBudget {
    fn init(chance: i32, incval: i32) -> Self {
        TrBudget { chance, remain: incval, incval, count: 0 }
    }

    fn check(&mut self, size: i32) -> bool {
        if size <= self.remain {
            self.remain -= size;
            return true;
        }
        if self.chance == 0 {
            self.count += size;
            return false;
        }
        self.remain += self.incval - size;
        self.chance -= 1;
        true
    }
}

unsafe fn tr_partition(isad: *const i32, first: *mut i32, middle: *mut i32, last: *mut i32, v: i32) -> (*mut i32, *mut i32) {
    let mut b = middle.offset(-1);
    let mut x = 0i32;
    loop {
        b = b.offset(1);
        if !(b < last) {
            break;
        }
        x = *isad.offset(*b as isize);
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
            x = *isad.offset(*b as isize);
            if x > v {
                break;
            }
            if x == v {
                core::ptr::swap(b, a);
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
        x = *isad.offset(*c as isize);
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
            x = *isad.offset(*c as isize);
            if x < v {
                break;
            }
            if x == v {
                core::ptr::swap(c, d);
                d = d.offset(-1);
            }
        }
    }
    while b < c {
        core::ptr::swap(b, c);
        loop {
            b = b.offset(1);
            if !(b < c) {
                break;
            }
            x = *isad.offset(*b as isize);
            if x > v {
                break;
            }
            if x == v {
                core::ptr::swap(b, a);
                a = a.offset(1);
            }
        }
        loop {
            c = c.offset(-1);
            if !(b < c) {
                break;
            }
            x = *isad.offset(*c as isize);
            if x < v {
                break;
            }
            if x == v {
                core::ptr::swap(c, d);
                d = d.offset(-1);
            }
        }
    }

    let (mut first, mut last) = (first, last);
    if a <= d {
        let c = b.offset(-1);
        let mut s = a.offset_from(first);
        let t = b.offset_from(a);
        if s > t {
            s = t;
        }
        let (mut e, mut f) = (first, b.offset(-s));
        while s > 0 {
            core::ptr::swap(e, f);
            s -= 1;
            e = e.offset(1);
            f = f.offset(1);
        }
        let mut s2 = d.offset_from(c);
        let t2 = last.offset_from(d) - 1;
        if s2 > t2 {
            s2 = t2;
        }
        let (mut e, mut f) = (b, last.offset(-s2));
        while s2 > 0 {
            core::ptr::swap(e, f);
            s2 -= 1;
            e = e.offset(1);
            f = f.offset(1);
        }
        first = first.offset(b.offset_from(a));
        last = last.offset(-(d.offset_from(c)));
    }
    (first, last)
}

unsafe fn tr_copy(isa: *mut i32, sa: *const i32, first: *mut i32, a: *mut i32, b: *mut i32, last: *mut i32, depth: i32) {
    let v = (b.offset_from(sa) - 1) as i32;
    let mut c = first;
    let mut d = a.offset(-1);
    while c <= d {
        let s = *c - depth;
        if s >= 0 && *isa.offset(s as isize) == v {
            d = d.offset(1);
            *d = s;
            *isa.offset(s as isize) = d.offset_from(sa) as i32;
        }
        c = c.offset(1);
    }
    let mut c = last.offset(-1);
    let mut e = d.offset(1);
    let mut d = b;
    while e < d {
        let s = *c - depth;
        if s >= 0 && *isa.offset(s as isize) == v {
            d = d.offset(-1);
            *d = s;
            *isa.offset(s as isize) = d.offset_from(sa) as i32;
        }
        c = c.offset(-1);
    }
}

unsafe fn tr_partialcopy(isa: *mut i32, sa: *const i32, first: *mut i32, a: *mut i32, b: *mut i32, last: *mut i32, depth: i32) {
    let v = (b.offset_from(sa) - 1) as i32;
    let mut lastrank = -1i32;
    let mut newrank = -1i32;
    let mut c = first;
    let mut d = a.offset(-1);
    while c <= d {
        let s = *c - depth;
        if s >= 0 && *isa.offset(s as isize) == v {
            d = d.offset(1);
            *d = s;
            let rank = *isa.offset((s + depth) as isize);
            if lastrank != rank {
                lastrank = rank;
                newrank = d.offset_from(sa) as i32;
            }
            *isa.offset(s as isize) = newrank;
        }
        c = c.offset(1);
    }

    lastrank = -1;
    let mut e = d;
    while first <= e {
        let rank = *isa.offset(*e as isize);
        if lastrank != rank {
            lastrank = rank;
            newrank = e.offset_from(sa) as i32;
        }
        if newrank != rank {
            *isa.offset(*e as isize) = newrank;
        }
        e = e.offset(-1);
    }

    lastrank = -1;
    let mut c = last.offset(-1);
    let mut e = d.offset(1);
    let mut d = b;
    while e < d {
        let s = *c - depth;
        if s >= 0 && *isa.offset(s as isize) == v {
            d = d.offset(-1);
            *d = s;
            let rank = *isa.offset((s + depth) as isize);
            if lastrank != rank {
                lastrank = rank;
                newrank = d.offset_from(sa) as i32;
            }
            *isa.offset(s as isize) = newrank;
        }
        c = c.offset(-1);
    }
}

#[derive(Clone, Copy)]
struct TrFrame {
    isad: *const i32,
    first: *mut i32,
    last: *mut i32,
    limit: i32,
    trlink: i32,
}

#[allow(clippy::too_many_arguments)]
unsafe fn tr_introsort(isa: *mut i32, isad0: *const i32, sa: *const i32, first0: *mut i32, last0: *mut i32, budget: &mut TrBudget) {
    let mut stack: FixedStack<TrFrame, TR_STACKSIZE> = FixedStack::new();
    let mut isad = isad0;
    let mut first = first0;
    let mut last = last0;
    let incr = isad.offset_from(isa as *const i32);
    let mut trlink: i32 = -1;
    let mut limit = ilg(last.offset_from(first) as i32);

    loop {
        if limit < 0 {
            if limit == -1 {
                let (a, b) = tr_partition(isad.offset(-incr), first, first, last, (last.offset_from(sa) - 1) as i32);
                if a < last {
                    let v = (a.offset_from(sa) - 1) as i32;
                    let mut c = first;
                    while c < a {
                        *isa.offset(*c as isize) = v;
                        c = c.offset(1);
                    }
                }
                if b < last {
                    let v = (b.offset_from(sa) - 1) as i32;
                    let mut c = a;
                    while c < b {
                        *isa.offset(*c as isize) = v;
                        c = c.offset(1);
                    }
                }

                if 1 < b.offset_from(a) {
                    stack.push(TrFrame { isad: core::ptr::null(), first: a, last: b, limit: 0, trlink: 0 });
                    stack.push(TrFrame { isad: isad.offset(-incr), first, last, limit: -2, trlink });
                    trlink = stack.len() as i32 - 2;
                }
                if a.offset_from(first) <= last.offset_from(b) {
                    if 1 < a.offset_from(first) {
                        stack.push(TrFrame { isad, first: b, last, limit: ilg(last.offset_from(b) as i32), trlink });
                        last = a;
                        limit = ilg(a.offset_from(first) as i32);
                    } else if 1 < last.offset_from(b) {
                        first = b;
                        limit = ilg(last.offset_from(b) as i32);
                    } else {
                        if stack.is_empty() {
                            return;
                        }
                        let f = stack.pop();
                        isad = f.isad;
                        first = f.first;
                        last = f.last;
                        limit = f.limit;
                        trlink = f.trlink;
                    }
                } else if 1 < last.offset_from(b) {
                    stack.push(TrFrame { isad, first, last: a, limit: ilg(a.offset_from(first) as i32), trlink });
                    first = b;
                    limit = ilg(last.offset_from(b) as i32);
                } else if 1 < a.offset_from(first) {
                    last = a;
                    limit = ilg(a.offset_from(first) as i32);
                } else {
                    if stack.is_empty() {
                        return;
                    }
                    let f = stack.pop();
                    isad = f.isad;
                    first = f.first;
                    last = f.last;
                    limit = f.limit;
                    trlink = f.trlink;
                }
            } else if limit == -2 {
                let top = *stack.get_mut(stack.len() - 1);
                let a = top.first;
                let b = top.last;
                if top.limit == 0 {
                    tr_copy(isa, sa, first, a, b, last, isad.offset_from(isa as *const i32));
                } else {
                    if 0 <= trlink {
                        stack.get_mut(trlink as usize).limit = -1;
                    }
                    tr_partialcopy(isa, sa, first, a, b, last, isad.offset_from(isa as *const i32));
                }
                stack.pop();
                if stack.is_empty() {
                    return;
                }
                let f = stack.pop();
                isad = f.isad;
                first = f.first;
                last = f.last;
                limit = f.limit;
                trlink = f.trlink;
            } else {
                if 0 <= *first {
                    let mut a = first;
                    loop {
                        *isa.offset(*a as isize) = a.offset_from(sa) as i32;
                        a = a.offset(1);
                        if !(a < last && 0 <= *a) {
                            break;
                        }
                    }
                    first = a;
                }
                if first < last {
                    let mut a = first;
                    loop {
                        *a = !*a;
                        a = a.offset(1);
                        if !(*a < 0) {
                            break;
                        }
                    }
                    let next = if *isa.offset(*a as isize) != *isad.offset(*a as isize) {
                        ilg(a.offset_from(first) as i32 + 1)
                    } else {
                        -1
                    };
                    let mut a2 = a.offset(1);
                    if a2 < last {
                        let v = (a2.offset_from(sa) - 1) as i32;
                        let mut b = first;
                        while b < a2 {
                            *isa.offset(*b as isize) = v;
                            b = b.offset(1);
                        }
                    }
                    a = a2;

                    if budget.check(a.offset_from(first) as i32) {
                        if a.offset_from(first) <= last.offset_from(a) {
                            stack.push(TrFrame { isad, first: a, last, limit: -3, trlink });
                            isad = isad.offset(incr);
                            last = a;
                            limit = next;
                        } else if 1 < last.offset_from(a) {
                            stack.push(TrFrame { isad: isad.offset(incr), first, last: a, limit: next, trlink });
                            first = a;
                            limit = -3;
                        } else {
                            isad = isad.offset(incr);
                            last = a;
                            limit = next;
                        }
                    } else {
                        if 0 <= trlink {
                            stack.get_mut(trlink as usize).limit = -1;
                        }
                        if 1 < last.offset_from(a) {
                            first = a;
                            limit = -3;
                        } else {
                            if stack.is_empty() {
                                return;
                            }
                            let f = stack.pop();
                            isad = f.isad;
                            first = f.first;
                            last = f.last;
                            limit = f.limit;
                            trlink = f.trlink;
                        }
                    }
                } else {
                    if stack.is_empty() {
                        return;
                    }
                    let f = stack.pop();
                    isad = f.isad;
                    first = f.first;
                    last = f.last;
                    limit = f.limit;
                    trlink = f.trlink;
                }
            }
            continue;
        }

        if last.offset_from(first) as i32 <= TR_INSERTIONSORT_THRESHOLD {
            tr_insertionsort(isad, first, last);
            limit = -3;
            continue;
        }

        if limit == 0 {
            tr_heapsort(isad, first, last.offset_from(first) as i32);
            let mut a = last.offset(-1);
            while first < a {
                let x = *isad.offset(*a as isize);
                let mut b = a.offset(-1);
                while first <= b && *isad.offset(*b as isize) == x {
                    *b = !*b;
                    b = b.offset(-1);
                }
                a = b;
            }
            limit = -3;
            continue;
        } else {
            limit -= 1;
        }

        let piv = tr_pivot(isad, first, last);
        core::ptr::swap(first, piv);
        let v = *isad.offset(*first as isize);

        let (a, b) = tr_partition(isad, first, first.offset(1), last, v);
        if last.offset_from(first) != b.offset_from(a) {
            let next = if *isa.offset(*a as isize) != v { ilg(b.offset_from(a) as i32) } else { -1 };

            let mut c = first;
            let vv = (a.offset_from(sa) - 1) as i32;
            while c < a {
                *isa.offset(*c as isize) = vv;
                c = c.offset(1);
            }
            if b < last {
                let mut c = a;
                let vv = (b.offset_from(sa) - 1) as i32;
                while c < b {
                    *isa.offset(*c as isize) = vv;
                    c = c.offset(1);
                }
            }

            if 1 < b.offset_from(a) && budget.check(b.offset_from(a) as i32) {
                if a.offset_from(first) <= last.offset_from(b) {
                    if last.offset_from(b) <= b.offset_from(a) {
                        if 1 < a.offset_from(first) {
                            stack.push(TrFrame { isad: isad.offset(incr), first: a, last: b, limit: next, trlink });
                            stack.push(TrFrame { isad, first: b, last, limit, trlink });
                            last = a;
                        } else if 1 < last.offset_from(b) {
                            stack.push(TrFrame { isad: isad.offset(incr), first: a, last: b, limit: next, trlink });
                            first = b;
                        } else {
                            isad = isad.offset(incr);
                            first = a;
                            last = b;
                            limit = next;
                        }
                    } else if a.offset_from(first) <= b.offset_from(a) {
                        if 1 < a.offset_from(first) {
                            stack.push(TrFrame { isad, first: b, last, limit, trlink });
                            stack.push(TrFrame { isad: isad.offset(incr), first: a, last: b, limit: next, trlink });
                            last = a;
                        } else {
                            stack.push(TrFrame { isad, first: b, last, limit, trlink });
                            isad = isad.offset(incr);
                            first = a;
                            last = b;
                            limit = next;
                        }
                    } else {
                        stack.push(TrFrame { isad, first: b, last, limit, trlink });
                        stack.push(TrFrame { isad, first, last: a, limit, trlink });
                        isad = isad.offset(incr);
                        first = a;
                        last = b;
                        limit = next;
                    }
                } else if a.offset_from(first) <= b.offset_from(a) {
                    if 1 < last.offset_from(b) {
                        stack.push(TrFrame { isad: isad.offset(incr), first: a, last: b, limit: next, trlink });
                        stack.push(TrFrame { isad, first, last: a, limit, trlink });
                        first = b;
                    } else if 1 < a.offset_from(first) {
                        stack.push(TrFrame { isad: isad.offset(incr), first: a, last: b, limit: next, trlink });
                        last = a;
                    } else {
                        isad = isad.offset(incr);
                        first = a;
                        last = b;
                        limit = next;
                    }
                } else if last.offset_from(b) <= b.offset_from(a) {
                    if 1 < last.offset_from(b) {
                        stack.push(TrFrame { isad, first, last: a, limit, trlink });
                        stack.push(TrFrame { isad: isad.offset(incr), first: a, last: b, limit: next, trlink });
                        first = b;
                    } else {
                        stack.push(TrFrame { isad, first, last: a, limit, trlink });
                        isad = isad.offset(incr);
                        first = a;
                        last = b;
                        limit = next;
                    }
                } else {
                    stack.push(TrFrame { isad, first, last: a, limit, trlink });
                    stack.push(TrFrame { isad, first: b, last, limit, trlink });
                    isad = isad.offset(incr);
                    first = a;
                    last = b;
                    limit = next;
                }
            } else {
                if 1 < b.offset_from(a) && 0 <= trlink {
                    stack.get_mut(trlink as usize).limit = -1;
                }
                if a.offset_from(first) <= last.offset_from(b) {
                    if 1 < a.offset_from(first) {
                        stack.push(TrFrame { isad, first: b, last, limit, trlink });
                        last = a;
                    } else if 1 < last.offset_from(b) {
                        first = b;
                    } else {
                        if stack.is_empty() {
                            return;
                        }
                        let f = stack.pop();
                        isad = f.isad;
                        first = f.first;
                        last = f.last;
                        limit = f.limit;
                        trlink = f.trlink;
                    }
                } else if 1 < last.offset_from(b) {
                    stack.push(TrFrame { isad, first, last: a, limit, trlink });
                    first = b;
                } else if 1 < a.offset_from(first) {
                    last = a;
                } else {
                    if stack.is_empty() {
                        return;
                    }
                    let f = stack.pop();
                    isad = f.isad;
                    first = f.first;
                    last = f.last;
                    limit = f.limit;
                    trlink = f.trlink;
                }
            }
        } else if budget.check(last.offset_from(first) as i32) {
            limit = ilg(last.offset_from(first) as i32);
            isad = isad.offset(incr);
        } else {
            if 0 <= trlink {
                stack.get_mut(trlink as usize).limit = -1;
            }
            if stack.is_empty() {
                return;
            }
            let f = stack.pop();
            isad = f.isad;
            first = f.first;
            last = f.last;
            limit = f.limit;
            trlink = f.trlink;
        }
    }
}

/// Refines the inverse SA of the B* suffix set by depth-doubling, breaking
/// ties among suffixes that still compare equal at the current depth.
///
/// # Safety
/// `isa` and `sa` must each be valid for `n` elements of the same
/// allocation family; `sa`'s values are signed indices into `isa` (or its
/// bit-complement when "skip" run-length-encoded, per spec.md §9).
pub(crate) unsafe fn trsort(isa: *mut i32, sa: *mut i32, n: i32, depth: i32) {
    let mut budget = TrBudget::init(ilg(n) * 2 / 3, n);
    let mut isad = isa.offset(depth as isize);

    while -n < *sa {
        let mut first = sa;
        let mut skip = 0i32;
        let mut unsorted = 0i32;
        loop {
            let t = *first;
            if t < 0 {
                first = first.offset(-t as isize);
                skip += t;
            } else {
                if skip != 0 {
                    *first.offset(skip as isize) = skip;
                    skip = 0;
                }
                let last = sa.offset((*isa.offset(t as isize) + 1) as isize);
                if last.offset_from(first) > 1 {
                    budget.count = 0;
                    tr_introsort(isa, isad, sa, first, last, &mut budget);
                    if budget.count != 0 {
                        unsorted += budget.count;
                    } else {
                        skip = first.offset_from(last) as i32;
                    }
                } else if last.offset_from(first) == 1 {
                    skip = -1;
                }
                first = last;
            }
            if !(first < sa.offset(n as isize)) {
                break;
            }
        }
        if skip != 0 {
            *first.offset(skip as isize) = skip;
        }
        if unsorted == 0 {
            break;
        }
        let incr = isad.offset_from(isa);
        isad = isad.offset(incr);
    }
}

use core::ptr;

use crate::util::{binary_first, binary_last, block_swap, rotate, Less, MergeHole, Range};

// Every merge below requires that A immediately precedes B and that each run
// is sorted. Ties always take from A, which is what keeps the sort stable.

/// Merge `from[a]` and `from[b]` into `into..into + a.length() + b.length()`.
///
/// The source is only read; `into` must be a region whose prior contents are
/// dead (the cache, or an array gap shadowed by the cache).
pub unsafe fn merge_into<T, F: Less<T>>(
    from: *mut T,
    a: Range,
    b: Range,
    into: *mut T,
    less: &mut F,
) {
    let mut hole = MergeHole {
        a_pos: from.add(a.start),
        a_end: from.add(a.end),
        b_pos: from.add(b.start),
        b_end: from.add(b.end),
        dst: into,
    };

    while hole.a_pos < hole.a_end && hole.b_pos < hole.b_end {
        if !less(&*hole.b_pos, &*hole.a_pos) {
            hole.dst.write(hole.a_pos.read());
            hole.a_pos = hole.a_pos.add(1);
        } else {
            hole.dst.write(hole.b_pos.read());
            hole.b_pos = hole.b_pos.add(1);
        }
        hole.dst = hole.dst.add(1);
    }

    // Dropping the hole moves the remaining run into place
}

/// Merge `cache[0..a.length()]` (A's elements, already copied out) with
/// `v[b]`, writing the result in place starting at `a.start`.
pub unsafe fn merge_external<T, F: Less<T>>(
    v: *mut T,
    a: Range,
    b: Range,
    cache: *mut T,
    less: &mut F,
) {
    let mut hole = MergeHole {
        a_pos: cache,
        a_end: cache.add(a.length()),
        b_pos: v.add(b.start),
        b_end: v.add(b.end),
        dst: v.add(a.start),
    };

    while hole.a_pos < hole.a_end && hole.b_pos < hole.b_end {
        if !less(&*hole.b_pos, &*hole.a_pos) {
            hole.dst.write(hole.a_pos.read());
            hole.a_pos = hole.a_pos.add(1);
        } else {
            hole.dst.write(hole.b_pos.read());
            hole.b_pos = hole.b_pos.add(1);
        }
        hole.dst = hole.dst.add(1);
    }
}

/// Merge `v[a]` and `v[b]` where A's elements have first been swapped into
/// `buffer` (`buffer.length() >= a.length()`).
///
/// Works entirely by swaps, so when it returns `buffer` holds its previous
/// contents in some permuted order and the array is still a permutation.
pub unsafe fn merge_internal<T, F: Less<T>>(
    v: *mut T,
    a: Range,
    b: Range,
    buffer: Range,
    less: &mut F,
) {
    let mut a_count = 0;
    let mut b_count = 0;
    let mut insert = 0;

    if b.length() > 0 && a.length() > 0 {
        loop {
            if !less(&*v.add(b.start + b_count), &*v.add(buffer.start + a_count)) {
                ptr::swap(v.add(a.start + insert), v.add(buffer.start + a_count));
                a_count += 1;
                insert += 1;
                if a_count >= a.length() {
                    break;
                }
            } else {
                ptr::swap(v.add(a.start + insert), v.add(b.start + b_count));
                b_count += 1;
                insert += 1;
                if b_count >= b.length() {
                    break;
                }
            }
        }
    }

    block_swap(v, buffer.start + a_count, a.start + insert, a.length() - a_count);
}

/// Merge `v[a]` and `v[b]` using only rotations.
///
/// Finds where A's head belongs in B, rotates A there, then drops the prefix
/// that is now in place and repeats. Each rotation is bounded by the number
/// of distinct values in A, which is what makes this acceptable as the
/// no-buffer fallback.
pub unsafe fn merge_in_place<T, F: Less<T>>(v: *mut T, mut a: Range, mut b: Range, less: &mut F) {
    if a.length() == 0 || b.length() == 0 {
        return;
    }

    loop {
        let mid = binary_first(v, v.add(a.start), b, less);

        let amount = mid - a.end;
        rotate(v, a.length(), Range::new(a.start, mid));

        if b.end == mid {
            break;
        }

        b.start = mid;
        a = Range::new(a.start + amount, b.start);
        a.start = binary_last(v, v.add(a.start), a, less);

        if a.length() == 0 {
            break;
        }
    }
}

use core::mem::MaybeUninit;
use core::ptr;

use crate::blocks::merge_blocks;
use crate::buffer::{find_buffers, pull_buffers, redistribute};
use crate::level::LevelIter;
use crate::merge::{merge_external, merge_into};
use crate::small::{insert_sort, sort_network, sort_tiny};
use crate::util::{rotate, Less, Range};

/// Number of elements in the stack cache backing the external merges.
///
/// A tuning constant, not a correctness parameter: any value down to zero
/// only disables fast paths.
pub const CACHE_SIZE: usize = 512;

/// Sort `v..v + size` with block sort.
pub unsafe fn sort<T, F: Less<T>>(v: *mut T, size: usize, less: &mut F) {
    if size < 4 {
        return sort_tiny(v, size, less);
    }

    // Level 0: sorting networks over slices of 4 to 8 elements
    let mut it = LevelIter::new(size, 4);
    it.begin();
    while !it.finished() {
        let range = it.next_range();
        sort_network(v, range, less);
    }

    if size < 8 {
        return;
    }

    let mut cache = MaybeUninit::<[T; CACHE_SIZE]>::uninit();
    let cache = cache.as_mut_ptr() as *mut T;

    loop {
        if it.length() < CACHE_SIZE {
            // Four slices fitting in the cache merge two levels at once
            if (it.length() + 1) * 4 <= CACHE_SIZE && it.length() * 4 <= size {
                merge_double(v, &mut it, cache, less);
                it.next_level();
            } else {
                merge_cached(v, &mut it, cache, less);
            }
        } else {
            merge_blocked(v, &mut it, cache, less);
        }

        if !it.next_level() {
            break;
        }
    }
}

// Merge each (A, B) pair at this level through the cache.
unsafe fn merge_cached<T, F: Less<T>>(
    v: *mut T,
    it: &mut LevelIter,
    cache: *mut T,
    less: &mut F,
) {
    it.begin();
    while !it.finished() {
        let a = it.next_range();
        let b = it.next_range();

        if less(&*v.add(b.end - 1), &*v.add(a.start)) {
            // In reverse order; one rotation sorts the whole pair
            rotate(v, a.length(), Range::new(a.start, b.end));
        } else if less(&*v.add(b.start), &*v.add(a.end - 1)) {
            ptr::copy_nonoverlapping(v.add(a.start), cache, a.length());
            merge_external(v, a, b, cache, less);
        }
    }
}

// Merge two pairs of slices into the cache, then merge the two merged halves
// from the cache back into the array, consuming two levels per pass.
unsafe fn merge_double<T, F: Less<T>>(
    v: *mut T,
    it: &mut LevelIter,
    cache: *mut T,
    less: &mut F,
) {
    it.begin();
    while !it.finished() {
        let mut a1 = it.next_range();
        let b1 = it.next_range();
        let mut a2 = it.next_range();
        let b2 = it.next_range();

        if less(&*v.add(b1.end - 1), &*v.add(a1.start)) {
            // Reversed pair: copying B then A into the cache sorts it
            ptr::copy_nonoverlapping(v.add(a1.start), cache.add(b1.length()), a1.length());
            ptr::copy_nonoverlapping(v.add(b1.start), cache, b1.length());
        } else if less(&*v.add(b1.start), &*v.add(a1.end - 1)) {
            merge_into(v, a1, b1, cache, less);
        } else {
            // A1|B1 already sorted; skip the quadruple if the rest is too
            if !less(&*v.add(b2.start), &*v.add(a2.end - 1))
                && !less(&*v.add(a2.start), &*v.add(b1.end - 1))
            {
                continue;
            }

            ptr::copy_nonoverlapping(v.add(a1.start), cache, a1.length());
            ptr::copy_nonoverlapping(v.add(b1.start), cache.add(a1.length()), b1.length());
        }
        a1 = Range::new(a1.start, b1.end);

        if less(&*v.add(b2.end - 1), &*v.add(a2.start)) {
            ptr::copy_nonoverlapping(
                v.add(a2.start),
                cache.add(a1.length() + b2.length()),
                a2.length(),
            );
            ptr::copy_nonoverlapping(v.add(b2.start), cache.add(a1.length()), b2.length());
        } else if less(&*v.add(b2.start), &*v.add(a2.end - 1)) {
            merge_into(v, a2, b2, cache.add(a1.length()), less);
        } else {
            ptr::copy_nonoverlapping(v.add(a2.start), cache.add(a1.length()), a2.length());
            ptr::copy_nonoverlapping(
                v.add(b2.start),
                cache.add(a1.length() + a2.length()),
                b2.length(),
            );
        }
        a2 = Range::new(a2.start, b2.end);

        // Both halves now live in the cache; merge them back into the array
        let a3 = Range::new(0, a1.length());
        let b3 = Range::new(a1.length(), a1.length() + a2.length());

        if less(&*cache.add(b3.end - 1), &*cache.add(a3.start)) {
            ptr::copy_nonoverlapping(cache, v.add(a1.start + a2.length()), a3.length());
            ptr::copy_nonoverlapping(cache.add(b3.start), v.add(a1.start), b3.length());
        } else if less(&*cache.add(b3.start), &*cache.add(a3.end - 1)) {
            merge_into(cache, a3, b3, v.add(a1.start), less);
        } else {
            ptr::copy_nonoverlapping(cache, v.add(a1.start), a3.length());
            ptr::copy_nonoverlapping(
                cache.add(b3.start),
                v.add(a1.start + a1.length()),
                b3.length(),
            );
        }
    }
}

// The A slices no longer fit in the cache: extract internal buffers, block
// sort every pair, then restore the buffers.
unsafe fn merge_blocked<T, F: Less<T>>(
    v: *mut T,
    it: &mut LevelIter,
    cache: *mut T,
    less: &mut F,
) {
    let mut buffers = find_buffers(v, it, CACHE_SIZE, less);
    pull_buffers(v, &mut buffers, less);

    // The buffers that actually materialized dictate the block size. The
    // resulting (length + 1) / block_size <= buffer_size guarantees a
    // distinct tag for every A block head.
    let buffer_size = buffers.buffer1.length();
    let block_size = it.length() / buffer_size + 1;

    it.begin();
    while !it.finished() {
        let mut a = it.next_range();
        let mut b = it.next_range();

        // Strip any part of this pair serving as an internal buffer
        let start = a.start;
        for pull in &buffers.pulls {
            if start == pull.range.start {
                if pull.from > pull.to {
                    a.start += pull.count;
                    if a.length() == 0 {
                        break;
                    }
                } else if pull.from < pull.to {
                    b.end -= pull.count;
                    if b.length() == 0 {
                        break;
                    }
                }
            }
        }
        if a.length() == 0 || b.length() == 0 {
            continue;
        }

        if less(&*v.add(b.end - 1), &*v.add(a.start)) {
            rotate(v, a.length(), Range::new(a.start, b.end));
        } else if less(&*v.add(a.end), &*v.add(a.end - 1)) {
            merge_blocks(
                v,
                a,
                b,
                block_size,
                buffers.buffer1,
                buffers.buffer2,
                cache,
                CACHE_SIZE,
                less,
            );
        }
    }

    // Buffer2 ends each level holding its original values in a scrambled
    // order; insertion sort wins here because the data is mostly sorted
    insert_sort(v, buffers.buffer2, less);

    redistribute(v, &buffers, less);
}

use core::ptr;

use crate::merge::{merge_external, merge_in_place, merge_internal};
use crate::util::{binary_first, block_swap, rotate, Less, Range};

// Merge the dropped A block `last_a` with the B values that settled after it,
// picking the cheapest strategy available: the external cache, swapping
// through buffer2, or rotations when neither exists.
unsafe fn merge_dropped<T, F: Less<T>>(
    v: *mut T,
    last_a: Range,
    b_end: usize,
    buffer2: Range,
    cache: *mut T,
    cache_size: usize,
    less: &mut F,
) {
    let b = Range::new(last_a.end, b_end);

    if last_a.length() <= cache_size {
        merge_external(v, last_a, b, cache, less);
    } else if buffer2.length() > 0 {
        merge_internal(v, last_a, b, buffer2, less);
    } else {
        merge_in_place(v, last_a, b, less);
    }
}

/// Merge `v[a]` with `v[b]` by rolling A blocks through the B blocks.
///
/// A is cut into blocks of `block_size` (plus an uneven leftmost block);
/// each even block's head is swapped with the next tag in `buffer1`, which
/// works because both the heads and the tags are sorted and the tags are
/// distinct. Rolling then drops the minimum A block wherever it belongs and
/// locally merges the previously dropped block behind it.
pub unsafe fn merge_blocks<T, F: Less<T>>(
    v: *mut T,
    a: Range,
    b: Range,
    block_size: usize,
    buffer1: Range,
    buffer2: Range,
    cache: *mut T,
    cache_size: usize,
    less: &mut F,
) {
    debug_assert!(a.length() > 0 && b.length() > 0);

    let mut block_a = a;
    let first_a = Range::new(a.start, a.start + block_a.length() % block_size);

    // Tag each full A block by swapping its head with the next buffer1 value
    let mut index_a = buffer1.start;
    let mut index = first_a.end;
    while index < block_a.end {
        ptr::swap(v.add(index_a), v.add(index));
        index_a += 1;
        index += block_size;
    }

    let mut last_a = first_a;
    let mut last_b = Range::empty();
    let mut block_b = Range::new(b.start, b.start + usize::min(block_size, b.length()));
    block_a.start += first_a.length();
    let mut index_a = buffer1.start;

    // Stage the uneven first A block where its merge will want it
    if last_a.length() <= cache_size {
        ptr::copy_nonoverlapping(v.add(last_a.start), cache, last_a.length());
    } else if buffer2.length() > 0 {
        block_swap(v, last_a.start, buffer2.start, last_a.length());
    }

    if block_a.length() > 0 {
        loop {
            if (last_b.length() > 0 && !less(&*v.add(last_b.end - 1), &*v.add(index_a)))
                || block_b.length() == 0
            {
                // The minimum A block belongs behind the previous B block
                // (or no B blocks remain and the rest drop in order)
                let b_split = binary_first(v, v.add(index_a), last_b, less);
                let b_remaining = last_b.end - b_split;

                // Swap the minimum A block to the front of the rolling blocks
                let mut min_a = block_a.start;
                let mut find_a = min_a + block_size;
                while find_a < block_a.end {
                    if less(&*v.add(find_a), &*v.add(min_a)) {
                        min_a = find_a;
                    }
                    find_a += block_size;
                }
                if min_a != block_a.start {
                    block_swap(v, block_a.start, min_a, block_size);
                }

                // Give the dropped block its head back from buffer1
                ptr::swap(v.add(block_a.start), v.add(index_a));
                index_a += 1;

                merge_dropped(v, last_a, b_split, buffer2, cache, cache_size, less);

                if buffer2.length() > 0 || block_size <= cache_size {
                    // Stage the dropped block, then block swap the split B
                    // values into its place; their order is free to scramble
                    // since the block now lives in the cache or buffer2
                    if block_size <= cache_size {
                        ptr::copy_nonoverlapping(v.add(block_a.start), cache, block_size);
                    } else {
                        block_swap(v, block_a.start, buffer2.start, block_size);
                    }
                    block_swap(
                        v,
                        b_split,
                        block_a.start + block_size - b_remaining,
                        b_remaining,
                    );
                } else {
                    rotate(
                        v,
                        block_a.start - b_split,
                        Range::new(b_split, block_a.start + block_size),
                    );
                }

                last_a = Range::new(
                    block_a.start - b_remaining,
                    block_a.start - b_remaining + block_size,
                );
                last_b = Range::new(last_a.end, last_a.end + b_remaining);

                block_a.start += block_size;
                if block_a.length() == 0 {
                    break;
                }
            } else if block_b.length() < block_size {
                // The final, uneven B block moves before the remaining A
                // blocks in one rotation
                rotate(
                    v,
                    block_b.start - block_a.start,
                    Range::new(block_a.start, block_b.end),
                );

                last_b = Range::new(block_a.start, block_a.start + block_b.length());
                block_a.start += block_b.length();
                block_a.end += block_b.length();
                block_b.end = block_b.start;
            } else {
                // Roll the leftmost A block past the next B block
                block_swap(v, block_a.start, block_b.start, block_size);
                last_b = Range::new(block_a.start, block_a.start + block_size);

                block_a.start += block_size;
                block_a.end += block_size;
                block_b.start += block_size;

                if block_b.end > b.end - block_size {
                    block_b.end = b.end;
                } else {
                    block_b.end += block_size;
                }
            }
        }
    }

    // Merge the last A block with whatever remains of B
    merge_dropped(v, last_a, b.end, buffer2, cache, cache_size, less);
}

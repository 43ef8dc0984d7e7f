use crate::level::LevelIter;
use crate::util::{
    find_first_backward, find_first_forward, find_last_backward, find_last_forward, rotate, Less,
    Range,
};

/// A planned extraction of `count` unique values found near index `from`,
/// to be collected into a contiguous buffer at index `to`, all within
/// `range` (the A..B span the values came from).
#[derive(Clone, Copy)]
pub struct Pull {
    pub range: Range,
    pub count: usize,
    pub from: usize,
    pub to: usize,
}

impl Pull {
    const EMPTY: Self = Self {
        range: Range::empty(),
        count: 0,
        from: 0,
        to: 0,
    };
}

/// The internal buffers for one merge level: up to two ranges of distinct
/// values plus the pull operations that created them (and will undo them).
pub struct Buffers {
    pub buffer1: Range,
    pub buffer2: Range,
    pub pulls: [Pull; 2],
}

/// Scan the level's (A, B) pairs for enough unique values to fill the
/// internal buffers, recording where to pull them from.
///
/// The target is `2 * buffer_size` values in one contiguous group, reduced
/// to `buffer_size` when each A block fits in the cache (the cache then
/// stands in for the second buffer), or found as two separate groups when a
/// single subarray cannot hold both. If even one group of `buffer_size`
/// cannot be found, the largest group seen becomes `buffer1` and this
/// level's merges fall back to rotation.
pub unsafe fn find_buffers<T, F: Less<T>>(
    v: *mut T,
    it: &mut LevelIter,
    cache_size: usize,
    less: &mut F,
) -> Buffers {
    let block_size = it.length().isqrt();
    let buffer_size = it.length() / block_size + 1;

    let mut buffers = Buffers {
        buffer1: Range::empty(),
        buffer2: Range::empty(),
        pulls: [Pull::EMPTY; 2],
    };

    let mut find = buffer_size + buffer_size;
    let mut find_separately = false;
    let mut pull_index = 0;

    if block_size <= cache_size {
        // Each A block fits in the cache, so buffer2 is never needed
        find = buffer_size;
    } else if find > it.length() {
        // Both buffers cannot come from a single subarray
        find = block_size;
        find_separately = true;
    }

    it.begin();
    'scan: while !it.finished() {
        let a = it.next_range();
        let b = it.next_range();

        // Walk A from the left counting unique values; they would be pulled
        // out to the start of A
        let mut last = a.start;
        let mut count = 1;
        while count < find {
            let index =
                find_last_forward(v, v.add(last), Range::new(last + 1, a.end), find - count, less);
            if index == a.end {
                break;
            }
            last = index;
            count += 1;
        }
        let index = last;

        if count >= buffer_size {
            buffers.pulls[pull_index] = Pull {
                range: Range::new(a.start, b.end),
                count,
                from: index,
                to: a.start,
            };
            pull_index = 1;

            if count == buffer_size + buffer_size {
                // One group large enough to hold both buffers
                buffers.buffer1 = Range::new(a.start, a.start + buffer_size);
                buffers.buffer2 = Range::new(a.start + buffer_size, a.start + count);
                break 'scan;
            } else if find == buffer_size + buffer_size {
                // Large enough for buffer1; keep looking for a second group
                buffers.buffer1 = Range::new(a.start, a.start + count);
                find = buffer_size;
            } else if block_size <= cache_size {
                buffers.buffer1 = Range::new(a.start, a.start + count);
                break 'scan;
            } else if find_separately {
                buffers.buffer1 = Range::new(a.start, a.start + count);
                find_separately = false;
            } else {
                buffers.buffer2 = Range::new(a.start, a.start + count);
                break 'scan;
            }
        } else if pull_index == 0 && count > buffers.buffer1.length() {
            // Remember the largest group seen in case no full buffer exists
            buffers.buffer1 = Range::new(a.start, a.start + count);
            buffers.pulls[0] = Pull {
                range: Range::new(a.start, b.end),
                count,
                from: index,
                to: a.start,
            };
        }

        // Walk B from the right; these values would be pulled out to the
        // end of B
        let mut last = b.end - 1;
        let mut count = 1;
        while count < find {
            let index =
                find_first_backward(v, v.add(last), Range::new(b.start, last), find - count, less);
            if index == b.start {
                break;
            }
            last = index - 1;
            count += 1;
        }
        let index = last;

        if count >= buffer_size {
            buffers.pulls[pull_index] = Pull {
                range: Range::new(a.start, b.end),
                count,
                from: index,
                to: b.end,
            };
            pull_index = 1;

            if count == buffer_size + buffer_size {
                buffers.buffer1 = Range::new(b.end - count, b.end - buffer_size);
                buffers.buffer2 = Range::new(b.end - buffer_size, b.end);
                break 'scan;
            } else if find == buffer_size + buffer_size {
                buffers.buffer1 = Range::new(b.end - count, b.end);
                find = buffer_size;
            } else if block_size <= cache_size {
                buffers.buffer1 = Range::new(b.end - count, b.end);
                break 'scan;
            } else if find_separately {
                buffers.buffer1 = Range::new(b.end - count, b.end);
                find_separately = false;
            } else {
                // If buffer1 came from this pair's A, stop its redistribution
                // before it reaches buffer2
                if buffers.pulls[0].range.start == a.start {
                    buffers.pulls[0].range.end -= buffers.pulls[1].count;
                }
                buffers.buffer2 = Range::new(b.end - count, b.end);
                break 'scan;
            }
        } else if pull_index == 0 && count > buffers.buffer1.length() {
            buffers.buffer1 = Range::new(b.end - count, b.end);
            buffers.pulls[0] = Pull {
                range: Range::new(a.start, b.end),
                count,
                from: index,
                to: b.end,
            };
        }
    }

    buffers
}

/// Execute the planned pulls: gather each group's unique values into a
/// contiguous run at its `to` end by a series of searches and rotations.
pub unsafe fn pull_buffers<T, F: Less<T>>(v: *mut T, buffers: &mut Buffers, less: &mut F) {
    for pull in &mut buffers.pulls {
        let length = pull.count;

        if pull.to < pull.from {
            // Pulling out to the left, to the start of an A subarray
            let mut index = pull.from;
            for count in 1..length {
                index = find_first_backward(
                    v,
                    v.add(index - 1),
                    Range::new(pull.to, pull.from - (count - 1)),
                    length - count,
                    less,
                );

                let range = Range::new(index + 1, pull.from + 1);
                rotate(v, range.length() - count, range);
                pull.from = index + count;
            }
        } else if pull.to > pull.from {
            // Pulling out to the right, to the end of a B subarray
            let mut index = pull.from + 1;
            for count in 1..length {
                index = find_last_forward(
                    v,
                    v.add(index),
                    Range::new(index, pull.to),
                    length - count,
                    less,
                );

                let range = Range::new(pull.from, index - 1);
                rotate(v, count, range);
                pull.from = index - 1 - count;
            }
        }
    }
}

/// Undo the pulls: scatter each buffer's values back to their sorted
/// positions by the inverse of the extraction.
pub unsafe fn redistribute<T, F: Less<T>>(v: *mut T, buffers: &Buffers, less: &mut F) {
    for pull in &buffers.pulls {
        let mut unique = pull.count * 2;

        if pull.from > pull.to {
            // Values were pulled to the left; walk them back to the right
            let mut buffer = Range::new(pull.range.start, pull.range.start + pull.count);

            while buffer.length() > 0 {
                let index = find_first_forward(
                    v,
                    v.add(buffer.start),
                    Range::new(buffer.end, pull.range.end),
                    unique,
                    less,
                );

                let amount = index - buffer.end;
                rotate(v, buffer.length(), Range::new(buffer.start, index));
                buffer.start += amount + 1;
                buffer.end += amount;
                unique -= 2;
            }
        } else if pull.from < pull.to {
            // Values were pulled to the right; walk them back to the left
            let mut buffer = Range::new(pull.range.end - pull.count, pull.range.end);

            while buffer.length() > 0 {
                let index = find_last_backward(
                    v,
                    v.add(buffer.end - 1),
                    Range::new(pull.range.start, buffer.start),
                    unique,
                    less,
                );

                let amount = buffer.start - index;
                rotate(v, amount, Range::new(index, buffer.end));
                buffer.start -= amount;
                buffer.end -= amount + 1;
                unique -= 2;
            }
        }
    }
}

use core::mem::ManuallyDrop;
use core::ptr;

use crate::util::{Hole, Less, Range};

// Optimal compare-exchange sequences for 4 to 8 elements, indexed by size - 4.
const NETWORK_4: &[(u8, u8)] = &[(0, 1), (2, 3), (0, 2), (1, 3), (1, 2)];
const NETWORK_5: &[(u8, u8)] = &[
    (0, 1),
    (3, 4),
    (2, 4),
    (2, 3),
    (1, 4),
    (0, 3),
    (0, 2),
    (1, 3),
    (1, 2),
];
const NETWORK_6: &[(u8, u8)] = &[
    (1, 2),
    (4, 5),
    (0, 2),
    (3, 5),
    (0, 1),
    (3, 4),
    (2, 5),
    (0, 3),
    (1, 4),
    (2, 4),
    (1, 3),
    (2, 3),
];
const NETWORK_7: &[(u8, u8)] = &[
    (1, 2),
    (3, 4),
    (5, 6),
    (0, 2),
    (3, 5),
    (4, 6),
    (0, 1),
    (4, 5),
    (2, 6),
    (0, 4),
    (1, 5),
    (0, 3),
    (2, 5),
    (1, 3),
    (2, 4),
    (2, 3),
];
const NETWORK_8: &[(u8, u8)] = &[
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (1, 2),
    (5, 6),
    (0, 4),
    (3, 7),
    (1, 5),
    (2, 6),
    (1, 4),
    (3, 6),
    (2, 4),
    (3, 5),
    (3, 4),
];

const NETWORKS: [&[(u8, u8)]; 5] = [NETWORK_4, NETWORK_5, NETWORK_6, NETWORK_7, NETWORK_8];

/// Sort `v..v + n` for `n <= 3` with at most three comparisons.
pub unsafe fn sort_tiny<T, F: Less<T>>(v: *mut T, n: usize, less: &mut F) {
    if n == 3 {
        if less(&*v.add(1), &*v) {
            ptr::swap(v, v.add(1));
        }
        if less(&*v.add(2), &*v.add(1)) {
            ptr::swap(v.add(1), v.add(2));
            if less(&*v.add(1), &*v) {
                ptr::swap(v, v.add(1));
            }
        }
    } else if n == 2 && less(&*v.add(1), &*v) {
        ptr::swap(v, v.add(1));
    }
}

/// Sort the slice `range`, whose length must be in `4..=8`, with a sorting
/// network.
///
/// Networks are not stable on their own, so each slot carries its original
/// position; an exchange fires only when the right element is strictly less,
/// or when equal elements are out of original order.
pub unsafe fn sort_network<T, F: Less<T>>(v: *mut T, range: Range, less: &mut F) {
    let s = v.add(range.start);
    let mut order = [0u8, 1, 2, 3, 4, 5, 6, 7];

    for &(x, y) in NETWORKS[range.length() - 4] {
        let (x, y) = (x as usize, y as usize);

        if less(&*s.add(y), &*s.add(x))
            || (order[x] > order[y] && !less(&*s.add(x), &*s.add(y)))
        {
            ptr::swap(s.add(x), s.add(y));
            order.swap(x, y);
        }
    }
}

/// Sort `range` with insertion sort, shifting two elements per comparison
/// where possible.
pub unsafe fn insert_sort<T, F: Less<T>>(v: *mut T, range: Range, less: &mut F) {
    let s = v.add(range.start);

    for i in 1..range.length() {
        let tmp = ManuallyDrop::new(s.add(i).read());
        let mut hole = Hole::new(s.add(i), &*tmp);

        while hole.pos > s.add(1) && less(&tmp, &*hole.pos.sub(2)) {
            hole.pos.write(hole.pos.sub(1).read());
            hole.pos.sub(1).write(hole.pos.sub(2).read());
            hole.pos = hole.pos.sub(2);
        }

        if hole.pos > s {
            // Compare first to ensure identical copies
            let odd = less(&tmp, &*hole.pos.sub(1));
            hole.pos.write(hole.pos.sub(1).read());
            hole.pos = hole.pos.sub(odd as usize);
        }
    }
}

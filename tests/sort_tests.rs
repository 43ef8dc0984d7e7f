use std::cmp::Reverse;

#[test]
fn empty() {
    let mut v: Vec<i32> = vec![];
    gritsort::sort(&mut v);
    assert_eq!(v, Vec::<i32>::new());
}

#[test]
fn singleton() {
    let mut v = vec![42];
    gritsort::sort(&mut v);
    assert_eq!(v, [42]);
}

#[test]
fn reversed() {
    let mut v = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
    gritsort::sort(&mut v);
    assert_eq!(v, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn all_equal_keeps_tag_order() {
    let mut v: Vec<(i32, usize)> = (0..8).map(|i| (5, i)).collect();
    gritsort::sort_by_key(&mut v, |p| p.0);
    assert_eq!(
        v,
        [(5, 0), (5, 1), (5, 2), (5, 3), (5, 4), (5, 5), (5, 6), (5, 7)]
    );
}

#[test]
fn mixed_small_is_stable() {
    let values = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
    let mut v: Vec<(i32, usize)> = values.iter().copied().zip(0..).collect();
    gritsort::sort_by_key(&mut v, |p| p.0);

    let sorted: Vec<i32> = v.iter().map(|p| p.0).collect();
    assert_eq!(sorted, [1, 1, 2, 3, 3, 4, 5, 5, 5, 6, 9]);

    // Equal values keep their original order: the first 1 was at index 1,
    // the second at index 3, and so on
    assert_eq!(v[0].1, 1);
    assert_eq!(v[1].1, 3);
    assert_eq!(v[3].1, 0);
    assert_eq!(v[4].1, 9);
    assert_eq!(v[6].1, 4);
    assert_eq!(v[7].1, 8);
    assert_eq!(v[8].1, 10);
}

#[test]
fn sorted_input_is_untouched() {
    for n in [0usize, 1, 2, 7, 8, 100, 1000] {
        let mut v: Vec<usize> = (0..n).collect();
        gritsort::sort(&mut v);
        assert!(v.iter().copied().eq(0..n));
    }
}

#[test]
fn sorting_twice_matches_sorting_once() {
    let mut once: Vec<i32> = (0..997).map(|i| i * 31 % 127).collect();
    gritsort::sort(&mut once);

    let mut twice = once.clone();
    gritsort::sort(&mut twice);
    assert_eq!(once, twice);
}

#[test]
fn sort_by_reverse_comparator() {
    let mut v: Vec<u32> = (0..300).map(|i| i * 7919 % 1009).collect();
    gritsort::sort_by(&mut v, |a, b| b.cmp(a));
    assert!(v.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn sort_by_key_projection() {
    let mut v: Vec<(u32, &str)> = vec![(3, "c"), (1, "a"), (2, "b"), (1, "aa")];
    gritsort::sort_by_key(&mut v, |p| Reverse(p.0));
    assert_eq!(v, [(3, "c"), (2, "b"), (1, "a"), (1, "aa")]);
}

#[test]
fn strings_sort() {
    let mut v: Vec<String> = "the quick brown fox jumps over the lazy dog"
        .split(' ')
        .map(str::to_owned)
        .collect();
    let mut expected = v.clone();

    gritsort::sort(&mut v);
    expected.sort();
    assert_eq!(v, expected);
}

use crate::util::Range;

/// Walks the array in consecutive sub-ranges for one level of a bottom-up
/// merge sort, then doubles the sub-range size for the next level.
///
/// The nominal slice length is `size / denominator`, carried as an integer
/// part plus a fractional remainder so that emitted slices differ in length
/// by at most one and always partition `0..size` exactly. `size` does not
/// need to be a power of two.
pub struct LevelIter {
    size: usize,
    denominator: usize,

    // Nominal slice length for the current level
    decimal_step: usize,
    numerator_step: usize,

    // Cursor within the current level
    decimal: usize,
    numerator: usize,
}

impl LevelIter {
    /// Create an iterator over `size` elements whose level-0 slices have
    /// nominal length `min_level`. Requires `size >= min_level`.
    pub fn new(size: usize, min_level: usize) -> Self {
        let power_of_two = 1 << size.ilog2();
        let denominator = power_of_two / min_level;

        Self {
            size,
            denominator,
            decimal_step: size / denominator,
            numerator_step: size % denominator,
            decimal: 0,
            numerator: 0,
        }
    }

    /// Reset the cursor to the start of the array.
    pub fn begin(&mut self) {
        self.decimal = 0;
        self.numerator = 0;
    }

    /// Emit the next slice at the current level and advance the cursor.
    pub fn next_range(&mut self) -> Range {
        let start = self.decimal;

        self.decimal += self.decimal_step;
        self.numerator += self.numerator_step;

        if self.numerator >= self.denominator {
            self.numerator -= self.denominator;
            self.decimal += 1;
        }

        Range::new(start, self.decimal)
    }

    /// Whether the cursor has covered the whole array.
    pub fn finished(&self) -> bool {
        self.decimal >= self.size
    }

    /// Double the nominal slice length. Return `false` once a single slice
    /// would cover the whole array, meaning the sort is complete.
    pub fn next_level(&mut self) -> bool {
        self.decimal_step += self.decimal_step;
        self.numerator_step += self.numerator_step;

        if self.numerator_step >= self.denominator {
            self.numerator_step -= self.denominator;
            self.decimal_step += 1;
        }

        self.decimal_step < self.size
    }

    /// The current level's nominal slice length.
    pub fn length(&self) -> usize {
        self.decimal_step
    }
}

#[cfg(test)]
mod tests {
    use super::LevelIter;

    #[test]
    fn slices_partition_every_level() {
        for size in 4..200usize {
            let mut it = LevelIter::new(size, 4);

            loop {
                it.begin();
                let mut expected = 0;

                while !it.finished() {
                    let range = it.next_range();
                    assert_eq!(range.start, expected);
                    let len = range.length();
                    assert!(len == it.length() || len == it.length() + 1);
                    expected = range.end;
                }

                assert_eq!(expected, size);

                if !it.next_level() {
                    break;
                }
            }
        }
    }

    #[test]
    fn level_zero_slices_are_four_to_eight() {
        for size in 4..500usize {
            let mut it = LevelIter::new(size, 4);
            it.begin();

            while !it.finished() {
                let len = it.next_range().length();
                assert!((4..=8).contains(&len), "size {} slice {}", size, len);
            }
        }
    }
}

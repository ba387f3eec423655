//! Small tensor-adjacent operations shared by the layers and the drivers.

/// Index of the first occurrence of the maximum value, or `None` for an
/// empty sequence. Strict greater-than keeps the earliest of equal maxima.
pub fn max_index<I>(values: I) -> Option<usize>
where
    I: IntoIterator,
    I::Item: PartialOrd,
{
    let mut iter = values.into_iter();
    let mut max_value = iter.next()?;
    let mut max_index = 0;

    for (offset, value) in iter.enumerate() {
        if value > max_value {
            max_value = value;
            max_index = offset + 1;
        }
    }

    Some(max_index)
}

/// Copies elements from `values` into `buffer` until either side is
/// exhausted, and returns the number of elements written.
///
/// Works with unending sources (e.g. [`crate::NormalSequence`]) as well as
/// bounded ones (`iter::repeat(0.1).take(n)` and friends).
pub fn fill_from<T, I>(buffer: &mut [T], values: I) -> usize
where
    I: IntoIterator<Item = T>,
{
    let mut filled = 0;

    for (slot, value) in buffer.iter_mut().zip(values) {
        *slot = value;
        filled += 1;
    }

    filled
}

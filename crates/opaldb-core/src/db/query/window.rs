/// Apply the start/count pagination window to an in-memory vector, in place.
///
/// Drop the first `start` rows, then truncate to `count`; `count` of `None`
/// or zero means no limit.
pub(crate) fn apply_window<T>(rows: &mut Vec<T>, start: u32, count: Option<u32>) {
    let start = usize::try_from(start).unwrap_or(usize::MAX);

    // If the window starts past the end, clear everything.
    if start >= rows.len() {
        rows.clear();
        return;
    }

    rows.drain(..start);

    match count {
        None | Some(0) => {}
        Some(count) => rows.truncate(usize::try_from(count).unwrap_or(usize::MAX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_start_and_count() {
        let mut rows = vec![1, 2, 3, 4, 5];
        apply_window(&mut rows, 1, Some(2));
        assert_eq!(rows, vec![2, 3]);
    }

    #[test]
    fn start_past_end_clears() {
        let mut rows = vec![1, 2];
        apply_window(&mut rows, 5, None);
        assert!(rows.is_empty());
    }

    #[test]
    fn zero_count_means_no_limit() {
        let mut rows = vec![1, 2, 3];
        apply_window(&mut rows, 1, Some(0));
        assert_eq!(rows, vec![2, 3]);
    }
}

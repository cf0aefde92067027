use model::pagination::range::WorkRange;

/// Splits `[1, total]` into exactly `workers` contiguous ranges.
///
/// Every range gets `total / workers` records and the last one also takes the
/// remainder, so its end is always `total`. With fewer records than workers
/// the leading ranges come out empty (`start > end`).
pub fn split_work(total: u64, workers: usize) -> Vec<WorkRange> {
    let workers = workers.max(1) as u64;
    let chunk = total / workers;

    (0..workers)
        .map(|i| {
            let start = i * chunk + 1;
            let end = if i == workers - 1 {
                total
            } else {
                (i + 1) * chunk
            };
            WorkRange::new(start, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(ranges: &[WorkRange]) -> Vec<(u64, u64)> {
        ranges.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn last_range_absorbs_remainder() {
        let ranges = split_work(11, 5);
        assert_eq!(
            bounds(&ranges),
            vec![(1, 2), (3, 4), (5, 6), (7, 8), (9, 11)]
        );
    }

    #[test]
    fn even_split() {
        assert_eq!(
            bounds(&split_work(10, 2)),
            vec![(1, 5), (6, 10)]
        );
    }

    #[test]
    fn fewer_records_than_workers_leaves_empty_ranges() {
        let ranges = split_work(3, 5);
        assert_eq!(ranges.len(), 5);
        assert!(ranges[..4].iter().all(|r| r.is_empty()));
        assert_eq!((ranges[4].start, ranges[4].end), (1, 3));
    }

    #[test]
    fn empty_source_yields_only_empty_ranges() {
        let ranges = split_work(0, 3);
        assert_eq!(ranges.len(), 3);
        assert!(ranges.iter().all(|r| r.is_empty() && r.len() == 0));
    }

    #[test]
    fn ranges_cover_exactly_one_to_total() {
        for total in 0..=60u64 {
            for workers in 1..=9usize {
                let ranges = split_work(total, workers);
                assert_eq!(ranges.len(), workers);

                let mut covered = Vec::new();
                for range in ranges.iter().filter(|r| !r.is_empty()) {
                    covered.extend(range.start..=range.end);
                }
                let expected: Vec<u64> = (1..=total).collect();
                assert_eq!(covered, expected, "total={total} workers={workers}");

                assert_eq!(ranges.last().map(|r| r.end), Some(total));
                let sum: u64 = ranges.iter().map(|r| r.len()).sum();
                assert_eq!(sum, total);
            }
        }
    }
}

/// Sorts the window `[from, to)` of `orders` so that `pivots[orders[i]]` is ascending.
///
/// Partition sort around the key of the middle element of each window, driven by
/// an explicit work stack instead of recursion, so the depth of the partition tree
/// never touches the call stack. Keys equal to the partition key are gathered in
/// the middle and never revisited, which keeps long runs of `NO_PIVOT` cheap.
/// The sort is not stable: equal keys end up in one contiguous run but in no
/// particular order.
pub fn sort_by_pivot(orders: &mut [usize], pivots: &[i64], from: usize, to: usize) {
    let mut stack: Vec<(usize, usize)> = vec![(from, to)];
    let mut scratch: Vec<usize> = Vec::with_capacity(to.saturating_sub(from));
    let mut equal: Vec<usize> = Vec::new();
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let width = hi - lo;
        let pivot_key = pivots[orders[lo + width / 2]];
        scratch.clear();
        scratch.resize(width, 0);
        equal.clear();
        // smaller keys fill the window from the left, larger ones from the right
        let mut left = 0;
        let mut right = width;
        for &index in &orders[lo..hi] {
            let key = pivots[index];
            if key < pivot_key {
                scratch[left] = index;
                left += 1;
            } else if key > pivot_key {
                right -= 1;
                scratch[right] = index;
            } else {
                equal.push(index);
            }
        }
        scratch[left..right].copy_from_slice(&equal);
        orders[lo..hi].copy_from_slice(&scratch);
        stack.push((lo + right, hi));
        stack.push((lo, lo + left));
    }
}

/// identity permutation sorted by `pivots`
pub fn sorted_orders(pivots: &[i64]) -> Vec<usize> {
    let mut orders: Vec<usize> = (0..pivots.len()).collect();
    sort_by_pivot(&mut orders, pivots, 0, pivots.len());
    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConservationLaws::NO_PIVOT;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn keys_in_order(orders: &[usize], pivots: &[i64]) -> Vec<i64> {
        orders.iter().map(|&i| pivots[i]).collect()
    }

    #[test]
    fn test_sorts_like_stable_sort() {
        let pivots = vec![5, 3, NO_PIVOT, 3, 0, 7, 1, NO_PIVOT, 2, 5];
        let orders = sorted_orders(&pivots);
        let mut expected = pivots.clone();
        expected.sort();
        assert_eq!(keys_in_order(&orders, &pivots), expected);
        // still a permutation
        let mut seen = orders.clone();
        seen.sort();
        assert_eq!(seen, (0..pivots.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_sorts_only_window() {
        let pivots = vec![9, 8, 7, 6, 5, 4];
        let mut orders: Vec<usize> = (0..6).collect();
        sort_by_pivot(&mut orders, &pivots, 1, 4);
        assert_eq!(orders, vec![0, 3, 2, 1, 4, 5]);
        sort_by_pivot(&mut orders, &pivots, 0, 6);
        assert_eq!(orders, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_empty_and_single() {
        let mut orders: Vec<usize> = vec![];
        sort_by_pivot(&mut orders, &[], 0, 0);
        assert!(orders.is_empty());
        let mut orders = vec![0];
        sort_by_pivot(&mut orders, &[NO_PIVOT], 0, 1);
        assert_eq!(orders, vec![0]);
    }

    #[test]
    fn test_large_presorted_input_does_not_overflow() {
        // presorted, reversed and constant keys at a size where recursion used to fail
        let n = 100_000;
        let ascending: Vec<i64> = (0..n as i64).collect();
        let orders = sorted_orders(&ascending);
        assert_eq!(keys_in_order(&orders, &ascending), ascending);
        let descending: Vec<i64> = (0..n as i64).rev().collect();
        let orders = sorted_orders(&descending);
        assert_eq!(keys_in_order(&orders, &descending), ascending);
        let constant = vec![3_i64; n];
        let orders = sorted_orders(&constant);
        assert_eq!(keys_in_order(&orders, &constant), constant);
    }

    #[test]
    fn test_random_keys() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let len = rng.gen_range(0..300);
            let pivots: Vec<i64> = (0..len)
                .map(|_| {
                    if rng.gen_bool(0.1) {
                        NO_PIVOT
                    } else {
                        rng.gen_range(-20..20)
                    }
                })
                .collect();
            let orders = sorted_orders(&pivots);
            let mut expected = pivots.clone();
            expected.sort();
            assert_eq!(keys_in_order(&orders, &pivots), expected);
        }
    }
}

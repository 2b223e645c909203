use super::NO_PIVOT;
use super::ordering::sort_by_pivot;
use super::sparse_row::SparseRow;

/// Pivot-merging Gaussian elimination over a set of sparse rows.
///
/// Rows are kept ordered by pivot. Every pass looks at adjacent rows sharing a
/// pivot column: of each pair the row with the larger minimum |lead / entry|
/// ratio is retained and the other one is replaced by the scaled difference, so
/// its pivot moves right or the row vanishes. Passes repeat until no pair shares
/// a pivot, i.e. the nonempty rows are in echelon form.
#[derive(Debug, Clone)]
pub struct Elimination {
    rows: Vec<SparseRow>,
    pivots: Vec<i64>,
    orders: Vec<usize>,
}

impl Elimination {
    pub fn new(rows: Vec<SparseRow>) -> Self {
        let pivots = rows.iter().map(|row| row.pivot_key()).collect();
        let orders = (0..rows.len()).collect();
        Self {
            rows,
            pivots,
            orders,
        }
    }

    /// Runs passes until stable; returns the number of row merges performed.
    pub fn run(&mut self) -> usize {
        let n = self.rows.len();
        let mut merges = 0;
        loop {
            sort_by_pivot(&mut self.orders, &self.pivots, 0, n);
            for j in 0..n.saturating_sub(1) {
                let (first, second) = (self.orders[j], self.orders[j + 1]);
                if self.shares_pivot(first, second)
                    && self.rows[second].min_lead_ratio() > self.rows[first].min_lead_ratio()
                {
                    self.orders.swap(j, j + 1);
                }
            }
            let mut merged = false;
            for j in 0..n.saturating_sub(1) {
                let (retained, replaced) = (self.orders[j], self.orders[j + 1]);
                if self.shares_pivot(retained, replaced) {
                    let (target, source) = row_pair(&mut self.rows, replaced, retained);
                    target.eliminate_with(source);
                    self.pivots[replaced] = self.rows[replaced].pivot_key();
                    merged = true;
                    merges += 1;
                }
            }
            if !merged {
                break;
            }
        }
        merges
    }

    fn shares_pivot(&self, a: usize, b: usize) -> bool {
        self.pivots[a] == self.pivots[b] && self.pivots[a] != NO_PIVOT
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }
    /// row indices sorted by pivot as of the last pass
    pub fn orders(&self) -> &[usize] {
        &self.orders
    }

    pub fn nonempty_rows(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_empty()).count()
    }

    pub fn into_parts(self) -> (Vec<SparseRow>, Vec<usize>) {
        (self.rows, self.orders)
    }
}

/// mutable `target` and shared `source` rows out of one slice, `target != source`
fn row_pair(rows: &mut [SparseRow], target: usize, source: usize) -> (&mut SparseRow, &SparseRow) {
    debug_assert_ne!(target, source);
    if target < source {
        let (head, tail) = rows.split_at_mut(source);
        (&mut head[target], &tail[0])
    } else {
        let (head, tail) = rows.split_at_mut(target);
        (&mut tail[0], &head[source])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echelon_form_has_distinct_pivots() {
        // rows of a 3x3 matrix of rank 2 (third row = first + second)
        let rows = vec![
            SparseRow::from_entries(vec![(0, 1.0), (1, 2.0), (2, 3.0)]),
            SparseRow::from_entries(vec![(0, 2.0), (1, 1.0)]),
            SparseRow::from_entries(vec![(0, 3.0), (1, 3.0), (2, 3.0)]),
        ];
        let mut elimination = Elimination::new(rows);
        let merges = elimination.run();
        assert!(merges > 0);
        assert_eq!(elimination.nonempty_rows(), 2);
        let mut pivots: Vec<usize> = elimination
            .rows()
            .iter()
            .filter_map(|row| row.pivot())
            .collect();
        pivots.sort();
        pivots.dedup();
        assert_eq!(pivots.len(), 2);
    }

    #[test]
    fn test_orders_follow_pivots() {
        let rows = vec![
            SparseRow::from_entries(vec![(2, 1.0)]),
            SparseRow::new(),
            SparseRow::from_entries(vec![(0, 1.0)]),
        ];
        let mut elimination = Elimination::new(rows);
        assert_eq!(elimination.run(), 0);
        assert_eq!(elimination.orders(), &[2, 0, 1]);
    }

    #[test]
    fn test_independent_rows_survive() {
        let rows = vec![
            SparseRow::from_entries(vec![(0, 1.0), (3, 1.0)]),
            SparseRow::from_entries(vec![(0, 1.0), (1, 1.0)]),
            SparseRow::from_entries(vec![(1, 1.0), (2, 1.0)]),
        ];
        let mut elimination = Elimination::new(rows);
        elimination.run();
        assert_eq!(elimination.nonempty_rows(), 3);
    }
}

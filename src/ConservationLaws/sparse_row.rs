use super::{MIN, NO_PIVOT};

/// One row of an evolving elimination matrix.
///
/// Stores only nonzero entries as (column, coefficient) pairs sorted by column.
/// Columns are reaction indices, species indices or bookkeeping columns depending
/// on who builds the row. Rows are rebuilt by index-based merging, never mutated
/// through pointers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    entries: Vec<(usize, f64)>,
}

impl SparseRow {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
    /// builds a row from arbitrary entries: sorted by column, exact zeros removed
    pub fn from_entries(entries: Vec<(usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = entries.into_iter().filter(|(_, v)| *v != 0.0).collect();
        entries.sort_by_key(|(col, _)| *col);
        Self { entries }
    }
    /// appends an entry; the column must be larger than every column already stored
    pub fn push(&mut self, column: usize, value: f64) {
        debug_assert!(
            self.entries.last().map_or(true, |(last, _)| *last < column),
            "sparse row columns must be strictly increasing"
        );
        self.entries.push((column, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
    /// lowest nonzero column
    pub fn pivot(&self) -> Option<usize> {
        self.entries.first().map(|(col, _)| *col)
    }
    /// pivot as an ordering key, `NO_PIVOT` for an empty row
    pub fn pivot_key(&self) -> i64 {
        self.pivot().map_or(NO_PIVOT, |col| col as i64)
    }
    /// coefficient standing in the pivot column
    pub fn lead(&self) -> f64 {
        self.entries.first().map_or(0.0, |(_, v)| *v)
    }

    pub fn get(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |(col, _)| *col)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Smallest |lead / entry| over the row.
    ///
    /// A row with a single entry reports 1e8: such a row is the best possible
    /// pivot row because eliminating with it creates no fill-in.
    pub fn min_lead_ratio(&self) -> f64 {
        if self.entries.len() <= 1 {
            return 1e8;
        }
        let lead = self.lead();
        self.entries
            .iter()
            .map(|(_, v)| (lead / v).abs())
            .fold(1e8, f64::min)
    }

    /// Replaces `self` by `g * self - retained` with `g = lead(retained) / lead(self)`.
    ///
    /// Both rows must share the pivot column, which cancels exactly and is skipped.
    /// Resulting entries with magnitude not above `MIN` are dropped.
    pub fn eliminate_with(&mut self, retained: &SparseRow) {
        debug_assert_eq!(self.pivot(), retained.pivot());
        let g = retained.lead() / self.lead();
        let own = &self.entries[1.min(self.entries.len())..];
        let other = &retained.entries[1.min(retained.entries.len())..];
        let mut merged = Vec::with_capacity(own.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < own.len() || j < other.len() {
            let (col, value) = match (own.get(i), other.get(j)) {
                (Some(&(ca, va)), Some(&(cb, vb))) => match ca.cmp(&cb) {
                    std::cmp::Ordering::Less => {
                        i += 1;
                        (ca, va * g)
                    }
                    std::cmp::Ordering::Greater => {
                        j += 1;
                        (cb, -vb)
                    }
                    std::cmp::Ordering::Equal => {
                        i += 1;
                        j += 1;
                        (ca, va * g - vb)
                    }
                },
                (Some(&(ca, va)), None) => {
                    i += 1;
                    (ca, va * g)
                }
                (None, Some(&(cb, vb))) => {
                    j += 1;
                    (cb, -vb)
                }
                (None, None) => break,
            };
            if value.abs() > MIN {
                merged.push((col, value));
            }
        }
        self.entries = merged;
    }

    /// `self - factor * other`, every column kept if its magnitude exceeds `MIN`
    pub fn sub_scaled(&self, other: &SparseRow, factor: f64) -> SparseRow {
        let mut merged = Vec::with_capacity(self.entries.len() + other.entries.len());
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        while i < a.len() || j < b.len() {
            let (col, value) = if j >= b.len() || (i < a.len() && a[i].0 < b[j].0) {
                i += 1;
                (a[i - 1].0, a[i - 1].1)
            } else if i >= a.len() || b[j].0 < a[i].0 {
                j += 1;
                (b[j - 1].0, -factor * b[j - 1].1)
            } else {
                i += 1;
                j += 1;
                (a[i - 1].0, a[i - 1].1 - factor * b[j - 1].1)
            };
            if value.abs() > MIN {
                merged.push((col, value));
            }
        }
        SparseRow { entries: merged }
    }
    /// divides every coefficient by the lead, so the pivot becomes 1
    pub fn normalize_lead(&mut self) {
        let lead = self.lead();
        if lead != 0.0 {
            for (_, v) in self.entries.iter_mut() {
                *v /= lead;
            }
        }
    }
    /// sparse dot product
    pub fn dot(&self, other: &SparseRow) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_entries_sorts_and_drops_zeros() {
        let row = SparseRow::from_entries(vec![(4, 2.0), (1, 0.0), (0, -1.0)]);
        assert_eq!(row.entries(), &[(0, -1.0), (4, 2.0)]);
        assert_eq!(row.pivot(), Some(0));
        assert_eq!(row.pivot_key(), 0);
        assert_eq!(SparseRow::new().pivot_key(), NO_PIVOT);
    }

    #[test]
    fn test_min_lead_ratio() {
        let single = SparseRow::from_entries(vec![(3, 5.0)]);
        assert_relative_eq!(single.min_lead_ratio(), 1e8);
        let row = SparseRow::from_entries(vec![(0, 1.0), (2, 4.0), (5, -2.0)]);
        assert_relative_eq!(row.min_lead_ratio(), 0.25);
    }

    #[test]
    fn test_eliminate_cancels_pivot() {
        // A -> B, species rows over one reaction plus bookkeeping columns 1 and 2
        let retained = SparseRow::from_entries(vec![(0, -1.0), (1, 1.0)]);
        let mut other = SparseRow::from_entries(vec![(0, 1.0), (2, 1.0)]);
        other.eliminate_with(&retained);
        // g = -1: -(0,1),(2,1) - (1,1)  ->  (1,-1),(2,-1)
        assert_eq!(other.entries(), &[(1, -1.0), (2, -1.0)]);
    }

    #[test]
    fn test_eliminate_drops_tiny_entries() {
        let retained = SparseRow::from_entries(vec![(0, 2.0), (1, 1.0), (3, 1.0)]);
        let mut other = SparseRow::from_entries(vec![(0, 2.0), (1, 1.0 + 1e-12), (2, 1.0)]);
        other.eliminate_with(&retained);
        assert_eq!(other.entries(), &[(2, 1.0), (3, -1.0)]);
    }

    #[test]
    fn test_sub_scaled_and_dot() {
        let a = SparseRow::from_entries(vec![(0, 2.0), (2, 3.0)]);
        let b = SparseRow::from_entries(vec![(0, 1.0), (1, 1.0)]);
        let c = a.sub_scaled(&b, 2.0);
        assert_eq!(c.entries(), &[(1, -2.0), (2, 3.0)]);
        assert_relative_eq!(a.dot(&b), 2.0);
        assert_relative_eq!(c.get(2), 3.0);
        assert_relative_eq!(c.get(0), 0.0);
    }

    #[test]
    fn test_normalize_lead() {
        let mut row = SparseRow::from_entries(vec![(1, -2.0), (4, 1.0)]);
        row.normalize_lead();
        assert_eq!(row.entries(), &[(1, 1.0), (4, -0.5)]);
    }
}

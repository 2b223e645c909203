use super::elimination::Elimination;
use super::moiety::ConservedMoiety;
use super::sparse_row::SparseRow;

/// true if `candidate` is linearly independent of `moieties`
///
/// The existing moieties and the candidate are eliminated together over species
/// columns; the candidate is independent iff no row vanishes.
pub fn is_linearly_independent(candidate: &ConservedMoiety, moieties: &[ConservedMoiety]) -> bool {
    let mut rows: Vec<_> = moieties.iter().map(|m| m.to_row()).collect();
    rows.push(candidate.to_row());
    rank_is_full(rows)
}

/// true if no moiety of the set is a linear combination of the others
pub fn moieties_are_independent(moieties: &[ConservedMoiety]) -> bool {
    rank_is_full(moieties.iter().map(|m| m.to_row()).collect())
}

fn rank_is_full(rows: Vec<SparseRow>) -> bool {
    let before = rows.iter().filter(|row| !row.is_empty()).count();
    if before < rows.len() {
        return false;
    }
    let mut elimination = Elimination::new(rows);
    elimination.run();
    elimination.nonempty_rows() == before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moiety(pairs: &[(usize, f64)]) -> ConservedMoiety {
        ConservedMoiety::from_pairs(pairs.to_vec())
    }

    #[test]
    fn test_new_direction_is_independent() {
        let existing = vec![moiety(&[(1, 1.0), (2, 1.0), (3, 1.0)])];
        assert!(is_linearly_independent(&moiety(&[(0, 1.0), (2, 1.0)]), &existing));
    }

    #[test]
    fn test_repeated_moiety_is_dependent() {
        let existing = vec![moiety(&[(1, 1.0), (2, 1.0), (3, 1.0)])];
        assert!(!is_linearly_independent(
            &moiety(&[(1, 2.0), (2, 2.0), (3, 2.0)]),
            &existing
        ));
    }

    #[test]
    fn test_sum_of_moieties_is_dependent() {
        let existing = vec![
            moiety(&[(0, 1.0), (2, 1.0)]),
            moiety(&[(1, 1.0), (2, 1.0), (3, 1.0)]),
        ];
        assert!(moieties_are_independent(&existing));
        let sum = moiety(&[(0, 1.0), (1, 1.0), (2, 2.0), (3, 1.0)]);
        assert!(!is_linearly_independent(&sum, &existing));
        // with nothing to compare against every nonzero candidate is independent
        assert!(is_linearly_independent(&sum, &[]));
    }
}

use super::moiety::ConservedMoiety;
use super::ordering::sorted_orders;
use log::debug;

/// Canonicalises a set of moieties in place.
///
/// Moieties are ordered from the densest to the sparsest. For every ordered pair
/// the later (sparser) moiety is subtracted from the earlier one; when the
/// difference has no negative coefficient it replaces the denser moiety. Passes
/// repeat until one makes no change, so a second call is a no-op.
/// Returns the number of replacements.
pub fn reduce_moieties(moieties: &mut [ConservedMoiety]) -> usize {
    let k = moieties.len();
    let mut replacements = 0;
    loop {
        let pivots: Vec<i64> = moieties.iter().map(|m| -(m.len() as i64)).collect();
        let orders = sorted_orders(&pivots);
        let mut changed = false;
        for i in 0..k {
            for j in (i + 1)..k {
                let (denser, sparser) = (orders[i], orders[j]);
                let difference = moieties[denser]
                    .to_row()
                    .sub_scaled(&moieties[sparser].to_row(), 1.0);
                if !difference.is_empty() && difference.iter().all(|(_, c)| c > 0.0) {
                    moieties[denser] = ConservedMoiety::from_row_unnormalized(&difference);
                    changed = true;
                    replacements += 1;
                }
            }
        }
        if !changed {
            break;
        }
    }
    debug!("moiety reduction made {} replacements", replacements);
    replacements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moiety(pairs: &[(usize, f64)]) -> ConservedMoiety {
        ConservedMoiety::from_pairs(pairs.to_vec())
    }

    #[test]
    fn test_sum_is_split_back() {
        let mut moieties = vec![
            moiety(&[(1, 1.0), (2, 1.0), (3, 1.0)]),
            moiety(&[(0, 1.0), (1, 1.0), (2, 2.0), (3, 1.0)]),
        ];
        assert_eq!(reduce_moieties(&mut moieties), 1);
        assert_eq!(moieties[0].species(), &[1, 2, 3]);
        assert_eq!(moieties[1].species(), &[0, 2]);
        assert_eq!(moieties[1].coefficients(), &[1.0, 1.0]);
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let mut moieties = vec![
            moiety(&[(0, 1.0), (1, 1.0)]),
            moiety(&[(0, 2.0), (1, 2.0), (2, 1.0), (3, 1.0)]),
            moiety(&[(0, 1.0), (1, 1.0), (2, 1.0), (3, 1.0), (4, 3.0)]),
            moiety(&[(5, 1.0), (6, 2.0)]),
        ];
        reduce_moieties(&mut moieties);
        let once = moieties.clone();
        assert_eq!(reduce_moieties(&mut moieties), 0);
        assert_eq!(moieties, once);
    }

    #[test]
    fn test_incomparable_moieties_untouched() {
        let mut moieties = vec![moiety(&[(0, 1.0), (1, 1.0)]), moiety(&[(1, 1.0), (2, 1.0)])];
        let before = moieties.clone();
        assert_eq!(reduce_moieties(&mut moieties), 0);
        assert_eq!(moieties, before);
    }
}

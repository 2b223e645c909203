use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sorted set of species indices engaged by conservation laws or moieties.
/// Only grows: there is no removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesSet {
    members: BTreeSet<usize>,
}

impl SpeciesSet {
    pub fn new() -> Self {
        Self {
            members: BTreeSet::new(),
        }
    }
    /// returns true if the species was not in the set yet
    pub fn insert(&mut self, species: usize) -> bool {
        self.members.insert(species)
    }

    pub fn extend<I: IntoIterator<Item = usize>>(&mut self, species: I) {
        self.members.extend(species);
    }

    pub fn contains(&self, species: usize) -> bool {
        self.members.contains(&species)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.members.iter().copied().collect()
    }
}

impl FromIterator<usize> for SpeciesSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_set_is_sorted_and_unique() {
        let mut set = SpeciesSet::new();
        assert!(set.insert(5));
        assert!(set.insert(1));
        assert!(!set.insert(5));
        set.extend(vec![3, 1, 0]);
        assert_eq!(set.to_vec(), vec![0, 1, 3, 5]);
        assert!(set.contains(3));
        assert!(!set.contains(2));
        assert_eq!(set.len(), 4);
        let collected: SpeciesSet = vec![2, 2, 1].into_iter().collect();
        assert_eq!(collected.to_vec(), vec![1, 2]);
    }
}

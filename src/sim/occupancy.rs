//! Airplane/tower membership relation
//!
//! Kept as a bipartite index owned by the simulation instead of references
//! between entities. Both directions are updated together.

use std::collections::{BTreeMap, BTreeSet};

use super::entity::{AirplaneId, TowerId};

#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    towers_of: BTreeMap<AirplaneId, BTreeSet<TowerId>>,
    airplanes_of: BTreeMap<TowerId, BTreeSet<AirplaneId>>,
}

impl Occupancy {
    /// Record that the airplane is inside the tower's area.
    /// Returns true when the pair was new.
    pub fn insert(&mut self, airplane: AirplaneId, tower: TowerId) -> bool {
        let added = self.towers_of.entry(airplane).or_default().insert(tower);
        self.airplanes_of.entry(tower).or_default().insert(airplane);
        added
    }

    /// Drop the pair if present. Returns true when something was removed.
    pub fn remove(&mut self, airplane: AirplaneId, tower: TowerId) -> bool {
        let removed = match self.towers_of.get_mut(&airplane) {
            Some(towers) => {
                let removed = towers.remove(&tower);
                if towers.is_empty() {
                    self.towers_of.remove(&airplane);
                }
                removed
            }
            None => false,
        };
        if let Some(airplanes) = self.airplanes_of.get_mut(&tower) {
            airplanes.remove(&airplane);
            if airplanes.is_empty() {
                self.airplanes_of.remove(&tower);
            }
        }
        removed
    }

    /// Whether the airplane is inside at least one tower area
    pub fn in_tower_area(&self, airplane: AirplaneId) -> bool {
        self.towers_of
            .get(&airplane)
            .is_some_and(|towers| !towers.is_empty())
    }

    pub fn towers_of(&self, airplane: AirplaneId) -> impl Iterator<Item = TowerId> + '_ {
        self.towers_of.get(&airplane).into_iter().flatten().copied()
    }

    pub fn airplanes_in(&self, tower: TowerId) -> impl Iterator<Item = AirplaneId> + '_ {
        self.airplanes_of.get(&tower).into_iter().flatten().copied()
    }

    /// Forget every pair involving the airplane
    pub fn forget_airplane(&mut self, airplane: AirplaneId) {
        if let Some(towers) = self.towers_of.remove(&airplane) {
            for tower in towers {
                if let Some(airplanes) = self.airplanes_of.get_mut(&tower) {
                    airplanes.remove(&airplane);
                    if airplanes.is_empty() {
                        self.airplanes_of.remove(&tower);
                    }
                }
            }
        }
    }

    /// Forget every pair involving the tower
    pub fn forget_tower(&mut self, tower: TowerId) {
        if let Some(airplanes) = self.airplanes_of.remove(&tower) {
            for airplane in airplanes {
                if let Some(towers) = self.towers_of.get_mut(&airplane) {
                    towers.remove(&tower);
                    if towers.is_empty() {
                        self.towers_of.remove(&airplane);
                    }
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.towers_of.clear();
        self.airplanes_of.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.towers_of.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut occupancy = Occupancy::default();
        assert!(occupancy.insert(1, 10));
        assert!(!occupancy.insert(1, 10));
        assert!(occupancy.insert(1, 11));
        assert!(occupancy.in_tower_area(1));
        assert_eq!(occupancy.towers_of(1).collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(occupancy.airplanes_in(10).collect::<Vec<_>>(), vec![1]);

        assert!(occupancy.remove(1, 10));
        assert!(occupancy.in_tower_area(1));
        assert!(occupancy.remove(1, 11));
        assert!(!occupancy.in_tower_area(1));
        assert!(occupancy.is_empty());
    }

    #[test]
    fn test_remove_absent_is_tolerated() {
        let mut occupancy = Occupancy::default();
        assert!(!occupancy.remove(4, 2));
        occupancy.insert(1, 2);
        assert!(!occupancy.remove(4, 2));
        assert_eq!(occupancy.airplanes_in(2).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_forget() {
        let mut occupancy = Occupancy::default();
        occupancy.insert(1, 10);
        occupancy.insert(2, 10);
        occupancy.insert(2, 11);

        occupancy.forget_tower(10);
        assert!(!occupancy.in_tower_area(1));
        assert!(occupancy.in_tower_area(2));

        occupancy.forget_airplane(2);
        assert!(occupancy.is_empty());
        assert_eq!(occupancy.airplanes_in(11).count(), 0);
    }
}

//! Entity groups
//!
//! A group owns every entity of one kind, iterated in id order. Removed
//! entities are parked in a graveyard so the editor history can revive them.

use std::collections::BTreeMap;
use std::fmt::Debug;

use super::airplane::{Airplane, FlightStatus};
use super::collision::polygons_intersect;
use super::entity::{AirplaneId, TowerId};
use super::occupancy::Occupancy;
use super::state::SimEvent;
use super::tower::Tower;

/// Entities that can live in a [`Group`]
pub trait Member {
    type Id: Copy + Ord + Debug;

    fn member_id(&self) -> Self::Id;
}

impl Member for Airplane {
    type Id = AirplaneId;

    fn member_id(&self) -> AirplaneId {
        self.id()
    }
}

impl Member for Tower {
    type Id = TowerId;

    fn member_id(&self) -> TowerId {
        self.id()
    }
}

#[derive(Debug, Clone)]
pub struct Group<T: Member> {
    members: BTreeMap<T::Id, T>,
    removed: BTreeMap<T::Id, T>,
}

impl<T: Member> Default for Group<T> {
    fn default() -> Self {
        Self {
            members: BTreeMap::new(),
            removed: BTreeMap::new(),
        }
    }
}

impl<T: Member> Group<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, member: T) {
        let id = member.member_id();
        self.removed.remove(&id);
        self.members.insert(id, member);
    }

    /// Move a live member to the graveyard. Returns false when not live.
    pub fn remove(&mut self, id: T::Id) -> bool {
        match self.members.remove(&id) {
            Some(member) => {
                self.removed.insert(id, member);
                true
            }
            None => false,
        }
    }

    /// Bring a removed member back. Returns false when it is not in the graveyard.
    pub fn revive(&mut self, id: T::Id) -> bool {
        match self.removed.remove(&id) {
            Some(member) => {
                self.members.insert(id, member);
                true
            }
            None => false,
        }
    }

    /// Drop a removed member for good. Returns it when it was in the graveyard.
    pub fn purge(&mut self, id: T::Id) -> Option<T> {
        self.removed.remove(&id)
    }

    /// Drop a live member for good
    pub fn discard(&mut self, id: T::Id) -> Option<T> {
        self.members.remove(&id)
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.members.get(&id)
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.members.get_mut(&id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.members.contains_key(&id)
    }

    pub fn is_removed(&self, id: T::Id) -> bool {
        self.removed.contains_key(&id)
    }

    /// Members waiting in the graveyard
    pub fn removed_len(&self) -> usize {
        self.removed.len()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.members.values()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> {
        self.members.values_mut()
    }

    pub fn ids(&self) -> Vec<T::Id> {
        self.members.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.removed.clear();
    }
}

impl Group<Airplane> {
    /// Update every airplane's state machine at simulation time `elapsed`
    pub fn advance(&mut self, elapsed: f32) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for airplane in self.members.values_mut() {
            match airplane.update(elapsed) {
                Some(FlightStatus::Flying) => events.push(SimEvent::TookOff(airplane.id())),
                Some(FlightStatus::Landed) => events.push(SimEvent::Landed(airplane.id())),
                _ => {}
            }
        }
        events
    }

    /// Destroy every pair of colliding airplanes.
    ///
    /// Only flying airplanes outside every tower area take part. Each airplane
    /// is destroyed by the first collision found and skipped afterwards.
    pub fn check_collisions(&mut self, occupancy: &Occupancy) -> Vec<SimEvent> {
        let eligible: Vec<AirplaneId> = self
            .members
            .values()
            .filter(|a| a.is_flying() && !occupancy.in_tower_area(a.id()))
            .map(|a| a.id())
            .collect();

        let mut events = Vec::new();
        for (i, &first) in eligible.iter().enumerate() {
            let Some(a) = self.members.get(&first) else {
                continue;
            };
            if a.destroyed() {
                continue;
            }
            let hitbox_a = *a.hitbox();
            for &second in &eligible[i + 1..] {
                let Some(b) = self.members.get(&second) else {
                    continue;
                };
                if b.destroyed() || !polygons_intersect(&hitbox_a, b.hitbox()) {
                    continue;
                }
                for id in [first, second] {
                    if let Some(airplane) = self.members.get_mut(&id) {
                        airplane.destroy();
                    }
                }
                events.push(SimEvent::Collision(first, second));
                events.push(SimEvent::Destroyed(first));
                events.push(SimEvent::Destroyed(second));
                break;
            }
        }
        events
    }

    /// Discard landed and destroyed airplanes, returning their ids
    pub fn retire_finished(&mut self) -> Vec<AirplaneId> {
        let finished: Vec<AirplaneId> = self
            .members
            .values()
            .filter(|a| a.status().is_terminal())
            .map(|a| a.id())
            .collect();
        for id in &finished {
            self.members.remove(id);
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::airplane::AirplaneParams;
    use crate::sim::entity::Capability;
    use glam::Vec2;

    fn airplane(id: AirplaneId, from: Vec2, to: Vec2) -> Airplane {
        Airplane::new(id, AirplaneParams::new(from, to, 100.0, 0.0), Capability::Plain)
    }

    fn flying_group(planes: Vec<Airplane>) -> Group<Airplane> {
        let mut group = Group::new();
        for plane in planes {
            group.insert(plane);
        }
        group.advance(0.0);
        group
    }

    #[test]
    fn test_remove_and_revive() {
        let mut group = Group::new();
        group.insert(airplane(3, Vec2::ZERO, Vec2::X));
        assert!(group.remove(3));
        assert!(!group.contains(3));
        assert!(group.is_removed(3));
        assert!(!group.remove(3));
        assert!(group.revive(3));
        assert!(group.contains(3));
        assert!(!group.revive(3));
    }

    #[test]
    fn test_purge_only_touches_graveyard() {
        let mut group = Group::new();
        group.insert(airplane(1, Vec2::ZERO, Vec2::X));
        group.insert(airplane(2, Vec2::ZERO, Vec2::X));
        assert!(group.purge(1).is_none());
        group.remove(1);
        assert_eq!(group.removed_len(), 1);
        assert!(group.purge(1).is_some());
        assert_eq!(group.removed_len(), 0);
        assert!(!group.revive(1));
        assert_eq!(group.ids(), vec![2]);
    }

    #[test]
    fn test_iteration_in_id_order() {
        let mut group = Group::new();
        group.insert(airplane(5, Vec2::ZERO, Vec2::X));
        group.insert(airplane(2, Vec2::ZERO, Vec2::X));
        group.insert(airplane(9, Vec2::ZERO, Vec2::X));
        assert_eq!(group.ids(), vec![2, 5, 9]);
    }

    #[test]
    fn test_overlapping_pair_destroyed() {
        let mut group = flying_group(vec![
            airplane(1, Vec2::new(0.0, 0.0), Vec2::new(500.0, 0.0)),
            airplane(2, Vec2::new(5.0, 5.0), Vec2::new(500.0, 5.0)),
            airplane(3, Vec2::new(300.0, 300.0), Vec2::new(500.0, 300.0)),
        ]);
        let events = group.check_collisions(&Occupancy::default());
        assert!(events.contains(&SimEvent::Collision(1, 2)));
        assert!(group.get(1).unwrap().destroyed());
        assert!(group.get(2).unwrap().destroyed());
        assert!(group.get(3).unwrap().is_flying());
    }

    #[test]
    fn test_first_collision_wins() {
        // 1 overlaps both 2 and 3; only the first pair found is destroyed
        let mut group = flying_group(vec![
            airplane(1, Vec2::new(0.0, 0.0), Vec2::new(500.0, 0.0)),
            airplane(2, Vec2::new(12.0, 0.0), Vec2::new(500.0, 0.0)),
            airplane(3, Vec2::new(-12.0, 0.0), Vec2::new(500.0, 0.0)),
        ]);
        let events = group.check_collisions(&Occupancy::default());
        assert_eq!(
            events.iter().filter(|e| matches!(e, SimEvent::Collision(..))).count(),
            1
        );
        assert!(group.get(1).unwrap().destroyed());
        assert!(group.get(2).unwrap().destroyed());
        assert!(group.get(3).unwrap().is_flying());
    }

    #[test]
    fn test_protected_airplane_survives() {
        let mut group = flying_group(vec![
            airplane(1, Vec2::new(0.0, 0.0), Vec2::new(500.0, 0.0)),
            airplane(2, Vec2::new(5.0, 0.0), Vec2::new(500.0, 0.0)),
        ]);
        let mut occupancy = Occupancy::default();
        occupancy.insert(2, 77);
        assert!(group.check_collisions(&occupancy).is_empty());
        assert!(group.get(1).unwrap().is_flying());
        assert!(group.get(2).unwrap().is_flying());
    }

    #[test]
    fn test_waiting_airplanes_ignored() {
        let mut group = Group::new();
        group.insert(Airplane::new(
            1,
            AirplaneParams::new(Vec2::ZERO, Vec2::X * 100.0, 10.0, 3.0),
            Capability::Plain,
        ));
        group.insert(airplane(2, Vec2::ZERO, Vec2::X * 100.0));
        group.advance(0.0);
        assert!(group.check_collisions(&Occupancy::default()).is_empty());
    }

    #[test]
    fn test_retire_finished() {
        let mut group = flying_group(vec![
            airplane(1, Vec2::ZERO, Vec2::X * 100.0),
            airplane(2, Vec2::Y * 100.0, Vec2::ONE * 100.0),
        ]);
        group.get_mut(1).unwrap().destroy();
        assert_eq!(group.retire_finished(), vec![1]);
        assert_eq!(group.ids(), vec![2]);
    }
}

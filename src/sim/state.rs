//! Simulation state
//!
//! Everything the panel simulates lives here: both entity groups, the
//! airplane/tower membership relation and the fixed-step clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::airplane::{Airplane, AirplaneParams};
use super::entity::{AirplaneId, Capability, Editable, EntityId, EntityParams, Handle, TowerId};
use super::group::Group;
use super::occupancy::Occupancy;
use super::tick::SimClock;
use super::tower::{Tower, TowerParams};
use crate::error::EditError;
use crate::persistence::Script;
use crate::settings::Viewport;

/// How entities are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimMode {
    /// Plain entities; finished airplanes are retired
    Play,
    /// Editable entities; nothing is removed automatically
    Editor,
}

impl SimMode {
    pub fn capability(self) -> Capability {
        match self {
            SimMode::Play => Capability::Plain,
            SimMode::Editor => Capability::Editable,
        }
    }
}

/// Something that happened during a sub-step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    TookOff(AirplaneId),
    Landed(AirplaneId),
    Collision(AirplaneId, AirplaneId),
    Destroyed(AirplaneId),
    EnteredArea { airplane: AirplaneId, tower: TowerId },
    LeftArea { airplane: AirplaneId, tower: TowerId },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub airplanes: Group<Airplane>,
    pub towers: Group<Tower>,
    pub occupancy: Occupancy,
    pub clock: SimClock,
    mode: SimMode,
    viewport: Viewport,
    /// Next entity ID
    next_id: u32,
}

impl Simulation {
    pub fn new(mode: SimMode, viewport: Viewport) -> Self {
        Self {
            airplanes: Group::new(),
            towers: Group::new(),
            occupancy: Occupancy::default(),
            clock: SimClock::default(),
            mode,
            viewport,
            next_id: 1,
        }
    }

    /// Build a simulation from parsed script entities
    pub fn from_script(script: &Script, mode: SimMode, viewport: Viewport) -> Self {
        let mut sim = Self::new(mode, viewport);
        for params in &script.airplanes {
            sim.add_airplane(*params);
        }
        for params in &script.towers {
            sim.add_tower(*params);
        }
        sim
    }

    /// Current entity parameters, in id order
    pub fn to_script(&self) -> Script {
        Script {
            airplanes: self.airplanes.iter().map(|a| a.params()).collect(),
            towers: self.towers.iter().map(|t| t.params()).collect(),
        }
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Simulated seconds since the start
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed_seconds()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_airplane(&mut self, params: AirplaneParams) -> AirplaneId {
        let id = self.next_entity_id();
        self.airplanes.insert(Airplane::new(id, params, self.mode.capability()));
        id
    }

    pub fn add_tower(&mut self, params: TowerParams) -> TowerId {
        let id = self.next_entity_id();
        self.towers.insert(Tower::new(id, params, self.mode.capability(), self.viewport));
        id
    }

    /// Resize the map; tower areas are rewrapped
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for tower in self.towers.iter_mut() {
            tower.set_viewport(viewport);
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        match id {
            EntityId::Airplane(id) => self.airplanes.contains(id),
            EntityId::Tower(id) => self.towers.contains(id),
        }
    }

    /// Move a live entity to its group's graveyard
    pub fn remove(&mut self, id: EntityId) -> bool {
        match id {
            EntityId::Airplane(id) => {
                self.occupancy.forget_airplane(id);
                self.airplanes.remove(id)
            }
            EntityId::Tower(id) => {
                self.occupancy.forget_tower(id);
                self.towers.remove(id)
            }
        }
    }

    /// Bring a removed entity back into its group
    pub fn revive(&mut self, id: EntityId) -> bool {
        match id {
            EntityId::Airplane(id) => self.airplanes.revive(id),
            EntityId::Tower(id) => {
                let viewport = self.viewport;
                let revived = self.towers.revive(id);
                if let Some(tower) = self.towers.get_mut(id) {
                    tower.set_viewport(viewport);
                }
                revived
            }
        }
    }

    /// Forget a removed entity; it can no longer be revived
    pub fn purge(&mut self, id: EntityId) -> bool {
        match id {
            EntityId::Airplane(id) => self.airplanes.purge(id).is_some(),
            EntityId::Tower(id) => self.towers.purge(id).is_some(),
        }
    }

    pub fn params(&self, id: EntityId) -> Option<EntityParams> {
        match id {
            EntityId::Airplane(id) => self
                .airplanes
                .get(id)
                .map(|a| EntityParams::Airplane(a.params())),
            EntityId::Tower(id) => self.towers.get(id).map(|t| EntityParams::Tower(t.params())),
        }
    }

    /// Editing surface of a live, editable entity
    pub fn editable_mut(&mut self, id: EntityId) -> Option<&mut dyn Editable> {
        match id {
            EntityId::Airplane(id) => self.airplanes.get_mut(id)?.as_editable_mut(),
            EntityId::Tower(id) => self.towers.get_mut(id)?.as_editable_mut(),
        }
    }

    /// Replace an entity's parameters
    pub fn restore(&mut self, id: EntityId, params: EntityParams) -> Result<(), EditError> {
        let editable = self
            .editable_mut(id)
            .ok_or(EditError::InvalidOperation("no editable entity with this id"))?;
        editable.restore(params)?;
        if let EntityId::Airplane(id) = id {
            self.occupancy.forget_airplane(id);
        }
        Ok(())
    }

    /// Topmost entity handle under `pos`: airplanes above towers, newest first
    pub fn pick(&self, pos: Vec2) -> Option<(EntityId, Handle)> {
        let airplane = self
            .airplanes
            .iter()
            .rev()
            .find_map(|a| a.grab(pos).map(|handle| (EntityId::Airplane(a.id()), handle)));
        airplane.or_else(|| {
            self.towers
                .iter()
                .rev()
                .find_map(|t| t.grab(pos).map(|handle| (EntityId::Tower(t.id()), handle)))
        })
    }

    /// Rewind to t=0 with every airplane back at its departure
    pub fn rewind(&mut self) {
        self.clock.reset();
        self.occupancy.clear();
        for airplane in self.airplanes.iter_mut() {
            airplane.reset();
        }
    }

    /// True once a play session has no airplanes left
    pub fn is_finished(&self) -> bool {
        match self.mode {
            SimMode::Play => self.airplanes.is_empty(),
            SimMode::Editor => self.airplanes.iter().all(|a| a.status().is_terminal()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> Script {
        Script {
            airplanes: vec![AirplaneParams::new(
                Vec2::new(10.0, 10.0),
                Vec2::new(100.0, 10.0),
                20.0,
                1.0,
            )],
            towers: vec![TowerParams::new(Vec2::new(50.0, 50.0), 30.0)],
        }
    }

    #[test]
    fn test_from_script_round_trip() {
        let sim = Simulation::from_script(&script(), SimMode::Play, Viewport::default());
        assert_eq!(sim.airplanes.len(), 1);
        assert_eq!(sim.towers.len(), 1);
        assert_eq!(sim.to_script(), script());
    }

    #[test]
    fn test_mode_sets_capability() {
        let mut play = Simulation::from_script(&script(), SimMode::Play, Viewport::default());
        assert!(play.editable_mut(EntityId::Airplane(1)).is_none());

        let mut editor = Simulation::from_script(&script(), SimMode::Editor, Viewport::default());
        assert!(editor.editable_mut(EntityId::Airplane(1)).is_some());
        assert!(editor.editable_mut(EntityId::Tower(2)).is_some());
    }

    #[test]
    fn test_remove_and_revive() {
        let mut sim = Simulation::from_script(&script(), SimMode::Editor, Viewport::default());
        let tower = EntityId::Tower(2);
        assert!(sim.remove(tower));
        assert!(!sim.contains(tower));
        assert!(sim.params(tower).is_none());
        assert!(sim.revive(tower));
        assert!(sim.contains(tower));
    }

    #[test]
    fn test_restore_rejected_in_play() {
        let mut sim = Simulation::from_script(&script(), SimMode::Play, Viewport::default());
        let params = EntityParams::Tower(TowerParams::new(Vec2::ZERO, 5.0));
        assert!(sim.restore(EntityId::Tower(2), params).is_err());
    }

    #[test]
    fn test_pick_prefers_airplanes() {
        let sim = Simulation::from_script(&script(), SimMode::Editor, Viewport::default());
        assert_eq!(
            sim.pick(Vec2::new(50.0, 50.0)),
            Some((EntityId::Tower(2), Handle::Center))
        );
        assert_eq!(
            sim.pick(Vec2::new(12.0, 8.0)),
            Some((EntityId::Airplane(1), Handle::Departure))
        );
        assert_eq!(sim.pick(Vec2::new(500.0, 500.0)), None);
    }
}

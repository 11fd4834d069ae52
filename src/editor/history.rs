//! Editor command history
//!
//! Linear undo/redo over three command kinds. Deleted entities are parked in
//! their group's graveyard rather than dropped, so every command can be
//! replayed in both directions by [`History::undo`] and [`History::redo`].
//! Recording a new command drops the redo stack, and with it any entity
//! that only an undone `Add` could bring back.

use crate::sim::{EntityId, EntityParams, Simulation};

/// One undoable editor action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Entity was created
    Add(EntityId),
    /// Entity parameters changed; holds the parameters to go back to
    Modify(EntityId, EntityParams),
    /// Entity was deleted
    Delete(EntityId),
}

impl Command {
    pub fn entity(&self) -> EntityId {
        match *self {
            Command::Add(id) | Command::Modify(id, _) | Command::Delete(id) => id,
        }
    }
}

/// Selection change requested by a replayed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// Nothing to replay
    Empty,
    /// The entity is live again and should be selected
    Select(EntityId),
    /// The entity is gone; drop it from the selection
    Deselect(EntityId),
}

#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<Command>,
    redo: Vec<Command>,
    modified: bool,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_add(&mut self, id: EntityId, sim: &mut Simulation) {
        self.record(Command::Add(id), sim);
    }

    /// Record the parameters an entity had before a gesture or key edit
    pub fn record_modify(&mut self, id: EntityId, before: EntityParams, sim: &mut Simulation) {
        self.record(Command::Modify(id, before), sim);
    }

    pub fn record_delete(&mut self, id: EntityId, sim: &mut Simulation) {
        self.record(Command::Delete(id), sim);
    }

    fn record(&mut self, command: Command, sim: &mut Simulation) {
        self.undo.push(command);
        for abandoned in self.redo.drain(..) {
            // An undone Add left its entity in the graveyard; nothing can revive it now
            if let Command::Add(id) = abandoned
                && sim.purge(id)
            {
                log::debug!("Purged {:?}", id);
            }
        }
        self.modified = true;
    }

    /// Revert the most recent command. No-op on an empty stack.
    pub fn undo(&mut self, sim: &mut Simulation) -> Replay {
        let Some(command) = self.undo.pop() else {
            return Replay::Empty;
        };
        let (replayed, replay) = apply(command, sim, Direction::Backward);
        log::info!("Undo {:?}", command);
        self.redo.push(replayed);
        self.modified = true;
        replay
    }

    /// Re-apply the most recently undone command. No-op on an empty stack.
    pub fn redo(&mut self, sim: &mut Simulation) -> Replay {
        let Some(command) = self.redo.pop() else {
            return Replay::Empty;
        };
        let (replayed, replay) = apply(command, sim, Direction::Forward);
        log::info!("Redo {:?}", command);
        self.undo.push(replayed);
        self.modified = true;
        replay
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Unsaved changes since the last successful save
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Undo: invert the command
    Backward,
    /// Redo: apply it again
    Forward,
}

/// Run `command` against the simulation.
///
/// Returns the command to push on the opposite stack. `Modify` swaps the
/// stored parameters with the current ones so the same entry replays both
/// ways.
fn apply(command: Command, sim: &mut Simulation, direction: Direction) -> (Command, Replay) {
    match (command, direction) {
        (Command::Add(id), Direction::Backward) | (Command::Delete(id), Direction::Forward) => {
            sim.remove(id);
            (command, Replay::Deselect(id))
        }
        (Command::Add(id), Direction::Forward) | (Command::Delete(id), Direction::Backward) => {
            sim.revive(id);
            (command, Replay::Select(id))
        }
        (Command::Modify(id, params), _) => {
            let Some(current) = sim.params(id) else {
                log::warn!("History entry for missing entity {:?} skipped", id);
                return (command, Replay::Deselect(id));
            };
            if let Err(e) = sim.restore(id, params) {
                log::warn!("Failed to restore {:?}: {}", id, e);
                return (command, Replay::Deselect(id));
            }
            (Command::Modify(id, current), Replay::Select(id))
        }
    }
}

//! Editor input routing
//!
//! Turns normalized input into selection changes, drag gestures and key
//! edits, recording every change in the [`History`].

use glam::Vec2;

use super::history::{History, Replay};
use super::input::{InputEvent, Key, Modifiers, MouseButton};
use crate::settings::EditorDefaults;
use crate::sim::{AirplaneParams, EntityId, EntityParams, Handle, KeyEdit, Simulation, TowerParams};

/// What the session has to do after an event was routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Save,
    Quit,
}

/// A press-drag-release interaction, recorded as a single `Modify`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    entity: EntityId,
    handle: Handle,
    /// Press position to handle point
    offset: Vec2,
    /// Parameters at press time
    snapshot: EntityParams,
    /// Whether the snapshot was pushed to the history yet
    recorded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Editor {
    history: History,
    selection: Option<EntityId>,
    gesture: Option<Gesture>,
    cursor: Vec2,
    defaults: EditorDefaults,
}

impl Editor {
    pub fn new(defaults: EditorDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn selection(&self) -> Option<EntityId> {
        self.selection
    }

    /// Entity to draw on top
    pub fn active(&self) -> Option<EntityId> {
        self.gesture.map(|g| g.entity).or(self.selection)
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn handle_event(&mut self, event: &InputEvent, sim: &mut Simulation) -> EditorAction {
        match *event {
            InputEvent::Quit => EditorAction::Quit,
            InputEvent::KeyDown { key, modifiers } => self.key_down(key, modifiers, sim),
            InputEvent::MouseButtonDown { pos, button } => {
                self.cursor = pos;
                if button == MouseButton::Left {
                    self.press(pos, sim);
                }
                EditorAction::None
            }
            InputEvent::MouseButtonUp { pos, button } => {
                self.cursor = pos;
                if button == MouseButton::Left {
                    self.gesture = None;
                }
                EditorAction::None
            }
            InputEvent::MouseMove { pos, held } => {
                self.cursor = pos;
                if held.left {
                    self.drag(pos, sim);
                }
                EditorAction::None
            }
        }
    }

    fn key_down(&mut self, key: Key, modifiers: Modifiers, sim: &mut Simulation) -> EditorAction {
        if modifiers.ctrl {
            match key {
                Key::Z if modifiers.shift => self.redo(sim),
                Key::Z => self.undo(sim),
                Key::Y => self.redo(sim),
                Key::S => return EditorAction::Save,
                _ => {}
            }
            return EditorAction::None;
        }

        match key {
            Key::A => self.add_airplane(sim),
            Key::T => self.add_tower(sim),
            Key::Plus => self.key_edit(KeyEdit::Increase, sim),
            Key::Minus => self.key_edit(KeyEdit::Decrease, sim),
            Key::PageUp => self.key_edit(KeyEdit::DelayUp, sim),
            Key::PageDown => self.key_edit(KeyEdit::DelayDown, sim),
            Key::Delete | Key::Backspace => self.delete_selection(sim),
            Key::R => {
                sim.rewind();
                log::info!("Simulation rewound");
            }
            Key::Escape => {
                if self.selection.is_none() {
                    return EditorAction::Quit;
                }
                self.deselect();
            }
            _ => {}
        }
        EditorAction::None
    }

    fn press(&mut self, pos: Vec2, sim: &mut Simulation) {
        self.gesture = None;
        let Some((entity, handle)) = sim.pick(pos) else {
            self.selection = None;
            return;
        };
        self.selection = Some(entity);
        let Some(editable) = sim.editable_mut(entity) else {
            return;
        };
        self.gesture = Some(Gesture {
            entity,
            handle,
            offset: editable.grab_offset(handle, pos),
            snapshot: editable.params(),
            recorded: false,
        });
    }

    fn drag(&mut self, pos: Vec2, sim: &mut Simulation) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        let Some(editable) = sim.editable_mut(gesture.entity) else {
            self.gesture = None;
            return;
        };
        if let Err(e) = editable.drag_to(gesture.handle, pos + gesture.offset) {
            log::warn!("Drag of {:?} rejected: {}", gesture.entity, e);
            return;
        }
        let changed = editable.params() != gesture.snapshot;
        if !gesture.recorded && changed {
            self.history.record_modify(gesture.entity, gesture.snapshot, sim);
            gesture.recorded = true;
        }
    }

    fn key_edit(&mut self, edit: KeyEdit, sim: &mut Simulation) {
        let Some(id) = self.selection else {
            return;
        };
        let Some(editable) = sim.editable_mut(id) else {
            return;
        };
        let before = editable.params();
        let edited = editable.key_edit(edit, &self.defaults);
        match edited {
            Ok(true) => self.history.record_modify(id, before, sim),
            Ok(false) => {}
            Err(e) => log::warn!("Key edit of {:?} rejected: {}", id, e),
        }
    }

    fn add_airplane(&mut self, sim: &mut Simulation) {
        let params = AirplaneParams::new(
            self.cursor,
            sim.viewport().center(),
            self.defaults.airplane_speed,
            self.defaults.airplane_delay,
        );
        let id = EntityId::Airplane(sim.add_airplane(params));
        self.created(id, sim);
    }

    fn add_tower(&mut self, sim: &mut Simulation) {
        let params = TowerParams::new(self.cursor, self.defaults.tower_radius);
        let id = EntityId::Tower(sim.add_tower(params));
        self.created(id, sim);
    }

    fn created(&mut self, id: EntityId, sim: &mut Simulation) {
        log::debug!("Created {:?}", id);
        self.history.record_add(id, sim);
        self.gesture = None;
        self.selection = Some(id);
    }

    fn delete_selection(&mut self, sim: &mut Simulation) {
        let Some(id) = self.selection.take() else {
            return;
        };
        self.gesture = None;
        if sim.remove(id) {
            log::debug!("Deleted {:?}", id);
            self.history.record_delete(id, sim);
        }
    }

    fn deselect(&mut self) {
        self.selection = None;
        self.gesture = None;
    }

    pub fn undo(&mut self, sim: &mut Simulation) {
        let replay = self.history.undo(sim);
        self.apply_replay(replay);
    }

    pub fn redo(&mut self, sim: &mut Simulation) {
        let replay = self.history.redo(sim);
        self.apply_replay(replay);
    }

    fn apply_replay(&mut self, replay: Replay) {
        self.gesture = None;
        match replay {
            Replay::Empty => {}
            Replay::Select(id) => self.selection = Some(id),
            Replay::Deselect(id) => {
                if self.selection == Some(id) {
                    self.selection = None;
                }
            }
        }
    }
}

//! Shared entity vocabulary
//!
//! Both entity kinds exist in a `Plain` flavour (simulation only) and an
//! `Editable` flavour (editor sessions). Editor code reaches the editing
//! surface through `dyn Editable`, which only editable entities hand out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::airplane::AirplaneParams;
use super::tower::TowerParams;
use crate::error::EditError;
use crate::settings::EditorDefaults;

pub type AirplaneId = u32;
pub type TowerId = u32;

/// Reference to an entity of either kind (non-owning)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityId {
    Airplane(AirplaneId),
    Tower(TowerId),
}

/// Full parameter tuple of an entity, enough to restore it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityParams {
    Airplane(AirplaneParams),
    Tower(TowerParams),
}

/// Whether an entity accepts edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Capability {
    #[default]
    Plain,
    Editable,
}

/// Part of an entity grabbed by a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Airplane body: moves the departure point
    Departure,
    /// Airplane arrival marker
    Arrival,
    /// Tower inside: moves the tower
    Center,
    /// Tower rim: resizes the area
    Rim,
}

/// Discrete keyboard edit applied to the selected entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdit {
    /// Airplane speed or tower radius up
    Increase,
    /// Airplane speed or tower radius down
    Decrease,
    DelayUp,
    DelayDown,
}

/// Editing surface shared by airplanes and towers
pub trait Editable {
    fn entity_id(&self) -> EntityId;

    /// Snapshot of the current parameters
    fn params(&self) -> EntityParams;

    /// Replace every parameter at once
    fn restore(&mut self, params: EntityParams) -> Result<(), EditError>;

    /// Handle under `pos`, if any
    fn grab(&self, pos: Vec2) -> Option<Handle>;

    /// Offset from the press position to the point the handle controls
    fn grab_offset(&self, handle: Handle, press: Vec2) -> Vec2;

    /// Move the point controlled by `handle` to `target`
    fn drag_to(&mut self, handle: Handle, target: Vec2) -> Result<(), EditError>;

    /// Apply a key edit; returns false when the edit does not apply to this kind
    fn key_edit(&mut self, edit: KeyEdit, defaults: &EditorDefaults) -> Result<bool, EditError>;
}

pub(crate) fn require_editable(capability: Capability) -> Result<(), EditError> {
    match capability {
        Capability::Editable => Ok(()),
        Capability::Plain => Err(EditError::InvalidOperation("entity is not editable")),
    }
}

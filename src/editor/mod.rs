//! Script editor
//!
//! - `history`: undoable command stacks
//! - `input`: normalized input events
//! - `router`: selection, gestures and key edits

pub mod history;
pub mod input;
pub mod router;

pub use history::{Command, History, Replay};
pub use input::{HeldButtons, InputEvent, Key, Modifiers, MouseButton};
pub use router::{Editor, EditorAction};

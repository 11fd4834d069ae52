//! Script persistence
//!
//! Maps are stored as `.rdr` text scripts, one entity per line:
//! - `A dx dy ax ay speed delay` for an airplane
//! - `T cx cy radius` for a tower

pub mod script;

pub use script::{EXTENSION, Script, check_extension, load, load_or_empty, parse, render, save};

//! Deterministic simulation module
//!
//! All air traffic logic lives here. This module must stay deterministic:
//! - Fixed 10 ms sub-steps only
//! - Stable iteration order (by entity ID)
//! - No platform dependencies; drawing goes through `renderer::Surface`

pub mod airplane;
pub mod collision;
pub mod entity;
pub mod group;
pub mod hitbox;
pub mod occupancy;
pub mod state;
pub mod tick;
pub mod tower;

pub use airplane::{Airplane, AirplaneParams, FlightStatus};
pub use collision::{circle_contains, interval_gap, polygons_intersect, sat_overlap};
pub use entity::{
    AirplaneId, Capability, Editable, EntityId, EntityParams, Handle, KeyEdit, TowerId,
};
pub use group::{Group, Member};
pub use hitbox::Hitbox;
pub use occupancy::Occupancy;
pub use state::{SimEvent, SimMode, Simulation};
pub use tick::{SimClock, advance, step};
pub use tower::{Tower, TowerParams, wrapped_areas};

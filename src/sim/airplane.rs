//! Airplane state machine
//!
//! `Waiting -> Flying -> {Landed | Destroyed}`. Takeoff happens once the
//! simulation clock reaches the delay; from then on the airplane moves by its
//! direction vector once per fixed sub-step until it is within one step of
//! its arrival.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{
    AirplaneId, Capability, Editable, EntityId, EntityParams, Handle, KeyEdit, require_editable,
};
use super::hitbox::Hitbox;
use crate::consts::{AIRPLANE_HALF_EXTENTS, AIRPLANE_SIZE, ARRIVAL_HANDLE_RADIUS, STEP_SECONDS};
use crate::error::EditError;
use crate::renderer::{Sprite, Surface, colors};
use crate::settings::{EditorDefaults, RenderConfig};
use crate::{heading_deg, scale_to_length};

/// Script parameters of an airplane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirplaneParams {
    pub departure: Vec2,
    pub arrival: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// Seconds before takeoff
    pub delay: f32,
}

impl AirplaneParams {
    /// Number of numeric fields on a script line
    pub const FIELD_COUNT: usize = 6;

    pub fn new(departure: Vec2, arrival: Vec2, speed: f32, delay: f32) -> Self {
        Self {
            departure,
            arrival,
            speed,
            delay,
        }
    }

    /// `departure x/y, arrival x/y, speed, delay`
    pub fn from_fields(fields: [f32; 6]) -> Self {
        let [dx, dy, ax, ay, speed, delay] = fields;
        Self::new(Vec2::new(dx, dy), Vec2::new(ax, ay), speed, delay)
    }

    pub fn to_fields(&self) -> [f32; 6] {
        [
            self.departure.x,
            self.departure.y,
            self.arrival.x,
            self.arrival.y,
            self.speed,
            self.delay,
        ]
    }

    /// Straight-line route length
    pub fn distance(&self) -> f32 {
        self.departure.distance(self.arrival)
    }
}

/// Flight progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightStatus {
    /// On the ground until the delay elapses
    Waiting,
    Flying,
    Landed,
    Destroyed,
}

impl FlightStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, FlightStatus::Landed | FlightStatus::Destroyed)
    }
}

/// An airplane entity
#[derive(Debug, Clone)]
pub struct Airplane {
    id: AirplaneId,
    params: AirplaneParams,
    capability: Capability,
    status: FlightStatus,
    center: Vec2,
    /// Per sub-step displacement, `speed * STEP_SECONDS` long
    direction: Vec2,
    /// Heading in screen degrees
    angle: f32,
    hitbox: Hitbox,
}

impl Airplane {
    pub fn new(id: AirplaneId, params: AirplaneParams, capability: Capability) -> Self {
        let mut airplane = Self {
            id,
            params,
            capability,
            status: FlightStatus::Waiting,
            center: params.departure,
            direction: Vec2::ZERO,
            angle: 0.0,
            hitbox: Hitbox::build(params.departure, AIRPLANE_HALF_EXTENTS, 0.0),
        };
        airplane.recompute_route();
        airplane
    }

    pub fn id(&self) -> AirplaneId {
        self.id
    }

    pub fn params(&self) -> AirplaneParams {
        self.params
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    pub fn taken_off(&self) -> bool {
        self.status != FlightStatus::Waiting
    }

    pub fn landed(&self) -> bool {
        self.status == FlightStatus::Landed
    }

    pub fn destroyed(&self) -> bool {
        self.status == FlightStatus::Destroyed
    }

    pub fn is_flying(&self) -> bool {
        self.status == FlightStatus::Flying
    }

    /// Advance the state machine by one sub-step at simulation time `elapsed`
    /// (seconds). Returns the new status when a transition happened.
    pub fn update(&mut self, elapsed: f32) -> Option<FlightStatus> {
        match self.status {
            FlightStatus::Waiting => {
                if self.params.delay <= 0.0 || elapsed >= self.params.delay {
                    self.status = FlightStatus::Flying;
                    return Some(FlightStatus::Flying);
                }
                None
            }
            FlightStatus::Flying => {
                let distance = self.center.distance(self.params.arrival);
                if distance > self.direction.length() {
                    self.center += self.direction;
                    self.rebuild_hitbox();
                    None
                } else {
                    self.status = FlightStatus::Landed;
                    Some(FlightStatus::Landed)
                }
            }
            FlightStatus::Landed | FlightStatus::Destroyed => None,
        }
    }

    /// Force the terminal `Destroyed` state. Returns false when already terminal.
    pub fn destroy(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = FlightStatus::Destroyed;
        true
    }

    /// Put the airplane back on the ground at its departure
    pub fn reset(&mut self) {
        self.status = FlightStatus::Waiting;
        self.center = self.params.departure;
        self.rebuild_hitbox();
    }

    pub fn set_departure(&mut self, departure: Vec2) -> Result<(), EditError> {
        require_editable(self.capability)?;
        self.params.departure = departure;
        self.after_edit();
        Ok(())
    }

    pub fn set_arrival(&mut self, arrival: Vec2) -> Result<(), EditError> {
        require_editable(self.capability)?;
        self.params.arrival = arrival;
        self.after_edit();
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), EditError> {
        require_editable(self.capability)?;
        self.params.speed = speed.max(0.0);
        self.after_edit();
        Ok(())
    }

    pub fn set_delay(&mut self, delay: f32) -> Result<(), EditError> {
        require_editable(self.capability)?;
        self.params.delay = delay.max(0.0);
        self.after_edit();
        Ok(())
    }

    pub fn set_params(&mut self, params: AirplaneParams) -> Result<(), EditError> {
        require_editable(self.capability)?;
        self.params = params;
        self.after_edit();
        Ok(())
    }

    /// Editing surface, only for editable airplanes
    pub fn as_editable_mut(&mut self) -> Option<&mut dyn Editable> {
        match self.capability {
            Capability::Editable => Some(self),
            Capability::Plain => None,
        }
    }

    /// Whether `pos` is over the arrival marker
    pub fn near_arrival(&self, pos: Vec2) -> bool {
        self.params.arrival.distance(pos) <= ARRIVAL_HANDLE_RADIUS
    }

    pub fn draw(&self, surface: &mut dyn Surface, config: &RenderConfig) {
        if config.show_sprites {
            surface.draw_sprite(Sprite::Airplane, self.center, self.angle, AIRPLANE_SIZE);
        }
        if config.show_hitboxes {
            surface.draw_polygon(&self.hitbox.points, colors::HITBOX);
        }
    }

    /// Route line and arrival marker, drawn in editor sessions
    pub fn draw_route(&self, surface: &mut dyn Surface) {
        surface.draw_line(self.params.departure, self.params.arrival, colors::ROUTE);
        surface.draw_circle(self.params.arrival, ARRIVAL_HANDLE_RADIUS, colors::ROUTE);
    }

    fn after_edit(&mut self) {
        self.recompute_route();
        self.reset();
    }

    fn recompute_route(&mut self) {
        let route = self.params.arrival - self.params.departure;
        self.direction = scale_to_length(route, self.params.speed * STEP_SECONDS);
        self.angle = if route == Vec2::ZERO { 0.0 } else { heading_deg(route) };
        self.rebuild_hitbox();
    }

    fn rebuild_hitbox(&mut self) {
        self.hitbox = Hitbox::build(self.center, AIRPLANE_HALF_EXTENTS, self.angle);
    }
}

impl Editable for Airplane {
    fn entity_id(&self) -> EntityId {
        EntityId::Airplane(self.id)
    }

    fn params(&self) -> EntityParams {
        EntityParams::Airplane(self.params)
    }

    fn restore(&mut self, params: EntityParams) -> Result<(), EditError> {
        match params {
            EntityParams::Airplane(params) => self.set_params(params),
            EntityParams::Tower(_) => Err(EditError::InvalidOperation(
                "tower parameters applied to an airplane",
            )),
        }
    }

    fn grab(&self, pos: Vec2) -> Option<Handle> {
        if self.near_arrival(pos) {
            Some(Handle::Arrival)
        } else if self.hitbox.contains_point(pos) {
            Some(Handle::Departure)
        } else {
            None
        }
    }

    fn grab_offset(&self, handle: Handle, press: Vec2) -> Vec2 {
        match handle {
            Handle::Arrival => self.params.arrival - press,
            _ => self.params.departure - press,
        }
    }

    fn drag_to(&mut self, handle: Handle, target: Vec2) -> Result<(), EditError> {
        match handle {
            Handle::Departure => self.set_departure(target),
            Handle::Arrival => self.set_arrival(target),
            Handle::Center | Handle::Rim => {
                Err(EditError::InvalidOperation("airplanes have no tower handles"))
            }
        }
    }

    fn key_edit(&mut self, edit: KeyEdit, defaults: &EditorDefaults) -> Result<bool, EditError> {
        let params = self.params;
        match edit {
            KeyEdit::Increase => self.set_speed(params.speed + defaults.speed_step)?,
            KeyEdit::Decrease => self.set_speed(params.speed - defaults.speed_step)?,
            KeyEdit::DelayUp => self.set_delay(params.delay + defaults.delay_step)?,
            KeyEdit::DelayDown => self.set_delay(params.delay - defaults.delay_step)?,
        }
        Ok(self.params != params)
    }
}

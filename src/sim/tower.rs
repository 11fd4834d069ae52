//! Control towers
//!
//! A tower is a static circular control area. When the circle crosses a map
//! edge the area continues on the opposite edge, so the tower keeps one extra
//! copy of its circle per crossed edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::airplane::Airplane;
use super::collision::circle_contains;
use super::entity::{
    AirplaneId, Capability, Editable, EntityId, EntityParams, Handle, KeyEdit, TowerId,
    require_editable,
};
use super::occupancy::Occupancy;
use crate::consts::{MIN_TOWER_RADIUS, TOWER_RIM_TOLERANCE};
use crate::error::EditError;
use crate::renderer::{Sprite, Surface, colors};
use crate::settings::{EditorDefaults, RenderConfig, Viewport};

/// Tower sprite size in pixels
const TOWER_SPRITE_SIZE: Vec2 = Vec2::new(24.0, 32.0);

/// Script parameters of a tower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerParams {
    pub center: Vec2,
    pub radius: f32,
}

impl TowerParams {
    /// Number of numeric fields on a script line
    pub const FIELD_COUNT: usize = 3;

    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// `center x/y, radius`
    pub fn from_fields(fields: [f32; 3]) -> Self {
        let [x, y, radius] = fields;
        Self::new(Vec2::new(x, y), radius)
    }

    pub fn to_fields(&self) -> [f32; 3] {
        [self.center.x, self.center.y, self.radius]
    }
}

/// Centers of the primary area plus one wrapped copy per crossed map edge
pub fn wrapped_areas(center: Vec2, radius: f32, viewport: &Viewport) -> Vec<Vec2> {
    let mut areas = Vec::with_capacity(5);
    areas.push(center);
    if center.x - radius < 0.0 {
        areas.push(Vec2::new(center.x + viewport.width, center.y));
    }
    if center.x + radius > viewport.width {
        areas.push(Vec2::new(center.x - viewport.width, center.y));
    }
    if center.y - radius < 0.0 {
        areas.push(Vec2::new(center.x, center.y + viewport.height));
    }
    if center.y + radius > viewport.height {
        areas.push(Vec2::new(center.x, center.y - viewport.height));
    }
    areas
}

/// A tower entity
#[derive(Debug, Clone)]
pub struct Tower {
    id: TowerId,
    params: TowerParams,
    capability: Capability,
    viewport: Viewport,
    /// Primary circle first
    areas: Vec<Vec2>,
}

impl Tower {
    pub fn new(
        id: TowerId,
        params: TowerParams,
        capability: Capability,
        viewport: Viewport,
    ) -> Self {
        let mut tower = Self {
            id,
            params,
            capability,
            viewport,
            areas: Vec::new(),
        };
        tower.recompute_areas();
        tower
    }

    pub fn id(&self) -> TowerId {
        self.id
    }

    pub fn params(&self) -> TowerParams {
        self.params
    }

    pub fn center(&self) -> Vec2 {
        self.params.center
    }

    pub fn radius(&self) -> f32 {
        self.params.radius
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Area circle centers, primary first
    pub fn areas(&self) -> &[Vec2] {
        &self.areas
    }

    /// Whether `point` is inside any of the area circles
    pub fn area_contains(&self, point: Vec2) -> bool {
        self.areas
            .iter()
            .any(|center| circle_contains(*center, self.params.radius, point))
    }

    pub fn airplane_in_area(&self, airplane: &Airplane) -> bool {
        self.area_contains(airplane.center())
    }

    /// Refresh this tower's membership against the airplane set.
    ///
    /// Flying airplanes are added or removed depending on their position;
    /// grounded ones are dropped from the set. Returns `(airplane, entered)`
    /// for every membership change.
    pub fn update<'a>(
        &self,
        airplanes: impl IntoIterator<Item = &'a Airplane>,
        occupancy: &mut Occupancy,
    ) -> Vec<(AirplaneId, bool)> {
        let mut changes = Vec::new();
        for airplane in airplanes {
            if airplane.is_flying() && self.airplane_in_area(airplane) {
                if occupancy.insert(airplane.id(), self.id) {
                    changes.push((airplane.id(), true));
                }
            } else if occupancy.remove(airplane.id(), self.id) {
                changes.push((airplane.id(), false));
            }
        }
        changes
    }

    /// Follow a resized map
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.recompute_areas();
    }

    pub fn set_center(&mut self, center: Vec2) -> Result<(), EditError> {
        require_editable(self.capability)?;
        self.params.center = center;
        self.recompute_areas();
        Ok(())
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<(), EditError> {
        require_editable(self.capability)?;
        self.params.radius = radius.max(MIN_TOWER_RADIUS);
        self.recompute_areas();
        Ok(())
    }

    pub fn set_params(&mut self, params: TowerParams) -> Result<(), EditError> {
        require_editable(self.capability)?;
        self.params = params;
        self.recompute_areas();
        Ok(())
    }

    /// Editing surface, only for editable towers
    pub fn as_editable_mut(&mut self) -> Option<&mut dyn Editable> {
        match self.capability {
            Capability::Editable => Some(self),
            Capability::Plain => None,
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, config: &RenderConfig) {
        if config.show_sprites {
            surface.draw_sprite(Sprite::Tower, self.params.center, 0.0, TOWER_SPRITE_SIZE);
        }
        if config.show_hitboxes {
            for center in &self.areas {
                surface.draw_circle(*center, self.params.radius, colors::TOWER_AREA);
            }
        }
    }

    fn recompute_areas(&mut self) {
        self.areas = wrapped_areas(self.params.center, self.params.radius, &self.viewport);
    }
}

impl Editable for Tower {
    fn entity_id(&self) -> EntityId {
        EntityId::Tower(self.id)
    }

    fn params(&self) -> EntityParams {
        EntityParams::Tower(self.params)
    }

    fn restore(&mut self, params: EntityParams) -> Result<(), EditError> {
        match params {
            EntityParams::Tower(params) => self.set_params(params),
            EntityParams::Airplane(_) => Err(EditError::InvalidOperation(
                "airplane parameters applied to a tower",
            )),
        }
    }

    fn grab(&self, pos: Vec2) -> Option<Handle> {
        let distance = self.params.center.distance(pos);
        if (distance - self.params.radius).abs() <= TOWER_RIM_TOLERANCE {
            Some(Handle::Rim)
        } else if distance < self.params.radius {
            Some(Handle::Center)
        } else {
            None
        }
    }

    fn grab_offset(&self, handle: Handle, press: Vec2) -> Vec2 {
        match handle {
            Handle::Rim => Vec2::ZERO,
            _ => self.params.center - press,
        }
    }

    fn drag_to(&mut self, handle: Handle, target: Vec2) -> Result<(), EditError> {
        match handle {
            Handle::Center => self.set_center(target),
            Handle::Rim => self.set_radius(self.params.center.distance(target)),
            Handle::Departure | Handle::Arrival => {
                Err(EditError::InvalidOperation("towers have no airplane handles"))
            }
        }
    }

    fn key_edit(&mut self, edit: KeyEdit, defaults: &EditorDefaults) -> Result<bool, EditError> {
        let radius = self.params.radius;
        match edit {
            KeyEdit::Increase => self.set_radius(radius + defaults.radius_step)?,
            KeyEdit::Decrease => self.set_radius(radius - defaults.radius_step)?,
            KeyEdit::DelayUp | KeyEdit::DelayDown => return Ok(false),
        }
        Ok(self.params.radius != radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::airplane::AirplaneParams;

    fn small_map() -> Viewport {
        Viewport::new(200.0, 200.0)
    }

    fn flying_at(id: AirplaneId, pos: Vec2) -> Airplane {
        let mut airplane = Airplane::new(
            id,
            AirplaneParams::new(pos, pos + Vec2::new(0.0, 500.0), 1.0, 0.0),
            Capability::Plain,
        );
        airplane.update(0.0);
        airplane
    }

    #[test]
    fn test_no_wrap_inside_map() {
        let tower = Tower::new(
            1,
            TowerParams::new(Vec2::new(100.0, 100.0), 20.0),
            Capability::Plain,
            small_map(),
        );
        assert_eq!(tower.areas().len(), 1);
    }

    #[test]
    fn test_wrap_counts() {
        let map = small_map();
        assert_eq!(wrapped_areas(Vec2::new(5.0, 100.0), 20.0, &map).len(), 2);
        assert_eq!(wrapped_areas(Vec2::new(5.0, 5.0), 20.0, &map).len(), 3);
        // Larger than the map on both axes: all four edges crossed
        assert_eq!(wrapped_areas(Vec2::new(100.0, 100.0), 150.0, &map).len(), 5);
    }

    #[test]
    fn test_moved_tower_wraps_across_edge() {
        let mut tower = Tower::new(
            1,
            TowerParams::new(Vec2::new(100.0, 100.0), 20.0),
            Capability::Editable,
            small_map(),
        );
        let airplane = flying_at(2, Vec2::new(195.0, 100.0));
        assert!(!tower.airplane_in_area(&airplane));

        tower.set_center(Vec2::new(5.0, 100.0)).unwrap();
        assert_eq!(tower.areas().len(), 2);
        assert_eq!(tower.areas()[1], Vec2::new(205.0, 100.0));
        assert!(tower.airplane_in_area(&airplane));
    }

    #[test]
    fn test_viewport_change_regenerates_areas() {
        let mut tower = Tower::new(
            1,
            TowerParams::new(Vec2::new(190.0, 100.0), 20.0),
            Capability::Plain,
            small_map(),
        );
        assert_eq!(tower.areas().len(), 2);
        tower.set_viewport(Viewport::new(400.0, 200.0));
        assert_eq!(tower.areas().len(), 1);
    }

    #[test]
    fn test_update_tracks_membership() {
        let tower = Tower::new(
            9,
            TowerParams::new(Vec2::new(100.0, 100.0), 50.0),
            Capability::Plain,
            small_map(),
        );
        let inside = flying_at(1, Vec2::new(110.0, 100.0));
        let outside = flying_at(2, Vec2::new(10.0, 10.0));
        let mut occupancy = Occupancy::default();

        let changes = tower.update([&inside, &outside], &mut occupancy);
        assert_eq!(changes, vec![(1, true)]);
        assert!(occupancy.in_tower_area(1));
        assert!(!occupancy.in_tower_area(2));

        // Removing an airplane that was never inside is tolerated
        let mut grounded = inside.clone();
        grounded.destroy();
        let changes = tower.update([&grounded, &outside], &mut occupancy);
        assert_eq!(changes, vec![(1, false)]);
        assert!(!occupancy.in_tower_area(1));
    }

    #[test]
    fn test_plain_tower_rejects_edits() {
        let mut tower = Tower::new(
            1,
            TowerParams::new(Vec2::ZERO, 10.0),
            Capability::Plain,
            small_map(),
        );
        assert!(tower.set_radius(20.0).is_err());
        assert!(tower.as_editable_mut().is_none());
    }

    #[test]
    fn test_grab_and_resize() {
        let mut tower = Tower::new(
            1,
            TowerParams::new(Vec2::new(100.0, 100.0), 50.0),
            Capability::Editable,
            small_map(),
        );
        assert_eq!(tower.grab(Vec2::new(148.0, 100.0)), Some(Handle::Rim));
        assert_eq!(tower.grab(Vec2::new(110.0, 100.0)), Some(Handle::Center));
        assert_eq!(tower.grab(Vec2::new(180.0, 100.0)), None);

        tower.drag_to(Handle::Rim, Vec2::new(100.0, 170.0)).unwrap();
        assert_eq!(tower.radius(), 70.0);
        assert!(tower.key_edit(KeyEdit::Increase, &EditorDefaults::default()).unwrap());
        assert_eq!(tower.radius(), 80.0);
        assert!(!tower.key_edit(KeyEdit::DelayUp, &EditorDefaults::default()).unwrap());
    }
}

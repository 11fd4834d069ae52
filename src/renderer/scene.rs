//! Scene drawing
//!
//! Order: towers, then airplanes, then the entity under active interaction
//! so it stays on top.

use super::{Surface, colors};
use crate::settings::RenderConfig;
use crate::sim::{EntityId, SimMode, Simulation};

/// Draw the whole map. `active` is the entity being edited, if any.
pub fn draw_scene(
    sim: &Simulation,
    config: &RenderConfig,
    active: Option<EntityId>,
    surface: &mut dyn Surface,
) {
    let editor = sim.mode() == SimMode::Editor;

    for tower in sim.towers.iter() {
        if active != Some(EntityId::Tower(tower.id())) {
            tower.draw(surface, config);
        }
    }
    for airplane in sim.airplanes.iter() {
        if active == Some(EntityId::Airplane(airplane.id())) {
            continue;
        }
        if editor {
            airplane.draw_route(surface);
            airplane.draw(surface, config);
        } else if airplane.is_flying() {
            airplane.draw(surface, config);
        }
    }

    match active {
        Some(EntityId::Tower(id)) => {
            if let Some(tower) = sim.towers.get(id) {
                tower.draw(surface, config);
                surface.draw_circle(tower.center(), tower.radius(), colors::SELECTION);
            }
        }
        Some(EntityId::Airplane(id)) => {
            if let Some(airplane) = sim.airplanes.get(id) {
                if editor {
                    airplane.draw_route(surface);
                }
                if editor || airplane.is_flying() {
                    airplane.draw(surface, config);
                    surface.draw_polygon(&airplane.hitbox().points, colors::SELECTION);
                }
            }
        }
        None => {}
    }
}

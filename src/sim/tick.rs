//! Fixed timestep simulation tick
//!
//! Frame deltas are accumulated and consumed in 10 ms sub-steps, so motion is
//! independent of the render framerate. Each sub-step runs, in order:
//! airplane state machines, tower occupancy, collision detection, retirement.

use super::state::{SimEvent, SimMode, Simulation};
use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS_PER_FRAME, STEP_SECONDS, STEPS_PER_SECOND};

/// Accumulated-delta simulation clock
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Sub-steps run so far
    pub ticks: u64,
    /// Unconsumed frame time (seconds)
    accumulator: f32,
    paused: bool,
}

impl SimClock {
    /// Simulated seconds at the start of the next sub-step
    pub fn elapsed_seconds(&self) -> f32 {
        self.ticks as f32 / STEPS_PER_SECOND as f32
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.accumulator = 0.0;
        }
    }

    /// Flip pause, returning the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
        self.accumulator = 0.0;
    }
}

/// Run one fixed sub-step
pub fn step(sim: &mut Simulation) -> Vec<SimEvent> {
    let elapsed = sim.clock.elapsed_seconds();
    let mut events = sim.airplanes.advance(elapsed);

    // Occupancy first: collision eligibility depends on this sub-step's areas
    for tower in sim.towers.iter() {
        for (airplane, entered) in tower.update(sim.airplanes.iter(), &mut sim.occupancy) {
            events.push(if entered {
                SimEvent::EnteredArea {
                    airplane,
                    tower: tower.id(),
                }
            } else {
                SimEvent::LeftArea {
                    airplane,
                    tower: tower.id(),
                }
            });
        }
    }

    events.extend(sim.airplanes.check_collisions(&sim.occupancy));

    if sim.mode() == SimMode::Play {
        for id in sim.airplanes.retire_finished() {
            sim.occupancy.forget_airplane(id);
        }
    }

    sim.clock.ticks += 1;
    for event in &events {
        log::debug!("t={:.2}s {:?}", elapsed, event);
    }
    events
}

/// Feed one frame delta (seconds) to the clock and run the due sub-steps
pub fn advance(sim: &mut Simulation, frame_dt: f32) -> Vec<SimEvent> {
    if sim.clock.paused {
        return Vec::new();
    }
    sim.clock.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DELTA);

    let mut events = Vec::new();
    let mut substeps = 0;
    while sim.clock.accumulator >= STEP_SECONDS && substeps < MAX_SUBSTEPS_PER_FRAME {
        events.extend(step(sim));
        sim.clock.accumulator -= STEP_SECONDS;
        substeps += 1;
    }
    // Drop the backlog instead of spiralling
    if substeps == MAX_SUBSTEPS_PER_FRAME {
        sim.clock.accumulator = sim.clock.accumulator.min(STEP_SECONDS);
    }
    events
}

//! My Radar - headless runner
//!
//! Plays a script to completion, or replays recorded editor input against it.
//! Every frame is drawn into a recording surface in place of a window.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use my_radar::editor::InputEvent;
use my_radar::renderer::RecordingSurface;
use my_radar::settings::SettingsError;
use my_radar::sim::SimEvent;
use my_radar::{ScriptError, Session, SessionMode, Settings};

/// Exit status of every fatal error
const EXIT_FAILURE: u8 = 84;
/// Simulated frame length of the headless loop
const FRAME_SECONDS: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "my-radar")]
#[command(about = "Air traffic simulation panel with a script editor")]
struct Args {
    /// Script to run (`.rdr`)
    script: PathBuf,

    /// Open the script in the editor (the file may not exist yet)
    #[arg(short, long)]
    editor: bool,

    /// Settings file (JSON); defaults are used when absent
    #[arg(long, default_value = "my_radar.json")]
    settings: PathBuf,

    /// Stop after this many simulated seconds
    #[arg(long, default_value = "120")]
    seconds: f32,

    /// Editor input events to replay (JSON array)
    #[arg(long)]
    events: Option<PathBuf>,

    /// Save the script once the editor replay is done
    #[arg(long)]
    save: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("can't read events file '{}': {source}", path.display())]
    Events {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid events file: {0}")]
    EventsFormat(#[from] serde_json::Error),
    #[error("could not save '{}'", .0.display())]
    Save(PathBuf),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Script(e) => e.kind(),
            AppError::Settings(_) => "SettingsError",
            AppError::Events { .. } | AppError::Save(_) => "IOError",
            AppError::EventsFormat(_) => "EventsError",
        }
    }
}

#[derive(Debug, Default)]
struct Summary {
    took_off: usize,
    landed: usize,
    destroyed: usize,
    frames: usize,
    draw_calls: usize,
}

impl Summary {
    fn record(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::TookOff(_) => self.took_off += 1,
                SimEvent::Landed(_) => self.landed += 1,
                SimEvent::Destroyed(_) => self.destroyed += 1,
                _ => {}
            }
        }
    }

    fn draw(&mut self, session: &Session, surface: &mut RecordingSurface) {
        surface.clear();
        session.draw(surface);
        self.frames += 1;
        self.draw_calls += surface.commands.len();
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}: {}", e.kind(), e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let settings = Settings::load(&args.settings)?;
    let mode = if args.editor {
        SessionMode::Editor
    } else {
        SessionMode::Play
    };
    let mut session = Session::open(&args.script, mode, &settings)?;

    match mode {
        SessionMode::Play => play(&mut session, args.seconds),
        SessionMode::Editor => edit(&mut session, args),
    }
}

fn play(session: &mut Session, seconds: f32) -> Result<(), AppError> {
    let mut summary = Summary::default();
    let mut surface = RecordingSurface::new();
    while session.is_running() && !session.sim.is_finished() && session.sim.elapsed() < seconds {
        summary.record(&session.update(FRAME_SECONDS));
        summary.draw(session, &mut surface);
    }
    println!(
        "{:.2}s: {} took off, {} landed, {} destroyed, {} still in the air",
        session.sim.elapsed(),
        summary.took_off,
        summary.landed,
        summary.destroyed,
        session.sim.airplanes.len()
    );
    println!("{} frames, {} draw calls", summary.frames, summary.draw_calls);
    Ok(())
}

fn edit(session: &mut Session, args: &Args) -> Result<(), AppError> {
    let mut summary = Summary::default();
    let mut surface = RecordingSurface::new();
    if let Some(path) = &args.events {
        for event in read_events(path)? {
            session.handle_event(&event);
            if !session.is_running() {
                break;
            }
            session.update(FRAME_SECONDS);
            summary.draw(session, &mut surface);
        }
    }
    log::info!("Drew {} frames, {} draw calls", summary.frames, summary.draw_calls);

    if args.save && !session.save() {
        return Err(AppError::Save(session.path().to_path_buf()));
    }
    println!(
        "{}: {} airplanes, {} towers{}",
        session.path().display(),
        session.sim.airplanes.len(),
        session.sim.towers.len(),
        if session.is_modified() { " (unsaved changes)" } else { "" }
    );
    Ok(())
}

fn read_events(path: &Path) -> Result<Vec<InputEvent>, AppError> {
    let json = std::fs::read_to_string(path).map_err(|source| AppError::Events {
        path: path.to_path_buf(),
        source,
    })?;
    let events: Vec<InputEvent> = serde_json::from_str(&json)?;
    log::info!("Replaying {} input events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_frames_are_drawn() {
        let path = std::env::temp_dir().join(format!("my_radar_main_{}.rdr", std::process::id()));
        std::fs::write(&path, "A 10 10 60 10 50 0\nT 300 300 20\n").unwrap();
        let mut session = Session::open(&path, SessionMode::Play, &Settings::default()).unwrap();

        let mut summary = Summary::default();
        let mut surface = RecordingSurface::new();
        for _ in 0..3 {
            summary.record(&session.update(FRAME_SECONDS));
            summary.draw(&session, &mut surface);
        }
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.took_off, 1);
        // Surface only holds the last frame
        assert!(summary.draw_calls > surface.commands.len());
        assert!(surface.sprites().count() >= 2);
        let _ = std::fs::remove_file(&path);
    }
}

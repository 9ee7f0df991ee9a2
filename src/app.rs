//! Frame loop
//!
//! Owns a run from first frame to quit: measures wall-clock time, feeds it
//! to the simulation, draws, paces. Backends come in through the
//! [`Canvas`] and [`InputSource`] seams so the loop itself stays testable.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::assets::SpriteSheet;
use crate::render::{Canvas, draw_scene};
use crate::settings::Settings;
use crate::sim::state::{GameState, SimEvent};
use crate::sim::tick::{TickInput, tick};

/// Per-frame control state; `None` means quit
pub trait InputSource {
    fn poll(&mut self) -> io::Result<Option<TickInput>>;
}

/// What a finished run looked like
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub score: u32,
    pub final_speed: f32,
    pub frames: u64,
}

/// Drives one run of the game
pub struct App {
    state: GameState,
    sheet: SpriteSheet,
    frame_budget: Duration,
    show_hud: bool,
}

impl App {
    pub fn new(state: GameState, sheet: SpriteSheet, settings: &Settings) -> Self {
        Self {
            state,
            sheet,
            frame_budget: settings.frame_budget(),
            show_hud: settings.show_hud,
        }
    }

    /// Run until the input source reports quit
    pub fn run(
        &mut self,
        canvas: &mut impl Canvas,
        input: &mut impl InputSource,
    ) -> io::Result<RunSummary> {
        let mut frames: u64 = 0;
        let mut last = Instant::now();

        while let Some(tick_input) = input.poll()? {
            let now = Instant::now();
            let raw_dt = now.duration_since(last).as_secs_f32();
            last = now;

            for event in tick(&mut self.state, &tick_input, raw_dt) {
                match event {
                    SimEvent::GoalCollected { score } => {
                        log::info!("Goal collected, score {score}");
                    }
                    SimEvent::PlayerRecentered => log::debug!("Player recentered"),
                }
            }

            draw_scene(canvas, &self.state, &self.sheet);
            if self.show_hud {
                let slow = if tick_input.slow_motion { "  slow" } else { "" };
                canvas.status(&format!(
                    "score {}  speed {:.0}{slow}",
                    self.state.score,
                    self.state.clock.speed(),
                ));
            }
            canvas.present()?;
            frames += 1;

            let elapsed = now.elapsed();
            if elapsed < self.frame_budget {
                thread::sleep(self.frame_budget - elapsed);
            }
        }

        Ok(RunSummary {
            score: self.state.score,
            final_speed: self.state.clock.speed(),
            frames,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
}

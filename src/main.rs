//! Plummet entry point
//!
//! Wires settings, assets, the terminal backend and the frame loop
//! together, then prints how the run went once the terminal is restored.

use anyhow::Context;

use plummet::app::App;
use plummet::assets::load_animation_sheet;
use plummet::settings::Settings;
use plummet::sim::state::GameState;
use plummet::term::{TermCanvas, TermInput};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Plummet starting...");

    let settings = Settings::load();
    let (sheet, clips) = load_animation_sheet(
        &settings.sheet_path,
        &settings.descriptor_path,
        settings.frame_width,
    )
    .with_context(|| format!("loading sprite sheet {}", settings.sheet_path.display()))?;

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Game initialized with seed: {seed}");
    let state = GameState::new(seed, &clips).context("building the player animator")?;

    let mut app = App::new(state, sheet, &settings);
    let mut canvas = TermCanvas::new().context("entering raw mode")?;
    let mut input = TermInput::new(canvas.key_release_supported());

    let summary = app.run(&mut canvas, &mut input)?;
    drop(canvas);

    println!(
        "score {}  top speed {:.1}  ({} frames)",
        summary.score, summary.final_speed, summary.frames
    );
    Ok(())
}

//! Snowy castle viewer.
//!
//! Usage: `shatter [STONE_TEXTURE]`. The optional image recolours the castle
//! stone with its mean colour. Set `RUST_LOG=debug` to trace bursts.

use std::path::PathBuf;
use std::process::ExitCode;

use shatter::castle::{grand_castle, CastleStyle};
use shatter::spawn::SpawnContext;
use shatter::textures;
use shatter::Simulation;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let texture = std::env::args().nth(1).map(PathBuf::from);
    let mut style = CastleStyle::default();
    style.stone = textures::appearance_or(texture.as_deref(), style.stone);

    let mut ctx = SpawnContext::from_clock();
    let parts = grand_castle(&mut ctx, &style);

    match Simulation::new()
        .with_title("Shatter - Winter Castle")
        .with_parts(parts)
        .run()
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

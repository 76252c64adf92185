//! Narrow, lightly damped columns relaxing from random heights.

use ripples::prelude::*;

fn main() -> Result<(), SimulationError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    Ripples::preset(Preset::Plane).run().inspect_err(|e| log::error!("{}", e))
}

//! Wide columns at rest, excited by a two-period pulse from the right edge.

use ripples::prelude::*;

fn main() -> Result<(), SimulationError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    Ripples::preset(Preset::Pulse).run().inspect_err(|e| log::error!("{}", e))
}

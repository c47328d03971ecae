//! Backend: where frames come from and how the loop is paced.

pub mod replay;

pub use replay::ReplayConfig;

use crate::input::FrameSource;
use crate::render::Renderer;
use crate::state::HubState;

/// Run the hub over a frame source until it quits.
pub fn run(
    state: &mut HubState,
    source: &mut dyn FrameSource,
    renderer: &mut dyn Renderer,
    config: &ReplayConfig,
) -> anyhow::Result<()> {
    replay::run(state, source, renderer, config)
}

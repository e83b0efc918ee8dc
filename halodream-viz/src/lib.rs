//! Canvas effects for the halodream landing page
//!
//! The simulation modules are plain Rust and run natively, which is how the
//! CLI's `simulate` command and the tests use them. `canvas2d` and `mount`
//! bind them to the DOM through `wasm-bindgen`.

use wasm_bindgen::prelude::*;

pub mod accordion;
pub mod camera3d;
pub mod canvas2d;
pub mod color;
pub mod frame;
pub mod grid;
pub mod mount;
pub mod orbit;
pub mod particle_field;
pub mod pointer;
pub mod raster;
pub mod spotlight;

pub use color::Rgb;
pub use frame::{Animated, FrameClock, Viewport};
pub use grid::GridConfig;
pub use orbit::{PlanetConfig, SwarmConfig};
pub use particle_field::{ParticleField, ParticleFieldConfig, Preset};
pub use spotlight::SpotlightConfig;

/// Initialize WASM panic hook and route `tracing` events to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::try_set_as_global_default().ok();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_can_run_more_than_once() {
        super::init();
        super::init();
    }
}

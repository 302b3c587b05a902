mod app;
mod config;
mod driver;
mod error;
mod field;
mod frame;
mod input;
mod logging;
mod palette;
mod params;
mod pattern;
mod presets;
mod shaper;
mod stencil;
mod term;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}

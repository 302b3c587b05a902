use crate::field::{self, Seeding};
use crate::params::{Params, PatternKind, RenderMode, Species};
use crate::{palette, presets};
use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser, Debug, Clone)]
#[command(name = "morphogen")]
#[command(about = "Gray-Scott reaction-diffusion in the terminal")]
pub(crate) struct Args {
    /// Grid width in cells
    #[arg(long)]
    pub(crate) width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    pub(crate) height: Option<usize>,

    /// Preset name (tiger, leopard, coral, giraffe, waves, zebra, random)
    #[arg(long)]
    pub(crate) preset: Option<String>,

    /// Palette id (bw, sand, forest, coral, zebra, brown, leaf, psyche, ocean, ember)
    #[arg(long)]
    pub(crate) palette: Option<String>,

    #[arg(long, value_enum)]
    pub(crate) mode: Option<RenderMode>,

    /// Which species to draw
    #[arg(long, value_enum)]
    pub(crate) field: Option<Species>,

    /// Integrator steps per displayed frame
    #[arg(long)]
    pub(crate) steps: Option<u32>,

    /// Zoom percentage (160 = fit)
    #[arg(long)]
    pub(crate) zoom: Option<u32>,

    /// RNG seed for resets and the random preset
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Per-cell probability of randomising U and V on reset
    #[arg(long)]
    pub(crate) noise: Option<f32>,

    /// Random V splashes added on reset
    #[arg(long)]
    pub(crate) sprinkles: Option<usize>,

    /// Start on a procedural pattern instead of the simulation
    #[arg(long, value_enum)]
    pub(crate) pattern: Option<PatternKind>,

    #[arg(long, default_value_t = false)]
    pub(crate) invert: bool,

    /// Frame rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Run without a terminal
    #[arg(long, default_value_t = false)]
    pub(crate) headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 200)]
    pub(crate) frames: u32,

    /// PNG path for the last headless frame
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub(crate) log_level: tracing::Level,

    /// Do not write settings back on exit
    #[arg(long, default_value_t = false)]
    pub(crate) no_save: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) fps_cap: u32,
    pub(crate) seed: u64,
    /// Index into the preset catalog, or `None` for hand-tuned coefficients.
    pub(crate) preset: Option<usize>,
    pub(crate) params: Params,
    pub(crate) seeding: Seeding,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 480,
            height: 315,
            fps_cap: 30,
            seed: 0xC0FFEE_u64,
            preset: None,
            params: Params::default(),
            seeding: Seeding::default(),
        }
    }
}

impl Settings {
    /// Layers command-line overrides on top of stored settings.
    pub(crate) fn apply_args(&mut self, args: &Args) -> Result<()> {
        if let Some(w) = args.width {
            self.width = w;
        }
        if let Some(h) = args.height {
            self.height = h;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(name) = &args.preset {
            let (idx, preset) = presets::lookup(name)?;
            let mut rng = StdRng::seed_from_u64(self.seed);
            self.preset = Some(idx);
            self.params.sim.coeffs = preset.resolve(&mut rng);
        }
        if let Some(id) = &args.palette {
            palette::lookup(id)?;
            self.params.render.palette = id.clone();
        }
        if let Some(mode) = args.mode {
            self.params.render.mode = mode;
        }
        if let Some(field) = args.field {
            self.params.render.field = field;
        }
        if let Some(steps) = args.steps {
            self.params.sim.steps_per_frame = steps;
        }
        if let Some(zoom) = args.zoom {
            self.params.sim.zoom_percent = zoom;
        }
        if let Some(noise) = args.noise {
            self.seeding.noise = noise;
        }
        if let Some(sprinkles) = args.sprinkles {
            self.seeding.sprinkles = sprinkles;
        }
        if args.invert {
            self.params.render.invert = true;
        }
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        field::cell_count(self.width, self.height)?;
        self.params.validate()?;
        self.seeding.validate()?;
        Ok(())
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "morphogen", "Morphogen")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("morphogen.log"),
    })
}

/// Stored settings, or defaults when the file is missing or unreadable.
pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
        tracing::warn!(path = %path.display(), "ignoring unreadable settings file");
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing fails on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("morphogen-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let path = scratch("round_trip.json");
        let mut s = Settings::default();
        s.params.render.palette = "leaf".to_string();
        s.params.sim.steps_per_frame = 9;
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let path = scratch("corrupt.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let path = scratch("partial.json");
        fs::write(&path, r#"{ "fps_cap": 12 }"#).unwrap();
        let s = load_settings(&path);
        assert_eq!(s.fps_cap, 12);
        assert_eq!(s.width, 480);
    }

    #[test]
    fn args_override_settings() {
        let args = Args::parse_from([
            "morphogen",
            "--preset",
            "zebra",
            "--palette",
            "sand",
            "--mode",
            "contours",
            "--steps",
            "7",
            "--noise",
            "0.25",
        ]);
        let mut s = Settings::default();
        s.apply_args(&args).unwrap();
        assert_eq!(s.preset, Some(5));
        assert_eq!(s.params.sim.coeffs.kill, 0.061);
        assert_eq!(s.params.render.palette, "sand");
        assert_eq!(s.params.render.mode, RenderMode::Contours);
        assert_eq!(s.params.sim.steps_per_frame, 7);
        assert_eq!(s.seeding.noise, 0.25);
    }

    #[test]
    fn bad_overrides_are_rejected() {
        let mut s = Settings::default();
        let args = Args::parse_from(["morphogen", "--palette", "chartreuse"]);
        let err = s.apply_args(&args).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::UnknownPalette("chartreuse".to_string()))
        );

        let args = Args::parse_from(["morphogen", "--steps", "0"]);
        let err = s.apply_args(&args).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::ZeroSteps));
    }

    #[test]
    fn oversized_grid_override_is_rejected() {
        let mut s = Settings::default();
        let args = Args::parse_from(["morphogen", "--width", "100000", "--height", "100000"]);
        let err = s.apply_args(&args).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::GridTooLarge {
                width: 100_000,
                height: 100_000
            })
        );
    }
}

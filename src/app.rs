use crate::config::{load_settings, project_paths, save_settings_atomic, Args, Paths, Settings};
use crate::driver::{FrameDriver, Mode};
use crate::field::Seeding;
use crate::input::{apply_to_params, collect_actions, Action};
use crate::params::PatternKind;
use crate::presets::PRESETS;
use crate::{logging, term::Screen};
use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Noise probability used by the "noisy reset" key.
const NOISY_RESET: f32 = 0.1;

/// Work owed to the screen after handling input. Ordered by cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Refresh {
    Nothing,
    /// Redraw the last frame (HUD text or terminal size changed).
    Present,
    /// Re-run the frame pass before drawing.
    Render,
}

pub(crate) struct App {
    settings: Settings,
    driver: FrameDriver,
    rng: StdRng,
    should_quit: bool,
    snapshots: u32,
    status: String,
}

impl App {
    pub(crate) fn new(settings: Settings) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let mut driver = FrameDriver::new(settings.width, settings.height)?;
        driver.reset(&settings.seeding, &mut rng)?;
        Ok(Self {
            settings,
            driver,
            rng,
            should_quit: false,
            snapshots: 0,
            status: String::new(),
        })
    }

    /// Handles one control action between frames and says what the screen
    /// needs afterwards.
    fn handle(&mut self, action: Action) -> Result<Refresh> {
        let params = &mut self.settings.params;
        if apply_to_params(action, params) {
            let r = &params.render;
            match action {
                Action::Feed(_) | Action::Kill(_) => {
                    self.settings.preset = None;
                    debug!(coeffs = ?params.sim.coeffs, "coefficients adjusted");
                }
                Action::NextPalette => info!(palette = %r.palette, "palette changed"),
                Action::NextMode => info!(mode = %r.mode.name(), "render mode changed"),
                Action::ToggleInvert => info!(invert = r.invert, "invert toggled"),
                Action::ToggleField => info!(field = ?r.field, "render field changed"),
                _ => debug!(?action, "parameter adjusted"),
            }
            return Ok(Refresh::Render);
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePause => self.driver.toggle_running(),
            Action::Reset => {
                self.driver.reset(&self.settings.seeding, &mut self.rng)?;
                return Ok(Refresh::Render);
            }
            Action::ResetNoisy => {
                let seeding = Seeding {
                    noise: NOISY_RESET,
                    ..self.settings.seeding
                };
                self.driver.reset(&seeding, &mut self.rng)?;
                return Ok(Refresh::Render);
            }
            Action::NextPreset => {
                let next = self.settings.preset.map_or(0, |i| (i + 1) % PRESETS.len());
                self.settings.preset = Some(next);
                let preset = &PRESETS[next];
                params.sim.coeffs = preset.resolve(&mut self.rng);
                info!(preset = preset.name, coeffs = ?params.sim.coeffs, "preset applied");
            }
            Action::Pattern(kind) => return Ok(self.toggle_pattern(kind)),
            Action::Snapshot => {
                self.snapshot()?;
                return Ok(Refresh::Present);
            }
            _ => {}
        }
        Ok(Refresh::Nothing)
    }

    fn toggle_pattern(&mut self, kind: PatternKind) -> Refresh {
        match self.driver.mode() {
            Mode::Patterned(current) if current == kind => {
                self.driver.resume_simulation();
                Refresh::Render
            }
            // entering a pattern renders it, only the blit is left
            _ => match self.driver.show_pattern(kind, &self.settings.params) {
                Ok(_) => Refresh::Present,
                Err(e) => {
                    warn!(error = %e, "pattern rejected");
                    Refresh::Nothing
                }
            },
        }
    }

    fn snapshot(&mut self) -> Result<()> {
        self.snapshots += 1;
        let path = PathBuf::from(format!(
            "morphogen_{:08}_{:03}.png",
            self.driver.steps(),
            self.snapshots
        ));
        self.driver.frame().save_png(&path)?;
        info!(path = %path.display(), "snapshot saved");
        self.status = format!("saved {}", path.display());
        Ok(())
    }

    fn hud(&self, fps: f32) -> [String; 2] {
        let p = &self.settings.params;
        let c = &p.sim.coeffs;
        let preset = self
            .settings
            .preset
            .and_then(|i| PRESETS.get(i))
            .map_or("custom", |p| p.name);
        [
            format!(
                "Gray-Scott  preset:{}  palette:{}  mode:{}  field:{:?}  state:{}  steps/frame:{}  zoom:{}  fps:{:>5.1}  {}",
                preset,
                p.render.palette,
                p.render.mode.name(),
                p.render.field,
                self.driver.mode().label(),
                p.sim.steps_per_frame,
                p.sim.zoom_percent,
                fps,
                self.status,
            ),
            format!(
                "F:{:.4} k:{:.4} Du:{:.3} Dv:{:.3}  contrast:{:.1} gain:{:.1} offset:{:+.2} invert:{}  keys: Q quit  SPACE pause  r/R reset  P preset  T palette  M mode  I invert  U field  F/G pattern  arrows F/k  +/- steps  [ ] contrast  ; ' gain  , . offset  Z/X zoom  S save",
                c.feed,
                c.kill,
                c.diff_u,
                c.diff_v,
                p.render.contrast,
                p.render.gain,
                p.render.offset,
                if p.render.invert { "on" } else { "off" },
            ),
        ]
    }

    fn run_interactive(&mut self) -> Result<()> {
        let mut screen = Screen::begin()?;
        let fps_cap = self.settings.fps_cap.clamp(1, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps_cap as f32);

        let mut fps_timer = Instant::now();
        let mut frames: u32 = 0;
        let mut fps: f32 = 0.0;
        let mut refresh = Refresh::Render;

        while !self.should_quit {
            let started = Instant::now();
            if screen.resize_if_needed()? {
                refresh = refresh.max(Refresh::Present);
            }

            for action in collect_actions(Duration::from_millis(0))? {
                match self.handle(action) {
                    Ok(r) => refresh = refresh.max(r),
                    Err(e) => {
                        warn!(error = %e, ?action, "control rejected");
                        self.status = e.to_string();
                        refresh = refresh.max(Refresh::Present);
                    }
                }
            }

            // the periodic callback only fires while simulating
            let ticked = if self.driver.is_ticking() || refresh == Refresh::Render {
                match self.driver.tick(&self.settings.params) {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(error = %e, "frame skipped");
                        self.status = e.to_string();
                        false
                    }
                }
            } else {
                false
            };

            if ticked || refresh != Refresh::Nothing {
                let hud = self.hud(fps);
                screen.present(
                    self.driver.frame(),
                    self.settings.params.sim.zoom_percent,
                    [hud[0].as_str(), hud[1].as_str()],
                )?;
                frames += 1;
            }
            refresh = Refresh::Nothing;

            if fps_timer.elapsed() >= Duration::from_millis(500) {
                fps = frames as f32 / fps_timer.elapsed().as_secs_f32();
                fps_timer = Instant::now();
                frames = 0;
            }

            let elapsed = started.elapsed();
            if elapsed < frame_dt {
                std::thread::sleep(frame_dt - elapsed);
            }
        }
        Ok(())
    }

    fn run_headless(&mut self, frames: u32, export: Option<&Path>) -> Result<()> {
        let frames = if self.driver.is_ticking() {
            frames.max(1)
        } else {
            1
        };
        let started = Instant::now();
        for _ in 0..frames {
            self.driver.tick(&self.settings.params)?;
        }
        info!(
            frames,
            steps = self.driver.steps(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "headless run finished"
        );
        if let Some(path) = export {
            self.driver.frame().save_png(path)?;
            info!(path = %path.display(), "frame exported");
        }
        Ok(())
    }
}

pub(crate) fn run() -> Result<()> {
    let args = Args::parse();
    let paths: Option<Paths> = match project_paths() {
        Ok(p) => Some(p),
        Err(e) if args.headless => {
            eprintln!("settings unavailable: {e:#}");
            None
        }
        Err(e) => return Err(e),
    };

    let log_file = if args.headless {
        None
    } else {
        paths.as_ref().map(|p| p.log_path.as_path())
    };
    logging::init(args.log_level, log_file)?;

    let mut settings = paths
        .as_ref()
        .map(|p| load_settings(&p.settings_path))
        .unwrap_or_default();
    settings
        .apply_args(&args)
        .context("invalid command-line configuration")?;
    info!(
        width = settings.width,
        height = settings.height,
        params = ?settings.params,
        seeding = ?settings.seeding,
        "starting"
    );

    let mut app = App::new(settings)?;
    if let Some(kind) = args.pattern {
        app.driver.show_pattern(kind, &app.settings.params)?;
    }

    if args.headless {
        app.run_headless(args.frames, args.export.as_deref())?;
    } else {
        app.run_interactive()?;
    }

    if let Some(p) = paths.filter(|_| !args.no_save) {
        save_settings_atomic(&p.settings_path, &app.settings)?;
    }
    Ok(())
}

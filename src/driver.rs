//! One frame = N integrator steps then a render, or one pattern evaluation.

use crate::error::ConfigError;
use crate::field::{Field, Seeding};
use crate::frame::RgbaFrame;
use crate::palette::{self, Palette};
use crate::params::{Params, PatternKind, RenderMode, RenderParams};
use crate::pattern;
use crate::shaper;
use crate::stencil;
use rand::Rng;
use tracing::{debug, info};

/// What the next frame shows. Pattern mode never steps the integrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Simulating { running: bool },
    Patterned(PatternKind),
}

impl Mode {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Mode::Simulating { running: true } => "running",
            Mode::Simulating { running: false } => "paused",
            Mode::Patterned(k) => k.name(),
        }
    }
}

pub(crate) struct FrameDriver {
    field: Field,
    mode: Mode,
    frame: RgbaFrame,
    shaped: Vec<f32>,
    steps: u64,
}

impl FrameDriver {
    pub(crate) fn new(w: usize, h: usize) -> Result<Self, ConfigError> {
        let field = Field::new(w, h)?;
        Ok(Self {
            field,
            mode: Mode::Simulating { running: true },
            frame: RgbaFrame::new(w, h),
            shaped: Vec::with_capacity(w * h),
            steps: 0,
        })
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub(crate) fn field(&self) -> &Field {
        &self.field
    }

    /// Last rendered frame.
    pub(crate) fn frame(&self) -> &RgbaFrame {
        &self.frame
    }

    /// Total integrator steps since the last reset.
    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    /// Whether the periodic frame callback should keep firing.
    pub(crate) fn is_ticking(&self) -> bool {
        matches!(self.mode, Mode::Simulating { .. })
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        if let Mode::Simulating { running: r } = &mut self.mode {
            *r = running;
            debug!(running, "simulation run state");
        }
    }

    pub(crate) fn toggle_running(&mut self) {
        if let Mode::Simulating { running } = self.mode {
            self.set_running(!running);
        }
    }

    /// Switches to a pattern and renders it once. The field is left as is.
    pub(crate) fn show_pattern(
        &mut self,
        kind: PatternKind,
        params: &Params,
    ) -> Result<&RgbaFrame, ConfigError> {
        info!(pattern = kind.name(), "entering pattern mode");
        self.mode = Mode::Patterned(kind);
        self.tick(params)
    }

    /// Back to the simulation, resuming from the preserved field.
    pub(crate) fn resume_simulation(&mut self) {
        if let Mode::Patterned(_) = self.mode {
            info!(steps = self.steps, "resuming simulation");
            self.mode = Mode::Simulating { running: true };
        }
    }

    pub(crate) fn reset<R: Rng + ?Sized>(
        &mut self,
        seeding: &Seeding,
        rng: &mut R,
    ) -> Result<(), ConfigError> {
        seeding.validate()?;
        self.field.reset(seeding, rng);
        self.steps = 0;
        info!(
            noise = seeding.noise,
            sprinkles = seeding.sprinkles,
            "field reset"
        );
        Ok(())
    }

    /// Runs one frame pass against a snapshot of `params`.
    ///
    /// Parameters are validated before anything moves, so a rejected
    /// configuration leaves the field and the last frame untouched.
    pub(crate) fn tick(&mut self, params: &Params) -> Result<&RgbaFrame, ConfigError> {
        params.validate()?;
        let pal = palette::lookup(&params.render.palette)?;

        match self.mode {
            Mode::Simulating { running } => {
                if running {
                    let n = params.sim.steps_per_frame;
                    stencil::advance(&mut self.field, &params.sim.coeffs, n);
                    self.steps += u64::from(params.sim.steps_per_frame);
                }
                self.render_field(&params.render, pal);
            }
            Mode::Patterned(kind) => self.render_pattern(kind, &params.render, pal),
        }
        Ok(&self.frame)
    }

    fn render_field(&mut self, p: &RenderParams, pal: &Palette) {
        let (w, h) = (self.field.width(), self.field.height());
        shaper::shape(self.field.species(p.field), w, h, p, &mut self.shaped);
        for (i, &v) in self.shaped.iter().enumerate() {
            self.frame.put(i, colorize(v, p.mode, pal));
        }
    }

    fn render_pattern(&mut self, kind: PatternKind, p: &RenderParams, pal: &Palette) {
        let (w, h) = (self.frame.width, self.frame.height);
        for y in 0..h {
            for x in 0..w {
                let v = shaper::shape_pattern(pattern::sample(kind, x, y, w, h), p.invert);
                self.frame.put(x + y * w, colorize(v, p.mode, pal));
            }
        }
    }
}

#[inline]
fn colorize(v: f32, mode: RenderMode, pal: &Palette) -> crate::palette::Rgb {
    match mode {
        RenderMode::Heat => palette::heat_map(v),
        RenderMode::Normal | RenderMode::Contours => pal.color(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn params() -> Params {
        Params::default()
    }

    #[test]
    fn oversized_driver_is_refused() {
        assert!(matches!(
            FrameDriver::new(1 << 20, 1 << 20),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn running_frame_advances_by_steps_per_frame() {
        let mut d = FrameDriver::new(60, 40).unwrap();
        let mut p = params();
        p.sim.steps_per_frame = 3;
        d.tick(&p).unwrap();
        d.tick(&p).unwrap();
        assert_eq!(d.steps(), 6);
    }

    #[test]
    fn paused_frame_renders_without_stepping() {
        let mut d = FrameDriver::new(60, 40).unwrap();
        let p = params();
        d.tick(&p).unwrap();
        let v = d.field().v().to_vec();
        d.set_running(false);
        let first = d.tick(&p).unwrap().clone();
        let second = d.tick(&p).unwrap().clone();
        assert_eq!(d.field().v(), &v[..]);
        assert_eq!(first, second);
        assert_eq!(d.mode().label(), "paused");
    }

    #[test]
    fn pattern_mode_freezes_the_field() {
        let mut d = FrameDriver::new(50, 30).unwrap();
        let p = params();
        d.tick(&p).unwrap();
        let (u, v, steps) = (d.field().u().to_vec(), d.field().v().to_vec(), d.steps());

        d.show_pattern(PatternKind::Fractal, &p).unwrap();
        assert!(!d.is_ticking());
        d.tick(&p).unwrap();
        assert_eq!(d.field().u(), &u[..]);
        assert_eq!(d.field().v(), &v[..]);
        assert_eq!(d.steps(), steps);

        d.resume_simulation();
        assert!(d.is_ticking());
        d.tick(&p).unwrap();
        assert_eq!(d.steps(), steps + u64::from(p.sim.steps_per_frame));
    }

    #[test]
    fn pause_flag_does_not_leak_into_pattern_mode() {
        let mut d = FrameDriver::new(10, 10).unwrap();
        d.show_pattern(PatternKind::Noise, &params()).unwrap();
        d.set_running(false);
        assert_eq!(d.mode(), Mode::Patterned(PatternKind::Noise));
    }

    #[test]
    fn rejected_params_leave_state_untouched() {
        let mut d = FrameDriver::new(30, 30).unwrap();
        let mut p = params();
        p.render.palette = "nope".to_string();
        let before = d.frame().clone();
        assert!(d.tick(&p).is_err());
        assert_eq!(d.steps(), 0);
        assert_eq!(d.frame(), &before);
    }

    #[test]
    fn heat_mode_on_fresh_field() {
        let mut d = FrameDriver::new(480, 315).unwrap();
        let mut p = params();
        p.render.mode = RenderMode::Heat;
        d.set_running(false);
        let f = d.tick(&p).unwrap();
        // centre is V=1, corner is V=0
        assert_eq!(&f.data[(240 + 157 * 480) * 4..][..4], &[255, 200, 0, 255]);
        assert_eq!(&f.data[..4], &[0, 0, 140, 255]);
    }

    #[test]
    fn render_field_can_show_u() {
        let mut d = FrameDriver::new(100, 100).unwrap();
        let mut p = params();
        p.render.field = crate::params::Species::U;
        d.set_running(false);
        let f = d.tick(&p).unwrap();
        // U is 1 everywhere after reset -> first bw stop
        assert_eq!(f.get(50, 50), crate::palette::Rgb { r: 255, g: 255, b: 255 });
    }

    #[test]
    fn invert_applies_to_patterns() {
        let mut d = FrameDriver::new(40, 40).unwrap();
        let mut p = params();
        p.render.mode = RenderMode::Heat;
        let plain = d.show_pattern(PatternKind::Fractal, &p).unwrap().clone();
        p.render.invert = true;
        let inverted = d.tick(&p).unwrap().clone();
        assert_ne!(plain, inverted);
    }

    #[test]
    fn reset_rejects_bad_noise_and_clears_step_count() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut d = FrameDriver::new(20, 20).unwrap();
        d.tick(&params()).unwrap();
        let bad = Seeding {
            noise: -0.1,
            sprinkles: 0,
        };
        assert!(d.reset(&bad, &mut rng).is_err());
        assert!(d.steps() > 0);
        d.reset(&Seeding::NONE, &mut rng).unwrap();
        assert_eq!(d.steps(), 0);
    }
}

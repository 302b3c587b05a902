use crate::error::ConfigError;
use crate::palette;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Coefficients of the Gray-Scott equations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Coefficients {
    pub(crate) feed: f32,
    pub(crate) kill: f32,
    pub(crate) diff_u: f32,
    pub(crate) diff_v: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct SimParams {
    pub(crate) coeffs: Coefficients,
    pub(crate) steps_per_frame: u32,
    /// 160 shows the frame at its fitted size.
    pub(crate) zoom_percent: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            coeffs: Coefficients {
                feed: 0.037,
                kill: 0.06,
                diff_u: 0.16,
                diff_v: 0.08,
            },
            steps_per_frame: 4,
            zoom_percent: 160,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RenderMode {
    Normal,
    Contours,
    Heat,
}

impl RenderMode {
    pub(crate) fn next(self) -> Self {
        match self {
            RenderMode::Normal => RenderMode::Contours,
            RenderMode::Contours => RenderMode::Heat,
            RenderMode::Heat => RenderMode::Normal,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            RenderMode::Normal => "normal",
            RenderMode::Contours => "contours",
            RenderMode::Heat => "heat",
        }
    }
}

/// Which concentration grid feeds the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Species {
    U,
    V,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PatternKind {
    Noise,
    Fractal,
}

impl PatternKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            PatternKind::Noise => "noise",
            PatternKind::Fractal => "fractal",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct RenderParams {
    pub(crate) palette: String,
    pub(crate) mode: RenderMode,
    pub(crate) field: Species,
    pub(crate) contrast: f32,
    pub(crate) gain: f32,
    pub(crate) offset: f32,
    pub(crate) invert: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            palette: "bw".to_string(),
            mode: RenderMode::Normal,
            field: Species::V,
            contrast: 1.0,
            gain: 1.0,
            offset: 0.0,
            invert: false,
        }
    }
}

/// Everything a frame pass reads. Hosts mutate it between frames only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Params {
    pub(crate) sim: SimParams,
    pub(crate) render: RenderParams,
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

impl Params {
    /// Rejects values the core refuses to run with. Run once per frame pass.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.sim.coeffs;
        finite("feed", c.feed)?;
        finite("kill", c.kill)?;
        finite("diff_u", c.diff_u)?;
        finite("diff_v", c.diff_v)?;
        if self.sim.steps_per_frame == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if self.sim.zoom_percent == 0 {
            return Err(ConfigError::ZeroZoom);
        }
        finite("contrast", self.render.contrast)?;
        finite("gain", self.render.gain)?;
        finite("offset", self.render.offset)?;
        palette::lookup(&self.render.palette)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(Params::default().validate(), Ok(()));
    }

    #[test]
    fn zero_steps_is_rejected() {
        let mut p = Params::default();
        p.sim.steps_per_frame = 0;
        assert_eq!(p.validate(), Err(ConfigError::ZeroSteps));
    }

    #[test]
    fn unknown_palette_is_rejected() {
        let mut p = Params::default();
        p.render.palette = "mauve".to_string();
        assert_eq!(
            p.validate(),
            Err(ConfigError::UnknownPalette("mauve".to_string()))
        );
    }

    #[test]
    fn nan_gain_is_rejected() {
        let mut p = Params::default();
        p.render.gain = f32::NAN;
        assert!(matches!(
            p.validate(),
            Err(ConfigError::NotFinite { name: "gain", .. })
        ));
    }

    #[test]
    fn render_mode_cycles_back() {
        let m = RenderMode::Normal;
        assert_eq!(m.next().next().next(), RenderMode::Normal);
    }
}

use crate::error::ConfigError;
use crate::params::Coefficients;
use rand::Rng;
use std::ops::Range;

#[derive(Clone, Copy, Debug)]
pub(crate) enum PresetKind {
    Fixed(Coefficients),
    /// Draw every coefficient uniformly from its range.
    Random,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Preset {
    pub(crate) name: &'static str,
    pub(crate) kind: PresetKind,
}

const fn fixed(name: &'static str, feed: f32, kill: f32, diff_u: f32, diff_v: f32) -> Preset {
    Preset {
        name,
        kind: PresetKind::Fixed(Coefficients {
            feed,
            kill,
            diff_u,
            diff_v,
        }),
    }
}

pub(crate) const PRESETS: &[Preset] = &[
    fixed("tiger", 0.034, 0.056, 0.17, 0.09),
    fixed("leopard", 0.037, 0.063, 0.15, 0.068),
    fixed("coral", 0.055, 0.062, 0.16, 0.064),
    fixed("giraffe", 0.03, 0.058, 0.21, 0.1),
    fixed("waves", 0.025, 0.055, 0.19, 0.05),
    fixed("zebra", 0.025, 0.061, 0.18, 0.07),
    Preset {
        name: "random",
        kind: PresetKind::Random,
    },
];

pub(crate) const FEED_RANGE: Range<f32> = 0.02..0.08;
pub(crate) const KILL_RANGE: Range<f32> = 0.04..0.10;
pub(crate) const DIFF_U_RANGE: Range<f32> = 0.08..0.30;
pub(crate) const DIFF_V_RANGE: Range<f32> = 0.04..0.11;

impl Preset {
    /// Coefficients this preset writes into the live parameters.
    pub(crate) fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Coefficients {
        match self.kind {
            PresetKind::Fixed(c) => c,
            PresetKind::Random => Coefficients {
                feed: rng.gen_range(FEED_RANGE),
                kill: rng.gen_range(KILL_RANGE),
                diff_u: rng.gen_range(DIFF_U_RANGE),
                diff_v: rng.gen_range(DIFF_V_RANGE),
            },
        }
    }
}

pub(crate) fn lookup(name: &str) -> Result<(usize, &'static Preset), ConfigError> {
    PRESETS
        .iter()
        .enumerate()
        .find(|(_, p)| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
}

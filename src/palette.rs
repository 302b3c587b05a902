//! Scalar-to-colour mapping: heat map, control-point palettes and
//! closed-form palettes.

use crate::error::ConfigError;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

#[inline]
fn channel(x: f32) -> u8 {
    // floor, not round
    if x.is_nan() {
        0
    } else {
        x.floor().clamp(0.0, 255.0) as u8
    }
}

#[inline]
fn floor_rgb(r: f32, g: f32, b: f32) -> Rgb {
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum PaletteKind {
    /// Ordered colour stops, linearly interpolated.
    ControlPoints(&'static [Rgb]),
    /// A fixed formula of v.
    Procedural(fn(f32) -> Rgb),
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Palette {
    pub(crate) id: &'static str,
    pub(crate) kind: PaletteKind,
}

impl Palette {
    pub(crate) fn color(&self, v: f32) -> Rgb {
        match self.kind {
            PaletteKind::ControlPoints(stops) => control_points(stops, v),
            PaletteKind::Procedural(f) => f(v),
        }
    }
}

pub(crate) const PALETTES: &[Palette] = &[
    Palette {
        id: "bw",
        kind: PaletteKind::ControlPoints(&[rgb(255, 255, 255), rgb(30, 30, 30)]),
    },
    Palette {
        id: "sand",
        kind: PaletteKind::ControlPoints(&[
            rgb(232, 210, 151),
            rgb(193, 164, 110),
            rgb(118, 92, 53),
            rgb(62, 51, 34),
        ]),
    },
    Palette {
        id: "forest",
        kind: PaletteKind::ControlPoints(&[
            rgb(225, 244, 214),
            rgb(98, 133, 84),
            rgb(38, 59, 32),
            rgb(19, 31, 20),
        ]),
    },
    Palette {
        id: "coral",
        kind: PaletteKind::ControlPoints(&[
            rgb(252, 228, 211),
            rgb(220, 79, 69),
            rgb(225, 180, 133),
            rgb(77, 57, 43),
        ]),
    },
    Palette {
        id: "zebra",
        kind: PaletteKind::ControlPoints(&[
            rgb(255, 255, 255),
            rgb(35, 35, 35),
            rgb(230, 220, 172),
            rgb(119, 101, 55),
        ]),
    },
    Palette {
        id: "brown",
        kind: PaletteKind::ControlPoints(&[
            rgb(237, 214, 187),
            rgb(157, 111, 69),
            rgb(69, 49, 35),
            rgb(40, 27, 17),
        ]),
    },
    Palette {
        id: "leaf",
        kind: PaletteKind::ControlPoints(&[
            rgb(231, 246, 206),
            rgb(140, 210, 126),
            rgb(56, 112, 51),
            rgb(33, 58, 28),
        ]),
    },
    Palette {
        id: "psyche",
        kind: PaletteKind::Procedural(psyche),
    },
    Palette {
        id: "ocean",
        kind: PaletteKind::Procedural(ocean),
    },
    Palette {
        id: "ember",
        kind: PaletteKind::Procedural(ember),
    },
];

pub(crate) fn lookup(id: &str) -> Result<&'static Palette, ConfigError> {
    PALETTES
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ConfigError::UnknownPalette(id.to_string()))
}

/// Id of the palette after `id` in catalog order.
pub(crate) fn next_id(id: &str) -> &'static str {
    let i = PALETTES.iter().position(|p| p.id == id).map_or(0, |i| i + 1);
    PALETTES[i % PALETTES.len()].id
}

pub(crate) fn heat_map(v: f32) -> Rgb {
    let t = v.clamp(0.0, 1.0);
    floor_rgb(255.0 * t.sqrt(), 200.0 * t, 140.0 * (1.0 - t))
}

/// Blend between stops. Two stops weight the first by `v`; more stops walk
/// from the first to the last as `v` goes 0 -> 1.
pub(crate) fn control_points(stops: &[Rgb], v: f32) -> Rgb {
    match stops {
        [] => rgb(0, 0, 0),
        [only] => *only,
        [a, b] => {
            let mix = |x: u8, y: u8| x as f32 * v + y as f32 * (1.0 - v);
            floor_rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
        }
        _ => {
            let last = stops.len() - 1;
            let idx = v.clamp(0.0, 1.0) * last as f32;
            let i0 = (idx.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let t = idx - i0 as f32;
            let (a, b) = (stops[i0], stops[i1]);
            let mix = |x: u8, y: u8| x as f32 * (1.0 - t) + y as f32 * t;
            floor_rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
        }
    }
}

fn psyche(v: f32) -> Rgb {
    let a = TAU * v;
    floor_rgb(
        127.5 + 127.5 * a.sin(),
        127.5 + 127.5 * (a + TAU / 3.0).sin(),
        127.5 + 127.5 * (a + 2.0 * TAU / 3.0).sin(),
    )
}

fn ocean(v: f32) -> Rgb {
    floor_rgb(20.0 + 60.0 * v * v, 40.0 + 180.0 * v, 90.0 + 165.0 * v.sqrt())
}

fn ember(v: f32) -> Rgb {
    floor_rgb(
        255.0 * (1.6 * v).min(1.0),
        255.0 * v * v,
        60.0 * (1.0 - v) + 120.0 * v.powi(4),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_map_endpoints() {
        assert_eq!(heat_map(0.0), rgb(0, 0, 140));
        assert_eq!(heat_map(1.0), rgb(255, 200, 0));
    }

    #[test]
    fn heat_map_floors() {
        // 255 * sqrt(0.5) = 180.31, 200 * 0.5 = 100, 140 * 0.5 = 70
        assert_eq!(heat_map(0.5), rgb(180, 100, 70));
    }

    #[test]
    fn control_point_palettes_reach_their_end_stops() {
        for p in PALETTES {
            if let PaletteKind::ControlPoints(stops) = p.kind {
                let last = stops[stops.len() - 1];
                if stops.len() == 2 {
                    assert_eq!(p.color(1.0), stops[0], "{}", p.id);
                    assert_eq!(p.color(0.0), last, "{}", p.id);
                } else {
                    assert_eq!(p.color(0.0), stops[0], "{}", p.id);
                    assert_eq!(p.color(1.0), last, "{}", p.id);
                }
            }
        }
    }

    #[test]
    fn procedural_palettes_span_the_unit_interval() {
        for p in PALETTES {
            if let PaletteKind::Procedural(f) = p.kind {
                let lo = f(0.0);
                let hi = f(1.0);
                assert!(lo != hi || p.id == "psyche", "{}", p.id);
            }
        }
    }

    #[test]
    fn two_stops_are_a_binary_blend() {
        let stops = [rgb(255, 255, 255), rgb(30, 30, 30)];
        for k in 0..=20 {
            let v = k as f32 / 20.0;
            let want = floor_rgb(
                255.0 * v + 30.0 * (1.0 - v),
                255.0 * v + 30.0 * (1.0 - v),
                255.0 * v + 30.0 * (1.0 - v),
            );
            assert_eq!(control_points(&stops, v), want);
        }
        assert_eq!(control_points(&stops, 1.0), rgb(255, 255, 255));
        assert_eq!(control_points(&stops, 0.0), rgb(30, 30, 30));
    }

    #[test]
    fn catalog_two_stop_palette_matches_direct_blend() {
        let bw = lookup("bw").unwrap();
        for k in 0..=50 {
            let v = k as f32 / 50.0;
            assert_eq!(
                bw.color(v),
                control_points(&[rgb(255, 255, 255), rgb(30, 30, 30)], v)
            );
        }
    }

    #[test]
    fn many_stops_hit_each_stop_exactly() {
        let stops = [rgb(0, 0, 0), rgb(100, 50, 10), rgb(200, 250, 30)];
        assert_eq!(control_points(&stops, 0.0), stops[0]);
        assert_eq!(control_points(&stops, 0.5), stops[1]);
        assert_eq!(control_points(&stops, 1.0), stops[2]);
        // a quarter of the way: halfway between stop 0 and stop 1
        assert_eq!(control_points(&stops, 0.25), rgb(50, 25, 5));
    }

    #[test]
    fn procedural_palettes_are_deterministic() {
        let p = lookup("psyche").unwrap();
        assert_eq!(p.color(0.37), p.color(0.37));
    }

    #[test]
    fn unknown_palette_is_an_error() {
        assert_eq!(
            lookup("neon").unwrap_err(),
            ConfigError::UnknownPalette("neon".to_string())
        );
    }

    #[test]
    fn next_id_wraps_around() {
        let last = PALETTES[PALETTES.len() - 1].id;
        assert_eq!(next_id(last), PALETTES[0].id);
        assert_eq!(next_id("bw"), "sand");
    }
}

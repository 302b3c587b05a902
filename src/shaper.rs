//! Post-processing of a raw scalar field into display values in [0, 1].

use crate::params::{RenderMode, RenderParams};

#[inline]
pub(crate) fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Gradient magnitude of `src` into `out`. Only the one-cell-inset interior
/// is evaluated; the border stays at zero.
pub(crate) fn edges(src: &[f32], w: usize, h: usize, out: &mut [f32]) {
    out.fill(0.0);
    if w < 3 || h < 3 {
        return;
    }
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = x + y * w;
            let dx = (src[i - 1] - src[i + 1]) / 2.0;
            let dy = (src[i - w] - src[i + w]) / 2.0;
            out[i] = (dx * dx + dy * dy).sqrt() * 3.0;
        }
    }
}

#[inline]
fn tone(v: f32, p: &RenderParams) -> f32 {
    let v = clamp01(v);
    let v = if p.invert { 1.0 - v } else { v };
    clamp01(v.powf(p.gain) * p.contrast + p.offset)
}

/// Runs the full chain: optional edge transform, clamp, optional invert,
/// then gain/contrast/offset. Every output lands in [0, 1].
pub(crate) fn shape(raw: &[f32], w: usize, h: usize, p: &RenderParams, out: &mut Vec<f32>) {
    out.resize(raw.len(), 0.0);
    if p.mode == RenderMode::Contours {
        edges(raw, w, h, out);
    } else {
        out.copy_from_slice(raw);
    }
    for v in out.iter_mut() {
        *v = tone(*v, p);
    }
}

/// Pattern values only get clamped and optionally inverted.
#[inline]
pub(crate) fn shape_pattern(v: f32, invert: bool) -> f32 {
    let v = clamp01(v);
    if invert {
        1.0 - v
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RenderParams {
        RenderParams::default()
    }

    #[test]
    fn identity_settings_only_clamp() {
        let raw = [-0.5, 0.0, 0.25, 1.0, 1.7];
        let mut out = Vec::new();
        shape(&raw, 5, 1, &params(), &mut out);
        assert_eq!(out, vec![0.0, 0.0, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn invert_happens_before_gain() {
        let mut p = params();
        p.invert = true;
        p.gain = 2.0;
        let mut out = Vec::new();
        shape(&[0.25], 1, 1, &p, &mut out);
        // (1 - 0.25)^2
        assert!((out[0] - 0.5625).abs() < 1e-6);
    }

    #[test]
    fn contrast_and_offset_are_reclamped() {
        let mut p = params();
        p.contrast = 3.0;
        p.offset = 0.2;
        let mut out = Vec::new();
        shape(&[0.1, 0.5], 2, 1, &p, &mut out);
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert_eq!(out[1], 1.0);
    }

    #[test]
    fn degenerate_gain_never_escapes_range() {
        let mut p = params();
        p.gain = -1.0;
        p.contrast = 0.0;
        let mut out = Vec::new();
        shape(&[0.0, 0.5, 1.0], 3, 1, &p, &mut out);
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn edges_leave_border_at_zero() {
        let (w, h) = (5, 4);
        let raw: Vec<f32> = (0..w * h).map(|i| (i % w) as f32 * 0.1).collect();
        let mut out = vec![9.0; w * h];
        edges(&raw, w, h, &mut out);
        for x in 0..w {
            assert_eq!(out[x], 0.0);
            assert_eq!(out[x + (h - 1) * w], 0.0);
        }
        for y in 0..h {
            assert_eq!(out[y * w], 0.0);
            assert_eq!(out[w - 1 + y * w], 0.0);
        }
        // horizontal ramp of 0.1 per cell: |dx| = 0.1, scaled by 3
        assert!((out[1 + w] - 0.3).abs() < 1e-5);
    }

    #[test]
    fn contours_use_raw_values_before_toning() {
        let (w, h) = (3, 3);
        let raw = [0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 0.0, 0.0, 0.0];
        let mut p = params();
        p.mode = RenderMode::Contours;
        p.gain = 2.0;
        let mut out = Vec::new();
        shape(&raw, w, h, &p, &mut out);
        // dx = (0 - 1) / 2, dy = 0 -> 1.5 -> clamped to 1 -> 1^2
        assert_eq!(out[4], 1.0);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn pattern_shaping_inverts() {
        assert_eq!(shape_pattern(0.25, true), 0.75);
        assert_eq!(shape_pattern(2.0, false), 1.0);
    }
}

//! Procedural scalar fields that stand in for the simulation.

use crate::params::PatternKind;

pub(crate) const MAX_ITERATIONS: u32 = 40;
const JULIA_C: (f32, f32) = (-0.7, 0.27015);

/// Smooth banded sine field in [0, 1].
pub(crate) fn smooth_noise(x: usize, y: usize) -> f32 {
    let (x, y) = (x as f32, y as f32);
    (x * 0.025 + y * 0.012 + (x * 0.03).cos() * 0.6).sin().abs()
}

/// Escape iterations of pixel (x, y) of a `w` x `h` image under
/// z <- z^2 + c. Never more than [`MAX_ITERATIONS`].
pub(crate) fn escape_iterations(x: usize, y: usize, w: usize, h: usize) -> u32 {
    let (wf, hf) = (w as f32, h as f32);
    let mut zx = (x as f32 - wf / 2.0) / wf * 3.2;
    let mut zy = (y as f32 - hf / 2.0) / hf * 2.2;
    let mut i = 0;
    while zx * zx + zy * zy < 4.0 && i < MAX_ITERATIONS {
        let t = zx * zx - zy * zy + JULIA_C.0;
        zy = 2.0 * zx * zy + JULIA_C.1;
        zx = t;
        i += 1;
    }
    i
}

/// 0 inside the set, otherwise how quickly the point escaped.
pub(crate) fn fractal(x: usize, y: usize, w: usize, h: usize) -> f32 {
    let i = escape_iterations(x, y, w, h);
    if i == MAX_ITERATIONS {
        0.0
    } else {
        1.0 - i as f32 / MAX_ITERATIONS as f32
    }
}

pub(crate) fn sample(kind: PatternKind, x: usize, y: usize, w: usize, h: usize) -> f32 {
    match kind {
        PatternKind::Noise => smooth_noise(x, y),
        PatternKind::Fractal => fractal(x, y, w, h),
    }
}

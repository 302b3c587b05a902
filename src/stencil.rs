//! Explicit Euler integration of the Gray-Scott equations on a torus.

use crate::field::Field;
use crate::params::Coefficients;
use crate::shaper::clamp01;

/// Euler step multiplier. Above the stable bound for this stencil; the clamp
/// keeps values bounded.
pub(crate) const STEP_SCALE: f32 = 1.3;

// 3x3 kernel: centre folded in so the sum is "weighted average minus self".
const W_C: f32 = -1.0;
const W_N: f32 = 0.2;
const W_D: f32 = 0.05;

/// Wrapped neighbour indices of one row or column.
#[inline]
fn around(i: usize, n: usize) -> (usize, usize) {
    let prev = if i == 0 { n - 1 } else { i - 1 };
    let next = if i + 1 == n { 0 } else { i + 1 };
    (prev, next)
}

/// Weighted 3x3 neighbour sum of `a` at (x, y) with periodic boundaries.
pub(crate) fn laplace(a: &[f32], w: usize, h: usize, x: usize, y: usize) -> f32 {
    let (xm, xp) = around(x, w);
    let (ym, yp) = around(y, h);
    let (rm, rc, rp) = (ym * w, y * w, yp * w);

    W_C * a[rc + x]
        + W_N * (a[rc + xm] + a[rc + xp] + a[rm + x] + a[rp + x])
        + W_D * (a[rm + xm] + a[rm + xp] + a[rp + xm] + a[rp + xp])
}

/// Writes one integration step into the field's next buffers.
///
/// Reads only the current buffers; the caller promotes the result with
/// [`Field::swap`].
pub(crate) fn step(field: &mut Field, c: &Coefficients) {
    let (w, h) = (field.width(), field.height());
    let (u, v, u_next, v_next) = field.split();

    for y in 0..h {
        for x in 0..w {
            let i = x + y * w;
            let (ui, vi) = (u[i], v[i]);
            let reaction = ui * vi * vi;

            let du = c.diff_u * laplace(u, w, h, x, y) - reaction + c.feed * (1.0 - ui);
            let dv = c.diff_v * laplace(v, w, h, x, y) + reaction - (c.kill + c.feed) * vi;

            u_next[i] = clamp01(ui + du * STEP_SCALE);
            v_next[i] = clamp01(vi + dv * STEP_SCALE);
        }
    }
}

/// `n` steps, swapping after each.
pub(crate) fn advance(field: &mut Field, c: &Coefficients, n: u32) {
    for _ in 0..n {
        step(field, c);
        field.swap();
    }
}

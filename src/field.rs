use crate::error::ConfigError;
use crate::params::Species;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Half-width of the square of V planted at the grid centre on reset.
pub(crate) const SEED_HALF_WIDTH: usize = 36;

/// Largest grid accepted, in cells (4096 x 4096).
pub(crate) const MAX_CELLS: usize = 1 << 24;

/// Cell count for a `w` x `h` grid, or why that grid can't be allocated.
pub(crate) fn cell_count(w: usize, h: usize) -> Result<usize, ConfigError> {
    if w == 0 || h == 0 {
        return Err(ConfigError::EmptyGrid {
            width: w,
            height: h,
        });
    }
    match w.checked_mul(h) {
        Some(n) if n <= MAX_CELLS => Ok(n),
        _ => Err(ConfigError::GridTooLarge {
            width: w,
            height: h,
        }),
    }
}

/// Extra randomness applied on top of the baseline reset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Seeding {
    /// Per-cell probability of replacing U and V with fresh uniform values.
    pub(crate) noise: f32,
    /// Number of random cells that receive a splash of V.
    pub(crate) sprinkles: usize,
}

impl Default for Seeding {
    fn default() -> Self {
        Self {
            noise: 0.0,
            sprinkles: 300,
        }
    }
}

impl Seeding {
    #[cfg(test)]
    pub(crate) const NONE: Seeding = Seeding {
        noise: 0.0,
        sprinkles: 0,
    };

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.noise) {
            Ok(())
        } else {
            Err(ConfigError::NoiseOutOfRange(self.noise))
        }
    }
}

/// The two concentration grids, each with a current and a next buffer.
///
/// The integrator reads `u`/`v` and writes `u_next`/`v_next`; `swap` then
/// exchanges the backing vectors so the next pass reads what was just written.
#[derive(Clone, Debug)]
pub(crate) struct Field {
    w: usize,
    h: usize,
    u: Vec<f32>,
    v: Vec<f32>,
    u_next: Vec<f32>,
    v_next: Vec<f32>,
}

impl Field {
    /// Allocates a `w` x `h` field in the baseline reset state.
    pub(crate) fn new(w: usize, h: usize) -> Result<Self, ConfigError> {
        let n = cell_count(w, h)?;
        let mut field = Self {
            w,
            h,
            u: vec![1.0; n],
            v: vec![0.0; n],
            u_next: vec![1.0; n],
            v_next: vec![0.0; n],
        };
        field.plant_seed();
        Ok(field)
    }

    pub(crate) fn width(&self) -> usize {
        self.w
    }

    pub(crate) fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub(crate) fn idx(&self, x: usize, y: usize) -> usize {
        x + y * self.w
    }

    #[cfg(test)]
    pub(crate) fn u(&self) -> &[f32] {
        &self.u
    }

    #[cfg(test)]
    pub(crate) fn v(&self) -> &[f32] {
        &self.v
    }

    pub(crate) fn species(&self, s: Species) -> &[f32] {
        match s {
            Species::U => &self.u,
            Species::V => &self.v,
        }
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, x: usize, y: usize, u: f32, v: f32) {
        let i = self.idx(x, y);
        self.u[i] = u;
        self.v[i] = v;
    }

    /// Current grids for reading, next grids for writing.
    pub(crate) fn split(&mut self) -> (&[f32], &[f32], &mut [f32], &mut [f32]) {
        (&self.u, &self.v, &mut self.u_next, &mut self.v_next)
    }

    /// Promotes the next buffers to current. Moves ownership, copies nothing.
    pub(crate) fn swap(&mut self) {
        std::mem::swap(&mut self.u, &mut self.u_next);
        std::mem::swap(&mut self.v, &mut self.v_next);
    }

    /// Back to U=1, V=0 with the centre square of V, then applies `seeding`.
    pub(crate) fn reset<R: Rng + ?Sized>(&mut self, seeding: &Seeding, rng: &mut R) {
        self.u.fill(1.0);
        self.v.fill(0.0);
        self.u_next.fill(1.0);
        self.v_next.fill(0.0);
        self.plant_seed();

        for _ in 0..seeding.sprinkles {
            let x = rng.gen_range(0..self.w);
            let y = rng.gen_range(0..self.h);
            let i = self.idx(x, y);
            let splash: f32 = rng.gen_range(0.0..0.5);
            self.v[i] = (self.v[i] + splash).min(1.0);
        }

        if seeding.noise > 0.0 {
            let p = f64::from(seeding.noise.min(1.0));
            for i in 0..self.u.len() {
                if rng.gen_bool(p) {
                    self.u[i] = rng.gen();
                    self.v[i] = rng.gen();
                }
            }
        }
    }

    fn plant_seed(&mut self) {
        let (cx, cy) = (self.w / 2, self.h / 2);
        let x0 = cx.saturating_sub(SEED_HALF_WIDTH);
        let x1 = (cx + SEED_HALF_WIDTH).min(self.w);
        let y0 = cy.saturating_sub(SEED_HALF_WIDTH);
        let y1 = (cy + SEED_HALF_WIDTH).min(self.h);
        for y in y0..y1 {
            let row = y * self.w;
            self.v[row + x0..row + x1].fill(1.0);
        }
    }
}

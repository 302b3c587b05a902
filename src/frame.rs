use crate::palette::Rgb;
use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Zoom value that shows the frame at its fitted size.
pub(crate) const ZOOM_UNIT: u32 = 160;

/// Row-major RGBA pixels, 4 bytes each, alpha always 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RgbaFrame {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) data: Vec<u8>,
}

impl RgbaFrame {
    /// Sized from a grid that already passed `field::cell_count`, so the byte
    /// length stays well inside `usize`.
    pub(crate) fn new(width: usize, height: usize) -> Self {
        let mut data = vec![0; width * height * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub(crate) fn put(&mut self, i: usize, c: Rgb) {
        let o = i * 4;
        self.data[o] = c.r;
        self.data[o + 1] = c.g;
        self.data[o + 2] = c.b;
        self.data[o + 3] = 255;
    }

    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> Rgb {
        let o = (x + y * self.width) * 4;
        Rgb {
            r: self.data[o],
            g: self.data[o + 1],
            b: self.data[o + 2],
        }
    }

    pub(crate) fn to_png(&self) -> Result<Vec<u8>> {
        let img = RgbaImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .context("frame buffer does not match its dimensions")?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub(crate) fn save_png(&self, path: &Path) -> Result<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Where a zoomed frame lands inside a destination area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) w: i64,
    pub(crate) h: i64,
}

/// Fits `src` into `dst` keeping aspect, scales by `zoom / ZOOM_UNIT`, centres.
pub(crate) fn place(src: (usize, usize), dst: (usize, usize), zoom: u32) -> Placement {
    let (sw, sh) = (src.0.max(1) as f64, src.1.max(1) as f64);
    let (dw, dh) = (dst.0 as f64, dst.1 as f64);
    let fit = (dw / sw).min(dh / sh);
    let k = fit * zoom as f64 / ZOOM_UNIT as f64;
    let w = (sw * k).round().max(1.0) as i64;
    let h = (sh * k).round().max(1.0) as i64;
    Placement {
        x: (dst.0 as i64 - w) / 2,
        y: (dst.1 as i64 - h) / 2,
        w,
        h,
    }
}

impl Placement {
    /// Nearest source pixel for destination pixel (dx, dy), if covered.
    pub(crate) fn source(
        &self,
        dx: usize,
        dy: usize,
        src: (usize, usize),
    ) -> Option<(usize, usize)> {
        let rx = dx as i64 - self.x;
        let ry = dy as i64 - self.y;
        if rx < 0 || ry < 0 || rx >= self.w || ry >= self.h {
            return None;
        }
        let sx = (rx * src.0 as i64 / self.w) as usize;
        let sy = (ry * src.1 as i64 / self.h) as usize;
        Some((sx.min(src.0 - 1), sy.min(src.1 - 1)))
    }
}

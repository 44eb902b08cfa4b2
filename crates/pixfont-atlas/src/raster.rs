// this_file: crates/pixfont-atlas/src/raster.rs

//! The outline rasterization boundary.
//!
//! The atlas builder does not rasterize outlines itself; it drives an
//! [`OutlineRaster`] that turns font bytes plus a pack request into a packed
//! coverage atlas. Any conforming implementation can stand in - the
//! production one is [`FontdueRaster`], tests substitute stubs.

use pixfont_core::{Rect, Size};

use crate::error::{AtlasError, Result};

/// What the builder asks an outline rasterizer for.
///
/// Fields arrive pre-clamped: glyph range within [0, 255] and non-empty,
/// atlas at least 64x64, oversampling within [1, 8] per axis.
#[derive(Debug, Clone)]
pub struct PackRequest {
    pub pixel_size: f32,
    pub atlas_size: Size,
    pub oversample: Size,
    pub padding: i32,
    pub first_glyph: i32,
    pub last_glyph: i32,
}

/// One glyph as placed in the coverage atlas.
///
/// `xoff`/`yoff` are the pen-relative offset of the bitmap's top-left
/// corner, y growing downward, so a glyph above the baseline has a negative
/// `yoff`. All zero for glyphs the font has no outline for.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackedGlyph {
    pub rect: Rect,
    pub xoff: f32,
    pub yoff: f32,
    pub advance: f32,
}

/// A packed single-channel coverage atlas plus per-glyph placement data.
#[derive(Debug, Clone)]
pub struct PackedAtlas {
    /// One byte of coverage per pixel, row-major, `size` pixels.
    pub coverage: Vec<u8>,
    pub size: Size,
    /// Index-aligned with the requested glyph range.
    pub glyphs: Vec<PackedGlyph>,
    /// Vertical metrics already scaled to the requested pixel size.
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    /// Sparse kerning pairs in pixels: (prev, glyph, adjustment).
    pub kerning: Vec<(u8, u8, f32)>,
}

/// Capability boundary around an outline font rasterizer.
///
/// Implementations own parsing, rasterization and rectangle packing; the
/// builder owns validation, channel expansion and metric rounding.
pub trait OutlineRaster: Send + Sync {
    /// Identify yourself in logs and error messages.
    fn name(&self) -> &'static str;

    /// Rasterize and pack every glyph in the requested byte range.
    fn pack(&self, font_data: &[u8], request: &PackRequest) -> Result<PackedAtlas>;
}

/// Production rasterizer backed by fontdue.
///
/// Glyphs are shelf-packed in byte order with `padding` pixels between
/// boxes. Oversampling rasterizes at a multiple of the target size and
/// box-filters back down; fontdue has no per-axis oversampling, so the
/// larger of the two requested factors is used for both axes.
#[derive(Debug, Default)]
pub struct FontdueRaster;

impl FontdueRaster {
    pub fn new() -> Self {
        Self
    }

    fn rasterize(
        font: &fontdue::Font,
        ch: char,
        pixel_size: f32,
        oversample: i32,
    ) -> (fontdue::Metrics, Vec<u8>, Size) {
        if oversample <= 1 {
            let (metrics, bitmap) = font.rasterize(ch, pixel_size);
            let size = Size::new(metrics.width as i32, metrics.height as i32);
            return (metrics, bitmap, size);
        }

        let s = oversample as usize;
        let metrics = font.metrics(ch, pixel_size);
        let (hi_metrics, hi_bitmap) = font.rasterize(ch, pixel_size * oversample as f32);
        let (hi_w, hi_h) = (hi_metrics.width, hi_metrics.height);
        let w = hi_w.div_ceil(s);
        let h = hi_h.div_ceil(s);

        let mut bitmap = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                let mut sum = 0u32;
                let mut count = 0u32;
                for sy in 0..s {
                    let hy = y * s + sy;
                    if hy >= hi_h {
                        break;
                    }
                    for sx in 0..s {
                        let hx = x * s + sx;
                        if hx >= hi_w {
                            break;
                        }
                        sum += hi_bitmap[hy * hi_w + hx] as u32;
                        count += 1;
                    }
                }
                if count > 0 {
                    bitmap[y * w + x] = (sum / count) as u8;
                }
            }
        }

        (metrics, bitmap, Size::new(w as i32, h as i32))
    }
}

impl OutlineRaster for FontdueRaster {
    fn name(&self) -> &'static str {
        "fontdue"
    }

    fn pack(&self, font_data: &[u8], request: &PackRequest) -> Result<PackedAtlas> {
        let settings = fontdue::FontSettings {
            scale: request.pixel_size,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(font_data, settings)
            .map_err(|reason| AtlasError::InvalidFont(reason.to_owned()))?;

        let line = font
            .horizontal_line_metrics(request.pixel_size)
            .ok_or_else(|| AtlasError::InvalidFont("missing horizontal metrics".to_owned()))?;

        let oversample = request.oversample.width.max(request.oversample.height);
        let (atlas_w, atlas_h) = (request.atlas_size.width, request.atlas_size.height);
        let pad = request.padding.max(0);

        let mut coverage = vec![0u8; (atlas_w * atlas_h) as usize];
        let mut glyphs = Vec::with_capacity((request.last_glyph - request.first_glyph + 1) as usize);

        let mut cursor_x = pad;
        let mut cursor_y = pad;
        let mut row_height = 0i32;

        for byte in request.first_glyph..=request.last_glyph {
            let ch = char::from(byte as u8);
            if font.lookup_glyph_index(ch) == 0 {
                glyphs.push(PackedGlyph::default());
                continue;
            }

            let (metrics, bitmap, size) =
                Self::rasterize(&font, ch, request.pixel_size, oversample);
            let (w, h) = (size.width, size.height);

            if cursor_x + w + pad > atlas_w {
                cursor_x = pad;
                cursor_y += row_height + pad;
                row_height = 0;
            }
            if cursor_y + h + pad > atlas_h || cursor_x + w + pad > atlas_w {
                log::warn!(
                    "glyph atlas {}x{} overflowed at byte {}",
                    atlas_w,
                    atlas_h,
                    byte
                );
                return Err(AtlasError::PackingOverflow {
                    atlas: request.atlas_size,
                });
            }

            for row in 0..h {
                let src = (row * w) as usize;
                let dst = ((cursor_y + row) * atlas_w + cursor_x) as usize;
                coverage[dst..dst + w as usize]
                    .copy_from_slice(&bitmap[src..src + w as usize]);
            }

            glyphs.push(PackedGlyph {
                rect: Rect::new(cursor_x, cursor_y, w, h),
                xoff: metrics.xmin as f32,
                yoff: -(metrics.ymin as f32 + metrics.height as f32),
                advance: metrics.advance_width,
            });

            cursor_x += w + pad;
            row_height = row_height.max(h);
        }

        let mut kerning = Vec::new();
        for a in request.first_glyph..=request.last_glyph {
            let left = char::from(a as u8);
            if font.lookup_glyph_index(left) == 0 {
                continue;
            }
            for b in request.first_glyph..=request.last_glyph {
                let right = char::from(b as u8);
                if font.lookup_glyph_index(right) == 0 {
                    continue;
                }
                if let Some(kern) = font.horizontal_kern(left, right, request.pixel_size) {
                    if kern != 0.0 {
                        kerning.push((a as u8, b as u8, kern));
                    }
                }
            }
        }

        log::debug!(
            "packed {} glyphs ({} kerning pairs) into {}x{}",
            glyphs.len(),
            kerning.len(),
            atlas_w,
            atlas_h
        );

        Ok(PackedAtlas {
            coverage,
            size: request.atlas_size,
            glyphs,
            ascent: line.ascent,
            descent: line.descent,
            line_gap: line.line_gap,
            kerning,
        })
    }
}

// this_file: crates/pixfont-core/src/metrics.rs

//! The glyph metrics table: everything the layout engine knows about a font.
//!
//! A font here is a byte-indexed table of 256 glyphs. Each glyph carries its
//! atlas sub-rectangle, a pen-relative draw offset, and a horizontal advance;
//! ordered glyph pairs may additionally carry a signed kerning adjustment.
//! The table is assembled once by a loader (outline build or fixed sheet)
//! and is read-only afterwards.

use crate::geom::{Color, Point, Rect, Size};

/// Number of addressable glyphs. Text is interpreted byte by byte, so the
/// table never grows past one entry per byte value.
pub const GLYPH_COUNT: usize = 256;

/// Per-font glyph metrics plus the scalar layout parameters.
///
/// Indices 0-31 and 127 hold degenerate entries; `'\n'` always has advance 0
/// and a line-height box. [`GlyphMetrics::apply_control_overrides`] restores
/// those invariants after either construction path.
pub struct GlyphMetrics {
    /// Pixel size of each glyph's atlas sub-rectangle.
    pub sizes: [Size; GLYPH_COUNT],
    /// Atlas sub-rectangle per glyph, in atlas-local pixels.
    pub texture_coords: [Rect; GLYPH_COUNT],
    /// Pen-relative draw offset per glyph.
    pub offsets: [Point; GLYPH_COUNT],
    /// Horizontal pen advance per glyph.
    pub advances: [i32; GLYPH_COUNT],
    /// Line pitch in pixels.
    pub glyph_height: i32,
    /// Global baseline shift applied to every line's pen start.
    pub y_offset: i32,
    /// Lowest byte value the font actually renders.
    pub first_glyph: u8,
    /// Extra horizontal/vertical gap between glyphs and lines.
    pub spacing: Size,
    /// Outline stroke radius; 0 disables the outline passes.
    pub outline_thickness: i32,
    /// Color used by the outline passes.
    pub outline_color: Color,
    outline_offsets: Vec<Point>,
    kerning: Box<[i16]>,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphMetrics {
    pub fn new() -> Self {
        Self {
            sizes: [Size::ZERO; GLYPH_COUNT],
            texture_coords: [Rect::default(); GLYPH_COUNT],
            offsets: [Point::ZERO; GLYPH_COUNT],
            advances: [0; GLYPH_COUNT],
            glyph_height: 0,
            y_offset: 0,
            first_glyph: 32,
            spacing: Size::ZERO,
            outline_thickness: 0,
            outline_color: Color::black(),
            outline_offsets: Vec::new(),
            kerning: vec![0i16; GLYPH_COUNT * GLYPH_COUNT].into_boxed_slice(),
        }
    }

    /// Signed kerning adjustment for the ordered pair (`prev`, `glyph`).
    #[inline]
    pub fn kern(&self, prev: u8, glyph: u8) -> i32 {
        self.kerning[prev as usize * GLYPH_COUNT + glyph as usize] as i32
    }

    pub fn set_kern(&mut self, prev: u8, glyph: u8, value: i16) {
        self.kerning[prev as usize * GLYPH_COUNT + glyph as usize] = value;
    }

    pub fn clear_kerning(&mut self) {
        self.kerning.fill(0);
    }

    /// Advance of `glyph` when it follows `prev` on the same line.
    #[inline]
    pub fn advance_after(&self, prev: Option<u8>, glyph: u8) -> i32 {
        let kern = match prev {
            Some(p) => self.kern(p, glyph),
            None => 0,
        };
        kern + self.advances[glyph as usize]
    }

    pub fn has_outline(&self) -> bool {
        self.outline_thickness > 0
    }

    /// The precomputed disk of outline stroke offsets.
    pub fn outline_offsets(&self) -> &[Point] {
        &self.outline_offsets
    }

    /// Rebuild the outline offset disk from `outline_thickness`.
    ///
    /// Enumerates all integer offsets with `dx*dx + dy*dy <= r*r`, excluding
    /// the origin. An empty disk disables the outline entirely.
    pub fn update_outline_offsets(&mut self) {
        self.outline_offsets.clear();
        if self.outline_thickness <= 0 {
            return;
        }

        let radius = self.outline_thickness;
        let radius_squared = radius * radius;

        for y in -radius..=radius {
            for x in -radius..=radius {
                if x == 0 && y == 0 {
                    continue;
                }
                if x * x + y * y > radius_squared {
                    continue;
                }
                self.outline_offsets.push(Point::new(x, y));
            }
        }

        if self.outline_offsets.is_empty() {
            self.outline_thickness = 0;
        }
    }

    /// Restore the degenerate entries for DEL and `'\n'`.
    ///
    /// Both construction paths call this last, so the invariants hold no
    /// matter how the table was filled.
    pub fn apply_control_overrides(&mut self) {
        self.sizes[127].width = 1;
        self.advances[127] = 1;
        self.sizes[b'\n' as usize] = Size::new(1, self.glyph_height);
        self.advances[b'\n' as usize] = 0;
    }

    /// Override the width and advance of the space glyph.
    pub fn set_space_width(&mut self, width: i32) {
        self.sizes[32].width = width;
        self.advances[32] = width;
    }
}

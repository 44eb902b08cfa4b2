// this_file: crates/pixfont-core/src/layout.rs

//! The layout engine: from bytes to per-glyph pen positions.
//!
//! Layout is a pure function of (text, metrics, alignment). The only state
//! involved is a caller-owned [`LayoutContext`] holding two growable scratch
//! buffers, so repeated calls on a hot path never allocate once the buffers
//! have reached steady size. A multi-threaded host gives each thread its own
//! context.

use crate::geom::{Point, Size};
use crate::metrics::GlyphMetrics;

/// Horizontal alignment axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical alignment axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Combined alignment for a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Align {
    pub h: HAlign,
    pub v: VAlign,
}

impl Align {
    pub const TOP_LEFT: Align = Align::new(HAlign::Left, VAlign::Top);
    pub const CENTER: Align = Align::new(HAlign::Center, VAlign::Center);

    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }
}

impl Default for Align {
    fn default() -> Self {
        Align::TOP_LEFT
    }
}

/// Reusable scratch buffers for layout and wrapping.
///
/// Buffers only ever grow; entries past the current call's text length are
/// stale and never read because every consumer bounds iteration by the text
/// it passed in.
#[derive(Default)]
pub struct LayoutContext {
    pub(crate) positions: Vec<Point>,
    pub(crate) line_widths: Vec<i32>,
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pen positions computed by the last [`GlyphMetrics::glyph_positions`]
    /// call. Index-aligned with the input bytes; entries for control bytes
    /// are stale.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }
}

impl GlyphMetrics {
    /// Compute a pen position per input byte and, optionally, the bounding
    /// box of the laid-out text.
    ///
    /// Bytes below 32 are layout-inert except `'\n'`, which starts a new
    /// line. A pre-pass collects per-line widths, but only when the
    /// alignment (or a requested bounding box) actually needs them;
    /// left-aligned unmeasured layout runs in a single pass.
    pub fn glyph_positions(
        &self,
        text: &str,
        align: Align,
        ctx: &mut LayoutContext,
        mut box_size: Option<&mut Size>,
    ) {
        let bytes = text.as_bytes();
        let text_len = bytes.len();
        let mut max_line_width = 0i32;

        if text_len == 0 {
            if let Some(size) = box_size {
                *size = Size::new(0, self.glyph_height);
            }
            return;
        }

        if ctx.positions.len() < text_len {
            ctx.positions.resize(text_len.max(1024), Point::ZERO);
        }

        let needs_lines = align.h != HAlign::Left || box_size.is_some();

        if needs_lines {
            ctx.line_widths.clear();
            ctx.line_widths.push(0);

            let mut line = 0usize;
            let mut prev_glyph: Option<u8> = None;
            for (i, &g) in bytes.iter().enumerate() {
                if g == b'\n' {
                    line += 1;
                    ctx.line_widths.push(0);
                    prev_glyph = None;
                    continue;
                }
                if g >= 32 {
                    ctx.line_widths[line] += self.advance_after(prev_glyph, g);
                    if i + 1 != text_len && bytes[i + 1] != b'\n' {
                        ctx.line_widths[line] += self.spacing.width;
                    }
                    max_line_width = max_line_width.max(ctx.line_widths[line]);
                    prev_glyph = Some(g);
                }
            }
        }

        let mut pen = Point::new(0, self.y_offset);
        let mut line = 0usize;
        let mut prev_glyph: Option<u8> = None;

        for (i, &g) in bytes.iter().enumerate() {
            if g == b'\n' || i == 0 {
                if g == b'\n' {
                    pen.y += self.glyph_height + self.spacing.height;
                    line += 1;
                    prev_glyph = None;
                }
                let line_width = if needs_lines { ctx.line_widths[line] } else { 0 };
                pen.x = match align.h {
                    HAlign::Right => max_line_width - line_width,
                    HAlign::Center => (max_line_width - line_width) / 2,
                    HAlign::Left => 0,
                };
            }

            if g >= 32 {
                if let Some(p) = prev_glyph {
                    pen.x += self.kern(p, g);
                }
                ctx.positions[i] = pen;
                pen.x += self.advances[g as usize] + self.spacing.width;
                prev_glyph = Some(g);
            }
        }

        // Tight horizontal bounds including per-glyph draw offsets; a glyph
        // whose offset reaches left of the pen would otherwise clip at x=0.
        let mut min_x = 0i32;
        let mut max_x = 0i32;
        let mut has_glyph = false;
        for (i, &g) in bytes.iter().enumerate() {
            if g < 32 {
                continue;
            }
            let x0 = ctx.positions[i].x + self.offsets[g as usize].x;
            let x1 = x0 + self.sizes[g as usize].width;
            if !has_glyph {
                min_x = x0;
                max_x = x1;
                has_glyph = true;
            } else {
                min_x = min_x.min(x0);
                max_x = max_x.max(x1);
            }
        }

        if has_glyph && min_x < 0 {
            for (i, &g) in bytes.iter().enumerate() {
                if g >= 32 {
                    ctx.positions[i].x -= min_x;
                }
            }
            max_x -= min_x;
            min_x = 0;
        }

        if let Some(size) = box_size.take() {
            let actual_width = if has_glyph {
                max_line_width.max(max_x - min_x)
            } else {
                max_line_width
            };
            *size = Size::new(actual_width, pen.y + self.glyph_height);
        }
    }

    /// Tight bounding box of `text` under top-left, unbounded layout.
    ///
    /// This is the measurement primitive used by auto-sizing widgets and by
    /// the wrapping engine's multi-byte slow path.
    pub fn text_size(&self, text: &str, ctx: &mut LayoutContext) -> Size {
        let mut size = Size::ZERO;
        self.glyph_positions(text, Align::TOP_LEFT, ctx, Some(&mut size));
        size
    }
}

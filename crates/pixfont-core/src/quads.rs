// this_file: crates/pixfont-core/src/quads.rs

//! Clipping and quad emission: positions in, draw-ready rectangles out.
//!
//! Each visible glyph becomes a (screen rect, atlas rect) pair. Clipping a
//! pair against the viewport trims both rectangles by the same pixel amount
//! on the clipped edge, so texture sampling stays 1:1 with the screen.
//! Three boundaries are offered: a plain pair list, a pre-expanded
//! vertex/index buffer, and color-run batches for multi-colored text.

use std::collections::HashMap;

use crate::geom::{Color, Point, Rect, Size};
use crate::layout::{Align, HAlign, LayoutContext, VAlign};
use crate::metrics::GlyphMetrics;
use crate::wrap::ColorSpan;

/// A clipped screen quad and its matching atlas quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphQuad {
    pub screen: Rect,
    pub atlas: Rect,
}

/// One corner of a glyph quad, ready for GPU upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// Glyph quads pre-expanded into vertices and indices.
///
/// Four vertices and six indices per quad, counter-clockwise triangles.
/// UVs are in atlas pixels; the renderer divides by its texture size.
#[derive(Debug, Default, Clone)]
pub struct QuadBuffer {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl QuadBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn push(&mut self, screen: Rect, atlas: Rect) {
        let base = self.vertices.len() as u32;
        let (x0, y0) = (screen.left() as f32, screen.top() as f32);
        let (x1, y1) = (screen.right() as f32, screen.bottom() as f32);
        let (u0, v0) = (atlas.left() as f32, atlas.top() as f32);
        let (u1, v1) = (atlas.right() as f32, atlas.bottom() as f32);

        self.vertices.push(Vertex {
            position: [x0, y0],
            uv: [u0, v0],
        });
        self.vertices.push(Vertex {
            position: [x0, y1],
            uv: [u0, v1],
        });
        self.vertices.push(Vertex {
            position: [x1, y1],
            uv: [u1, v1],
        });
        self.vertices.push(Vertex {
            position: [x1, y0],
            uv: [u1, v0],
        });
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Offset that places a `text_box`-sized block inside `viewport` per `align`.
pub fn align_offset(align: Align, viewport: Size, text_box: Size) -> Point {
    let dx = match align.h {
        HAlign::Right => viewport.width - text_box.width,
        HAlign::Center => (viewport.width - text_box.width) / 2,
        HAlign::Left => 0,
    };
    let dy = match align.v {
        VAlign::Bottom => viewport.height - text_box.height,
        VAlign::Center => (viewport.height - text_box.height) / 2,
        VAlign::Top => 0,
    };
    Point::new(dx, dy)
}

/// Clip a glyph quad against `viewport` and translate it into place.
///
/// `screen` arrives in viewport-local coordinates and leaves in absolute
/// coordinates. Returns false when nothing of the glyph remains visible.
pub fn clip_glyph(screen: &mut Rect, atlas: &mut Rect, viewport: &Rect) -> bool {
    if screen.bottom() <= 0 || screen.right() <= 0 {
        return false;
    }

    if screen.top() < 0 {
        atlas.set_top(atlas.top() - screen.top());
        screen.set_top(0);
    }
    if screen.left() < 0 {
        atlas.set_left(atlas.left() - screen.left());
        screen.set_left(0);
    }

    screen.translate(viewport.origin());

    if !viewport.intersects(screen) {
        return false;
    }

    if screen.bottom() > viewport.bottom() {
        atlas.set_bottom(atlas.bottom() + (viewport.bottom() - screen.bottom()));
        screen.set_bottom(viewport.bottom());
    }
    if screen.right() > viewport.right() {
        atlas.set_right(atlas.right() + (viewport.right() - screen.right()));
        screen.set_right(viewport.right());
    }

    true
}

impl GlyphMetrics {
    fn glyph_quad(
        &self,
        glyph: u8,
        position: Point,
        offset: Point,
        viewport: &Rect,
        region: Option<Point>,
    ) -> Option<GlyphQuad> {
        let g = glyph as usize;
        let mut screen = Rect::at(position + offset + self.offsets[g], self.sizes[g]);
        let mut atlas = self.texture_coords[g];

        if !clip_glyph(&mut screen, &mut atlas, viewport) {
            return None;
        }
        if let Some(origin) = region {
            atlas.translate(origin);
        }
        Some(GlyphQuad { screen, atlas })
    }

    /// Emit one clipped quad pair per visible glyph.
    ///
    /// `positions` comes from [`GlyphMetrics::glyph_positions`] for the same
    /// text. `region` is the origin of the font texture inside a shared
    /// atlas, when there is one.
    pub fn text_quads(
        &self,
        text: &str,
        text_box: Size,
        align: Align,
        viewport: Rect,
        positions: &[Point],
        region: Option<Point>,
    ) -> Vec<GlyphQuad> {
        let mut list = Vec::new();
        if !viewport.is_valid() {
            return list;
        }
        list.reserve(text.len());

        let offset = align_offset(align, viewport.size(), text_box);
        for (i, &g) in text.as_bytes().iter().enumerate() {
            if g < 32 {
                continue;
            }
            if let Some(quad) = self.glyph_quad(g, positions[i], offset, &viewport, region) {
                list.push(quad);
            }
        }
        list
    }

    /// Like [`GlyphMetrics::text_quads`], but written into a reusable
    /// vertex/index buffer. The buffer is cleared first.
    pub fn fill_quads(
        &self,
        buffer: &mut QuadBuffer,
        text: &str,
        text_box: Size,
        align: Align,
        viewport: Rect,
        positions: &[Point],
        region: Option<Point>,
    ) {
        buffer.clear();
        if !viewport.is_valid() {
            return;
        }

        let offset = align_offset(align, viewport.size(), text_box);
        for (i, &g) in text.as_bytes().iter().enumerate() {
            if g < 32 {
                continue;
            }
            if let Some(quad) = self.glyph_quad(g, positions[i], offset, &viewport, region) {
                buffer.push(quad.screen, quad.atlas);
            }
        }
    }

    /// Single-color draw batches: outline passes first, fill pass last.
    ///
    /// The outline batches reuse the clipped fill quads translated by each
    /// outline offset, matching how an immediate-mode caller would submit
    /// them behind the fill.
    pub fn text_batches(
        &self,
        text: &str,
        color: Color,
        text_box: Size,
        align: Align,
        viewport: Rect,
        positions: &[Point],
        region: Option<Point>,
    ) -> Vec<(Color, Vec<GlyphQuad>)> {
        let quads = self.text_quads(text, text_box, align, viewport, positions, region);
        let mut batches = Vec::new();

        if self.has_outline() && !quads.is_empty() {
            for &off in self.outline_offsets() {
                if off.is_zero() {
                    continue;
                }
                let translated: Vec<GlyphQuad> = quads
                    .iter()
                    .map(|q| GlyphQuad {
                        screen: q.screen.translated(off),
                        atlas: q.atlas,
                    })
                    .collect();
                batches.push((self.outline_color, translated));
            }
        }

        batches.push((color, quads));
        batches
    }

    /// Layout + batch in one call; the common entry point for a host that
    /// just wants to draw a string into a rectangle.
    pub fn draw_text(
        &self,
        text: &str,
        color: Color,
        align: Align,
        viewport: Rect,
        ctx: &mut LayoutContext,
        region: Option<Point>,
    ) -> Vec<(Color, Vec<GlyphQuad>)> {
        let mut text_box = Size::ZERO;
        self.glyph_positions(text, align, ctx, Some(&mut text_box));
        // positions() is longer than text for short strings; text_quads
        // bounds iteration by the text itself
        let positions: Vec<Point> = ctx.positions().to_vec();
        self.text_batches(text, color, text_box, align, viewport, &positions, region)
    }

    /// Color-run draw batches.
    ///
    /// Walks the text once, switching the destination batch whenever the
    /// byte index reaches the next run's start. Runs resolving to the same
    /// RGBA share one batch even when non-contiguous, which keeps the draw
    /// call count down. Outline passes are emitted first, each clipped
    /// against the viewport translated by its offset.
    pub fn color_quads(
        &self,
        text: &str,
        spans: &[ColorSpan],
        text_box: Size,
        align: Align,
        viewport: Rect,
        positions: &[Point],
        region: Option<Point>,
    ) -> Vec<(Color, QuadBuffer)> {
        let mut batches: Vec<(Color, QuadBuffer)> = Vec::new();
        if !viewport.is_valid() {
            return batches;
        }

        if self.has_outline() {
            for &off in self.outline_offsets() {
                if off.is_zero() {
                    continue;
                }
                let mut buffer = QuadBuffer::new();
                self.fill_quads(
                    &mut buffer,
                    text,
                    text_box,
                    align,
                    viewport.translated(off),
                    positions,
                    region,
                );
                batches.push((self.outline_color, buffer));
            }
        }

        let offset = align_offset(align, viewport.size(), text_box);
        let outline_batches = batches.len();
        let mut batch_by_key: HashMap<u32, usize> = HashMap::new();
        let mut current = Color::rgba(0, 0, 0, 0);
        let mut next_switch = 0usize;
        let mut span_i = 0usize;
        let mut batch = usize::MAX;

        for (i, &g) in text.as_bytes().iter().enumerate() {
            if i >= next_switch {
                if span_i < spans.len() {
                    current = spans[span_i].color;
                }
                next_switch = spans
                    .get(span_i + 1)
                    .map(|s| s.start)
                    .unwrap_or(text.len());
                span_i += 1;

                batch = *batch_by_key.entry(current.key()).or_insert_with(|| {
                    batches.push((current, QuadBuffer::new()));
                    batches.len() - 1
                });
            }

            if g < 32 {
                continue;
            }
            if let Some(quad) = self.glyph_quad(g, positions[i], offset, &viewport, region) {
                batches[batch].1.push(quad.screen, quad.atlas);
            }
        }

        debug_assert!(batches.len() >= outline_batches);
        batches
    }
}

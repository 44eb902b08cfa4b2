//! Pixfont Core: from bytes to draw-ready glyph quads
//!
//! Text enters as a byte string, exits as clipped (screen, atlas) rectangle
//! pairs a renderer can submit directly. This crate holds everything between
//! those two points for byte-indexed bitmap fonts:
//!
//! 1. **Metrics** - the 256-glyph table a loader fills once per font
//! 2. **Layout** - per-byte pen positions, alignment, bounding boxes
//! 3. **Wrapping** - line breaks against a pixel width, hyphenation, CJK
//! 4. **Quads** - viewport clipping, outline passes, color-run batching
//!
//! ## A Minimal Round Trip
//!
//! ```rust
//! use pixfont_core::{Align, Color, GlyphMetrics, LayoutContext, Rect, Size};
//!
//! // a loader normally fills this; fake a 10px-advance font here
//! let mut font = GlyphMetrics::new();
//! font.glyph_height = 16;
//! for g in 32..256 {
//!     font.advances[g] = 10;
//!     font.sizes[g] = Size::new(10, 16);
//! }
//! font.apply_control_overrides();
//!
//! let mut ctx = LayoutContext::new();
//! let wrapped = font.wrap_text("hello world", 64, &Default::default(), &mut ctx, None);
//! let batches = font.draw_text(
//!     &wrapped,
//!     Color::white(),
//!     Align::TOP_LEFT,
//!     Rect::new(0, 0, 64, 48),
//!     &mut ctx,
//!     None,
//! );
//! assert!(!batches.is_empty());
//! ```
//!
//! ## What Lives Elsewhere
//!
//! Building the metrics table from a TrueType file or a glyph sheet is the
//! `pixfont-atlas` crate's job; rasterizing the emitted quads belongs to the
//! host renderer. Layout and wrapping are pure functions of their inputs
//! plus a caller-owned [`LayoutContext`], so a multi-threaded host simply
//! keeps one context per thread.

pub mod geom;
pub mod layout;
pub mod metrics;
pub mod quads;
pub mod wrap;

pub use geom::{Color, Point, Rect, Size};
pub use layout::{Align, HAlign, LayoutContext, VAlign};
pub use metrics::{GlyphMetrics, GLYPH_COUNT};
pub use quads::{align_offset, clip_glyph, GlyphQuad, QuadBuffer, Vertex};
pub use wrap::{
    shift_color_spans, ColorSpan, HyphenationMode, OverflowWrap, WordBreak, WrapOptions,
};

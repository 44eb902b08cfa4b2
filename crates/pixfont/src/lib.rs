//! Pixfont - byte-indexed bitmap font layout and atlas building
//!
//! The crate covers the path from a font file (TrueType outline or
//! pre-rendered glyph sheet) to draw-ready glyph quads:
//!
//! 1. Load: build an RGBA atlas and a 256-entry metrics table
//! 2. Wrap: break text against a pixel width, with hyphenation and CJK rules
//! 3. Layout: per-byte pen positions, alignment, bounding boxes
//! 4. Emit: clipped (screen, atlas) quads, vertex buffers or color batches
//!
//! Steps 2-4 are pure and allocation-reusing; a caller keeps one
//! [`LayoutContext`] per thread and feeds it to every call.
//!
//! # Example
//!
//! ```rust,no_run
//! use pixfont::{
//!     load_font, Align, AtlasBuilder, AtlasSettings, Color, FontConfig, FontSource,
//!     LayoutContext, Rect,
//! };
//!
//! # fn main() -> pixfont::Result<()> {
//! let config = FontConfig::new(FontSource::Outline(AtlasSettings {
//!     file: "fonts/verdana.ttf".into(),
//!     pixel_size: 14.0,
//!     ..AtlasSettings::default()
//! }));
//! let font = load_font(&config, &AtlasBuilder::new())?;
//!
//! let mut ctx = LayoutContext::new();
//! let text = font
//!     .metrics
//!     .wrap_text("the quick brown fox", 120, &Default::default(), &mut ctx, None);
//! let batches = font.metrics.draw_text(
//!     &text,
//!     Color::white(),
//!     Align::TOP_LEFT,
//!     Rect::new(0, 0, 120, 60),
//!     &mut ctx,
//!     None,
//! );
//! # let _ = batches;
//! # Ok(())
//! # }
//! ```

pub use pixfont_core::{
    align_offset, clip_glyph, shift_color_spans, Align, Color, ColorSpan, GlyphMetrics,
    GlyphQuad, HAlign, HyphenationMode, LayoutContext, OverflowWrap, Point, QuadBuffer, Rect,
    Size, VAlign, Vertex, WordBreak, WrapOptions, GLYPH_COUNT,
};

pub use pixfont_atlas::{
    load_font, AtlasBuildResult, AtlasBuilder, AtlasError, AtlasImage, AtlasSettings,
    FontConfig, FontSource, FontdueRaster, GlyphWidth, LoadedFont, OutlineRaster, PackRequest,
    PackedAtlas, PackedGlyph, Result, SheetSettings,
};

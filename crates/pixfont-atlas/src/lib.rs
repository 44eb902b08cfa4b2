//! Pixfont Atlas: font loading for the pixfont metrics tables
//!
//! This crate produces the [`GlyphMetrics`](pixfont_core::GlyphMetrics)
//! table and RGBA atlas image that `pixfont-core` lays text out with.
//! Two build strategies are supported:
//!
//! - **Outline** ([`AtlasSettings`]): parse a TrueType/OpenType file,
//!   rasterize a byte range of glyphs into a packed coverage atlas and
//!   derive metrics from the font's own tables.
//! - **Sheet** ([`SheetSettings`]): slice a pre-rendered glyph grid image,
//!   with per-glyph widths either fixed or detected from alpha coverage.
//!
//! Rasterization sits behind the [`OutlineRaster`] trait so hosts can
//! substitute their own rasterizer; [`FontdueRaster`] is the default.
//!
//! ```rust,no_run
//! use pixfont_atlas::{load_font, AtlasBuilder, AtlasSettings, FontConfig, FontSource};
//!
//! # fn main() -> pixfont_atlas::Result<()> {
//! let config = FontConfig::new(FontSource::Outline(AtlasSettings {
//!     file: "fonts/verdana.ttf".into(),
//!     pixel_size: 14.0,
//!     ..AtlasSettings::default()
//! }));
//! let font = load_font(&config, &AtlasBuilder::new())?;
//! assert!(font.metrics.glyph_height > 0);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod font;
pub mod raster;

pub use builder::{AtlasBuildResult, AtlasBuilder, AtlasImage, AtlasSettings};
pub use error::{AtlasError, Result};
pub use font::{load_font, FontConfig, FontSource, GlyphWidth, LoadedFont, SheetSettings};
pub use raster::{FontdueRaster, OutlineRaster, PackRequest, PackedAtlas, PackedGlyph};

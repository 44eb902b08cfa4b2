// this_file: crates/pixfont-atlas/src/builder.rs

//! Atlas building: font bytes in, RGBA atlas plus metric tables out.
//!
//! [`AtlasBuilder`] validates the settings, drives an [`OutlineRaster`] and
//! converts its output into the integer tables the metrics layer wants.
//! The builder is stateless; one instance can build any number of atlases.

use std::fs;
use std::path::PathBuf;

use pixfont_core::{Point, Rect, Size, GLYPH_COUNT};

use crate::error::{AtlasError, Result};
use crate::raster::{FontdueRaster, OutlineRaster, PackRequest};

/// An RGBA8 atlas image, row-major, `size.width * size.height * 4` bytes.
#[derive(Debug, Clone)]
pub struct AtlasImage {
    pub size: Size,
    pub pixels: Vec<u8>,
}

/// Parameters for building a glyph atlas from an outline font file.
#[derive(Debug, Clone)]
pub struct AtlasSettings {
    pub file: PathBuf,
    pub pixel_size: f32,
    pub atlas_size: Size,
    pub oversample: Size,
    pub padding: i32,
    pub first_glyph: i32,
    pub last_glyph: i32,
}

impl Default for AtlasSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            pixel_size: 16.0,
            atlas_size: Size::new(512, 512),
            oversample: Size::new(1, 1),
            padding: 1,
            first_glyph: 32,
            last_glyph: 255,
        }
    }
}

/// Everything a build produces: the atlas image plus per-glyph tables
/// indexed by byte value, with unrequested glyphs left at their defaults.
pub struct AtlasBuildResult {
    pub image: AtlasImage,
    pub sizes: [Size; GLYPH_COUNT],
    pub texture_coords: [Rect; GLYPH_COUNT],
    pub offsets: [Point; GLYPH_COUNT],
    pub advances: [i32; GLYPH_COUNT],
    /// Line pitch: `round(ascent - descent + line_gap)`.
    pub glyph_height: i32,
    /// Distance from line top to the baseline, in pixels.
    pub baseline: i32,
    /// Sparse kerning pairs, rounded to pixels and clamped to i16.
    pub kerning: Vec<(u8, u8, i16)>,
}

/// Drives an [`OutlineRaster`] and post-processes its output.
pub struct AtlasBuilder {
    raster: Box<dyn OutlineRaster>,
}

impl Default for AtlasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AtlasBuilder {
    /// A builder backed by the production rasterizer.
    pub fn new() -> Self {
        Self {
            raster: Box::new(FontdueRaster::new()),
        }
    }

    /// A builder backed by a caller-supplied rasterizer.
    pub fn with_raster(raster: Box<dyn OutlineRaster>) -> Self {
        Self { raster }
    }

    pub fn build(&self, settings: &AtlasSettings) -> Result<AtlasBuildResult> {
        if settings.file.as_os_str().is_empty() {
            return Err(AtlasError::MissingPath);
        }

        let font_data = fs::read(&settings.file).map_err(|source| AtlasError::Io {
            path: settings.file.clone(),
            source,
        })?;
        if font_data.is_empty() {
            return Err(AtlasError::EmptyFile(settings.file.clone()));
        }

        let first_glyph = settings.first_glyph.clamp(0, 255);
        let last_glyph = settings.last_glyph.clamp(0, 255);
        if last_glyph < first_glyph {
            return Err(AtlasError::EmptyGlyphRange {
                first: settings.first_glyph,
                last: settings.last_glyph,
            });
        }

        let request = PackRequest {
            pixel_size: settings.pixel_size,
            atlas_size: Size::new(
                settings.atlas_size.width.max(64),
                settings.atlas_size.height.max(64),
            ),
            oversample: Size::new(
                settings.oversample.width.clamp(1, 8),
                settings.oversample.height.clamp(1, 8),
            ),
            padding: settings.padding,
            first_glyph,
            last_glyph,
        };

        log::debug!(
            "building {}x{} atlas for '{}' at {}px via {}",
            request.atlas_size.width,
            request.atlas_size.height,
            settings.file.display(),
            settings.pixel_size,
            self.raster.name()
        );

        let packed = self.raster.pack(&font_data, &request)?;

        let mut pixels = vec![0u8; packed.coverage.len() * 4];
        for (i, &alpha) in packed.coverage.iter().enumerate() {
            pixels[i * 4] = 255;
            pixels[i * 4 + 1] = 255;
            pixels[i * 4 + 2] = 255;
            pixels[i * 4 + 3] = alpha;
        }

        let mut result = AtlasBuildResult {
            image: AtlasImage {
                size: packed.size,
                pixels,
            },
            sizes: [Size::ZERO; GLYPH_COUNT],
            texture_coords: [Rect::default(); GLYPH_COUNT],
            offsets: [Point::ZERO; GLYPH_COUNT],
            advances: [0; GLYPH_COUNT],
            glyph_height: (packed.ascent - packed.descent + packed.line_gap).round() as i32,
            baseline: packed.ascent.round() as i32,
            kerning: Vec::with_capacity(packed.kerning.len()),
        };

        for (i, glyph) in packed.glyphs.iter().enumerate() {
            let g = first_glyph as usize + i;
            result.sizes[g] = glyph.rect.size();
            result.texture_coords[g] = glyph.rect;
            result.offsets[g] = Point::new(glyph.xoff.floor() as i32, glyph.yoff.floor() as i32);
            result.advances[g] = glyph.advance.round() as i32;
        }

        for &(a, b, kern) in &packed.kerning {
            let value = kern.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16;
            if value != 0 {
                result.kerning.push((a, b, value));
            }
        }

        Ok(result)
    }
}

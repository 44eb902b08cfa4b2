// this_file: crates/pixfont-atlas/src/font.rs

//! Font assembly: turn a build strategy plus overrides into a filled
//! [`GlyphMetrics`] table and its backing atlas image.
//!
//! Two strategies exist. The outline path drives the [`AtlasBuilder`] and
//! then normalizes the vertical metrics so every glyph offset is
//! non-negative. The sheet path slices a pre-rendered glyph grid, with
//! glyph widths either fixed or detected from the alpha channel.

use std::path::PathBuf;

use pixfont_core::{Color, GlyphMetrics, Point, Rect, Size, GLYPH_COUNT};

use crate::builder::{AtlasBuilder, AtlasImage, AtlasSettings};
use crate::error::{AtlasError, Result};

/// How the sheet path determines each glyph's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphWidth {
    /// Every glyph gets the same width.
    Fixed(i32),
    /// Scan each cell's alpha channel for the rightmost filled column.
    Auto,
}

/// Parameters for slicing a pre-rendered glyph sheet.
#[derive(Debug, Clone)]
pub struct SheetSettings {
    pub image: PathBuf,
    /// Grid cell size; glyphs are laid out row-major from `first_glyph`.
    pub glyph_size: Size,
    /// Line pitch in pixels.
    pub height: i32,
    pub glyph_width: GlyphWidth,
}

/// The two ways a font's glyph data can be produced.
#[derive(Debug, Clone)]
pub enum FontSource {
    Outline(AtlasSettings),
    Sheet(SheetSettings),
}

/// A font definition: the build strategy plus the layout overrides that
/// apply regardless of strategy.
#[derive(Debug, Clone)]
pub struct FontConfig {
    pub source: FontSource,
    /// Extra horizontal/vertical gap between glyphs and lines.
    pub spacing: Size,
    /// Lowest byte value the sheet grid starts at.
    pub first_glyph: u8,
    /// Baseline shift; folded into the computed shift on the outline path.
    pub y_offset: Option<i32>,
    pub outline_thickness: i32,
    pub outline_color: Color,
    /// Overrides the space glyph's width and advance.
    pub space_width: Option<i32>,
    /// Overrides the computed line pitch (outline path only).
    pub height: Option<i32>,
}

impl FontConfig {
    pub fn new(source: FontSource) -> Self {
        Self {
            source,
            spacing: Size::ZERO,
            first_glyph: 32,
            y_offset: None,
            outline_thickness: 0,
            outline_color: Color::black(),
            space_width: None,
            height: None,
        }
    }
}

/// A fully assembled font: the metrics table the layout engine reads and
/// the RGBA atlas the host uploads as a texture.
pub struct LoadedFont {
    pub metrics: GlyphMetrics,
    pub atlas: AtlasImage,
}

/// Assemble a font from its config.
pub fn load_font(config: &FontConfig, builder: &AtlasBuilder) -> Result<LoadedFont> {
    match &config.source {
        FontSource::Outline(settings) => load_outline(config, settings, builder),
        FontSource::Sheet(settings) => {
            let sheet = image::open(&settings.image)
                .map_err(|source| AtlasError::SheetDecode {
                    path: settings.image.clone(),
                    source,
                })?
                .to_rgba8();
            let metrics = sheet_metrics(&sheet, settings, config)?;
            let (width, height) = sheet.dimensions();
            Ok(LoadedFont {
                metrics,
                atlas: AtlasImage {
                    size: Size::new(width as i32, height as i32),
                    pixels: sheet.into_raw(),
                },
            })
        }
    }
}

fn base_metrics(config: &FontConfig) -> GlyphMetrics {
    let mut metrics = GlyphMetrics::new();
    metrics.spacing = config.spacing;
    metrics.first_glyph = config.first_glyph;
    metrics.outline_thickness = config.outline_thickness.max(0);
    metrics.outline_color = config.outline_color;
    metrics.update_outline_offsets();
    metrics
}

fn load_outline(
    config: &FontConfig,
    settings: &AtlasSettings,
    builder: &AtlasBuilder,
) -> Result<LoadedFont> {
    let result = builder.build(settings)?;

    let mut metrics = base_metrics(config);
    metrics.glyph_height = config.height.unwrap_or(result.glyph_height);

    let mut min_y = 0;
    let mut max_y = 0;
    for g in 0..GLYPH_COUNT {
        metrics.sizes[g] = result.sizes[g];
        metrics.texture_coords[g] = result.texture_coords[g];
        metrics.offsets[g] = result.offsets[g];
        metrics.advances[g] = result.advances[g];
        min_y = min_y.min(metrics.offsets[g].y);
        max_y = max_y.max(metrics.offsets[g].y + metrics.sizes[g].height);
    }
    for &(a, b, kern) in &result.kerning {
        metrics.set_kern(a, b, kern);
    }

    // Shift every glyph down so the topmost one starts at y = 0, and fold
    // the shift into the per-line baseline offset.
    let y_shift = -min_y;
    for offset in &mut metrics.offsets {
        offset.y += y_shift;
    }
    metrics.y_offset = config.y_offset.unwrap_or(0) + y_shift;
    metrics.glyph_height = metrics.glyph_height.max(max_y - min_y);

    metrics.apply_control_overrides();

    // Fonts without a space outline still need a usable space advance.
    if metrics.sizes[32].width == 0 {
        let fallback = metrics.advances[32].max(metrics.glyph_height / 4);
        metrics.set_space_width(fallback);
    }
    if let Some(width) = config.space_width {
        metrics.set_space_width(width);
    }

    Ok(LoadedFont {
        metrics,
        atlas: result.image,
    })
}

/// Fill a metrics table from a decoded glyph sheet.
fn sheet_metrics(
    sheet: &image::RgbaImage,
    settings: &SheetSettings,
    config: &FontConfig,
) -> Result<GlyphMetrics> {
    let cell = settings.glyph_size;
    if cell.width <= 0 || cell.height <= 0 {
        return Err(AtlasError::Sheet(format!(
            "invalid glyph cell size {}x{}",
            cell.width, cell.height
        )));
    }

    let sheet_width = sheet.width() as i32;
    let columns = sheet_width / cell.width;
    if columns == 0 {
        return Err(AtlasError::Sheet(format!(
            "sheet is {sheet_width}px wide, narrower than one {}px cell",
            cell.width
        )));
    }

    let mut metrics = base_metrics(config);
    metrics.glyph_height = settings.height;

    let first = metrics.first_glyph as usize;
    match settings.glyph_width {
        GlyphWidth::Fixed(width) => {
            for g in first..GLYPH_COUNT {
                metrics.sizes[g] = Size::new(width, metrics.glyph_height);
            }
        }
        GlyphWidth::Auto => {
            for g in first..GLYPH_COUNT {
                let index = (g - first) as i32;
                let cell_rect = Rect::new(
                    (index % columns) * cell.width,
                    (index / columns) * cell.height,
                    cell.width,
                    metrics.glyph_height,
                );
                let width = detect_glyph_width(sheet, &cell_rect);
                metrics.sizes[g] = Size::new(width, metrics.glyph_height);
            }
        }
    }

    metrics.set_space_width(config.space_width.unwrap_or(cell.width));
    // overrides come first so the grid pass derives matching atlas widths
    metrics.apply_control_overrides();

    for g in first..GLYPH_COUNT {
        let index = (g - first) as i32;
        metrics.texture_coords[g] = Rect::new(
            (index % columns) * cell.width,
            (index / columns) * cell.height,
            metrics.sizes[g].width,
            metrics.glyph_height,
        );
        metrics.offsets[g] = Point::ZERO;
        metrics.advances[g] = metrics.sizes[g].width;
    }

    // the grid pass rewrote the newline advance from its 1px cell
    metrics.apply_control_overrides();

    Ok(metrics)
}

/// Width of the glyph in `cell`: one past its rightmost column with any
/// non-transparent pixel, or the full cell width for a blank cell.
fn detect_glyph_width(sheet: &image::RgbaImage, cell: &Rect) -> i32 {
    let mut width = cell.width;
    for x in cell.left()..cell.right() {
        if x < 0 || x as u32 >= sheet.width() {
            continue;
        }
        let mut filled = false;
        for y in cell.top()..cell.bottom() {
            if y < 0 || y as u32 >= sheet.height() {
                continue;
            }
            if sheet.get_pixel(x as u32, y as u32)[3] != 0 {
                filled = true;
                break;
            }
        }
        if filled {
            width = x - cell.left() + 1;
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{OutlineRaster, PackRequest, PackedAtlas, PackedGlyph};

    struct StubRaster {
        atlas: PackedAtlas,
    }

    impl OutlineRaster for StubRaster {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn pack(&self, _font_data: &[u8], _request: &PackRequest) -> Result<PackedAtlas> {
            Ok(self.atlas.clone())
        }
    }

    /// Two glyphs for the range starting at space: an empty space and an
    /// 'A'-alike reaching 10px above and 2px below the baseline.
    fn stub_atlas() -> PackedAtlas {
        PackedAtlas {
            coverage: vec![0; 64 * 64],
            size: Size::new(64, 64),
            glyphs: vec![
                PackedGlyph::default(),
                PackedGlyph {
                    rect: Rect::new(1, 1, 6, 12),
                    xoff: 0.0,
                    yoff: -10.0,
                    advance: 7.0,
                },
            ],
            ascent: 12.0,
            descent: -4.0,
            line_gap: 0.0,
            kerning: Vec::new(),
        }
    }

    fn outline_config(path: &std::path::Path) -> FontConfig {
        FontConfig::new(FontSource::Outline(AtlasSettings {
            file: path.to_path_buf(),
            first_glyph: 32,
            last_glyph: 33,
            ..AtlasSettings::default()
        }))
    }

    fn stub_builder() -> AtlasBuilder {
        AtlasBuilder::with_raster(Box::new(StubRaster {
            atlas: stub_atlas(),
        }))
    }

    fn temp_font_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, b"stub").unwrap();
        path
    }

    #[test]
    fn outline_offsets_are_normalized_to_non_negative() {
        let path = temp_font_file("pixfont-font-normalize.ttf");
        let font = load_font(&outline_config(&path), &stub_builder()).unwrap();
        let m = &font.metrics;

        // glyph 33 had offset y = -10; the shift moves it to 0 and lands
        // in y_offset instead
        assert_eq!(m.offsets[33], Point::new(0, 0));
        assert_eq!(m.y_offset, 10);
        assert_eq!(m.glyph_height, 16);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn custom_y_offset_is_added_to_the_shift() {
        let path = temp_font_file("pixfont-font-yoffset.ttf");
        let mut config = outline_config(&path);
        config.y_offset = Some(-3);
        let font = load_font(&config, &stub_builder()).unwrap();

        assert_eq!(font.metrics.y_offset, 7);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn glyph_height_grows_to_the_observed_extent() {
        let path = temp_font_file("pixfont-font-height.ttf");
        let mut config = outline_config(&path);
        // requested pitch smaller than the -10..=2 glyph extent of 12
        config.height = Some(5);
        let font = load_font(&config, &stub_builder()).unwrap();

        assert_eq!(font.metrics.glyph_height, 12);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn empty_space_glyph_gets_a_fallback_width() {
        let path = temp_font_file("pixfont-font-space.ttf");
        let font = load_font(&outline_config(&path), &stub_builder()).unwrap();
        let m = &font.metrics;

        // max(advance 0, glyph_height 16 / 4)
        assert_eq!(m.sizes[32].width, 4);
        assert_eq!(m.advances[32], 4);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn explicit_space_width_wins() {
        let path = temp_font_file("pixfont-font-space-override.ttf");
        let mut config = outline_config(&path);
        config.space_width = Some(9);
        let font = load_font(&config, &stub_builder()).unwrap();

        assert_eq!(font.metrics.advances[32], 9);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn newline_stays_degenerate_after_outline_load() {
        let path = temp_font_file("pixfont-font-newline.ttf");
        let font = load_font(&outline_config(&path), &stub_builder()).unwrap();

        assert_eq!(font.metrics.advances[b'\n' as usize], 0);
        assert_eq!(font.metrics.sizes[b'\n' as usize].height, 16);
        let _ = std::fs::remove_file(path);
    }

    /// A 2x1-cell sheet of 4x6 cells. The first cell (space) is blank;
    /// the second has filled pixels in columns 0..=2.
    fn test_sheet() -> image::RgbaImage {
        image::RgbaImage::from_fn(8, 6, |x, y| {
            if x >= 4 && x <= 6 && y == 2 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        })
    }

    fn sheet_config() -> (SheetSettings, FontConfig) {
        let settings = SheetSettings {
            image: PathBuf::from("unused.png"),
            glyph_size: Size::new(4, 6),
            height: 6,
            glyph_width: GlyphWidth::Auto,
        };
        let config = FontConfig::new(FontSource::Sheet(settings.clone()));
        (settings, config)
    }

    #[test]
    fn auto_width_finds_the_rightmost_filled_column() {
        let (settings, config) = sheet_config();
        let m = sheet_metrics(&test_sheet(), &settings, &config).unwrap();

        assert_eq!(m.sizes[33].width, 3);
        assert_eq!(m.advances[33], 3);
    }

    #[test]
    fn blank_cell_falls_back_to_full_cell_width() {
        let (settings, config) = sheet_config();
        let m = sheet_metrics(&test_sheet(), &settings, &config).unwrap();

        // glyph 34 is past the sheet's cells entirely
        assert_eq!(m.sizes[34].width, 4);
        // the space cell is blank but the default space width applies
        assert_eq!(m.sizes[32].width, 4);
        assert_eq!(m.advances[32], 4);
    }

    #[test]
    fn sheet_texture_coords_are_row_major() {
        let (mut settings, config) = sheet_config();
        settings.glyph_width = GlyphWidth::Fixed(4);
        let m = sheet_metrics(&test_sheet(), &settings, &config).unwrap();

        assert_eq!(m.texture_coords[32], Rect::new(0, 0, 4, 6));
        assert_eq!(m.texture_coords[33], Rect::new(4, 0, 4, 6));
        // two columns per row, so glyph 34 wraps to the next row
        assert_eq!(m.texture_coords[34], Rect::new(0, 6, 4, 6));
    }

    #[test]
    fn sheet_del_atlas_width_matches_its_size() {
        let (settings, config) = sheet_config();
        let m = sheet_metrics(&test_sheet(), &settings, &config).unwrap();

        assert_eq!(m.sizes[127].width, 1);
        assert_eq!(m.advances[127], 1);
        assert_eq!(m.texture_coords[127].width, 1);
    }

    #[test]
    fn sheet_space_width_override_applies() {
        let (settings, mut config) = sheet_config();
        config.space_width = Some(2);
        let m = sheet_metrics(&test_sheet(), &settings, &config).unwrap();

        assert_eq!(m.sizes[32].width, 2);
        assert_eq!(m.advances[32], 2);
    }

    #[test]
    fn sheet_newline_is_degenerate_even_below_first_glyph() {
        let (settings, mut config) = sheet_config();
        config.first_glyph = 0;
        let m = sheet_metrics(&test_sheet(), &settings, &config).unwrap();

        assert_eq!(m.advances[b'\n' as usize], 0);
        assert_eq!(m.sizes[b'\n' as usize], Size::new(1, 6));
    }

    #[test]
    fn invalid_cell_size_is_rejected() {
        let (mut settings, config) = sheet_config();
        settings.glyph_size = Size::new(0, 6);
        assert!(matches!(
            sheet_metrics(&test_sheet(), &settings, &config),
            Err(AtlasError::Sheet(_))
        ));
    }
}

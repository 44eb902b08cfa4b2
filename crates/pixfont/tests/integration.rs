//! End-to-end flows: load a font, wrap text, lay it out and emit quads.

// this_file: crates/pixfont/tests/integration.rs

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use pixfont::{
    load_font, Align, AtlasBuilder, AtlasSettings, Color, ColorSpan, FontConfig, FontSource,
    GlyphMetrics, GlyphWidth, LayoutContext, OutlineRaster, PackRequest, PackedAtlas,
    PackedGlyph, Point, Rect, SheetSettings, Size, WrapOptions,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Uniform synthetic table: 10px advances, 16px lines.
fn test_metrics() -> GlyphMetrics {
    let mut m = GlyphMetrics::new();
    m.glyph_height = 16;
    for g in 32..256 {
        m.advances[g] = 10;
        m.sizes[g] = Size::new(10, 16);
        m.texture_coords[g] = Rect::new(((g - 32) % 16) as i32 * 10, ((g - 32) / 16) as i32 * 16, 10, 16);
    }
    m.apply_control_overrides();
    m
}

#[test]
fn wrap_then_draw_emits_one_quad_per_visible_glyph() {
    init_logs();
    let m = test_metrics();
    let mut ctx = LayoutContext::new();

    let wrapped = m.wrap_text("hello world", 64, &WrapOptions::default(), &mut ctx, None);
    assert_eq!(wrapped, "hello \nworld");

    let batches = m.draw_text(
        &wrapped,
        Color::white(),
        Align::TOP_LEFT,
        Rect::new(0, 0, 64, 48),
        &mut ctx,
        None,
    );

    assert_eq!(batches.len(), 1);
    // the newline is invisible, everything else draws
    assert_eq!(batches[0].1.len(), 11);
    // second line starts one line pitch down
    assert!(batches[0].1.iter().any(|q| q.screen.top() == 16));
}

#[test]
fn color_spans_survive_wrapping_and_drive_the_batches() {
    init_logs();
    let m = test_metrics();
    let mut ctx = LayoutContext::new();
    let red = Color::rgba(255, 0, 0, 255);
    let green = Color::rgba(0, 255, 0, 255);
    let mut spans = vec![ColorSpan::new(0, red), ColorSpan::new(4, green)];

    let wrapped = m.wrap_text(
        "red green",
        45,
        &WrapOptions::default(),
        &mut ctx,
        Some(&mut spans),
    );
    assert_eq!(wrapped, "red \ngreen");
    // the break landed exactly at the span boundary, so the start stays
    assert_eq!(spans[1].start, 4);

    let mut text_box = Size::ZERO;
    m.glyph_positions(&wrapped, Align::TOP_LEFT, &mut ctx, Some(&mut text_box));
    let positions = ctx.positions().to_vec();
    let batches = m.color_quads(
        &wrapped,
        &spans,
        text_box,
        Align::TOP_LEFT,
        Rect::new(0, 0, 100, 50),
        &positions,
        None,
    );

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].0, red);
    assert_eq!(batches[0].1.quad_count(), 4);
    assert_eq!(batches[1].0, green);
    assert_eq!(batches[1].1.quad_count(), 5);
}

struct StubRaster;

impl OutlineRaster for StubRaster {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn pack(&self, _font_data: &[u8], request: &PackRequest) -> pixfont::Result<PackedAtlas> {
        let count = (request.last_glyph - request.first_glyph + 1) as usize;
        let glyphs = (0..count)
            .map(|i| PackedGlyph {
                rect: Rect::new(i as i32 * 9, 0, 8, 12),
                xoff: 0.0,
                yoff: -10.0,
                advance: 8.0,
            })
            .collect();
        Ok(PackedAtlas {
            coverage: vec![255; (request.atlas_size.width * request.atlas_size.height) as usize],
            size: request.atlas_size,
            glyphs,
            ascent: 12.0,
            descent: -4.0,
            line_gap: 0.0,
            kerning: vec![(b'A', b'V', -2.0)],
        })
    }
}

fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn outline_font_loads_and_lays_out_with_kerning() {
    init_logs();
    let path = temp_file("pixfont-it-outline.ttf", b"stub");
    let mut config = FontConfig::new(FontSource::Outline(AtlasSettings {
        file: path.clone(),
        first_glyph: 32,
        last_glyph: 127,
        ..AtlasSettings::default()
    }));
    config.outline_thickness = 1;
    let font = load_font(&config, &AtlasBuilder::with_raster(Box::new(StubRaster))).unwrap();
    let m = &font.metrics;

    assert_eq!(m.glyph_height, 16);
    assert_eq!(m.y_offset, 10);
    assert_eq!(m.kern(b'A', b'V'), -2);
    assert_eq!(m.advance_after(Some(b'A'), b'V'), 6);
    assert_eq!(font.atlas.pixels.len(), 512 * 512 * 4);

    let mut ctx = LayoutContext::new();
    let batches = m.draw_text(
        "AV",
        Color::white(),
        Align::TOP_LEFT,
        Rect::new(0, 0, 100, 40),
        &mut ctx,
        None,
    );

    // radius-1 outline: four stroke batches then the fill
    assert_eq!(batches.len(), 5);
    let fill = &batches[4].1;
    assert_eq!(fill.len(), 2);
    // the kerned 'V' starts at 8 - 2 = 6
    assert_eq!(fill[1].screen.left(), 6);
    // baseline shift moved both glyphs down by y_offset
    assert_eq!(fill[0].screen.top(), 10);
    let _ = std::fs::remove_file(path);
}

/// A 2-column sheet of 4x6 cells: blank space cell, then a 3px-wide glyph.
fn sheet_image() -> image::RgbaImage {
    image::RgbaImage::from_fn(8, 6, |x, y| {
        if (4..7).contains(&x) && y == 2 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    })
}

#[test]
fn sheet_font_loads_from_disk_with_auto_widths() {
    init_logs();
    let path = std::env::temp_dir().join("pixfont-it-sheet.png");
    sheet_image().save(&path).unwrap();

    let config = FontConfig::new(FontSource::Sheet(SheetSettings {
        image: path.clone(),
        glyph_size: Size::new(4, 6),
        height: 6,
        glyph_width: GlyphWidth::Auto,
    }));
    let font = load_font(&config, &AtlasBuilder::new()).unwrap();
    let m = &font.metrics;

    assert_eq!(m.glyph_height, 6);
    assert_eq!(m.sizes[33], Size::new(3, 6));
    assert_eq!(m.advances[33], 3);
    assert_eq!(m.texture_coords[33].origin(), Point::new(4, 0));
    assert_eq!(font.atlas.size, Size::new(8, 6));

    let mut ctx = LayoutContext::new();
    assert_eq!(m.text_size("!!", &mut ctx), Size::new(6, 6));
    let _ = std::fs::remove_file(path);
}

#[test]
fn wrapping_is_idempotent_through_the_facade() {
    init_logs();
    let m = test_metrics();
    let mut ctx = LayoutContext::new();
    let options = WrapOptions::default();

    let once = m.wrap_text("the quick brown fox jumps", 80, &options, &mut ctx, None);
    let twice = m.wrap_text(&once, 80, &options, &mut ctx, None);
    assert_eq!(once, twice);

    // every line fits the budget
    for line in once.split('\n') {
        assert!(m.text_size(line, &mut ctx).width <= 80);
    }
}

// this_file: crates/pixfont-core/src/wrap.rs

//! The wrapping engine: rewrite text with line breaks that fit a pixel width.
//!
//! Wrapping walks the input once, tracking the running line width and the
//! last *break candidate* (a position where a break may be inserted later).
//! When a character would overflow the line, the candidate is committed
//! retroactively; with no candidate, the overflow policies decide between a
//! forced mid-word break and a plain reset. Soft hyphens, zero-width breaks,
//! no-break spaces and CJK per-character breaking are all handled here.
//!
//! The decoder is deliberately not a full Unicode implementation: glyphs are
//! byte-indexed, so only the handful of codepoints with wrapping semantics
//! are decoded, and malformed sequences fall back to single-byte
//! interpretation.

use crate::geom::Color;
use crate::layout::LayoutContext;
use crate::metrics::GlyphMetrics;

pub const NO_BREAK_SPACE: u32 = 0x00A0;
pub const SOFT_HYPHEN: u32 = 0x00AD;
pub const ZERO_WIDTH_SPACE: u32 = 0x200B;
pub const WORD_JOINER: u32 = 0x2060;

/// Whether and when a visible `-` is inserted at a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HyphenationMode {
    /// Never insert hyphens; soft hyphens break invisibly.
    #[default]
    None,
    /// Soft hyphens become visible when broken at.
    Manual,
    /// Soft hyphens become visible, and forced mid-word breaks gain one too.
    Auto,
}

/// How to handle a single unit wider than the remaining line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowWrap {
    /// Only break at candidates; an unbreakable word overflows onto its own line.
    #[default]
    Normal,
    /// Break inside the word when no candidate exists.
    BreakWord,
    /// Break anywhere, candidates or not.
    Anywhere,
}

/// Word-breaking policy applied before overflow handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordBreak {
    #[default]
    Normal,
    /// Treat every character as a break opportunity.
    BreakAll,
}

/// Knobs for [`GlyphMetrics::wrap_text`].
#[derive(Debug, Clone)]
pub struct WrapOptions {
    pub allow_no_break_space: bool,
    pub allow_word_joiner: bool,
    pub allow_zero_width_break: bool,
    pub allow_soft_hyphen: bool,
    pub hyphenation: HyphenationMode,
    pub overflow_wrap: OverflowWrap,
    pub word_break: WordBreak,
    /// When set, CJK codepoints wrap per word like Latin text instead of
    /// per character.
    pub keep_cjk_words_together: bool,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            allow_no_break_space: true,
            allow_word_joiner: true,
            allow_zero_width_break: true,
            allow_soft_hyphen: true,
            hyphenation: HyphenationMode::None,
            overflow_wrap: OverflowWrap::Normal,
            word_break: WordBreak::Normal,
            keep_cjk_words_together: false,
        }
    }
}

/// Start of a colored span in a text buffer.
///
/// A sorted list of spans partitions the text; each span runs until the next
/// span's start. The wrapping engine keeps the starts in sync while it
/// inserts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSpan {
    pub start: usize,
    pub color: Color,
}

impl ColorSpan {
    pub const fn new(start: usize, color: Color) -> Self {
        Self { start, color }
    }
}

/// Shift every span that starts strictly after `pos` by `inserted` bytes.
///
/// A span starting exactly at the insertion point stays put, so a break
/// inserted at a color boundary keeps the newline in the earlier span.
pub fn shift_color_spans(spans: &mut [ColorSpan], pos: usize, inserted: usize) {
    for span in spans.iter_mut() {
        if span.start > pos {
            span.start += inserted;
        }
    }
}

/// Decode one codepoint starting at `i`, tolerating malformed input.
///
/// Truncated or invalid sequences decode as the single lead byte; the layout
/// engine treats that byte as a Latin-1 glyph, which is the best available
/// rendering for broken input.
pub(crate) fn decode_utf8(bytes: &[u8], i: usize) -> (u32, usize) {
    let c0 = bytes[i] as u32;
    let rest = bytes.len() - i;
    if c0 < 0x80 {
        return (c0, 1);
    }
    if c0 & 0xE0 == 0xC0 && rest >= 2 {
        return ((c0 & 0x1F) << 6 | (bytes[i + 1] as u32 & 0x3F), 2);
    }
    if c0 & 0xF0 == 0xE0 && rest >= 3 {
        return (
            (c0 & 0x0F) << 12 | (bytes[i + 1] as u32 & 0x3F) << 6 | (bytes[i + 2] as u32 & 0x3F),
            3,
        );
    }
    if c0 & 0xF8 == 0xF0 && rest >= 4 {
        return (
            (c0 & 0x07) << 18
                | (bytes[i + 1] as u32 & 0x3F) << 12
                | (bytes[i + 2] as u32 & 0x3F) << 6
                | (bytes[i + 3] as u32 & 0x3F),
            4,
        );
    }
    (c0, 1)
}

/// Fixed-block CJK test: Unified Ideographs (+Ext A), Hiragana, Katakana,
/// Hangul Syllables. Approximate by design; real word segmentation is out
/// of scope for a byte-indexed font.
pub(crate) fn is_cjk(cp: u32) -> bool {
    (0x4E00..=0x9FFF).contains(&cp)
        || (0x3400..=0x4DBF).contains(&cp)
        || (0x3040..=0x309F).contains(&cp)
        || (0x30A0..=0x30FF).contains(&cp)
        || (0xAC00..=0xD7AF).contains(&cp)
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

struct BreakPoint {
    /// Byte position in the output where the break would be inserted.
    out_pos: usize,
    /// Line width accumulated up to the break point.
    line_width: i32,
    /// Insert a visible hyphen before the newline.
    hyphen: bool,
}

/// Scanning state for one wrap pass, kept as a struct so the helpers can
/// share mutable access to the output buffer and the span list.
struct Wrapper<'a, 'c> {
    metrics: &'a GlyphMetrics,
    ctx: &'a mut LayoutContext,
    options: &'a WrapOptions,
    colors: Option<&'c mut Vec<ColorSpan>>,
    out: String,
    max_width: i32,
    line_width: i32,
    last_glyph: Option<u8>,
    candidate: Option<BreakPoint>,
}

impl Wrapper<'_, '_> {
    fn shift_colors(&mut self, pos: usize, inserted: usize) {
        if let Some(colors) = self.colors.as_deref_mut() {
            shift_color_spans(colors, pos, inserted);
        }
    }

    /// Copy a byte into the output. Copies never shift the color spans;
    /// only inserted characters do.
    fn push_byte(&mut self, b: u8) {
        self.out.push(b as char);
    }

    fn push_slice(&mut self, slice: &str) {
        self.out.push_str(slice);
    }

    fn reset_line(&mut self) {
        self.line_width = 0;
        self.candidate = None;
        self.last_glyph = None;
    }

    /// Line reset for a `'\n'` copied from the input.
    fn hard_newline(&mut self) {
        self.out.push('\n');
        self.reset_line();
    }

    /// Line reset for a `'\n'` the wrapper made up; spans after it shift.
    fn inserted_newline(&mut self) {
        let pos = self.out.len();
        self.out.push('\n');
        self.shift_colors(pos, 1);
        self.reset_line();
    }

    fn mark_break(&mut self, hyphen: bool) {
        self.candidate = Some(BreakPoint {
            out_pos: self.out.len(),
            line_width: self.line_width,
            hyphen,
        });
    }

    /// Turn the buffered candidate into a real break, or fall back to a
    /// reset at the current position. `forced` marks mid-word breaks, which
    /// gain a hyphen under [`HyphenationMode::Auto`]. `replaces_char` is set
    /// when the overflowing input character is dropped in favor of the
    /// break, so the fallback newline is a replacement rather than an
    /// insertion as far as the color spans are concerned.
    fn commit_break(&mut self, forced: bool, replaces_char: bool) {
        if let Some(bp) = self.candidate.take() {
            let mut pos = bp.out_pos;
            if bp.hyphen {
                self.out.insert(pos, '-');
                self.shift_colors(pos, 1);
                pos += 1;
            }
            self.out.insert(pos, '\n');
            self.shift_colors(pos, 1);
            // the new line starts with whatever followed the break point
            self.line_width = (self.line_width - bp.line_width).max(0);
        } else {
            if forced && self.options.hyphenation == HyphenationMode::Auto {
                let pos = self.out.len();
                self.out.push('-');
                self.shift_colors(pos, 1);
            }
            if replaces_char {
                self.hard_newline();
            } else {
                self.inserted_newline();
            }
        }
    }

    /// Fast path for byte glyphs: table advance + kerning + spacing.
    fn byte_width(&self, glyph: u8) -> i32 {
        self.metrics.advance_after(self.last_glyph, glyph) + self.metrics.spacing.width
    }

    /// Slow path: exact mini-layout of a multi-byte slice.
    fn slice_width(&mut self, slice: &str) -> i32 {
        self.metrics.text_size(slice, self.ctx).width
    }

    fn would_overflow(&self, width: i32) -> bool {
        self.line_width + width > self.max_width
    }
}

impl GlyphMetrics {
    /// Rewrite `text` with inserted line breaks so no line exceeds
    /// `max_width` pixels, following `options` for break policy.
    ///
    /// When `colors` is supplied, every span start is shifted to account for
    /// inserted characters, keeping the annotation aligned with the output.
    /// Degenerate input (empty text, non-positive width) is returned
    /// unchanged.
    pub fn wrap_text(
        &self,
        text: &str,
        max_width: i32,
        options: &WrapOptions,
        ctx: &mut LayoutContext,
        colors: Option<&mut Vec<ColorSpan>>,
    ) -> String {
        if text.is_empty() || max_width <= 0 {
            return text.to_owned();
        }

        let mut w = Wrapper {
            metrics: self,
            ctx,
            options,
            colors,
            out: String::with_capacity(text.len() + text.len() / 8),
            max_width,
            line_width: 0,
            last_glyph: None,
            candidate: None,
        };

        let bytes = text.as_bytes();
        let mut i = 0usize;

        while i < bytes.len() {
            if bytes[i] == b'\n' {
                w.hard_newline();
                i += 1;
                continue;
            }

            let (cp, len) = decode_utf8(bytes, i);
            let slice = &text[i..(i + len).min(text.len())];

            if cp == NO_BREAK_SPACE && options.allow_no_break_space {
                let width = w.slice_width(slice);
                if w.would_overflow(width) {
                    w.commit_break(true, false);
                }
                w.push_slice(slice);
                w.line_width += width;
                w.last_glyph = Some(cp as u8);
                i += len;
                continue;
            }

            if cp == WORD_JOINER && options.allow_word_joiner {
                let width = w.slice_width(slice);
                if w.would_overflow(width) {
                    w.commit_break(true, false);
                }
                w.push_slice(slice);
                w.line_width += width;
                w.last_glyph = None;
                i += len;
                continue;
            }

            if cp == ZERO_WIDTH_SPACE && options.allow_zero_width_break {
                w.mark_break(false);
                i += len;
                continue;
            }

            if cp == SOFT_HYPHEN && options.allow_soft_hyphen {
                let visible = matches!(
                    options.hyphenation,
                    HyphenationMode::Manual | HyphenationMode::Auto
                );
                w.mark_break(visible);
                i += len;
                continue;
            }

            if len == 1 && cp < 0x80 {
                let ch = bytes[i];

                if is_blank(ch) {
                    let width = w.byte_width(b' ');
                    if w.would_overflow(width) {
                        // deferred flush: break at the previous candidate
                        // and drop the blank, but keep it as the next one
                        w.commit_break(false, true);
                        i += 1;
                        w.mark_break(false);
                        continue;
                    }
                    w.push_byte(b' ');
                    w.line_width += width;
                    w.mark_break(false);
                    w.last_glyph = Some(b' ');
                    i += 1;
                    continue;
                }

                if ch == b'-' {
                    let width = w.byte_width(ch);
                    if w.would_overflow(width) {
                        w.commit_break(false, false);
                    }
                    w.push_byte(ch);
                    w.line_width += width;
                    // a hyphen is a natural break point right after itself
                    w.mark_break(false);
                    w.last_glyph = Some(ch);
                    i += 1;
                    continue;
                }

                let width = w.byte_width(ch);
                if w.would_overflow(width) {
                    let anywhere = options.overflow_wrap == OverflowWrap::Anywhere
                        || options.word_break == WordBreak::BreakAll;
                    if w.candidate.is_some() {
                        w.commit_break(false, false);
                    } else if options.overflow_wrap == OverflowWrap::BreakWord || anywhere {
                        w.commit_break(true, false);
                    } else {
                        w.inserted_newline();
                    }
                }
                w.push_byte(ch);
                w.line_width += width;
                w.last_glyph = Some(ch);
                i += 1;
                continue;
            }

            let width = w.slice_width(slice);
            if w.would_overflow(width) {
                let anywhere = options.overflow_wrap == OverflowWrap::Anywhere
                    || options.word_break == WordBreak::BreakAll
                    || (!options.keep_cjk_words_together && is_cjk(cp));
                if w.candidate.is_some() {
                    w.commit_break(false, false);
                } else if options.overflow_wrap == OverflowWrap::BreakWord || anywhere {
                    w.commit_break(true, false);
                } else {
                    w.inserted_newline();
                }
            }
            w.push_slice(slice);
            w.line_width += width;
            w.last_glyph = if cp < 256 { Some(cp as u8) } else { None };
            i += len;
        }

        w.out
    }
}

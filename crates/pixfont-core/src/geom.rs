// this_file: crates/pixfont-core/src/geom.rs

//! Integer geometry shared by every stage of the font pipeline.
//!
//! Everything here is pixel-grid math: glyphs are placed, measured and
//! clipped on whole pixels, so the types stay `i32` end to end. `Rect`
//! uses exclusive right/bottom edges; the edge setters move one edge
//! while keeping the opposite edge fixed, which is exactly what the
//! clipper's trim arithmetic needs.

use std::ops::{Add, AddAssign, Sub};

/// A pixel position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A pixel extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: i32) -> Self {
        Self::new(side, side)
    }
}

/// An axis-aligned pixel rectangle with exclusive right/bottom edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn at(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// A rect is drawable only when it covers at least one pixel.
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Move the left edge, keeping the right edge in place.
    pub fn set_left(&mut self, left: i32) {
        self.width -= left - self.x;
        self.x = left;
    }

    /// Move the top edge, keeping the bottom edge in place.
    pub fn set_top(&mut self, top: i32) {
        self.height -= top - self.y;
        self.y = top;
    }

    /// Move the right edge, keeping the left edge in place.
    pub fn set_right(&mut self, right: i32) {
        self.width = right - self.x;
    }

    /// Move the bottom edge, keeping the top edge in place.
    pub fn set_bottom(&mut self, bottom: i32) {
        self.height = bottom - self.y;
    }

    pub fn translate(&mut self, delta: Point) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn translated(mut self, delta: Point) -> Rect {
        self.translate(delta);
        self
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// RGBA color, straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    /// Packed value used to coalesce draw batches that share a color.
    pub const fn key(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}

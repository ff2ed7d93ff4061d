//! Value types shared between widgets and render backends.

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a color from float components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from float components.
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color from 8-bit components.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// A gray level with alpha, both 8-bit.
    pub fn mono(gray: u8, alpha: u8) -> Self {
        Self::from_rgba8(gray, gray, gray, alpha)
    }

    /// A gray level with alpha, both as floats.
    pub const fn mono_f(gray: f32, alpha: f32) -> Self {
        Self::new(gray, gray, gray, alpha)
    }

    /// The same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A font face name and pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub face: String,
    pub size: f32,
}

impl Font {
    pub fn new(face: impl Into<String>, size: f32) -> Self {
        Self {
            face: face.into(),
            size,
        }
    }
}

/// Horizontal text alignment relative to the draw position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to the draw position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Text alignment on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextAlign {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl TextAlign {
    pub const TOP_LEFT: Self = Self::new(HAlign::Left, VAlign::Top);
    pub const MIDDLE_LEFT: Self = Self::new(HAlign::Left, VAlign::Middle);
    pub const CENTER: Self = Self::new(HAlign::Center, VAlign::Middle);

    pub const fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

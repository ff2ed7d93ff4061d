//! Theme metrics, palette and font faces.
//!
//! The theme is a plain runtime value held by the screen environment. Layouts
//! read the metrics (most importantly [`Theme::window_header_height`]);
//! widgets read the palette when painting.

use trellis_render::{Color, Font};

/// Metrics, colors and font faces shared by all widgets of a screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub standard_font_size: i32,
    pub button_font_size: i32,
    pub text_box_font_size: i32,
    pub window_corner_radius: i32,
    pub window_header_height: i32,
    pub window_drop_shadow_size: i32,
    pub button_corner_radius: i32,

    pub drop_shadow: Color,
    pub transparent: Color,
    pub border_dark: Color,
    pub border_light: Color,
    pub border_medium: Color,
    pub text_color: Color,
    pub disabled_text_color: Color,
    pub text_color_shadow: Color,
    pub icon_color: Color,

    pub button_gradient_top_focused: Color,
    pub button_gradient_bot_focused: Color,
    pub button_gradient_top_unfocused: Color,
    pub button_gradient_bot_unfocused: Color,
    pub button_gradient_top_pushed: Color,
    pub button_gradient_bot_pushed: Color,

    pub window_fill_unfocused: Color,
    pub window_fill_focused: Color,
    pub window_title_unfocused: Color,
    pub window_title_focused: Color,

    pub window_header_gradient_top: Color,
    pub window_header_gradient_bot: Color,
    pub window_header_sep_top: Color,
    pub window_header_sep_bot: Color,

    pub window_popup: Color,
    pub window_popup_transparent: Color,

    pub font_normal: String,
    pub font_bold: String,
    pub font_icons: String,
}

impl Theme {
    /// The regular face at `size`.
    pub fn normal_font(&self, size: i32) -> Font {
        Font::new(self.font_normal.clone(), size as f32)
    }

    /// The bold face at `size`.
    pub fn bold_font(&self, size: i32) -> Font {
        Font::new(self.font_bold.clone(), size as f32)
    }

    /// The icon face at `size`.
    pub fn icon_font(&self, size: i32) -> Font {
        Font::new(self.font_icons.clone(), size as f32)
    }

    /// Vertical space a titled window reserves in a layout with `margin`.
    ///
    /// The header already provides half a margin of breathing room, so the
    /// reservation is `header - margin / 2` (integer division).
    pub fn header_reserve(&self, margin: i32) -> i32 {
        self.window_header_height - margin / 2
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            standard_font_size: 16,
            button_font_size: 20,
            text_box_font_size: 20,
            window_corner_radius: 2,
            window_header_height: 30,
            window_drop_shadow_size: 10,
            button_corner_radius: 2,

            drop_shadow: Color::mono(0, 128),
            transparent: Color::mono(0, 0),
            border_dark: Color::mono(29, 255),
            border_light: Color::mono(92, 255),
            border_medium: Color::mono(35, 255),
            text_color: Color::mono(255, 160),
            disabled_text_color: Color::mono(255, 80),
            text_color_shadow: Color::mono(0, 160),
            icon_color: Color::mono(255, 160),

            button_gradient_top_focused: Color::mono(64, 255),
            button_gradient_bot_focused: Color::mono(48, 255),
            button_gradient_top_unfocused: Color::mono(74, 255),
            button_gradient_bot_unfocused: Color::mono(58, 255),
            button_gradient_top_pushed: Color::mono(41, 255),
            button_gradient_bot_pushed: Color::mono(29, 255),

            window_fill_unfocused: Color::mono(43, 230),
            window_fill_focused: Color::mono(45, 230),
            window_title_unfocused: Color::mono(220, 160),
            window_title_focused: Color::mono(255, 190),

            window_header_gradient_top: Color::mono(74, 255),
            window_header_gradient_bot: Color::mono(58, 255),
            window_header_sep_top: Color::mono(92, 255),
            window_header_sep_bot: Color::mono(29, 255),

            window_popup: Color::mono(50, 255),
            window_popup_transparent: Color::mono(50, 0),

            font_normal: "sans".into(),
            font_bold: "sans-bold".into(),
            font_icons: "icons".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_metrics() {
        let theme = Theme::default();
        assert_eq!(theme.window_header_height, 30);
        assert_eq!(theme.standard_font_size, 16);
        assert_eq!(theme.header_reserve(15), 23);
        assert_eq!(theme.bold_font(18).face, "sans-bold");
    }
}

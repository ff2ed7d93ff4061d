//! Static text.
//!
//! A [`Label`] shows a single line of text, or word-wrapped text when it has a
//! fixed width or sits in a table column (see
//! [`ExpandListLayout`](crate::widget::layout::ExpandListLayout)).
//! [`GroupLayout`](crate::widget::layout::GroupLayout) treats labels as
//! section headings.
//!
//! # Example
//!
//! ```ignore
//! let heading = tree.insert(window, Label::new("Network").with_font_face("sans-bold"))?;
//! ```

use trellis_core::{Point, Size};
use trellis_render::{Color, Font, TextAlign};

use crate::widget::context::{LayoutCtx, PaintCtx};
use crate::widget::theme::Theme;
use crate::widget::traits::{LayoutRole, Widget};
use crate::widget::tree::WidgetId;

/// A text label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    caption: String,
    font_face: Option<String>,
    color: Option<Color>,
    column_width: i32,
    wrap: bool,
}

impl Label {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            font_face: None,
            color: None,
            column_width: 0,
            wrap: true,
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Font face; the theme's regular face when unset.
    pub fn font_face(&self) -> Option<&str> {
        self.font_face.as_deref()
    }

    pub fn set_font_face(&mut self, face: impl Into<String>) {
        self.font_face = Some(face.into());
    }

    pub fn with_font_face(mut self, face: impl Into<String>) -> Self {
        self.set_font_face(face);
        self
    }

    /// Text color; the theme's text color when unset.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Whether the caption wraps at the column width.
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Width of the table column the label was last placed in.
    pub fn column_width(&self) -> i32 {
        self.column_width
    }

    fn font(&self, theme: &Theme, size: Option<i32>) -> Font {
        let size = size.unwrap_or(theme.standard_font_size);
        let face = self.font_face.as_deref().unwrap_or(&theme.font_normal);
        Font::new(face, size as f32)
    }

    /// Width the caption wraps at, if any.
    fn wrap_width(&self, fixed_width: i32, column_width: i32) -> Option<i32> {
        if fixed_width > 0 {
            Some(fixed_width)
        } else if column_width > 0 && self.wrap {
            Some(column_width)
        } else {
            None
        }
    }

    fn measure(&self, cx: &LayoutCtx<'_>, id: WidgetId, column_width: i32) -> Size {
        if self.caption.is_empty() {
            return Size::ZERO;
        }
        let base = cx.base(id);
        let font = self.font(cx.theme(), base.and_then(|b| b.font_size()));
        let fixed_width = base.map_or(0, |b| b.fixed_size().width);

        match self.wrap_width(fixed_width, column_width) {
            Some(width) => {
                let bounds = cx.metrics().text_box_bounds(&font, width, &self.caption);
                Size::new(width, bounds.size.height)
            }
            None => {
                let advance = cx.metrics().text_bounds(&font, &self.caption).advance;
                Size::new(advance.ceil() as i32, cx.theme().standard_font_size)
            }
        }
    }
}

impl Widget for Label {
    fn type_name(&self) -> &'static str {
        "Label"
    }

    fn layout_role(&self) -> LayoutRole {
        LayoutRole::Label {
            caption: self.caption.clone(),
        }
    }

    fn preferred_size(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        self.measure(cx, id, self.column_width)
    }

    fn preferred_size_in_column(&self, cx: &LayoutCtx<'_>, id: WidgetId, column_width: i32) -> Size {
        self.measure(cx, id, column_width)
    }

    fn set_column_width(&mut self, width: i32) {
        self.column_width = width;
    }

    fn paint(&self, cx: &mut PaintCtx<'_>) {
        let Some(base) = cx.base() else {
            return;
        };
        let enabled = base.is_enabled();
        let font_size = base.font_size();
        let fixed_width = base.fixed_size().width;
        let size = base.size();

        let theme = cx.theme();
        let font = self.font(theme, font_size);
        let color = if enabled {
            self.color.unwrap_or(theme.text_color)
        } else {
            theme.disabled_text_color
        };

        match self.wrap_width(fixed_width, self.column_width) {
            Some(width) => {
                cx.renderer()
                    .draw_text_box(&font, Point::ZERO, width, color, &self.caption);
            }
            None => {
                cx.renderer().draw_text(
                    &font,
                    Point::new(0, size.height / 2),
                    TextAlign::MIDDLE_LEFT,
                    color,
                    &self.caption,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::testing::headless_tree;
    use trellis_render::{DrawCommand, RecordingRenderer};

    #[test]
    fn test_single_line_size() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let label = tree.insert(root, Label::new("Hello")).unwrap();
        let cx = LayoutCtx::new(&tree, &env);
        // Five graphemes at half the 16px standard size.
        assert_eq!(cx.preferred_size(label), Size::new(40, 16));
    }

    #[test]
    fn test_empty_caption_has_no_size() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let label = tree.insert(root, Label::new("")).unwrap();
        assert_eq!(LayoutCtx::new(&tree, &env).preferred_size(label), Size::ZERO);
    }

    #[test]
    fn test_fixed_width_wraps() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let label = tree.insert(root, Label::new("aaaa bbbb")).unwrap();
        tree.base_mut(label).unwrap().set_fixed_width(50);
        let cx = LayoutCtx::new(&tree, &env);
        // "aaaa bbbb" is 72 wide at 8px per grapheme, so it takes two lines.
        assert_eq!(cx.preferred_size(label), Size::new(50, 32));
    }

    #[test]
    fn test_column_width_respects_wrap_flag() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let label = tree
            .insert(root, Label::new("aaaa bbbb").with_wrap(false))
            .unwrap();
        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size_in_column(label, 50), Size::new(72, 16));
    }

    #[test]
    fn test_paint_single_line() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let label = tree.insert(root, Label::new("Hi")).unwrap();
        tree.base_mut(label).unwrap().set_size(Size::new(40, 20));

        let mut renderer = RecordingRenderer::new();
        PaintCtx::new(&tree, &env, &mut renderer, label).paint_widget(label);
        match &renderer.commands()[0] {
            DrawCommand::Text { pos, text, align, .. } => {
                assert_eq!(*pos, Point::new(0, 10));
                assert_eq!(text, "Hi");
                assert_eq!(*align, TextAlign::MIDDLE_LEFT);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

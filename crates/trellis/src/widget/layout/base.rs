//! Pieces shared by the layout strategies.

use trellis_core::Size;

use super::super::context::LayoutCtx;
use super::super::tree::WidgetId;

/// Placement of a child within the space a layout gives it on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Centered in the available space.
    #[default]
    Middle,
    /// Flush with the start (left/top).
    Minimum,
    /// Flush with the end (right/bottom).
    Maximum,
    /// Stretched to the available space unless the child has a fixed size.
    Fill,
}

/// Vertical space reserved for the header of `container` if it is a titled
/// window: `header - margin / 2`, else zero.
pub(crate) fn header_reserve(cx: &LayoutCtx<'_>, container: WidgetId, margin: i32) -> i32 {
    cx.window_header(container)
        .map_or(0, |header| header - margin / 2)
}

/// Track-relative offset and final extent of a child of `target` size in a
/// cell of `cell` size, on one axis.
///
/// `fixed` is the child's fixed extent on that axis (0 when unset); a fixed
/// extent is never overridden by [`Alignment::Fill`].
pub(crate) fn align_in_cell(align: Alignment, cell: i32, target: i32, fixed: i32) -> (i32, i32) {
    match align {
        Alignment::Minimum => (0, target),
        Alignment::Middle => ((cell - target) / 2, target),
        Alignment::Maximum => (cell - target, target),
        Alignment::Fill => (0, if fixed > 0 { fixed } else { cell }),
    }
}

/// Sum of track sizes plus the gaps between them.
pub(crate) fn tracks_extent(tracks: &[i32], spacing: i32) -> i32 {
    let gaps = tracks.len().saturating_sub(1) as i32;
    tracks.iter().sum::<i32>() + gaps * spacing
}

/// Target size of `id` (preferred, fixed components winning) and its fixed size.
pub(crate) fn target_and_fixed(cx: &LayoutCtx<'_>, id: WidgetId) -> (Size, Size) {
    let fixed = cx.fixed_size(id);
    (cx.preferred_size(id).overridden_by(fixed), fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_in_cell() {
        assert_eq!(align_in_cell(Alignment::Minimum, 100, 40, 0), (0, 40));
        assert_eq!(align_in_cell(Alignment::Middle, 100, 40, 0), (30, 40));
        assert_eq!(align_in_cell(Alignment::Maximum, 100, 40, 0), (60, 40));
        assert_eq!(align_in_cell(Alignment::Fill, 100, 40, 0), (0, 100));
        assert_eq!(align_in_cell(Alignment::Fill, 100, 40, 55), (0, 55));
    }

    #[test]
    fn test_middle_rounds_toward_zero() {
        assert_eq!(align_in_cell(Alignment::Middle, 11, 4, 0), (3, 4));
        assert_eq!(align_in_cell(Alignment::Middle, 4, 11, 0), (-3, 11));
    }

    #[test]
    fn test_tracks_extent() {
        assert_eq!(tracks_extent(&[], 6), 0);
        assert_eq!(tracks_extent(&[10], 6), 10);
        assert_eq!(tracks_extent(&[10, 20, 30], 6), 72);
    }
}

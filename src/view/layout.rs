//! Field geometry shared by the grid-like views.
//!
//! All ranges are half-open: a field starting at `s` with width `w` covers
//! `s <= x < s + w`.

use ratatui::style::{Color, Modifier, Style};

use crate::window::surface::Surface;

/// Selection gutter on the left of every list.
pub const MARGIN: i32 = 2;
pub const MIN_FIELD_WIDTH: u16 = 3;
pub const DEFAULT_CELL_WIDTH: u16 = 12;

pub fn in_margin(x: i32) -> bool {
    (0..MARGIN).contains(&x)
}

/// Index of the field under `x`, where fields start right after the margin.
pub fn field_at(widths: &[u16], x: i32) -> Option<usize> {
    let mut start = MARGIN;
    for (index, width) in widths.iter().enumerate() {
        let end = start + i32::from(*width);
        if (start..end).contains(&x) {
            return Some(index);
        }
        start = end;
    }
    None
}

pub fn field_start(widths: &[u16], index: usize) -> i32 {
    MARGIN + widths[..index].iter().map(|w| i32::from(*w)).sum::<i32>()
}

/// Grow or shrink one field, never below [`MIN_FIELD_WIDTH`].
pub fn resize_field(widths: &mut [u16], index: usize, delta: i32) {
    if let Some(width) = widths.get_mut(index) {
        let resized = (i32::from(*width) + delta)
            .clamp(i32::from(MIN_FIELD_WIDTH), i32::from(u16::MAX));
        *width = resized as u16;
    }
}

/// Truncate to leave one blank column before the next field.
pub fn fit(text: &str, width: u16) -> String {
    text.chars().take(usize::from(width.saturating_sub(1))).collect()
}

pub fn header_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn selected_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn editing_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Paint one line of fields. `editing` highlights a single field.
pub fn paint_fields(
    surface: &mut dyn Surface,
    y: i32,
    widths: &[u16],
    texts: &[String],
    style: Style,
    editing: Option<usize>,
) {
    for (index, (text, width)) in texts.iter().zip(widths).enumerate() {
        let x = field_start(widths, index);
        if editing == Some(index) {
            let mut shown = fit(text, *width);
            shown.push('_');
            surface.put_str(x, y, &shown, editing_style());
        } else {
            surface.put_str(x, y, &fit(text, *width), style);
        }
    }
}

pub fn paint_marker(surface: &mut dyn Surface, y: i32, selected: bool) {
    if selected {
        surface.put_str(0, y, "*", selected_style());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_boundaries_are_half_open() {
        let widths = [4, 3];
        assert_eq!(field_at(&widths, 1), None);
        assert_eq!(field_at(&widths, 2), Some(0));
        assert_eq!(field_at(&widths, 5), Some(0));
        assert_eq!(field_at(&widths, 6), Some(1));
        assert_eq!(field_at(&widths, 8), Some(1));
        assert_eq!(field_at(&widths, 9), None);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut widths = [10, 10];
        resize_field(&mut widths, 0, -20);
        assert_eq!(widths[0], MIN_FIELD_WIDTH);
        resize_field(&mut widths, 1, 5);
        assert_eq!(widths[1], 15);
        resize_field(&mut widths, 7, 5);
        assert_eq!(widths, [MIN_FIELD_WIDTH, 15]);
    }

    #[test]
    fn test_field_start_and_fit() {
        let widths = [16, 9, 8];
        assert_eq!(field_start(&widths, 0), MARGIN);
        assert_eq!(field_start(&widths, 2), MARGIN + 25);
        assert_eq!(fit("abcdef", 4), "abc");
        assert_eq!(fit("ab", 4), "ab");
    }
}

use std::fmt;

use crate::view::{ViewArena, ViewId};

/// Rows taken by the title bar at the top of every frame.
pub const TITLE_BAR_HEIGHT: i32 = 1;
/// Columns taken by the close button at the right end of the title bar.
pub const CLOSE_BUTTON_WIDTH: i32 = 3;
pub const CLOSE_BUTTON: &str = "[x]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub(crate) u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Where a click landed, in the frame's own terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHit {
    /// Inside the body, translated to view-local coordinates.
    Body { x: i32, y: i32 },
    CloseButton,
    TitleBar,
}

/// What a drag starting inside the frame amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDrag {
    /// Passed to the view as-is, in frame-local coordinates.
    Body { start: (i32, i32), end: (i32, i32) },
    /// Started on the title bar: move the frame.
    Move { dx: i32, dy: i32 },
}

/// A movable, closable window around one view.
///
/// Bounds are half-open: the frame covers `[x, x + width) x [y, y + height)`
/// in screen coordinates.
#[derive(Debug, Clone)]
pub struct Frame {
    id: FrameId,
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
    view: Option<ViewId>,
}

impl Frame {
    pub fn new(id: FrameId, x: i32, y: i32, width: u16, height: u16, view: ViewId) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            view: Some(view),
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    /// `None` once the view died underneath; the frame is then closed on the
    /// next paint.
    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.x..self.x + i32::from(self.width)).contains(&x)
            && (self.y..self.y + i32::from(self.height)).contains(&y)
    }

    pub fn to_local(&self, x: i32, y: i32) -> (i32, i32) {
        (x - self.x, y - self.y)
    }

    pub fn body_height(&self) -> u16 {
        self.height.saturating_sub(TITLE_BAR_HEIGHT as u16)
    }

    /// Classify a click given in frame-local coordinates.
    pub fn route_click(&self, x: i32, y: i32) -> FrameHit {
        if y >= TITLE_BAR_HEIGHT {
            return FrameHit::Body {
                x,
                y: y - TITLE_BAR_HEIGHT,
            };
        }
        let width = i32::from(self.width);
        if (width - CLOSE_BUTTON_WIDTH..width).contains(&x) {
            FrameHit::CloseButton
        } else {
            FrameHit::TitleBar
        }
    }

    /// Classify a drag given in frame-local coordinates.
    pub fn route_drag(&self, start: (i32, i32), end: (i32, i32)) -> FrameDrag {
        if start.1 >= TITLE_BAR_HEIGHT {
            FrameDrag::Body { start, end }
        } else {
            FrameDrag::Move {
                dx: end.0 - start.0,
                dy: end.1 - start.1,
            }
        }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Swap the hosted view. False if `old` is not the hosted view.
    pub fn substitute_view(&mut self, old: ViewId, new: ViewId) -> bool {
        if self.view != Some(old) {
            return false;
        }
        self.view = Some(new);
        true
    }

    /// True, and the frame empties itself, when `dead` is the hosted view or
    /// sits anywhere in its underlying chain.
    pub fn handle_dead_view(&mut self, dead: ViewId, arena: &mut ViewArena) -> bool {
        let Some(view) = self.view else {
            return false;
        };
        if view == dead || arena.handle_dead_view(view, dead) {
            self.view = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{TablesView, View};

    fn frame() -> Frame {
        Frame::new(FrameId(0), 10, 5, 20, 8, ViewId(0))
    }

    #[test]
    fn test_bounds_are_half_open() {
        let frame = frame();
        assert!(frame.contains(10, 5));
        assert!(frame.contains(29, 12));
        assert!(!frame.contains(30, 5));
        assert!(!frame.contains(10, 13));
        assert!(!frame.contains(9, 6));
    }

    #[test]
    fn test_click_routing() {
        let frame = frame();
        assert_eq!(frame.route_click(4, 3), FrameHit::Body { x: 4, y: 2 });
        assert_eq!(frame.route_click(4, 1), FrameHit::Body { x: 4, y: 0 });
        assert_eq!(frame.route_click(16, 0), FrameHit::TitleBar);
        assert_eq!(frame.route_click(17, 0), FrameHit::CloseButton);
        assert_eq!(frame.route_click(19, 0), FrameHit::CloseButton);
    }

    #[test]
    fn test_drag_routing() {
        let frame = frame();
        assert_eq!(frame.route_drag((3, 0), (8, -2)), FrameDrag::Move { dx: 5, dy: -2 });
        assert_eq!(
            frame.route_drag((3, 2), (8, 2)),
            FrameDrag::Body {
                start: (3, 2),
                end: (8, 2)
            }
        );
    }

    #[test]
    fn test_dead_hosted_view_empties_frame() {
        let mut arena = ViewArena::new();
        let view = arena.insert(View::Tables(TablesView::new()));
        let mut frame = Frame::new(FrameId(1), 0, 0, 10, 4, view);

        assert!(!frame.handle_dead_view(ViewId(99), &mut arena));
        assert!(frame.handle_dead_view(view, &mut arena));
        assert_eq!(frame.view(), None);
        assert!(!frame.handle_dead_view(view, &mut arena));
    }

    #[test]
    fn test_substitute_requires_current_view() {
        let mut frame = frame();
        assert!(!frame.substitute_view(ViewId(4), ViewId(5)));
        assert!(frame.substitute_view(ViewId(0), ViewId(5)));
        assert_eq!(frame.view(), Some(ViewId(5)));
    }
}

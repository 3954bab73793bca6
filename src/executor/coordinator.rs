// Window-relative UI coordinates to desktop cursor coordinates.
use crate::perception::types::{CursorPos, Point, Rect};

/// Desktop position of the center of `rect`, given the game window's
/// top-left corner on the desktop.
pub fn rect_center_on_desktop(rect: &Rect, window_origin: Point) -> CursorPos {
    CursorPos::from(rect.center() + window_origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_by_window_origin() {
        let rect = Rect::new(200.0, 100.0, 30.0, 31.0);
        let pos = rect_center_on_desktop(&rect, Point::new(1920.0, 8.0));
        assert_eq!(pos, CursorPos::new(2135, 123));
    }
}

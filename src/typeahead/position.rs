use serde::Serialize;

/// Viewport-relative bounding box, as reported by the host for the search form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Where the detached suggestion surface goes, in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "display", rename_all = "lowercase")]
pub enum DropdownPosition {
    #[default]
    Hidden,
    Placed {
        top: f64,
        left: f64,
        width: f64,
        z_index: i32,
    },
}

impl DropdownPosition {
    pub fn is_displayed(&self) -> bool {
        matches!(self, DropdownPosition::Placed { .. })
    }
}

/// Anchors the dropdown directly under the search form, matching its width.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    z_index: i32,
    current: DropdownPosition,
}

impl PositionTracker {
    pub fn new(z_index: i32) -> Self {
        Self {
            z_index,
            current: DropdownPosition::Hidden,
        }
    }

    pub fn current(&self) -> DropdownPosition {
        self.current
    }

    /// Called on visibility toggles, resizes and any document scroll. The anchor is only
    /// read while the list is shown.
    pub fn recompute<F>(&mut self, shown: bool, anchor: F) -> DropdownPosition
    where
        F: FnOnce() -> (Rect, ScrollOffset),
    {
        self.current = if shown {
            let (rect, scroll) = anchor();
            DropdownPosition::Placed {
                top: rect.bottom() + scroll.y,
                left: rect.left + scroll.x,
                width: rect.width,
                z_index: self.z_index,
            }
        } else {
            DropdownPosition::Hidden
        };
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_below_form_in_document_coordinates() {
        let mut tracker = PositionTracker::new(9999);
        let position = tracker.recompute(true, || {
            (Rect::new(40.0, 100.0, 320.0, 36.0), ScrollOffset { x: 5.0, y: 250.0 })
        });
        assert_eq!(
            position,
            DropdownPosition::Placed {
                top: 386.0,
                left: 45.0,
                width: 320.0,
                z_index: 9999,
            }
        );
    }

    #[test]
    fn hidden_list_does_not_measure() {
        let mut tracker = PositionTracker::new(9999);
        let position = tracker.recompute(false, || panic!("anchor measured while hidden"));
        assert_eq!(position, DropdownPosition::Hidden);
        assert!(!tracker.current().is_displayed());
    }
}

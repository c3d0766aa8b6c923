//! Geometry APIs
//!
//! DOMRect and per-element box-model state. Values are produced by an
//! external layout pass; this module only stores and exposes them.

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Zero-area check
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Element geometry state
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementGeometry {
    // Offset properties (relative to offsetParent)
    pub offset_top: f64,
    pub offset_left: f64,
    pub offset_width: f64,
    pub offset_height: f64,

    // Client properties (content + padding, no scrollbar)
    pub client_width: f64,
    pub client_height: f64,

    // Scroll properties
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

impl ElementGeometry {
    /// Get bounding client rect
    pub fn bounding_client_rect(&self) -> DOMRect {
        DOMRect::from_xywh(
            self.offset_left,
            self.offset_top,
            self.offset_width,
            self.offset_height,
        )
    }

    /// Scroll to position, clamped to the scrollable range
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll_left = x.max(0.0).min((self.scroll_width - self.client_width).max(0.0));
        self.scroll_top = y.max(0.0).min((self.scroll_height - self.client_height).max(0.0));
    }

    /// Scroll by amount
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll_to(self.scroll_left + dx, self.scroll_top + dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_rect_edges() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
        assert!(!rect.is_empty());
        assert!(DOMRect::new().is_empty());
    }

    #[test]
    fn test_scroll_clamping() {
        let mut geom = ElementGeometry {
            client_width: 100.0,
            client_height: 100.0,
            scroll_width: 300.0,
            scroll_height: 250.0,
            ..Default::default()
        };

        geom.scroll_to(500.0, -10.0);
        assert_eq!(geom.scroll_left, 200.0);
        assert_eq!(geom.scroll_top, 0.0);

        geom.scroll_by(-50.0, 75.0);
        assert_eq!(geom.scroll_left, 150.0);
        assert_eq!(geom.scroll_top, 75.0);
    }
}

#![forbid(unsafe_code)]

//! Cursor state as reported by the playback engine.
//!
//! The descriptor is replaced wholesale on every synchronizer tick — there
//! is no per-field merging, so a stale position can never be paired with a
//! fresh visibility flag.

/// Cursor rendering shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Solid block covering the cell.
    #[default]
    Block,
    /// Underline at the cell baseline.
    Underline,
    /// Vertical bar at the cell's left edge.
    Bar,
}

/// Snapshot of the cursor for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorDescriptor {
    /// Cell position as (column, row), 0-indexed. `None` when the engine
    /// reports no addressable cursor (e.g. hidden at end of recording).
    pub position: Option<(u16, u16)>,
    /// Whether the cursor should be drawn at all.
    pub visible: bool,
    /// Requested rendering shape.
    pub shape: CursorShape,
}

impl CursorDescriptor {
    /// A hidden cursor with no position.
    pub const HIDDEN: Self = Self {
        position: None,
        visible: false,
        shape: CursorShape::Block,
    };

    /// Create a visible block cursor at (col, row).
    #[must_use]
    pub const fn at(col: u16, row: u16) -> Self {
        Self {
            position: Some((col, row)),
            visible: true,
            shape: CursorShape::Block,
        }
    }

    /// Replace the shape.
    #[must_use]
    pub const fn with_shape(mut self, shape: CursorShape) -> Self {
        self.shape = shape;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_cursor_has_no_position() {
        assert_eq!(CursorDescriptor::HIDDEN.position, None);
        assert!(!CursorDescriptor::HIDDEN.visible);
    }

    #[test]
    fn at_builds_visible_block_cursor() {
        let c = CursorDescriptor::at(3, 7);
        assert_eq!(c.position, Some((3, 7)));
        assert!(c.visible);
        assert_eq!(c.shape, CursorShape::Block);
    }

    #[test]
    fn with_shape_replaces_shape_only() {
        let c = CursorDescriptor::at(1, 1).with_shape(CursorShape::Bar);
        assert_eq!(c.shape, CursorShape::Bar);
        assert_eq!(c.position, Some((1, 1)));
    }
}

//! Edge Registry: which grid-line segments are currently shown.
//!
//! Segments are a rendering projection of the path, so the registry never
//! takes part in move validation. The renderer drains what changed as
//! `EdgeChange` diffs.

use std::fmt;

use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::types::Coordinate;

/// Identifier of the connector between two adjacent cells.
///
/// A horizontal segment is addressed by its row and the lower column, a
/// vertical one by the lower row and its column. The string form
/// (`hr{row}-{col}` / `br{row}-{col}`) is what the rendering layer keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum SegmentId {
    Horizontal { row: usize, col: usize },
    Vertical { row: usize, col: usize },
}

impl SegmentId {
    /// Segment joining `a` and `b`, in either order.
    pub fn between(a: Coordinate, b: Coordinate) -> Result<Self> {
        if !a.is_adjacent(b) {
            return Err(EngineError::NotAdjacent { a, b });
        }
        if a.row == b.row {
            Ok(SegmentId::Horizontal {
                row: a.row,
                col: a.col.min(b.col),
            })
        } else {
            Ok(SegmentId::Vertical {
                row: a.row.min(b.row),
                col: a.col,
            })
        }
    }

    /// Whether both cells the segment joins lie on a `rows` x `cols` board.
    pub fn exists_on(&self, rows: usize, cols: usize) -> bool {
        match *self {
            SegmentId::Horizontal { row, col } => row < rows && col + 1 < cols,
            SegmentId::Vertical { row, col } => row + 1 < rows && col < cols,
        }
    }
}

/// Free-function form of `SegmentId::between`.
pub fn segment_id(a: Coordinate, b: Coordinate) -> Result<SegmentId> {
    SegmentId::between(a, b)
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentId::Horizontal { row, col } => write!(f, "hr{row}-{col}"),
            SegmentId::Vertical { row, col } => write!(f, "br{row}-{col}"),
        }
    }
}

impl From<SegmentId> for String {
    fn from(id: SegmentId) -> Self {
        id.to_string()
    }
}

/// A registry diff for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "segment", rename_all = "lowercase")]
pub enum EdgeChange {
    Shown(SegmentId),
    Hidden(SegmentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRegistry {
    rows: usize,
    cols: usize,
    /// Registered segments in drawing order.
    active: Vec<SegmentId>,
    /// `active[..drained]` has already been handed to the renderer.
    drained: usize,
    /// Segments the renderer shows that a `clear` has since removed.
    hidden: Vec<SegmentId>,
}

impl EdgeRegistry {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            active: Vec::new(),
            drained: 0,
            hidden: Vec::new(),
        }
    }

    /// Show `id`. A segment that does not exist on this board is a silent
    /// no-op and returns false.
    pub fn register(&mut self, id: SegmentId) -> bool {
        if !id.exists_on(self.rows, self.cols) {
            return false;
        }
        self.active.push(id);
        true
    }

    /// Hide every registered segment and empty the registry.
    ///
    /// Segments shown since the last drain were never rendered, so they are
    /// dropped rather than queued as `Hidden`.
    pub fn clear(&mut self) {
        self.hidden.extend(self.active.drain(..).take(self.drained));
        self.drained = 0;
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.active.contains(&id)
    }

    pub fn active(&self) -> &[SegmentId] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Changes since the last drain: `Hidden` for cleared segments, then
    /// `Shown` in drawing order. Without a renderer draining, the backlog is
    /// bounded by the current path plus the segments of the last drain.
    pub fn drain_changes(&mut self) -> Vec<EdgeChange> {
        let mut changes: Vec<EdgeChange> = self.hidden.drain(..).map(EdgeChange::Hidden).collect();
        changes.extend(self.active[self.drained..].iter().copied().map(EdgeChange::Shown));
        self.drained = self.active.len();
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn test_segment_id_is_symmetric() {
        for row in 0..6 {
            for col in 0..6 {
                let a = c(row, col);
                for b in [c(row, col + 1), c(row + 1, col)] {
                    assert_eq!(segment_id(a, b).unwrap(), segment_id(b, a).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_segment_id_strings() {
        assert_eq!(segment_id(c(2, 4), c(2, 3)).unwrap().to_string(), "hr2-3");
        assert_eq!(segment_id(c(1, 0), c(0, 0)).unwrap().to_string(), "br0-0");
        assert_eq!(
            serde_json::to_string(&segment_id(c(0, 0), c(0, 1)).unwrap()).unwrap(),
            "\"hr0-0\""
        );
    }

    #[test]
    fn test_segment_id_rejects_non_adjacent() {
        assert_eq!(
            segment_id(c(0, 0), c(1, 1)),
            Err(EngineError::NotAdjacent { a: c(0, 0), b: c(1, 1) })
        );
        assert!(segment_id(c(0, 0), c(0, 0)).is_err());
    }

    #[test]
    fn test_register_unknown_segment_is_noop() {
        let mut reg = EdgeRegistry::new(2, 2);
        assert!(!reg.register(SegmentId::Horizontal { row: 0, col: 1 }));
        assert!(!reg.register(SegmentId::Vertical { row: 1, col: 0 }));
        assert!(reg.is_empty());
        assert!(reg.drain_changes().is_empty());
    }

    #[test]
    fn test_clear_emits_hidden_changes() {
        let mut reg = EdgeRegistry::new(2, 2);
        let h = SegmentId::Horizontal { row: 0, col: 0 };
        let v = SegmentId::Vertical { row: 0, col: 1 };
        assert!(reg.register(h));
        assert!(reg.register(v));
        assert_eq!(reg.drain_changes(), vec![EdgeChange::Shown(h), EdgeChange::Shown(v)]);

        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.drain_changes(), vec![EdgeChange::Hidden(h), EdgeChange::Hidden(v)]);

        reg.clear();
        assert!(reg.drain_changes().is_empty());
    }

    #[test]
    fn test_clear_drops_undrained_changes() {
        let mut reg = EdgeRegistry::new(3, 3);
        let seen = SegmentId::Horizontal { row: 0, col: 0 };
        let fresh = SegmentId::Vertical { row: 0, col: 1 };
        assert!(reg.register(seen));
        reg.drain_changes();
        assert!(reg.register(fresh));

        reg.clear();
        assert_eq!(reg.drain_changes(), vec![EdgeChange::Hidden(seen)]);

        // Many draw/reset cycles without a renderer stay bounded.
        assert!(reg.register(seen));
        reg.drain_changes();
        for _ in 0..100 {
            assert!(reg.register(seen));
            assert!(reg.register(fresh));
            reg.clear();
        }
        assert_eq!(reg.drain_changes(), vec![EdgeChange::Hidden(seen)]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_edge_change_json() {
        let json = serde_json::to_string(&EdgeChange::Shown(SegmentId::Vertical { row: 3, col: 1 })).unwrap();
        assert_eq!(json, r#"{"kind":"shown","segment":"br3-1"}"#);
    }
}

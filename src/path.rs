//! Path State: the ordered list of visited cells plus a membership set.

use std::collections::HashSet;

use crate::types::Coordinate;

/// Ordered sequence of visited coordinates.
///
/// Manual play keeps it duplicate-free with each consecutive pair adjacent;
/// trusted replays may break either property (see `Controller::apply_trusted`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Coordinate>,
    members: HashSet<Coordinate>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// `[start]`, or empty when no start cell is known.
    pub fn seeded(start: Option<Coordinate>) -> Self {
        let mut path = Self::new();
        if let Some(start) = start {
            path.push(start);
        }
        path
    }

    pub fn push(&mut self, c: Coordinate) {
        self.members.insert(c);
        self.cells.push(c);
    }

    #[inline(always)]
    pub fn contains(&self, c: Coordinate) -> bool {
        self.members.contains(&c)
    }

    /// Terminal cell, the "last dot".
    pub fn last(&self) -> Option<Coordinate> {
        self.cells.last().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Number of different cells on the path.
    pub fn distinct_len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.iter().copied()
    }

    /// Consecutive pairs, one per drawn segment.
    pub fn steps(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.cells.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn to_vec(&self) -> Vec<Coordinate> {
        self.cells.clone()
    }
}

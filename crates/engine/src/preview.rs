//! Pointer-driven placement preview
//!
//! Given a pointer position over the board, pick the placement whose new
//! cells sit closest to it.

use turbostack_core::{Board, Placement};
use turbostack_types::{BOARD_HEIGHT, BOARD_WIDTH};

/// A position in cell units. `(0.5, 0.5)` is the centre of the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub i: f64,
    pub j: f64,
}

impl Point {
    pub fn new(i: f64, j: f64) -> Self {
        Self { i, j }
    }

    fn distance(self, other: Point) -> f64 {
        (self.i - other.i).hypot(self.j - other.j)
    }
}

/// Centre of the cells filled in `after` but not in `before`.
///
/// `None` if nothing was added.
pub fn center_of_mass(before: &Board, after: &Board) -> Option<Point> {
    let mut sum_i = 0.0;
    let mut sum_j = 0.0;
    let mut count = 0u32;

    for i in 0..BOARD_HEIGHT as usize {
        for j in 0..BOARD_WIDTH as usize {
            if after.get(i, j) && !before.get(i, j) {
                sum_i += i as f64 + 0.5;
                sum_j += j as f64 + 0.5;
                count += 1;
            }
        }
    }

    (count > 0).then(|| Point::new(sum_i / count as f64, sum_j / count as f64))
}

/// Index of the placement nearest `pointer`, first one on ties.
///
/// `None` when the board is finished or there is nothing to choose from.
pub fn closest_choice(board: &Board, placements: &[Placement], pointer: Point) -> Option<usize> {
    if board.finished() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, placement) in placements.iter().enumerate() {
        let distance = center_of_mass(board, &placement.board)
            .map_or(f64::INFINITY, |center| center.distance(pointer));
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}

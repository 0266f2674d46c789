//! Pieces module - orientation table and piece geometry
//!
//! Each orientation is a 16-bit mask over a 4x4 grid. Bit 15 is the top-left
//! cell and bits run row-major, so bit `15 - (4 * r + c)` covers row `r`,
//! column `c` of the grid. Every kind has exactly four table entries; kinds
//! with fewer distinct orientations repeat them so rotation is always a
//! step of `+1` or `+3` modulo 4.

use crate::error::{CoreError, CoreResult};
use crate::types::{PieceKind, RotateDir};

/// Four orientation masks for one piece kind.
pub type OrientationSet = [u16; 4];

/// Board cell `(row, col)`. Rows above the field are negative.
pub type CellPos = (i8, i8);

/// Orientation table, indexed by [`PieceKind::index`].
static ORIENTATIONS: [OrientationSet; 7] = [
    // I
    [
        0b0000_0000_1111_0000,
        0b0010_0010_0010_0010,
        0b0000_0000_1111_0000,
        0b0010_0010_0010_0010,
    ],
    // O
    [
        0b0000_0110_0110_0000,
        0b0000_0110_0110_0000,
        0b0000_0110_0110_0000,
        0b0000_0110_0110_0000,
    ],
    // J
    [
        0b0000_1110_0010_0000,
        0b0100_0100_1100_0000,
        0b1000_1110_0000_0000,
        0b0110_0100_0100_0000,
    ],
    // L
    [
        0b0000_1110_1000_0000,
        0b1100_0100_0100_0000,
        0b0010_1110_0000_0000,
        0b0100_0100_0110_0000,
    ],
    // S
    [
        0b0000_0110_1100_0000,
        0b0100_0110_0010_0000,
        0b0000_0110_1100_0000,
        0b0100_0110_0010_0000,
    ],
    // Z
    [
        0b0000_1100_0110_0000,
        0b0010_0110_0100_0000,
        0b0000_1100_0110_0000,
        0b0010_0110_0100_0000,
    ],
    // T
    [
        0b0000_1110_0100_0000,
        0b0100_1100_0100_0000,
        0b0100_1110_0000_0000,
        0b0100_0110_0100_0000,
    ],
];

/// All four table entries for a kind, repeats included.
pub fn orientations(kind: PieceKind) -> &'static OrientationSet {
    &ORIENTATIONS[kind.index()]
}

/// The distinct orientations of a kind, in table order.
pub fn distinct_orientations(kind: PieceKind) -> &'static [u16] {
    &ORIENTATIONS[kind.index()][..kind.rotation_period()]
}

/// Identity of a placement, used to deduplicate search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacementKey {
    pub kind: PieceKind,
    pub mask: u16,
    pub row: i8,
    pub col: i8,
}

/// A piece kind in one orientation, anchored at the top-left of its 4x4 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub mask: u16,
    pub row: i8,
    pub col: i8,
}

impl Piece {
    pub fn new(kind: PieceKind, mask: u16, row: i8, col: i8) -> Self {
        Self {
            kind,
            mask,
            row,
            col,
        }
    }

    /// Piece in table orientation `orientation % 4`, anchored at `(0, 0)`.
    pub fn spawn(kind: PieceKind, orientation: usize) -> Self {
        Self::new(kind, orientations(kind)[orientation % 4], 0, 0)
    }

    /// Decode the four occupied cells, scanning the mask row-major.
    pub fn cells(&self) -> CoreResult<[CellPos; 4]> {
        let mut cells = [(0i8, 0i8); 4];
        let mut found = 0;

        for k in 0..16u16 {
            if self.mask & (1 << (15 - k)) == 0 {
                continue;
            }
            cells[found] = (self.row + (k / 4) as i8, self.col + (k % 4) as i8);
            found += 1;
            if found == 4 {
                return Ok(cells);
            }
        }

        Err(CoreError::MalformedMask { mask: self.mask })
    }

    /// Index of the current mask in the kind's table.
    pub fn orientation_index(&self) -> CoreResult<usize> {
        orientations(self.kind)
            .iter()
            .position(|&m| m == self.mask)
            .ok_or(CoreError::UnknownOrientation {
                kind: self.kind,
                mask: self.mask,
            })
    }

    /// Rotate in place. Kind and anchor are unchanged.
    pub fn rotate(&mut self, dir: RotateDir) -> CoreResult<()> {
        let index = self.orientation_index()?;
        self.mask = orientations(self.kind)[(index + dir.offset()) % 4];
        Ok(())
    }

    pub fn rotated(mut self, dir: RotateDir) -> CoreResult<Self> {
        self.rotate(dir)?;
        Ok(self)
    }

    /// Copy moved `dcol` columns sideways.
    pub fn shifted(self, dcol: i8) -> Self {
        Self {
            col: self.col + dcol,
            ..self
        }
    }

    pub fn key(&self) -> PlacementKey {
        PlacementKey {
            kind: self.kind,
            mask: self.mask,
            row: self.row,
            col: self.col,
        }
    }
}

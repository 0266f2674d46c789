//! Placement search - every resting position a piece can legally reach
//!
//! Reachability is an approximation, not a pathfinder. A placement counts
//! when the piece can fall straight down into it, or when one corrective
//! action (a rotation either way, or a one-column shift either way) turns it
//! into something that can. A placement that needs two corrections is
//! reported unreachable.

use std::collections::HashSet;

use tracing::trace;

use crate::board::Board;
use crate::error::CoreResult;
use crate::pieces::{distinct_orientations, Piece};
use crate::types::{PieceKind, RotateDir, BOARD_HEIGHT, BOARD_WIDTH};

/// A legal placement: the piece where it lands and the board with it set.
///
/// The board has its ceiling check applied but no lines cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub piece: Piece,
    pub board: Board,
}

impl Board {
    /// True if any cell of `piece` hits a wall, the floor, or a filled cell.
    pub fn overlaps(&self, piece: &Piece) -> CoreResult<bool> {
        Ok(piece
            .cells()?
            .iter()
            .any(|&(i, j)| self.get_signed(i as i32, j as i32)))
    }

    /// True if every on-field cell of `piece` sits strictly above the stack
    /// in its column, so the piece could have fallen there unobstructed.
    pub fn reachable_by_simple_drop(&self, piece: &Piece) -> CoreResult<bool> {
        for (i, j) in piece.cells()? {
            if i < 0 {
                continue;
            }
            if i > BOARD_HEIGHT as i8 || !(0..BOARD_WIDTH as i8).contains(&j) {
                return Ok(false);
            }

            let cell_height = BOARD_HEIGHT as i8 - i;
            if cell_height <= self.column(j as usize).height() as i8 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn fits_by_drop(&self, piece: &Piece) -> CoreResult<bool> {
        Ok(!self.overlaps(piece)? && self.reachable_by_simple_drop(piece)?)
    }

    /// Legal if the piece does not overlap and is reachable by a straight
    /// drop, directly or after exactly one rotation or one-column shift.
    pub fn can_place(&self, piece: &Piece) -> CoreResult<bool> {
        if self.overlaps(piece)? {
            return Ok(false);
        }
        if self.reachable_by_simple_drop(piece)? {
            return Ok(true);
        }

        for dir in [RotateDir::Cw, RotateDir::Ccw] {
            if self.fits_by_drop(&piece.rotated(dir)?)? {
                return Ok(true);
            }
        }

        for dcol in [-1, 1] {
            if self.fits_by_drop(&piece.shifted(dcol))? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Every distinct legal placement of `kind` on this board.
    ///
    /// Candidates are generated by lining each cell of each orientation up
    /// with each rest position. The returned boards are independent clones;
    /// `self` is not modified. An empty result means the piece fits nowhere.
    pub fn find_placements(&self, kind: PieceKind) -> CoreResult<Vec<Placement>> {
        let rests = self.rest_positions();
        let mut seen = HashSet::new();
        let mut pieces = Vec::new();

        for &mask in distinct_orientations(kind) {
            let base = Piece::new(kind, mask, 0, 0);

            for (ci, cj) in base.cells()? {
                for &(ri, rj) in &rests {
                    let candidate = Piece::new(kind, mask, ri - ci, rj - cj);
                    if seen.contains(&candidate.key()) {
                        continue;
                    }
                    if self.can_place(&candidate)? {
                        seen.insert(candidate.key());
                        pieces.push(candidate);
                    }
                }
            }
        }

        trace!(
            kind = kind.as_str(),
            rests = rests.len(),
            placements = pieces.len(),
            "placement search"
        );

        pieces
            .into_iter()
            .map(|piece| {
                let mut board = self.clone();
                board.insert_piece_unchecked(&piece)?;
                board.apply_ceiling();
                Ok(Placement { piece, board })
            })
            .collect()
    }

    /// Every legal resulting board for `kind`, with full lines cleared and
    /// scored.
    pub fn find_legal_placements(&self, kind: PieceKind) -> CoreResult<Vec<Board>> {
        self.find_placements(kind)?
            .into_iter()
            .map(|placement| {
                let mut board = placement.board;
                board.remove_clears()?;
                Ok(board)
            })
            .collect()
    }
}

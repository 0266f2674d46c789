//! Greedy driver: draw a piece, score every placement, take the best.

use tracing::{debug, info};
use turbostack_core::{Board, SimpleRng};
use turbostack_types::PieceKind;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::evaluator::BoardScorer;

/// Result of one [`Autoplayer::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// A placement was adopted.
    Moved {
        kind: PieceKind,
        choices: usize,
        value: f64,
    },
    /// The piece fit nowhere, or the board was already finished.
    GameOver,
}

/// Totals at the end of [`Autoplayer::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub moves: u32,
    pub lines_cleared: u32,
    pub score: u32,
    pub tetrises: u32,
    pub finished: bool,
}

pub struct Autoplayer {
    board: Board,
    rng: SimpleRng,
    scorer: BoardScorer,
    moves: u32,
    max_moves: Option<u32>,
}

impl Autoplayer {
    pub fn new(config: &EngineConfig, scorer: BoardScorer) -> Self {
        Self::with_board(
            Board::new(config.lines_cleared_max),
            SimpleRng::new(config.seed),
            scorer,
        )
        .with_max_moves(config.max_moves)
    }

    /// Start from an arbitrary position.
    pub fn with_board(board: Board, rng: SimpleRng, scorer: BoardScorer) -> Self {
        Self {
            board,
            rng,
            scorer,
            moves: 0,
            max_moves: None,
        }
    }

    pub fn with_max_moves(mut self, max_moves: Option<u32>) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Draw a kind and play it.
    pub async fn step(&mut self) -> EngineResult<StepOutcome> {
        if self.board.finished() {
            return Ok(StepOutcome::GameOver);
        }
        let kind = self.rng.next_kind();
        self.step_with(kind).await
    }

    /// Play `kind` on the current board.
    ///
    /// On error the current board is left as it was.
    pub async fn step_with(&mut self, kind: PieceKind) -> EngineResult<StepOutcome> {
        if self.board.finished() {
            return Ok(StepOutcome::GameOver);
        }

        let mut choices = self.board.find_legal_placements(kind)?;
        if choices.is_empty() {
            self.board.mark_finished();
            info!(
                kind = kind.as_str(),
                moves = self.moves,
                "no legal placement"
            );
            return Ok(StepOutcome::GameOver);
        }

        let count = choices.len();
        let values = self.scorer.submit(choices.clone()).await?;
        let Some(best) = best_index(&values) else {
            return Ok(StepOutcome::GameOver);
        };

        self.board = choices.swap_remove(best);
        self.moves += 1;

        debug!(
            kind = kind.as_str(),
            choices = count,
            value = values[best],
            lines = self.board.lines_cleared(),
            "move"
        );

        Ok(StepOutcome::Moved {
            kind,
            choices: count,
            value: values[best],
        })
    }

    /// Step until the board is finished or the move cap is hit.
    pub async fn play(&mut self) -> EngineResult<GameSummary> {
        while !self.board.finished() && self.max_moves.map_or(true, |max| self.moves < max) {
            if self.step().await? == StepOutcome::GameOver {
                break;
            }
        }

        let summary = self.summary();
        info!(
            moves = summary.moves,
            lines = summary.lines_cleared,
            score = summary.score,
            tetrises = summary.tetrises,
            finished = summary.finished,
            "game over"
        );
        Ok(summary)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            moves: self.moves,
            lines_cleared: self.board.lines_cleared(),
            score: self.board.score(),
            tetrises: self.board.tetrises(),
            finished: self.board.finished(),
        }
    }
}

/// First index of the highest value. NaN never wins over a real number.
fn best_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        let value = if value.is_nan() {
            f64::NEG_INFINITY
        } else {
            value
        };
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::batched;
    use crate::heuristic;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use turbostack_batch::BatchConfig;

    #[test]
    fn best_index_prefers_first_maximum() {
        assert_eq!(best_index(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(best_index(&[f64::NAN, -1.0]), Some(1));
        assert_eq!(best_index(&[f64::NEG_INFINITY, f64::NEG_INFINITY]), Some(0));
        assert_eq!(best_index(&[]), None);
    }

    #[tokio::test]
    async fn step_adopts_a_placement() {
        let scorer = batched(BatchConfig::default(), heuristic::evaluator());
        let mut player = Autoplayer::new(&EngineConfig::default(), scorer);

        let outcome = player.step_with(PieceKind::O).await.unwrap();
        assert!(matches!(
            outcome,
            StepOutcome::Moved {
                kind: PieceKind::O,
                choices: 9,
                ..
            }
        ));
        assert_eq!(player.moves(), 1);
        assert_eq!(player.board().max_height(), 2);
    }

    #[tokio::test]
    async fn failed_evaluation_keeps_the_board() {
        let scorer = batched(BatchConfig::default(), |_boards: Vec<Board>| -> anyhow::Result<Vec<f64>> {
            anyhow::bail!("model offline")
        });
        let mut player = Autoplayer::new(&EngineConfig::default(), scorer);

        let err = player.step_with(PieceKind::T).await.unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("model offline"));
        assert_eq!(player.board(), &Board::default());
        assert_eq!(player.moves(), 0);
    }

    #[tokio::test]
    async fn recovers_after_a_failed_flush() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let scorer = batched(BatchConfig::default(), move |boards: Vec<Board>| -> anyhow::Result<Vec<f64>> {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("warming up");
            }
            Ok(boards.iter().map(heuristic::evaluate).collect())
        });
        let mut player = Autoplayer::new(&EngineConfig::default(), scorer);

        assert!(player.step_with(PieceKind::I).await.is_err());
        assert!(player.step_with(PieceKind::I).await.is_ok());
        assert_eq!(player.moves(), 1);
    }

    #[tokio::test]
    async fn no_room_ends_the_game() {
        let mut board = Board::default();
        for i in 0..20 {
            for j in 0..10 {
                if j != (i * 3) % 10 {
                    board.set(i, j, true);
                }
            }
        }
        let scorer = batched(BatchConfig::default(), heuristic::evaluator());
        let mut player = Autoplayer::with_board(board, SimpleRng::new(7), scorer);

        assert_eq!(
            player.step_with(PieceKind::O).await.unwrap(),
            StepOutcome::GameOver
        );
        assert!(player.board().finished());
        assert_eq!(player.step().await.unwrap(), StepOutcome::GameOver);
    }

    #[tokio::test]
    async fn play_respects_move_cap() {
        let config = EngineConfig {
            max_moves: Some(12),
            ..EngineConfig::default()
        };
        let scorer = batched(BatchConfig::default(), heuristic::evaluator());
        let mut player = Autoplayer::new(&config, scorer);

        let summary = player.play().await.unwrap();
        assert!(summary.moves <= 12);
        if !summary.finished {
            assert_eq!(summary.moves, 12);
        }
    }
}

use crate::board::{Board, Cell};
use crate::moves::mobility;
use crate::Score;

/// Scores a board for the side that has just moved
///
/// A side the opponent has left without a jump has won, a side without a
/// jump of its own has lost, otherwise the score is the difference in
/// mobility. Every landing of a multi-hop chain counts, so long chains of
/// captures are worth more than short ones.
pub fn evaluate(board: &Board, acting: Cell) -> Score {
    let own = mobility(board, acting);
    let other = mobility(board, acting.opponent());

    if other == 0 {
        Score::INFINITY
    } else if own == 0 {
        Score::NEG_INFINITY
    } else {
        own as Score - other as Score
    }
}

//! Replayable move queue
//!
//! [`MoveSequence`] splits the moves of a scenario into a `pending` queue
//! (head = next forward move) and a `history` stack (top = most recently
//! played). Moves only ever travel between the two, so
//! `pending.len() + history.len()` never changes.

use std::collections::VecDeque;

use crate::moves::Move;

/// Ordered, reversible list of moves with a cursor
#[derive(Clone, Debug, Default)]
pub struct MoveSequence {
    pending: VecDeque<Move>,
    history: Vec<Move>,
    total: usize,
}

impl MoveSequence {
    /// Create a sequence with every move pending
    pub fn new(moves: Vec<Move>) -> Self {
        let total = moves.len();
        let sequence = Self {
            pending: moves.into(),
            history: Vec::with_capacity(total),
            total,
        };
        log::debug!("{}", sequence.progress_label());
        sequence
    }

    /// Consume the next forward move
    ///
    /// Returns `None` once every move has been played.
    pub fn pop(&mut self) -> Option<Move> {
        let mv = self.pending.pop_front()?;
        self.history.push(mv.clone());
        log::debug!("{}", self.progress_label());
        Some(mv)
    }

    /// Step back over the most recently played move
    ///
    /// The move goes back to the head of the pending queue unchanged; the
    /// caller receives its reverse, which is what has to be animated.
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;
        let reversed = mv.reverse();
        self.pending.push_front(mv);
        log::debug!("{}", self.progress_label());
        Some(reversed)
    }

    /// The move [`pop`](Self::pop) would return
    #[inline]
    pub fn peek_next(&self) -> Option<&Move> {
        self.pending.front()
    }

    /// The move [`undo`](Self::undo) would reverse
    #[inline]
    pub fn last_played(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Number of moves played so far
    #[inline]
    pub fn cursor(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Move> {
        self.pending.iter()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Every move in scenario order, played or not
    pub fn all_moves(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().chain(self.pending.iter())
    }

    /// Check whether every move has been played
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Check whether no move has been played
    #[inline]
    pub fn is_at_start(&self) -> bool {
        self.history.is_empty()
    }

    /// Human-readable cursor, e.g. `Move #3 / #10`
    pub fn progress_label(&self) -> String {
        format!("Move #{} / #{}", self.cursor(), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{ModuleId, MoveKind};
    use modbot_math::{ModuleShape, Vec3};

    fn face_move(id: ModuleId) -> Move {
        Move::new(id, -Vec3::Y, Vec3::X, MoveKind::Pivot, false, ModuleShape::Cube)
    }

    fn sequence(n: u32) -> MoveSequence {
        MoveSequence::new((0..n).map(face_move).collect())
    }

    fn ids<'a>(moves: impl Iterator<Item = &'a Move>) -> Vec<ModuleId> {
        moves.map(Move::mover_id).collect()
    }

    #[test]
    fn test_new_sequence() {
        let seq = sequence(3);
        assert_eq!(seq.total(), 3);
        assert_eq!(seq.cursor(), 0);
        assert!(seq.is_at_start());
        assert!(!seq.is_finished());
        assert_eq!(seq.progress_label(), "Move #0 / #3");
    }

    #[test]
    fn test_pop_in_order() {
        let mut seq = sequence(3);
        assert_eq!(seq.pop().unwrap().mover_id(), 0);
        assert_eq!(seq.pop().unwrap().mover_id(), 1);
        assert_eq!(seq.cursor(), 2);
        assert_eq!(seq.progress_label(), "Move #2 / #3");
        assert_eq!(seq.peek_next().unwrap().mover_id(), 2);
    }

    #[test]
    fn test_pop_exhausted_is_noop() {
        let mut seq = sequence(1);
        assert!(seq.pop().is_some());
        assert!(seq.pop().is_none());
        assert_eq!(seq.cursor(), 1);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut seq = sequence(2);
        assert!(seq.undo().is_none());
        assert_eq!(seq.cursor(), 0);
        assert_eq!(seq.remaining(), 2);
    }

    #[test]
    fn test_undo_returns_reverse_and_requeues_original() {
        let mut seq = sequence(2);
        let played = seq.pop().unwrap();
        let undone = seq.undo().unwrap();

        assert_eq!(undone.delta_position(), -played.delta_position());
        assert_eq!(seq.peek_next(), Some(&played));
        assert_eq!(seq.cursor(), 0);
    }

    #[test]
    fn test_pop_then_undo_restores_lists() {
        let mut seq = sequence(4);
        seq.pop();
        seq.pop();
        let pending_before = ids(seq.pending());
        let history_before = ids(seq.history().iter());

        seq.pop();
        seq.undo();

        assert_eq!(ids(seq.pending()), pending_before);
        assert_eq!(ids(seq.history().iter()), history_before);
        assert_eq!(seq.pending().next().unwrap().delta_position(), Vec3::X);
    }

    #[test]
    fn test_conservation() {
        let mut seq = sequence(5);
        let script = [true, true, false, true, true, true, true, true, false, false, false, false, false, false];
        for forward in script {
            if forward {
                seq.pop();
            } else {
                seq.undo();
            }
            assert_eq!(seq.remaining() + seq.cursor(), 5);
            assert_eq!(seq.total(), 5);
        }
        assert_eq!(ids(seq.all_moves()), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_last_played() {
        let mut seq = sequence(2);
        assert!(seq.last_played().is_none());
        seq.pop();
        assert_eq!(seq.last_played().unwrap().mover_id(), 0);
    }

    #[test]
    fn test_empty_sequence() {
        let mut seq = MoveSequence::default();
        assert!(seq.is_finished());
        assert!(seq.pop().is_none());
        assert!(seq.undo().is_none());
        assert_eq!(seq.progress_label(), "Move #0 / #0");
    }
}

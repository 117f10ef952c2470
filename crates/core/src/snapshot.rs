use crate::types::{CellId, Color, Position};

/// Read-only copy of a session for observers.
///
/// Reuse one value with [`Session::snapshot_into`](crate::session::Session::snapshot_into)
/// to keep the row buffers allocated across frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameSnapshot {
    pub size: u8,
    /// Colors, row-major, row 0 at the top
    pub colors: Vec<Vec<Color>>,
    /// Cell identities, same layout as `colors`
    pub ids: Vec<Vec<CellId>>,
    pub selection: Option<Position>,
    pub score: u32,
    pub moves_left: u32,
    pub game_over: bool,
    pub busy: bool,
    pub faulted: bool,
    pub episode_id: u32,
    pub last_combo: u32,
    pub rng_state: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.size = 0;
        self.colors.clear();
        self.ids.clear();
        self.selection = None;
        self.score = 0;
        self.moves_left = 0;
        self.game_over = false;
        self.busy = false;
        self.faulted = false;
        self.episode_id = 0;
        self.last_combo = 0;
        self.rng_state = 0;
    }

    /// True when the session accepts selections
    pub fn playable(&self) -> bool {
        !self.game_over && !self.busy && !self.faulted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playable() {
        let mut snap = GameSnapshot::default();
        assert!(snap.playable());

        snap.busy = true;
        assert!(!snap.playable());

        snap.clear();
        snap.game_over = true;
        assert!(!snap.playable());
    }

    #[test]
    fn test_clear_keeps_nothing() {
        let mut snap = GameSnapshot {
            size: 3,
            colors: vec![vec![Color::Red; 3]; 3],
            score: 90,
            selection: Some(Position::new(1, 1)),
            ..GameSnapshot::default()
        };
        snap.clear();
        assert_eq!(snap, GameSnapshot::default());
    }
}

//! Core game session and the placement engine
//!
//! A placement runs to completion before the session accepts another:
//! validate, commit, score, clear, mode hook, then refill or game-over
//! detection. Sessions own all of their state; any number can coexist.

use crate::board::{Board, GRID_SIZE};
use crate::catalog::Generator;
use crate::mode::{GameMode, ModeState};
use crate::piece::Piece;
use crate::score;

/// Concurrent tray slots
pub const TRAY_SIZE: usize = 3;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    /// No legal move remains, or the Blast timer ran out
    GameOver,
    /// Adventure/Collect objective met
    LevelComplete,
}

/// Discrete audio cues emitted by the core. Fire-and-forget; the core never
/// depends on playback happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Pickup,
    Place,
    LineClear(usize),
    Combo,
    Collect,
    GameOver,
    LevelComplete,
    /// Star award with 1-based index, for staggered jingles
    Star(usize),
}

/// What a committed placement did, for the renderer
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    pub lines_cleared: usize,
    /// Cells emptied by the clear, for the flash effect
    pub cleared_cells: Vec<(usize, usize)>,
    /// Points gained by this placement, blocks and bonuses combined
    pub points: u64,
    /// Advisory combo/streak label, if any
    pub label: Option<String>,
}

/// One game session
pub struct Game {
    pub board: Board,
    tray: [Option<Piece>; TRAY_SIZE],
    generator: Generator,
    pub score: u64,
    /// Consecutive clearing placements; broken by any placement that clears
    /// zero lines
    pub streak: u32,
    /// Running best (Classic), updated live and persisted by the caller
    pub best_score: u64,
    pub state: GameState,
    pub mode_state: ModeState,
    /// Stars earned when an Adventure level completes (1-3)
    pub stars_earned: u8,
    cues: Vec<Cue>,
}

impl Game {
    pub fn new(mode_state: ModeState) -> Self {
        Self::with_seed(mode_state, rand::random())
    }

    /// Seeded constructor for deterministic sessions
    pub fn with_seed(mode_state: ModeState, seed: u64) -> Self {
        let with_icons = mode_state.mode() == GameMode::Collect;
        let mut board = Board::new();
        if let ModeState::Adventure(adv) = &mode_state {
            board.load_from_pattern(&adv.level().pattern);
        }
        let mut game = Self {
            board,
            tray: [None, None, None],
            generator: Generator::with_seed(with_icons, seed),
            score: 0,
            streak: 0,
            best_score: 0,
            state: GameState::Playing,
            mode_state,
            stars_earned: 0,
            cues: Vec::new(),
        };
        game.deal();
        game
    }

    pub fn mode(&self) -> GameMode {
        self.mode_state.mode()
    }

    pub fn tray(&self) -> &[Option<Piece>; TRAY_SIZE] {
        &self.tray
    }

    pub fn tray_piece(&self, slot: usize) -> Option<&Piece> {
        self.tray.get(slot).and_then(Option::as_ref)
    }

    /// Drain pending audio cues
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// A drag gesture picked up a tray piece
    pub fn notify_pickup(&mut self) {
        self.cues.push(Cue::Pickup);
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        };
    }

    /// Attempt to place the piece in `slot` with its bounding box anchored
    /// at (row, col). An invalid drop point is the common outcome of a drag
    /// and changes nothing; a committed placement runs the full sequence.
    pub fn try_place(&mut self, slot: usize, row: usize, col: usize) -> Option<PlacementOutcome> {
        if self.state != GameState::Playing {
            return None;
        }
        let piece = self.tray.get(slot)?.as_ref()?;
        if !self.board.can_place(&piece.shape, row, col) {
            return None;
        }

        // Commit
        let piece = self.tray[slot].take().expect("slot checked above");
        let blocks = self.board.place(&piece, row, col);
        let mut points = score::placement_points(blocks);
        self.cues.push(Cue::Place);

        // Clear resolution
        let (rows, cols) = self.board.find_completed_lines();
        let lines = rows.len() + cols.len();
        let mut cleared_cells = Vec::new();
        let mut label = None;
        if lines == 0 {
            self.streak = 0;
        } else {
            self.streak += 1;
            cleared_cells = Board::line_cells(&rows, &cols);
            let stats = self.board.clear(&rows, &cols);
            points += score::clear_points(lines, self.streak);
            label = score::classify_clear(lines, self.streak);

            self.cues.push(Cue::LineClear(lines));
            if lines >= 2 {
                self.cues.push(Cue::Combo);
            }
            if stats.icons.iter().any(|&c| c > 0) {
                self.cues.push(Cue::Collect);
            }

            // Mode hook
            self.mode_state
                .on_lines_cleared(lines, stats.targets, &stats.icons);
        }

        self.score += points;
        if self.score > self.best_score {
            self.best_score = self.score;
        }

        let outcome = PlacementOutcome {
            lines_cleared: lines,
            cleared_cells,
            points,
            label,
        };

        if self.mode_state.is_complete() {
            self.complete_level();
            return Some(outcome);
        }

        // Refill or game-over check
        if self.tray.iter().all(Option::is_none) {
            self.deal();
        } else if !self.can_any_piece_be_placed() {
            self.end_game();
        }

        Some(outcome)
    }

    /// One-second timer tick (Blast countdown)
    pub fn tick_second(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        if self.mode_state.on_time_tick() {
            self.end_game();
        }
    }

    /// True iff any remaining tray piece fits somewhere on the board
    pub fn can_any_piece_be_placed(&self) -> bool {
        self.tray
            .iter()
            .flatten()
            .any(|piece| self.board.can_place_anywhere(&piece.shape))
    }

    /// Deal a full tray of 3 pieces; only ever called with all slots empty
    fn deal(&mut self) {
        debug_assert!(self.tray.iter().all(Option::is_none));
        for slot in &mut self.tray {
            *slot = Some(self.generator.next_piece());
        }
        if !self.can_any_piece_be_placed() {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.state = GameState::GameOver;
        self.cues.push(Cue::GameOver);
        tracing::info!(score = self.score, mode = self.mode().name(), "game over");
    }

    fn complete_level(&mut self) {
        self.state = GameState::LevelComplete;
        self.cues.push(Cue::LevelComplete);
        if let ModeState::Adventure(adv) = &self.mode_state {
            let thresholds = adv.level().stars;
            let earned = thresholds.iter().filter(|&&t| self.score >= t).count();
            // Meeting the objective is always worth at least one star
            self.stars_earned = earned.max(1) as u8;
            for star in 1..=self.stars_earned as usize {
                self.cues.push(Cue::Star(star));
            }
        }
        tracing::info!(
            score = self.score,
            stars = self.stars_earned,
            mode = self.mode().name(),
            "objective complete"
        );
    }

    #[cfg(test)]
    fn set_tray(&mut self, slot: usize, piece: Option<Piece>) {
        self.tray[slot] = piece;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Block, Cell};
    use crate::mode::BLAST_TIME;
    use crate::piece::{BlockColor, Shape};

    fn piece(pattern: &[&str]) -> Piece {
        Piece::new(Shape::from_pattern(pattern), BlockColor::Cyan)
    }

    fn classic_game() -> Game {
        Game::with_seed(ModeState::classic(), 1)
    }

    fn fill_row_except(game: &mut Game, row: usize, skip: &[usize]) {
        for c in 0..GRID_SIZE {
            if !skip.contains(&c) {
                game.board.set(row, c, Cell::Filled(Block::plain(BlockColor::Red)));
            }
        }
    }

    #[test]
    fn test_session_starts_with_full_tray() {
        let game = classic_game();
        assert!(game.tray().iter().all(Option::is_some));
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_invalid_drop_changes_nothing() {
        let mut game = classic_game();
        game.set_tray(0, Some(piece(&["XXXXX"])));
        // An occupied cell under the bar's footprint rejects the drop
        game.board.set(0, 2, Cell::Filled(Block::plain(BlockColor::Red)));
        assert!(game.try_place(0, 0, 0).is_none());
        assert_eq!(game.score, 0);
        assert!(game.tray_piece(0).is_some());
        // Anchor that would run off the board
        assert!(game.try_place(0, 0, 4).is_none());
    }

    #[test]
    fn test_full_row_scores_88() {
        let mut game = classic_game();
        game.set_tray(0, Some(piece(&["XXXXXXXX"])));
        let outcome = game.try_place(0, 0, 0).expect("placement fits");
        assert_eq!(outcome.lines_cleared, 1);
        // 8 blocks + 1 line * 10 * 8
        assert_eq!(outcome.points, 88);
        assert_eq!(game.score, 88);
        assert_eq!(game.streak, 1);
        // Cleared row is empty again
        assert_eq!(game.board.find_completed_lines(), (vec![], vec![]));
    }

    #[test]
    fn test_last_gap_clears_mixed_colors() {
        let mut game = classic_game();
        fill_row_except(&mut game, 3, &[7]);
        game.set_tray(0, Some(piece(&["X"])));
        let outcome = game.try_place(0, 3, 7).expect("fits in the gap");
        assert_eq!(outcome.lines_cleared, 1);
        for c in 0..GRID_SIZE {
            assert!(game.board.get(3, c).unwrap().is_empty());
        }
    }

    #[test]
    fn test_streak_rises_and_resets() {
        let mut game = classic_game();

        fill_row_except(&mut game, 0, &[7]);
        game.set_tray(0, Some(piece(&["X"])));
        game.try_place(0, 0, 7).unwrap();
        assert_eq!(game.streak, 1);

        fill_row_except(&mut game, 1, &[7]);
        game.set_tray(1, Some(piece(&["X"])));
        game.try_place(1, 1, 7).unwrap();
        assert_eq!(game.streak, 2);

        // A non-clearing placement breaks the streak
        game.set_tray(2, Some(piece(&["X"])));
        game.try_place(2, 7, 0).unwrap();
        assert_eq!(game.streak, 0);
    }

    #[test]
    fn test_streak_bonus_applied() {
        let mut game = classic_game();
        fill_row_except(&mut game, 0, &[7]);
        game.set_tray(0, Some(piece(&["X"])));
        let first = game.try_place(0, 0, 7).unwrap();
        assert_eq!(first.points, 81);

        fill_row_except(&mut game, 1, &[7]);
        game.set_tray(1, Some(piece(&["X"])));
        let second = game.try_place(1, 1, 7).unwrap();
        // 1 block + 80 line + (streak 2 - 1) * 10
        assert_eq!(second.points, 91);
        assert_eq!(second.label.as_deref(), Some("COMBO!"));
    }

    #[test]
    fn test_simultaneous_row_and_column() {
        let mut game = classic_game();
        fill_row_except(&mut game, 0, &[0]);
        for r in 1..GRID_SIZE {
            game.board.set(r, 0, Cell::Filled(Block::plain(BlockColor::Blue)));
        }
        game.set_tray(0, Some(piece(&["X"])));
        let outcome = game.try_place(0, 0, 0).unwrap();
        assert_eq!(outcome.lines_cleared, 2);
        assert_eq!(outcome.cleared_cells.len(), 15);
        // 1 block + 2*80 + 1*80 multi bonus
        assert_eq!(outcome.points, 1 + 160 + 80);
        assert_eq!(outcome.label.as_deref(), Some("DOUBLE!"));
        assert!(game.board.is_empty());
    }

    #[test]
    fn test_best_score_tracks_live() {
        let mut game = classic_game();
        game.best_score = 50;
        game.set_tray(0, Some(piece(&["XXXXXXXX"])));
        game.try_place(0, 0, 0).unwrap();
        assert_eq!(game.best_score, 88);
    }

    #[test]
    fn test_tray_refills_only_when_empty() {
        let mut game = classic_game();
        game.set_tray(0, Some(piece(&["X"])));
        game.set_tray(1, Some(piece(&["X"])));
        game.set_tray(2, None);

        game.try_place(0, 7, 0).unwrap();
        // One piece left, no refill yet
        assert_eq!(game.tray().iter().flatten().count(), 1);

        game.try_place(1, 7, 1).unwrap();
        // Tray went empty, so a fresh deal of 3 arrived
        assert_eq!(game.tray().iter().flatten().count(), 3);
    }

    #[test]
    fn test_no_legal_move_ends_session() {
        let mut game = classic_game();
        // Fill the board except two isolated holes per row and column, so
        // no line ever completes and no two free cells are adjacent
        for r in 0..GRID_SIZE {
            fill_row_except(&mut game, r, &[]);
        }
        for i in 0..GRID_SIZE {
            game.board.set(i, i, Cell::Empty);
            game.board.set(i, (i + 4) % GRID_SIZE, Cell::Empty);
        }
        game.set_tray(0, Some(piece(&["X", "X"])));
        game.set_tray(1, Some(piece(&["XX", "XX"])));
        game.set_tray(2, Some(piece(&["X"])));

        let outcome = game.try_place(2, 0, 0).unwrap();
        assert_eq!(outcome.lines_cleared, 0);
        // Both remaining pieces need adjacent free cells; none exist
        assert_eq!(game.state, GameState::GameOver);
    }

    #[test]
    fn test_adventure_objective_across_placements() {
        // Level 1 "Two Lines": rows 5 and 7 each miss columns 3 and 4
        let mut game = Game::with_seed(ModeState::adventure(1), 1);
        game.set_tray(0, Some(piece(&["XX"])));
        game.set_tray(1, Some(piece(&["XX"])));
        game.try_place(0, 5, 3).unwrap();
        assert_eq!(game.state, GameState::Playing);
        let outcome = game.try_place(1, 7, 3).unwrap();
        assert_eq!(outcome.lines_cleared, 1);
        assert_eq!(game.state, GameState::LevelComplete);
        assert!(game.stars_earned >= 1);
    }

    #[test]
    fn test_adventure_two_lines_single_placement() {
        let mut game = Game::with_seed(ModeState::adventure(1), 1);
        // Fill row 6 to match the seeded row 5, leaving a 2x2 window at
        // columns 3-4 spanning both rows
        for c in 0..GRID_SIZE {
            if c != 3 && c != 4 {
                game.board.set(6, c, Cell::Filled(Block::plain(BlockColor::Red)));
            }
        }
        game.set_tray(0, Some(piece(&["XX", "XX"])));
        let outcome = game.try_place(0, 5, 3).unwrap();
        assert_eq!(outcome.lines_cleared, 2);
        // Both lines in one placement complete the objective immediately
        assert_eq!(game.state, GameState::LevelComplete);
    }

    #[test]
    fn test_adventure_minimum_one_star() {
        let mut game = Game::with_seed(ModeState::adventure(0), 1);
        // Complete the "clear 1 line" objective with minimal score: the
        // seeded row 6 misses columns 3 and 4
        game.set_tray(0, Some(piece(&["XX"])));
        game.try_place(0, 6, 3).unwrap();
        assert_eq!(game.state, GameState::LevelComplete);
        // Score 2 + 80 = 82 is above level 0's first threshold of 30, so
        // this earns 2 stars; the floor only matters below 30
        assert_eq!(game.stars_earned, 2);
    }

    #[test]
    fn test_blast_timer_bonus_and_expiry() {
        let mut game = Game::with_seed(ModeState::blast(), 1);
        if let ModeState::Blast(blast) = &mut game.mode_state {
            blast.seconds_remaining = 5;
        }
        // Clear 3 lines at once: rows 0-2 full except a 1x3 vertical window
        for r in 0..3 {
            fill_row_except(&mut game, r, &[4]);
        }
        game.set_tray(0, Some(piece(&["X", "X", "X"])));
        let outcome = game.try_place(0, 0, 4).unwrap();
        assert_eq!(outcome.lines_cleared, 3);
        if let ModeState::Blast(blast) = &game.mode_state {
            assert_eq!(blast.seconds_remaining, 5 + 3 * 5);
        } else {
            unreachable!();
        }

        // Ticking down to zero ends the session
        let mut game = Game::with_seed(ModeState::blast(), 1);
        for _ in 0..BLAST_TIME {
            game.tick_second();
        }
        assert_eq!(game.state, GameState::GameOver);
        assert!(game.take_cues().contains(&Cue::GameOver));
    }

    #[test]
    fn test_pause_blocks_placement_and_ticks() {
        let mut game = Game::with_seed(ModeState::blast(), 1);
        game.toggle_pause();
        assert_eq!(game.state, GameState::Paused);
        game.tick_second();
        if let ModeState::Blast(blast) = &game.mode_state {
            assert_eq!(blast.seconds_remaining, BLAST_TIME);
        }
        assert!(game.try_place(0, 0, 0).is_none());
        game.toggle_pause();
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn test_cues_emitted_in_order() {
        let mut game = classic_game();
        game.take_cues();
        fill_row_except(&mut game, 0, &[7]);
        game.set_tray(0, Some(piece(&["X"])));
        game.try_place(0, 0, 7).unwrap();
        let cues = game.take_cues();
        assert_eq!(cues, vec![Cue::Place, Cue::LineClear(1)]);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = classic_game();
        let b = classic_game();
        fill_row_except(&mut a, 0, &[7]);
        a.set_tray(0, Some(piece(&["X"])));
        a.try_place(0, 0, 7).unwrap();
        assert!(a.score > 0);
        assert_eq!(b.score, 0);
        assert!(b.board.is_empty());
    }
}

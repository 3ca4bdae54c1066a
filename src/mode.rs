//! Game modes: Classic, Adventure, Blast, Collect
//!
//! Each mode is a variant of `ModeState`, driven through one hook point by
//! the placement engine: `on_lines_cleared` after every clearing placement,
//! `on_time_tick` once per second (Blast), and `is_complete` as the
//! objective predicate.

use crate::levels::{Level, Objective, LEVELS};
use crate::piece::Icon;

/// Blast mode starting countdown, in seconds
pub const BLAST_TIME: u32 = 60;
/// Seconds added per line cleared in Blast mode
pub const BLAST_LINE_BONUS: u32 = 5;
/// Collect mode goal per icon type
pub const COLLECT_GOAL: u32 = 12;

/// Available game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Classic,
    Adventure,
    Blast,
    Collect,
}

impl GameMode {
    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Adventure => "Adventure",
            GameMode::Blast => "Blast",
            GameMode::Collect => "Collect",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Classic => "Endless - play until no piece fits",
            GameMode::Adventure => "Clear each level's objective for stars",
            GameMode::Blast => "Beat the clock - cleared lines add time",
            GameMode::Collect => "Clear lines to gather all the icons",
        }
    }
}

/// Adventure progress against one level's objective
#[derive(Debug, Clone)]
pub struct AdventureState {
    pub level_index: usize,
    pub objective: Objective,
    /// Targets or lines still needed
    pub remaining: u32,
}

impl AdventureState {
    pub fn level(&self) -> &'static Level {
        &LEVELS[self.level_index]
    }

    /// Progress already made, for the objective bar
    pub fn done(&self) -> u32 {
        self.level().objective_count().saturating_sub(self.remaining)
    }
}

/// Blast countdown state
#[derive(Debug, Clone)]
pub struct BlastState {
    pub seconds_remaining: u32,
}

/// Collect icon tallies, indexed by `Icon::index`
#[derive(Debug, Clone)]
pub struct CollectState {
    pub counts: [u32; Icon::COUNT],
    pub goal: u32,
}

/// Mode-specific session state, updated through the placement engine's hook
#[derive(Debug, Clone)]
pub enum ModeState {
    Classic,
    Adventure(AdventureState),
    Blast(BlastState),
    Collect(CollectState),
}

impl ModeState {
    pub fn classic() -> Self {
        ModeState::Classic
    }

    pub fn adventure(level_index: usize) -> Self {
        let level = &LEVELS[level_index];
        ModeState::Adventure(AdventureState {
            level_index,
            objective: level.objective,
            remaining: level.objective_count(),
        })
    }

    pub fn blast() -> Self {
        ModeState::Blast(BlastState {
            seconds_remaining: BLAST_TIME,
        })
    }

    pub fn collect() -> Self {
        ModeState::Collect(CollectState {
            counts: [0; Icon::COUNT],
            goal: COLLECT_GOAL,
        })
    }

    pub fn mode(&self) -> GameMode {
        match self {
            ModeState::Classic => GameMode::Classic,
            ModeState::Adventure(_) => GameMode::Adventure,
            ModeState::Blast(_) => GameMode::Blast,
            ModeState::Collect(_) => GameMode::Collect,
        }
    }

    /// Hook invoked after every placement that cleared at least one line
    pub fn on_lines_cleared(&mut self, lines: usize, targets: usize, icons: &[u32; Icon::COUNT]) {
        match self {
            ModeState::Classic => {}
            ModeState::Adventure(adv) => {
                let progress = match adv.objective {
                    Objective::Lines(_) => lines as u32,
                    Objective::Targets => targets as u32,
                };
                adv.remaining = adv.remaining.saturating_sub(progress);
            }
            ModeState::Blast(blast) => {
                blast.seconds_remaining += lines as u32 * BLAST_LINE_BONUS;
            }
            ModeState::Collect(collect) => {
                for (count, cleared) in collect.counts.iter_mut().zip(icons) {
                    *count += cleared;
                }
            }
        }
    }

    /// Objective completion predicate. Classic and Blast never "complete";
    /// they end by no-legal-move or time-out.
    pub fn is_complete(&self) -> bool {
        match self {
            ModeState::Classic | ModeState::Blast(_) => false,
            ModeState::Adventure(adv) => adv.remaining == 0,
            ModeState::Collect(collect) => collect.counts.iter().all(|&c| c >= collect.goal),
        }
    }

    /// One-second countdown tick. Returns true when the Blast timer expires;
    /// a no-op for every other mode.
    pub fn on_time_tick(&mut self) -> bool {
        if let ModeState::Blast(blast) = self {
            blast.seconds_remaining = blast.seconds_remaining.saturating_sub(1);
            blast.seconds_remaining == 0
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ICONS: [u32; Icon::COUNT] = [0; Icon::COUNT];

    #[test]
    fn test_classic_never_completes() {
        let mut state = ModeState::classic();
        state.on_lines_cleared(8, 0, &NO_ICONS);
        assert!(!state.is_complete());
        assert!(!state.on_time_tick());
    }

    #[test]
    fn test_adventure_lines_objective() {
        // Level 1 ("Two Lines") asks for 2 lines
        let mut state = ModeState::adventure(1);
        assert!(!state.is_complete());
        // Both lines in one placement complete it immediately
        state.on_lines_cleared(2, 0, &NO_ICONS);
        assert!(state.is_complete());
    }

    #[test]
    fn test_adventure_lines_overshoot_saturates() {
        let mut state = ModeState::adventure(0);
        state.on_lines_cleared(3, 0, &NO_ICONS);
        assert!(state.is_complete());
        if let ModeState::Adventure(adv) = &state {
            assert_eq!(adv.remaining, 0);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_adventure_targets_objective() {
        // Level 2 ("Corner") has 4 target cells
        let mut state = ModeState::adventure(2);
        state.on_lines_cleared(1, 3, &NO_ICONS);
        assert!(!state.is_complete());
        state.on_lines_cleared(1, 1, &NO_ICONS);
        assert!(state.is_complete());
    }

    #[test]
    fn test_blast_line_bonus() {
        let mut state = ModeState::blast();
        if let ModeState::Blast(blast) = &mut state {
            blast.seconds_remaining = 5;
        }
        state.on_lines_cleared(3, 0, &NO_ICONS);
        if let ModeState::Blast(blast) = &state {
            assert_eq!(blast.seconds_remaining, 20);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_blast_tick_expires() {
        let mut state = ModeState::blast();
        for _ in 0..(BLAST_TIME - 1) {
            assert!(!state.on_time_tick());
        }
        assert!(state.on_time_tick());
        // Blast ends by time-out, never by is_complete
        assert!(!state.is_complete());
    }

    #[test]
    fn test_collect_requires_every_icon() {
        let mut state = ModeState::collect();
        let mut all = [COLLECT_GOAL; Icon::COUNT];
        all[Icon::Bolt.index()] = COLLECT_GOAL - 1;
        state.on_lines_cleared(1, 0, &all);
        assert!(!state.is_complete());
        let mut last = [0; Icon::COUNT];
        last[Icon::Bolt.index()] = 1;
        state.on_lines_cleared(1, 0, &last);
        assert!(state.is_complete());
    }
}

//! Adventure level catalog
//!
//! Pattern characters: '.' empty, lowercase color code for a plain block,
//! the uppercase form for a target block. Target objectives derive their
//! count from the pattern at load time.

/// What a level asks the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Clear this many lines in total
    Lines(u32),
    /// Clear every target-flagged cell in the seed pattern
    Targets,
}

/// One Adventure level definition
#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub name: &'static str,
    pub pattern: [&'static str; 8],
    pub objective: Objective,
    /// Ascending score thresholds for 1-3 stars
    pub stars: [u64; 3],
}

impl Level {
    /// Target cells in the seed pattern (uppercase characters)
    pub fn target_count(&self) -> u32 {
        self.pattern
            .iter()
            .flat_map(|row| row.chars())
            .filter(|ch| ch.is_ascii_uppercase())
            .count() as u32
    }

    /// The objective's remaining-count at session start
    pub fn objective_count(&self) -> u32 {
        match self.objective {
            Objective::Lines(count) => count,
            Objective::Targets => self.target_count(),
        }
    }

    /// Objective text for the UI
    pub fn objective_text(&self) -> String {
        match self.objective {
            Objective::Lines(count) => format!("Clear {} lines", count),
            Objective::Targets => "Clear target blocks".to_string(),
        }
    }
}

/// The full level catalog, in play order
pub static LEVELS: &[Level] = &[
    Level {
        name: "First Steps",
        pattern: ["........", "........", "........", "........", "........", "........", "rrr..rrr", "........"],
        objective: Objective::Lines(1),
        stars: [30, 60, 120],
    },
    Level {
        name: "Two Lines",
        pattern: ["........", "........", "........", "........", "........", "bbb..bbb", "........", "ggg..ggg"],
        objective: Objective::Lines(2),
        stars: [50, 100, 200],
    },
    Level {
        name: "Corner",
        pattern: ["RR......", "RR......", "........", "........", "........", "........", "........", "........"],
        objective: Objective::Targets,
        stars: [40, 80, 160],
    },
    Level {
        name: "The Gap",
        pattern: ["........", "........", "........", "rrrRrrrr", "........", "........", "........", "........"],
        objective: Objective::Targets,
        stars: [40, 90, 180],
    },
    Level {
        name: "Two Gaps",
        pattern: ["........", "........", "ggg.gggg", "........", "........", "bbb.bbbb", "........", "........"],
        objective: Objective::Lines(2),
        stars: [60, 120, 240],
    },
    Level {
        name: "L-Shape",
        pattern: ["........", "........", "..rrr...", "..r.....", "..r.....", "........", "........", "........"],
        objective: Objective::Lines(1),
        stars: [50, 100, 200],
    },
    Level {
        name: "Walls",
        pattern: ["r......r", "r......r", "r......r", "r......r", "r......r", "r......r", "r......r", "R......R"],
        objective: Objective::Targets,
        stars: [80, 160, 320],
    },
    Level {
        name: "Checkers",
        pattern: ["........", "........", ".r.r.r..", "..r.r.r.", "........", "........", "........", "........"],
        objective: Objective::Lines(2),
        stars: [70, 140, 280],
    },
    Level {
        name: "Staircase",
        pattern: ["........", "........", "........", "b.......", "bb......", "bbb.....", "bbbb....", "BBBBB..."],
        objective: Objective::Targets,
        stars: [80, 160, 300],
    },
    Level {
        name: "The Cross",
        pattern: ["...R....", "...r....", "...r....", "RRRRRRRR", "...r....", "...r....", "...R....", "........"],
        objective: Objective::Targets,
        stars: [100, 200, 400],
    },
    Level {
        name: "Diamond",
        pattern: ["...g....", "..gGg...", "...g....", "........", "........", "........", "........", "........"],
        objective: Objective::Targets,
        stars: [60, 120, 240],
    },
    Level {
        name: "Frame",
        pattern: ["rrrrrrrr", "r......r", "r......r", "r......r", "r......r", "r......r", "r......r", "RRRRRRRR"],
        objective: Objective::Targets,
        stars: [120, 240, 480],
    },
    Level {
        name: "Zigzag",
        pattern: ["........", "........", "rr......", "..rr....", "....rr..", "......rr", "........", "........"],
        objective: Objective::Lines(2),
        stars: [80, 160, 320],
    },
    Level {
        name: "Islands",
        pattern: ["........", "........", ".RR..RR.", "........", "........", ".RR..RR.", "........", "........"],
        objective: Objective::Targets,
        stars: [90, 180, 360],
    },
    Level {
        name: "Almost There",
        pattern: ["........", "........", "........", "bBbbbbbb", "........", "gggggGg.", "........", "........"],
        objective: Objective::Targets,
        stars: [60, 120, 240],
    },
    Level {
        name: "T-Block",
        pattern: ["........", "..rrr...", "...r....", "...r....", "........", "........", "........", "........"],
        objective: Objective::Lines(2),
        stars: [80, 160, 320],
    },
    Level {
        name: "Columns",
        pattern: ["r..b..g.", "r..b..g.", "r..b..g.", "r..b..g.", "r..b..g.", "R..B..G.", "........", "........"],
        objective: Objective::Targets,
        stars: [100, 200, 400],
    },
    Level {
        name: "Fortress",
        pattern: ["........", "rrRrrRrr", "r......r", "r......r", "r......r", "r......r", "rrrrrrrr", "........"],
        objective: Objective::Targets,
        stars: [120, 240, 480],
    },
    Level {
        name: "Scattered",
        pattern: ["R...R...", "........", "....R...", "........", "R.......", "........", "...R...R", "........"],
        objective: Objective::Targets,
        stars: [100, 200, 400],
    },
    Level {
        name: "Half Full",
        pattern: ["rrrrrrrr", "bbbbbbbb", "gggggggg", "yyyyyyyy", "........", "........", "........", "........"],
        objective: Objective::Lines(4),
        stars: [120, 240, 500],
    },
    Level {
        name: "Spiral",
        pattern: ["rrrrrrrr", "........", "rrrrrr.r", "r......r", "r.rrrr.r", "r.r..r.r", "r.R....r", "r.rrrrrr"],
        objective: Objective::Targets,
        stars: [130, 260, 520],
    },
    Level {
        name: "Arrows",
        pattern: ["...R....", "..rrr...", ".rrrrr..", "........", "........", ".bbbbb..", "..bbb...", "...B...."],
        objective: Objective::Targets,
        stars: [100, 200, 400],
    },
    Level {
        name: "Tight Fit",
        pattern: ["rBrrrrrr", "rrrrrGrr", "rrRrrrrr", "rrrrrrrr", "........", "........", "........", "........"],
        objective: Objective::Targets,
        stars: [120, 240, 500],
    },
    Level {
        name: "Donut",
        pattern: ["..rrrr..", "..r..r..", "..r..r..", "..rRRr..", "..rRRr..", "..r..r..", "..r..r..", "..rrrr.."],
        objective: Objective::Targets,
        stars: [140, 280, 560],
    },
    Level {
        name: "Stripes",
        pattern: ["rrrrrrrr", "........", "bbbbbbbb", "........", "gggggggg", "........", "RRRRRRRR", "........"],
        objective: Objective::Targets,
        stars: [100, 200, 400],
    },
    Level {
        name: "Maze",
        pattern: ["r.r.r.r.", "r.r.r.r.", ".r.r.r.r", ".r.r.r.r", "r.r.r.r.", "r.r.r.r.", ".r.r.R.r", ".r.r.r.r"],
        objective: Objective::Targets,
        stars: [140, 280, 560],
    },
    Level {
        name: "Loaded",
        pattern: ["rrbbggyy", "rrbbggyy", "ppoocc..", "ppoocc..", "........", "........", "........", "........"],
        objective: Objective::Lines(4),
        stars: [150, 300, 600],
    },
    Level {
        name: "Final Push",
        pattern: ["RbRbRbRb", "bRbRbRbR", "........", "........", "........", "........", "RgRgRgRg", "gRgRgRgR"],
        objective: Objective::Targets,
        stars: [180, 360, 720],
    },
    Level {
        name: "Gauntlet",
        pattern: ["RRRRRRRr", "r......r", "rr.rrr.r", "r..r...r", "r.rrrr.r", "r......r", "rRRRRRRr", "........"],
        objective: Objective::Targets,
        stars: [200, 400, 800],
    },
    Level {
        name: "Grand Finale",
        pattern: ["RbRgRbRg", "bRgRbRgR", "RgRbRgRb", "gRbRgRbR", "........", "........", "........", "........"],
        objective: Objective::Targets,
        stars: [250, 500, 1000],
    },
];

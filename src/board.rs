//! Game board representation, placement validity, and line clearing

use crate::piece::{BlockColor, Icon, Piece, Shape};

/// The board is a fixed 8×8 grid
pub const GRID_SIZE: usize = 8;

/// Contents of an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub color: BlockColor,
    /// Adventure-mode target flag
    pub target: bool,
    /// Collect-mode collectible icon
    pub icon: Option<Icon>,
}

impl Block {
    pub fn plain(color: BlockColor) -> Self {
        Self {
            color,
            target: false,
            icon: None,
        }
    }
}

/// A cell on the board - either empty or filled with a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Block),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn block(&self) -> Option<&Block> {
        match self {
            Cell::Empty => None,
            Cell::Filled(block) => Some(block),
        }
    }
}

/// Aggregate counts from a clear, captured before the cells are emptied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearStats {
    /// Distinct cells cleared (a row/column intersection counts once)
    pub cells: usize,
    /// Target-flagged cells cleared (Adventure)
    pub targets: usize,
    /// Icons cleared, indexed by `Icon::index` (Collect)
    pub icons: [u32; Icon::COUNT],
}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    /// Grid stored as [row][col], row 0 at the top
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Get the cell at a position, or None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        Some(self.cells[row][col])
    }

    /// True iff every filled shape cell maps to an in-bounds, empty board cell
    pub fn can_place(&self, shape: &Shape, row: usize, col: usize) -> bool {
        shape.cells().iter().all(|&(r, c)| {
            let (gr, gc) = (row + r, col + c);
            gr < GRID_SIZE && gc < GRID_SIZE && self.cells[gr][gc].is_empty()
        })
    }

    /// Write a piece's cells onto the board and return the number of blocks
    /// written. Caller must have checked `can_place`.
    pub fn place(&mut self, piece: &Piece, row: usize, col: usize) -> usize {
        debug_assert!(self.can_place(&piece.shape, row, col));
        for (i, &(r, c)) in piece.shape.cells().iter().enumerate() {
            self.cells[row + r][col + c] = Cell::Filled(Block {
                color: piece.color,
                target: false,
                icon: piece.icon_at(i),
            });
        }
        piece.shape.block_count()
    }

    /// Completed rows and columns, evaluated independently of each other
    pub fn find_completed_lines(&self) -> (Vec<usize>, Vec<usize>) {
        let rows = (0..GRID_SIZE)
            .filter(|&r| self.cells[r].iter().all(Cell::is_filled))
            .collect();
        let cols = (0..GRID_SIZE)
            .filter(|&c| (0..GRID_SIZE).all(|r| self.cells[r][c].is_filled()))
            .collect();
        (rows, cols)
    }

    /// Empty the union of the given rows and columns, returning aggregate
    /// counts gathered before the cells are nulled. Cells belonging to both a
    /// cleared row and a cleared column are counted and cleared once.
    pub fn clear(&mut self, rows: &[usize], cols: &[usize]) -> ClearStats {
        let mut stats = ClearStats::default();
        let mut marked = [[false; GRID_SIZE]; GRID_SIZE];
        for &r in rows {
            for c in 0..GRID_SIZE {
                marked[r][c] = true;
            }
        }
        for &c in cols {
            for r in 0..GRID_SIZE {
                marked[r][c] = true;
            }
        }

        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if !marked[r][c] {
                    continue;
                }
                if let Cell::Filled(block) = self.cells[r][c] {
                    stats.cells += 1;
                    if block.target {
                        stats.targets += 1;
                    }
                    if let Some(icon) = block.icon {
                        stats.icons[icon.index()] += 1;
                    }
                }
                self.cells[r][c] = Cell::Empty;
            }
        }
        stats
    }

    /// Cells belonging to the union of the given rows and columns, for the
    /// renderer's clear flash. Deduplicated, in row-major order.
    pub fn line_cells(rows: &[usize], cols: &[usize]) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if rows.contains(&r) || cols.contains(&c) {
                    out.push((r, c));
                }
            }
        }
        out
    }

    /// Exhaustive anchor scan: is there any position where this shape fits?
    pub fn can_place_anywhere(&self, shape: &Shape) -> bool {
        if shape.rows() > GRID_SIZE || shape.cols() > GRID_SIZE {
            return false;
        }
        for row in 0..=(GRID_SIZE - shape.rows()) {
            for col in 0..=(GRID_SIZE - shape.cols()) {
                if self.can_place(shape, row, col) {
                    return true;
                }
            }
        }
        false
    }

    /// Lines that would complete if the shape were dropped at this anchor,
    /// simulated without mutating the board. Used for the ghost highlight.
    pub fn lines_completed_by(&self, shape: &Shape, row: usize, col: usize) -> (Vec<usize>, Vec<usize>) {
        let mut sim = self.clone();
        for &(r, c) in shape.cells() {
            sim.cells[row + r][col + c] = Cell::Filled(Block::plain(BlockColor::Red));
        }
        sim.find_completed_lines()
    }

    /// Seed the board from an Adventure level pattern. Each character is '.'
    /// (empty), a lowercase color code, or its uppercase form for a target
    /// block. Short or missing rows default-fill as empty.
    pub fn load_from_pattern(&mut self, pattern: &[&str]) {
        for row in 0..GRID_SIZE {
            let line = pattern.get(row).copied().unwrap_or("");
            let mut chars = line.chars();
            for col in 0..GRID_SIZE {
                let ch = chars.next().unwrap_or('.');
                self.cells[row][col] = if ch == '.' {
                    Cell::Empty
                } else {
                    let lower = ch.to_ascii_lowercase();
                    let color = BlockColor::from_code(lower).unwrap_or(BlockColor::Red);
                    Cell::Filled(Block {
                        color,
                        target: ch.is_ascii_uppercase(),
                        icon: None,
                    })
                };
            }
        }
    }

    /// Count of target-flagged cells currently on the board
    pub fn target_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.block().is_some_and(|b| b.target))
            .count()
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Cell::is_empty)
    }

    /// Iterate over all cells with their coordinates
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &cell)| (r, c, cell)))
    }

    #[cfg(test)]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }
}

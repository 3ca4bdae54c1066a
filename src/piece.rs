//! Piece shapes, block colors, and collectible icons

use ratatui::style::Color;

/// Largest shape extent in the catalog (shapes are between 1×1 and 5×5)
pub const MAX_SHAPE_DIM: usize = 5;

/// The 11 block colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Cyan,
    Pink,
    Indigo,
    Teal,
    Lime,
}

impl BlockColor {
    /// Get the terminal color for this block
    pub fn color(&self) -> Color {
        match self {
            BlockColor::Red => Color::Red,
            BlockColor::Blue => Color::Blue,
            BlockColor::Green => Color::Green,
            BlockColor::Yellow => Color::Yellow,
            BlockColor::Purple => Color::Magenta,
            BlockColor::Orange => Color::Rgb(255, 165, 0),
            BlockColor::Cyan => Color::Cyan,
            BlockColor::Pink => Color::Rgb(255, 105, 180),
            BlockColor::Indigo => Color::Rgb(75, 0, 130),
            BlockColor::Teal => Color::Rgb(0, 128, 128),
            BlockColor::Lime => Color::Rgb(50, 205, 50),
        }
    }

    /// All colors, for uniform random sampling
    pub fn all() -> [BlockColor; 11] {
        [
            BlockColor::Red,
            BlockColor::Blue,
            BlockColor::Green,
            BlockColor::Yellow,
            BlockColor::Purple,
            BlockColor::Orange,
            BlockColor::Cyan,
            BlockColor::Pink,
            BlockColor::Indigo,
            BlockColor::Teal,
            BlockColor::Lime,
        ]
    }

    /// Lowercase code character used by level seed patterns
    pub fn code(&self) -> char {
        match self {
            BlockColor::Red => 'r',
            BlockColor::Blue => 'b',
            BlockColor::Green => 'g',
            BlockColor::Yellow => 'y',
            BlockColor::Purple => 'p',
            BlockColor::Orange => 'o',
            BlockColor::Cyan => 'c',
            BlockColor::Pink => 'k',
            BlockColor::Indigo => 'i',
            BlockColor::Teal => 't',
            BlockColor::Lime => 'l',
        }
    }

    /// Parse a lowercase pattern code character
    pub fn from_code(c: char) -> Option<BlockColor> {
        BlockColor::all().into_iter().find(|color| color.code() == c)
    }
}

/// Collectible icon types for Collect mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Star,
    Heart,
    Gem,
    Leaf,
    Bolt,
}

impl Icon {
    pub const COUNT: usize = 5;

    pub fn all() -> [Icon; Icon::COUNT] {
        [Icon::Star, Icon::Heart, Icon::Gem, Icon::Leaf, Icon::Bolt]
    }

    /// Stable index into per-icon count arrays
    pub fn index(&self) -> usize {
        match self {
            Icon::Star => 0,
            Icon::Heart => 1,
            Icon::Gem => 2,
            Icon::Leaf => 3,
            Icon::Bolt => 4,
        }
    }

    /// Display glyph
    pub fn symbol(&self) -> &'static str {
        match self {
            Icon::Star => "★",
            Icon::Heart => "♥",
            Icon::Gem => "◆",
            Icon::Leaf => "♣",
            Icon::Bolt => "↯",
        }
    }
}

/// A piece footprint: which cells of its bounding box are filled.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: usize,
    cols: usize,
    filled: Vec<(usize, usize)>,
}

impl Shape {
    /// Build a shape from pattern rows where 'X' marks a filled cell.
    /// Rows must be equal length and within the 5×5 bound.
    pub fn from_pattern(pattern: &[&str]) -> Self {
        let rows = pattern.len();
        let cols = pattern.first().map_or(0, |r| r.len());
        debug_assert!(rows >= 1 && rows <= MAX_SHAPE_DIM);
        debug_assert!(cols >= 1 && cols <= MAX_SHAPE_DIM);

        let mut filled = Vec::new();
        for (r, row) in pattern.iter().enumerate() {
            debug_assert_eq!(row.len(), cols);
            for (c, ch) in row.chars().enumerate() {
                if ch == 'X' {
                    filled.push((r, c));
                }
            }
        }
        debug_assert!(!filled.is_empty());

        Self { rows, cols, filled }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Filled cell offsets (row, col) within the bounding box
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.filled
    }

    /// Number of filled cells
    pub fn block_count(&self) -> usize {
        self.filled.len()
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.filled.contains(&(row, col))
    }
}

/// A dealt piece occupying a tray slot
#[derive(Debug, Clone)]
pub struct Piece {
    pub shape: Shape,
    pub color: BlockColor,
    /// Collectible icons, parallel to `shape.cells()`. Empty outside Collect mode.
    icons: Vec<Option<Icon>>,
}

impl Piece {
    pub fn new(shape: Shape, color: BlockColor) -> Self {
        Self {
            shape,
            color,
            icons: Vec::new(),
        }
    }

    /// Attach per-cell icons; `icons` must be parallel to `shape.cells()`
    pub fn with_icons(mut self, icons: Vec<Option<Icon>>) -> Self {
        debug_assert_eq!(icons.len(), self.shape.block_count());
        self.icons = icons;
        self
    }

    /// Icon carried by the nth filled cell, if any
    pub fn icon_at(&self, cell_index: usize) -> Option<Icon> {
        self.icons.get(cell_index).copied().flatten()
    }

    /// Whether any cell carries a collectible icon
    pub fn has_icons(&self) -> bool {
        self.icons.iter().any(|i| i.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_from_pattern() {
        let shape = Shape::from_pattern(&["X.", "XX"]);
        assert_eq!(shape.rows(), 2);
        assert_eq!(shape.cols(), 2);
        assert_eq!(shape.block_count(), 3);
        assert!(shape.is_filled(0, 0));
        assert!(!shape.is_filled(0, 1));
        assert!(shape.is_filled(1, 1));
    }

    #[test]
    fn test_color_codes_roundtrip() {
        for color in BlockColor::all() {
            assert_eq!(BlockColor::from_code(color.code()), Some(color));
        }
        assert_eq!(BlockColor::from_code('z'), None);
    }

    #[test]
    fn test_icon_indices_unique() {
        let mut seen = [false; Icon::COUNT];
        for icon in Icon::all() {
            assert!(!seen[icon.index()]);
            seen[icon.index()] = true;
        }
    }

    #[test]
    fn test_piece_icons() {
        let shape = Shape::from_pattern(&["XX"]);
        let piece = Piece::new(shape.clone(), BlockColor::Red);
        assert!(!piece.has_icons());
        assert_eq!(piece.icon_at(0), None);

        let piece = Piece::new(shape, BlockColor::Red).with_icons(vec![None, Some(Icon::Gem)]);
        assert!(piece.has_icons());
        assert_eq!(piece.icon_at(1), Some(Icon::Gem));
    }
}

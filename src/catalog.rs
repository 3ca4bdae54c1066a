//! Weighted piece catalog and random generator
//!
//! Each template appears in the sampling pool once per weight point, so a
//! draw is a uniform pick over the expanded pool - no cumulative-distribution
//! bookkeeping needed.

use crate::piece::{BlockColor, Icon, Piece, Shape};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Chance for each filled cell to carry a collectible icon (Collect mode)
const ICON_CELL_CHANCE: f64 = 0.2;
/// Chance to force one icon onto a piece that rolled none
const ICON_FALLBACK_CHANCE: f64 = 0.4;

/// Shape templates with their pool weights
const TEMPLATES: &[(&[&str], u32)] = &[
    // Horizontal bars
    (&["X"], 3),
    (&["XX"], 4),
    (&["XXX"], 5),
    (&["XXXX"], 3),
    (&["XXXXX"], 1),
    // Vertical bars
    (&["X", "X"], 4),
    (&["X", "X", "X"], 5),
    (&["X", "X", "X", "X"], 3),
    (&["X", "X", "X", "X", "X"], 1),
    // Squares
    (&["XX", "XX"], 4),
    (&["XXX", "XXX", "XXX"], 1),
    // Tall L / J and their flips
    (&["X.", "X.", "XX"], 3),
    (&[".X", ".X", "XX"], 3),
    (&["XX", "X.", "X."], 3),
    (&["XX", ".X", ".X"], 3),
    // Wide L / J and their flips
    (&["X..", "XXX"], 2),
    (&["XXX", "X.."], 2),
    (&["..X", "XXX"], 2),
    (&["XXX", "..X"], 2),
    // Small corners
    (&["XX", ".X"], 3),
    (&["XX", "X."], 3),
    (&["X.", "XX"], 3),
    (&[".X", "XX"], 3),
    // T pieces
    (&["XXX", ".X."], 2),
    (&[".X.", "XXX"], 2),
    (&["X.", "XX", "X."], 2),
    (&[".X", "XX", ".X"], 2),
    // S / Z
    (&["XX.", ".XX"], 2),
    (&[".XX", "XX."], 2),
    (&["X.", "XX", ".X"], 2),
    (&[".X", "XX", "X."], 2),
    // Big rectangles
    (&["XX", "XX", "XX"], 1),
    (&["XXX", "XXX"], 1),
];

/// The weighted piece generator
#[derive(Debug, Clone)]
pub struct Generator {
    shapes: Vec<Shape>,
    /// Template indices, one entry per weight point
    pool: Vec<usize>,
    rng: ChaCha8Rng,
    /// Attach collectible icons to dealt pieces (Collect mode)
    with_icons: bool,
}

impl Generator {
    pub fn new(with_icons: bool) -> Self {
        Self::with_seed(with_icons, rand::random())
    }

    /// Seeded constructor for deterministic games and tests
    pub fn with_seed(with_icons: bool, seed: u64) -> Self {
        let shapes: Vec<Shape> = TEMPLATES
            .iter()
            .map(|(pattern, _)| Shape::from_pattern(pattern))
            .collect();
        let mut pool = Vec::new();
        for (i, (_, weight)) in TEMPLATES.iter().enumerate() {
            for _ in 0..*weight {
                pool.push(i);
            }
        }
        Self {
            shapes,
            pool,
            rng: ChaCha8Rng::seed_from_u64(seed),
            with_icons,
        }
    }

    /// Draw the next piece: weighted shape, uniform color, and per-cell
    /// icons when running in Collect mode
    pub fn next_piece(&mut self) -> Piece {
        let template = *self
            .pool
            .choose(&mut self.rng)
            .expect("catalog pool is never empty");
        let shape = self.shapes[template].clone();
        let color = *BlockColor::all()
            .choose(&mut self.rng)
            .expect("color set is never empty");
        let piece = Piece::new(shape, color);
        if self.with_icons {
            self.attach_icons(piece)
        } else {
            piece
        }
    }

    /// Each filled cell independently rolls for an icon; if none hit, one
    /// fallback cell is forced with a second roll so icon pieces keep
    /// appearing often enough for the collection goals
    fn attach_icons(&mut self, piece: Piece) -> Piece {
        let count = piece.shape.block_count();
        let mut icons: Vec<Option<Icon>> = (0..count)
            .map(|_| {
                if self.rng.gen_bool(ICON_CELL_CHANCE) {
                    Some(self.random_icon())
                } else {
                    None
                }
            })
            .collect();

        if icons.iter().all(Option::is_none) && self.rng.gen_bool(ICON_FALLBACK_CHANCE) {
            let slot = self.rng.gen_range(0..count);
            icons[slot] = Some(self.random_icon());
        }

        piece.with_icons(icons)
    }

    fn random_icon(&mut self) -> Icon {
        *Icon::all()
            .choose(&mut self.rng)
            .expect("icon set is never empty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pool_matches_weights() {
        let generator = Generator::with_seed(false, 0);
        let total: u32 = TEMPLATES.iter().map(|(_, w)| w).sum();
        assert_eq!(generator.pool.len(), total as usize);
        assert_eq!(generator.shapes.len(), TEMPLATES.len());
    }

    #[test]
    fn test_shapes_within_bounds() {
        let generator = Generator::with_seed(false, 0);
        for shape in &generator.shapes {
            assert!(shape.rows() >= 1 && shape.rows() <= 5);
            assert!(shape.cols() >= 1 && shape.cols() <= 5);
            assert!(shape.block_count() >= 1);
        }
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let mut a = Generator::with_seed(false, 42);
        let mut b = Generator::with_seed(false, 42);
        for _ in 0..50 {
            let (pa, pb) = (a.next_piece(), b.next_piece());
            assert_eq!(pa.shape, pb.shape);
            assert_eq!(pa.color, pb.color);
        }
    }

    #[test]
    fn test_no_icons_outside_collect() {
        let mut generator = Generator::with_seed(false, 7);
        for _ in 0..100 {
            assert!(!generator.next_piece().has_icons());
        }
    }

    #[test]
    fn test_collect_mode_produces_icons() {
        let mut generator = Generator::with_seed(true, 7);
        let mut with_icons = 0;
        let mut seen: HashSet<Icon> = HashSet::new();
        for _ in 0..500 {
            let piece = generator.next_piece();
            if piece.has_icons() {
                with_icons += 1;
                for i in 0..piece.shape.block_count() {
                    if let Some(icon) = piece.icon_at(i) {
                        seen.insert(icon);
                    }
                }
            }
        }
        // With a 20% per-cell chance plus the 40% fallback, icon pieces
        // should be common; all 5 icon types should show up over 500 deals
        assert!(with_icons > 100);
        assert_eq!(seen.len(), Icon::COUNT);
    }

    #[test]
    fn test_many_draws_cover_catalog() {
        let mut generator = Generator::with_seed(false, 3);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.insert(generator.next_piece().shape.cells().to_vec());
        }
        // Every template should appear eventually, including weight-1 ones
        assert_eq!(seen.len(), TEMPLATES.len());
    }
}

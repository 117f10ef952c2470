//! Board generation with rejection sampling
//!
//! Positions are filled left to right, top to bottom. Each draw is rejected if it would
//! complete a run with the two cells to its left or the two cells above it, which are the
//! only neighbours already placed. The returned board therefore holds no match.

use crate::board::Board;
use crate::palette::Palette;
use crate::rng::SimpleRng;
use crate::types::{Color, GENERATION_RETRY_LIMIT};

/// Would placing `color` at flat index `idx` complete a run of three?
fn completes_run(placed: &[Color], size: usize, idx: usize, color: Color) -> bool {
    let (row, col) = (idx / size, idx % size);

    let horizontal = col >= 2 && placed[idx - 1] == color && placed[idx - 2] == color;
    let vertical =
        row >= 2 && placed[idx - size] == color && placed[idx - 2 * size] == color;

    horizontal || vertical
}

/// Generate a fully populated `size`x`size` board with no pre-existing match.
///
/// Draws are retried up to [`GENERATION_RETRY_LIMIT`] times per cell; after that the first
/// palette color that does not complete a run is used. A [`Palette`] holds at least three
/// colors and at most two are ever forbidden at one position, so such a color always exists.
pub fn generate(size: u8, palette: &Palette, rng: &mut SimpleRng) -> Board {
    let n = size as usize;
    let mut placed: Vec<Color> = Vec::with_capacity(n * n);

    for idx in 0..n * n {
        let mut color = palette.draw(rng);
        let mut attempts = 1;
        while completes_run(&placed, n, idx, color) {
            if attempts >= GENERATION_RETRY_LIMIT {
                color = palette
                    .iter()
                    .find(|&c| !completes_run(&placed, n, idx, c))
                    .unwrap_or(color);
                break;
            }
            color = palette.draw(rng);
            attempts += 1;
        }
        placed.push(color);
    }

    Board::from_flat(size, &placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use crate::types::Color::*;

    #[test]
    fn test_generated_board_is_full_and_at_rest() {
        let palette = Palette::full();
        let mut rng = SimpleRng::new(12345);
        let board = generate(8, &palette, &mut rng);

        assert_eq!(board.size(), 8);
        assert_eq!(board.cells().count(), 64);
        assert!(find_matches(&board).is_empty());
        assert!(board.cells().all(|c| palette.contains(c.color)));
    }

    #[test]
    fn test_minimum_palette_never_matches() {
        let palette = Palette::new(&[Red, Green, Blue]).unwrap();
        for seed in 1..200 {
            let mut rng = SimpleRng::new(seed);
            let board = generate(10, &palette, &mut rng);
            assert!(find_matches(&board).is_empty(), "seed {}", seed);
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let palette = Palette::full();
        let a = generate(8, &palette, &mut SimpleRng::new(42));
        let b = generate(8, &palette, &mut SimpleRng::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_completes_run_checks_left_and_above() {
        // 3x3, placing index 2 (row 0, col 2) after [Red, Red]
        let placed = [Red, Red];
        assert!(completes_run(&placed, 3, 2, Red));
        assert!(!completes_run(&placed, 3, 2, Blue));

        // placing index 6 (row 2, col 0) under Red / Red
        let placed = [Red, Blue, Green, Red, Green, Blue];
        assert!(completes_run(&placed, 3, 6, Red));
        assert!(!completes_run(&placed, 3, 6, Green));
    }
}

//! Grid geometry and food placement.

use rand::Rng;
use std::collections::HashSet;

use super::config::{GameConfig, Platform};
use super::state::Position;
use crate::error::BoardFullError;

const DESKTOP_CANVAS_WIDTH: f64 = 600.0;
const DESKTOP_CANVAS_HEIGHT: f64 = 400.0;
const DESKTOP_CELL_PX: f64 = 20.0;

const MOBILE_MAX_WIDTH: f64 = 400.0;
const MOBILE_MAX_HEIGHT: f64 = 300.0;
const MOBILE_SIDE_MARGIN: f64 = 40.0;
const MOBILE_HEIGHT_SHARE: f64 = 0.6;
/// Cells along the shorter side of the mobile canvas
const MOBILE_CELLS_ACROSS: f64 = 20.0;

/// Size of the area the game may draw into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportHints {
    pub width_px: f64,
    pub height_px: f64,
    pub platform: Platform,
}

/// Grid size in cells, plus the pixel size of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDimensions {
    pub width: usize,
    pub height: usize,
    pub cell_size_px: f64,
}

impl GridDimensions {
    pub fn new(width: usize, height: usize, cell_size_px: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            cell_size_px,
        }
    }
}

/// The playing field: dimensions and food placement rules
#[derive(Debug, Clone)]
pub struct Board {
    dimensions: GridDimensions,
    bonus_chance: f64,
    max_attempts: usize,
}

impl Board {
    pub fn new(dimensions: GridDimensions, bonus_chance: f64, max_attempts: usize) -> Self {
        Self {
            dimensions,
            bonus_chance,
            max_attempts,
        }
    }

    pub fn from_config(config: &GameConfig, dimensions: GridDimensions) -> Self {
        Self::new(
            dimensions,
            config.bonus_chance,
            config.max_placement_attempts,
        )
    }

    /// Compute the grid for a viewport.
    ///
    /// Desktop uses a 600x400 canvas (shrunk to fit) with 20px cells. Mobile
    /// caps the canvas at 400x300 and sizes cells so the shorter side holds
    /// 20 of them.
    pub fn dimensions(hints: &ViewportHints) -> GridDimensions {
        let (canvas_w, canvas_h, cell) = match hints.platform {
            Platform::Desktop => {
                let w = hints.width_px.min(DESKTOP_CANVAS_WIDTH).max(DESKTOP_CELL_PX);
                let h = hints.height_px.min(DESKTOP_CANVAS_HEIGHT).max(DESKTOP_CELL_PX);
                (w, h, DESKTOP_CELL_PX)
            }
            Platform::Mobile => {
                let w = (hints.width_px - MOBILE_SIDE_MARGIN)
                    .min(MOBILE_MAX_WIDTH)
                    .max(1.0);
                let h = (hints.height_px * MOBILE_HEIGHT_SHARE)
                    .min(MOBILE_MAX_HEIGHT)
                    .max(1.0);
                (w, h, w.min(h) / MOBILE_CELLS_ACROSS)
            }
        };

        // Nudge before flooring so 300 / (300 / 20) lands on 20, not 19
        let cells = |extent: f64| ((extent / cell) + 1e-9).floor() as usize;
        GridDimensions::new(cells(canvas_w), cells(canvas_h), cell)
    }

    pub fn width(&self) -> usize {
        self.dimensions.width
    }

    pub fn height(&self) -> usize {
        self.dimensions.height
    }

    pub fn grid(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.width(), self.height())
    }

    /// Pick a random free cell.
    ///
    /// Rejection sampling is capped; after that a row-major scan takes the
    /// first free cell, so this only fails when every cell is occupied.
    pub fn place_food<R: Rng>(
        &self,
        occupied: &HashSet<Position>,
        rng: &mut R,
    ) -> Result<Position, BoardFullError> {
        for _ in 0..self.max_attempts {
            let pos = self.random_cell(rng);
            if !occupied.contains(&pos) {
                return Ok(pos);
            }
        }

        self.first_free_cell(occupied).ok_or(BoardFullError {
            width: self.width(),
            height: self.height(),
        })
    }

    /// Roll for bonus food; on success place it away from `occupied` and `food`
    pub fn maybe_place_bonus<R: Rng>(
        &self,
        occupied: &HashSet<Position>,
        food: Position,
        rng: &mut R,
    ) -> Option<Position> {
        if !rng.gen_bool(self.bonus_chance) {
            return None;
        }

        let mut blocked = occupied.clone();
        blocked.insert(food);
        self.place_food(&blocked, rng).ok()
    }

    fn random_cell<R: Rng>(&self, rng: &mut R) -> Position {
        let x = rng.gen_range(0..self.width()) as i32;
        let y = rng.gen_range(0..self.height()) as i32;
        Position::new(x, y)
    }

    fn first_free_cell(&self, occupied: &HashSet<Position>) -> Option<Position> {
        (0..self.height())
            .flat_map(|y| (0..self.width()).map(move |x| Position::new(x as i32, y as i32)))
            .find(|pos| !occupied.contains(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board(width: usize, height: usize) -> Board {
        Board::new(GridDimensions::new(width, height, 20.0), 0.2, 1000)
    }

    #[test]
    fn test_desktop_dimensions() {
        let dims = Board::dimensions(&ViewportHints {
            width_px: 1920.0,
            height_px: 1080.0,
            platform: Platform::Desktop,
        });
        assert_eq!((dims.width, dims.height), (30, 20));
        assert_eq!(dims.cell_size_px, 20.0);
    }

    #[test]
    fn test_desktop_shrinks_to_small_viewport() {
        let dims = Board::dimensions(&ViewportHints {
            width_px: 300.0,
            height_px: 250.0,
            platform: Platform::Desktop,
        });
        assert_eq!((dims.width, dims.height), (15, 12));
    }

    #[test]
    fn test_mobile_dimensions() {
        // 390 - 40 = 350 wide, min(844 * 0.6, 300) = 300 high, cell 15px
        let dims = Board::dimensions(&ViewportHints {
            width_px: 390.0,
            height_px: 844.0,
            platform: Platform::Mobile,
        });
        assert_eq!(dims.cell_size_px, 15.0);
        assert_eq!((dims.width, dims.height), (23, 20));
    }

    #[test]
    fn test_mobile_capped_area() {
        let dims = Board::dimensions(&ViewportHints {
            width_px: 2000.0,
            height_px: 2000.0,
            platform: Platform::Mobile,
        });
        // Canvas capped at 400x300, cell 15px
        assert_eq!((dims.width, dims.height), (26, 20));
    }

    #[test]
    fn test_degenerate_viewport_still_has_cells() {
        for platform in [Platform::Desktop, Platform::Mobile] {
            let dims = Board::dimensions(&ViewportHints {
                width_px: 0.0,
                height_px: -5.0,
                platform,
            });
            assert!(dims.width >= 1);
            assert!(dims.height >= 1);
        }
    }

    #[test]
    fn test_place_food_avoids_occupied() {
        let board = board(4, 4);
        let mut rng = StdRng::seed_from_u64(3);
        let occupied: HashSet<Position> = (0..4)
            .flat_map(|y| (0..3).map(move |x| Position::new(x, y)))
            .collect();

        for _ in 0..50 {
            let food = board.place_food(&occupied, &mut rng).unwrap();
            assert!(!occupied.contains(&food));
            assert!(board.contains(food));
        }
    }

    #[test]
    fn test_place_food_falls_back_to_scan() {
        // Zero random attempts forces the deterministic scan
        let board = Board::new(GridDimensions::new(3, 2, 20.0), 0.2, 0);
        let mut rng = StdRng::seed_from_u64(1);
        let occupied: HashSet<Position> =
            [Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
                .into_iter()
                .collect();

        assert_eq!(
            board.place_food(&occupied, &mut rng),
            Ok(Position::new(0, 1))
        );
    }

    #[test]
    fn test_full_board_reports_error() {
        let board = board(2, 2);
        let mut rng = StdRng::seed_from_u64(9);
        let occupied: HashSet<Position> = (0..2)
            .flat_map(|y| (0..2).map(move |x| Position::new(x, y)))
            .collect();

        assert_eq!(
            board.place_food(&occupied, &mut rng),
            Err(BoardFullError {
                width: 2,
                height: 2
            })
        );
    }

    #[test]
    fn test_bonus_never_on_food_or_snake() {
        let board = Board::new(GridDimensions::new(3, 3, 20.0), 1.0, 1000);
        let mut rng = StdRng::seed_from_u64(11);
        let occupied: HashSet<Position> =
            [Position::new(0, 0), Position::new(1, 0)].into_iter().collect();
        let food = Position::new(2, 0);

        for _ in 0..50 {
            let bonus = board.maybe_place_bonus(&occupied, food, &mut rng).unwrap();
            assert_ne!(bonus, food);
            assert!(!occupied.contains(&bonus));
        }
    }

    #[test]
    fn test_bonus_chance_zero_never_spawns() {
        let board = Board::new(GridDimensions::new(10, 10, 20.0), 0.0, 1000);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(board
                .maybe_place_bonus(&HashSet::new(), Position::new(0, 0), &mut rng)
                .is_none());
        }
    }

    #[test]
    fn test_bonus_skipped_when_no_room() {
        let board = Board::new(GridDimensions::new(2, 1, 20.0), 1.0, 1000);
        let mut rng = StdRng::seed_from_u64(5);
        let occupied: HashSet<Position> = [Position::new(0, 0)].into_iter().collect();
        assert!(board
            .maybe_place_bonus(&occupied, Position::new(1, 0), &mut rng)
            .is_none());
    }
}

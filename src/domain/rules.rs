/// Board geometry: the interior rectangle and the wall ring around it.
///
/// For a board of `width × height` the playable interior is
/// `x ∈ [1, width]`, `y ∈ [0, height-1]`. Walls sit one cell outside
/// that rectangle and are never traversable.

use rand::Rng;

use super::entity::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
}

impl Arena {
    pub fn new(width: i32, height: i32) -> Self {
        Arena { width, height }
    }

    /// Is `pos` a playable (non-wall) cell?
    pub fn in_interior(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.x <= self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Spawn cell for a fresh snake. Interior for any board with both sides
    /// at least 2.
    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Uniformly random interior cell.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(rng.gen_range(1..=self.width), rng.gen_range(0..self.height))
    }

    /// Rendered grid size including the wall ring: `(cols, rows)`.
    pub fn grid_size(&self) -> (usize, usize) {
        ((self.width + 2) as usize, (self.height + 2) as usize)
    }

    /// Is grid cell `(col, row)` part of the wall ring?
    pub fn is_wall_cell(&self, col: usize, row: usize) -> bool {
        let (cols, rows) = self.grid_size();
        col == 0 || row == 0 || col == cols - 1 || row == rows - 1
    }

    /// World position shown at grid cell `(col, row)`.
    pub fn grid_to_world(&self, col: usize, row: usize) -> Position {
        Position::new(col as i32, row as i32 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn interior_bounds_are_inclusive_of_edges() {
        let a = Arena::new(30, 20);
        assert!(a.in_interior(Position::new(1, 0)));
        assert!(a.in_interior(Position::new(30, 19)));
        assert!(!a.in_interior(Position::new(0, 5)));   // left wall
        assert!(!a.in_interior(Position::new(31, 5)));  // right wall
        assert!(!a.in_interior(Position::new(5, -1)));  // top wall
        assert!(!a.in_interior(Position::new(5, 20)));  // bottom wall
    }

    #[test]
    fn center_of_default_board() {
        assert_eq!(Arena::new(30, 20).center(), Position::new(15, 10));
    }

    #[test]
    fn center_of_smallest_board_is_interior() {
        let a = Arena::new(2, 2);
        assert_eq!(a.center(), Position::new(1, 1));
        assert!(a.in_interior(a.center()));
    }

    #[test]
    fn random_cells_stay_inside() {
        let a = Arena::new(4, 3);
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            let p = a.random_cell(&mut rng);
            assert!(a.in_interior(p), "{p:?} escaped the interior");
            seen.insert(p);
        }
        // Every one of the 12 interior cells is reachable
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn wall_ring_matches_grid_edges() {
        let a = Arena::new(3, 2);
        assert_eq!(a.grid_size(), (5, 4));
        assert!(a.is_wall_cell(0, 2));
        assert!(a.is_wall_cell(4, 2));
        assert!(a.is_wall_cell(2, 0));
        assert!(a.is_wall_cell(2, 3));
        assert!(!a.is_wall_cell(1, 1));
        assert!(!a.is_wall_cell(3, 2));
    }

    #[test]
    fn grid_rows_are_offset_by_the_top_wall() {
        let a = Arena::new(3, 2);
        assert_eq!(a.grid_to_world(1, 1), Position::new(1, 0));
        assert!(a.in_interior(a.grid_to_world(3, 2)));
        assert!(!a.in_interior(a.grid_to_world(2, 0)));
    }
}

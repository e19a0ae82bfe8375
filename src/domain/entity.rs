/// Entities: the snake body and the vocabulary it moves with.
///
/// The body is a bounded sequence: storage for `capacity` segments is
/// reserved up front and every growth goes through `Snake::grow()`, so the
/// tick loop never allocates.

/// A grid cell. `x` grows to the right, `y` grows downward.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The neighbouring cell one step in `dir`.
    pub fn stepped(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Position { x: self.x + dx, y: self.y + dy }
    }
}

/// Travel direction. "No direction yet" is `Option::<Direction>::None`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Polling order for simultaneous presses: the later entry wins.
    pub const PRIORITY: [Direction; 4] =
        [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Reduce a set of "is this direction pressed?" answers to one direction,
/// checking in `Direction::PRIORITY` order so the last pressed entry wins.
pub fn resolve_pressed(mut pressed: impl FnMut(Direction) -> bool) -> Option<Direction> {
    let mut chosen = None;
    for dir in Direction::PRIORITY {
        if pressed(dir) {
            chosen = Some(dir);
        }
    }
    chosen
}

/// Head at index 0, tail at the last index. Never empty.
#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Position>,
    capacity: usize,
}

impl Snake {
    /// A length-1 snake at `head`. `capacity` is clamped to at least 1.
    pub fn new(head: Position, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut body = Vec::with_capacity(capacity);
        body.push(head);
        Snake { body, capacity }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.body.len() >= self.capacity
    }

    #[cfg(test)]
    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Shift every segment onto its predecessor's cell, then move the head
    /// one step in `dir` (or leave it in place when `dir` is `None`).
    pub fn slither(&mut self, dir: Option<Direction>) {
        let len = self.body.len();
        // copy_within walks tail-first, so no segment is read after it was overwritten
        self.body.copy_within(0..len - 1, 1);
        if let Some(d) = dir {
            self.body[0] = self.body[0].stepped(d);
        }
    }

    /// Append a segment at `at`. Returns false (and changes nothing) when the
    /// snake is already at capacity.
    pub fn grow(&mut self, at: Position) -> bool {
        if self.is_full() {
            return false;
        }
        self.body.push(at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_from(cells: &[(i32, i32)], capacity: usize) -> Snake {
        let mut s = Snake::new(Position::new(cells[0].0, cells[0].1), capacity);
        for &(x, y) in &cells[1..] {
            assert!(s.grow(Position::new(x, y)));
        }
        s
    }

    #[test]
    fn new_snake_has_one_segment() {
        let s = Snake::new(Position::new(15, 10), 100);
        assert_eq!(s.len(), 1);
        assert_eq!(s.head(), s.tail());
        assert_eq!(s.capacity(), 100);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut s = Snake::new(Position::new(0, 0), 0);
        assert_eq!(s.capacity(), 1);
        assert!(s.is_full());
        assert!(!s.grow(Position::new(1, 0)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn slither_follows_the_head() {
        // Horizontal snake heading right: head at (5,3)
        let mut s = snake_from(&[(5, 3), (4, 3), (3, 3)], 10);
        s.slither(Some(Direction::Down));
        assert_eq!(s.body(), &[
            Position::new(5, 4),
            Position::new(5, 3),
            Position::new(4, 3),
        ]);
    }

    #[test]
    fn slither_without_direction_is_stationary() {
        let mut s = Snake::new(Position::new(7, 7), 10);
        for _ in 0..5 { s.slither(None); }
        assert_eq!(s.head(), Position::new(7, 7));
    }

    #[test]
    fn reversal_is_allowed() {
        let mut s = snake_from(&[(5, 3), (4, 3)], 10);
        s.slither(Some(Direction::Left));
        // Head steps back onto its old neck cell; nothing rejects it.
        assert_eq!(s.head(), Position::new(4, 3));
        assert_eq!(s.tail(), Position::new(5, 3));
    }

    #[test]
    fn grow_stops_at_capacity() {
        let mut s = Snake::new(Position::new(1, 1), 3);
        assert!(s.grow(Position::new(1, 2)));
        assert!(s.grow(Position::new(1, 3)));
        assert!(!s.grow(Position::new(1, 4)));
        assert_eq!(s.len(), 3);
        assert!(!s.occupies(Position::new(1, 4)));
    }

    #[test]
    fn later_direction_in_priority_wins() {
        assert_eq!(resolve_pressed(|_| false), None);
        assert_eq!(resolve_pressed(|d| d == Direction::Up), Some(Direction::Up));
        assert_eq!(
            resolve_pressed(|d| matches!(d, Direction::Left | Direction::Right)),
            Some(Direction::Right),
        );
        assert_eq!(resolve_pressed(|_| true), Some(Direction::Down));
    }
}

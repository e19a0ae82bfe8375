/// The step function: advances the game by one tick.
///
/// Processing order:
///   1. Steering (latest observed direction replaces the stored one)
///   2. Body shift + head move
///   3. Wall check
///   4. Food check (grow at the old tail, score, respawn food)
///
/// There is no self-collision: only the wall ends a game. Respawned food
/// may land under the body.

use rand::Rng;

use crate::domain::entity::Direction;
use super::event::GameEvent;
use super::world::GameState;

pub fn advance<R: Rng + ?Sized>(
    world: &mut GameState,
    input: Option<Direction>,
    rng: &mut R,
) -> Vec<GameEvent> {
    if world.game_over || world.paused { return vec![]; }

    let mut events = Vec::new();
    world.tick += 1;

    if input.is_some() {
        world.direction = input;
    }

    let old_tail = world.snake.tail();
    world.snake.slither(world.direction);
    let head = world.snake.head();

    if !world.arena.in_interior(head) {
        world.game_over = true;
        events.push(GameEvent::WallHit { at: head });
    }

    if head == world.food {
        let grew = world.snake.grow(old_tail);
        world.score += world.food_reward;
        events.push(GameEvent::FoodEaten { at: head, grew });

        world.food = world.arena.random_cell(rng);
        events.push(GameEvent::FoodSpawned { at: world.food });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::GameConfig;
    use crate::domain::entity::{Position, Snake};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// Default 30×20 board with food parked in a corner away from row 10.
    fn world() -> GameState {
        let mut w = GameState::new(&GameConfig::default(), &mut rng());
        w.food = Position::new(1, 0);
        w
    }

    fn snake_from(cells: &[(i32, i32)], capacity: usize) -> Snake {
        let mut s = Snake::new(Position::new(cells[0].0, cells[0].1), capacity);
        for &(x, y) in &cells[1..] {
            s.grow(Position::new(x, y));
        }
        s
    }

    #[test]
    fn unset_direction_keeps_head_still() {
        let mut w = world();
        let mut r = rng();
        for _ in 0..10 {
            assert!(advance(&mut w, None, &mut r).is_empty());
        }
        assert_eq!(w.snake.head(), Position::new(15, 10));
        assert_eq!(w.tick, 10);
        assert!(!w.game_over);
    }

    #[test]
    fn direction_persists_across_ticks() {
        let mut w = world();
        let mut r = rng();
        advance(&mut w, Some(Direction::Up), &mut r);
        for _ in 0..4 {
            advance(&mut w, None, &mut r);
        }
        assert_eq!(w.direction, Some(Direction::Up));
        assert_eq!(w.snake.head(), Position::new(15, 5));
    }

    #[test]
    fn right_wall_ends_game_on_sixteenth_tick() {
        let mut w = world();
        let mut r = rng();
        for tick in 1..=15 {
            advance(&mut w, Some(Direction::Right), &mut r);
            assert!(!w.game_over, "game over too early at tick {tick}");
            assert_eq!(w.snake.head(), Position::new(15 + tick, 10));
        }
        let events = advance(&mut w, Some(Direction::Right), &mut r);
        assert_eq!(w.snake.head(), Position::new(31, 10));
        assert!(w.game_over);
        assert_eq!(events, vec![GameEvent::WallHit { at: Position::new(31, 10) }]);
    }

    #[test]
    fn every_wall_is_fatal() {
        let cases = [
            (Direction::Left, 15),  // x: 15 → 0
            (Direction::Up, 11),    // y: 10 → -1
            (Direction::Down, 10),  // y: 10 → 20
        ];
        for (dir, ticks) in cases {
            let mut w = world();
            w.food = Position::new(30, 19);
            let mut r = rng();
            for _ in 0..ticks - 1 {
                advance(&mut w, Some(dir), &mut r);
            }
            assert!(!w.game_over, "{dir:?} ended one tick early");
            advance(&mut w, Some(dir), &mut r);
            assert!(w.game_over, "{dir:?} never hit the wall");
        }
    }

    #[test]
    fn game_over_freezes_state() {
        let mut w = world();
        w.snake = Snake::new(Position::new(30, 5), 100);
        let mut r = rng();
        advance(&mut w, Some(Direction::Right), &mut r);
        assert!(w.game_over);

        let tick = w.tick;
        let events = advance(&mut w, Some(Direction::Left), &mut r);
        assert!(events.is_empty());
        assert_eq!(w.snake.head(), Position::new(31, 5));
        assert_eq!(w.tick, tick);
    }

    #[test]
    fn eating_grows_at_old_tail_and_scores() {
        let mut w = world();
        w.snake = snake_from(&[(10, 5), (9, 5), (8, 5)], 100);
        w.food = Position::new(11, 5);
        let mut r = rng();

        let events = advance(&mut w, Some(Direction::Right), &mut r);

        assert_eq!(w.snake.len(), 4);
        assert_eq!(w.score, 10);
        assert_eq!(w.snake.body(), &[
            Position::new(11, 5),
            Position::new(10, 5),
            Position::new(9, 5),
            Position::new(8, 5),
        ]);
        assert!(w.arena.in_interior(w.food));
        assert_eq!(events[0], GameEvent::FoodEaten { at: Position::new(11, 5), grew: true });
        assert_eq!(events[1], GameEvent::FoodSpawned { at: w.food });
    }

    #[test]
    fn eating_at_capacity_still_scores() {
        let mut w = world();
        w.snake = snake_from(&[(10, 5), (9, 5), (8, 5)], 3);
        w.food = Position::new(10, 6);
        let mut r = rng();

        let events = advance(&mut w, Some(Direction::Down), &mut r);

        assert_eq!(w.snake.len(), 3);
        assert_eq!(w.score, 10);
        assert!(matches!(events[0], GameEvent::FoodEaten { grew: false, .. }));
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut w = world();
        w.snake = Snake::new(Position::new(2, 10), 4);
        let mut r = rng();
        for i in 0..20 {
            // Drop food directly in front of the head every tick
            w.food = w.snake.head().stepped(Direction::Right);
            if w.food.x > w.arena.width { break; }
            advance(&mut w, Some(Direction::Right), &mut r);
            assert!(w.snake.len() <= 4, "overflow after {} meals", i + 1);
        }
        assert_eq!(w.snake.len(), 4);
    }

    #[test]
    fn reward_is_configurable() {
        let mut w = world();
        w.food_reward = 25;
        w.food = Position::new(15, 11);
        advance(&mut w, Some(Direction::Down), &mut rng());
        assert_eq!(w.score, 25);
    }

    #[test]
    fn no_self_collision() {
        let mut w = world();
        // U-shape: head at (10,5) with the body curling below it
        w.snake = snake_from(&[(10, 5), (10, 6), (11, 6), (11, 5), (11, 4)], 100);
        w.food = Position::new(30, 19);
        let mut r = rng();
        advance(&mut w, Some(Direction::Down), &mut r); // onto its own neck
        assert_eq!(w.snake.head(), Position::new(10, 6));
        assert!(!w.game_over);
    }

    #[test]
    fn paused_game_does_not_tick() {
        let mut w = world();
        w.paused = true;
        advance(&mut w, Some(Direction::Right), &mut rng());
        assert_eq!(w.snake.head(), Position::new(15, 10));
        assert_eq!(w.tick, 0);
        assert_eq!(w.direction, None);
    }
}

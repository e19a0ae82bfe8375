/// GameState: the complete snapshot of a running game.
///
/// Created once at startup, mutated by `step::advance` every tick, and
/// frozen once `game_over` is set (the final score stays readable).

use rand::Rng;

use crate::config::GameConfig;
use crate::domain::entity::{Direction, Position, Snake};
use crate::domain::rules::Arena;

pub struct GameState {
    pub arena: Arena,
    pub snake: Snake,
    /// `None` until the first directional key; the snake waits in place.
    pub direction: Option<Direction>,
    pub food: Position,
    pub score: u32,
    pub food_reward: u32,
    pub game_over: bool,
    pub paused: bool,
    pub tick: u64,
}

impl GameState {
    /// Length-1 snake in the middle of the board, food somewhere random.
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let arena = Arena::new(config.board.width, config.board.height);
        GameState {
            snake: Snake::new(arena.center(), config.board.max_length),
            direction: None,
            food: arena.random_cell(rng),
            score: 0,
            food_reward: config.scoring.food_reward,
            game_over: false,
            paused: false,
            tick: 0,
            arena,
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.game_over {
            self.paused = !self.paused;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fresh_game_is_centered_and_idle() {
        let mut rng = StdRng::seed_from_u64(1);
        let w = GameState::new(&GameConfig::default(), &mut rng);
        assert_eq!(w.snake.len(), 1);
        assert_eq!(w.snake.head(), Position::new(15, 10));
        assert_eq!(w.snake.capacity(), 100);
        assert_eq!(w.direction, None);
        assert_eq!(w.score, 0);
        assert!(!w.game_over);
        assert!(w.arena.in_interior(w.food));
    }

    #[test]
    fn pause_is_locked_after_game_over() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut w = GameState::new(&GameConfig::default(), &mut rng);
        w.toggle_pause();
        assert!(w.paused);
        w.toggle_pause();
        w.game_over = true;
        w.toggle_pause();
        assert!(!w.paused);
    }
}

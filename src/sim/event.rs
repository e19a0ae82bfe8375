/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

use crate::domain::entity::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Head landed on food. `grew` is false when the snake was already full.
    FoodEaten { at: Position, grew: bool },
    FoodSpawned { at: Position },
    WallHit { at: Position },
}

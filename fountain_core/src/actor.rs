use serde::{Deserialize, Serialize};

use crate::Position;

/// The player exploring the cavern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub position: Position,
    alive: bool,
}

impl Actor {
    /// Creates a living actor standing at `start`.
    pub fn new(start: Position) -> Self {
        Actor {
            position: start,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks the actor as dead. There is no way back.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

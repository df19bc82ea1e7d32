use std::io;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Direction, console::OutputSink, game::World, map::RoomKind};

pub const WALL_MESSAGE: &str = "There is a wall there...";

/// One discrete player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    ActivateFountain,
}

/// Every token the game understands, and the command it stands for.
pub const VOCABULARY: &[(&str, Command)] = &[
    ("move north", Command::Move(Direction::North)),
    ("north", Command::Move(Direction::North)),
    ("n", Command::Move(Direction::North)),
    ("move south", Command::Move(Direction::South)),
    ("south", Command::Move(Direction::South)),
    ("s", Command::Move(Direction::South)),
    ("move east", Command::Move(Direction::East)),
    ("east", Command::Move(Direction::East)),
    ("e", Command::Move(Direction::East)),
    ("move west", Command::Move(Direction::West)),
    ("west", Command::Move(Direction::West)),
    ("w", Command::Move(Direction::West)),
    ("activate fountain", Command::ActivateFountain),
    ("activate", Command::ActivateFountain),
    ("a", Command::ActivateFountain),
];

impl Command {
    /// Resolves a line of player input to a command.
    ///
    /// Matching ignores case and surrounding whitespace. Returns `None` for
    /// anything outside [`VOCABULARY`].
    pub fn parse(input: &str) -> Option<Command> {
        let token = input.trim().to_lowercase();
        VOCABULARY
            .iter()
            .find(|(word, _)| *word == token)
            .map(|(_, command)| *command)
    }

    /// Applies the command to the world.
    ///
    /// A blocked move is an ordinary outcome: the player stays put and is
    /// told about the wall. Consequences of the room entered (pits) are left
    /// to the engine.
    pub fn execute<O: OutputSink + ?Sized>(self, world: &mut World, output: &mut O) -> io::Result<()> {
        match self {
            Command::Move(direction) => {
                let target = world.player.position.offset(direction);
                if world.map.is_in_bounds(target) {
                    debug!("Player moves {:?} to {:?}", direction, target);
                    world.player.position = target;
                } else {
                    debug!("Player bumps into a wall moving {:?}", direction);
                    output.say(WALL_MESSAGE)?;
                }
            }
            Command::ActivateFountain => {
                if world.current_room() == RoomKind::Fountain {
                    if !world.fountain_on {
                        debug!("Fountain activated at {:?}", world.player.position);
                    }
                    world.fountain_on = true;
                } else {
                    debug!("Nothing to activate at {:?}", world.player.position);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, actor::Actor, map::Grid};
    use proptest::prelude::*;

    fn world(rows: usize, columns: usize, start: Position) -> World {
        let mut map = Grid::try_new(rows, columns).unwrap();
        map.set_room_kind(Position::new(0, 0), RoomKind::Entrance).unwrap();
        map.set_room_kind(Position::new(3, 2), RoomKind::Fountain).unwrap();
        World {
            map,
            player: Actor::new(start),
            fountain_on: false,
        }
    }

    #[test]
    fn parses_full_and_short_forms() {
        assert_eq!(
            Command::parse("move north"),
            Some(Command::Move(Direction::North))
        );
        assert_eq!(Command::parse("E"), Some(Command::Move(Direction::East)));
        assert_eq!(
            Command::parse("  Move West \n"),
            Some(Command::Move(Direction::West))
        );
        assert_eq!(
            Command::parse("activate fountain"),
            Some(Command::ActivateFountain)
        );
        assert_eq!(Command::parse("a"), Some(Command::ActivateFountain));
    }

    #[test]
    fn rejects_unknown_input() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("move up"), None);
        assert_eq!(Command::parse("northeast"), None);
        assert_eq!(Command::parse("activatefountain"), None);
    }

    #[test]
    fn vocabulary_covers_every_command() {
        let mut commands: Vec<Command> = VOCABULARY.iter().map(|(_, c)| *c).collect();
        commands.dedup();
        assert_eq!(commands.len(), 5);
        for direction in Direction::ALL {
            assert!(commands.contains(&Command::Move(direction)));
        }
        assert!(commands.contains(&Command::ActivateFountain));
        for (word, command) in VOCABULARY {
            assert_eq!(Command::parse(word), Some(*command));
        }
    }

    #[test]
    fn move_west_from_origin_hits_the_wall() {
        let mut world = world(4, 4, Position::new(0, 0));
        let mut out: Vec<String> = Vec::new();
        Command::Move(Direction::West)
            .execute(&mut world, &mut out)
            .unwrap();
        assert_eq!(world.player.position, Position::new(0, 0));
        assert_eq!(out, vec![WALL_MESSAGE.to_string()]);
    }

    #[test]
    fn activation_only_works_in_the_fountain_room() {
        let mut world = world(4, 4, Position::new(2, 2));
        let mut out: Vec<String> = Vec::new();
        Command::ActivateFountain
            .execute(&mut world, &mut out)
            .unwrap();
        assert!(!world.fountain_on);

        world.player.position = Position::new(3, 2);
        Command::ActivateFountain
            .execute(&mut world, &mut out)
            .unwrap();
        assert!(world.fountain_on);

        let snapshot = world.clone();
        Command::ActivateFountain
            .execute(&mut world, &mut out)
            .unwrap();
        assert_eq!(world, snapshot);
        assert!(out.is_empty());
    }

    proptest! {
        #[test]
        fn moves_land_exactly_one_step_away_or_hit_a_wall(
            row in 0i32..4,
            column in 0i32..4,
            direction_index in 0usize..4,
        ) {
            let start = Position::new(row, column);
            let direction = Direction::ALL[direction_index];
            let mut world = world(4, 4, start);
            let mut out: Vec<String> = Vec::new();
            Command::Move(direction).execute(&mut world, &mut out).unwrap();

            let target = start.offset(direction);
            if world.map.is_in_bounds(target) {
                prop_assert_eq!(world.player.position, target);
                prop_assert!(out.is_empty());
            } else {
                prop_assert_eq!(world.player.position, start);
                prop_assert_eq!(out, vec![WALL_MESSAGE.to_string()]);
            }
        }
    }
}

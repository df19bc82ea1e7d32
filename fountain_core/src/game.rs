use std::io;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    Position,
    actor::Actor,
    command::Command,
    console::{InputSource, OutputSink},
    layout::{Layout, LayoutError, MapSize},
    map::{Grid, RoomKind},
    sense::Sense,
};

pub const SEPARATOR: &str = "------------------------------------------------------";
pub const COMMAND_PROMPT: &str =
    "What do you want to do: (move north, move east, move south, move west, activate fountain)?";
pub const SIZE_PROMPT: &str = "Would you like to play a small, medium, or large game?";
pub const PIT_MESSAGE: &str = "You fell into a pit and died...";
pub const VICTORY_MESSAGE: &str =
    "The Fountain of Objects has been reactivated, and you have escaped with your life!";
pub const WIN_MESSAGE: &str = "You win!";

/// Errors that end a game session.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Input ended before the game was over")]
    InputExhausted,
    #[error("Invalid map layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Which rule set a session is played with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Find the fountain and get out. Nothing can kill you.
    Classic,
    /// Pits are placed in the cavern and falling into one ends the game.
    #[default]
    Pits,
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// The mutable game state that commands act on and senses read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub map: Grid<RoomKind>,
    pub player: Actor,
    pub fountain_on: bool,
}

impl World {
    /// Kind of the room the player is standing in.
    pub fn current_room(&self) -> RoomKind {
        self.map.room_kind_at(self.player.position)
    }

    pub fn state(&self) -> GameState {
        if !self.player.is_alive() {
            GameState::Lost
        } else if self.current_room() == RoomKind::Entrance && self.fountain_on {
            GameState::Won
        } else {
            GameState::Playing
        }
    }
}

/// One game session, from the entrance to a win or a death.
pub struct Game<I, O> {
    world: World,
    variant: Variant,
    senses: &'static [Sense],
    turns: u32,
    input: I,
    output: O,
}

impl<I: InputSource, O: OutputSink> Game<I, O> {
    /// Builds a session from a layout, placing the player at the entrance.
    ///
    /// Fails if the layout does not describe a playable map.
    pub fn new(layout: &Layout, variant: Variant, input: I, output: O) -> Result<Self, GameError> {
        let (map, entrance) = layout.build(variant == Variant::Pits)?;
        info!(
            "Starting {:?} game on a {}x{} map, entrance at {:?}",
            variant,
            map.rows(),
            map.columns(),
            entrance
        );
        Ok(Game {
            world: World {
                map,
                player: Actor::new(entrance),
                fountain_on: false,
            },
            variant,
            senses: Sense::registered(variant),
            turns: 0,
            input,
            output,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Number of commands executed so far.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn state(&self) -> GameState {
        self.world.state()
    }

    /// Gives the collaborators back, e.g. to inspect what was written.
    pub fn into_parts(self) -> (World, I, O) {
        (self.world, self.input, self.output)
    }

    /// Plays turns until the game is won or lost.
    pub fn run(&mut self) -> Result<GameState, GameError> {
        while self.state() == GameState::Playing {
            self.play_turn()?;
        }

        let state = self.state();
        if state == GameState::Won {
            self.output.say(VICTORY_MESSAGE)?;
            self.output.say(WIN_MESSAGE)?;
        }
        info!("Game over after {} turns: {:?}", self.turns, state);
        Ok(state)
    }

    /// Shows the status, reads one command and applies it.
    ///
    /// Does nothing once the game is over.
    pub fn play_turn(&mut self) -> Result<GameState, GameError> {
        if self.state() != GameState::Playing {
            return Ok(self.state());
        }
        self.display_status()?;
        let command = self.read_command()?;
        self.apply(command)
    }

    /// Executes a command and resolves what happens in the room it leads to.
    ///
    /// Commands are ignored once the game is over.
    pub fn apply(&mut self, command: Command) -> Result<GameState, GameError> {
        if self.state() != GameState::Playing {
            debug!("Ignoring {:?}: game is over", command);
            return Ok(self.state());
        }
        self.turns += 1;
        debug!("Turn {}: {:?}", self.turns, command);
        command.execute(&mut self.world, &mut self.output)?;

        if self.variant == Variant::Pits && self.world.current_room() == RoomKind::Pit
        {
            info!("Player fell into the pit at {:?}", self.world.player.position);
            self.world.player.kill();
            self.output.say(PIT_MESSAGE)?;
        }
        Ok(self.state())
    }

    fn display_status(&mut self) -> Result<(), GameError> {
        let Position { row, column } = self.world.player.position;
        self.output.say(SEPARATOR)?;
        self.output
            .say(&format!("You are in the room at (Row: {row}, Column: {column})."))?;
        for sense in self.senses {
            if sense.can_sense(&self.world) {
                self.output.say(sense.describe(&self.world))?;
            }
        }
        Ok(())
    }

    fn read_command(&mut self) -> Result<Command, GameError> {
        prompt_until(&mut self.input, &mut self.output, COMMAND_PROMPT, Command::parse)
    }
}

/// Asks the player which map size to play.
pub fn choose_map_size<I, O>(input: &mut I, output: &mut O) -> Result<MapSize, GameError>
where
    I: InputSource + ?Sized,
    O: OutputSink + ?Sized,
{
    prompt_until(input, output, SIZE_PROMPT, |line| line.parse().ok())
}

/// Prompts and reads lines until `parse` accepts one.
fn prompt_until<I, O, T>(
    input: &mut I,
    output: &mut O,
    prompt: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, GameError>
where
    I: InputSource + ?Sized,
    O: OutputSink + ?Sized,
{
    loop {
        output.say(prompt)?;
        let line = input.read_line()?.ok_or(GameError::InputExhausted)?;
        match parse(&line) {
            Some(value) => return Ok(value),
            None => {
                debug!("Unrecognized input {:?}", line);
                output.say(&format!("I did not understand '{line}'."))?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, console::ScriptedInput};

    fn small_layout(pits: &[Position]) -> Layout {
        let mut placements = vec![
            (Position::new(0, 0), RoomKind::Entrance),
            (Position::new(3, 2), RoomKind::Fountain),
        ];
        placements.extend(pits.iter().map(|&pit| (pit, RoomKind::Pit)));
        Layout {
            rows: 4,
            columns: 4,
            placements,
        }
    }

    fn game(
        variant: Variant,
        pits: &[Position],
        script: &[&str],
    ) -> Game<ScriptedInput, Vec<String>> {
        Game::new(
            &small_layout(pits),
            variant,
            ScriptedInput::new(script.iter().copied()),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn starts_at_the_entrance_and_playing() {
        let game = game(Variant::Pits, &[], &[]);
        assert_eq!(game.world().player.position, Position::new(0, 0));
        assert_eq!(game.world().current_room(), RoomKind::Entrance);
        assert!(!game.world().fountain_on);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.turns(), 0);
    }

    #[test]
    fn win_needs_both_entrance_and_active_fountain() {
        let mut game = game(Variant::Classic, &[], &[]);
        game.world.fountain_on = true;
        assert_eq!(game.state(), GameState::Won);

        game.world.player.position = Position::new(1, 0);
        assert_eq!(game.state(), GameState::Playing);

        game.world.player.position = Position::new(0, 0);
        game.world.fountain_on = false;
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn pit_kills_only_in_the_pits_variant() {
        let pit = Position::new(1, 0);

        let mut deadly = game(Variant::Pits, &[pit], &[]);
        let state = deadly.apply(Command::Move(Direction::East)).unwrap();
        assert_eq!(state, GameState::Lost);
        assert!(!deadly.world().player.is_alive());

        let mut harmless = game(Variant::Classic, &[pit], &[]);
        let state = harmless.apply(Command::Move(Direction::East)).unwrap();
        assert_eq!(state, GameState::Playing);
        assert_eq!(harmless.world().current_room(), RoomKind::Normal);
    }

    #[test]
    fn death_outranks_everything_else() {
        let mut game = game(Variant::Pits, &[Position::new(0, 1)], &[]);
        game.apply(Command::Move(Direction::North)).unwrap();
        assert_eq!(game.state(), GameState::Lost);
        game.world.player.position = Position::new(0, 0);
        game.world.fountain_on = true;
        assert_eq!(game.state(), GameState::Lost);
    }

    #[test]
    fn commands_after_a_loss_are_ignored() {
        let mut game = game(Variant::Pits, &[Position::new(1, 0)], &[]);
        assert_eq!(
            game.apply(Command::Move(Direction::East)).unwrap(),
            GameState::Lost
        );
        assert_eq!(
            game.apply(Command::Move(Direction::West)).unwrap(),
            GameState::Lost
        );
        assert_eq!(game.world().player.position, Position::new(1, 0));
        assert_eq!(game.turns(), 1);
    }

    #[test]
    fn no_more_turns_after_a_win() {
        let mut game = game(Variant::Classic, &[], &["e"]);
        game.world.fountain_on = true;
        let state = game.play_turn().unwrap();
        assert_eq!(state, GameState::Won);
        assert_eq!(game.turns(), 0);

        let (_, input, output) = game.into_parts();
        assert_eq!(input.remaining(), 1);
        assert!(output.is_empty());
    }

    #[test]
    fn unknown_input_is_reported_and_prompted_again() {
        let mut game = game(Variant::Classic, &[], &["dance", "e"]);
        game.play_turn().unwrap();
        assert_eq!(game.world().player.position, Position::new(1, 0));

        let (_, input, output) = game.into_parts();
        assert_eq!(input.remaining(), 0);
        assert_eq!(
            output.iter().filter(|line| *line == COMMAND_PROMPT).count(),
            2
        );
        assert!(output.contains(&"I did not understand 'dance'.".to_string()));
    }

    #[test]
    fn status_lists_position_then_senses() {
        let mut game = game(Variant::Pits, &[Position::new(1, 1)], &["a"]);
        game.play_turn().unwrap();
        let (_, _, output) = game.into_parts();
        assert_eq!(
            &output[..4],
            &[
                SEPARATOR.to_string(),
                "You are in the room at (Row: 0, Column: 0).".to_string(),
                crate::sense::ENTRANCE_MESSAGE.to_string(),
                crate::sense::PIT_DRAFT_MESSAGE.to_string(),
            ]
        );
    }

    #[test]
    fn running_out_of_input_is_fatal() {
        let mut game = game(Variant::Classic, &[], &["e", "bogus"]);
        let err = game.run().unwrap_err();
        assert!(matches!(err, GameError::InputExhausted));
        assert_eq!(game.turns(), 1);
    }

    #[test]
    fn size_prompt_retries_until_valid() {
        let mut input = ScriptedInput::new(["gigantic", "medium"]);
        let mut output: Vec<String> = Vec::new();
        let size = choose_map_size(&mut input, &mut output).unwrap();
        assert_eq!(size, MapSize::Medium);
        assert_eq!(
            output,
            vec![
                SIZE_PROMPT.to_string(),
                "I did not understand 'gigantic'.".to_string(),
                SIZE_PROMPT.to_string(),
            ]
        );
    }

    #[test]
    fn invalid_layout_aborts_setup() {
        let layout = Layout {
            rows: 2,
            columns: 2,
            placements: vec![(Position::new(0, 0), RoomKind::Entrance)],
        };
        let result = Game::new(&layout, Variant::Pits, ScriptedInput::default(), Vec::<String>::new());
        assert!(matches!(result, Err(GameError::Layout(_))));
    }
}

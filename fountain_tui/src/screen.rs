//! Full-screen front end: a scrolling transcript above a one-line prompt.

use std::{
    cell::RefCell,
    io::{self, Stdout},
    rc::Rc,
};

use fountain_core::{
    command::WALL_MESSAGE,
    console::{InputSource, OutputSink},
    game::{COMMAND_PROMPT, PIT_MESSAGE, SEPARATOR, SIZE_PROMPT, VICTORY_MESSAGE, WIN_MESSAGE},
    sense::{ENTRANCE_MESSAGE, FOUNTAIN_OFF_MESSAGE, FOUNTAIN_ON_MESSAGE, PIT_DRAFT_MESSAGE},
};
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};

type Transcript = Rc<RefCell<Vec<String>>>;

const HELP: &str = "Enter: submit   Esc / Ctrl-C: leave the cavern";

/// Appends game messages to the on-screen transcript.
pub struct ScreenOutput {
    transcript: Transcript,
}

impl OutputSink for ScreenOutput {
    fn say(&mut self, message: &str) -> io::Result<()> {
        self.transcript.borrow_mut().push(message.to_string());
        Ok(())
    }
}

/// Owns the terminal while the game runs and reads player input from it.
///
/// The terminal is restored when the screen is dropped.
pub struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    transcript: Transcript,
    line: String,
    footer: String,
}

impl Screen {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        // Leave the terminal usable even though the screen never came up
        let terminal = undo_on_error(enter_screen(), || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        })?;
        Ok(Screen {
            terminal,
            transcript: Rc::new(RefCell::new(Vec::new())),
            line: String::new(),
            footer: HELP.to_string(),
        })
    }

    /// A sink that writes into this screen's transcript.
    pub fn output(&self) -> ScreenOutput {
        ScreenOutput {
            transcript: Rc::clone(&self.transcript),
        }
    }

    /// Shows `footer` and blocks until any key is pressed.
    pub fn wait_for_key(&mut self, footer: &str) -> io::Result<()> {
        self.footer = footer.to_string();
        loop {
            self.draw()?;
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let transcript = self.transcript.borrow();
        let line = &self.line;
        let footer = &self.footer;
        self.terminal
            .draw(|frame| render(frame, &transcript, line, footer))?;
        Ok(())
    }
}

impl InputSource for Screen {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            self.draw()?;
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Enter => {
                    let line = std::mem::take(&mut self.line);
                    self.transcript.borrow_mut().push(format!("> {line}"));
                    return Ok(Some(line));
                }
                KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None);
                }
                KeyCode::Esc => return Ok(None),
                KeyCode::Char(c) => self.line.push(c),
                KeyCode::Backspace => {
                    self.line.pop();
                }
                _ => {}
            }
        }
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if let Err(err) = restore_terminal(&mut self.terminal) {
            log::error!("Failed to restore the terminal: {err}");
        }
    }
}

/// Switches to the alternate screen and wraps stdout in a terminal.
fn enter_screen() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Runs `undo` when `result` is an error, then passes the result through.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Renders the user interface.
fn render(frame: &mut Frame, transcript: &[String], line: &str, footer: &str) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Transcript
            Constraint::Length(3), // Input line
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    // Keep the newest messages in view
    let visible = main_layout[0].height.saturating_sub(2) as usize;
    let scroll = scroll_offset(transcript.len(), visible);
    let lines: Vec<Line> = transcript
        .iter()
        .map(|message| Line::from(Span::styled(message.as_str(), message_style(message))))
        .collect();
    let transcript_widget = Paragraph::new(lines)
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("The Fountain of Objects")
                .borders(Borders::ALL),
        );
    frame.render_widget(transcript_widget, main_layout[0]);

    let input_widget =
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Command"));
    frame.render_widget(input_widget, main_layout[1]);
    frame.set_cursor_position((
        main_layout[1].x + 1 + line.chars().count() as u16,
        main_layout[1].y + 1,
    ));

    let help_text = Paragraph::new(footer)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help_text, main_layout[2]);
}

/// First transcript line to show so the last `visible` lines fit.
fn scroll_offset(lines: usize, visible: usize) -> u16 {
    u16::try_from(lines.saturating_sub(visible)).unwrap_or(u16::MAX)
}

/// Colors a transcript line by what it tells the player.
fn message_style(message: &str) -> Style {
    match message {
        ENTRANCE_MESSAGE => Style::default().fg(Color::Yellow),
        FOUNTAIN_OFF_MESSAGE => Style::default().fg(Color::Cyan),
        FOUNTAIN_ON_MESSAGE => Style::default().fg(Color::Blue).bold(),
        PIT_DRAFT_MESSAGE => Style::default().fg(Color::Magenta),
        PIT_MESSAGE => Style::default().fg(Color::Red).bold(),
        VICTORY_MESSAGE | WIN_MESSAGE => Style::default().fg(Color::Green).bold(),
        WALL_MESSAGE => Style::default().fg(Color::Red),
        COMMAND_PROMPT | SIZE_PROMPT | SEPARATOR => Style::default().fg(Color::DarkGray),
        _ if message.starts_with("> ") => Style::default().bold(),
        _ => Style::default(),
    }
}

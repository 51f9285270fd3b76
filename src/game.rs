use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::EngineConfig;
use crate::term::TermManager;
use crate::snake::{Bounds, SnakeEngine, Direction::{*, self}, EndReason, GameOver, GameState, Resize, StepOutcome};

use crossterm::event::{Event, KeyEvent, KeyModifiers, KeyCode};

// Terminal cells are taller than wide, so vertical moves get a longer tick
const VERTICAL_STRETCH: f64 = 1.35;
const GAME_OVER_GRACE: Duration = Duration::from_secs(1);

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

enum Command {
    Turn(Direction),
    Pause,
    Quit,
    Other,
}

pub struct SnakeGame {
    config: EngineConfig,
    paused: bool,
    term: TermManager,
}

impl SnakeGame {
    pub fn new(config: EngineConfig) -> Self {
        SnakeGame { config, paused: false, term: TermManager::new() }
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup().context("failed to prepare the terminal")
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore().context("failed to restore the terminal")
    }

    /// Splash screen. Returns `false` if the player chose to leave.
    pub fn show_intro(&mut self) -> Result<bool> {
        self.term.clear()?;
        self.term.show_message(&[
            "A simple movement tool.",
            "Arrow keys or WASD to move",
            "Esc to pause",
            "",
            "Press 'q' to quit or any other key to continue",
        ])?;

        let key = self.term.read_key_blocking()?;
        Ok(!matches!(to_command(&key), Command::Quit))
    }

    /// Runs one session until the snake dies or the player quits. Returns
    /// `None` if the player left before the session could start.
    pub fn play(&mut self) -> Result<Option<GameOver>> {
        let bounds = match self.wait_for_room()? {
            Some(bounds) => bounds,
            None => return Ok(None),
        };
        let mut engine = SnakeEngine::new(self.config.clone(), bounds)?;
        let mut next_tick: Option<Instant> = None; // Clock starts on the first keystroke

        self.paused = false;
        info!("New game on a {}x{} board", bounds.height, bounds.width);

        loop {
            match engine.set_bounds(self.term.board_bounds()?) {
                Ok(Resize::Reset) => info!("Board shrank under the snake, restarted at the center"),
                Ok(Resize::Kept) => {}
                Err(_) => match self.wait_for_room()? {
                    Some(bounds) => {
                        engine.set_bounds(bounds)?;
                    }
                    None => return self.end_session(&mut engine),
                },
            }

            self.render(&engine)?;

            let timeout = match next_tick {
                Some(at) if !self.paused => Some(at.saturating_duration_since(Instant::now())),
                _ => None,
            };

            let requested = match self.term.next_event(timeout)? {
                None => engine.heading(), // Tick elapsed
                Some(Event::Key(key)) => match to_command(&key) {
                    Command::Quit => return self.end_session(&mut engine),
                    Command::Pause => {
                        if next_tick.is_some() {
                            self.paused = !self.paused;
                        }
                        continue;
                    }
                    _ if self.paused => continue,
                    Command::Turn(dir) => dir,
                    Command::Other if next_tick.is_none() => engine.heading(),
                    Command::Other => continue,
                },
                Some(_) => continue,
            };

            if let StepOutcome::Over(_) = engine.step(requested) {
                return self.end_session(&mut engine);
            }

            next_tick = Some(Instant::now() + self.interval_for(&engine));
        }
    }

    /// Blocks until any key is pressed. Returns `false` on quit, or when the
    /// session itself ended by quitting.
    pub fn wants_rematch(&mut self, over: GameOver) -> Result<bool> {
        sleep(GAME_OVER_GRACE);
        self.term.discard_pending_events()?;

        let key = self.term.read_key_blocking()?;
        Ok(offers_rematch(over) && !matches!(to_command(&key), Command::Quit))
    }

    ///////////////////////////////////////////////////////////////////////////

    fn interval_for(&self, engine: &SnakeEngine) -> Duration {
        let interval = engine.tick_interval();
        if engine.heading().is_vertical() {
            interval.mul_f64(VERTICAL_STRETCH)
        } else {
            interval
        }
    }

    /// Waits until the terminal can hold a fresh snake. `None` means the
    /// player quit instead.
    fn wait_for_room(&mut self) -> Result<Option<Bounds>> {
        loop {
            let bounds = self.term.board_bounds()?;
            if bounds.can_hold(self.config.initial_length) {
                return Ok(Some(bounds));
            }

            warn!("Terminal too small ({}x{}), waiting for a resize", bounds.height, bounds.width);
            self.term.clear()?;
            self.term.print_status("Terminal too small, please enlarge it (q to quit)")?;
            self.term.flush()?;

            if let Some(Event::Key(key)) = self.term.next_event(None)? {
                if matches!(to_command(&key), Command::Quit) {
                    return Ok(None);
                }
            }
        }
    }

    fn render(&mut self, engine: &SnakeEngine) -> Result<()> {
        let bounds = engine.bounds();

        self.term.clear()?;
        self.term.print_status(&format!("Score: {}", engine.score()))?;

        if let Some(food) = engine.food() {
            self.term.print_cell(food, FOOD_CHAR)?;
        }

        // Segments can hang off the board right after a shrink
        for (i, pos) in engine.body().iter().enumerate().rev() {
            if bounds.contains(*pos) {
                let ch = if i == 0 { head_char(engine.heading()) } else { SNAKE_BODY_CHAR };
                self.term.print_cell(*pos, ch)?;
            }
        }

        if self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or q to quit"])?;
        }

        self.term.flush()?;
        Ok(())
    }

    /// Ends the session, quitting it if the snake is still alive, and shows
    /// the final screen.
    fn end_session(&mut self, engine: &mut SnakeEngine) -> Result<Option<GameOver>> {
        let over = match engine.state() {
            GameState::Over(over) => over,
            GameState::Running => engine.quit(),
        };

        self.show_game_over(engine, over)?;
        Ok(Some(over))
    }

    fn show_game_over(&mut self, engine: &SnakeEngine, over: GameOver) -> Result<()> {
        self.render(engine)?;

        for pos in engine.body() {
            if engine.bounds().contains(*pos) {
                self.term.print_cell(*pos, DEAD_SNAKE_CHAR)?;
            }
        }

        let lines = game_over_lines(over);
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.term.show_message(&lines)?;
        Ok(())
    }
}

fn offers_rematch(over: GameOver) -> bool {
    over.reason != EndReason::Quit
}

fn game_over_lines(over: GameOver) -> Vec<String> {
    let mut lines = vec![
        "Game Over!".to_string(),
        over.reason.to_string(),
        format!("Your Score: {}", over.score),
        String::new(),
    ];

    if offers_rematch(over) {
        lines.push("Press any key to play again,".to_string());
        lines.push("or q to quit.".to_string());
    } else {
        lines.push("Press any key to exit...".to_string());
    }

    lines
}

fn to_command(ev: &KeyEvent) -> Command {
    match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL } => Command::Quit,
        KeyEvent { code, modifiers: _ } => match code {
            KeyCode::Char('w') | KeyCode::Up => Command::Turn(Up),
            KeyCode::Char('a') | KeyCode::Left => Command::Turn(Left),
            KeyCode::Char('s') | KeyCode::Down => Command::Turn(Down),
            KeyCode::Char('d') | KeyCode::Right => Command::Turn(Right),
            KeyCode::Char('q') => Command::Quit,
            KeyCode::Esc => Command::Pause,
            _ => Command::Other,
        },
    }
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quitting_shows_reason_and_score() {
        let over = GameOver { reason: EndReason::Quit, score: 7 };
        let lines = game_over_lines(over);

        assert!(lines.contains(&"Why did you quit? You were doing quite well!".to_string()));
        assert!(lines.contains(&"Your Score: 7".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Press any key to exit..."));
        assert!(!offers_rematch(over));
    }

    #[test]
    fn crashing_offers_another_round() {
        let over = GameOver { reason: EndReason::SelfCollision, score: 2 };
        let lines = game_over_lines(over);

        assert_eq!(lines[1], "Your snake ate itself!");
        assert_eq!(lines[2], "Your Score: 2");
        assert_eq!(lines.last().map(String::as_str), Some("or q to quit."));
        assert!(offers_rematch(over));
    }

    #[test]
    fn quit_keys() {
        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        let q = KeyEvent { code: KeyCode::Char('q'), modifiers: KeyModifiers::NONE };

        assert!(matches!(to_command(&ctrl_c), Command::Quit));
        assert!(matches!(to_command(&q), Command::Quit));
        assert!(matches!(
            to_command(&KeyEvent { code: KeyCode::Up, modifiers: KeyModifiers::NONE }),
            Command::Turn(Up)
        ));
    }
}

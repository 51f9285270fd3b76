use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::buffer::PositionBuffer;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::food::place_food;
use crate::TermInt;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const fn new(row: i32, col: i32) -> Self {
        Point { row, col }
    }

    pub fn moved(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        Point::new(self.row + d_row, self.col + d_col)
    }
}

/// The playable rectangle `[0, height) x [0, width)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub height: TermInt,
    pub width: TermInt,
}

impl Bounds {
    pub const fn new(height: TermInt, width: TermInt) -> Self {
        Bounds { height, width }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row >= 0
            && point.col >= 0
            && point.row < self.height as i32
            && point.col < self.width as i32
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    pub fn center(&self) -> Point {
        Point::new((self.height / 2) as i32, (self.width / 2) as i32)
    }

    /// Whether a snake of `length` laid out leftwards from the center fits.
    pub fn can_hold(&self, length: usize) -> bool {
        !self.is_empty() && length >= 1 && (self.width / 2) as usize >= length - 1
    }

    pub fn cells(self) -> impl Iterator<Item = Point> {
        let width = self.width as i32;
        (0..self.height as i32)
            .flat_map(move |row| (0..width).map(move |col| Point::new(row, col)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    OutOfBounds,
    SelfCollision,
    Quit,
}

impl EndReason {
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::OutOfBounds => "Your snake went out of bounds!",
            EndReason::SelfCollision => "Your snake ate itself!",
            EndReason::Quit => "Why did you quit? You were doing quite well!",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameOver {
    pub reason: EndReason,
    pub score: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Over(GameOver),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate,
    Over(GameOver),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resize {
    Kept,
    Reset,
}

pub struct SnakeEngine<R = ThreadRng> {
    rng: R,
    config: EngineConfig,
    bounds: Bounds,
    body: PositionBuffer,
    heading: Direction,
    food: Option<Point>,
    score: u32,
    state: GameState,
}

impl SnakeEngine<ThreadRng> {
    pub fn new(config: EngineConfig, bounds: Bounds) -> Result<Self> {
        SnakeEngine::with_rng(config, bounds, rand::thread_rng())
    }
}

impl<R: Rng> SnakeEngine<R> {
    pub fn with_rng(config: EngineConfig, bounds: Bounds, rng: R) -> Result<Self> {
        config.validate()?;
        check_room(bounds, config.initial_length)?;

        let body = PositionBuffer::with_capacity(config.initial_length * 2);
        let mut engine = SnakeEngine {
            rng,
            config,
            bounds,
            body,
            heading: Right,
            food: None,
            score: 0,
            state: GameState::Running,
        };
        engine.reset();

        Ok(engine)
    }

    pub fn body(&self) -> &[Point] {
        self.body.as_slice()
    }

    pub fn head(&self) -> Point {
        self.body.get(0)
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.difficulty.tick_interval(self.score)
    }

    /// Applies freshly polled bounds. A head left outside the new rectangle
    /// means the surface shrank under the snake, which restarts it in the
    /// middle instead of ending the game.
    pub fn set_bounds(&mut self, bounds: Bounds) -> Result<Resize> {
        if let Err(err) = check_room(bounds, self.config.initial_length) {
            warn!("Ignoring bounds {}x{}: {}", bounds.height, bounds.width, err);
            return Err(err);
        }

        self.bounds = bounds;

        if !self.is_running() {
            return Ok(Resize::Kept);
        }

        if !bounds.contains(self.head()) {
            info!("Head {:?} left the {}x{} board, resetting", self.head(), bounds.height, bounds.width);
            self.reset();
            return Ok(Resize::Reset);
        }

        if !self.food.map_or(false, |food| bounds.contains(food)) {
            self.place_food();
        }

        Ok(Resize::Kept)
    }

    /// Rebuilds the snake at the center of the board facing right, keeping
    /// the score.
    pub fn reset(&mut self) {
        let head = self.bounds.center();

        self.body.release();
        for i in 0..self.config.initial_length {
            self.body.append(Point::new(head.row, head.col - i as i32));
        }

        self.heading = Right;
        self.place_food();
    }

    pub fn place_food(&mut self) {
        self.food = place_food(&mut self.rng, self.body.as_slice(), self.bounds);
        debug!("Food placed at {:?}", self.food);
    }

    pub fn step(&mut self, requested: Direction) -> StepOutcome {
        if let GameState::Over(over) = self.state {
            return StepOutcome::Over(over);
        }

        let heading = if requested == self.heading.opposite() { self.heading } else { requested };
        let new_head = self.head().moved(heading);

        if !self.bounds.contains(new_head) {
            return StepOutcome::Over(self.end(EndReason::OutOfBounds));
        }

        if self.body.contains(&new_head) {
            return StepOutcome::Over(self.end(EndReason::SelfCollision));
        }

        let old_tail = self.body.get(self.body.len() - 1);
        for i in (1..self.body.len()).rev() {
            let prev = self.body.get(i - 1);
            self.body.set(i, prev);
        }
        self.body.set(0, new_head);
        self.heading = heading;

        if self.food == Some(new_head) {
            self.score += 1;
            self.body.append(old_tail);
            self.place_food();
            info!("Ate food at {:?}, score {}", new_head, self.score);
            StepOutcome::Ate
        } else {
            debug!("Moved {:?} to {:?}", heading, new_head);
            StepOutcome::Moved
        }
    }

    pub fn quit(&mut self) -> GameOver {
        match self.state {
            GameState::Over(over) => over,
            GameState::Running => self.end(EndReason::Quit),
        }
    }

    fn end(&mut self, reason: EndReason) -> GameOver {
        let over = GameOver { reason, score: self.score };
        info!("Game over: {} (score {})", reason, self.score);
        self.state = GameState::Over(over);
        over
    }
}

fn check_room(bounds: Bounds, length: usize) -> Result<()> {
    if bounds.can_hold(length) {
        Ok(())
    } else {
        Err(Error::BoundsTooSmall { height: bounds.height, width: bounds.width, length })
    }
}

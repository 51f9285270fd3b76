use crate::snake::{Bounds, Point};
use crate::TermInt;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

// Rows above the board reserved for the status bar
pub const STATUS_ROWS: TermInt = 1;

pub struct TermManager {
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout() }
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> crossterm::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for the next event, or forever without one.
    pub fn next_event(&self, timeout: Option<Duration>) -> crossterm::Result<Option<Event>> {
        match timeout {
            None => read().map(Some),
            Some(t) if poll(t)? => read().map(Some),
            Some(_) => Ok(None),
        }
    }

    /// Throws away whatever input is queued.
    pub fn discard_pending_events(&self) -> crossterm::Result<()> {
        while poll(Duration::from_millis(1))? {
            read()?;
        }

        Ok(())
    }

    /// The playable area: the whole terminal minus the status bar, queried
    /// fresh so resizes are picked up.
    pub fn board_bounds(&self) -> crossterm::Result<Bounds> {
        let (width, height) = terminal::size()?;
        Ok(Bounds::new(height.saturating_sub(STATUS_ROWS), width))
    }

    pub fn clear(&mut self) -> crossterm::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))
    }

    pub fn print_status(&mut self, text: &str) -> crossterm::Result<()> {
        queue!(self.stdout, cursor::MoveTo(0, 0), style::Print(text))
    }

    /// Draws a board cell, translating from board to screen coordinates.
    pub fn print_cell(&mut self, pos: Point, ch: char) -> crossterm::Result<()> {
        let (x, y) = (pos.col as TermInt, pos.row as TermInt + STATUS_ROWS);
        queue!(self.stdout, cursor::MoveTo(x, y), style::Print(ch))
    }

    pub fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()> {
        let (width, height) = terminal::size()?;

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (width / 2, height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Blank lines above and below the text
        let blank = " ".repeat(msg_width as usize);
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            queue!(self.stdout, cursor::MoveTo(top_left.0, *y), style::Print(&blank))?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
        }

        self.flush()
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

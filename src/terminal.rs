//! Terminal display and keyboard input

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, stdout, BufWriter, Stdout, Write};
use std::time::{Duration, Instant};

use crate::camera::InputState;

/// Rows reserved below the frame for the status line
const STATUS_ROWS: u16 = 2;

/// Alternate-screen terminal with buffered output
pub struct TerminalDisplay {
    width: u16,
    height: u16,
    last_resize_check: Instant,
    buffer: BufWriter<Stdout>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        // Enter the alternate screen first so the reported size is accurate
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;

        let (width, height) = terminal::size()?;

        Ok(Self {
            width,
            height: height.saturating_sub(STATUS_ROWS),
            last_resize_check: Instant::now(),
            buffer: BufWriter::new(stdout),
        })
    }

    /// Usable character cells (width, height), excluding the status rows
    pub fn get_size(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    /// Check if terminal has been resized
    pub fn check_resize(&mut self) -> bool {
        if self.last_resize_check.elapsed() < Duration::from_millis(100) {
            return false;
        }
        self.last_resize_check = Instant::now();

        if let Ok((new_width, new_height)) = terminal::size() {
            let new_height = new_height.saturating_sub(STATUS_ROWS);
            if new_width != self.width || new_height != self.height {
                self.width = new_width;
                self.height = new_height;
                return true;
            }
        }
        false
    }

    /// Draw a frame line by line with explicit cursor positioning, then the status line
    pub fn render(&mut self, content: &str, status: &str) -> io::Result<()> {
        // Hide cursor, disable line wrap
        write!(self.buffer, "\x1b[?25l\x1b[?7l")?;

        let mut rows = 0;
        for (i, line) in content.lines().enumerate() {
            write!(self.buffer, "\x1b[{};1H{}", i + 1, line)?;
            rows = i + 1;
        }

        // Clear leftovers from a larger previous frame
        write!(self.buffer, "\x1b[J")?;
        write!(self.buffer, "\x1b[{};1H\x1b[K{}", rows + 1, status)?;

        // Show cursor, re-enable line wrap
        write!(self.buffer, "\x1b[?25h\x1b[?7h")?;
        self.buffer.flush()
    }

    /// Wait up to `timeout` for a key press
    pub fn poll_input(&self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Release {
                    return Ok(Some(key_event));
                }
            }
        }
        Ok(None)
    }

    /// Collect every key press queued since the last call without blocking
    pub fn drain_input(&self) -> io::Result<Vec<KeyEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self.poll_input(Duration::ZERO)? {
            events.push(event);
        }
        Ok(events)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = self.buffer.flush();
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

/// Key actions for the tracer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Pause,
    ResetEye,
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

/// Parse keyboard input into actions
pub fn parse_key_event(event: KeyEvent) -> Action {
    match event.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') => Action::Pause,
        KeyCode::Char('0') => Action::ResetEye,
        KeyCode::Char('w') | KeyCode::Up => Action::Forward,
        KeyCode::Char('s') | KeyCode::Down => Action::Back,
        KeyCode::Char('a') | KeyCode::Left => Action::Left,
        KeyCode::Char('d') | KeyCode::Right => Action::Right,
        KeyCode::Char('r') | KeyCode::PageUp => Action::Up,
        KeyCode::Char('f') | KeyCode::PageDown => Action::Down,
        _ => Action::None,
    }
}

/// Fold a movement action into this frame's input snapshot. Returns false
/// for actions that are not movement.
pub fn record_movement(input: &mut InputState, action: Action) -> bool {
    let flag = match action {
        Action::Forward => &mut input.forward,
        Action::Back => &mut input.back,
        Action::Left => &mut input.left,
        Action::Right => &mut input.right,
        Action::Up => &mut input.up,
        Action::Down => &mut input.down,
        _ => return false,
    };
    *flag = true;
    true
}

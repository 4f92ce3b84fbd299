use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Stdout, Write};
use std::time::Duration;

pub trait Console {
    /// Non-blocking probe for a pending keystroke.
    fn poll(&mut self) -> io::Result<Option<u8>>;

    /// Blocking read of one keystroke, no echo.
    fn read_byte(&mut self) -> io::Result<u8>;

    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        for byte in s.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// Puts the controlling terminal into raw mode for as long as it lives.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Restores the terminal and exits. Shared by the Ctrl-C key path below
/// and the signal handler installed in main.
pub fn interrupt() -> ! {
    let _ = terminal::disable_raw_mode();
    println!();
    std::process::exit(130);
}

pub struct Terminal {
    stdout: Stdout,
}

impl Terminal {
    pub fn new() -> Self {
        Terminal {
            stdout: io::stdout(),
        }
    }

    fn key_byte(key: KeyEvent) -> Option<u8> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        // Raw mode disables ISIG, so Ctrl-C arrives here as a key event.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            interrupt();
        }

        match key.code {
            KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
            KeyCode::Enter => Some(b'\n'),
            KeyCode::Tab => Some(b'\t'),
            KeyCode::Backspace => Some(0x08),
            KeyCode::Esc => Some(0x1b),
            _ => None,
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Terminal::new()
    }
}

impl Console for Terminal {
    fn poll(&mut self) -> io::Result<Option<u8>> {
        while event::poll(Duration::from_secs(0))? {
            if let Event::Key(key) = event::read()? {
                if let Some(byte) = Self::key_byte(key) {
                    return Ok(Some(byte));
                }
            }
        }
        Ok(None)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(byte) = Self::key_byte(key) {
                    return Ok(byte);
                }
            }
        }
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        // Raw mode disables output post-processing, so the carriage
        // return has to come from us.
        if byte == b'\n' {
            self.stdout.write_all(b"\r\n")
        } else {
            self.stdout.write_all(&[byte])
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

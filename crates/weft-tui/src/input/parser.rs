//! Terminal input parser: bytes to key and mouse events.
//!
//! `parse` is pure and deterministic. It consumes a byte buffer and
//! returns the decoded events plus any incomplete trailing sequence,
//! which the caller must prepend to its next read. A buffer consisting
//! of exactly one `ESC` byte decodes as the Escape key; an `ESC`
//! followed by an unfinished sequence is held back instead.

use crate::event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};

/// Streaming wrapper around [`parse`] holding the carry buffer.
#[derive(Debug, Default)]
pub struct Parser {
    carry: Vec<u8>,
}

impl Parser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed freshly read bytes, returning all complete events. Partial
    /// trailing sequences are carried into the next call.
    pub fn advance(&mut self, bytes: &[u8]) -> Vec<Event> {
        let mut buf = std::mem::take(&mut self.carry);
        buf.extend_from_slice(bytes);
        let (events, remaining) = parse(&buf);
        self.carry = remaining;
        events
    }

    /// Bytes held over from the previous feed.
    pub fn pending(&self) -> &[u8] {
        &self.carry
    }
}

/// Decode a byte buffer into events and an undecoded suffix.
pub fn parse(bytes: &[u8]) -> (Vec<Event>, Vec<u8>) {
    // The one deliberate ambiguity: a buffer that is exactly a lone
    // ESC is the Escape key, not the start of a sequence.
    if bytes == [0x1b] {
        return (vec![Event::Key(KeyEvent::plain(KeyCode::Escape))], Vec::new());
    }

    let mut events = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match step(&bytes[i..]) {
            Step::Event(event, used) => {
                events.push(event);
                i += used;
            }
            Step::Skip(used) => i += used,
            Step::Incomplete => return (events, bytes[i..].to_vec()),
        }
    }
    (events, Vec::new())
}

enum Step {
    /// Decoded one event from `used` bytes.
    Event(Event, usize),
    /// Consumed `used` bytes producing nothing (noise).
    Skip(usize),
    /// The buffer ends mid-sequence; keep the rest for the next read.
    Incomplete,
}

fn step(buf: &[u8]) -> Step {
    let b = buf[0];
    match b {
        0x1b => escape(buf),
        0x7f => key(KeyCode::Backspace, Modifiers::NONE, 1),
        0x0d => key(KeyCode::Enter, Modifiers::NONE, 1),
        0x09 => key(KeyCode::Tab, Modifiers::NONE, 1),
        0x01..=0x1a => {
            // Conventional Ctrl mapping: 0x01 = Ctrl+A .. 0x1A = Ctrl+Z.
            let c = (b - 0x01 + b'a') as char;
            key(KeyCode::Char(c), Modifiers::CTRL, 1)
        }
        0x20..=0x7e => key(KeyCode::Char(b as char), Modifiers::NONE, 1),
        0x80.. => match decode_utf8(buf) {
            Utf8::Char(c, used) => key(KeyCode::Char(c), Modifiers::NONE, used),
            Utf8::Incomplete => Step::Incomplete,
            Utf8::Invalid => Step::Skip(1),
        },
        _ => Step::Skip(1),
    }
}

fn key(code: KeyCode, modifiers: Modifiers, used: usize) -> Step {
    Step::Event(Event::Key(KeyEvent::new(code, modifiers)), used)
}

/// Decode a sequence starting with ESC. `buf[0]` is the ESC byte.
fn escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        // Trailing ESC after other input: wait for the rest.
        return Step::Incomplete;
    };

    match next {
        b'[' => csi(buf),
        b'O' => ss3(buf),
        0x1b => key(KeyCode::Escape, Modifiers::NONE, 1),
        0x20..=0x7e => key(KeyCode::Char(next as char), Modifiers::ALT, 2),
        0x80.. => match decode_utf8(&buf[1..]) {
            Utf8::Char(c, used) => key(KeyCode::Char(c), Modifiers::ALT, used + 1),
            Utf8::Incomplete => Step::Incomplete,
            Utf8::Invalid => Step::Skip(2),
        },
        // ESC + control byte: drop the pair.
        _ => Step::Skip(2),
    }
}

/// Decode `ESC [ params final`. `buf` starts at the ESC.
fn csi(buf: &[u8]) -> Step {
    // Find the final byte (0x40..=0x7E) after the parameter bytes.
    let mut idx = 2;
    while let Some(&b) = buf.get(idx) {
        match b {
            0x30..=0x3f => idx += 1,          // digits, ';', '<', '?'
            0x20..=0x2f => idx += 1,          // intermediates
            0x40..=0x7e => return csi_final(&buf[2..idx], b, idx + 1),
            _ => return Step::Skip(idx + 1),  // malformed
        }
    }
    Step::Incomplete
}

fn csi_final(params: &[u8], final_byte: u8, used: usize) -> Step {
    if params.first() == Some(&b'<') {
        return sgr_mouse(&params[1..], final_byte, used);
    }

    let numbers = parse_params(params);
    let modifiers = numbers
        .get(1)
        .copied()
        .map(Modifiers::from_csi_param)
        .unwrap_or(Modifiers::NONE);

    let code = match final_byte {
        b'A' => Some(KeyCode::Up),
        b'B' => Some(KeyCode::Down),
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        b'Z' => {
            // CSI Z is Shift+Tab.
            return key(KeyCode::Tab, Modifiers::SHIFT, used);
        }
        b'~' => tilde_code(numbers.first().copied().unwrap_or(1)),
        _ => None,
    };

    match code {
        Some(code) => key(code, modifiers, used),
        None => Step::Skip(used),
    }
}

/// `~`-terminated numeric escape codes.
fn tilde_code(code: u16) -> Option<KeyCode> {
    match code {
        1 | 7 => Some(KeyCode::Home),
        2 => Some(KeyCode::Insert),
        3 => Some(KeyCode::Delete),
        4 | 8 => Some(KeyCode::End),
        5 => Some(KeyCode::PageUp),
        6 => Some(KeyCode::PageDown),
        11..=15 => Some(KeyCode::F((code - 10) as u8)),
        17..=21 => Some(KeyCode::F((code - 11) as u8)),
        23 | 24 => Some(KeyCode::F((code - 12) as u8)),
        _ => None,
    }
}

/// `ESC [ < b ; x ; y (M|m)` SGR mouse reports.
fn sgr_mouse(params: &[u8], final_byte: u8, used: usize) -> Step {
    if final_byte != b'M' && final_byte != b'm' {
        return Step::Skip(used);
    }
    let numbers = parse_params(params);
    let (Some(&btn), Some(&px), Some(&py)) = (numbers.first(), numbers.get(1), numbers.get(2))
    else {
        return Step::Skip(used);
    };

    let mut modifiers = Modifiers::NONE;
    if btn & 0x04 != 0 {
        modifiers = modifiers | Modifiers::SHIFT;
    }
    if btn & 0x08 != 0 {
        modifiers = modifiers | Modifiers::ALT;
    }
    if btn & 0x10 != 0 {
        modifiers = modifiers | Modifiers::CTRL;
    }

    let kind = if btn & 0x40 != 0 {
        if btn & 1 == 0 {
            MouseEventKind::ScrollUp
        } else {
            MouseEventKind::ScrollDown
        }
    } else {
        let button = match btn & 0x03 {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        };
        if btn & 0x20 != 0 {
            match button {
                Some(button) => MouseEventKind::Drag(button),
                None => MouseEventKind::Move,
            }
        } else if final_byte == b'm' {
            MouseEventKind::Release
        } else {
            match button {
                Some(button) => MouseEventKind::Press(button),
                None => MouseEventKind::Move,
            }
        }
    };

    let event = MouseEvent {
        kind,
        x: px.saturating_sub(1),
        y: py.saturating_sub(1),
        modifiers,
    };
    Step::Event(Event::Mouse(event), used)
}

/// `ESC O final` SS3 sequences (application-mode keys, F1-F4).
fn ss3(buf: &[u8]) -> Step {
    let Some(&b) = buf.get(2) else {
        return Step::Incomplete;
    };
    let code = match b {
        b'A' => Some(KeyCode::Up),
        b'B' => Some(KeyCode::Down),
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        b'P' => Some(KeyCode::F(1)),
        b'Q' => Some(KeyCode::F(2)),
        b'R' => Some(KeyCode::F(3)),
        b'S' => Some(KeyCode::F(4)),
        _ => None,
    };
    match code {
        Some(code) => key(code, Modifiers::NONE, 3),
        None => Step::Skip(3),
    }
}

/// Split semicolon-separated decimal parameters. Empty fields decode
/// as 0.
fn parse_params(params: &[u8]) -> Vec<u16> {
    params
        .split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| {
                    acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
                })
        })
        .collect()
}

enum Utf8 {
    Char(char, usize),
    Incomplete,
    Invalid,
}

/// Decode one UTF-8 scalar from the head of the buffer.
fn decode_utf8(buf: &[u8]) -> Utf8 {
    let len = match buf[0] {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Utf8::Invalid,
    };
    if buf.len() < len {
        // A longer prefix could still complete the scalar.
        return match std::str::from_utf8(buf) {
            Err(e) if e.error_len().is_none() => Utf8::Incomplete,
            _ => Utf8::Invalid,
        };
    }
    match std::str::from_utf8(&buf[..len]) {
        Ok(s) => match s.chars().next() {
            Some(c) => Utf8::Char(c, len),
            None => Utf8::Invalid,
        },
        Err(_) => Utf8::Invalid,
    }
}

//! Raw byte stream → logical `KeyEvent` decoding.
//!
//! Recognized shapes:
//! * C0 control bytes (Ctrl-A..Ctrl-Z, Tab, CR/LF, BS/DEL).
//! * Printable ASCII and multi-byte UTF-8 (assembled here).
//! * `ESC [ params final` (CSI): arrows, Home/End, `~` keys, back-tab, with the
//!   xterm modifier parameter (`ESC [ 1 ; 5 C` is Ctrl+Right).
//! * `ESC O final` (SS3) arrows and Home/End.
//! * `ESC <byte>`: Alt + key, `ESC DEL` is Alt+Backspace.
//!
//! Unrecognized sequences are absorbed up to their final byte and decoding
//! continues with the next key; nothing partial is ever returned. A byte that
//! cannot belong to the sequence in progress is kept as one-byte lookahead and
//! decoded as the next key.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use std::io;
use tracing::trace;

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;
const BS: u8 = 0x08;
/// Parameter bytes retained per CSI sequence; longer runs are still consumed.
const CSI_PARAM_CAP: usize = 16;

/// Blocking single-byte input.
pub trait ByteSource {
    /// Read exactly one byte. End of stream is reported as
    /// `io::ErrorKind::UnexpectedEof`.
    fn read_byte(&mut self) -> io::Result<u8>;
}

impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<u8> {
        let bytes: &[u8] = *self;
        match bytes.split_first() {
            Some((b, rest)) => {
                *self = rest;
                Ok(*b)
            }
            None => Err(io::ErrorKind::UnexpectedEof.into()),
        }
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_byte(&mut self) -> io::Result<u8> {
        (**self).read_byte()
    }
}

#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Option<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until one complete key event has been decoded.
    pub fn next_key<S: ByteSource + ?Sized>(&mut self, src: &mut S) -> io::Result<KeyEvent> {
        loop {
            let b = self.next_byte(src)?;
            if let Some(key) = self.decode(b, src)? {
                return Ok(key);
            }
        }
    }

    /// Discard any lookahead byte (used when a new line edit starts).
    pub fn reset(&mut self) {
        self.pending = None;
    }

    fn next_byte<S: ByteSource + ?Sized>(&mut self, src: &mut S) -> io::Result<u8> {
        match self.pending.take() {
            Some(b) => Ok(b),
            None => src.read_byte(),
        }
    }

    fn decode<S: ByteSource + ?Sized>(&mut self, b: u8, src: &mut S) -> io::Result<Option<KeyEvent>> {
        let key = match b {
            ESC => return self.decode_escape(src),
            b'\r' | b'\n' => KeyEvent::plain(KeyCode::Enter),
            b'\t' => KeyEvent::plain(KeyCode::Tab),
            DEL | BS => KeyEvent::plain(KeyCode::Backspace),
            0x01..=0x1a => KeyEvent::ctrl(char::from(b'a' + b - 1)),
            0x20..=0x7e => KeyEvent::char(char::from(b)),
            0x80..=0xff => return self.decode_utf8(b, src),
            _ => {
                trace!(target: "input.decode", byte = b, "control_byte_ignored");
                return Ok(None);
            }
        };
        Ok(Some(key))
    }

    fn decode_escape<S: ByteSource + ?Sized>(&mut self, src: &mut S) -> io::Result<Option<KeyEvent>> {
        let b = self.next_byte(src)?;
        let key = match b {
            b'[' => return self.decode_csi(src),
            b'O' => return self.decode_ss3(src),
            DEL | BS => KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT),
            ESC => KeyEvent::plain(KeyCode::Esc),
            0x20..=0x7e => KeyEvent::alt(char::from(b)),
            _ => {
                // Lone Escape followed by an unrelated key.
                self.pending = Some(b);
                KeyEvent::plain(KeyCode::Esc)
            }
        };
        Ok(Some(key))
    }

    fn decode_csi<S: ByteSource + ?Sized>(&mut self, src: &mut S) -> io::Result<Option<KeyEvent>> {
        let mut params = String::new();
        let final_byte = loop {
            let b = self.next_byte(src)?;
            match b {
                0x20..=0x3f => {
                    if params.len() < CSI_PARAM_CAP {
                        params.push(char::from(b));
                    }
                }
                0x40..=0x7e => break b,
                _ => {
                    trace!(target: "input.decode", params_len = params.len(), "csi_interrupted");
                    self.pending = Some(b);
                    return Ok(None);
                }
            }
        };

        let mut fields = params.split(';');
        let first = fields.next().unwrap_or("");
        let mods = fields
            .next()
            .and_then(|m| m.parse::<u8>().ok())
            .map(xterm_modifiers)
            .unwrap_or_else(KeyModifiers::empty);

        let code = match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'Z' => KeyCode::BackTab,
            b'~' => match first {
                "1" | "7" => KeyCode::Home,
                "3" => KeyCode::Delete,
                "4" | "8" => KeyCode::End,
                _ => {
                    trace!(target: "input.decode", params_len = params.len(), "csi_tilde_unrecognized");
                    return Ok(None);
                }
            },
            other => {
                trace!(target: "input.decode", final_byte = other, params_len = params.len(), "csi_unrecognized");
                return Ok(None);
            }
        };
        Ok(Some(KeyEvent::new(code, mods)))
    }

    fn decode_ss3<S: ByteSource + ?Sized>(&mut self, src: &mut S) -> io::Result<Option<KeyEvent>> {
        let b = self.next_byte(src)?;
        let code = match b {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            0x40..=0x7e => {
                trace!(target: "input.decode", final_byte = b, "ss3_unrecognized");
                return Ok(None);
            }
            _ => {
                self.pending = Some(b);
                return Ok(None);
            }
        };
        Ok(Some(KeyEvent::plain(code)))
    }

    fn decode_utf8<S: ByteSource + ?Sized>(
        &mut self,
        lead: u8,
        src: &mut S,
    ) -> io::Result<Option<KeyEvent>> {
        let len = match lead {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => {
                trace!(target: "input.decode", byte = lead, "utf8_invalid_lead");
                return Ok(None);
            }
        };
        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(len).skip(1) {
            let b = self.next_byte(src)?;
            if !(0x80..=0xbf).contains(&b) {
                trace!(target: "input.decode", "utf8_truncated");
                self.pending = Some(b);
                return Ok(None);
            }
            *slot = b;
        }
        match std::str::from_utf8(&bytes[..len]) {
            Ok(s) => Ok(s.chars().next().map(KeyEvent::char)),
            Err(_) => {
                trace!(target: "input.decode", "utf8_malformed");
                Ok(None)
            }
        }
    }
}

/// xterm encodes modifiers as `1 + bits` with shift=1, alt=2, ctrl=4.
fn xterm_modifiers(param: u8) -> KeyModifiers {
    let bits = param.saturating_sub(1);
    let mut mods = KeyModifiers::empty();
    if bits & 1 != 0 {
        mods |= KeyModifiers::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= KeyModifiers::ALT;
    }
    if bits & 4 != 0 {
        mods |= KeyModifiers::CTRL;
    }
    mods
}

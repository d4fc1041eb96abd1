//! Transaction scripts
//!
//! A script holds one chip-select frame per line. `#` starts a comment.
//! Tokens are separated by whitespace:
//!
//! - `06`, `0x02`, `001000`: bytes to send, two hex digits each
//! - `rN`: clock N bytes and capture what the device returns
//! - `wN`: clock N dummy units
//! - `xN`: switch to N data lines (1, 2 or 4)
//!
//! While the device is in a data phase, bytes are split into units of the
//! current width. Opcode and parameter bytes are always clocked whole.
//!
//! ```text
//! 06                      # write enable
//! 02 001000 deadbeef      # page program
//! 0b 001000 w1 r4         # fast read
//! 6b 001000 w1 x4 r4      # quad output read
//! ```

use spinor_core::backing::Backing;
use spinor_core::flash::Flash;

use crate::error::{AppError, Result};

/// One element of a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bytes to send
    Send(Vec<u8>),
    /// Bytes to capture
    Recv(usize),
    /// Dummy units to clock
    Dummy(u32),
    /// New number of data lines
    Width(u8),
}

/// One chip-select frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 1-based source line
    pub line: usize,
    pub tokens: Vec<Token>,
}

/// Parse a whole script, skipping blank and comment-only lines
pub fn parse(text: &str) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("");
        let tokens = content
            .split_whitespace()
            .map(parse_token)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|message| AppError::Script { line, message })?;
        if !tokens.is_empty() {
            frames.push(Frame { line, tokens });
        }
    }
    Ok(frames)
}

fn parse_token(tok: &str) -> std::result::Result<Token, String> {
    let count = |rest: &str| {
        rest.parse::<u32>()
            .map_err(|_| format!("bad count in `{}`", tok))
    };

    if let Some(rest) = tok.strip_prefix('r') {
        return Ok(Token::Recv(count(rest)? as usize));
    }
    if let Some(rest) = tok.strip_prefix('w') {
        return Ok(Token::Dummy(count(rest)?));
    }
    if let Some(rest) = tok.strip_prefix('x') {
        return match count(rest)? {
            n @ (1 | 2 | 4) => Ok(Token::Width(n as u8)),
            n => Err(format!("unsupported bus width {}", n)),
        };
    }

    let hex = tok
        .strip_prefix("0x")
        .or_else(|| tok.strip_prefix("0X"))
        .unwrap_or(tok);
    if hex.is_empty() || hex.len() % 2 != 0 {
        return Err(format!("`{}` is not a whole number of hex bytes", tok));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hex in `{}`", tok))
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Token::Send)
}

/// Width in bits of one unit at `lines` data lines
fn unit_bits(lines: u8) -> u8 {
    if lines == 1 {
        8
    } else {
        lines
    }
}

fn send_byte<B: Backing>(flash: &mut Flash<'_, B>, byte: u8, lines: u8) {
    let bits = unit_bits(lines);
    if bits == 8 || !flash.state().is_data_phase() {
        flash.transfer(byte, 8);
        return;
    }
    let mask = (1u8 << bits) - 1;
    let mut shift = 8;
    while shift > 0 {
        shift -= bits;
        flash.transfer((byte >> shift) & mask, bits);
    }
}

fn recv_byte<B: Backing>(flash: &mut Flash<'_, B>, lines: u8) -> u8 {
    let bits = unit_bits(lines);
    if bits == 8 || !flash.state().is_data_phase() {
        return flash.transfer(0, 8);
    }
    let mut byte = 0u8;
    for _ in 0..8 / bits {
        byte = (byte << bits) | flash.transfer(0, bits);
    }
    byte
}

/// Clock one frame into the device and return the captured bytes
pub fn play<B: Backing>(flash: &mut Flash<'_, B>, frame: &Frame) -> Vec<u8> {
    let mut lines = 1;
    let mut received = Vec::new();

    flash.set_bus_width(1);
    flash.select(true);
    for token in &frame.tokens {
        match token {
            Token::Send(bytes) => {
                for &byte in bytes {
                    send_byte(flash, byte, lines);
                }
            }
            Token::Recv(n) => {
                for _ in 0..*n {
                    received.push(recv_byte(flash, lines));
                }
            }
            Token::Dummy(n) => {
                for _ in 0..*n {
                    flash.transfer(0, unit_bits(lines));
                }
            }
            Token::Width(n) => {
                flash.set_bus_width(*n);
                lines = *n;
            }
        }
    }
    flash.select(false);
    flash.set_bus_width(1);
    received
}

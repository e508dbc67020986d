//! Tokenized MSX BASIC program detokenizer.
//!
//! A saved program is the signature byte `FF` followed by linked lines:
//!
//! ```text
//! link(2) line-number(2) tokens... 00
//! ```
//!
//! A zero link (two zero bytes where the next line would start) ends the
//! program. Keywords are single bytes from 0x81, functions are `FF`-escaped,
//! and numeric constants are stored in binary after a type byte.

use super::bcd::{format_bcd, Precision};
use super::{check_signature, DecodeConfig, Decoder};
use crate::error::DecodeError;
use crate::format::{Format, BASIC_SIGNATURE};
use crate::models::DecodeResult;

/// Keywords and operators, indexed by `token - 0x81`.
pub const TOKENS: &[&str] = &[
    "END", "FOR", "NEXT", "DATA", "INPUT", "DIM", "READ", "LET", "GOTO", "RUN", "IF", "RESTORE",
    "GOSUB", "RETURN", "REM", "STOP", "PRINT", "CLEAR", "LIST", "NEW", "ON", "WAIT", "DEF", "POKE",
    "CONT", "CSAVE", "CLOAD", "OUT", "LPRINT", "LLIST", "CLS", "WIDTH", "ELSE", "TRON", "TROFF",
    "SWAP", "ERASE", "ERROR", "RESUME", "DELETE", "AUTO", "RENUM", "DEFSTR", "DEFINT", "DEFSNG",
    "DEFDBL", "LINE", "OPEN", "FIELD", "GET", "PUT", "CLOSE", "LOAD", "MERGE", "FILES", "LSET",
    "RSET", "SAVE", "LFILES", "CIRCLE", "COLOR", "DRAW", "PAINT", "BEEP", "PLAY", "PSET", "PRESET",
    "SOUND", "SCREEN", "VPOKE", "SPRITE", "VDP", "BASE", "CALL", "TIME", "KEY", "MAX", "MOTOR",
    "BLOAD", "BSAVE", "DSKO$", "SET", "NAME", "KILL", "IPL", "COPY", "CMD", "LOCATE", "TO", "THEN",
    "TAB(", "STEP", "USR", "FN", "SPC(", "NOT", "ERL", "ERR", "STRING$", "USING", "INSTR", "'",
    "VARPTR", "CSRLIN", "ATTR$", "DSKI$", "OFF", "INKEY$", "POINT", ">", "=", "<", "+", "-", "*",
    "/", "^", "AND", "OR", "XOR", "EQV", "IMP", "MOD", "\\",
];

/// Functions following the `FF` escape, indexed by `token - 0x81`.
pub const EXTENDED_TOKENS: &[&str] = &[
    "LEFT$", "RIGHT$", "MID$", "SGN", "INT", "ABS", "SQR", "RND", "SIN", "LOG", "EXP", "COS", "TAN",
    "ATN", "FRE", "INP", "POS", "LEN", "STR$", "VAL", "ASC", "CHR$", "PEEK", "VPEEK", "SPACE$",
    "OCT$", "HEX$", "LPOS", "BIN$", "CINT", "CSNG", "CDBL", "FIX", "STICK", "STRIG", "PDL", "PAD",
    "DSKF", "FPOS", "CVI", "CVS", "CVD", "EOF", "LOC", "LOF", "MKI$", "MKS$", "MKD$",
];

const TOKEN_BASE: u8 = 0x81;

const OCTAL: u8 = 0x0B;
const HEX: u8 = 0x0C;
const LINE_NUMBER: u8 = 0x0E;
const BYTE: u8 = 0x0F;
const INTEGER: u8 = 0x1C;
const SINGLE: u8 = 0x1D;
const DOUBLE: u8 = 0x1F;
const COLON: u8 = 0x3A;
const QUOTE: u8 = 0x22;
const REM: u8 = 0x8F;
const ELSE: u8 = 0xA1;
const ESCAPE: u8 = 0xFF;

/// Look up a dictionary entry, degrading misses to `-N-`.
fn token_text(table: &[&str], token: u8) -> String {
    token
        .checked_sub(TOKEN_BASE)
        .and_then(|index| table.get(index as usize))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("-{}-", token))
}

struct Detokenizer<'a> {
    data: &'a [u8],
    pos: usize,
    out: String,
}

impl<'a> Detokenizer<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 1, out: String::new() }
    }

    /// The `len` operand bytes following the type byte at `pos`.
    fn operand(&self, len: usize) -> Result<&'a [u8], DecodeError> {
        let start = self.pos + 1;
        self.data.get(start..start + len).ok_or_else(|| {
            DecodeError::truncated(
                Format::Bas,
                "numeric constant",
                len,
                self.data.len().saturating_sub(start),
            )
        })
    }

    fn word_operand(&self) -> Result<u16, DecodeError> {
        let bytes = self.operand(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.data.get(self.pos + ahead).copied()
    }

    fn run(mut self) -> Result<String, DecodeError> {
        while self.pos + 4 <= self.data.len() {
            let number = u16::from_le_bytes([self.data[self.pos + 2], self.data[self.pos + 3]]);
            self.pos += 4;
            self.out.push_str(&format!("{} ", number));

            self.line()?;

            if self.peek(0) == Some(0) {
                self.out.push('\n');
                self.pos += 1;
            }
            if self.peek(0) == Some(0) && self.peek(1) == Some(0) {
                break;
            }
        }
        Ok(self.out)
    }

    /// Tokens up to, not including, the terminating zero.
    fn line(&mut self) -> Result<(), DecodeError> {
        while let Some(token) = self.peek(0).filter(|&b| b != 0) {
            match token {
                LINE_NUMBER | INTEGER => {
                    let value = self.word_operand()?;
                    self.out.push_str(&value.to_string());
                    self.pos += 2;
                }
                BYTE => {
                    let value = self.operand(1)?[0];
                    self.out.push_str(&value.to_string());
                    self.pos += 1;
                }
                OCTAL => {
                    let value = self.word_operand()?;
                    self.out.push_str(&format!("&O{:o}", value));
                    self.pos += 2;
                }
                HEX => {
                    let value = self.word_operand()?;
                    self.out.push_str(&format!("&H{:X}", value));
                    self.pos += 2;
                }
                SINGLE => {
                    let bytes = self.operand(Precision::Single.byte_len())?;
                    self.out.push_str(&format_bcd(bytes, Precision::Single));
                    self.pos += bytes.len();
                }
                DOUBLE => {
                    let bytes = self.operand(Precision::Double.byte_len())?;
                    self.out.push_str(&format_bcd(bytes, Precision::Double));
                    self.pos += bytes.len();
                }
                COLON => match self.peek(1) {
                    // `'` is stored as :REM followed by the apostrophe token
                    Some(REM) => self.pos += 1,
                    // ELSE carries an implicit colon
                    Some(ELSE) => {}
                    _ => self.out.push(':'),
                },
                ESCAPE => match self.peek(1).filter(|&b| b != 0) {
                    Some(function) => {
                        self.pos += 1;
                        self.out.push_str(&token_text(EXTENDED_TOKENS, function));
                    }
                    // Escape with nothing after it: the zero still ends the line
                    None => self.out.push_str(&token_text(EXTENDED_TOKENS, 0)),
                },
                QUOTE => self.string(),
                0x80..=0xFE => self.out.push_str(&token_text(TOKENS, token)),
                32..=127 => self.out.push(char::from(token)),
                17..=26 => self.out.push(char::from(b'0' + token - 17)),
                _ => {}
            }
            self.pos += 1;
        }
        Ok(())
    }

    /// Copy a string literal through its closing quote.
    ///
    /// An unterminated literal stops before the line's zero byte so the line
    /// still ends normally. Leaves `pos` on the last byte copied.
    fn string(&mut self) {
        self.out.push('"');
        while let Some(next) = self.peek(1).filter(|&b| b != 0) {
            self.pos += 1;
            self.out.push(char::from(next));
            if next == QUOTE {
                break;
            }
        }
    }
}

/// Detokenize a saved MSX BASIC program into its listing.
pub fn detokenize(data: &[u8]) -> Result<String, DecodeError> {
    check_signature(data, Format::Bas, BASIC_SIGNATURE)?;
    Detokenizer::new(data).run()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicDecoder;

impl Decoder for BasicDecoder {
    fn decode(&self, data: &[u8], config: &DecodeConfig) -> Result<DecodeResult, DecodeError> {
        let text = detokenize(data)?;
        if config.verbose {
            eprintln!("BAS: {} lines", text.lines().count());
        }
        Ok(DecodeResult::Text(text))
    }
}

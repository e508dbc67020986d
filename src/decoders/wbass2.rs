//! WBASS2 assembler source detokenizer.
//!
//! A WBASS2 file is the signature `FD`, a run of length-prefixed line records
//! closed by `FF`, and then the label table: 8-byte slots holding up to six
//! characters each.
//!
//! Record length byte: bit 7 marks a label definition, bits 0-6 count the
//! bytes that follow. A zero length is an empty line. Inside a record:
//!
//! ```text
//! [label index (2)]  lead byte  operand tokens...
//! ```
//!
//! Listings are laid out in columns: mnemonics at 8, operands at 14 and
//! trailing comments at 30.

use super::{check_signature, DecodeConfig, Decoder};
use crate::error::DecodeError;
use crate::format::{Format, WBASS2_SIGNATURE};
use crate::models::DecodeResult;

pub const INSTRUCTIONS: &[&str] = &[
    "LD", "JR", "DJNZ", "CALL", "RET", "JP", "INC", "DEC", "PUSH", "POP", "RST", "IN", "OUT", "IM",
    "EX", "ADD", "ADC", "SUB", "SBC", "AND", "XOR", "OR", "CP", "RLC", "RRC", "RL", "RR", "SLA",
    "SRA", "???", "SRL", "BIT", "RES", "SET", "CPD", "CPDR", "CPI", "CPIR", "IND", "INDR", "INI",
    "INIR", "LDD", "LDDR", "LDI", "LDIR", "OUTD", "OTDR", "OUTI", "OTIR", "NEG", "RETI", "RETN",
    "RLD", "RRD", "CCF", "CPL", "DAA", "DI", "EI", "EXX", "HALT", "NOP", "RLA", "RLCA", "RRA",
    "RRCA", "SCF", "ORG", "EQU", "END", "DB", "DW", "DS", "DM", "DEFB", "DEFW", "DEFS", "DEFM",
    "GLOBAL", "INCLUDE",
];

pub const REGISTERS: &[&str] =
    &["A", "B", "C", "D", "E", "H", "L", "I", "R", "BC", "DE", "HL", "SP", "IX", "IY", "AF"];

pub const CONDITIONS: &[&str] = &["NZ", "Z", "NC", "C", "PO", "PE", "P", "M", "$"];

pub const LOGICAL_OPERATORS: &[&str] = &["AND", "XOR", "OR", "MOD"];

/// Punctuation, indexed by `token / 2 - 1`.
pub const PUNCTUATION: &[&str] = &[",", ")", "(", "+", "-", "*", "/", "^"];

const END_OF_LISTING: u8 = 0xFF;
const LABEL_FLAG: u8 = 0x80;
const LENGTH_MASK: u8 = 0x7F;
const LABEL_SLOT: usize = 8;
const LABEL_LEN: usize = 6;

const COMMENT: u8 = 1;
const QUOTE: u8 = 34;
const LABEL_REF: u8 = 0xC0;
const DECIMAL: u8 = 0xE0;
const HEXADECIMAL: u8 = 0xE1;
const BINARY: u8 = 0xE2;

const MNEMONIC_COLUMN: usize = 8;
const OPERAND_COLUMN: usize = 14;
const COMMENT_COLUMN: usize = 30;

/// Offset of the label table: the byte after the end-of-listing marker.
pub fn find_label_table(data: &[u8]) -> Result<usize, DecodeError> {
    let mut i = 1;
    while let Some(&length) = data.get(i) {
        if length == END_OF_LISTING {
            return Ok(i + 1);
        }
        i += (length & LENGTH_MASK) as usize + 1;
    }
    Err(DecodeError::CorruptLabelTable)
}

/// Render a numeric operand in its stored radix.
pub fn format_number(kind: u8, value: u16) -> String {
    match kind {
        HEXADECIMAL if value > 256 => format!("&H{:04X}", value),
        HEXADECIMAL => format!("&H{:02X}", value),
        BINARY if value <= 256 => format!("&B{:08b}", value),
        BINARY => format!("&B{:016b}", value),
        _ => value.to_string(),
    }
}

fn lookup(table: &[&str], index: usize, token: u8) -> String {
    table.get(index).map(|s| s.to_string()).unwrap_or_else(|| format!("-{}-", token))
}

/// Operand keyword for a token of 0x80 and up.
fn operand_keyword(token: u8) -> String {
    match token {
        153.. => lookup(LOGICAL_OPERATORS, (token - 153) as usize, token),
        144..=152 => lookup(CONDITIONS, (token - 144) as usize, token),
        _ => lookup(REGISTERS, token.wrapping_sub(128) as usize, token),
    }
}

/// A line of listing text with its column position.
#[derive(Debug, Default)]
struct Line {
    text: String,
    column: usize,
}

impl Line {
    fn push(&mut self, c: char) {
        self.text.push(c);
        self.column += 1;
    }

    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.column += s.chars().count();
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(char::from(b));
        }
    }

    fn pad_to(&mut self, column: usize) {
        while self.column < column {
            self.push(' ');
        }
    }

    fn is_empty(&self) -> bool {
        self.column == 0
    }
}

/// Reads one line record against the label table.
struct Record<'a> {
    data: &'a [u8],
    labels: usize,
    pos: usize,
    end: usize,
}

impl<'a> Record<'a> {
    fn remaining(&self) -> usize {
        self.end - self.pos
    }

    fn truncated(&self, needed: usize) -> DecodeError {
        DecodeError::truncated(Format::Wb2, "line record", needed, self.remaining())
    }

    fn byte(&mut self) -> Result<u8, DecodeError> {
        if self.pos >= self.end {
            return Err(self.truncated(1));
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn word(&mut self) -> Result<u16, DecodeError> {
        if self.remaining() < 2 {
            return Err(self.truncated(2));
        }
        let value = u16::from_le_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..self.end];
        self.pos = self.end;
        bytes
    }

    /// Name stored in label slot `index`.
    fn label(&self, index: u16) -> Result<String, DecodeError> {
        let slot = self.labels + LABEL_SLOT * index as usize;
        let mut name = String::new();
        for i in slot..slot + LABEL_LEN {
            let b = match self.data.get(i) {
                Some(&b) => b & 0x7F,
                None => {
                    return Err(DecodeError::truncated(
                        Format::Wb2,
                        "label table",
                        slot + LABEL_LEN,
                        self.data.len(),
                    ))
                }
            };
            if b == 0 {
                break;
            }
            name.push(char::from(b));
        }
        Ok(name)
    }

    fn parse(mut self, length: u8) -> Result<String, DecodeError> {
        let mut line = Line::default();

        if length & LABEL_FLAG != 0 {
            let index = self.word()?;
            line.push_str(&self.label(index)?);
            line.push(':');
            if self.remaining() == 0 {
                line.push('\n');
                return Ok(line.text);
            }
        }

        let lead = self.byte()?;
        if lead == COMMENT {
            if !line.is_empty() {
                line.pad_to(MNEMONIC_COLUMN);
            }
            line.push(';');
            line.push_bytes(self.rest());
        } else if lead >= 0x80 {
            line.pad_to(MNEMONIC_COLUMN);
            line.push_str(&lookup(INSTRUCTIONS, (lead - 0x80) as usize, lead));
            if self.remaining() > 0 {
                line.pad_to(OPERAND_COLUMN);
            }
        }

        let mut need_space = false;
        while self.remaining() > 0 {
            let token = self.byte()?;
            match token {
                COMMENT => {
                    if line.column > OPERAND_COLUMN {
                        line.push(' ');
                        line.pad_to(COMMENT_COLUMN);
                    }
                    line.push(';');
                    line.push_bytes(self.rest());
                }
                2..=27 => {
                    line.push_str(&lookup(PUNCTUATION, (token / 2 - 1) as usize, token));
                    need_space = false;
                }
                QUOTE => {
                    let body = &self.data[self.pos..self.end];
                    // Without a closing quote the opening one is dropped.
                    if let Some(close) = body.iter().position(|&b| b == QUOTE) {
                        line.push('"');
                        line.push_bytes(&body[..=close]);
                        self.pos += close + 1;
                    }
                }
                LABEL_REF => {
                    let index = self.word()?;
                    line.push_str(&self.label(index)?);
                }
                DECIMAL | HEXADECIMAL | BINARY => {
                    if need_space {
                        line.push(' ');
                    }
                    let value = self.word()?;
                    line.push_str(&format_number(token, value));
                    need_space = true;
                }
                0x80.. => {
                    if need_space {
                        line.push(' ');
                    }
                    line.push_str(&operand_keyword(token));
                    need_space = true;
                }
                _ => {}
            }
        }

        line.push('\n');
        Ok(line.text)
    }
}

/// Detokenize a WBASS2 source file into its listing.
pub fn detokenize(data: &[u8]) -> Result<String, DecodeError> {
    check_signature(data, Format::Wb2, WBASS2_SIGNATURE)?;
    let labels = find_label_table(data)?;

    let mut out = String::new();
    let mut pos = 1;
    while let Some(&length) = data.get(pos) {
        pos += 1;
        match length {
            END_OF_LISTING => break,
            0 => out.push('\n'),
            _ => {
                let end = pos + (length & LENGTH_MASK) as usize;
                if end > data.len() {
                    return Err(DecodeError::truncated(
                        Format::Wb2,
                        "line record",
                        end - pos,
                        data.len() - pos,
                    ));
                }
                out.push_str(&Record { data, labels, pos, end }.parse(length)?);
                pos = end;
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Wbass2Decoder;

impl Decoder for Wbass2Decoder {
    fn decode(&self, data: &[u8], config: &DecodeConfig) -> Result<DecodeResult, DecodeError> {
        let text = detokenize(data)?;
        if config.verbose {
            eprintln!("WB2: {} lines", text.lines().count());
        }
        Ok(DecodeResult::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parse the record whose length byte sits at `at`.
    fn parse_record(data: &[u8], at: usize, labels: usize) -> Result<String, DecodeError> {
        let length = data[at];
        let pos = at + 1;
        let end = pos + (length & LENGTH_MASK) as usize;
        Record { data, labels, pos, end }.parse(length)
    }

    #[test]
    fn test_label_only_line() {
        let data = [
            0xFD, 0x82, 0x00, 0x00, 0xFF, b'T', b'E', b'S', b'T', 0x00, 0x00, 0x00, 0x00, 0xFF,
        ];
        assert_eq!(parse_record(&data, 1, 5).unwrap(), "TEST:\n");
    }

    #[test]
    fn test_label_and_instruction() {
        let data = [
            0xFD, 0x88, 0x00, 0x00, 0x80, 0x80, 0x02, 0xE0, 0x01, 0x00, 0xFF, b'T', b'E', b'S',
            b'T', 0x00, 0x00, 0x00, 0x00, 0xFF,
        ];
        assert_eq!(parse_record(&data, 1, 11).unwrap(), "TEST:   LD    A,1\n");
    }

    #[test]
    fn test_comment_line() {
        let data = [0x05, 0x01, b'T', b'e', b's', b't', 0xFF];
        assert_eq!(parse_record(&data, 0, 0).unwrap(), ";Test\n");
    }

    #[test]
    fn test_instruction_line() {
        let data = [0x06, 0x80, 0x80, 0x02, 0xE0, 0x01, 0x00];
        assert_eq!(parse_record(&data, 0, 0).unwrap(), "        LD    A,1\n");
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(format_number(DECIMAL, 123), "123");
        assert_eq!(format_number(HEXADECIMAL, 0x1A), "&H1A");
        assert_eq!(format_number(HEXADECIMAL, 0xBEEF), "&HBEEF");
        assert_eq!(format_number(HEXADECIMAL, 256), "&H100");
        assert_eq!(format_number(BINARY, 0b1010), "&B00001010");
        assert_eq!(format_number(BINARY, 0xAAAA), "&B1010101010101010");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(detokenize(&[]), Err(DecodeError::InvalidSignature { found: None, .. })));
    }

    #[test]
    fn test_invalid_signature() {
        assert!(matches!(
            detokenize(&[0x00]),
            Err(DecodeError::InvalidSignature { format: Format::Wb2, found: Some(0x00), .. })
        ));
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(detokenize(&[0xFD, 0xFF, 0xFF]).unwrap(), "");
    }

    #[test]
    fn test_full_listing() {
        let data = [
            0xFD, 0x06, 0x80, 0x80, 0x02, 0xE0, 0x01, 0x00, 0xFF, 0xFF,
        ];
        assert_eq!(detokenize(&data).unwrap(), "        LD    A,1\n");
    }

    #[test]
    fn test_missing_end_marker() {
        assert_eq!(detokenize(&[0xFD, 0x03, 0x80, 0x80]), Err(DecodeError::CorruptLabelTable));
    }

    #[test]
    fn test_empty_lines_and_labels() {
        // START: / (blank) / JP START ;loop
        let data = [
            0xFD, 0x82, 0x00, 0x00, 0x00, 0x09, 0x85, 0xC0, 0x00, 0x00, 0x01, b'l', b'o', b'o', b'p',
            0xFF, b'S', b'T', b'A', b'R', b'T', 0x00, 0x00, 0x00,
        ];
        let expected = format!("START:\n\n{:<30};loop\n", "        JP    START");
        assert_eq!(detokenize(&data).unwrap(), expected);
    }

    #[test]
    fn test_trailing_comment_column() {
        // LD HL,&H1234 ;x
        let data = [
            0xFD, 0x08, 0x80, 0x8B, 0x02, 0xE1, 0x34, 0x12, 0x01, b'x', 0xFF,
        ];
        let expected = format!("{:<8}{:<6}{:<16};x\n", "", "LD", "HL,&H1234");
        assert_eq!(detokenize(&data).unwrap(), expected);
    }

    #[test]
    fn test_conditions_and_operators() {
        // JR NZ,5 AND 3
        let data = [
            0xFD, 0x0A, 0x81, 0x90, 0x02, 0xE0, 0x05, 0x00, 0x99, 0xE0, 0x03, 0x00, 0xFF,
        ];
        assert_eq!(detokenize(&data).unwrap(), "        JR    NZ,5 AND 3\n");
    }

    #[test]
    fn test_quoted_string() {
        let data = [0xFD, 0x06, 0xC7, 0x22, b'H', b'i', b'"', 0x9F, 0xFF];
        // DB "Hi" followed by an unknown operand token
        assert_eq!(detokenize(&data).unwrap(), "        DB    \"Hi\"-159-\n");
    }

    #[test]
    fn test_unterminated_quote_is_dropped() {
        let data = [0xFD, 0x03, 0xC7, 0x22, 0x80, 0xFF];
        assert_eq!(detokenize(&data).unwrap(), "        DB    A\n");
    }

    #[test]
    fn test_unknown_tokens_degrade() {
        assert_eq!(operand_keyword(0xD0), "-208-");
        assert_eq!(lookup(PUNCTUATION, (20 / 2 - 1) as usize, 20), "-20-");
        let data = [0xFD, 0x01, 0xF0, 0xFF];
        assert_eq!(detokenize(&data).unwrap(), "        -240-\n");
    }

    #[test]
    fn test_oversized_record_hides_marker() {
        let data = [0xFD, 0x08, 0x80, 0xFF];
        // The marker walk skips the oversized record and never finds 0xFF
        assert_eq!(detokenize(&data), Err(DecodeError::CorruptLabelTable));
    }

    #[test]
    fn test_label_slot_out_of_range() {
        let data = [0xFD, 0x82, 0x05, 0x00, 0xFF, b'A', 0x00];
        assert!(matches!(
            detokenize(&data),
            Err(DecodeError::TruncatedPayload { format: Format::Wb2, section: "label table", .. })
        ));
    }

    #[test]
    fn test_operand_past_record() {
        // 0xE0 needs two bytes but the record ends after one
        let data = [0xFD, 0x03, 0x80, 0xE0, 0x01, 0xFF];
        assert!(matches!(detokenize(&data), Err(DecodeError::TruncatedPayload { .. })));
    }

    #[test]
    fn test_six_character_label() {
        let data = [
            0xFD, 0x83, 0x00, 0x00, 0xBE, 0xFF, b'L', b'O', b'N', b'G', b'N', b'M', 0x00, 0x00,
        ];
        assert_eq!(detokenize(&data).unwrap(), "LONGNM: NOP\n");
    }
}

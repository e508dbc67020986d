//! MSX BASIC binary-coded-decimal floating point literals.
//!
//! A literal is one exponent byte followed by packed decimal mantissa digits:
//!
//! ```text
//! byte 0    bit 7 = sign, bits 0-6 = exponent + 64
//! byte 1..  two decimal digits per byte, most significant first
//! ```
//!
//! The value is `0.MMMMMM * 10^exponent`. Single precision carries 3 mantissa
//! bytes (6 digits), double precision 7 (14 digits).

/// Width of a BCD literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 4 bytes, `!` type marker, `E` exponent
    Single,
    /// 8 bytes, `#` type marker, `D` exponent
    Double,
}

impl Precision {
    /// Encoded size including the exponent byte.
    pub fn byte_len(self) -> usize {
        match self {
            Precision::Single => 4,
            Precision::Double => 8,
        }
    }

    fn marker(self) -> char {
        match self {
            Precision::Single => '!',
            Precision::Double => '#',
        }
    }

    fn exponent_letter(self) -> char {
        match self {
            Precision::Single => 'E',
            Precision::Double => 'D',
        }
    }
}

/// Signed decimal exponent of a BCD exponent byte.
pub fn bcd_exponent(byte: u8) -> i32 {
    i32::from(byte & 0x7F) - 64
}

/// Drop trailing zeros, then a dangling decimal point.
pub fn trim_trailing_zeros(number: &str) -> &str {
    let trimmed = number.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}

/// Move the decimal point `shift` digits into the mantissa.
///
/// When the mantissa is too short the value is a whole number: it is padded
/// with zeros and tagged with the type marker instead.
fn shift_point_right(mantissa: &str, shift: usize, marker: char) -> String {
    if mantissa.len() <= shift {
        format!("{}{}{}", mantissa, "0".repeat(shift - mantissa.len()), marker)
    } else {
        format!("{}.{}", &mantissa[..shift], &mantissa[shift..])
    }
}

/// Render a BCD literal as MSX BASIC would list it.
///
/// `bytes` must hold exactly `precision.byte_len()` bytes; anything else renders
/// as an empty string.
pub fn format_bcd(bytes: &[u8], precision: Precision) -> String {
    if bytes.len() != precision.byte_len() {
        return String::new();
    }

    let sign = if bytes[0] & 0x80 != 0 { "-" } else { "" };
    let exponent = bcd_exponent(bytes[0]);
    let mantissa: String = bytes[1..].iter().map(|b| format!("{:02X}", b)).collect();
    let scientific = format!("{}.{}", &mantissa[..1], &mantissa[1..]);
    let scientific = trim_trailing_zeros(&scientific);
    let letter = precision.exponent_letter();

    match exponent {
        -64 => format!("0{}", precision.marker()),
        -63..=-2 => format!("{}{}{}{:03}", sign, scientific, letter, exponent - 1),
        -1 => {
            let fraction = format!(".0{}", mantissa);
            format!("{}{}", sign, trim_trailing_zeros(&fraction))
        }
        0..=14 => {
            let shifted = shift_point_right(&mantissa, exponent as usize, precision.marker());
            format!("{}{}", sign, trim_trailing_zeros(&shifted))
        }
        15..=63 => format!("{}{}{}+{:02}", sign, scientific, letter, exponent - 1),
        _ => "XXX".to_string(),
    }
}

/// Render a 4-byte single precision literal.
pub fn format_single(bytes: &[u8]) -> String {
    format_bcd(bytes, Precision::Single)
}

/// Render an 8-byte double precision literal.
pub fn format_double(bytes: &[u8]) -> String {
    format_bcd(bytes, Precision::Double)
}

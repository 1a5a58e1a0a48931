//! ASCII conversion for text-driven programs.

/// Largest value treated as a character.
pub const ASCII_MAX: i64 = 127;

/// Encode text as one input value per byte.
pub fn encode(text: &str) -> Vec<i64> {
    text.bytes().map(i64::from).collect()
}

/// Encode each line followed by a newline.
pub fn encode_lines<'a, I>(lines: I) -> Vec<i64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut values = Vec::new();
    for line in lines {
        values.extend(encode(line));
        values.push(i64::from(b'\n'));
    }
    values
}

/// Output split into printable text and values outside the ASCII range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsciiOutput {
    pub text: String,
    /// Values above 127 (or negative), in output order.
    pub other: Vec<i64>,
}

impl AsciiOutput {
    /// The last out-of-range value; text programs usually report their
    /// answer this way.
    pub fn last_non_ascii(&self) -> Option<i64> {
        self.other.last().copied()
    }
}

pub fn decode(values: &[i64]) -> AsciiOutput {
    let mut out = AsciiOutput::default();
    for &value in values {
        match u8::try_from(value) {
            Ok(byte) if i64::from(byte) <= ASCII_MAX => out.text.push(char::from(byte)),
            _ => out.other.push(value),
        }
    }
    out
}

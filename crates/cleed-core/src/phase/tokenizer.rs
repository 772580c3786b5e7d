//! Scanners for the fixed-column phase-shift text format.
//!
//! Phase-shift rows come from FORTRAN `F` edit descriptors, so a negative
//! value is glued to the previous one (`0.1234-0.5678`). `PackedReals` walks
//! such a row with a cursor that treats both blanks and minus signs as
//! delimiters; a plain whitespace split would read `0.1234-0.5678` as one
//! token.

use tracing::debug;

/// scanf-like cursor over one line.
#[derive(Debug, Clone)]
pub struct ScanCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ScanCursor<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            bytes: line.as_bytes(),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.bytes.len()
    }

    pub fn skip_whitespace(&mut self) {
        while self
            .bytes
            .get(self.position)
            .is_some_and(|byte| byte.is_ascii_whitespace())
        {
            self.position += 1;
        }
    }

    /// `%d`: optional sign followed by at least one digit.
    pub fn scan_int(&mut self) -> Option<i64> {
        self.skip_whitespace();
        let start = self.position;
        let mut end = start;
        if matches!(self.bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let digits_start = end;
        end = skip_digits(self.bytes, end);
        if end == digits_start {
            return None;
        }

        let value = std::str::from_utf8(&self.bytes[start..end])
            .ok()?
            .parse::<i64>()
            .ok()?;
        self.position = end;
        Some(value)
    }

    /// `%le`, additionally accepting FORTRAN `D` exponents.
    pub fn scan_real(&mut self) -> Option<f64> {
        let (value, end) = self.peek_real()?;
        self.position = end;
        Some(value)
    }

    /// `%s`: the next run of non-whitespace characters.
    pub fn scan_word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let start = self.position;
        let mut end = start;
        while self
            .bytes
            .get(end)
            .is_some_and(|byte| !byte.is_ascii_whitespace())
        {
            end += 1;
        }
        if end == start {
            return None;
        }

        let word = std::str::from_utf8(&self.bytes[start..end]).ok()?;
        self.position = end;
        Some(word)
    }

    /// Reads a real at the cursor without moving it.
    fn peek_real(&self) -> Option<(f64, usize)> {
        let mut start = self.position;
        while self
            .bytes
            .get(start)
            .is_some_and(|byte| byte.is_ascii_whitespace())
        {
            start += 1;
        }

        let end = real_prefix_end(self.bytes, start)?;
        let normalized = std::str::from_utf8(&self.bytes[start..end])
            .ok()?
            .replace(['D', 'd'], "E");
        let value = normalized.parse::<f64>().ok()?;
        Some((value, end))
    }

    /// Legacy advance past one packed numeral: blanks and minus signs first,
    /// then everything up to the next blank or minus. A minus that belongs to
    /// an exponent (`1.0E-02`) stays with its numeral.
    fn skip_packed_numeral(&mut self) {
        while matches!(self.bytes.get(self.position), Some(b' ' | b'-')) {
            self.position += 1;
        }
        while let Some(&byte) = self.bytes.get(self.position) {
            if byte == b' ' || byte == b'-' {
                break;
            }
            if self.is_exponent_with_minus(self.position) {
                self.position += 2;
                continue;
            }
            self.position += 1;
        }
    }

    fn is_exponent_with_minus(&self, index: usize) -> bool {
        let marker = matches!(self.bytes.get(index), Some(b'e' | b'E' | b'd' | b'D'));
        let follows_mantissa = index > 0
            && self
                .bytes
                .get(index - 1)
                .is_some_and(|byte| byte.is_ascii_digit() || *byte == b'.');
        marker && follows_mantissa && self.bytes.get(index + 1) == Some(&b'-')
    }
}

/// Cursor over a row of packed reals.
#[derive(Debug, Clone)]
pub struct PackedReals<'a> {
    cursor: ScanCursor<'a>,
}

impl<'a> PackedReals<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            cursor: ScanCursor::new(line),
        }
    }

    /// Reads the value at the cursor, then advances past the numeral whether
    /// or not a value could be read.
    pub fn next_value(&mut self) -> Option<f64> {
        let value = self.cursor.peek_real().map(|(value, _)| value);
        self.cursor.skip_packed_numeral();
        value
    }
}

/// Reads exactly `count` packed reals from `line`. Slots with nothing
/// readable are filled with zero.
pub fn read_packed_reals(line: &str, count: usize) -> Vec<f64> {
    let mut reals = PackedReals::new(line);
    (0..count)
        .map(|slot| {
            reals.next_value().unwrap_or_else(|| {
                debug!(slot, line, "no phase shift readable in slot, storing 0");
                0.0
            })
        })
        .collect()
}

fn skip_digits(bytes: &[u8], mut index: usize) -> usize {
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        index += 1;
    }
    index
}

/// End of the longest `[+-]?(d+(.d*)?|.d+)([eEdD][+-]?d+)?` prefix at `start`.
fn real_prefix_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut index = start;
    if matches!(bytes.get(index), Some(b'+' | b'-')) {
        index += 1;
    }

    let integer_start = index;
    index = skip_digits(bytes, index);
    let mut mantissa_digits = index - integer_start;

    if bytes.get(index) == Some(&b'.') {
        let fraction_start = index + 1;
        let fraction_end = skip_digits(bytes, fraction_start);
        mantissa_digits += fraction_end - fraction_start;
        index = fraction_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(index), Some(b'e' | b'E' | b'd' | b'D')) {
        let mut exponent = index + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = skip_digits(bytes, exponent);
        if exponent_end > exponent {
            index = exponent_end;
        }
    }

    Some(index)
}

#[cfg(test)]
mod tests {
    use super::{PackedReals, ScanCursor, read_packed_reals};

    fn assert_reals(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (left, right) in actual.iter().zip(expected) {
            assert!((left - right).abs() < 1.0e-12, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn glued_negative_value_is_split_at_minus_sign() {
        assert_reals(&read_packed_reals("1.2345-2.3456", 2), &[1.2345, -2.3456]);
    }

    #[test]
    fn mixed_blank_and_minus_separators() {
        assert_reals(
            &read_packed_reals("  0.1000 -0.2000-0.3000  0.4000", 4),
            &[0.1, -0.2, -0.3, 0.4],
        );
        assert_reals(
            &read_packed_reals("-1.5000-2.5000-3.5000", 3),
            &[-1.5, -2.5, -3.5],
        );
    }

    // Departs from the legacy cursor walk, which cut `1.0E-02` at its
    // exponent minus and read `-02` as the next value.
    #[test]
    fn exponent_minus_stays_with_its_numeral() {
        assert_reals(
            &read_packed_reals("1.0E-02-3.5 2.0d-1", 3),
            &[0.01, -3.5, 0.2],
        );
    }

    #[test]
    fn short_row_pads_with_zero() {
        assert_reals(&read_packed_reals("0.5-0.25", 4), &[0.5, -0.25, 0.0, 0.0]);
        assert_reals(&read_packed_reals("", 2), &[0.0, 0.0]);
    }

    #[test]
    fn extra_values_are_ignored() {
        assert_reals(&read_packed_reals("0.1 0.2 0.3", 2), &[0.1, 0.2]);
    }

    #[test]
    fn packed_cursor_skips_unreadable_numerals() {
        let mut reals = PackedReals::new("abc 0.7");
        assert_eq!(reals.next_value(), None);
        assert_eq!(reals.next_value(), Some(0.7));
        assert_eq!(reals.next_value(), None);
    }

    #[test]
    fn scan_cursor_reads_header_fields() {
        let mut cursor = ScanCursor::new(" 40  8 eV  trailing");
        assert_eq!(cursor.scan_int(), Some(40));
        assert_eq!(cursor.scan_int(), Some(8));
        assert_eq!(cursor.scan_word(), Some("eV"));
        assert_eq!(cursor.scan_word(), Some("trailing"));
        assert_eq!(cursor.scan_word(), None);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn scan_int_stops_at_non_digit() {
        let mut cursor = ScanCursor::new("12abc");
        assert_eq!(cursor.scan_int(), Some(12));
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.scan_int(), None);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn scan_real_accepts_leading_prefix_only() {
        let mut cursor = ScanCursor::new("  3.25 eV");
        assert_eq!(cursor.scan_real(), Some(3.25));
        assert_eq!(ScanCursor::new("-.5x").scan_real(), Some(-0.5));
        assert_eq!(ScanCursor::new("1e").scan_real(), Some(1.0));
        assert_eq!(ScanCursor::new("-").scan_real(), None);
        assert_eq!(ScanCursor::new("energy").scan_real(), None);
    }
}

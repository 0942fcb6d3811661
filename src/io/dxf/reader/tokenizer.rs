//! DXF text to group code/value pairs

use crate::types::Handle;

/// A DXF code/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCodePair {
    /// The DXF group code
    pub code: i32,
    /// The value line with trailing whitespace removed
    pub value: String,
}

impl DxfCodePair {
    /// Create a new code/value pair
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    /// Whether this is a code 0 marker with the given name
    pub fn is_marker(&self, name: &str) -> bool {
        self.code == 0 && self.value.trim() == name
    }

    /// Get value as double
    pub fn as_double(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Get value as i32
    ///
    /// Integral reals such as `1.0` are accepted; some writers emit them.
    pub fn as_i32(&self) -> Option<i32> {
        let text = self.value.trim();
        text.parse::<i32>().ok().or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64)
                .map(|v| v as i32)
        })
    }

    /// Get value as i16
    pub fn as_i16(&self) -> Option<i16> {
        self.as_i32().and_then(|v| i16::try_from(v).ok())
    }

    /// Get value as i64
    pub fn as_i64(&self) -> Option<i64> {
        let text = self.value.trim();
        text.parse::<i64>()
            .ok()
            .or_else(|| self.as_i32().map(i64::from))
    }

    /// Get value as boolean (non-zero is true)
    pub fn as_bool(&self) -> Option<bool> {
        self.as_i32().map(|v| v != 0)
    }

    /// Get value as handle (hexadecimal)
    pub fn as_handle(&self) -> Option<Handle> {
        Handle::from_hex(&self.value)
    }
}

/// Split text into lines on `\r\n`, `\r` or `\n`
fn lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(pos) => {
                let skip = if current[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[pos + skip..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                if current.is_empty() {
                    None
                } else {
                    Some(current)
                }
            }
        }
    })
}

/// Lazily tokenize DXF text into code/value pairs in document order
///
/// Blank lines before a code line are skipped. A code line that is not an
/// integer drops that code/value pair only. A code line without a value
/// line ends the stream.
pub fn tokens(text: &str) -> impl Iterator<Item = DxfCodePair> + '_ {
    let mut iter = lines(text);
    std::iter::from_fn(move || loop {
        let code_line = iter.by_ref().find(|line| !line.trim().is_empty())?;
        let value_line = iter.next()?;
        match code_line.trim().parse::<i32>() {
            Ok(code) => return Some(DxfCodePair::new(code, value_line.trim_end())),
            Err(_) => tracing::trace!(line = code_line, "skipping non-numeric group code"),
        }
    })
}

/// Tokenize DXF text into code/value pairs, see [`tokens`]
pub fn tokenize(text: &str) -> Vec<DxfCodePair> {
    tokens(text).collect()
}

/// Replace `\U+XXXX` escapes with the characters they name
///
/// Escapes that do not name a valid character are left untouched.
pub fn decode_unicode_escapes(text: &str) -> String {
    if !text.contains("\\U+") && !text.contains("\\u+") {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(1..3)
            .filter(|prefix| prefix.eq_ignore_ascii_case("U+"))
            .and_then(|_| candidate.get(3..7))
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &candidate[7..];
            }
            None => {
                out.push('\\');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Cursor over a tokenized pair stream
///
/// Section and table readers advance it; `position` after a read is the index
/// just past the consumed terminator.
#[derive(Debug, Clone)]
pub struct PairReader<'a> {
    pairs: &'a [DxfCodePair],
    position: usize,
}

impl<'a> PairReader<'a> {
    /// Create a cursor at the start of `pairs`
    pub fn new(pairs: &'a [DxfCodePair]) -> Self {
        Self { pairs, position: 0 }
    }

    /// Create a cursor at `position`
    pub fn at(pairs: &'a [DxfCodePair], position: usize) -> Self {
        Self {
            pairs,
            position: position.min(pairs.len()),
        }
    }

    /// Index of the next pair to be read
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every pair has been consumed
    pub fn is_at_end(&self) -> bool {
        self.position >= self.pairs.len()
    }

    /// Read the next pair
    pub fn read_pair(&mut self) -> Option<&'a DxfCodePair> {
        let pair = self.pairs.get(self.position)?;
        self.position += 1;
        Some(pair)
    }

    /// Look at the next pair without consuming it
    pub fn peek(&self) -> Option<&'a DxfCodePair> {
        self.pairs.get(self.position)
    }

    /// Un-read the last pair
    pub fn push_back(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Consume pairs while `keep` holds, returning them
    pub fn read_while(&mut self, keep: impl Fn(&DxfCodePair) -> bool) -> &'a [DxfCodePair] {
        let start = self.position;
        let len = self.pairs[start..]
            .iter()
            .position(|p| !keep(p))
            .unwrap_or(self.pairs.len() - start);
        self.position = start + len;
        &self.pairs[start..self.position]
    }

    /// Consume the pairs up to the next code 0 pair, which is left unread
    pub fn read_run(&mut self) -> &'a [DxfCodePair] {
        self.read_while(|p| p.code != 0)
    }

    /// Advance past the next marker named `name`
    ///
    /// Returns `false` when the stream ended first.
    pub fn skip_past(&mut self, name: &str) -> bool {
        while let Some(pair) = self.read_pair() {
            if pair.is_marker(name) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_pairs() {
        let pairs = tokenize("  0\nSECTION\n  2\nHEADER\n");
        assert_eq!(
            pairs,
            vec![DxfCodePair::new(0, "SECTION"), DxfCodePair::new(2, "HEADER")]
        );
    }

    #[test]
    fn test_line_endings() {
        let expected = vec![DxfCodePair::new(0, "LINE"), DxfCodePair::new(8, "0")];
        assert_eq!(tokenize("0\r\nLINE\r\n8\r\n0\r\n"), expected);
        assert_eq!(tokenize("0\rLINE\r8\r0"), expected);
        assert_eq!(tokenize("0\nLINE\n8\n0"), expected);
    }

    #[test]
    fn test_blank_lines_skipped_before_code() {
        let pairs = tokenize("\n\n  0\nEOF\n\n");
        assert_eq!(pairs, vec![DxfCodePair::new(0, "EOF")]);
    }

    #[test]
    fn test_value_keeps_leading_whitespace() {
        let pairs = tokenize("1\n  hello  \n");
        assert_eq!(pairs[0].value, "  hello");
    }

    #[test]
    fn test_empty_value_line() {
        let pairs = tokenize("1\n\n0\nEOF\n");
        assert_eq!(
            pairs,
            vec![DxfCodePair::new(1, ""), DxfCodePair::new(0, "EOF")]
        );
    }

    #[test]
    fn test_non_numeric_code_skips_pair() {
        let pairs = tokenize("abc\nvalue\n0\nEOF\n");
        assert_eq!(pairs, vec![DxfCodePair::new(0, "EOF")]);
    }

    #[test]
    fn test_trailing_code_without_value() {
        let pairs = tokenize("0\nEOF\n999");
        assert_eq!(pairs, vec![DxfCodePair::new(0, "EOF")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(DxfCodePair::new(40, " 2.5").as_double(), Some(2.5));
        assert_eq!(DxfCodePair::new(70, "     1").as_i16(), Some(1));
        assert_eq!(DxfCodePair::new(70, "1.0").as_i32(), Some(1));
        assert_eq!(DxfCodePair::new(70, "x").as_i32(), None);
        assert_eq!(DxfCodePair::new(70, "70000").as_i16(), None);
        assert_eq!(DxfCodePair::new(290, "1").as_bool(), Some(true));
        assert_eq!(DxfCodePair::new(5, "1A").as_handle(), Some(Handle::new(26)));
        assert_eq!(DxfCodePair::new(40, "nan").as_double(), None);
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(decode_unicode_escapes("Caf\\U+00E9"), "Caf\u{e9}");
        assert_eq!(decode_unicode_escapes("\\U+2205 10"), "\u{2205} 10");
        assert_eq!(decode_unicode_escapes("\\U+ZZZZ"), "\\U+ZZZZ");
        assert_eq!(decode_unicode_escapes("a\\Pb"), "a\\Pb");
        assert_eq!(decode_unicode_escapes("end\\U+00"), "end\\U+00");
    }

    #[test]
    fn test_pair_reader() {
        let pairs = tokenize("0\nLINE\n8\nA\n10\n1\n0\nEOF\n");
        let mut reader = PairReader::new(&pairs);
        assert!(reader.read_pair().is_some_and(|p| p.is_marker("LINE")));
        let run = reader.read_run();
        assert_eq!(run.len(), 2);
        assert!(reader.peek().is_some_and(|p| p.is_marker("EOF")));
        assert!(reader.skip_past("EOF"));
        assert!(reader.is_at_end());
        assert_eq!(reader.position(), 4);
        reader.push_back();
        assert_eq!(reader.position(), 3);
    }
}

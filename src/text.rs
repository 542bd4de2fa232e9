//! Column measurement for terminal text.
//!
//! Every decoded code point costs one display column. Wide characters and
//! grapheme clusters are not special-cased.

/// Lazy UTF-8 decoder over raw bytes.
///
/// A lead byte is classified by its high bits as the start of a 1, 2, 3 or
/// 4 byte sequence. Bytes that cannot start a sequence are skipped one at a
/// time. A sequence cut short by the end of input ends the iteration.
#[derive(Debug, Clone)]
pub struct CodePoints<'a> {
    bytes: &'a [u8],
    pos: usize,
}

/// One decoded code point and the byte range it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePoint {
    pub offset: usize,
    pub len: usize,
    pub value: u32,
}

pub fn code_points(bytes: &[u8]) -> CodePoints<'_> {
    CodePoints { bytes, pos: 0 }
}

fn sequence_len(lead: u8) -> Option<usize> {
    if lead < 0x80 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

impl Iterator for CodePoints<'_> {
    type Item = CodePoint;

    fn next(&mut self) -> Option<CodePoint> {
        loop {
            let lead = *self.bytes.get(self.pos)?;
            let Some(len) = sequence_len(lead) else {
                self.pos += 1;
                continue;
            };
            let offset = self.pos;
            let seq = self.bytes.get(offset..offset + len)?;
            let value = match len {
                1 => lead as u32,
                _ => {
                    let head = (lead as u32) & (0x7F >> len);
                    seq[1..]
                        .iter()
                        .fold(head, |acc, b| (acc << 6) | (*b as u32 & 0x3F))
                }
            };
            self.pos += len;
            return Some(CodePoint { offset, len, value });
        }
    }
}

/// Display columns taken by `text`; `None` measures as zero.
pub fn display_width<'a>(text: impl Into<Option<&'a str>>) -> usize {
    text.into()
        .map(|s| byte_width(s.as_bytes()))
        .unwrap_or(0)
}

/// Display columns taken by possibly malformed UTF-8 bytes.
pub fn byte_width(bytes: &[u8]) -> usize {
    code_points(bytes).count()
}

/// Longest prefix of `text` that fits in `columns`.
pub fn truncate_to_width(text: &str, columns: usize) -> &str {
    match code_points(text.as_bytes()).nth(columns) {
        Some(cp) => &text[..cp.offset],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_length() {
        for s in ["", "a", "hello world", "Jan 05", "[1/12]"] {
            assert_eq!(display_width(s), s.len());
        }
    }

    #[test]
    fn multibyte_counts_code_points() {
        assert_eq!(display_width("Renée"), 5);
        assert_eq!(display_width("日本語"), 3);
        assert_eq!(display_width("a😀b"), 3);
        assert_eq!(display_width("ñandú €"), 7);
    }

    #[test]
    fn absent_is_zero() {
        assert_eq!(display_width(None), 0);
    }

    #[test]
    fn malformed_bytes_are_skipped() {
        // stray continuation bytes and an invalid lead
        assert_eq!(byte_width(&[0x80, b'a', 0xFF, b'b']), 2);
        // truncated three byte sequence at the end
        assert_eq!(byte_width(&[b'x', 0xE2, 0x82]), 1);
    }

    #[test]
    fn decodes_values() {
        let cps: Vec<u32> = code_points("é€😀".as_bytes()).map(|c| c.value).collect();
        assert_eq!(cps, vec![0xE9, 0x20AC, 0x1F600]);
    }

    #[test]
    fn decoding_restarts_from_the_beginning() {
        let s = "añb";
        let first: Vec<_> = code_points(s.as_bytes()).collect();
        let second: Vec<_> = code_points(s.as_bytes()).collect();
        assert_eq!(first, second);
        assert_eq!(first[1].offset, 1);
        assert_eq!(first[1].len, 2);
    }

    #[test]
    fn truncates_on_code_point_boundaries() {
        assert_eq!(truncate_to_width("Renée O'Brien", 5), "Renée");
        assert_eq!(truncate_to_width("short", 18), "short");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}

//! Character classes recognised by the scanner
//!
//! Every byte test the scanner, section locator and value locator perform
//! goes through one of these predicates. All classes are ASCII, so they are
//! safe to apply to UTF-8 text byte by byte.

/// Horizontal whitespace: space and tab
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}

/// End-of-line characters. Any run of them is one line boundary.
#[inline]
pub fn is_eol(b: u8) -> bool {
    matches!(b, b'\r' | b'\n')
}

/// Comment introducers
#[inline]
pub fn is_comment(b: u8) -> bool {
    matches!(b, b';' | b'#')
}

/// Key/value separators. The first one on a line wins.
#[inline]
pub fn is_separator(b: u8) -> bool {
    matches!(b, b':' | b'=')
}

/// Bytes that stop the logical content of a line in inline-comment mode
#[inline]
pub fn is_line_stop(b: u8) -> bool {
    is_comment(b) || is_eol(b)
}

pub const SECTION_OPEN: u8 = b'[';
pub const SECTION_CLOSE: u8 = b']';

/// Separator written when a new key is inserted
pub const WRITE_SEPARATOR: u8 = b'=';

/// Index of the first byte in `bytes[from..to]` matching `class`
pub fn find(bytes: &[u8], from: usize, to: usize, class: impl Fn(u8) -> bool) -> Option<usize> {
    (from..to).find(|&i| class(bytes[i]))
}

/// Index of the first byte in `bytes[from..to]` not matching `class`, or `to`
pub fn skip(bytes: &[u8], from: usize, to: usize, class: impl Fn(u8) -> bool) -> usize {
    (from..to).find(|&i| !class(bytes[i])).unwrap_or(to)
}

/// End of `bytes[from..to]` after trailing whitespace is dropped
pub fn trim_end(bytes: &[u8], from: usize, to: usize) -> usize {
    let mut end = to;
    while end > from && is_space(bytes[end - 1]) {
        end -= 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_are_disjoint() {
        for b in 0u8..=255 {
            let hits = [is_space(b), is_eol(b), is_comment(b), is_separator(b)]
                .iter()
                .filter(|&&hit| hit)
                .count();
            assert!(hits <= 1, "byte {:#04x} in more than one class", b);
        }
    }

    #[test]
    fn test_find_and_skip() {
        let line = b"  key = value\r\n";
        assert_eq!(skip(line, 0, line.len(), is_space), 2);
        assert_eq!(find(line, 0, line.len(), is_separator), Some(6));
        assert_eq!(find(line, 0, 5, is_separator), None);
        assert_eq!(skip(b"   ", 0, 3, is_space), 3);
    }

    #[test]
    fn test_trim_end() {
        let text = b"abc \t ";
        assert_eq!(trim_end(text, 0, text.len()), 3);
        assert_eq!(trim_end(b"   ", 0, 3), 0);
        assert_eq!(trim_end(b"a  ", 1, 3), 1);
    }

    #[test]
    fn test_line_stop() {
        assert!(is_line_stop(b';'));
        assert!(is_line_stop(b'#'));
        assert!(is_line_stop(b'\n'));
        assert!(!is_line_stop(b'='));
    }
}

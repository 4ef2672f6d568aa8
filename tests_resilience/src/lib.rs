//! Resilience Test Utilities
//!
//! This crate provides shared fixtures for resilience and integration tests
//! of the INI editor.
//!
//! ## Test Philosophy
//!
//! - **Bounded memory**: Large files are processed with windows barely wider than a line
//! - **Deterministic failures**: All faults are reproducible via `FailurePolicy`
//! - **No silent corruption**: Every failed write is reported and recorded
//! - **Byte-exact tails**: Growth and insertion never alter the bytes they shift

use hal::ByteStore;
use ini_editor::{IniEditor, IniResult};

/// Every section of a file with its key/value pairs, in file order
///
/// The default section comes first with a `None` name.
pub type Snapshot = Vec<(Option<String>, Vec<(String, String)>)>;

/// Generates a deterministic INI file
///
/// Every key line is `keyNN = value-SSSNN` and every header is
/// `[sectionSSS]`, so all key lines share one length.
pub fn generate_ini(sections: usize, keys_per_section: usize) -> Vec<u8> {
    let mut text = String::from("; generated fixture\nversion = 1\n");
    for s in 0..sections {
        text.push_str(&format!("[section{:03}]\n", s));
        for k in 0..keys_per_section {
            text.push_str(&format!("key{:02} = value-{:03}{:02}\n", k, s, k));
        }
    }
    text.into_bytes()
}

/// Length of the longest line including its terminator
pub fn longest_line(bytes: &[u8]) -> usize {
    bytes
        .split_inclusive(|&b| b == b'\n')
        .map(<[u8]>::len)
        .max()
        .unwrap_or(0)
}

/// Reads the whole structure of a file through the editor
///
/// Sections are visited with the wildcard section search, so duplicate
/// section names appear once per occurrence.
pub fn snapshot<S: ByteStore>(editor: &mut IniEditor<'_, S>) -> IniResult<Snapshot> {
    editor.open_default_section();
    let mut sections = vec![(None, editor.entries()?)];
    while editor.next_section()? {
        let name = editor.last_name_string();
        sections.push((Some(name), editor.entries()?));
    }
    editor.open_default_section();
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ini_shape() {
        let text = generate_ini(2, 3);
        let text = String::from_utf8(text).unwrap();
        assert!(text.starts_with("; generated fixture\nversion = 1\n[section000]\n"));
        assert!(text.ends_with("[section001]\nkey00 = value-00100\nkey01 = value-00101\nkey02 = value-00102\n"));
    }

    #[test]
    fn test_longest_line() {
        assert_eq!(longest_line(b"a=1\nlonger=22\nz"), 10);
        assert_eq!(longest_line(b""), 0);
        assert_eq!(longest_line(&generate_ini(3, 3)), 20);
    }
}

//! # INI Editor
//!
//! A streaming reader and in-place editor for INI files.
//!
//! ## Philosophy
//!
//! **Memory use is fixed by the caller, not by the file.**
//!
//! The editor never loads a file. It reads one line at a time into a window
//! buffer the caller owns, and edits the file through the same window. A
//! file of any size can be read and modified with a few dozen bytes of RAM,
//! as long as each line fits the window.
//!
//! ## Design
//!
//! - **LineScanner**: cuts one logical line out of a window load
//! - **Cursor**: current section start plus the wildcard enumeration position
//! - **Section / value locators**: forward-only scans built on the scanner
//! - **Mutator**: in-place overwrite, tail-preserving growth, insertion
//! - **IniEditor**: the session type; sticky last error, last matched name
//! - **Sinks**: verbatim copy and JSON dump to any `std::io::Write`
//!
//! ## Example
//!
//! ```
//! use hal::RamFile;
//! use ini_editor::IniEditor;
//!
//! let mut window = [0u8; 32];
//! let mut editor = IniEditor::new(RamFile::from_bytes(&b"[net]\r\nport=80\r\n"[..]));
//! editor.set_window(&mut window).unwrap();
//!
//! assert!(editor.open_section(Some("net")).unwrap());
//! assert_eq!(editor.get_value(Some("port")).unwrap(), Some(&b"80"[..]));
//!
//! editor.set_value("port", "8080", 0).unwrap();
//! assert_eq!(editor.get_value_or(Some("port"), "?"), "8080");
//! ```

pub mod chars;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod mutator;
pub mod scanner;
pub mod section;
pub mod sink;
pub mod value;

pub use config::{CommentMode, ConfigError, EditorConfig, LineEnding};
pub use cursor::{Cursor, Span};
pub use editor::IniEditor;
pub use error::{ErrorKind, IniError, IniResult};
pub use mutator::WriteOutcome;
pub use scanner::{LineRecord, LineScanner, MIN_WINDOW};
pub use section::section_name;
pub use value::{Placeholder, ValueMatch};

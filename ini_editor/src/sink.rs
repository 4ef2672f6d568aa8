//! Output sinks
//!
//! Two consumers of the editor that stream the file to any `std::io::Write`:
//! a verbatim copy and a JSON-shaped structural dump. Both go through the
//! window, so output of any file size needs no extra memory.

use crate::cursor::Span;
use crate::editor::IniEditor;
use crate::error::{IniError, IniResult};
use hal::ByteStore;
use std::io::Write;

impl<S: ByteStore> IniEditor<'_, S> {
    /// Copy the whole file to `out` in window-sized chunks
    pub fn print_ini<W: Write>(&mut self, out: &mut W) -> IniResult<u64> {
        let result = self.copy_to(out);
        self.record(result)
    }

    fn copy_to<W: Write>(&mut self, out: &mut W) -> IniResult<u64> {
        let mut scanner = self.scanner()?;
        scanner.seek_to(0)?;
        let mut copied = 0u64;
        loop {
            let n = scanner
                .store
                .read(scanner.window)
                .map_err(|source| IniError::Read {
                    offset: copied,
                    source,
                })?;
            if n == 0 {
                break;
            }
            out.write_all(&scanner.window[..n])?;
            copied += n as u64;
        }
        out.flush()?;
        tracing::debug!(bytes = copied, "file copied");
        Ok(copied)
    }

    /// Dump every section and value as a JSON object
    ///
    /// Values of the default section are top-level members; each named
    /// section becomes a nested object. Members are separated by a comma and
    /// the configured line ending. The cursor is restored afterwards.
    pub fn print_json<W: Write>(&mut self, out: &mut W) -> IniResult<()> {
        let saved = (self.cursor, self.section_open);
        self.open_default_section();
        let result = self.dump_json(out);
        (self.cursor, self.section_open) = saved;
        self.last_name = Span::EMPTY;
        self.record(result)
    }

    fn dump_json<W: Write>(&mut self, out: &mut W) -> IniResult<()> {
        let nl = self.config.line_ending.as_bytes();
        out.write_all(b"{")?;

        let mut member = false;
        let mut named = false;
        loop {
            if named {
                if member {
                    out.write_all(b",")?;
                    out.write_all(nl)?;
                }
                write_json_str(out, self.last_name())?;
                out.write_all(b":{")?;
                out.write_all(nl)?;
            }

            let mut first = true;
            while let Some(m) = self.find_value(None)? {
                if !first {
                    out.write_all(b",")?;
                    out.write_all(nl)?;
                }
                out.write_all(b"\t")?;
                write_json_str(out, self.span_bytes(m.key))?;
                out.write_all(b":")?;
                write_json_str(out, self.span_bytes(m.value))?;
                first = false;
                if !named {
                    member = true;
                }
            }

            if named {
                out.write_all(nl)?;
                out.write_all(b"}")?;
                member = true;
            }

            if !self.next_section()? {
                break;
            }
            named = true;
        }

        out.write_all(b"}")?;
        out.flush()?;
        Ok(())
    }
}

fn write_json_str<W: Write>(out: &mut W, bytes: &[u8]) -> IniResult<()> {
    let text = String::from_utf8_lossy(bytes);
    serde_json::to_writer(out, text.as_ref())
        .map_err(|e| IniError::Output(std::io::Error::from(e).kind()))
}

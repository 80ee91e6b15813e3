//! Log subscriber setup.

use std::io::{self, Write};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Writer that ends every line with `\r\n`.
///
/// In raw mode the terminal does not return the cursor on `\n`, so plain
/// log lines would drift rightwards.
#[derive(Debug)]
pub struct CrlfWriter<W> {
    inner: W,
}

impl<W: Write> CrlfWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut lines = buf.split(|&b| b == b'\n');
        if let Some(first) = lines.next() {
            self.inner.write_all(first)?;
        }
        for line in lines {
            self.inner.write_all(b"\r\n")?;
            self.inner.write_all(line)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Install the global `fmt` subscriber on stderr.
///
/// `RUST_LOG` wins over `verbose`. With `raw_terminal` set, lines end in
/// `\r\n`.
pub fn init(verbose: bool, raw_terminal: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let writer = if raw_terminal {
        BoxMakeWriter::new(|| CrlfWriter::new(io::stderr()))
    } else {
        BoxMakeWriter::new(io::stderr)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn crlf(chunks: &[&str]) -> String {
        let mut writer = CrlfWriter::new(Vec::new());
        for chunk in chunks {
            writer.write_all(chunk.as_bytes()).unwrap();
        }
        String::from_utf8(writer.inner).unwrap()
    }

    #[test]
    fn newlines_become_crlf() {
        assert_eq!(crlf(&["INFO session ready\n"]), "INFO session ready\r\n");
        assert_eq!(crlf(&["a\nb\n"]), "a\r\nb\r\n");
    }

    #[test]
    fn text_without_newline_passes_through() {
        assert_eq!(crlf(&["step ", "1"]), "step 1");
        assert_eq!(crlf(&[""]), "");
    }

    #[test]
    fn split_writes_keep_line_endings() {
        assert_eq!(crlf(&["warn", "ing\n", "\n"]), "warning\r\n\r\n");
    }
}

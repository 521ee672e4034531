//! Line-oriented input and output for the CLI front-end.
//!
//! The core pipeline only ever sees in-memory lines; these helpers are the
//! external collaborators that produce and consume them. Failures surface as
//! [`NGramError::Io`] and are never retried or interpreted here.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::NGramError;

/// Read all lines from `path`.
pub fn read_lines(path: &Path) -> Result<Vec<String>, NGramError> {
    let file = File::open(path)?;
    collect_lines(BufReader::new(file))
}

/// Read all lines from standard input.
pub fn read_lines_stdin() -> Result<Vec<String>, NGramError> {
    collect_lines(io::stdin().lock())
}

fn collect_lines(reader: impl BufRead) -> Result<Vec<String>, NGramError> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}

/// Write `lines` to `path`, one per line.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<(), NGramError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("lines.txt");

        let lines = vec!["a\tb\t2".to_string(), "b\ta\t1".to_string()];
        write_lines(&path, &lines).expect("write succeeds");

        let back = read_lines(&path).expect("read succeeds");
        assert_eq!(back, lines);
    }

    #[test]
    fn test_write_empty_produces_empty_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty.txt");

        write_lines(&path, &[]).expect("write succeeds");
        assert!(read_lines(&path).expect("read succeeds").is_empty());
    }

    #[test]
    fn test_read_missing_file_is_an_io_error() {
        let err = read_lines(Path::new("/nonexistent/counts.txt")).expect_err("must fail");
        assert!(matches!(err, NGramError::Io(_)));
    }
}

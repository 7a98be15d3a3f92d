//! Resource readers
//!
//! Entry points that feed a whole resource through a [`CommentScanner`]. Lines are
//! consumed once, in order. The first read failure aborts the scan and the comments
//! collected so far are dropped with the scanner.

use super::comment::Comment;
use super::scanner::{CommentScanner, CommentSyntax};
use super::span::NodeSpanIndex;
use crate::error::ScanError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Scan `lines` with the default `#` syntax.
///
/// Returns the comments sorted by `(resource, start_line, tag_column)`.
pub fn read_comments<I>(resource: &str, lines: I, spans: &NodeSpanIndex) -> Result<Vec<Comment>, ScanError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    read_comments_with(&CommentSyntax::default(), resource, lines, spans)
}

pub fn read_comments_with<I>(
    syntax: &CommentSyntax,
    resource: &str,
    lines: I,
    spans: &NodeSpanIndex,
) -> Result<Vec<Comment>, ScanError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut scanner = CommentScanner::new(resource, syntax, spans);
    for line in lines {
        let line = line.map_err(|source| ScanError::SourceRead {
            resource: resource.to_string(),
            line: scanner.lines_scanned(),
            source,
        })?;
        scanner.push_line(&line);
    }

    let lines_scanned = scanner.lines_scanned();
    let comments = scanner.finish();
    tracing::debug!(
        resource,
        lines = lines_scanned,
        comments = comments.len(),
        "scanned resource for comments"
    );
    Ok(comments)
}

pub fn read_comments_from_reader<R: BufRead>(
    resource: &str,
    reader: R,
    spans: &NodeSpanIndex,
) -> Result<Vec<Comment>, ScanError> {
    read_comments(resource, reader.lines(), spans)
}

/// Open and scan a file. The path, as displayed, is the resource identifier.
pub fn read_comments_from_path(path: impl AsRef<Path>, spans: &NodeSpanIndex) -> Result<Vec<Comment>, ScanError> {
    read_comments_from_path_with(&CommentSyntax::default(), path, spans)
}

pub fn read_comments_from_path_with(
    syntax: &CommentSyntax,
    path: impl AsRef<Path>,
    spans: &NodeSpanIndex,
) -> Result<Vec<Comment>, ScanError> {
    let path = path.as_ref();
    let resource = path.display().to_string();
    let file = File::open(path).map_err(|source| ScanError::Open {
        resource: resource.clone(),
        source,
    })?;
    read_comments_with(syntax, &resource, BufReader::new(file).lines(), spans)
}

/// Scan an in-memory document. Infallible since no I/O is involved.
pub fn scan_str(resource: &str, text: &str, spans: &NodeSpanIndex) -> Vec<Comment> {
    let syntax = CommentSyntax::default();
    let mut scanner = CommentScanner::new(resource, &syntax, spans);
    for line in text.lines() {
        scanner.push_line(line);
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reader_and_str_agree() {
        let source = "# head\n\nkey: 1 # tail\r\nother: 2\n";
        let spans = NodeSpanIndex::default();
        let from_reader = read_comments_from_reader("r", Cursor::new(source), &spans).unwrap();
        assert_eq!(from_reader, scan_str("r", source, &spans));
        assert_eq!(from_reader.len(), 2);
    }

    #[test]
    fn read_failure_aborts_with_line_number() {
        let lines = vec![
            Ok("# one".to_string()),
            Ok("a: 1".to_string()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad bytes")),
            Ok("# never seen".to_string()),
        ];
        let err = read_comments("broken.yaml", lines, &NodeSpanIndex::default()).unwrap_err();
        assert!(matches!(
            err,
            ScanError::SourceRead { ref resource, line: 2, .. } if resource == "broken.yaml"
        ));
    }

    #[test]
    fn invalid_utf8_is_a_read_failure() {
        let bytes: &[u8] = b"# ok\n\xff\xfe\n";
        let err = read_comments_from_reader("bin", bytes, &NodeSpanIndex::default()).unwrap_err();
        assert!(matches!(err, ScanError::SourceRead { line: 1, .. }));
    }

    #[test]
    fn missing_file_is_an_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = read_comments_from_path(&path, &NodeSpanIndex::default()).unwrap_err();
        assert!(matches!(err, ScanError::Open { .. }));
        assert_eq!(err.resource(), path.display().to_string());
    }

    #[test]
    fn reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, "# database\nhost: db # primary\n").unwrap();
        let comments = read_comments_from_path(&path, &NodeSpanIndex::default()).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].resource(), path.display().to_string());
    }
}

use crate::models::Document;
use crate::parsing::decode;
use std::fs;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported file type: {0} (expected .md or .markdown)")]
    UnsupportedFileType(String),
    #[error("File is not valid UTF-8: {0}")]
    NotUtf8(String),
}

/// Whether `file_name` carries a Markdown extension (case-insensitive).
pub fn is_markdown_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|md| ext.eq_ignore_ascii_case(md))
        })
}

/// Decode an uploaded file into a document.
pub fn ingest_upload(file_name: &str, bytes: &[u8]) -> Result<Document, IoError> {
    if !is_markdown_file(file_name) {
        return Err(IoError::UnsupportedFileType(file_name.to_string()));
    }
    let text =
        std::str::from_utf8(bytes).map_err(|_| IoError::NotUtf8(file_name.to_string()))?;
    log::debug!("ingesting upload {file_name} ({} bytes)", bytes.len());
    Ok(decode(text))
}

/// Read a markdown file and return its content
pub fn read_markdown_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => IoError::NotUtf8(path.display().to_string()),
        _ => IoError::Io(e),
    })
}

/// Write content to a markdown file, creating parent directories as needed.
pub fn write_markdown_file(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockKind;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("notes.md", true)]
    #[case("notes.MD", true)]
    #[case("notes.Markdown", true)]
    #[case("archive.tar.md", true)]
    #[case("notes.txt", false)]
    #[case("md", false)]
    #[case("notes", false)]
    fn test_is_markdown_file(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_markdown_file(name), expected);
    }

    #[test]
    fn test_ingest_upload_decodes() {
        let doc = ingest_upload("readme.md", b"# Title\n- item").unwrap();
        let kinds: Vec<_> = doc.blocks().iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BlockKind::Heading1, BlockKind::ListItem]);
    }

    #[test]
    fn test_ingest_upload_rejects_other_types() {
        let err = ingest_upload("photo.png", b"\x89PNG").unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFileType(name) if name == "photo.png"));
    }

    #[test]
    fn test_ingest_upload_rejects_invalid_utf8() {
        let err = ingest_upload("broken.md", &[0x23, 0x20, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, IoError::NotUtf8(_)));
    }

    #[test]
    fn test_read_file_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_markdown_file(&dir.path().join("nonexistent.md"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_write_file_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("folder/subfolder/new_file.md");
        let content = "# New File in Nested Folder";

        write_markdown_file(&path, content).unwrap();

        assert_eq!(read_markdown_file(&path).unwrap(), content);
        assert!(dir.path().join("folder").join("subfolder").is_dir());
    }

    #[test]
    fn test_write_file_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.md");
        std::fs::write(&path, "# Original Content").unwrap();

        write_markdown_file(&path, "# Updated Content").unwrap();

        assert_eq!(read_markdown_file(&path).unwrap(), "# Updated Content");
    }

    #[test]
    fn test_read_file_not_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.md");
        std::fs::write(&path, [0xffu8, 0xfe, 0x00]).unwrap();

        assert!(matches!(read_markdown_file(&path), Err(IoError::NotUtf8(_))));
    }
}

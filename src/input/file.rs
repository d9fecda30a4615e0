//! Loading a WhatsApp `.txt` export from disk.

use std::path::Path;

use super::InputError;

/// `true` for paths with a `.txt` extension (any case).
pub fn is_transcript_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// Read a `.txt` export, dropping a leading UTF-8 byte-order mark.
///
/// # Errors
///
/// [`InputError::UnsupportedFile`] for other extensions, [`InputError::Io`]
/// when the file cannot be read as UTF-8 text.
pub fn read_transcript_file(path: &Path) -> Result<String, InputError> {
    if !is_transcript_file(path) {
        return Err(InputError::UnsupportedFile(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn recognises_txt_extension() {
        assert!(is_transcript_file(Path::new("WhatsApp Chat with Bob.txt")));
        assert!(is_transcript_file(Path::new("chat.TXT")));
        assert!(!is_transcript_file(Path::new("chat.zip")));
        assert!(!is_transcript_file(Path::new("chat")));
    }

    #[test]
    fn reads_export_and_strips_bom() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("_chat.txt");
        std::fs::write(&path, "\u{feff}[17/01/25, 10:12:01 PM] A: hi\n").expect("write");

        let text = read_transcript_file(&path).expect("read");

        assert_eq!(text, "[17/01/25, 10:12:01 PM] A: hi\n");
        assert!(crate::validate::validate(&text));
    }

    #[test]
    fn rejects_other_extensions() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("chat.zip");
        std::fs::write(&path, "PK").expect("write");

        assert!(matches!(
            read_transcript_file(&path),
            Err(InputError::UnsupportedFile(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("missing.txt");

        assert!(matches!(
            read_transcript_file(&path),
            Err(InputError::Io { .. })
        ));
    }
}

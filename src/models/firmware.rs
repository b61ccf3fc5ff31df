//! Firmware image and upload payload

use bytes::Bytes;
use regex::bytes::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::errors::{OtaError, Result};

pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";
pub const TEXT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

static LINE_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("line terminator pattern is valid"));

/// Remove every `\r\n` and `\n` sequence.
///
/// A carriage return that is not followed by a newline is kept.
pub fn strip_line_terminators(data: &[u8]) -> Vec<u8> {
    LINE_TERMINATOR.replace_all(data, &b""[..]).into_owned()
}

/// Content type announced for the upload body
pub fn content_type_for(binary: bool) -> &'static str {
    if binary {
        BINARY_CONTENT_TYPE
    } else {
        TEXT_CONTENT_TYPE
    }
}

/// Sketch bytes as read from disk
#[derive(Debug, Clone)]
pub struct FirmwareImage {
    path: PathBuf,
    data: Bytes,
}

impl FirmwareImage {
    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| OtaError::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded sketch {} ({} bytes)", path.display(), data.len());

        Ok(Self {
            path: path.to_path_buf(),
            data: Bytes::from(data),
        })
    }

    pub fn from_bytes(path: impl Into<PathBuf>, data: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
    }

    /// Directory holding the sketch, `.` for a bare file name
    pub fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Body to push to the board in the given mode
    pub fn payload(&self, binary: bool) -> Payload {
        let body = if binary {
            self.data.clone()
        } else {
            Bytes::from(strip_line_terminators(&self.data))
        };

        Payload {
            body,
            content_type: content_type_for(binary),
        }
    }
}

/// Upload request body together with its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub body: Bytes,
    pub content_type: &'static str,
}

impl Payload {
    /// Body carrying only the URL the board should download the sketch from
    pub fn download_url(url: &str, binary: bool) -> Self {
        Self {
            body: Bytes::from(url.to_string()),
            content_type: content_type_for(binary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_mixed_line_endings() {
        assert_eq!(strip_line_terminators(b"a\r\nb\nc"), b"abc".to_vec());
    }

    #[test]
    fn test_strip_is_idempotent() {
        let once = strip_line_terminators(b":100000\r\n:10001000\n\n:00000001FF\r\n");
        let twice = strip_line_terminators(&once);
        assert_eq!(once, twice);
        assert_eq!(once, b":100000:10001000:00000001FF".to_vec());
    }

    #[test]
    fn test_lone_carriage_return_is_kept() {
        assert_eq!(strip_line_terminators(b"a\rb\r\r\n"), b"a\rb\r".to_vec());
    }

    #[test]
    fn test_binary_payload_is_untouched() {
        let image = FirmwareImage::from_bytes("blink.bin", &b"\x00\r\n\xff"[..]);
        let payload = image.payload(true);
        assert_eq!(payload.body.as_ref(), b"\x00\r\n\xff");
        assert_eq!(payload.content_type, BINARY_CONTENT_TYPE);
    }

    #[test]
    fn test_text_payload_is_stripped() {
        let image = FirmwareImage::from_bytes("blink.hex", &b"line1\r\nline2\n"[..]);
        let payload = image.payload(false);
        assert_eq!(payload.body.as_ref(), b"line1line2");
        assert_eq!(payload.content_type, TEXT_CONTENT_TYPE);
    }

    #[test]
    fn test_directory_of_bare_file_name() {
        let image = FirmwareImage::from_bytes("blink.bin", Bytes::new());
        assert_eq!(image.directory(), PathBuf::from("."));
        assert_eq!(image.file_name().as_deref(), Some("blink.bin"));

        let nested = FirmwareImage::from_bytes("/tmp/build/blink.bin", Bytes::new());
        assert_eq!(nested.directory(), PathBuf::from("/tmp/build"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = FirmwareImage::load(Path::new("/nonexistent/blink.bin"))
            .await
            .unwrap_err();
        assert!(matches!(err, OtaError::FileOpen { .. }));
    }
}

use crate::errors::{GuardError, GuardResult};
use base64::Engine;
use std::path::Path;

/// Largest file a guarded read accepts, in bytes.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadEncoding {
    /// Lossy UTF-8; invalid sequences become U+FFFD.
    #[default]
    Utf8,
    Latin1,
    Base64,
    Hex,
    /// No decoding, the bytes are returned as read.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    Bytes(Vec<u8>),
    Text(String),
}

impl FileContents {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContents::Text(text) => Some(text),
            FileContents::Bytes(_) => None,
        }
    }
}

impl ReadEncoding {
    fn decode(self, data: Vec<u8>) -> FileContents {
        match self {
            ReadEncoding::Raw => FileContents::Bytes(data),
            ReadEncoding::Utf8 => FileContents::Text(decode_utf8(data)),
            ReadEncoding::Latin1 => FileContents::Text(data.iter().map(|&b| char::from(b)).collect()),
            ReadEncoding::Base64 => {
                FileContents::Text(base64::engine::general_purpose::STANDARD.encode(data))
            }
            ReadEncoding::Hex => FileContents::Text(data.iter().map(|b| format!("{b:02x}")).collect()),
        }
    }
}

fn decode_utf8(data: Vec<u8>) -> String {
    match String::from_utf8(data) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

// The limit applies to the size reported by `stat`. A file that grows
// between the stat and the read is still read in full.
async fn read_capped(path: &Path) -> GuardResult<Vec<u8>> {
    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_FILE_SIZE {
        return Err(GuardError::TooLarge { size, max: MAX_FILE_SIZE });
    }
    Ok(tokio::fs::read(path).await?)
}

/// Reads a whole file after checking its size against [`MAX_FILE_SIZE`].
pub async fn read_file_limited(path: &Path, encoding: ReadEncoding) -> GuardResult<FileContents> {
    Ok(encoding.decode(read_capped(path).await?))
}

/// [`read_file_limited`] with the default UTF-8 decoding.
pub async fn read_text_limited(path: &Path) -> GuardResult<String> {
    Ok(decode_utf8(read_capped(path).await?))
}

use std::{io::Cursor, path::Path};

use {
    image::ImageReader,
    switchboard_common::{Error, Result},
};

/// Image bytes plus the dimensions the API wants alongside them.
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Vec<u8>,
    /// MIME type detected from the image header.
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(Error::invalid(format!(
                "Image not found at path: {}",
                path.display()
            )));
        }
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::invalid(format!("could not read {}: {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| Error::invalid(format!("unreadable image: {e}")))?;
        let content_type = reader
            .format()
            .map(|format| format.to_mime_type())
            .ok_or_else(|| Error::invalid("unsupported image: unknown format"))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| Error::invalid(format!("unsupported image: {e}")))?;
        Ok(Self {
            bytes,
            content_type,
            width,
            height,
        })
    }
}

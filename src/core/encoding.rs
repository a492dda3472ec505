//! Upload content encoding.
//!
//! Uploaded files are stored inline as `data:<mime>;base64,<payload>` URLs so
//! the whole submission fits in the single JSON blob.

use crate::{core::submission::FileAttachment, core::validation::FileMeta, errors::Result};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use std::future::Future;

/// Something that can produce the bytes of an upload.
///
/// The bot layer implements this for Discord attachments; tests use byte buffers.
pub trait ContentSource {
    /// Fetches the full content of the upload.
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

impl ContentSource for Vec<u8> {
    async fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

/// An upload whose metadata has been received but whose content has not been read yet.
#[derive(Debug, Clone)]
pub struct PendingUpload<S> {
    /// Metadata used for validation and storage
    pub meta: FileMeta,
    /// Where the bytes come from
    pub source: S,
}

/// Encodes raw bytes as a `data:` URL.
#[must_use]
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(bytes))
}

/// Fetches an upload and returns it as a stored attachment with inline content.
pub async fn encode_upload<S: ContentSource + Sync>(
    upload: &PendingUpload<S>,
) -> Result<FileAttachment> {
    let bytes = upload.source.fetch().await?;
    Ok(FileAttachment {
        name: upload.meta.name.clone(),
        size: upload.meta.size,
        mime_type: upload.meta.mime_type.clone(),
        data: Some(to_data_url(&upload.meta.mime_type, &bytes)),
    })
}

/// Encodes the photo and the optional payment proof concurrently.
///
/// Resolves only once every requested upload is encoded; the first failure wins.
pub async fn encode_uploads<S: ContentSource + Sync>(
    photo: &PendingUpload<S>,
    payment_proof: Option<&PendingUpload<S>>,
) -> Result<(FileAttachment, Option<FileAttachment>)> {
    let proof = async {
        match payment_proof {
            Some(upload) => encode_upload(upload).await.map(Some),
            None => Ok(None),
        }
    };
    tokio::try_join!(encode_upload(photo), proof)
}

/// Guesses a MIME type from a file extension, for uploads that arrive without one.
#[must_use]
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;

    struct FailingSource;

    impl ContentSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            Err(Error::Relay {
                message: "download failed".to_string(),
            })
        }
    }

    #[test]
    fn test_to_data_url() {
        assert_eq!(to_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("Holiday.JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("shot.webp"), "image/webp");
        assert_eq!(guess_mime_type("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_encode_uploads_waits_for_both() -> Result<()> {
        let photo = PendingUpload {
            meta: FileMeta::new("a.jpg", 3, "image/jpeg"),
            source: b"abc".to_vec(),
        };
        let proof = PendingUpload {
            meta: FileMeta::new("p.png", 2, "image/png"),
            source: b"ok".to_vec(),
        };

        let (photo_att, proof_att) = encode_uploads(&photo, Some(&proof)).await?;
        assert_eq!(photo_att.data.as_deref(), Some("data:image/jpeg;base64,YWJj"));
        let proof_att = proof_att.unwrap();
        assert_eq!(proof_att.name, "p.png");
        assert!(proof_att.data.unwrap().starts_with("data:image/png;base64,"));
        Ok(())
    }

    #[tokio::test]
    async fn test_encode_upload_propagates_fetch_error() {
        let photo = PendingUpload {
            meta: FileMeta::new("a.jpg", 3, "image/jpeg"),
            source: FailingSource,
        };
        let result = encode_uploads(&photo, None).await;
        assert!(matches!(result, Err(Error::Relay { .. })));
    }
}

//! `multipart/form-data` decoding.
//!
//! The whole body is already in memory, so it is fed to `multer` as a
//! single-chunk stream and every part is read eagerly. Text parts become form
//! fields; parts with a file name become [`UploadedFile`]s.

use std::io;

use argus_schema::UploadedFile;
use bytes::Bytes;
use indexmap::IndexMap;

use crate::multidict::MultiDict;

/// The decoded form body: text fields plus uploaded files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: MultiDict,
    files: IndexMap<String, Vec<UploadedFile>>,
}

impl FormData {
    /// Creates form data from text fields only.
    #[must_use]
    pub fn from_fields(fields: MultiDict) -> Self {
        Self {
            fields,
            files: IndexMap::new(),
        }
    }

    /// The text fields.
    #[must_use]
    pub fn fields(&self) -> &MultiDict {
        &self.fields
    }

    /// Every file uploaded under `name`, empty if none.
    #[must_use]
    pub fn files(&self, name: &str) -> &[UploadedFile] {
        self.files.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of uploaded files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    fn push_file(&mut self, name: String, file: UploadedFile) {
        self.files.entry(name).or_default().push(file);
    }
}

/// Decodes a multipart body using the boundary from `content_type`.
///
/// # Errors
///
/// Returns the `multer` error when the boundary is missing or the body is
/// malformed.
pub async fn decode_multipart(content_type: &str, body: Bytes) -> Result<FormData, multer::Error> {
    let boundary = multer::parse_boundary(content_type)?;
    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = FormData::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(ToString::to_string) {
            let content_type = field.content_type().map(ToString::to_string);
            let data = field.bytes().await?;
            let file = UploadedFile::new(Some(name.clone()), Some(file_name), content_type, data);
            form.push_file(name, file);
        } else {
            let text = field.text().await?;
            form.fields.append(name, text);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_TYPE: &str = "multipart/form-data; boundary=XBOUNDARY";

    fn body(parts: &[&str]) -> Bytes {
        let mut out = String::new();
        for part in parts {
            out.push_str("--XBOUNDARY\r\n");
            out.push_str(part);
            out.push_str("\r\n");
        }
        out.push_str("--XBOUNDARY--\r\n");
        Bytes::from(out)
    }

    #[tokio::test]
    async fn test_text_fields_and_files() {
        let body = body(&[
            "Content-Disposition: form-data; name=\"title\"\r\n\r\nReport",
            "Content-Disposition: form-data; name=\"doc\"; filename=\"a.txt\"\r\nContent-Type: text/plain\r\n\r\nhello",
            "Content-Disposition: form-data; name=\"doc\"; filename=\"b.txt\"\r\n\r\nworld",
        ]);

        let form = decode_multipart(CONTENT_TYPE, body).await.unwrap();
        assert_eq!(form.fields().get("title"), Some("Report"));
        assert_eq!(form.file_count(), 2);

        let docs = form.files("doc");
        assert_eq!(docs[0].file_name(), Some("a.txt"));
        assert_eq!(docs[0].content_type(), Some("text/plain"));
        assert_eq!(docs[0].data().as_ref(), b"hello");
        assert_eq!(docs[1].file_name(), Some("b.txt"));
        assert!(form.files("other").is_empty());
    }

    #[tokio::test]
    async fn test_missing_boundary() {
        let result = decode_multipart("multipart/form-data", Bytes::from_static(b"x")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let body = Bytes::from_static(
            b"--XBOUNDARY\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nvalue",
        );
        let result = decode_multipart(CONTENT_TYPE, body).await;
        assert!(result.is_err());
    }
}

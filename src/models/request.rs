use bytes::Bytes;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A résumé received in the `file` field of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: String, content: Bytes) -> Self {
        let size = content.len();
        Self {
            name,
            size,
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Declared `application/pdf` wins. Generic or missing types fall back to
    /// the extension and the `%PDF` magic bytes.
    pub fn is_pdf(&self) -> bool {
        match self.mime_type.as_deref() {
            Some(mt) if mt.eq_ignore_ascii_case(PDF_MIME_TYPE) => true,
            Some(mt) if !mt.eq_ignore_ascii_case("application/octet-stream") => false,
            _ => {
                self.name.to_lowercase().ends_with(".pdf")
                    || self.content.starts_with(b"%PDF")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_pdf_is_accepted() {
        let file = UploadedFile::new("cv".to_string(), Bytes::from_static(b"data"))
            .with_mime_type(PDF_MIME_TYPE.to_string());
        assert!(file.is_pdf());
    }

    #[test]
    fn other_declared_types_are_rejected() {
        let file = UploadedFile::new("cv.pdf".to_string(), Bytes::from_static(b"%PDF-1.4"))
            .with_mime_type("text/plain".to_string());
        assert!(!file.is_pdf());
    }

    #[test]
    fn octet_stream_falls_back_to_magic_bytes() {
        let file = UploadedFile::new("upload".to_string(), Bytes::from_static(b"%PDF-1.7\n"))
            .with_mime_type("application/octet-stream".to_string());
        assert!(file.is_pdf());

        let not_pdf = UploadedFile::new("upload.txt".to_string(), Bytes::from_static(b"hello"));
        assert!(!not_pdf.is_pdf());
    }
}

//! Hand-built PDF documents for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Object id of the content stream of the first page built by `single_page`.
pub const CONTENT_ID: u32 = 4;

/// Writes a minimal PDF: numbered objects followed by a trailer. Object ids
/// are chosen by the test so resources can reference each other.
#[derive(Debug, Default)]
pub struct PdfBuilder {
    objects: BTreeMap<u32, String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(mut self, id: u32, body: impl Into<String>) -> Self {
        self.objects.insert(id, body.into());
        self
    }

    pub fn stream(self, id: u32, dict: &str, data: &str) -> Self {
        let body = format!(
            "<< {dict} /Length {} >>\nstream\n{data}\nendstream",
            data.len()
        );
        self.object(id, body)
    }

    /// Catalog 1, page tree 2, pages from 3 with contents following each.
    pub fn pages(mut self, mediabox: &str, resources: &str, contents: &[&str]) -> Self {
        let kids: Vec<String> = (0..contents.len())
            .map(|i| format!("{} 0 R", 3 + 2 * i))
            .collect();
        self = self
            .object(1, "<< /Type /Catalog /Pages 2 0 R >>")
            .object(
                2,
                format!(
                    "<< /Type /Pages /Kids [{}] /Count {} /MediaBox {mediabox} /Resources {resources} >>",
                    kids.join(" "),
                    contents.len()
                ),
            );
        for (i, content) in contents.iter().enumerate() {
            let page_id = 3 + 2 * i as u32;
            self = self
                .object(
                    page_id,
                    format!("<< /Type /Page /Parent 2 0 R /Contents {} 0 R >>", page_id + 1),
                )
                .stream(page_id + 1, "", content);
        }
        self
    }

    pub fn single_page(self, mediabox: &str, resources: &str, content: &str) -> Self {
        self.pages(mediabox, resources, &[content])
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = b"%PDF-1.7\n".to_vec();
        for (id, body) in &self.objects {
            out.extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
        }
        out.extend_from_slice(b"trailer\n<< /Root 1 0 R >>\n%%EOF\n");
        out
    }
}

/// Fresh directory in the temp directory, unique to this test.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vecgen_test_{}_{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

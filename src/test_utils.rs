#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{RepositoryHit, UploadedDocument, WebSearchHit};

    /// Smallest byte sequence that still looks like a PDF to anyone sniffing it.
    pub const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n";

    pub fn pdf_document(field_name: &str, file_name: &str) -> UploadedDocument {
        UploadedDocument::new(field_name, file_name, "application/pdf", SAMPLE_PDF.to_vec())
    }

    pub fn web_hit(title: &str) -> WebSearchHit {
        WebSearchHit {
            title: title.to_string(),
            snippet: format!("Snippet from {}", title),
            link: format!("https://example.com/{}", title.replace(' ', "-")),
            position: None,
        }
    }

    pub fn repository_hit(name: &str) -> RepositoryHit {
        RepositoryHit {
            name: name.to_string(),
            url: format!("https://github.com/octocat/{}", name),
            owner: "octocat".to_string(),
            description: format!("{} repository", name),
            stars: Some(1200),
        }
    }
}

#[cfg(test)]
pub mod multipart {
    pub const BOUNDARY: &str = "----papercheck-test-boundary";

    pub enum Part<'a> {
        File {
            name: &'a str,
            file_name: &'a str,
            content_type: &'a str,
            bytes: &'a [u8],
        },
        Text {
            name: &'a str,
            value: &'a str,
        },
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    /// Encodes `parts` as a `multipart/form-data` body using [`BOUNDARY`].
    pub fn body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();

        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, file_name, content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
            }
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    pub fn pdf<'a>(name: &'a str, file_name: &'a str) -> Part<'a> {
        Part::File {
            name,
            file_name,
            content_type: "application/pdf",
            bytes: super::fixtures::SAMPLE_PDF,
        }
    }
}

#[cfg(test)]
pub mod app {
    use std::sync::Arc;

    use actix_web::web;

    use crate::{
        app_state::{AppState, Collaborators},
        config::Config,
        services::{
            model_service::MockGenerativeModel, pdf_renderer::MockPdfRenderer,
            repository_search_service::MockCodeRepositorySearch,
            web_search_service::MockWebSearch,
        },
    };

    /// Doubles that fail the test if any collaborator is called.
    pub fn untouched() -> Collaborators {
        let mut model = MockGenerativeModel::new();
        model.expect_generate().times(0);
        let mut web = MockWebSearch::new();
        web.expect_search().times(0);
        let mut repositories = MockCodeRepositorySearch::new();
        repositories.expect_search().times(0);
        let mut renderer = MockPdfRenderer::new();
        renderer.expect_render().times(0);

        Collaborators {
            model: Arc::new(model),
            web: Arc::new(web),
            repositories: Arc::new(repositories),
            renderer: Arc::new(renderer),
            reports: None,
        }
    }

    pub fn state(collaborators: Collaborators) -> web::Data<Arc<AppState>> {
        web::Data::new(Arc::new(AppState::from_collaborators(
            Config::test_config(),
            collaborators,
            None,
        )))
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, multipart};

    #[test]
    fn test_fixture_document_is_valid() {
        use validator::Validate;

        let doc = pdf_document("pyq", "pyq.pdf");
        assert!(doc.validate().is_ok());
        assert_eq!(doc.size(), SAMPLE_PDF.len());
    }

    #[test]
    fn test_multipart_body_is_framed() {
        let body = multipart::body(&[
            multipart::pdf("document", "essay.pdf"),
            multipart::Part::Text {
                name: "customPrompt",
                value: "chapter 2",
            },
        ]);
        let text = String::from_utf8_lossy(&body);

        assert_eq!(text.matches(multipart::BOUNDARY).count(), 3);
        assert!(text.contains("filename=\"essay.pdf\""));
        assert!(text.ends_with("--\r\n"));
    }
}

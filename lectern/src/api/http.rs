use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{LecternError, Result};
use crate::models::{
    ChatRequest, ChatResponse, CreateDocumentRequest, CreateNotebookRequest, Document, GraphData,
    Notebook,
};

use super::NotebookBackend;

/// Error body shape the backend uses for structured failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        // Fail fast on a malformed base URL instead of at the first request.
        let base = config.parsed_base_url()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Map a non-2xx status to an error carrying the given message.
    fn generic_error(status: StatusCode, message: &str) -> LecternError {
        LecternError::Api {
            status: status.as_u16(),
            message: message.to_string(),
        }
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        Ok(response.json().await?)
    }
}

#[async_trait]
impl NotebookBackend for HttpBackend {
    async fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        let response = self.client.get(self.endpoint("notebooks")).send().await?;
        if !response.status().is_success() {
            return Err(Self::generic_error(response.status(), "failed to fetch notebooks"));
        }
        Self::parse_json(response).await
    }

    async fn create_notebook(&self, request: &CreateNotebookRequest) -> Result<Notebook> {
        let response = self
            .client
            .post(self.endpoint("notebooks"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::generic_error(response.status(), "failed to create notebook"));
        }
        Self::parse_json(response).await
    }

    async fn get_notebook(&self, id: i64) -> Result<Notebook> {
        let response = self
            .client
            .get(self.endpoint(&format!("notebooks/{id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LecternError::NotFound(format!("notebook {id}")));
        }
        if !response.status().is_success() {
            return Err(Self::generic_error(response.status(), "failed to fetch notebook"));
        }
        Self::parse_json(response).await
    }

    async fn delete_notebook(&self, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("notebooks/{id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::generic_error(response.status(), "failed to delete notebook"));
        }
        Ok(())
    }

    async fn list_documents(&self, notebook_id: Option<i64>) -> Result<Vec<Document>> {
        let mut request = self.client.get(self.endpoint("documents"));
        if let Some(id) = notebook_id {
            request = request.query(&[("notebook_id", id)]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::generic_error(response.status(), "failed to fetch documents"));
        }
        Self::parse_json(response).await
    }

    async fn create_document(&self, request: &CreateDocumentRequest) -> Result<Document> {
        let response = self
            .client
            .post(self.endpoint("documents"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::generic_error(response.status(), "failed to create document"));
        }
        Self::parse_json(response).await
    }

    async fn upload_document(
        &self,
        notebook_id: i64,
        filename: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> Result<Document> {
        let part = Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| LecternError::Validation(format!("invalid MIME type: {e}")))?;
        let form = Form::new()
            .part("file", part)
            .text("notebook_id", notebook_id.to_string());

        let response = self
            .client
            .post(self.endpoint("documents/upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Upload failures carry the backend's body text so the user
            // sees what was actually rejected.
            let body = response.text().await.unwrap_or_default();
            return Err(LecternError::Api {
                status: status.as_u16(),
                message: format!("failed to upload document: {body}"),
            });
        }
        Self::parse_json(response).await
    }

    async fn document_graph(&self, document_id: i64) -> Result<GraphData> {
        let response = self
            .client
            .get(self.endpoint(&format!("documents/{document_id}/graph")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::generic_error(response.status(), "failed to fetch graph data"));
        }
        Self::parse_json(response).await
    }

    async fn chat(&self, notebook_id: i64, query: &str) -> Result<String> {
        let request = ChatRequest {
            query: query.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint(&format!("notebooks/{notebook_id}/chat")))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            // Prefer the server's structured error message when the body
            // parses; fall back to a generic one.
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "failed to send message".to_string());
            return Err(LecternError::Chat(message));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.answer)
    }
}

//! Blocking HTTP client implementing the core collaborator traits.

use crate::routes::Routes;
use mdedit_core::{
    ApiError, ArticleId, ArticleSummary, ContentStore, DocumentId, FieldChange, FieldId,
    FolderId, ListingApi, MediaFile, SearchApi, SearchResponse,
};
use mdedit_core::media::media_url;
use reqwest::Url;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of `POST .../api/set-prompt`.
#[derive(Debug, Serialize)]
pub(crate) struct SetPromptRequest<'a> {
    pub(crate) prompt_id: FieldId,
    pub(crate) value: Option<&'a str>,
    pub(crate) linked_article_id: Option<ArticleId>,
}

/// Body of `POST .../api/set-image`.
#[derive(Debug, Serialize)]
pub(crate) struct SetImageRequest<'a> {
    pub(crate) featured_image: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FolderName {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticleTitle {
    pub(crate) title: String,
}

/// Response of both rename endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct RenameResponse {
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) folder: Option<FolderName>,
    #[serde(default)]
    pub(crate) article: Option<ArticleTitle>,
}

impl RenameResponse {
    /// The stored name, or the server's rejection.
    pub(crate) fn into_name(self, fallback: &str) -> Result<String, ApiError> {
        if !self.success {
            let message = self.error.unwrap_or_else(|| "Unknown error".to_string());
            return Err(ApiError::Rejected(message));
        }
        let name = self
            .folder
            .map(|f| f.name)
            .or(self.article.map(|a| a.title))
            .unwrap_or_else(|| fallback.to_string());
        Ok(name)
    }
}

/// HTTP collaborator for one server.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    routes: Routes,
}

impl HttpClient {
    /// Client for the server at `base_url` with a 30 second timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            routes: Routes::new(base_url),
        })
    }

    /// The route table.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            tracing::warn!(%url, status = status.as_u16(), "request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.send(request)?
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn article_route(
        document: &DocumentId,
        route: impl FnOnce(&str, ArticleId) -> String,
    ) -> Result<String, ApiError> {
        match document {
            DocumentId::Article {
                project,
                article_id,
            } => Ok(route(project, *article_id)),
            DocumentId::Project { .. } => Err(ApiError::Rejected(
                "operation requires an article".to_string(),
            )),
        }
    }
}

/// The upload form answers with a redirect to the media page; a rejected file lands there with
/// `?error=<message>`.
pub(crate) fn upload_error(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "error")
        .map(|(_, message)| message.into_owned())
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

impl ContentStore for HttpClient {
    fn save(&self, document: &DocumentId, body: &str) -> Result<(), ApiError> {
        let url = self.routes.save(document);
        tracing::debug!(%url, "saving body");
        let form = [(Routes::save_field(document), body)];
        self.send(self.client.post(&url).form(&form))?;
        Ok(())
    }

    fn set_reference_field(
        &self,
        document: &DocumentId,
        field_id: FieldId,
        change: &FieldChange,
    ) -> Result<(), ApiError> {
        let url = Self::article_route(document, |p, a| self.routes.set_prompt(p, a))?;
        let request = SetPromptRequest {
            prompt_id: field_id,
            value: change.value.as_deref(),
            linked_article_id: change.linked_article_id,
        };
        self.send(self.client.post(&url).json(&request))?;
        Ok(())
    }

    fn set_featured_media(&self, document: &DocumentId, filename: &str) -> Result<(), ApiError> {
        let url = Self::article_route(document, |p, a| self.routes.set_image(p, a))?;
        let request = SetImageRequest {
            featured_image: filename,
        };
        self.send(self.client.post(&url).json(&request))?;
        Ok(())
    }

    fn rename_folder(
        &self,
        project: &str,
        folder_id: FolderId,
        name: &str,
    ) -> Result<String, ApiError> {
        let url = self.routes.rename_folder(project, folder_id);
        let response: RenameResponse =
            self.get_json(self.client.post(&url).form(&[("name", name)]))?;
        response.into_name(name)
    }

    fn rename_article(
        &self,
        project: &str,
        article_id: ArticleId,
        title: &str,
    ) -> Result<String, ApiError> {
        let url = self.routes.rename_article(project, article_id);
        let response: RenameResponse =
            self.get_json(self.client.post(&url).form(&[("title", title)]))?;
        response.into_name(title)
    }

    fn upload_media(
        &self,
        project: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<MediaFile, ApiError> {
        let url = self.routes.upload_media(project);
        tracing::debug!(%url, filename, size = bytes.len(), "uploading media");
        let part = Part::bytes(bytes.to_vec()).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let response = self.send(self.client.post(&url).multipart(form))?;
        if let Some(message) = upload_error(response.url()) {
            tracing::warn!(filename, %message, "upload rejected");
            return Err(ApiError::Rejected(message));
        }
        Ok(MediaFile {
            filename: filename.to_string(),
            url: media_url(project, filename),
        })
    }
}

impl ListingApi for HttpClient {
    fn list_media(&self, project: &str) -> Result<Vec<MediaFile>, ApiError> {
        self.get_json(self.client.get(self.routes.media(project)))
    }

    fn list_articles(
        &self,
        project: &str,
        exclude: Option<ArticleId>,
    ) -> Result<Vec<ArticleSummary>, ApiError> {
        let mut request = self.client.get(self.routes.articles(project));
        if let Some(id) = exclude {
            request = request.query(&[("exclude", id)]);
        }
        self.get_json(request)
    }
}

impl SearchApi for HttpClient {
    fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        let request = self.client.get(self.routes.search()).query(&[("q", query)]);
        self.get_json(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_prompt_body() {
        let body = serde_json::to_value(SetPromptRequest {
            prompt_id: 4,
            value: None,
            linked_article_id: Some(9),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"prompt_id": 4, "value": null, "linked_article_id": 9})
        );
    }

    #[test]
    fn test_rename_response_success() {
        let response: RenameResponse =
            serde_json::from_str(r#"{"success": true, "folder": {"name": "Places"}}"#).unwrap();
        assert_eq!(response.into_name("x"), Ok("Places".to_string()));

        let response: RenameResponse =
            serde_json::from_str(r#"{"success": true, "article": {"title": "Intro"}}"#).unwrap();
        assert_eq!(response.into_name("x"), Ok("Intro".to_string()));
    }

    #[test]
    fn test_rename_response_rejected() {
        let response: RenameResponse =
            serde_json::from_str(r#"{"success": false, "error": "Name taken"}"#).unwrap();
        assert_eq!(
            response.into_name("x"),
            Err(ApiError::Rejected("Name taken".to_string()))
        );

        let response: RenameResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(
            response.into_name("x"),
            Err(ApiError::Rejected("Unknown error".to_string()))
        );
    }

    #[test]
    fn test_upload_redirect_error() {
        let rejected = Url::parse(
            "http://h/projects/demo/media?error=Unsupported+file+type.+Upload+PNG%2C+JPG",
        )
        .unwrap();
        assert_eq!(
            upload_error(&rejected),
            Some("Unsupported file type. Upload PNG, JPG".to_string())
        );

        let stored = Url::parse("http://h/projects/demo/media").unwrap();
        assert_eq!(upload_error(&stored), None);
    }

    #[test]
    fn test_project_document_has_no_article_routes() {
        let routes = Routes::new("http://h");
        let result = HttpClient::article_route(&DocumentId::project("demo"), |p, a| {
            routes.set_image(p, a)
        });
        assert!(matches!(result, Err(ApiError::Rejected(_))));
    }
}

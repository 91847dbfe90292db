//! Server collaborators: content storage, listings and search.
//!
//! The core only talks to the server through these traits. `mdedit-http` provides blocking
//! HTTP implementations; tests and offline hosts implement them in memory.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Article primary key.
pub type ArticleId = i64;
/// Folder primary key.
pub type FolderId = i64;
/// Structured field (prompt) primary key.
pub type FieldId = i64;

/// The document a session edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentId {
    /// An article's markdown body.
    Article {
        /// Project slug.
        project: String,
        /// Article id.
        article_id: ArticleId,
    },
    /// A project's markdown description.
    Project {
        /// Project slug.
        project: String,
    },
}

impl DocumentId {
    /// Article document.
    pub fn article(project: impl Into<String>, article_id: ArticleId) -> Self {
        DocumentId::Article {
            project: project.into(),
            article_id,
        }
    }

    /// Project description document.
    pub fn project(project: impl Into<String>) -> Self {
        DocumentId::Project {
            project: project.into(),
        }
    }

    /// The owning project slug.
    pub fn project_slug(&self) -> &str {
        match self {
            DocumentId::Article { project, .. } | DocumentId::Project { project } => project,
        }
    }

    /// The article id, for article documents.
    pub fn article_id(&self) -> Option<ArticleId> {
        match self {
            DocumentId::Article { article_id, .. } => Some(*article_id),
            DocumentId::Project { .. } => None,
        }
    }
}

/// A media file as listed by `GET /projects/{p}/api/media`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// File name inside the project's media folder.
    pub filename: String,
    /// URL serving the file.
    pub url: String,
}

/// An article as listed by `GET /projects/{p}/api/articles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// URL slug.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Article type name (e.g. `NPC`, `Location`).
    #[serde(default)]
    pub type_name: String,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display title.
    pub title: String,
    /// Link target.
    pub url: String,
    /// Result type label (`Project`, `Media`, an article type, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Plain-text excerpt around the match.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Thumbnail URL for media hits.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Owning project name.
    #[serde(default)]
    pub project: Option<String>,
}

/// Response of `GET /api/search?q=...`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The (trimmed) query the server answered.
    #[serde(default)]
    pub query: String,
    /// Hits, already ranked and capped by the server.
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// A pending structured-field edit.
///
/// Text prompts carry `value`; select prompts carry `linked_article_id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldChange {
    /// New text value (`None` clears it).
    pub value: Option<String>,
    /// New linked article (`None` clears it).
    pub linked_article_id: Option<ArticleId>,
}

impl FieldChange {
    /// Change of a text prompt; an empty string clears the value.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            value: (!value.is_empty()).then_some(value),
            linked_article_id: None,
        }
    }

    /// Change of a select prompt.
    pub fn linked(article_id: Option<ArticleId>) -> Self {
        Self {
            value: None,
            linked_article_id: article_id,
        }
    }
}

/// Content storage collaborator.
pub trait ContentStore {
    /// Persist the markdown body of `document`.
    fn save(&self, document: &DocumentId, body: &str) -> Result<(), ApiError>;

    /// Persist one structured field of an article.
    fn set_reference_field(
        &self,
        document: &DocumentId,
        field_id: FieldId,
        change: &FieldChange,
    ) -> Result<(), ApiError>;

    /// Set the featured image of an article.
    fn set_featured_media(&self, document: &DocumentId, filename: &str) -> Result<(), ApiError>;

    /// Rename a folder, returning the stored name.
    fn rename_folder(
        &self,
        project: &str,
        folder_id: FolderId,
        name: &str,
    ) -> Result<String, ApiError>;

    /// Rename an article, returning the stored title.
    fn rename_article(
        &self,
        project: &str,
        article_id: ArticleId,
        title: &str,
    ) -> Result<String, ApiError>;

    /// Upload an image into the project's media folder.
    fn upload_media(
        &self,
        project: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<MediaFile, ApiError>;
}

/// Listing collaborator.
pub trait ListingApi {
    /// Media files of a project.
    fn list_media(&self, project: &str) -> Result<Vec<MediaFile>, ApiError>;

    /// Articles of a project, optionally excluding one (the article being edited).
    fn list_articles(
        &self,
        project: &str,
        exclude: Option<ArticleId>,
    ) -> Result<Vec<ArticleSummary>, ApiError>;
}

/// Search collaborator.
pub trait SearchApi {
    /// Global search across projects, articles and media.
    fn search(&self, query: &str) -> Result<SearchResponse, ApiError>;
}

impl<T: ContentStore + ?Sized> ContentStore for &T {
    fn save(&self, document: &DocumentId, body: &str) -> Result<(), ApiError> {
        (**self).save(document, body)
    }

    fn set_reference_field(
        &self,
        document: &DocumentId,
        field_id: FieldId,
        change: &FieldChange,
    ) -> Result<(), ApiError> {
        (**self).set_reference_field(document, field_id, change)
    }

    fn set_featured_media(&self, document: &DocumentId, filename: &str) -> Result<(), ApiError> {
        (**self).set_featured_media(document, filename)
    }

    fn rename_folder(
        &self,
        project: &str,
        folder_id: FolderId,
        name: &str,
    ) -> Result<String, ApiError> {
        (**self).rename_folder(project, folder_id, name)
    }

    fn rename_article(
        &self,
        project: &str,
        article_id: ArticleId,
        title: &str,
    ) -> Result<String, ApiError> {
        (**self).rename_article(project, article_id, title)
    }

    fn upload_media(
        &self,
        project: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<MediaFile, ApiError> {
        (**self).upload_media(project, filename, bytes)
    }
}

impl<T: ListingApi + ?Sized> ListingApi for &T {
    fn list_media(&self, project: &str) -> Result<Vec<MediaFile>, ApiError> {
        (**self).list_media(project)
    }

    fn list_articles(
        &self,
        project: &str,
        exclude: Option<ArticleId>,
    ) -> Result<Vec<ArticleSummary>, ApiError> {
        (**self).list_articles(project, exclude)
    }
}

impl<T: SearchApi + ?Sized> SearchApi for &T {
    fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        (**self).search(query)
    }
}

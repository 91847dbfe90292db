//! Server route table.

use mdedit_core::{ArticleId, DocumentId, FolderId};

/// Builds absolute URLs for the server routes under one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    base: String,
}

impl Routes {
    /// Routes under `base` (a trailing `/` is ignored).
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// The normalized base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Body save: the article edit form or the project description form.
    pub fn save(&self, document: &DocumentId) -> String {
        match document {
            DocumentId::Article {
                project,
                article_id,
            } => self.url(&format!("/projects/{project}/a/{article_id}/edit")),
            DocumentId::Project { project } => self.url(&format!("/projects/{project}/edit")),
        }
    }

    /// Form field carrying the body for [`Routes::save`].
    pub fn save_field(document: &DocumentId) -> &'static str {
        match document {
            DocumentId::Article { .. } => "body_content",
            DocumentId::Project { .. } => "description",
        }
    }

    /// Structured field update of an article.
    pub fn set_prompt(&self, project: &str, article_id: ArticleId) -> String {
        self.url(&format!("/projects/{project}/a/{article_id}/api/set-prompt"))
    }

    /// Featured image update of an article.
    pub fn set_image(&self, project: &str, article_id: ArticleId) -> String {
        self.url(&format!("/projects/{project}/a/{article_id}/api/set-image"))
    }

    /// Folder rename.
    pub fn rename_folder(&self, project: &str, folder_id: FolderId) -> String {
        self.url(&format!("/projects/{project}/folders/{folder_id}/rename"))
    }

    /// Article rename.
    pub fn rename_article(&self, project: &str, article_id: ArticleId) -> String {
        self.url(&format!("/projects/{project}/articles/{article_id}/rename"))
    }

    /// Media listing.
    pub fn media(&self, project: &str) -> String {
        self.url(&format!("/projects/{project}/api/media"))
    }

    /// Media upload form (multipart, field `file`).
    pub fn upload_media(&self, project: &str) -> String {
        self.url(&format!("/projects/{project}/media/upload"))
    }

    /// Article listing.
    pub fn articles(&self, project: &str) -> String {
        self.url(&format!("/projects/{project}/api/articles"))
    }

    /// Global search.
    pub fn search(&self) -> String {
        self.url("/api/search")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_trailing_slash() {
        let routes = Routes::new("http://localhost:8000//");
        assert_eq!(routes.base(), "http://localhost:8000");
        assert_eq!(routes.search(), "http://localhost:8000/api/search");
    }

    #[test]
    fn test_save_routes() {
        let routes = Routes::new("http://h");
        let article = DocumentId::article("demo", 12);
        let project = DocumentId::project("demo");
        assert_eq!(routes.save(&article), "http://h/projects/demo/a/12/edit");
        assert_eq!(Routes::save_field(&article), "body_content");
        assert_eq!(routes.save(&project), "http://h/projects/demo/edit");
        assert_eq!(Routes::save_field(&project), "description");
    }

    #[test]
    fn test_article_api_routes() {
        let routes = Routes::new("http://h");
        assert_eq!(
            routes.set_prompt("demo", 3),
            "http://h/projects/demo/a/3/api/set-prompt"
        );
        assert_eq!(
            routes.set_image("demo", 3),
            "http://h/projects/demo/a/3/api/set-image"
        );
        assert_eq!(
            routes.rename_folder("demo", 8),
            "http://h/projects/demo/folders/8/rename"
        );
        assert_eq!(
            routes.rename_article("demo", 3),
            "http://h/projects/demo/articles/3/rename"
        );
    }

    #[test]
    fn test_media_routes() {
        let routes = Routes::new("http://h/");
        assert_eq!(routes.media("demo"), "http://h/projects/demo/api/media");
        assert_eq!(
            routes.upload_media("demo"),
            "http://h/projects/demo/media/upload"
        );
    }
}

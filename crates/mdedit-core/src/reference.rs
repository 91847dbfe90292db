//! Media and article reference pickers.
//!
//! A picker fetches its list once per session, caches it, and filters the cache on every
//! keystroke. Loading can be driven synchronously through a [`ReferenceProvider`] or split into
//! [`ReferencePicker::begin_load`] / [`ReferencePicker::complete_load`] by hosts that run the
//! request elsewhere.

use crate::api::{ArticleId, ArticleSummary, ListingApi, MediaFile};
use crate::error::ApiError;

/// Which list a picker shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// Project media files.
    Media,
    /// Project articles.
    Article,
}

impl ReferenceKind {
    /// Lowercase name used in log messages and alerts.
    pub fn name(self) -> &'static str {
        match self {
            ReferenceKind::Media => "media",
            ReferenceKind::Article => "articles",
        }
    }
}

/// Uniform list entry for both media files and articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    /// Filename (media) or slug (article).
    pub identifier: String,
    /// Text shown and matched by the filter.
    pub label: String,
    /// Thumbnail URL (media) or type name (article).
    pub secondary_label: String,
}

impl ReferenceItem {
    /// The markdown inserted when this item is picked.
    pub fn markdown(&self, kind: ReferenceKind) -> String {
        match kind {
            ReferenceKind::Media => format!("![image](media/{})", self.identifier),
            ReferenceKind::Article => format!("[{}](article:{})", self.label, self.identifier),
        }
    }
}

impl From<MediaFile> for ReferenceItem {
    fn from(file: MediaFile) -> Self {
        Self {
            label: file.filename.clone(),
            identifier: file.filename,
            secondary_label: file.url,
        }
    }
}

impl From<ArticleSummary> for ReferenceItem {
    fn from(article: ArticleSummary) -> Self {
        Self {
            identifier: article.slug,
            label: article.title,
            secondary_label: article.type_name,
        }
    }
}

/// Source of reference lists.
pub trait ReferenceProvider {
    /// Fetch the full list for `kind`.
    fn fetch_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>, ApiError>;
}

/// [`ReferenceProvider`] backed by a [`ListingApi`] for one project.
#[derive(Debug, Clone)]
pub struct ProjectReferences<L> {
    listing: L,
    project: String,
    exclude_article: Option<ArticleId>,
}

impl<L: ListingApi> ProjectReferences<L> {
    /// Provider for `project`.
    pub fn new(listing: L, project: impl Into<String>) -> Self {
        Self {
            listing,
            project: project.into(),
            exclude_article: None,
        }
    }

    /// Leave `article_id` out of article listings (an article should not link to itself).
    pub fn excluding(mut self, article_id: ArticleId) -> Self {
        self.exclude_article = Some(article_id);
        self
    }
}

impl<L: ListingApi> ReferenceProvider for ProjectReferences<L> {
    fn fetch_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>, ApiError> {
        let items = match kind {
            ReferenceKind::Media => self
                .listing
                .list_media(&self.project)?
                .into_iter()
                .map(ReferenceItem::from)
                .collect(),
            ReferenceKind::Article => self
                .listing
                .list_articles(&self.project, self.exclude_article)?
                .into_iter()
                .map(ReferenceItem::from)
                .collect(),
        };
        Ok(items)
    }
}

/// Load status of a picker's cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// The cache is populated.
    Ready,
    /// The last request failed; no automatic retry.
    Failed(String),
}

/// What a view should render for a picker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceListing<'a> {
    /// Waiting for the first response.
    Loading,
    /// The load failed.
    Failed(&'a str),
    /// Loaded, but nothing matches (or the list is empty).
    Empty,
    /// Items matching the current filter.
    Items(Vec<&'a ReferenceItem>),
}

/// Case-insensitive substring filter on `label`.
pub fn filter_items<'a>(items: &'a [ReferenceItem], term: &str) -> Vec<&'a ReferenceItem> {
    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|item| item.label.to_lowercase().contains(&needle))
        .collect()
}

/// Cached, filterable reference list.
#[derive(Debug, Clone)]
pub struct ReferencePicker {
    kind: ReferenceKind,
    cache: Option<Vec<ReferenceItem>>,
    state: LoadState,
    term: String,
}

impl ReferencePicker {
    /// Empty picker for `kind`.
    pub fn new(kind: ReferenceKind) -> Self {
        Self {
            kind,
            cache: None,
            state: LoadState::Idle,
            term: String::new(),
        }
    }

    /// Which list this picker shows.
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Current load state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Current filter term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether a list has been cached this session.
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Mark a load as started. Returns `false` when the cache exists or a load is in flight.
    pub fn begin_load(&mut self) -> bool {
        if self.cache.is_some() || self.state == LoadState::Loading {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Store a load result. A late response simply overwrites the cache.
    pub fn complete_load(&mut self, result: Result<Vec<ReferenceItem>, ApiError>) -> &LoadState {
        match result {
            Ok(items) => {
                tracing::debug!(kind = self.kind.name(), count = items.len(), "references loaded");
                self.cache = Some(items);
                self.state = LoadState::Ready;
            }
            Err(err) => {
                tracing::warn!(kind = self.kind.name(), error = %err, "failed to load references");
                self.state = LoadState::Failed(err.to_string());
            }
        }
        &self.state
    }

    /// Load through `provider` unless already cached or loading.
    ///
    /// Returns `Ok(true)` when a fetch happened.
    pub fn load(&mut self, provider: &dyn ReferenceProvider) -> Result<bool, ApiError> {
        if !self.begin_load() {
            return Ok(false);
        }
        let result = provider.fetch_references(self.kind);
        let outcome = result.as_ref().map(|_| true).map_err(Clone::clone);
        self.complete_load(result);
        outcome
    }

    /// Update the filter term. Never touches the network.
    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    /// Items matching the current filter (empty when nothing is cached).
    pub fn visible(&self) -> Vec<&ReferenceItem> {
        match &self.cache {
            Some(items) => filter_items(items, &self.term),
            None => Vec::new(),
        }
    }

    /// The `index`-th visible item.
    pub fn visible_item(&self, index: usize) -> Option<&ReferenceItem> {
        self.visible().into_iter().nth(index)
    }

    /// Render model for the current state.
    pub fn listing(&self) -> ReferenceListing<'_> {
        match (&self.cache, &self.state) {
            (None, LoadState::Failed(message)) => ReferenceListing::Failed(message),
            (None, _) => ReferenceListing::Loading,
            (Some(_), _) => {
                let items = self.visible();
                if items.is_empty() {
                    ReferenceListing::Empty
                } else {
                    ReferenceListing::Items(items)
                }
            }
        }
    }

    /// Drop the cache so the next load fetches again. The filter term survives.
    pub fn invalidate(&mut self) {
        self.cache = None;
        self.state = LoadState::Idle;
    }

    /// Drop the cache and filter (end of session).
    pub fn reset(&mut self) {
        self.cache = None;
        self.state = LoadState::Idle;
        self.term.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingProvider {
        calls: Cell<usize>,
        fail: bool,
    }

    impl ReferenceProvider for CountingProvider {
        fn fetch_references(&self, _kind: ReferenceKind) -> Result<Vec<ReferenceItem>, ApiError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ApiError::Transport("offline".to_string()));
            }
            Ok(vec![item("Category"), item("Dog")])
        }
    }

    fn item(label: &str) -> ReferenceItem {
        ReferenceItem {
            identifier: label.to_lowercase(),
            label: label.to_string(),
            secondary_label: String::new(),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let items = vec![item("Category"), item("Dog")];
        let hits = filter_items(&items, "cat");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "Category");
        assert_eq!(filter_items(&items, "").len(), 2);
    }

    #[test]
    fn test_load_once_per_session() {
        let provider = CountingProvider {
            calls: Cell::new(0),
            fail: false,
        };
        let mut picker = ReferencePicker::new(ReferenceKind::Article);
        assert_eq!(picker.load(&provider), Ok(true));
        assert_eq!(picker.load(&provider), Ok(false));
        picker.set_filter("DOG");
        assert_eq!(picker.visible().len(), 1);
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn test_failed_load_retries_only_on_next_open() {
        let provider = CountingProvider {
            calls: Cell::new(0),
            fail: true,
        };
        let mut picker = ReferencePicker::new(ReferenceKind::Media);
        assert!(picker.load(&provider).is_err());
        assert!(matches!(picker.listing(), ReferenceListing::Failed(_)));
        assert_eq!(provider.calls.get(), 1);

        // Filtering never triggers a fetch.
        picker.set_filter("x");
        assert_eq!(provider.calls.get(), 1);

        // An explicit reopen tries again because nothing is cached.
        assert!(picker.load(&provider).is_err());
        assert_eq!(provider.calls.get(), 2);
    }

    #[test]
    fn test_begin_load_blocks_duplicate_requests() {
        let mut picker = ReferencePicker::new(ReferenceKind::Media);
        assert!(picker.begin_load());
        assert!(!picker.begin_load());
        assert_eq!(picker.listing(), ReferenceListing::Loading);
        picker.complete_load(Ok(vec![]));
        assert_eq!(picker.listing(), ReferenceListing::Empty);
    }

    #[test]
    fn test_markdown_for_kinds() {
        let media = ReferenceItem::from(MediaFile {
            filename: "map.png".to_string(),
            url: "/projects/p/media/files/map.png".to_string(),
        });
        assert_eq!(media.markdown(ReferenceKind::Media), "![image](media/map.png)");

        let article = ReferenceItem::from(ArticleSummary {
            slug: "old-mill".to_string(),
            title: "The Old Mill".to_string(),
            type_name: "Location".to_string(),
        });
        assert_eq!(
            article.markdown(ReferenceKind::Article),
            "[The Old Mill](article:old-mill)"
        );
    }
}

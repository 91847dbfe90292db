//! Global search modal state with a debounced query.
//!
//! The controller is clock-agnostic: callers pass `now` into [`SearchController::input`] and
//! [`SearchController::poll`], and deliver responses through [`SearchController::complete`].
//! A response whose query no longer matches the input is dropped.

use crate::api::{SearchApi, SearchResponse, SearchResult};
use crate::error::ApiError;
use crate::text::char_ranges;
use regex::{Regex, RegexBuilder};
use std::time::{Duration, Instant};

/// Default delay between the last keystroke and the request.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What the results pane shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchView {
    /// Empty input.
    #[default]
    Idle,
    /// A request is pending or in flight.
    Loading,
    /// Ranked hits.
    Results(Vec<SearchResult>),
    /// The server found nothing.
    NoResults,
    /// The request failed.
    Failed,
}

impl SearchView {
    /// Placeholder text for non-result states.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SearchView::Idle => Some("Type to search..."),
            SearchView::Loading => Some("Searching..."),
            SearchView::NoResults => Some("No results found."),
            SearchView::Failed => Some("Search failed. Please try again."),
            SearchView::Results(_) => None,
        }
    }
}

/// Search modal controller.
#[derive(Debug, Clone)]
pub struct SearchController {
    open: bool,
    input: String,
    query: String,
    due: Option<(Instant, String)>,
    debounce: Duration,
    view: SearchView,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchController {
    /// Closed controller with the given debounce delay.
    pub fn new(debounce: Duration) -> Self {
        Self {
            open: false,
            input: String::new(),
            query: String::new(),
            due: None,
            debounce,
            view: SearchView::Idle,
        }
    }

    /// Whether the modal is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Raw input text.
    pub fn input_text(&self) -> &str {
        &self.input
    }

    /// The trimmed query the view currently reflects.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results pane state.
    pub fn view(&self) -> &SearchView {
        &self.view
    }

    /// Show the modal (Alt+K).
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the modal (Escape, backdrop click), clearing input, results and any pending request.
    pub fn close(&mut self) {
        self.open = false;
        self.input.clear();
        self.query.clear();
        self.due = None;
        self.view = SearchView::Idle;
    }

    /// A keystroke changed the input. Supersedes any request not yet sent.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.input = text.into();
        self.query = self.input.trim().to_string();
        if self.query.is_empty() {
            self.due = None;
            self.view = SearchView::Idle;
        } else {
            self.due = Some((now + self.debounce, self.query.clone()));
            self.view = SearchView::Loading;
        }
    }

    /// When the pending request becomes due, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.due.as_ref().map(|(at, _)| *at)
    }

    /// The query to send, once its debounce has elapsed. Each query is returned once.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.deadline().is_some_and(|at| now >= at) {
            self.due.take().map(|(_, query)| query)
        } else {
            None
        }
    }

    /// Deliver the response for `query`. Returns `false` when the response was stale.
    pub fn complete(&mut self, query: &str, result: Result<SearchResponse, ApiError>) -> bool {
        if !self.open || query != self.query {
            tracing::debug!(query, current = %self.query, "discarding stale search response");
            return false;
        }
        self.view = match result {
            Ok(response) if response.results.is_empty() => SearchView::NoResults,
            Ok(response) => SearchView::Results(response.results),
            Err(err) => {
                tracing::warn!(query, error = %err, "search failed");
                SearchView::Failed
            }
        };
        true
    }

    /// Poll and, if a query is due, run it synchronously through `api`.
    pub fn run_due<A: SearchApi>(&mut self, api: &A, now: Instant) -> bool {
        let Some(query) = self.poll(now) else {
            return false;
        };
        let result = api.search(&query);
        self.complete(&query, result)
    }
}

fn match_regex(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Char ranges of case-insensitive, literal occurrences of `query` in `text`.
pub fn highlight_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let Some(re) = match_regex(query) else {
        return Vec::new();
    };
    char_ranges(text, re.find_iter(text).map(|m| (m.start(), m.end())))
}

/// `text` with every match of `query` wrapped in `<mark>`; all other text is HTML-escaped.
pub fn highlight_markup(text: &str, query: &str) -> String {
    let Some(re) = match_regex(query) else {
        return escape_html(text);
    };

    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&escape_html(&text[last..m.start()]));
        out.push_str("<mark>");
        out.push_str(&escape_html(m.as_str()));
        out.push_str("</mark>");
        last = m.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

//! Background thread running blocking HTTP calls so the UI loop never stalls.

use mdedit_core::{
    ApiError, ArticleId, ProjectReferences, ReferenceItem, ReferenceKind, ReferenceProvider,
    SearchApi, SearchResponse,
};
use mdedit_http::HttpClient;
use std::sync::mpsc;
use std::thread;

/// Work sent to the background thread.
#[derive(Debug)]
pub enum Request {
    References(ReferenceKind),
    Search(String),
}

/// Results coming back.
#[derive(Debug)]
pub enum Reply {
    References(ReferenceKind, Result<Vec<ReferenceItem>, ApiError>),
    Search(String, Result<SearchResponse, ApiError>),
}

pub struct Worker {
    tx: mpsc::Sender<Request>,
    rx: mpsc::Receiver<Reply>,
}

impl Worker {
    pub fn spawn(client: HttpClient, project: String, exclude: Option<ArticleId>) -> Self {
        let (tx_req, rx_req) = mpsc::channel::<Request>();
        let (tx_reply, rx_reply) = mpsc::channel::<Reply>();

        thread::spawn(move || worker_loop(client, project, exclude, rx_req, tx_reply));

        Self {
            tx: tx_req,
            rx: rx_reply,
        }
    }

    /// Queue a request. Returns `false` if the thread has exited.
    pub fn send(&self, request: Request) -> bool {
        self.tx.send(request).is_ok()
    }

    pub fn try_recv(&self) -> Option<Reply> {
        self.rx.try_recv().ok()
    }
}

fn worker_loop(
    client: HttpClient,
    project: String,
    exclude: Option<ArticleId>,
    rx: mpsc::Receiver<Request>,
    tx: mpsc::Sender<Reply>,
) {
    let search = client.clone();
    let mut references = ProjectReferences::new(client, project);
    if let Some(id) = exclude {
        references = references.excluding(id);
    }

    for request in rx {
        tracing::debug!(?request, "worker request");
        let reply = match request {
            Request::References(kind) => {
                Reply::References(kind, references.fetch_references(kind))
            }
            Request::Search(query) => {
                let result = search.search(&query);
                Reply::Search(query, result)
            }
        };
        if tx.send(reply).is_err() {
            break;
        }
    }
    tracing::debug!("worker exiting");
}

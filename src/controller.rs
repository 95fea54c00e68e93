//! Search screen state and the controller that drives it.
//!
//! [`update`] is a pure reducer over immutable [`SearchState`] snapshots. It
//! never performs I/O; fetches come back as an [`Effect`] which the
//! [`Controller`] runs on a tokio task and feeds back as [`Event::Completed`].

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::RecipeSource;
use crate::config::{AppConfig, OverlapPolicy};
use crate::error::{FailureKind, FetchError};
use crate::model::Recipe;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    Random,
    ByLetter(String),
}

#[derive(Debug)]
pub enum Event {
    /// The query text changed; never fetches
    QueryEdited(String),
    /// Search by the first letter of the current query
    SearchSubmitted,
    RandomRequested,
    Completed {
        request: RequestId,
        outcome: Result<Recipe, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start `request`, aborting every request in `cancel` first
    Fetch {
        request: RequestId,
        kind: FetchKind,
        cancel: Vec<RequestId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Shown,
}

/// Snapshot of the search screen
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    recipe: Option<Arc<Recipe>>,
    pending: Vec<RequestId>,
    next_request: RequestId,
    last_failure: Option<FailureKind>,
    overlap: OverlapPolicy,
    live_filter: bool,
    /// Set by a query edit that no longer matches the shown recipe
    hidden: bool,
}

impl SearchState {
    pub fn new(overlap: OverlapPolicy, live_filter: bool) -> Self {
        Self {
            overlap,
            live_filter,
            ..Default::default()
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.overlap, config.live_filter)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The recipe in the display slot, if it should currently be shown
    pub fn recipe(&self) -> Option<&Recipe> {
        if self.hidden {
            return None;
        }
        self.recipe.as_deref()
    }

    pub fn status(&self) -> Status {
        if !self.pending.is_empty() {
            Status::Loading
        } else if self.recipe().is_some() {
            Status::Shown
        } else {
            Status::Idle
        }
    }

    pub fn pending(&self) -> &[RequestId] {
        &self.pending
    }

    pub fn is_pending(&self, request: RequestId) -> bool {
        self.pending.contains(&request)
    }

    /// Why the last completed fetch produced nothing, if it did
    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }

    pub fn overlap(&self) -> OverlapPolicy {
        self.overlap
    }

    pub fn live_filter(&self) -> bool {
        self.live_filter
    }

    fn issue(&mut self, kind: FetchKind) -> Effect {
        let request = self.next_request;
        self.next_request += 1;

        let cancel = match self.overlap {
            OverlapPolicy::Supersede => std::mem::take(&mut self.pending),
            OverlapPolicy::LastWriteWins => Vec::new(),
        };
        self.pending.push(request);

        debug!("Issuing request {} ({:?}), cancelling {:?}", request, kind, cancel);
        Effect::Fetch {
            request,
            kind,
            cancel,
        }
    }
}

/// First character of the query, or an empty string
pub fn first_letter(query: &str) -> String {
    query.chars().next().map(String::from).unwrap_or_default()
}

/// Applies `event` to `state`, returning the next snapshot and any fetch to start
pub fn update(state: &SearchState, event: Event) -> (SearchState, Option<Effect>) {
    let mut next = state.clone();

    match event {
        Event::QueryEdited(text) => {
            next.query = text;
            next.hidden = next.live_filter
                && next
                    .recipe
                    .as_deref()
                    .is_some_and(|recipe| !recipe.name_matches(&next.query));
            (next, None)
        }
        Event::SearchSubmitted => {
            let letter = first_letter(&next.query);
            let effect = next.issue(FetchKind::ByLetter(letter));
            (next, Some(effect))
        }
        Event::RandomRequested => {
            let effect = next.issue(FetchKind::Random);
            (next, Some(effect))
        }
        Event::Completed { request, outcome } => {
            if !next.is_pending(request) {
                debug!("Dropping stale completion for request {}", request);
                return (next, None);
            }
            next.pending.retain(|id| *id != request);
            next.hidden = false;

            match outcome {
                Ok(recipe) => {
                    next.recipe = Some(Arc::new(recipe));
                    next.last_failure = None;
                }
                Err(e) => {
                    next.recipe = None;
                    next.last_failure = Some(e.kind());
                }
            }
            (next, None)
        }
    }
}

/// A finished fetch on its way back to the controller
#[derive(Debug)]
pub struct Completion {
    pub request: RequestId,
    pub outcome: Result<Recipe, FetchError>,
}

/// Owns the search state and runs its fetches.
///
/// Each fetch is spawned with `tokio::spawn`, so `submit_search`,
/// `request_random` and everything that awaits completions must be called
/// from within a tokio runtime.
pub struct Controller {
    source: Arc<dyn RecipeSource>,
    state: SearchState,
    tasks: HashMap<RequestId, JoinHandle<()>>,
    sender: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl Controller {
    pub fn new(source: Arc<dyn RecipeSource>, state: SearchState) -> Self {
        let (sender, completions) = mpsc::unbounded_channel();
        Self {
            source,
            state,
            tasks: HashMap::new(),
            sender,
            completions,
        }
    }

    pub fn from_config(source: Arc<dyn RecipeSource>, config: &AppConfig) -> Self {
        Self::new(source, SearchState::from_config(config))
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn edit_query(&mut self, text: impl Into<String>) {
        self.dispatch(Event::QueryEdited(text.into()));
    }

    /// Spawns a fetch; panics outside a tokio runtime
    pub fn submit_search(&mut self) {
        self.dispatch(Event::SearchSubmitted);
    }

    /// Spawns a fetch; panics outside a tokio runtime
    pub fn request_random(&mut self) {
        self.dispatch(Event::RandomRequested);
    }

    /// Wait for the next fetch to finish
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions.recv().await
    }

    /// Fold a finished fetch into the state. Returns false if it was stale.
    pub fn apply(&mut self, completion: Completion) -> bool {
        self.tasks.remove(&completion.request);
        let applied = self.state.is_pending(completion.request);
        self.dispatch(Event::Completed {
            request: completion.request,
            outcome: completion.outcome,
        });
        applied
    }

    /// Apply completions until no request is pending
    pub async fn settle(&mut self) {
        while !self.state.pending().is_empty() {
            match self.completions.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
    }

    fn dispatch(&mut self, event: Event) {
        let (next, effect) = update(&self.state, event);
        self.state = next;
        if let Some(effect) = effect {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch {
                request,
                kind,
                cancel,
            } => {
                for id in cancel {
                    if let Some(handle) = self.tasks.remove(&id) {
                        debug!("Aborting superseded request {}", id);
                        handle.abort();
                    }
                }

                let source = Arc::clone(&self.source);
                let sender = self.sender.clone();
                let handle = tokio::spawn(async move {
                    let guard = CompletionGuard {
                        request,
                        sender: Some(sender),
                    };
                    let outcome = match kind {
                        FetchKind::Random => source.random().await,
                        FetchKind::ByLetter(letter) => source.by_first_letter(&letter).await,
                    };
                    guard.finish(outcome);
                });
                self.tasks.insert(request, handle);
            }
        }
    }
}

/// Reports `Interrupted` for a fetch task that is dropped before it finishes,
/// whether by a panic in the source or by an abort. Aborted requests are no
/// longer pending, so the reducer drops their report.
struct CompletionGuard {
    request: RequestId,
    sender: Option<mpsc::UnboundedSender<Completion>>,
}

impl CompletionGuard {
    fn finish(mut self, outcome: Result<Recipe, FetchError>) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: Result<Recipe, FetchError>) {
        if let Some(sender) = self.sender.take() {
            // The receiver only goes away with the controller.
            let _ = sender.send(Completion {
                request: self.request,
                outcome,
            });
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.send(Err(FetchError::Interrupted));
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

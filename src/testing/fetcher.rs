//! ScriptedFetcher: an in-memory [`Fetcher`] with queued replies.
//!
//! Each call to `fetch` records the endpoint and pops the next scripted
//! reply. A reply is either ready, or gated on a [`Responder`] the test
//! resolves later. With nothing scripted, a fetch stays pending forever,
//! like a server that never answers.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::fetch::{FetchError, Fetcher};

type Reply = Result<Value, FetchError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Test fetcher that answers from a script.
///
/// # Examples
///
/// ```ignore
/// let fetcher = Arc::new(ScriptedFetcher::new());
/// fetcher.respond(json!({"a": 1}));
/// let gate = fetcher.respond_later();
/// ```
#[derive(Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn respond(&self, payload: Value) {
        lock(&self.script).push_back(Scripted::Ready(Ok(payload)));
    }

    /// Queue a failing reply.
    pub fn fail(&self, error: FetchError) {
        lock(&self.script).push_back(Scripted::Ready(Err(error)));
    }

    /// Queue a reply that arrives when the returned [`Responder`] fires.
    ///
    /// Dropping the responder leaves that fetch pending forever.
    pub fn respond_later(&self) -> Responder {
        let (tx, rx) = oneshot::channel();
        lock(&self.script).push_back(Scripted::Gated(rx));
        Responder { tx }
    }

    /// Number of fetches that have started.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Endpoints requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    /// Scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

impl std::fmt::Debug for ScriptedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedFetcher")
            .field("remaining", &self.remaining())
            .field("requests", &self.requests())
            .finish()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<Value, FetchError> {
        lock(&self.requests).push(endpoint.to_owned());
        let next = {
            let mut script = lock(&self.script);
            script.pop_front()
        };
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => match rx.await {
                Ok(reply) => reply,
                Err(_) => std::future::pending().await,
            },
            None => std::future::pending().await,
        }
    }
}

/// Completes one gated fetch.
#[derive(Debug)]
pub struct Responder {
    tx: oneshot::Sender<Reply>,
}

impl Responder {
    /// Answer with a payload.
    pub fn resolve(self, payload: Value) {
        let _ = self.tx.send(Ok(payload));
    }

    /// Answer with an error.
    pub fn reject(self, error: FetchError) {
        let _ = self.tx.send(Err(error));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

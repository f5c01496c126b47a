//! Cancelable listings of object names.
//!
//! A [`Listing`] is an iterator over the names of one object kind. Dropping
//! it (or calling [`Listing::cancel`]) signals the producer exactly once, so
//! the producer can stop enumerating and release whatever it holds. The
//! consumer never waits for the producer to finish tearing down.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::Arc;
use std::thread;

use tracing::warn;

use crate::error::{BackendError, BackendResult};

type Names = Box<dyn Iterator<Item = BackendResult<String>> + Send>;
type CancelHook = Box<dyn FnOnce() + Send>;

/// One-shot cancellation signal shared between a listing and its producer.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the "running" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Returns `true` only for the call that flipped
    /// the token.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    /// Whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Producer side of a [`Listing::spawn`] listing.
#[derive(Debug)]
pub struct ListingSink {
    tx: SyncSender<BackendResult<String>>,
    token: CancelToken,
}

impl ListingSink {
    /// Emit a name. Returns `false` once the consumer has gone away; the
    /// producer must stop at that point.
    pub fn send(&self, name: impl Into<String>) -> bool {
        self.push(Ok(name.into()))
    }

    /// Emit an error for the consumer to surface unmodified.
    pub fn fail(&self, err: BackendError) -> bool {
        self.push(Err(err))
    }

    /// Whether the consumer has cancelled the listing.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn push(&self, item: BackendResult<String>) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.tx.send(item).is_ok()
    }
}

/// A cancelable, single-use sequence of object names for one kind.
pub struct Listing {
    names: Names,
    token: CancelToken,
    on_cancel: Option<CancelHook>,
    signalled: bool,
}

impl Listing {
    /// Listing over an iterator of results.
    pub fn from_results<I>(names: I) -> Self
    where
        I: IntoIterator<Item = BackendResult<String>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            names: Box::new(names.into_iter()),
            token: CancelToken::new(),
            on_cancel: None,
            signalled: false,
        }
    }

    /// Listing over plain names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self::from_results(names.into_iter().map(Ok))
    }

    /// A listing with no names.
    pub fn empty() -> Self {
        Self::from_results(std::iter::empty())
    }

    /// A listing that yields a single error.
    pub fn failed(err: BackendError) -> Self {
        Self::from_results(std::iter::once(Err(err)))
    }

    /// Run `producer` on a worker thread, feeding names through a channel
    /// bounded to `capacity` items.
    pub fn spawn<F>(capacity: usize, producer: F) -> Self
    where
        F: FnOnce(ListingSink) + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(capacity);
        let token = CancelToken::new();
        let sink = ListingSink {
            tx,
            token: token.clone(),
        };
        let spawned = thread::Builder::new()
            .name("cairn-listing".into())
            .spawn(move || producer(sink));
        if let Err(e) = spawned {
            warn!(error = %e, "failed to spawn listing worker");
            return Self::failed(BackendError::Io(e));
        }
        Self {
            names: Box::new(rx.into_iter()),
            token,
            on_cancel: None,
            signalled: false,
        }
    }

    /// Run `hook` when the listing is cancelled or dropped.
    pub fn on_cancel(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_cancel = Some(Box::new(hook));
        self
    }

    /// The token producers observe.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Signal the producer that no more names are needed. Idempotent.
    pub fn cancel(&mut self) {
        if self.signalled {
            return;
        }
        self.signalled = true;
        self.token.cancel();
        if let Some(hook) = self.on_cancel.take() {
            hook();
        }
    }
}

impl Iterator for Listing {
    type Item = BackendResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.signalled {
            return None;
        }
        self.names.next()
    }
}

impl Drop for Listing {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing")
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

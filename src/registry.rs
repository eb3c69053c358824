//! Named catalog of middleware constructors.
//!
//! Configuration refers to middleware by string key
//! (`"middleware.LoggingStdOut"`); the registry turns keys back into
//! [`Constructor`]s. Build one at startup, share it behind an `Arc`, and let
//! whatever assembles the serving pipeline look keys up in it.
//!
//! Keys are write-once. There is no overwrite and no removal: a key that is
//! registered twice means two components claimed the same name, which is a
//! wiring bug, and the second registration panics.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::middleware::{self, Constructor};

/// A concurrency-safe map from key to [`Constructor`].
///
/// Registration takes the write lock; lookups take the read lock and never
/// block each other.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Constructor>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in middleware:
    ///
    /// | Key | Constructor |
    /// |---|---|
    /// | `middleware.Panic` | [`middleware::panic_recovery`] |
    /// | `middleware.LoggingStdOut` | [`middleware::stdout_logging`] |
    /// | `middleware.LoggingStdErr` | [`middleware::stderr_logging`] |
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(middleware::PANIC, middleware::panic_recovery());
        registry.register(middleware::LOGGING_STDOUT, middleware::stdout_logging());
        registry.register(middleware::LOGGING_STDERR, middleware::stderr_logging());
        registry
    }

    /// Stores `constructor` under `key`.
    ///
    /// Passing `None` does nothing, even if `key` is already taken.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already registered, whatever the value.
    pub fn register(&self, key: impl Into<String>, constructor: impl Into<Option<Constructor>>) {
        let Some(constructor) = constructor.into() else {
            return;
        };
        let key = key.into();

        let taken = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            if entries.contains_key(&key) {
                true
            } else {
                entries.insert(key.clone(), constructor);
                false
            }
        };

        // Raised outside the guard so the lock is not poisoned for everyone else.
        if taken {
            panic!("middleware registry key `{key}` reused");
        }
        debug!(key = %key, "middleware registered");
    }

    /// Looks `key` up. Unknown keys, the empty key included, give `None`.
    pub fn get(&self, key: &str) -> Option<Constructor> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Like [`get`](Registry::get), for wiring code where a missing key is a bug.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not registered.
    pub fn must_get(&self, key: &str) -> Constructor {
        match self.get(key) {
            Some(constructor) => constructor,
            None => panic!("invalid middleware requested: `{key}`"),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Wraps `handler` in the middleware named by `keys`.
    ///
    /// The first key becomes the outermost layer, so `["a", "b"]` serves a
    /// request as `a → b → handler`. Every key is resolved before anything
    /// is built.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownMiddleware`] naming the first key that is not registered.
    pub fn compose<I, S>(&self, keys: I, handler: BoxedHandler) -> Result<BoxedHandler, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let layers = keys
            .into_iter()
            .map(|key| {
                let key = key.as_ref();
                self.get(key).ok_or_else(|| Error::UnknownMiddleware(key.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(layers = layers.len(), "composing middleware chain");
        Ok(layers.iter().rev().fold(handler, |inner, layer| layer.apply(inner)))
    }
}

/// Splits a comma-separated list of registry keys, dropping blanks.
///
/// ```rust
/// assert_eq!(
///     tsu_middleware::parse_chain(" middleware.Panic, ,middleware.LoggingStdErr "),
///     ["middleware.Panic", "middleware.LoggingStdErr"],
/// );
/// ```
pub fn parse_chain(list: &str) -> Vec<&str> {
    list.split(',').map(str::trim).filter(|key| !key.is_empty()).collect()
}

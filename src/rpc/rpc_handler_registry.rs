use super::{RpcArguments, RpcHandler, RpcHandlerResult, RpcVersion, into_rpc_handler};
use std::collections::{HashMap, hash_map::Entry};
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcRegistryError {
    /// The name cannot be used as a queue name.
    #[error("invalid method name {0:?}")]
    InvalidMethodName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcResolveError {
    #[error("method {method} is not registered")]
    MethodNotFound { method: String },

    #[error("method {method} has no handler for version {version}")]
    VersionNotFound { method: String, version: RpcVersion },
}

/// Handlers keyed by method name, then by version.
///
/// The registry is filled during startup and then shared read-only between
/// dispatchers, so it carries no interior locking. Every distinct method name
/// needs exactly one consumption binding; [`method_names`](Self::method_names)
/// lists them in the order they were first registered.
#[derive(Default)]
pub struct RpcHandlerRegistry {
    methods: HashMap<String, HashMap<RpcVersion, RpcHandler>>,
    binding_order: Vec<String>,
}

impl RpcHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an async closure for `(method_name, version)`.
    ///
    /// See [`register`](Self::register) for duplicate handling.
    pub fn register_handler<F, Fut>(
        &mut self,
        method_name: &str,
        version: impl Into<RpcVersion>,
        handler: F,
    ) -> Result<(), RpcRegistryError>
    where
        F: Fn(RpcArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RpcHandlerResult> + Send + 'static,
    {
        self.register(method_name, version, into_rpc_handler(handler))
    }

    /// Registers a type-erased handler.
    ///
    /// A second registration for an existing `(method_name, version)` pair is
    /// ignored with a warning; the first handler stays in place.
    pub fn register(
        &mut self,
        method_name: &str,
        version: impl Into<RpcVersion>,
        handler: RpcHandler,
    ) -> Result<(), RpcRegistryError> {
        if method_name.trim().is_empty() {
            return Err(RpcRegistryError::InvalidMethodName(method_name.to_string()));
        }
        let version = version.into();

        match self.methods.entry(method_name.to_string()) {
            Entry::Vacant(entry) => {
                tracing::info!("Registered method {} (version {})", method_name, version);
                entry.insert(HashMap::from([(version, handler)]));
                self.binding_order.push(method_name.to_string());
            }
            Entry::Occupied(mut entry) => match entry.get_mut().entry(version) {
                Entry::Occupied(existing) => {
                    tracing::warn!(
                        "Duplicate handler registered for [{}/{}]; keeping the original",
                        method_name,
                        existing.key()
                    );
                }
                Entry::Vacant(slot) => {
                    tracing::info!("Registered method {} (version {})", method_name, slot.key());
                    slot.insert(handler);
                }
            },
        }

        Ok(())
    }

    /// Looks up the handler for `(method_name, version)`.
    pub fn resolve(
        &self,
        method_name: &str,
        version: &RpcVersion,
    ) -> Result<RpcHandler, RpcResolveError> {
        let versions =
            self.methods
                .get(method_name)
                .ok_or_else(|| RpcResolveError::MethodNotFound {
                    method: method_name.to_string(),
                })?;

        versions
            .get(version)
            .cloned()
            .ok_or_else(|| RpcResolveError::VersionNotFound {
                method: method_name.to_string(),
                version: version.clone(),
            })
    }

    /// Distinct method names, in first-registration order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.binding_order.iter().map(String::as_str)
    }

    /// Registered versions of `method_name`, sorted.
    pub fn versions(&self, method_name: &str) -> Vec<&RpcVersion> {
        let mut versions: Vec<_> = self
            .methods
            .get(method_name)
            .map(|versions| versions.keys().collect())
            .unwrap_or_default();
        versions.sort();
        versions
    }

    pub fn contains(&self, method_name: &str, version: &RpcVersion) -> bool {
        self.methods
            .get(method_name)
            .is_some_and(|versions| versions.contains_key(version))
    }

    /// Total number of `(method, version)` handlers.
    pub fn len(&self) -> usize {
        self.methods.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for RpcHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.binding_order
                    .iter()
                    .map(|method| (method, self.versions(method))),
            )
            .finish()
    }
}

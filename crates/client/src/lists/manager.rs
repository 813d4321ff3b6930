//! In-memory state of the signed-in user's lists.
//!
//! The manager is the single source of truth presentation layers read from.
//! Mutations go to the backend first and are patched into the local
//! collection only once the backend confirms them; a failed mutation never
//! touches local state. There are no version checks: when two mutations on
//! the same list race, whichever response arrives last is applied last.
//!
//! Every network operation is tagged with the [`SessionId`] it started
//! under. A response that arrives after a logout (or a login as someone
//! else) is discarded instead of being applied to the new session's lists.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use queledoy_core::{List, ListId, Product, ProductId};

use crate::error::{ApiError, ErrorKind, Operation, OperationError};
use crate::http::HttpClient;
use crate::session::{Session, SessionId};

use super::repository::{ListDraft, ListsRepository};

/// Lifecycle of the collection within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing loaded (signed out, or not loaded yet).
    #[default]
    Unloaded,
    /// A load is in flight.
    Loading,
    /// The collection mirrors the backend as of the last load plus
    /// confirmed mutations.
    Ready,
    /// The last load failed; the collection is empty and `error` says why.
    Error,
}

/// Everything presentation layers observe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListsSnapshot {
    pub state: LoadState,
    pub lists: Vec<List>,
    /// Message of the most recent failure, cleared by the next successful
    /// load or list-level mutation.
    pub error: Option<String>,
    /// Number of operations currently waiting on the network.
    pub in_flight: usize,
}

impl ListsSnapshot {
    /// Whether any operation is waiting on the network.
    #[must_use]
    pub const fn busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Local copy of a list.
    #[must_use]
    pub fn get(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    /// Whether the product is in the given list, or in any list when
    /// `list_id` is `None`.
    #[must_use]
    pub fn is_product_in_list(&self, product_id: ProductId, list_id: Option<ListId>) -> bool {
        match list_id {
            Some(id) => self.get(id).is_some_and(|l| l.contains(product_id)),
            None => self.lists.iter().any(|l| l.contains(product_id)),
        }
    }

    /// Every list containing the product, in collection order.
    #[must_use]
    pub fn lists_containing(&self, product_id: ProductId) -> Vec<&List> {
        self.lists.iter().filter(|l| l.contains(product_id)).collect()
    }
}

/// Keeps the signed-in user's lists in sync with the backend.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct ListsManager {
    inner: Arc<ListsManagerInner>,
}

#[derive(Debug)]
struct ListsManagerInner {
    repository: ListsRepository,
    session: Session,
    state: watch::Sender<ListsSnapshot>,
}

/// Counts an operation as in flight until dropped.
struct BusyGuard<'a> {
    state: &'a watch::Sender<ListsSnapshot>,
}

impl<'a> BusyGuard<'a> {
    fn enter(state: &'a watch::Sender<ListsSnapshot>) -> Self {
        state.send_modify(|s| s.in_flight += 1);
        Self { state }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}

impl ListsManager {
    /// Create a manager over a repository, following the given session.
    #[must_use]
    pub fn new(repository: ListsRepository, session: Session) -> Self {
        let (state, _) = watch::channel(ListsSnapshot::default());
        Self {
            inner: Arc::new(ListsManagerInner {
                repository,
                session,
                state,
            }),
        }
    }

    /// Create a manager using the HTTP client's own session.
    #[must_use]
    pub fn from_http(http: HttpClient) -> Self {
        let session = http.session().clone();
        Self::new(ListsRepository::new(http), session)
    }

    // =========================================================================
    // Observable state
    // =========================================================================

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ListsSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receive a notification whenever the state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListsSnapshot> {
        self.inner.state.subscribe()
    }

    /// The user's lists.
    #[must_use]
    pub fn lists(&self) -> Vec<List> {
        self.inner.state.borrow().lists.clone()
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        self.inner.state.borrow().state
    }

    #[must_use]
    pub fn busy(&self) -> bool {
        self.inner.state.borrow().busy()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    /// Local copy of a list.
    #[must_use]
    pub fn get(&self, id: ListId) -> Option<List> {
        self.inner.state.borrow().get(id).cloned()
    }

    /// Whether the product is in the given list, or in any list when
    /// `list_id` is `None`. Reflects local state only.
    #[must_use]
    pub fn is_product_in_list(&self, product_id: ProductId, list_id: Option<ListId>) -> bool {
        self.inner
            .state
            .borrow()
            .is_product_in_list(product_id, list_id)
    }

    /// Every list containing the product. Reflects local state only.
    #[must_use]
    pub fn lists_containing(&self, product_id: ProductId) -> Vec<List> {
        self.inner
            .state
            .borrow()
            .lists_containing(product_id)
            .into_iter()
            .cloned()
            .collect()
    }

    // =========================================================================
    // Session handling
    // =========================================================================

    /// Drop every list and return to `Unloaded`.
    pub fn clear(&self) {
        self.inner.state.send_modify(|s| {
            s.lists.clear();
            s.error = None;
            s.state = LoadState::Unloaded;
        });
    }

    /// React to a login (`authenticated == true`) or logout.
    ///
    /// A login clears the previous user's lists before loading the new
    /// user's, so they are never shown together.
    pub async fn handle_session_change(&self, authenticated: bool) {
        self.clear();
        if authenticated {
            self.load().await;
        }
    }

    /// Follow the session: load on every login, clear on every logout.
    ///
    /// The current session state is handled immediately. The task runs until
    /// the returned handle is aborted.
    pub fn follow_session(&self) -> JoinHandle<()> {
        let manager = self.clone();
        let mut changes = self.inner.session.subscribe();

        tokio::spawn(async move {
            let mut current = changes.borrow_and_update().id;
            manager.handle_session_change(current.is_some()).await;

            while changes.changed().await.is_ok() {
                let next = changes.borrow_and_update().id;
                if next == current {
                    continue;
                }
                current = next;
                debug!(authenticated = current.is_some(), "Session changed");
                manager.handle_session_change(current.is_some()).await;
            }
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Replace the collection with the backend's lists.
    ///
    /// Never fails outright: on error the collection is emptied, `error` is
    /// set and the state becomes `Error`, so the caller can offer a retry.
    /// Without a session the collection is cleared and nothing is fetched.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        let Some(tag) = self.inner.session.current_id() else {
            debug!("No session; clearing lists instead of loading");
            self.clear();
            return;
        };

        let _busy = BusyGuard::enter(&self.inner.state);
        self.apply(tag, |s| s.state = LoadState::Loading);

        match self.inner.repository.fetch_all().await {
            Ok(lists) => {
                let count = lists.len();
                if self.apply(tag, move |s| {
                    s.lists = lists;
                    s.error = None;
                    s.state = LoadState::Ready;
                }) {
                    info!(count, "Loaded lists");
                } else {
                    debug!("Discarding lists loaded for a previous session");
                }
            }
            Err(source) => {
                let failure = OperationError::new(Operation::Load, source);
                error!(error = %failure, "Failed to load lists");
                let message = failure.to_string();
                self.apply(tag, move |s| {
                    s.lists.clear();
                    s.error = Some(message);
                    s.state = LoadState::Error;
                });
            }
        }
    }

    /// Fetch one list from the backend and refresh the local copy.
    ///
    /// # Errors
    ///
    /// Fails if there is no session or the backend call fails. A 404 drops
    /// the list locally.
    #[instrument(skip(self), fields(list_id = %id))]
    pub async fn fetch(&self, id: ListId) -> Result<List, OperationError> {
        let operation = Operation::Fetch;
        let tag = self.require_session(operation)?;
        let _busy = BusyGuard::enter(&self.inner.state);

        let list = match self.inner.repository.fetch_one(id).await {
            Ok(list) => list,
            Err(source) => return Err(self.fail(tag, operation, Some(id), source)),
        };

        let fresh = list.clone();
        let applied = self.apply(tag, move |s| {
            if let Some(slot) = s.lists.iter_mut().find(|l| l.id == fresh.id) {
                *slot = fresh;
            }
        });
        if !applied {
            return Err(Self::stale(operation));
        }

        Ok(list)
    }

    /// Create a list and append it to the collection.
    ///
    /// # Errors
    ///
    /// An empty or whitespace-only name is rejected before any request is
    /// sent. Otherwise fails if there is no session or the backend call
    /// fails; the collection is then unchanged.
    #[instrument(skip(self, description), fields(name = %name))]
    pub async fn create(&self, name: &str, description: &str) -> Result<List, OperationError> {
        let operation = Operation::Create;
        let draft = Self::validate_draft(name, description)
            .map_err(|source| self.fail_local(operation, source))?;
        let tag = self.require_session(operation)?;
        let _busy = BusyGuard::enter(&self.inner.state);

        let list = match self.inner.repository.create(&draft).await {
            Ok(list) => list,
            Err(source) => return Err(self.fail(tag, operation, None, source)),
        };

        let created = list.clone();
        let applied = self.apply(tag, move |s| {
            match s.lists.iter_mut().find(|l| l.id == created.id) {
                Some(slot) => *slot = created,
                None => s.lists.push(created),
            }
            s.error = None;
        });
        if !applied {
            return Err(Self::stale(operation));
        }

        info!(list_id = %list.id, "Created list");
        Ok(list)
    }

    /// Rename and/or re-describe a list.
    ///
    /// If the list is not in the local collection the backend update still
    /// counts as a success; the next `load()` picks it up.
    ///
    /// # Errors
    ///
    /// An empty name is rejected before any request is sent. Otherwise fails
    /// if there is no session or the backend call fails. A 404 drops the
    /// list locally.
    #[instrument(skip(self, name, description), fields(list_id = %id))]
    pub async fn update(
        &self,
        id: ListId,
        name: &str,
        description: &str,
    ) -> Result<(), OperationError> {
        let operation = Operation::Update;
        let draft = Self::validate_draft(name, description)
            .map_err(|source| self.fail_local(operation, source))?;
        let tag = self.require_session(operation)?;
        let _busy = BusyGuard::enter(&self.inner.state);

        let echoed = match self.inner.repository.update(id, &draft).await {
            Ok(echoed) => echoed,
            Err(source) => return Err(self.fail(tag, operation, Some(id), source)),
        };

        // Prefer what the backend says it stored
        let (name, description) = echoed.map_or((draft.name, draft.description), |l| {
            (l.name, l.description)
        });

        let mut found = false;
        let applied = self.apply(tag, |s| {
            if let Some(list) = s.lists.iter_mut().find(|l| l.id == id) {
                list.name = name;
                list.description = description;
                found = true;
            }
            s.error = None;
        });
        if !applied {
            return Err(Self::stale(operation));
        }

        if !found {
            debug!("Updated list is not in the local collection");
        }
        info!("Updated list");
        Ok(())
    }

    /// Delete a list and drop it from the collection.
    ///
    /// # Errors
    ///
    /// Fails if there is no session or the backend call fails. A 404 is
    /// reported as a failure, but the list is dropped locally too.
    #[instrument(skip(self), fields(list_id = %id))]
    pub async fn delete(&self, id: ListId) -> Result<(), OperationError> {
        let operation = Operation::Delete;
        let tag = self.require_session(operation)?;
        let _busy = BusyGuard::enter(&self.inner.state);

        if let Err(source) = self.inner.repository.delete(id).await {
            return Err(self.fail(tag, operation, Some(id), source));
        }

        let applied = self.apply(tag, |s| {
            s.lists.retain(|l| l.id != id);
            s.error = None;
        });
        if !applied {
            return Err(Self::stale(operation));
        }

        info!("Deleted list");
        Ok(())
    }

    /// Add a product to a list.
    ///
    /// The product is appended locally only if the list is in the
    /// collection and does not already hold a product with the same ID, so
    /// repeated or concurrent adds never duplicate it.
    ///
    /// # Errors
    ///
    /// Fails if there is no session or the backend call fails. A 404 drops
    /// the list locally.
    #[instrument(skip(self, product), fields(list_id = %list_id, product_id = %product.id))]
    pub async fn add_product_to_list(
        &self,
        list_id: ListId,
        product: Product,
    ) -> Result<(), OperationError> {
        let operation = Operation::AddProduct;
        let tag = self.require_session(operation)?;
        let _busy = BusyGuard::enter(&self.inner.state);

        if let Err(source) = self.inner.repository.add_product(list_id, product.id).await {
            return Err(self.fail(tag, operation, Some(list_id), source));
        }

        let mut inserted = false;
        let applied = self.apply(tag, |s| {
            if let Some(list) = s.lists.iter_mut().find(|l| l.id == list_id) {
                inserted = list.insert_product(product);
            }
        });
        if !applied {
            return Err(Self::stale(operation));
        }

        debug!(inserted, "Added product to list");
        Ok(())
    }

    /// Remove a product from a list.
    ///
    /// # Errors
    ///
    /// Fails if there is no session or the backend call fails. A 404 means
    /// the product is no longer in the list on the backend, so it is dropped
    /// locally as well.
    #[instrument(skip(self), fields(list_id = %list_id, product_id = %product_id))]
    pub async fn remove_product_from_list(
        &self,
        list_id: ListId,
        product_id: ProductId,
    ) -> Result<(), OperationError> {
        let operation = Operation::RemoveProduct;
        let tag = self.require_session(operation)?;
        let _busy = BusyGuard::enter(&self.inner.state);

        if let Err(source) = self
            .inner
            .repository
            .remove_product(list_id, product_id)
            .await
        {
            if source.kind() == ErrorKind::NotFound {
                self.apply(tag, |s| Self::drop_product(s, list_id, product_id));
            }
            return Err(self.fail(tag, operation, None, source));
        }

        let applied = self.apply(tag, |s| Self::drop_product(s, list_id, product_id));
        if !applied {
            return Err(Self::stale(operation));
        }

        debug!("Removed product from list");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn validate_draft(name: &str, description: &str) -> Result<ListDraft, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation(
                "list name cannot be empty".to_string(),
            ));
        }
        // Only the name is trimmed; the description is sent as typed
        Ok(ListDraft::new(name, description))
    }

    fn drop_product(s: &mut ListsSnapshot, list_id: ListId, product_id: ProductId) {
        if let Some(list) = s.lists.iter_mut().find(|l| l.id == list_id) {
            list.remove_product(product_id);
        }
    }

    fn require_session(&self, operation: Operation) -> Result<SessionId, OperationError> {
        self.inner
            .session
            .current_id()
            .ok_or_else(|| self.fail_local(operation, ApiError::NotAuthenticated))
    }

    /// Patch the state if the session that started the operation is still
    /// current. The session check and the patch happen under the same lock.
    fn apply(&self, tag: SessionId, patch: impl FnOnce(&mut ListsSnapshot)) -> bool {
        let session = &self.inner.session;
        self.inner.state.send_if_modified(|s| {
            if session.current_id() != Some(tag) {
                return false;
            }
            patch(s);
            true
        })
    }

    const fn stale(operation: Operation) -> OperationError {
        OperationError::new(operation, ApiError::SessionChanged)
    }

    /// Record a failure that happened before any request was sent.
    fn fail_local(&self, operation: Operation, source: ApiError) -> OperationError {
        let failure = OperationError::new(operation, source);
        warn!(error = %failure, "Lists operation rejected");
        let message = failure.to_string();
        self.inner.state.send_modify(|s| s.error = Some(message));
        failure
    }

    /// Record a failed backend call.
    ///
    /// On 404 the list named by `missing` no longer exists on the backend and
    /// is dropped locally. Failures from a previous session are returned as
    /// `SessionChanged` without touching state.
    fn fail(
        &self,
        tag: SessionId,
        operation: Operation,
        missing: Option<ListId>,
        source: ApiError,
    ) -> OperationError {
        let not_found = source.kind() == ErrorKind::NotFound;
        let failure = OperationError::new(operation, source);

        if not_found {
            warn!(error = %failure, "Lists operation failed");
        } else {
            error!(error = %failure, "Lists operation failed");
        }

        let message = failure.to_string();
        let applied = self.apply(tag, move |s| {
            if not_found && let Some(id) = missing {
                s.lists.retain(|l| l.id != id);
            }
            s.error = Some(message);
        });

        if applied { failure } else { Self::stale(operation) }
    }
}

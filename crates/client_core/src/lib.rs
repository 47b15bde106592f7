use std::{future::Future, sync::Arc};

use shared::domain::{Item, ItemId};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod pagination;
pub mod reorder;
pub mod search;
pub mod selection;
pub mod sequencer;
pub mod transport;
pub mod window;

pub use config::{load_settings, Settings, SyncTuning};
pub use error::{Operation, SyncError};
pub use pagination::{LoadMode, PageState, PaginationCursor, ScrollMetrics};
pub use reorder::MovePlan;
pub use sequencer::RequestToken;
pub use transport::{HttpItemService, ItemService};

use pagination::PaginationMachine;
use reorder::{apply_move, plan_move, DragState};
use search::DebouncedSearch;
use selection::SelectionStore;
use sequencer::RequestSequencer;
use window::ItemWindow;

#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    SearchCommitted {
        search: String,
    },
    WindowReplaced {
        search: String,
        len: usize,
        has_more: bool,
    },
    WindowAppended {
        page: u32,
        added: usize,
        len: usize,
        has_more: bool,
    },
    LoadingChanged(bool),
    SelectionLoaded {
        count: usize,
    },
    SelectionChanged {
        id: ItemId,
        selected: bool,
        count: usize,
    },
    Reordered {
        from_id: ItemId,
        to_id: ItemId,
    },
    Error(String),
}

/// Status indicator shown under the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Exhausted,
    Empty,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    pub items: Vec<Item>,
    pub selected: Vec<ItemId>,
    pub search_input: String,
    pub cursor: PaginationCursor,
    pub loading: bool,
    pub dragged: Option<ItemId>,
}

impl ListSnapshot {
    pub fn status(&self) -> ListStatus {
        if self.loading {
            ListStatus::Loading
        } else if self.items.is_empty() {
            ListStatus::Empty
        } else if !self.cursor.has_more {
            ListStatus::Exhausted
        } else {
            ListStatus::Ready
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.binary_search(&id).is_ok()
    }
}

/// Result of one list fetch as seen by the intent that started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Committed {
        token: RequestToken,
        page: u32,
        mode: LoadMode,
        received: usize,
        has_more: bool,
    },
    /// A newer fetch started before this one resolved; nothing was applied.
    Stale { token: RequestToken },
    Failed(SyncError),
    /// The intent did not warrant a fetch (already loading, nothing more, not near the bottom).
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionToggle {
    pub id: ItemId,
    pub selected: bool,
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Ignored,
    Moved { plan: MovePlan, persisted: bool },
}

/// Client-side synchronization engine for the searchable, paginated,
/// selectable and reorderable item list.
///
/// All state lives behind one async mutex that is never held across a
/// network call. List fetches are gated by a [`RequestSequencer`] so only the
/// most recently started fetch may touch the window.
pub struct ListSyncEngine {
    service: Arc<dyn ItemService>,
    tuning: SyncTuning,
    inner: Mutex<ListState>,
    events: broadcast::Sender<ListEvent>,
}

struct ListState {
    sequencer: RequestSequencer,
    pagination: PaginationMachine,
    window: ItemWindow,
    selection: SelectionStore,
    selection_touched: bool,
    search: DebouncedSearch,
    drag: DragState,
}

impl ListState {
    fn begin_load(&mut self, page: u32, mode: LoadMode) -> Option<(RequestToken, String)> {
        // refused appends leave the epoch untouched
        if mode == LoadMode::Append && self.pagination.is_loading() {
            return None;
        }
        let token = self.sequencer.begin_fetch();
        self.pagination.begin(token, page, mode);
        Some((token, self.pagination.cursor().search_term.clone()))
    }
}

impl ListSyncEngine {
    pub fn new(service: Arc<dyn ItemService>, tuning: SyncTuning) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            service,
            tuning,
            inner: Mutex::new(ListState {
                sequencer: RequestSequencer::new(),
                pagination: PaginationMachine::new(),
                window: ItemWindow::new(),
                selection: SelectionStore::new(),
                selection_touched: false,
                search: DebouncedSearch::new(tuning.search_debounce),
                drag: DragState::default(),
            }),
            events,
        })
    }

    pub fn tuning(&self) -> SyncTuning {
        self.tuning
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        let guard = self.inner.lock().await;
        ListSnapshot {
            items: guard.window.items().to_vec(),
            selected: guard.selection.to_vec(),
            search_input: guard.search.input().to_string(),
            cursor: guard.pagination.cursor().clone(),
            loading: guard.pagination.is_loading(),
            dragged: guard.drag.dragged(),
        }
    }

    /// Startup: hydrate the selection and load the unfiltered first page side by side.
    pub async fn initialize(&self) -> FetchOutcome {
        let (_, outcome) = futures::join!(self.load_selection(), self.reload());
        outcome
    }

    /// Records the raw text now and commits it once typing pauses for the
    /// debounce window.
    pub async fn on_search_input(self: &Arc<Self>, text: impl Into<String>) {
        let engine = Arc::downgrade(self);
        let mut guard = self.inner.lock().await;
        guard.search.on_input(text, move |text| async move {
            if let Some(engine) = engine.upgrade() {
                engine.commit_search(text).await;
            }
        });
    }

    /// Commits the current input immediately, dropping any pending timer.
    pub async fn submit_search(&self) -> FetchOutcome {
        let text = {
            let mut guard = self.inner.lock().await;
            guard.search.cancel();
            guard.search.input().to_string()
        };
        self.commit_search(text).await
    }

    async fn commit_search(&self, text: String) -> FetchOutcome {
        let started = {
            let mut guard = self.inner.lock().await;
            guard.pagination.reset_for_search(text.clone());
            guard.begin_load(1, LoadMode::Replace)
        };
        let _ = self.events.send(ListEvent::SearchCommitted {
            search: text.clone(),
        });
        debug!(search = %text, "list: search committed");
        match started {
            Some((token, search)) => self.run_fetch(token, 1, LoadMode::Replace, search).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Reloads page 1 of the committed search, replacing the window.
    pub async fn reload(&self) -> FetchOutcome {
        let started = {
            let mut guard = self.inner.lock().await;
            let search = guard.pagination.cursor().search_term.clone();
            guard.pagination.reset_for_search(search);
            guard.begin_load(1, LoadMode::Replace)
        };
        match started {
            Some((token, search)) => self.run_fetch(token, 1, LoadMode::Replace, search).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Loads the next page when the viewport is within the trailing threshold
    /// of the bottom, the machine is idle and the server reported more rows.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> FetchOutcome {
        let started = {
            let mut guard = self.inner.lock().await;
            match guard
                .pagination
                .page_for_scroll(metrics, self.tuning.scroll_threshold_px)
            {
                Some(page) => {
                    let mode = mode_for_page(page, LoadMode::Append);
                    guard.begin_load(page, mode).map(|start| (page, mode, start))
                }
                None => None,
            }
        };
        match started {
            Some((page, mode, (token, search))) => self.run_fetch(token, page, mode, search).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Fetches `page` of the committed search. Page 1 always replaces.
    pub async fn load_page(&self, page: u32, mode: LoadMode) -> FetchOutcome {
        let page = page.max(1);
        let mode = mode_for_page(page, mode);
        let started = {
            let mut guard = self.inner.lock().await;
            guard.begin_load(page, mode)
        };
        match started {
            Some((token, search)) => self.run_fetch(token, page, mode, search).await,
            None => FetchOutcome::Skipped,
        }
    }

    async fn run_fetch(
        &self,
        token: RequestToken,
        page: u32,
        mode: LoadMode,
        search: String,
    ) -> FetchOutcome {
        let _ = self.events.send(ListEvent::LoadingChanged(true));
        let result = self
            .call(
                Operation::FetchItems { page },
                self.service.fetch_items(page, &search),
            )
            .await;

        let mut guard = self.inner.lock().await;
        if let Err(stale) = guard.sequencer.ensure_current(token) {
            debug!(page, search = %search, "list: dropping {stale}");
            return FetchOutcome::Stale { token };
        }

        match result {
            Ok(response) => {
                let has_more = response.has_more;
                let received = response.items.len();
                let event = match mode {
                    LoadMode::Replace => {
                        guard.window.replace(response.items);
                        ListEvent::WindowReplaced {
                            search: search.clone(),
                            len: guard.window.len(),
                            has_more,
                        }
                    }
                    LoadMode::Append => {
                        let added = guard.window.append(response.items);
                        ListEvent::WindowAppended {
                            page,
                            added,
                            len: guard.window.len(),
                            has_more,
                        }
                    }
                };
                guard.pagination.complete(token, has_more);
                let len = guard.window.len();
                drop(guard);

                info!(
                    "list: committed page={page} search={search:?} received={received} window={len} has_more={has_more}"
                );
                let _ = self.events.send(event);
                let _ = self.events.send(ListEvent::LoadingChanged(false));
                FetchOutcome::Committed {
                    token,
                    page,
                    mode,
                    received,
                    has_more,
                }
            }
            Err(err) => {
                guard.pagination.abort(token);
                drop(guard);

                warn!(page, search = %search, "list: {err}");
                let _ = self.events.send(ListEvent::LoadingChanged(false));
                let _ = self.events.send(ListEvent::Error(err.to_string()));
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Hydrates the selection from the server. On failure the selection is
    /// left as it is; if the user already toggled something locally, the
    /// local set wins and the server copy is ignored.
    pub async fn load_selection(&self) -> bool {
        let result = self
            .call(Operation::LoadSelected, self.service.fetch_selected())
            .await;
        match result {
            Ok(ids) => {
                let count = {
                    let mut guard = self.inner.lock().await;
                    if guard.selection_touched {
                        debug!("selection: keeping local toggles over server copy");
                        return false;
                    }
                    guard.selection.hydrate(ids);
                    guard.selection.len()
                };
                let _ = self.events.send(ListEvent::SelectionLoaded { count });
                true
            }
            Err(err) => {
                warn!("selection: {err}");
                let _ = self.events.send(ListEvent::Error(err.to_string()));
                false
            }
        }
    }

    /// Flips `id` locally, then persists the whole set. A failed save is
    /// logged and the local toggle stays.
    pub async fn toggle_selection(&self, id: ItemId) -> SelectionToggle {
        let (selected, snapshot) = {
            let mut guard = self.inner.lock().await;
            guard.selection_touched = true;
            let selected = guard.selection.toggle(id);
            (selected, guard.selection.to_vec())
        };
        let _ = self.events.send(ListEvent::SelectionChanged {
            id,
            selected,
            count: snapshot.len(),
        });

        let persisted = match self
            .call(
                Operation::SaveSelected,
                self.service.save_selected(&snapshot),
            )
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(item = id.0, "selection: {err}");
                let _ = self.events.send(ListEvent::Error(err.to_string()));
                false
            }
        };

        SelectionToggle {
            id,
            selected,
            persisted,
        }
    }

    pub async fn begin_drag(&self, id: ItemId) {
        self.inner.lock().await.drag.start(id);
    }

    pub async fn cancel_drag(&self) {
        self.inner.lock().await.drag.clear();
    }

    /// Completes the active gesture by dropping the dragged item on `target`.
    pub async fn on_drop(&self, target: ItemId) -> DropOutcome {
        let dragged = self.inner.lock().await.drag.take();
        match dragged {
            Some(dragged) => self.drop_item(dragged, target).await,
            None => DropOutcome::Ignored,
        }
    }

    /// Moves `dragged` next to `target` in the window right away, then asks
    /// the server for the same move by global id. There is no rollback: the
    /// window converges on the server order at the next full reload, or
    /// immediately when `reload_after_reorder` is set.
    pub async fn drop_item(&self, dragged: ItemId, target: ItemId) -> DropOutcome {
        let plan = {
            let mut guard = self.inner.lock().await;
            guard.drag.clear();
            let plan = plan_move(guard.window.items(), dragged, target);
            if let Some(plan) = &plan {
                apply_move(guard.window.items_mut(), plan);
            }
            plan
        };
        let Some(plan) = plan else {
            debug!(
                "reorder: ignoring drop dragged={} target={}",
                dragged.0, target.0
            );
            return DropOutcome::Ignored;
        };

        let _ = self.events.send(ListEvent::Reordered {
            from_id: dragged,
            to_id: target,
        });

        let persisted = match self
            .call(Operation::Reorder, self.service.reorder(dragged, target))
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(from = dragged.0, to = target.0, "reorder: {err}");
                let _ = self.events.send(ListEvent::Error(err.to_string()));
                false
            }
        };

        if self.tuning.reload_after_reorder {
            self.reload().await;
        }

        DropOutcome::Moved { plan, persisted }
    }

    /// Cancels a pending debounced search. Dropping the engine does the same.
    pub async fn shutdown(&self) {
        if self.inner.lock().await.search.cancel() {
            debug!("search: cancelled pending commit on shutdown");
        }
    }

    async fn call<T>(
        &self,
        operation: Operation,
        request: impl Future<Output = Result<T, SyncError>>,
    ) -> Result<T, SyncError> {
        match self.tuning.request_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| {
                    SyncError::network(
                        operation,
                        format!("timed out after {} ms", limit.as_millis()),
                    )
                })?,
            None => request.await,
        }
    }
}

fn mode_for_page(page: u32, requested: LoadMode) -> LoadMode {
    if page <= 1 {
        LoadMode::Replace
    } else {
        requested
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;

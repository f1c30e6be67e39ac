//! Map lifecycle: one live session per subject.
//!
//! A [`MapSession`] owns the map surface, the workflow state, and the set of
//! in-flight lookups for one subject load. [`MapController`] keeps at most one
//! session alive; loading a new subject or disposing the controller tears the
//! old one down first. Teardown aborts pending lookups, so a late answer for
//! a previous subject has nowhere to land, and every result is still checked
//! against the session id before it touches state.

use std::sync::Arc;

use brokermap_core::{extract_addresses, Deal};
use brokermap_geocoder::Geocoder;
use serde::Serialize;
use tokio::task::JoinSet;

use crate::marker::{MarkerIcon, MarkerRecord};
use crate::options::WorkflowOptions;
use crate::scheduler::spawn_requests;
use crate::state::{Completion, IgnoreReason, SessionId, Step, TaggedResult, WorkflowState};
use crate::surface::{apply_viewport, MapError, MapLibrary, MapSurface, MarkerId};
use crate::viewport::{fit_viewport, MapViewport, DEFAULT_CENTER, DEFAULT_ZOOM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Started { session: SessionId, requested: usize },
    /// None of the scanned deals carried an address; no map was created.
    NoAddresses,
    /// The rendering library is not ready; no map was created.
    LibraryNotLoaded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Attempted {
        ordinal: usize,
        marker: Option<MarkerRecord>,
    },
    Ignored {
        ordinal: usize,
        reason: IgnoreReason,
    },
    Completed(WorkflowSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSummary {
    pub session: SessionId,
    pub subject: String,
    pub total_requested: usize,
    pub attempted: usize,
    pub resolved: usize,
    pub empty: usize,
    pub failed: usize,
    pub viewport: Option<MapViewport>,
    pub markers: Vec<MarkerRecord>,
}

pub struct MapSession<S: MapSurface> {
    id: SessionId,
    subject: String,
    surface: S,
    state: WorkflowState,
    tasks: JoinSet<TaggedResult>,
    marker_ids: Vec<MarkerId>,
    viewport: Option<MapViewport>,
    finished: bool,
    torn_down: bool,
}

impl<S: MapSurface> MapSession<S> {
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// The viewport applied after completion, if any.
    #[must_use]
    pub fn viewport(&self) -> Option<&MapViewport> {
        self.viewport.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn summary(&self) -> WorkflowSummary {
        WorkflowSummary {
            session: self.id,
            subject: self.subject.clone(),
            total_requested: self.state.total_requested(),
            attempted: self.state.attempted(),
            resolved: self.state.resolved(),
            empty: self.state.empty(),
            failed: self.state.failed(),
            viewport: self.viewport,
            markers: self.state.markers().to_vec(),
        }
    }

    fn record(&mut self, tagged: TaggedResult, icon: &MarkerIcon) -> Step {
        let step = self.state.apply(tagged);
        if let Step::Recorded {
            marker: Some(marker),
            ..
        } = &step
        {
            match self.surface.add_marker(marker, icon) {
                Ok(id) => self.marker_ids.push(id),
                Err(e) => {
                    tracing::warn!(session = %self.id, ordinal = marker.ordinal, error = %e, "failed to place marker");
                }
            }
        }
        step
    }

    async fn finish(&mut self, completion: Completion, options: &WorkflowOptions) {
        self.finished = true;

        if completion == Completion::NothingResolved {
            tracing::info!(
                session = %self.id,
                attempted = self.state.attempted(),
                "no addresses resolved; keeping default view"
            );
            return;
        }

        if !options.fit_settle.is_zero() {
            tokio::time::sleep(options.fit_settle).await;
        }

        let viewport = match fit_viewport(&self.state.resolved_coordinates(), &options.viewport) {
            Ok(Some(viewport)) => viewport,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "could not fit viewport; keeping current view");
                return;
            }
        };

        if !self.surface.is_loaded() {
            tracing::warn!(session = %self.id, "map not loaded; skipping viewport fit");
            return;
        }

        match apply_viewport(&mut self.surface, &viewport) {
            Ok(()) => {
                tracing::info!(
                    session = %self.id,
                    resolved = self.state.resolved(),
                    ?viewport,
                    "viewport fitted"
                );
                self.viewport = Some(viewport);
            }
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "could not apply viewport; keeping current view");
            }
        }
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let pending = self.tasks.len();
        self.tasks.abort_all();
        for id in self.marker_ids.drain(..) {
            self.surface.remove_marker(id);
        }
        self.surface.remove();
        tracing::debug!(session = %self.id, subject = %self.subject, pending, "map session torn down");
    }
}

impl<S: MapSurface> Drop for MapSession<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Owns the current subject's map and drives its geocoding workflow.
pub struct MapController<L: MapLibrary, G: Geocoder> {
    library: L,
    geocoder: Arc<G>,
    options: WorkflowOptions,
    next_session: u64,
    current: Option<MapSession<L::Surface>>,
}

impl<L: MapLibrary, G: Geocoder> MapController<L, G> {
    #[must_use]
    pub fn new(library: L, geocoder: Arc<G>, options: WorkflowOptions) -> Self {
        Self {
            library,
            geocoder,
            options,
            next_session: 1,
            current: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    #[must_use]
    pub fn library(&self) -> &L {
        &self.library
    }

    #[must_use]
    pub fn current_session(&self) -> Option<&MapSession<L::Surface>> {
        self.current.as_ref()
    }

    /// Replaces the current session with one for `subject`.
    ///
    /// The previous session is torn down before anything else happens. No
    /// map is created when the deals yield no address or the library is not
    /// loaded. Lookups are spawned onto the Tokio runtime, so this must be
    /// called from within one.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the library fails to create or initialise the
    /// map surface.
    pub fn load_subject(&mut self, subject: &str, deals: &[Deal]) -> Result<LoadOutcome, MapError> {
        self.dispose();

        let entries = extract_addresses(deals, self.options.deal_cap);
        if entries.is_empty() {
            tracing::info!(subject, deals = deals.len(), "no deal addresses to plot");
            return Ok(LoadOutcome::NoAddresses);
        }

        if !self.library.is_loaded() {
            tracing::warn!(subject, "map library not loaded; skipping map");
            return Ok(LoadOutcome::LibraryNotLoaded);
        }

        let id = SessionId(self.next_session);
        self.next_session += 1;

        let mut session = MapSession {
            id,
            subject: subject.to_owned(),
            surface: self.library.create_map(&self.options.container)?,
            state: WorkflowState::new(id, entries.len()),
            tasks: JoinSet::new(),
            marker_ids: Vec::new(),
            viewport: None,
            finished: false,
            torn_down: false,
        };
        session.surface.set_view(DEFAULT_CENTER, DEFAULT_ZOOM)?;
        session.surface.add_tile_layer(&self.options.tile_layer)?;
        session.tasks = spawn_requests(&self.geocoder, id, &entries, self.options.throttle);

        tracing::info!(session = %id, subject, requested = entries.len(), "map session started");
        self.current = Some(session);

        Ok(LoadOutcome::Started {
            session: id,
            requested: entries.len(),
        })
    }

    /// Waits for the next lookup of the current session and folds it in.
    ///
    /// The event that completes the workflow also applies the viewport.
    /// Returns `None` when there is no session or nothing left in flight.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        loop {
            let session = self.current.as_mut()?;
            let tagged = match session.tasks.join_next().await? {
                Ok(tagged) => tagged,
                Err(e) => {
                    tracing::warn!(session = %session.id, error = %e, "geocoding task did not complete");
                    continue;
                }
            };

            return Some(match session.record(tagged, &self.options.icon) {
                Step::Ignored { ordinal, reason } => {
                    tracing::debug!(session = %session.id, ordinal, ?reason, "geocode result ignored");
                    SessionEvent::Ignored { ordinal, reason }
                }
                Step::Recorded {
                    ordinal,
                    marker,
                    completion: None,
                } => SessionEvent::Attempted { ordinal, marker },
                Step::Recorded {
                    completion: Some(completion),
                    ..
                } => {
                    session.finish(completion, &self.options).await;
                    SessionEvent::Completed(session.summary())
                }
            });
        }
    }

    /// Drives the current session until every address has been attempted.
    ///
    /// Returns the session summary, or `None` if no session is active.
    pub async fn run_to_completion(&mut self) -> Option<WorkflowSummary> {
        while let Some(event) = self.next_event().await {
            if let SessionEvent::Completed(summary) = event {
                return Some(summary);
            }
        }
        self.current.as_ref().map(MapSession::summary)
    }

    /// Tears down the current session, if any.
    pub fn dispose(&mut self) {
        if let Some(mut session) = self.current.take() {
            session.teardown();
            tracing::info!(session = %session.id, subject = %session.subject, "map session disposed");
        }
    }
}

//! Geocodes a subject's recent deal addresses and annotates a map with them.

pub mod geojson;
pub mod marker;
pub mod options;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod surface;
pub mod viewport;

pub use geojson::{GeoJsonLibrary, GeoJsonSurface, MapView};
pub use marker::{marker_label, MarkerIcon, MarkerRecord};
pub use options::WorkflowOptions;
pub use scheduler::{spawn_requests, ThrottlePolicy};
pub use session::{LoadOutcome, MapController, MapSession, SessionEvent, WorkflowSummary};
pub use state::{Completion, IgnoreReason, SessionId, Step, TaggedResult, WorkflowState};
pub use surface::{apply_viewport, MapError, MapLibrary, MapSurface, MarkerId, TileLayer};
pub use viewport::{
    estimate_fit_zoom, fit_viewport, BoundingBox, MapViewport, ViewportError, ViewportPolicy,
    DEFAULT_CENTER, DEFAULT_ZOOM,
};

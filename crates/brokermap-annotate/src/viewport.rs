//! Viewport fitting around resolved marker coordinates.
//!
//! One marker centers the map at a fixed close zoom. Several markers fit
//! their bounding box with pixel padding and a zoom ceiling, so a tight
//! cluster does not zoom in past street level. Zero markers leave the view
//! alone.

use std::f64::consts::PI;

use brokermap_core::Coordinates;
use serde::Serialize;
use thiserror::Error;

/// Initial view of a freshly created map: lower Manhattan at city zoom.
pub const DEFAULT_CENTER: Coordinates = Coordinates::new(40.7128, -74.0060);
pub const DEFAULT_ZOOM: u8 = 12;

pub const SINGLE_MARKER_ZOOM: u8 = 15;
pub const FIT_PADDING_PX: u32 = 50;
pub const FIT_MAX_ZOOM: u8 = 15;

/// Web map tile edge in pixels.
const TILE_SIZE_PX: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for an empty slice.
    ///
    /// Invalid points are not filtered here; check [`Self::is_valid`].
    #[must_use]
    pub fn from_points(points: &[Coordinates]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(points[1..].iter().fold(init, |b, p| Self {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lon: b.min_lon.min(p.lon),
            max_lon: b.max_lon.max(p.lon),
        }))
    }

    /// Both corners are valid positions and the box is not inverted.
    ///
    /// A zero-area box (all points identical) is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let sw = self.south_west();
        let ne = self.north_east();
        sw.is_valid() && ne.is_valid() && self.min_lat <= self.max_lat && self.min_lon <= self.max_lon
    }

    #[must_use]
    pub const fn south_west(&self) -> Coordinates {
        Coordinates::new(self.min_lat, self.min_lon)
    }

    #[must_use]
    pub const fn north_east(&self) -> Coordinates {
        Coordinates::new(self.max_lat, self.max_lon)
    }

    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.south_west(), self.north_east())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MapViewport {
    Centered {
        center: Coordinates,
        zoom: u8,
    },
    Fitted {
        bounds: BoundingBox,
        padding_px: u32,
        max_zoom: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportPolicy {
    pub single_marker_zoom: u8,
    pub padding_px: u32,
    pub max_zoom: u8,
}

impl Default for ViewportPolicy {
    fn default() -> Self {
        Self {
            single_marker_zoom: SINGLE_MARKER_ZOOM,
            padding_px: FIT_PADDING_PX,
            max_zoom: FIT_MAX_ZOOM,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ViewportError {
    #[error("cannot center map on invalid position {0}")]
    InvalidCenter(Coordinates),

    #[error("degenerate bounding box {0}")]
    DegenerateBounds(BoundingBox),
}

/// Computes the viewport for a set of resolved coordinates.
///
/// Returns `Ok(None)` when there is nothing to frame.
///
/// # Errors
///
/// Returns [`ViewportError`] when the coordinates do not describe a usable
/// position or box. Callers log it and keep the current view.
pub fn fit_viewport(
    points: &[Coordinates],
    policy: &ViewportPolicy,
) -> Result<Option<MapViewport>, ViewportError> {
    match points {
        [] => Ok(None),
        [only] => {
            if !only.is_valid() {
                return Err(ViewportError::InvalidCenter(*only));
            }
            Ok(Some(MapViewport::Centered {
                center: *only,
                zoom: policy.single_marker_zoom,
            }))
        }
        _ => {
            let Some(bounds) = BoundingBox::from_points(points) else {
                return Ok(None);
            };
            // f64::min/max skip NaN, so a bad point can hide inside a valid box.
            if !bounds.is_valid() || points.iter().any(|p| !p.is_valid()) {
                return Err(ViewportError::DegenerateBounds(bounds));
            }
            Ok(Some(MapViewport::Fitted {
                bounds,
                padding_px: policy.padding_px,
                max_zoom: policy.max_zoom,
            }))
        }
    }
}

/// Highest integer zoom at which `bounds` fits inside a `width_px` by
/// `height_px` viewport after removing `padding_px` from each edge, capped at
/// `max_zoom`.
///
/// Uses Web Mercator tile math. A zero-span box returns `max_zoom`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_fit_zoom(
    bounds: &BoundingBox,
    width_px: u32,
    height_px: u32,
    padding_px: u32,
    max_zoom: u8,
) -> u8 {
    let avail_w = f64::from(width_px.saturating_sub(padding_px.saturating_mul(2)).max(1));
    let avail_h = f64::from(height_px.saturating_sub(padding_px.saturating_mul(2)).max(1));

    let lon_fraction = (bounds.max_lon - bounds.min_lon) / 360.0;
    let lat_fraction = (mercator_y(bounds.max_lat) - mercator_y(bounds.min_lat)) / (2.0 * PI);

    let zoom_for = |avail: f64, fraction: f64| -> f64 {
        if fraction <= 0.0 {
            f64::INFINITY
        } else {
            (avail / (TILE_SIZE_PX * fraction)).log2().floor()
        }
    };

    let zoom = zoom_for(avail_w, lon_fraction).min(zoom_for(avail_h, lat_fraction));
    if !zoom.is_finite() || zoom >= f64::from(max_zoom) {
        return max_zoom;
    }
    if zoom <= 0.0 {
        return 0;
    }
    // Bounded to (0, max_zoom) above, so the cast cannot truncate.
    zoom as u8
}

fn mercator_y(lat_deg: f64) -> f64 {
    // Clamp to the Web Mercator limit so the poles stay finite.
    let lat = lat_deg.clamp(-85.051_128_78, 85.051_128_78).to_radians();
    (PI / 4.0 + lat / 2.0).tan().ln()
}

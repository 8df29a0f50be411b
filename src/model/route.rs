use geo::{Haversine, Length, LineString};

use crate::geometry::GeoCoord;

/// Paths with fewer coordinates than this are not worth drawing.
pub const MIN_ROUTE_COORDS: usize = 3;

/// A computed walking route.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Ordered coordinates from snapped origin to snapped destination,
    /// at least [`MIN_ROUTE_COORDS`] long.
    Path(Vec<GeoCoord>),
    /// Nothing renderable: unreachable, or origin and destination collapse
    /// onto the same or adjacent vertices.
    NoRoute,
}

impl Route {
    /// Applies the triviality gate to a raw path.
    #[must_use]
    pub fn gated(path: Option<Vec<GeoCoord>>) -> Self {
        match path {
            Some(coords) if coords.len() >= MIN_ROUTE_COORDS => Route::Path(coords),
            _ => Route::NoRoute,
        }
    }

    #[must_use]
    pub fn coords(&self) -> Option<&[GeoCoord]> {
        match self {
            Route::Path(coords) => Some(coords.as_slice()),
            Route::NoRoute => None,
        }
    }

    #[must_use]
    pub fn is_path(&self) -> bool {
        matches!(self, Route::Path(_))
    }

    /// Walking length in metres; zero for [`Route::NoRoute`].
    #[must_use]
    pub fn length_m(&self) -> f64 {
        self.coords().map_or(0.0, |c| {
            c.iter().copied().collect::<LineString>().length::<Haversine>()
        })
    }
}

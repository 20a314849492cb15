use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::face::CubeFace;

/// Side effect that leaves the menu for a destination.
///
/// Implementations perform a full navigation (replace the current page or
/// hand the destination to a browser), never an in-app route change.
pub trait Navigator {
    fn navigate(&mut self, destination: &str) -> Result<(), NavigateError>;
}

#[derive(Debug, Error)]
pub enum NavigateError {
    #[error("failed to launch opener for `{destination}`: {source}")]
    Launch {
        destination: String,
        #[source]
        source: std::io::Error,
    },
    #[error("destination `{destination}` rejected: {reason}")]
    Rejected { destination: String, reason: String },
}

/// Immutable face → destination mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: [Option<String>; 6],
}

impl RouteTable {
    /// Build from configured routes. Out-of-range indices and blank
    /// destinations are dropped, leaving their face inert.
    pub fn from_config(routes: &BTreeMap<usize, String>) -> Self {
        let mut table = Self::default();
        for (&index, destination) in routes {
            let Some(face) = CubeFace::from_index(index) else {
                warn!(index, destination = %destination, "ignoring route for unknown face");
                continue;
            };
            let destination = destination.trim();
            if destination.is_empty() {
                warn!(face = face.name(), "ignoring empty route");
                continue;
            }
            table.routes[face.index()] = Some(destination.to_owned());
        }
        table
    }

    pub fn resolve(&self, face: CubeFace) -> Option<&str> {
        self.routes[face.index()].as_deref()
    }

    /// Number of faces that lead somewhere.
    pub fn len(&self) -> usize {
        self.routes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a tap on a face amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Opened { destination: String },
    /// No destination configured; the tap is a no-op.
    Unmapped,
    Failed { destination: String, reason: String },
}

/// Resolves tapped faces and fires the navigation side effect.
pub struct FaceRouter {
    table: RouteTable,
    navigator: Box<dyn Navigator>,
}

impl std::fmt::Debug for FaceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceRouter")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl FaceRouter {
    pub fn new(table: RouteTable, navigator: Box<dyn Navigator>) -> Self {
        Self { table, navigator }
    }

    pub fn resolve(&self, face: CubeFace) -> Option<&str> {
        self.table.resolve(face)
    }

    pub fn navigate(&mut self, face: CubeFace) -> Navigation {
        let Some(destination) = self.table.resolve(face) else {
            debug!(face = face.name(), "tap on face without destination");
            return Navigation::Unmapped;
        };
        let destination = destination.to_owned();
        match self.navigator.navigate(&destination) {
            Ok(()) => {
                info!(face = face.name(), destination = %destination, "navigating");
                Navigation::Opened { destination }
            }
            Err(err) => {
                warn!(face = face.name(), "navigation failed: {err}");
                Navigation::Failed {
                    destination,
                    reason: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    /// Records every destination instead of leaving the page.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingNavigator {
        pub(crate) visited: Rc<RefCell<Vec<String>>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, destination: &str) -> Result<(), NavigateError> {
            self.visited.borrow_mut().push(destination.to_owned());
            Ok(())
        }
    }

    struct FailingNavigator;

    impl Navigator for FailingNavigator {
        fn navigate(&mut self, destination: &str) -> Result<(), NavigateError> {
            Err(NavigateError::Rejected {
                destination: destination.to_owned(),
                reason: "offline".into(),
            })
        }
    }

    pub(crate) fn sample_routes() -> BTreeMap<usize, String> {
        [
            (0, "a/"),
            (1, "b/"),
            (2, "c/"),
            (3, "d/"),
            (4, "e.html"),
            (5, "f.html"),
        ]
        .into_iter()
        .map(|(index, dest)| (index, dest.to_owned()))
        .collect()
    }

    #[test]
    fn resolves_configured_faces_deterministically() {
        let table = RouteTable::from_config(&sample_routes());
        assert_eq!(table.len(), 6);
        for _ in 0..3 {
            assert_eq!(table.resolve(CubeFace::Top), Some("e.html"));
            assert_eq!(table.resolve(CubeFace::Bottom), Some("f.html"));
            assert_eq!(table.resolve(CubeFace::Front), Some("a/"));
        }
    }

    #[test]
    fn unconfigured_and_malformed_routes_are_inert() {
        let routes: BTreeMap<usize, String> = [(1, "  ".to_owned()), (9, "x.html".to_owned())]
            .into_iter()
            .collect();
        let table = RouteTable::from_config(&routes);
        assert!(table.is_empty());
        for face in CubeFace::ALL {
            assert_eq!(table.resolve(face), None);
        }
    }

    #[test]
    fn navigate_hands_destination_to_navigator() {
        let navigator = RecordingNavigator::default();
        let visited = navigator.visited.clone();
        let mut router = FaceRouter::new(
            RouteTable::from_config(&sample_routes()),
            Box::new(navigator),
        );
        assert_eq!(
            router.navigate(CubeFace::Top),
            Navigation::Opened {
                destination: "e.html".into()
            }
        );
        router.navigate(CubeFace::Bottom);
        assert_eq!(*visited.borrow(), vec!["e.html", "f.html"]);
    }

    #[test]
    fn unmapped_face_does_not_navigate() {
        let navigator = RecordingNavigator::default();
        let visited = navigator.visited.clone();
        let mut router = FaceRouter::new(RouteTable::default(), Box::new(navigator));
        assert_eq!(router.navigate(CubeFace::Left), Navigation::Unmapped);
        assert!(visited.borrow().is_empty());
    }

    #[test]
    fn navigator_failure_is_reported() {
        let mut router = FaceRouter::new(
            RouteTable::from_config(&sample_routes()),
            Box::new(FailingNavigator),
        );
        match router.navigate(CubeFace::Right) {
            Navigation::Failed { destination, reason } => {
                assert_eq!(destination, "d/");
                assert!(reason.contains("offline"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

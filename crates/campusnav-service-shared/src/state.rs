//! Application state for HTTP services.
//!
//! Handlers take a snapshot of the current [`Navigator`] and run queries
//! against it without holding any lock. A topology reload builds a complete
//! new navigator first and only then swaps the pointer.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use campusnav_lib::{Error as LibError, Navigator};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Topology file given but missing on disk.
    TopologyNotFound(PathBuf),

    /// Topology could not be loaded or the navigator rejected its config.
    NavigatorLoad(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopologyNotFound(path) => {
                write!(f, "topology not found: {}", path.display())
            }
            Self::NavigatorLoad(e) => write!(f, "failed to load navigator: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NavigatorLoad(e) => Some(e),
            Self::TopologyNotFound(_) => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        match err {
            LibError::TopologyNotFound { path } => Self::TopologyNotFound(path),
            other => Self::NavigatorLoad(other),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheap to clone; every clone observes the same navigator and the same
/// reloads.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    navigator: RwLock<Arc<Navigator>>,
    topology_path: Option<PathBuf>,
}

impl AppState {
    /// Load the topology at `topology_path` (bundled campus when `None`)
    /// and read navigator config from the environment.
    pub fn load(topology_path: Option<&Path>) -> Result<Self, AppStateError> {
        let source = topology_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<bundled>".to_string());
        tracing::info!(source = %source, "loading campus topology");
        let navigator = Navigator::from_env(topology_path)?;
        tracing::info!(
            locations = navigator.graph().len(),
            connections = navigator.graph().edge_count(),
            "navigator ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                navigator: RwLock::new(Arc::new(navigator)),
                topology_path: topology_path.map(Path::to_path_buf),
            }),
        })
    }

    /// Wrap a pre-built navigator, mainly for tests.
    pub fn from_navigator(navigator: Navigator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                navigator: RwLock::new(Arc::new(navigator)),
                topology_path: None,
            }),
        }
    }

    /// Snapshot of the current navigator.
    pub fn navigator(&self) -> Arc<Navigator> {
        match self.inner.navigator.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Swap in a new navigator. In-flight queries keep their old snapshot.
    pub fn replace_navigator(&self, navigator: Navigator) {
        let navigator = Arc::new(navigator);
        match self.inner.navigator.write() {
            Ok(mut guard) => *guard = navigator,
            Err(poisoned) => *poisoned.into_inner() = navigator,
        }
    }

    /// Rebuild the navigator from the topology this state was loaded with.
    pub fn reload(&self) -> Result<(), AppStateError> {
        let source = self
            .topology_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<bundled>".to_string());
        let navigator = Navigator::from_env(self.topology_path())?;
        tracing::info!(
            source = %source,
            locations = navigator.graph().len(),
            "campus topology reloaded"
        );
        self.replace_navigator(navigator);
        Ok(())
    }

    pub fn topology_path(&self) -> Option<&Path> {
        self.inner.topology_path.as_deref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let navigator = self.navigator();
        f.debug_struct("AppState")
            .field("location_count", &navigator.graph().len())
            .field("topology_path", &self.inner.topology_path)
            .finish()
    }
}

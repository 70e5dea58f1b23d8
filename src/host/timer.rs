//! Deferred work scheduling

use std::time::Duration;

/// Work the controller defers until the host's layout has settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredTask {
    /// Try to create the map again. Carries the map epoch it was scheduled in.
    InitMap(u64),
    /// Move the map to the current reading
    RefreshMap,
    /// Recompute the map size
    InvalidateMapSize,
    /// Re-create a map that was hidden, then show the current reading
    ShowMap(u64),
    /// Remove the copy notice with this sequence number
    ClearNotice(u64),
}

/// Host timer. When `delay` elapses the host must call
/// `LocationApp::run_task(task)`.
pub trait Timer {
    fn schedule(&mut self, delay: Duration, task: DeferredTask);
}

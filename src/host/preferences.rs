//! Local key-value preference storage

use crate::host::HostResult;

/// Persistent string preferences (only the theme key is used)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> HostResult<()>;
}

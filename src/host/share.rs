//! Share-sheet capability

use crate::host::HostResult;
use serde::{Deserialize, Serialize};

/// Payload handed to the share sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareData {
    pub title: String,
    pub text: String,
}

/// Host share sheet
pub trait ShareSheet {
    fn is_available(&self) -> bool;

    fn share(&mut self, data: &ShareData) -> HostResult<()>;
}

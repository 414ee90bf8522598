//! Status icons for CLI output

use crate::domain::model::ProvisioningStatus;

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Settled
    pub const SUCCESS: &'static str = "✓";

    /// Work in flight
    pub const PENDING: &'static str = "⏳";

    pub const ERROR: &'static str = "✗";

    /// Gone
    pub const DELETED: &'static str = "∅";

    pub const UNKNOWN: &'static str = "?";

    pub fn for_status(status: &ProvisioningStatus) -> &'static str {
        match status {
            ProvisioningStatus::Active => Self::SUCCESS,
            ProvisioningStatus::Error => Self::ERROR,
            ProvisioningStatus::PendingCreate
            | ProvisioningStatus::PendingUpdate
            | ProvisioningStatus::PendingDelete => Self::PENDING,
            ProvisioningStatus::Deleted => Self::DELETED,
            ProvisioningStatus::Other(_) => Self::UNKNOWN,
        }
    }
}

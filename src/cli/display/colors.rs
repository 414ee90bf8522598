//! Color theme for CLI output

use crate::domain::model::ProvisioningStatus;
use comfy_table::Color as TableColor;

/// Colors keyed by provisioning state
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub settled: TableColor,
    pub pending: TableColor,
    pub failed: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            settled: TableColor::Green,
            pending: TableColor::Yellow,
            failed: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    pub fn status_color(&self, status: &ProvisioningStatus) -> TableColor {
        match status {
            ProvisioningStatus::Active => self.settled,
            ProvisioningStatus::Error => self.failed,
            s if s.is_pending() => self.pending,
            _ => self.muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.status_color(&ProvisioningStatus::Active), TableColor::Green);
        assert_eq!(theme.status_color(&ProvisioningStatus::PendingUpdate), TableColor::Yellow);
        assert_eq!(theme.status_color(&ProvisioningStatus::Error), TableColor::Red);
        assert_eq!(theme.status_color(&ProvisioningStatus::PendingDelete), TableColor::Yellow);
        assert_eq!(theme.status_color(&ProvisioningStatus::Deleted), TableColor::DarkGrey);
        assert_eq!(theme.status_color(&ProvisioningStatus::default()), TableColor::DarkGrey);
    }
}

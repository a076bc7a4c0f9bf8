//! Connected device description.

use std::fmt;

/// Identity of the device a transport is attached to.
///
/// USB identifiers are only known for USB-serial adapters; replay sources
/// report a name and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Port or source name, e.g. `/dev/ttyUSB0` or `stdin`.
    pub name: String,
    /// USB vendor id.
    pub vendor_id: Option<u16>,
    /// USB product id.
    pub product_id: Option<u16>,
}

impl DeviceInfo {
    /// Device with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vendor_id: None,
            product_id: None,
        }
    }

    /// Device with USB identifiers.
    pub fn usb(name: impl Into<String>, vendor_id: u16, product_id: u16) -> Self {
        Self {
            name: name.into(),
            vendor_id: Some(vendor_id),
            product_id: Some(product_id),
        }
    }

    /// Status lines announcing this device in the log.
    pub fn announcement(&self) -> Vec<String> {
        let mut lines = vec!["Connected Devices:".to_string(), format!("- {}", self.name)];
        if let Some(vid) = self.vendor_id {
            lines.push(format!("- {}", vid));
        }
        if let Some(pid) = self.product_id {
            lines.push(format!("- {}", pid));
        }
        lines.push("Waiting for data...".to_string());
        lines
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.vendor_id, self.product_id) {
            (Some(vid), Some(pid)) => write!(f, "{} [{:04x}:{:04x}]", self.name, vid, pid),
            _ => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usb_announcement_lists_ids() {
        let device = DeviceInfo::usb("/dev/ttyUSB0", 1027, 24577);
        assert_eq!(
            device.announcement(),
            vec![
                "Connected Devices:",
                "- /dev/ttyUSB0",
                "- 1027",
                "- 24577",
                "Waiting for data...",
            ]
        );
    }

    #[test]
    fn named_announcement_skips_missing_ids() {
        let device = DeviceInfo::named("stdin");
        assert_eq!(
            device.announcement(),
            vec!["Connected Devices:", "- stdin", "Waiting for data..."]
        );
    }

    #[test]
    fn display_shows_hex_ids() {
        let device = DeviceInfo::usb("/dev/ttyUSB0", 0x0403, 0x6001);
        assert_eq!(device.to_string(), "/dev/ttyUSB0 [0403:6001]");
    }
}

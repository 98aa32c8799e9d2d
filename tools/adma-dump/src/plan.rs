//! TOML transfer plans.
//!
//! A plan lists transfers to render in one go:
//!
//! ```toml
//! [[transfer]]
//! name = "boot partition"
//! address = 0x8800_0000
//! length = 70000
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use usdhc_adma::{AdmaError, DescriptorChain};

/// A parsed plan file.
#[derive(Debug, Deserialize)]
pub struct Plan {
    /// Transfers in file order.
    #[serde(rename = "transfer", default)]
    pub transfers: Vec<Transfer>,
}

/// One planned transfer.
#[derive(Debug, Deserialize)]
pub struct Transfer {
    /// Label printed above the table.
    pub name: String,
    /// Physical start address of the data buffer.
    pub address: u32,
    /// Transfer length in bytes.
    pub length: usize,
}

impl Plan {
    /// Load a plan from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Transfer {
    /// Build the descriptor chain for this transfer.
    pub fn build(&self) -> Result<DescriptorChain, AdmaError> {
        DescriptorChain::build(self.address, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDCARD_PLAN: &str = include_str!("../tests/fixtures/sdcard.toml");

    #[test]
    fn parses_fixture() {
        let plan: Plan = toml::from_str(SDCARD_PLAN).unwrap();
        assert_eq!(plan.transfers.len(), 3);
        assert_eq!(plan.transfers[0].name, "single block");
        assert_eq!(plan.transfers[1].address, 0x8800_0000);
        assert_eq!(plan.transfers[1].length, 70_000);
    }

    #[test]
    fn builds_each_transfer() {
        let plan: Plan = toml::from_str(SDCARD_PLAN).unwrap();
        let counts: Vec<_> = plan
            .transfers
            .iter()
            .map(|t| t.build().map(|chain| chain.len()))
            .collect();
        assert_eq!(counts, [Ok(1), Ok(2), Err(AdmaError::EmptyTransfer)]);
    }

    #[test]
    fn empty_plan_has_no_transfers() {
        let plan: Plan = toml::from_str("").unwrap();
        assert!(plan.transfers.is_empty());
    }

    #[test]
    fn address_must_fit_32_bits() {
        let err = toml::from_str::<Plan>(
            "[[transfer]]\nname = \"high\"\naddress = 0x1_0000_0000\nlength = 512\n",
        );
        assert!(err.is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Plan::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(format!("{err}").starts_with("Failed to read"));
    }
}

//! Tariff tier catalog

use serde::{Deserialize, Serialize};

/// A purchasable tariff tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffTier {
    /// Tier name, stored verbatim in the profile on purchase
    pub name: String,
    /// Description shown on the tier screen
    pub description: String,
}

impl TariffTier {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The configured tier list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tariffs {
    pub tiers: Vec<TariffTier>,
}

impl Default for Tariffs {
    fn default() -> Self {
        Self {
            tiers: vec![
                TariffTier::new("Basic", "Basic tariff\n\nDescription coming soon."),
                TariffTier::new("Value", "Value tariff\n\nDescription coming soon."),
                TariffTier::new("Maximum", "Maximum tariff\n\nDescription coming soon."),
            ],
        }
    }
}

impl Tariffs {
    /// Match a button press against a configured tier name
    pub fn find(&self, text: &str) -> Option<&TariffTier> {
        let text = text.trim();
        self.tiers.iter().find(|t| t.name.eq_ignore_ascii_case(text))
    }

    pub fn names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name.as_str()).collect()
    }
}

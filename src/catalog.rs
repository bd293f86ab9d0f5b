//! Network catalog
//!
//! The ordered list of networks offered by the source selector and shown
//! (read-only) for the destination. Built once and shared for the lifetime of
//! a form.

use std::collections::HashSet;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{NetworkId, NetworkOption};

/// Errors building a catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("network catalog must contain at least one network")]
    Empty,
    #[error("network {0} appears more than once in the catalog")]
    Duplicate(NetworkId),
    #[error("invalid catalog entry '{0}': expected <id>=<label>")]
    InvalidEntry(String),
}

/// Ordered, immutable set of selectable networks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCatalog {
    options: Vec<NetworkOption>,
}

impl NetworkCatalog {
    /// Build a catalog, keeping the given order.
    pub fn new(options: Vec<NetworkOption>) -> Result<Self, CatalogError> {
        if options.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.value) {
                return Err(CatalogError::Duplicate(option.value));
            }
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &[NetworkOption] {
        &self.options
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn contains(&self, id: NetworkId) -> bool {
        self.options.iter().any(|o| o.value == id)
    }

    pub fn label_of(&self, id: NetworkId) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == id)
            .map(|o| o.label.as_str())
    }
}

impl Default for NetworkCatalog {
    fn default() -> Self {
        Self {
            options: vec![
                NetworkOption::new(NetworkId::FUJI_C_CHAIN, "Fuji C-Chain"),
                NetworkOption::new(NetworkId::DEFAULT_L1, "Avalanche L1"),
            ],
        }
    }
}

impl FromStr for NetworkCatalog {
    type Err = CatalogError;

    /// Parse `43113=Fuji C-Chain,173750=Avalanche L1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (id, label) = entry
                .split_once('=')
                .ok_or_else(|| CatalogError::InvalidEntry(entry.to_string()))?;
            let id = NetworkId::from_str(id)
                .map_err(|_| CatalogError::InvalidEntry(entry.to_string()))?;
            let label = label.trim();
            if label.is_empty() {
                return Err(CatalogError::InvalidEntry(entry.to_string()));
            }
            options.push(NetworkOption::new(id, label));
        }
        NetworkCatalog::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let catalog = NetworkCatalog::default();
        let ids: Vec<_> = catalog.iter().map(|o| o.value).collect();
        assert_eq!(ids, vec![NetworkId::FUJI_C_CHAIN, NetworkId::DEFAULT_L1]);
        assert_eq!(catalog.label_of(NetworkId::FUJI_C_CHAIN), Some("Fuji C-Chain"));
    }

    #[test]
    fn test_catalog_rejects_empty() {
        assert_eq!(NetworkCatalog::new(vec![]), Err(CatalogError::Empty));
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = NetworkCatalog::new(vec![
            NetworkOption::new(1u64, "one"),
            NetworkOption::new(1u64, "uno"),
        ]);
        assert_eq!(result, Err(CatalogError::Duplicate(NetworkId(1))));
    }

    #[test]
    fn test_catalog_from_str() {
        let catalog: NetworkCatalog = "43113=Fuji C-Chain, 0x2=Second".parse().unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(NetworkId(2)));
        assert_eq!(catalog.label_of(NetworkId(2)), Some("Second"));
        assert_eq!(catalog.label_of(NetworkId(3)), None);
    }

    #[test]
    fn test_catalog_from_str_invalid_entry() {
        let err = "43113".parse::<NetworkCatalog>().unwrap_err();
        assert_eq!(err, CatalogError::InvalidEntry("43113".to_string()));
        assert!("abc=Label".parse::<NetworkCatalog>().is_err());
        assert!("1=".parse::<NetworkCatalog>().is_err());
        assert_eq!("".parse::<NetworkCatalog>(), Err(CatalogError::Empty));
    }
}

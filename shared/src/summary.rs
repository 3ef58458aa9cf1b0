use std::collections::BTreeMap;
use serde::Serialize;
use crate::types::Asset;

const UNKNOWN: &str = "Unknown";

/// Dashboard counts over the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub total: usize,
    pub desktops: usize,
    pub laptops: usize,
    pub printers: usize,
    pub servers: usize,
    pub active: usize,
    pub in_maintenance: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_location: BTreeMap<String, usize>,
}

impl AssetSummary {
    pub fn from_assets(assets: &[Asset]) -> Self {
        let mut summary = Self {
            total: assets.len(),
            ..Default::default()
        };

        for asset in assets {
            match asset.asset_type.as_str() {
                "Desktop" => summary.desktops += 1,
                "Laptop" => summary.laptops += 1,
                "Printer" => summary.printers += 1,
                "Server" => summary.servers += 1,
                _ => {}
            }
            match asset.status.as_str() {
                "Active" => summary.active += 1,
                "Maintenance" => summary.in_maintenance += 1,
                _ => {}
            }
            bump(&mut summary.by_type, &asset.asset_type);
            bump(&mut summary.by_status, &asset.status);
            bump(&mut summary.by_location, &asset.location);
        }

        summary
    }
}

fn bump(counts: &mut BTreeMap<String, usize>, key: &str) {
    let key = if key.is_empty() { UNKNOWN } else { key };
    *counts.entry(key.to_string()).or_default() += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(asset_type: &str, status: &str, location: &str) -> Asset {
        Asset {
            asset_type: asset_type.to_string(),
            status: status.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts() {
        let assets = vec![
            asset("Desktop", "Active", "Headquarters"),
            asset("Laptop", "Active", "Branch Office"),
            asset("Printer", "Maintenance", "Headquarters"),
            asset("Monitor", "", ""),
        ];
        let summary = AssetSummary::from_assets(&assets);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.desktops, 1);
        assert_eq!(summary.laptops, 1);
        assert_eq!(summary.printers, 1);
        assert_eq!(summary.servers, 0);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.in_maintenance, 1);
        assert_eq!(summary.by_location["Headquarters"], 2);
        assert_eq!(summary.by_location["Unknown"], 1);
        assert_eq!(summary.by_status["Unknown"], 1);
        assert_eq!(summary.by_type["Monitor"], 1);
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(AssetSummary::from_assets(&[]), AssetSummary::default());
    }
}

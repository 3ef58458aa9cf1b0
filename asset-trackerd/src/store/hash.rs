use sha2::{Sha256, Digest};
use shared::types::{Asset, TEXT_FIELDS};

/// Computes a SHA-256 hash of the asset collection.
/// Only text fields take part; `updated_at` moves on every save even when
/// nothing a client displays has changed. Assets are sorted by id so the
/// hash does not depend on row order.
pub fn compute_hash(assets: &[Asset]) -> String {
    let mut indices: Vec<usize> = (0..assets.len()).collect();
    indices.sort_by(|&a, &b| assets[a].asset_id.cmp(&assets[b].asset_id));

    let mut hasher = Sha256::new();
    for &i in &indices {
        for name in TEXT_FIELDS {
            let value = assets[i].field(name).unwrap_or_default();
            // Length prefix keeps field boundaries unambiguous
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn test_asset(asset_id: &str) -> Asset {
        Asset {
            asset_id: asset_id.to_string(),
            hostname: "UB-DEV-001".to_string(),
            status: "Active".to_string(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    #[test]
    fn test_hash_deterministic() {
        let a = test_asset("UBITASTPC001");
        let b = test_asset("UBITASTPC002");

        let hash1 = compute_hash(&[a.clone(), b.clone()]);
        let hash2 = compute_hash(&[b, a]);

        assert_eq!(hash1, hash2, "Hash should be same regardless of input order");
    }

    #[test]
    fn test_hash_changes_on_modification() {
        let a = test_asset("UBITASTPC001");
        let mut b = test_asset("UBITASTPC001");
        b.status = "Maintenance".to_string();

        assert_ne!(compute_hash(&[a]), compute_hash(&[b]), "Hash should change when an asset changes");
    }

    #[test]
    fn test_hash_detects_shifted_field_boundaries() {
        let mut a = test_asset("UBITASTPC001");
        a.hostname = "AB".to_string();
        a.location = String::new();
        let mut b = a.clone();
        b.hostname = "A".to_string();
        b.location = "B".to_string();

        assert_ne!(compute_hash(&[a]), compute_hash(&[b]));
    }

    #[test]
    fn test_hash_stable_across_timestamp_changes() {
        let a = test_asset("UBITASTPC001");
        let mut b = test_asset("UBITASTPC001");
        b.updated_at = Some(Utc::now() + Duration::seconds(60));
        b.created_at = Some(Utc::now() - Duration::seconds(60));

        assert_eq!(compute_hash(&[a]), compute_hash(&[b]), "Hash should not change when only timestamps change");
    }
}

use std::path::Path;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use shared::asset_id::{next_asset_id, parse_sequence, DeviceCode, IdScheme};
use shared::protocol::{DEFAULT_STATUS, MAX_ID_LEN};
use shared::types::{Asset, TEXT_FIELDS};
use shared::validate::validate;
use crate::store::error::{StoreError, StoreResult};

const CREATED_AT_IDX: usize = TEXT_FIELDS.len();
const UPDATED_AT_IDX: usize = TEXT_FIELDS.len() + 1;

pub struct AssetDb {
    conn: Connection,
    select_sql: String,
    insert_sql: String,
    update_sql: String,
}

impl AssetDb {
    /// Open or create the SQLite database with WAL mode enabled
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to enable WAL mode")?;

        conn.execute_batch(&schema_sql())
            .context("Failed to create database schema")?;

        let columns = all_columns().join(", ");
        let placeholders = (1..=all_columns().len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        // asset_id and created_at never change after insert
        let assignments = TEXT_FIELDS[1..]
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{name} = ?{}", i + 2))
            .chain(std::iter::once(format!("updated_at = ?{}", UPDATED_AT_IDX + 1)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            conn,
            select_sql: format!("SELECT {columns} FROM assets"),
            insert_sql: format!("INSERT INTO assets ({columns}) VALUES ({placeholders})"),
            update_sql: format!("UPDATE assets SET {assignments} WHERE asset_id = ?1"),
        })
    }

    /// All assets in insertion order
    pub fn list_assets(&self) -> Result<Vec<Asset>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY rowid", self.select_sql))
            .context("Failed to prepare query")?;

        let assets = stmt
            .query_map([], row_to_asset)
            .context("Failed to query assets")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect assets")?;

        Ok(assets)
    }

    /// Get a single asset by id
    pub fn get_asset(&self, asset_id: &str) -> Result<Option<Asset>> {
        get_asset(&self.conn, &self.select_sql, asset_id)
    }

    /// Every identifier currently stored
    pub fn existing_ids(&self) -> Result<Vec<String>> {
        existing_ids(&self.conn)
    }

    /// Store a new asset under a freshly allocated identifier.
    ///
    /// Any `asset_id` on the draft is discarded. Reading the identifiers in use
    /// and inserting happen in one transaction.
    pub fn create_asset(&mut self, draft: Asset, scheme: &IdScheme, now: DateTime<Utc>) -> StoreResult<Asset> {
        let mut asset = draft;
        asset.asset_id.clear();
        validate(&asset)?;

        let code = DeviceCode::from_asset_type(&asset.asset_type);
        let tx = self.conn.transaction().context("Failed to begin transaction")?;

        let ids = existing_ids(&tx)?;
        asset.asset_id = next_asset_id(ids.iter().map(String::as_str), code, scheme)?;
        asset.created_at = Some(now);
        asset.updated_at = Some(now);

        insert_asset(&tx, &self.insert_sql, &asset)?;
        tx.commit().context("Failed to commit create")?;

        Ok(asset)
    }

    /// Replace the stored fields of `asset_id`, keeping its identifier, type,
    /// and creation time.
    pub fn update_asset(&mut self, asset_id: &str, changes: Asset, now: DateTime<Utc>) -> StoreResult<Asset> {
        let tx = self.conn.transaction().context("Failed to begin transaction")?;

        let existing = get_asset(&tx, &self.select_sql, asset_id)?
            .ok_or_else(|| StoreError::NotFound(asset_id.to_string()))?;

        let mut asset = changes;
        if asset.asset_id.is_empty() {
            asset.asset_id = existing.asset_id.clone();
        } else if asset.asset_id != existing.asset_id {
            return Err(StoreError::Invalid("asset_id cannot be changed".to_string()));
        }
        validate(&asset)?;
        if asset.asset_type != existing.asset_type {
            return Err(StoreError::Invalid("asset_type cannot be changed".to_string()));
        }

        asset.created_at = existing.created_at;
        asset.updated_at = Some(now);

        tx.execute(&self.update_sql, params_from_iter(row_values(&asset)))
            .context("Failed to update asset")?;
        tx.commit().context("Failed to commit update")?;

        Ok(asset)
    }

    /// Delete an asset. Returns true if a row was removed.
    pub fn delete_asset(&self, asset_id: &str) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM assets WHERE asset_id = ?1", params![asset_id])
            .context("Failed to delete asset")?;
        Ok(count > 0)
    }

    /// Insert a batch of records atomically.
    ///
    /// Records without an `asset_id` get one allocated; earlier records in the
    /// batch count as existing. An explicit `asset_id` must be a well-formed
    /// identifier for the record's device code. A blank status defaults to "Active". The first
    /// invalid or duplicate record aborts the whole batch.
    pub fn import_assets(&mut self, records: Vec<Asset>, scheme: &IdScheme, now: DateTime<Utc>) -> StoreResult<Vec<Asset>> {
        let tx = self.conn.transaction().context("Failed to begin transaction")?;
        let mut ids = existing_ids(&tx)?;
        let mut imported = Vec::with_capacity(records.len());

        for (index, mut asset) in records.into_iter().enumerate() {
            if asset.status.trim().is_empty() {
                asset.status = DEFAULT_STATUS.to_string();
            }
            validate(&asset).map_err(|e| StoreError::Invalid(format!("record {index}: {e}")))?;

            let code = DeviceCode::from_asset_type(&asset.asset_type);
            if asset.asset_id.is_empty() {
                asset.asset_id = next_asset_id(ids.iter().map(String::as_str), code, scheme)?;
            } else if parse_sequence(&asset.asset_id, code).is_none() {
                return Err(StoreError::Invalid(format!(
                    "record {index}: asset_id {:?} is not a valid {} identifier",
                    asset.asset_id, code
                )));
            }
            asset.created_at = Some(now);
            asset.updated_at = Some(now);

            insert_asset(&tx, &self.insert_sql, &asset)?;
            ids.push(asset.asset_id.clone());
            imported.push(asset);
        }

        tx.commit().context("Failed to commit import")?;
        Ok(imported)
    }
}

fn all_columns() -> Vec<&'static str> {
    TEXT_FIELDS
        .iter()
        .copied()
        .chain(["created_at", "updated_at"])
        .collect()
}

fn schema_sql() -> String {
    let text_columns: String = TEXT_FIELDS[1..]
        .iter()
        .map(|name| format!("                {name} TEXT NOT NULL DEFAULT '',\n"))
        .collect();

    format!(
        r#"
            CREATE TABLE IF NOT EXISTS assets (
                asset_id TEXT PRIMARY KEY NOT NULL CHECK (length(asset_id) <= {MAX_ID_LEN}),
{text_columns}                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_asset_type ON assets(asset_type);
            CREATE INDEX IF NOT EXISTS idx_status ON assets(status);
            "#
    )
}

fn get_asset(conn: &Connection, select_sql: &str, asset_id: &str) -> Result<Option<Asset>> {
    conn.query_row(
        &format!("{select_sql} WHERE asset_id = ?1"),
        params![asset_id],
        row_to_asset,
    )
    .optional()
    .context("Failed to query asset")
}

fn existing_ids(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT asset_id FROM assets")
        .context("Failed to prepare query")?;

    let ids = stmt
        .query_map([], |row| row.get(0))
        .context("Failed to query asset ids")?
        .collect::<Result<Vec<String>, _>>()
        .context("Failed to collect asset ids")?;

    Ok(ids)
}

fn insert_asset(conn: &Connection, insert_sql: &str, asset: &Asset) -> StoreResult<()> {
    match conn.execute(insert_sql, params_from_iter(row_values(asset))) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(StoreError::Duplicate(asset.asset_id.clone()))
        }
        Err(e) => Err(anyhow::Error::new(e).context("Failed to insert asset").into()),
    }
}

/// Column values in `all_columns()` order
fn row_values(asset: &Asset) -> Vec<String> {
    TEXT_FIELDS
        .iter()
        .map(|name| asset.field(name).unwrap_or_default().to_string())
        .chain([timestamp(asset.created_at), timestamp(asset.updated_at)])
        .collect()
}

fn timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339()).unwrap_or_default()
}

/// Helper to convert a database row to an Asset
fn row_to_asset(row: &rusqlite::Row) -> Result<Asset, rusqlite::Error> {
    let mut asset = Asset::default();
    for (idx, name) in TEXT_FIELDS.iter().enumerate() {
        if let Some(slot) = asset.field_mut(name) {
            *slot = row.get(idx)?;
        }
    }
    asset.created_at = parse_timestamp(row, CREATED_AT_IDX)?;
    asset.updated_at = parse_timestamp(row, UPDATED_AT_IDX)?;
    Ok(asset)
}

fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> Result<Option<DateTime<Utc>>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    if raw.is_empty() {
        return Ok(None);
    }
    let ts = DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(e),
        ))?
        .with_timezone(&Utc);
    Ok(Some(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(asset_type: &str, hostname: &str) -> Asset {
        Asset {
            hostname: hostname.to_string(),
            asset_type: asset_type.to_string(),
            serial_number: format!("SN-{hostname}"),
            location: "Headquarters".to_string(),
            status: "Active".to_string(),
            used_by: "John Doe".to_string(),
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-05-15T10:30:00Z".parse().unwrap()
    }

    #[test]
    fn test_create_and_query() {
        let mut db = AssetDb::open(":memory:").unwrap();

        let created = db.create_asset(draft("Desktop", "UB-DEV-001"), &IdScheme::default(), now()).unwrap();
        assert_eq!(created.asset_id, "UBITASTPC001");
        assert_eq!(created.created_at, Some(now()));

        let retrieved = db.get_asset("UBITASTPC001").unwrap().unwrap();
        assert_eq!(retrieved, created);
    }

    #[test]
    fn test_create_allocates_per_device_code() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let scheme = IdScheme::default();

        let ids: Vec<_> = [
            ("Desktop", "UB-DEV-001"),
            ("Desktop", "UB-DEV-002"),
            ("Laptop", "UB-LAP-001"),
            ("Monitor", "UB-MON-001"),
        ]
        .into_iter()
        .map(|(t, h)| db.create_asset(draft(t, h), &scheme, now()).unwrap().asset_id)
        .collect();

        assert_eq!(ids, ["UBITASTPC001", "UBITASTPC002", "UBITASTLP001", "UBITASTOT001"]);
    }

    #[test]
    fn test_create_ignores_client_id_and_validates() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let mut asset = draft("Server", "UB-SRV-001");
        asset.asset_id = "UBITASTSV500".to_string();
        let created = db.create_asset(asset, &IdScheme::default(), now()).unwrap();
        assert_eq!(created.asset_id, "UBITASTSV001");

        let err = db.create_asset(Asset::default(), &IdScheme::default(), now()).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert_eq!(db.list_assets().unwrap().len(), 1);
    }

    #[test]
    fn test_create_reports_exhausted_sequence() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let mut last = draft("Phone", "UB-PH-999");
        last.asset_id = "UBITASTPH999".to_string();
        db.import_assets(vec![last], &IdScheme::default(), now()).unwrap();

        let err = db.create_asset(draft("Phone", "UB-PH-X"), &IdScheme::default(), now()).unwrap_err();
        assert!(matches!(err, StoreError::Id(_)));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let scheme = IdScheme::default();
        db.create_asset(draft("Printer", "UB-PRN-001"), &scheme, now()).unwrap();
        db.create_asset(draft("Desktop", "UB-DEV-001"), &scheme, now()).unwrap();

        let hostnames: Vec<_> = db.list_assets().unwrap().into_iter().map(|a| a.hostname).collect();
        assert_eq!(hostnames, ["UB-PRN-001", "UB-DEV-001"]);
    }

    #[test]
    fn test_update_keeps_identity_and_created_at() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let created = db.create_asset(draft("Laptop", "UB-LAP-001"), &IdScheme::default(), now()).unwrap();

        let later = now() + Duration::hours(2);
        let mut changes = created.clone();
        changes.asset_id.clear();
        changes.used_by = "Tom Wilson".to_string();
        changes.last_used_by = "John Doe".to_string();
        changes.created_at = Some(later);

        let updated = db.update_asset(&created.asset_id, changes, later).unwrap();
        assert_eq!(updated.asset_id, created.asset_id);
        assert_eq!(updated.created_at, Some(now()));
        assert_eq!(updated.updated_at, Some(later));

        let stored = db.get_asset(&created.asset_id).unwrap().unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.used_by, "Tom Wilson");
    }

    #[test]
    fn test_update_rejects_identity_changes() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let created = db.create_asset(draft("Laptop", "UB-LAP-001"), &IdScheme::default(), now()).unwrap();

        let mut retyped = created.clone();
        retyped.asset_type = "Desktop".to_string();
        let err = db.update_asset(&created.asset_id, retyped, now()).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(msg) if msg.contains("asset_type")));

        let mut renamed = created.clone();
        renamed.asset_id = "UBITASTLP002".to_string();
        let err = db.update_asset(&created.asset_id, renamed, now()).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(msg) if msg.contains("asset_id")));
    }

    #[test]
    fn test_update_missing_asset() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let err = db.update_asset("UBITASTPC404", draft("Desktop", "X"), now()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "UBITASTPC404"));
    }

    #[test]
    fn test_delete() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let created = db.create_asset(draft("Tablet", "UB-TAB-001"), &IdScheme::default(), now()).unwrap();

        assert!(db.delete_asset(&created.asset_id).unwrap());
        assert!(!db.delete_asset(&created.asset_id).unwrap());
        assert!(db.get_asset(&created.asset_id).unwrap().is_none());
    }

    #[test]
    fn test_import_allocates_within_batch() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let scheme = IdScheme::default();
        db.create_asset(draft("Desktop", "UB-DEV-001"), &scheme, now()).unwrap();

        let mut unstatused = draft("Laptop", "UB-LAP-001");
        unstatused.status.clear();
        let imported = db
            .import_assets(
                vec![draft("Desktop", "UB-DEV-002"), unstatused, draft("Desktop", "UB-DEV-003")],
                &scheme,
                now(),
            )
            .unwrap();

        let ids: Vec<_> = imported.iter().map(|a| a.asset_id.as_str()).collect();
        assert_eq!(ids, ["UBITASTPC002", "UBITASTLP001", "UBITASTPC003"]);
        assert_eq!(imported[1].status, "Active");
        assert_eq!(db.list_assets().unwrap().len(), 4);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let scheme = IdScheme::default();
        let existing = db.create_asset(draft("Desktop", "UB-DEV-001"), &scheme, now()).unwrap();

        let mut clash = draft("Desktop", "UB-DEV-009");
        clash.asset_id = existing.asset_id.clone();
        let err = db
            .import_assets(vec![draft("Laptop", "UB-LAP-001"), clash], &scheme, now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(id) if id == "UBITASTPC001"));

        let err = db
            .import_assets(vec![draft("Laptop", "UB-LAP-001"), Asset::default()], &scheme, now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(msg) if msg.starts_with("record 1:")));

        assert_eq!(db.list_assets().unwrap().len(), 1);
    }

    #[test]
    fn test_import_rejects_malformed_explicit_ids() {
        let mut db = AssetDb::open(":memory:").unwrap();
        let scheme = IdScheme::default();

        for bad_id in ["hash", "next-id", "UBITASTLP001", "UBITASTPC01"] {
            let mut record = draft("Desktop", "UB-DEV-001");
            record.asset_id = bad_id.to_string();
            let err = db
                .import_assets(vec![draft("Laptop", "UB-LAP-001"), record], &scheme, now())
                .unwrap_err();
            assert!(matches!(err, StoreError::Invalid(msg) if msg.starts_with("record 1:")), "{bad_id}");
        }
        assert!(db.list_assets().unwrap().is_empty());

        // Foreign prefix letters are still a well-formed identifier
        let mut record = draft("Desktop", "UB-DEV-001");
        record.asset_id = "ACHRINVPC042".to_string();
        let imported = db.import_assets(vec![record], &scheme, now()).unwrap();
        assert_eq!(imported[0].asset_id, "ACHRINVPC042");
    }
}

use std::fmt;
use serde::Serialize;
use crate::protocol::{MAX_HOSTNAME_LEN, MAX_ID_LEN};
use crate::types::Asset;

/// Fields that must be non-empty on every stored record
pub const REQUIRED_FIELDS: [&str; 5] = ["hostname", "asset_type", "serial_number", "location", "status"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found on a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Required-field and length checks.
pub fn validate(asset: &Asset) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if asset.field(field).is_some_and(|v| v.trim().is_empty()) {
            errors.push(FieldError { field, message: "is required".to_string() });
        }
    }

    if asset.hostname.chars().count() > MAX_HOSTNAME_LEN {
        errors.push(FieldError {
            field: "hostname",
            message: format!("must be at most {MAX_HOSTNAME_LEN} characters"),
        });
    }

    if asset.asset_id.chars().count() > MAX_ID_LEN {
        errors.push(FieldError {
            field: "asset_id",
            message: format!("must be at most {MAX_ID_LEN} characters"),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

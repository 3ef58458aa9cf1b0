pub mod asset_id;
pub mod filter;
pub mod options;
pub mod protocol;
pub mod summary;
pub mod types;
pub mod validate;

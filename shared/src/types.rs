use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked hardware asset.
/// This is the canonical record used by the tracker daemon, its API, and any client.
///
/// Every descriptive field is free text. Fields missing from incoming JSON
/// deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    /// Allocated identifier, e.g. "UBITASTPC001"
    pub asset_id: String,
    pub hostname: String,
    pub location: String,
    pub floor: String,
    pub status: String,
    pub ip_address: String,
    pub lan_mac_address: String,
    /// Current user
    pub used_by: String,
    /// Previous user
    pub last_used_by: String,
    pub ip_type: String,
    pub category: String,
    /// Manufacturer
    pub company: String,
    pub model_no: String,
    pub serial_number: String,
    pub processor: String,
    pub generation: String,
    pub ram: String,
    pub hdd_ssd: String,
    pub hdd_nvme: String,
    pub hdd_sata: String,
    pub monitor_type: String,
    pub monitor_model: String,
    pub monitor_serial: String,
    pub keyboard: String,
    pub mouse: String,
    pub graphics_card: String,
    pub laptop_battery: String,
    pub antivirus: String,
    pub definitions: String,
    pub domain_workgroup: String,
    pub domain_user: String,
    pub domain_password: String,
    pub local_user: String,
    pub local_password: String,
    pub windows_version: String,
    pub windows_key: String,
    pub ms_office_version: String,
    pub email_id: String,
    pub internet_enabled: String,
    /// Asset type label, e.g. "Desktop". Selects the device code.
    pub asset_type: String,
    pub printer_model: String,
    pub printer_serial: String,
    pub date_of_issue: String,

    /// Set once when the record is first stored
    pub created_at: Option<DateTime<Utc>>,

    /// Refreshed on every mutation
    pub updated_at: Option<DateTime<Utc>>,
}

/// Names of every text field on [`Asset`], in storage column order.
pub const TEXT_FIELDS: [&str; 43] = [
    "asset_id",
    "hostname",
    "location",
    "floor",
    "status",
    "ip_address",
    "lan_mac_address",
    "used_by",
    "last_used_by",
    "ip_type",
    "category",
    "company",
    "model_no",
    "serial_number",
    "processor",
    "generation",
    "ram",
    "hdd_ssd",
    "hdd_nvme",
    "hdd_sata",
    "monitor_type",
    "monitor_model",
    "monitor_serial",
    "keyboard",
    "mouse",
    "graphics_card",
    "laptop_battery",
    "antivirus",
    "definitions",
    "domain_workgroup",
    "domain_user",
    "domain_password",
    "local_user",
    "local_password",
    "windows_version",
    "windows_key",
    "ms_office_version",
    "email_id",
    "internet_enabled",
    "asset_type",
    "printer_model",
    "printer_serial",
    "date_of_issue",
];

impl Asset {
    /// Look up a text field by its wire name. Returns `None` for names that
    /// are not text fields (including the two timestamps).
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "asset_id" => &self.asset_id,
            "hostname" => &self.hostname,
            "location" => &self.location,
            "floor" => &self.floor,
            "status" => &self.status,
            "ip_address" => &self.ip_address,
            "lan_mac_address" => &self.lan_mac_address,
            "used_by" => &self.used_by,
            "last_used_by" => &self.last_used_by,
            "ip_type" => &self.ip_type,
            "category" => &self.category,
            "company" => &self.company,
            "model_no" => &self.model_no,
            "serial_number" => &self.serial_number,
            "processor" => &self.processor,
            "generation" => &self.generation,
            "ram" => &self.ram,
            "hdd_ssd" => &self.hdd_ssd,
            "hdd_nvme" => &self.hdd_nvme,
            "hdd_sata" => &self.hdd_sata,
            "monitor_type" => &self.monitor_type,
            "monitor_model" => &self.monitor_model,
            "monitor_serial" => &self.monitor_serial,
            "keyboard" => &self.keyboard,
            "mouse" => &self.mouse,
            "graphics_card" => &self.graphics_card,
            "laptop_battery" => &self.laptop_battery,
            "antivirus" => &self.antivirus,
            "definitions" => &self.definitions,
            "domain_workgroup" => &self.domain_workgroup,
            "domain_user" => &self.domain_user,
            "domain_password" => &self.domain_password,
            "local_user" => &self.local_user,
            "local_password" => &self.local_password,
            "windows_version" => &self.windows_version,
            "windows_key" => &self.windows_key,
            "ms_office_version" => &self.ms_office_version,
            "email_id" => &self.email_id,
            "internet_enabled" => &self.internet_enabled,
            "asset_type" => &self.asset_type,
            "printer_model" => &self.printer_model,
            "printer_serial" => &self.printer_serial,
            "date_of_issue" => &self.date_of_issue,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Mutable counterpart of [`Asset::field`]
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let value = match name {
            "asset_id" => &mut self.asset_id,
            "hostname" => &mut self.hostname,
            "location" => &mut self.location,
            "floor" => &mut self.floor,
            "status" => &mut self.status,
            "ip_address" => &mut self.ip_address,
            "lan_mac_address" => &mut self.lan_mac_address,
            "used_by" => &mut self.used_by,
            "last_used_by" => &mut self.last_used_by,
            "ip_type" => &mut self.ip_type,
            "category" => &mut self.category,
            "company" => &mut self.company,
            "model_no" => &mut self.model_no,
            "serial_number" => &mut self.serial_number,
            "processor" => &mut self.processor,
            "generation" => &mut self.generation,
            "ram" => &mut self.ram,
            "hdd_ssd" => &mut self.hdd_ssd,
            "hdd_nvme" => &mut self.hdd_nvme,
            "hdd_sata" => &mut self.hdd_sata,
            "monitor_type" => &mut self.monitor_type,
            "monitor_model" => &mut self.monitor_model,
            "monitor_serial" => &mut self.monitor_serial,
            "keyboard" => &mut self.keyboard,
            "mouse" => &mut self.mouse,
            "graphics_card" => &mut self.graphics_card,
            "laptop_battery" => &mut self.laptop_battery,
            "antivirus" => &mut self.antivirus,
            "definitions" => &mut self.definitions,
            "domain_workgroup" => &mut self.domain_workgroup,
            "domain_user" => &mut self.domain_user,
            "domain_password" => &mut self.domain_password,
            "local_user" => &mut self.local_user,
            "local_password" => &mut self.local_password,
            "windows_version" => &mut self.windows_version,
            "windows_key" => &mut self.windows_key,
            "ms_office_version" => &mut self.ms_office_version,
            "email_id" => &mut self.email_id,
            "internet_enabled" => &mut self.internet_enabled,
            "asset_type" => &mut self.asset_type,
            "printer_model" => &mut self.printer_model,
            "printer_serial" => &mut self.printer_serial,
            "date_of_issue" => &mut self.date_of_issue,
            _ => return None,
        };
        Some(value)
    }
}

use serde::Serialize;

/// Option lists offered by the asset form's dropdowns
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DropdownOptions {
    pub locations: &'static [&'static str],
    pub floors: &'static [&'static str],
    pub statuses: &'static [&'static str],
    pub ip_types: &'static [&'static str],
    pub categories: &'static [&'static str],
    pub companies: &'static [&'static str],
    pub generations: &'static [&'static str],
    pub ram_sizes: &'static [&'static str],
    pub storage_sizes: &'static [&'static str],
    pub keyboards: &'static [&'static str],
    pub mice: &'static [&'static str],
    pub laptop_batteries: &'static [&'static str],
    pub antivirus_software: &'static [&'static str],
    pub definitions: &'static [&'static str],
    pub windows_versions: &'static [&'static str],
    pub office_versions: &'static [&'static str],
    pub internet_enabled: &'static [&'static str],
    pub asset_types: &'static [&'static str],
}

const NA: &str = "Not Applicable";

pub const OPTIONS: DropdownOptions = DropdownOptions {
    locations: &["Headquarters", "Branch Office", "Data Center", "Remote Office", "Warehouse"],
    floors: &["Basement", "Ground Floor", "1st Floor", "2nd Floor", "3rd Floor", "4th Floor", "5th Floor"],
    statuses: &["Active", "Inactive", "Maintenance", "Decommissioned", "In Storage", "Lost/Stolen"],
    ip_types: &["Static", "DHCP", NA],
    categories: &[
        "Development", "Management", "Accounting", "Marketing", "Sales", "HR", "Printing", "Networking",
        "General Use",
    ],
    companies: &["Dell", "HP", "Lenovo", "Apple", "Microsoft", "Asus", "Acer", "Cisco", "Samsung"],
    generations: &["8th Gen", "9th Gen", "10th Gen", "11th Gen", "12th Gen", "13th Gen", NA],
    ram_sizes: &["4GB", "8GB", "16GB", "32GB", "64GB", NA],
    storage_sizes: &["128GB", "256GB", "512GB", "1TB", "2TB", NA],
    keyboards: &["Dell KB216", "Logitech K120", "Microsoft Ergonomic", "HP Standard", "Built-in", NA],
    mice: &["Dell MS116", "Logitech M100", "Microsoft Basic", "HP Standard", "Built-in Trackpad", NA],
    laptop_batteries: &["New", "Good", "Fair", "Poor", "Needs Replacement", NA],
    antivirus_software: &[
        "Windows Defender", "McAfee", "Norton", "Avast", "Kaspersky", "AVG", "Bitdefender", NA,
    ],
    definitions: &["Updated", "Outdated", NA],
    windows_versions: &[
        "Windows 10 Home", "Windows 10 Pro", "Windows 10 Enterprise", "Windows 11 Home", "Windows 11 Pro",
        "Windows 11 Enterprise", NA,
    ],
    office_versions: &["Microsoft 365", "Office 2021", "Office 2019", "Office 2016", "Office 2013", NA],
    internet_enabled: &["Yes", "No", "Limited"],
    asset_types: &["Desktop", "Laptop", "Server", "Printer", "Network Device", "Tablet", "Phone", "Monitor", "Other"],
};

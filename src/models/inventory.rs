use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vendor {
    pub id: i32,
    pub name: String,
    pub country: String,
}

/// Device model joined with its vendor's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceModel {
    pub id: i32,
    pub vendor_id: i32,
    pub vendor_name: String,
    pub name: String,
    pub device_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub note: String,
}

/// Flattened row for the device list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceListItem {
    pub id: i32,
    pub vendor_name: String,
    pub model_name: String,
    pub location_name: String,
    pub serial_number: String,
    pub inventory_number: String,
    pub status: String,
    pub installed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: i32,
    pub model_id: i32,
    pub location_id: Option<i32>,
    pub serial_number: String,
    pub inventory_number: String,
    pub status: String,
    pub installed_at: String,
    pub description: String,
}

/// Normalized input for creating or updating a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInput {
    pub model_id: i32,
    pub location_id: Option<i32>,
    pub serial_number: Option<String>,
    pub inventory_number: Option<String>,
    pub status: String,
    pub installed_at: Option<String>,
    pub description: Option<String>,
}

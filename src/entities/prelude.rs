pub use super::device_models::Entity as DeviceModels;
pub use super::devices::Entity as Devices;
pub use super::locations::Entity as Locations;
pub use super::users::Entity as Users;
pub use super::vendors::Entity as Vendors;

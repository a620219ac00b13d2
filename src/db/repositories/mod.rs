pub mod device;
pub mod device_model;
pub mod location;
pub mod user;
pub mod vendor;

pub mod prelude;

pub mod device_models;
pub mod devices;
pub mod locations;
pub mod users;
pub mod vendors;

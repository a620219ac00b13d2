mod database;
mod users;

pub use database::{cmd_migrate, cmd_seed};
pub use users::{cmd_users_approve, cmd_users_list};

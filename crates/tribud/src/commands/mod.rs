pub mod backup;
pub mod check;
pub mod config;

pub use backup::Backup;
pub use check::Check;
pub use config::Config;

mod backup;
mod locate;
mod purge;
mod status;

// Backup commands
pub use backup::run_backup;

// Status commands
pub use status::run_status;

// Retention commands
pub use purge::run_purge;

// Location commands
pub use locate::run_locate;

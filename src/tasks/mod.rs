pub mod analytics;
pub mod auto_sync;

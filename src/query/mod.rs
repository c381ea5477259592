pub mod commands;

pub use commands::{get_detail, get_ingest_metrics, get_summary, QueryError};

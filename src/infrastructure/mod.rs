//! Infrastructure layer for filesystem, URL and history interactions.

pub mod history;
pub mod paths;
pub mod query_string;

pub use history::{MemoryHistory, UrlSink};
pub use paths::{expand_tilde, get_config_file, get_data_dir};

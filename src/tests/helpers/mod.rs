pub mod backend;
pub mod encoder;
pub mod tempdir;

pub use backend::{Reply, ScriptedBackend, serve_once};
pub use encoder::{BrokenEncoder, HashingEncoder};
pub use tempdir::unique_temp_dir;

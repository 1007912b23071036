//! Local output layout

pub mod path;

pub use path::local_path_for_key;

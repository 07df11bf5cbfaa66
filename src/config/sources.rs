pub mod environment;
pub mod global_file;
pub mod plugin_dir;
pub mod system_file;

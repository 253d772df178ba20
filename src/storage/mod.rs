mod file;

pub use file::{
    ensure_td2, export_project_text, load_project_text, parse_project_text, suggested_file_name,
    MainSettings, ProjectFile,
};

/// Version string written into exported files
pub const FILE_FORMAT_VERSION: &str = "2.6.1h";

/// Extension given to saved diagrams
pub const FILE_EXTENSION: &str = ".TD2";

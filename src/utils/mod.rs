pub mod paths;
pub mod terminal;

pub use paths::{MAX_EXPORT_FILE_BYTES, format_path_with_tilde, validate_file_size};
pub use terminal::{one_line_preview, sanitize};

pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{get_config_dir, get_data_dir};
pub use paths::{
    MAX_FILE_SIZE_BYTES, format_path_with_tilde, read_bounded, validate_file_name, validate_file_size,
};
pub use terminal::sanitize_for_terminal;

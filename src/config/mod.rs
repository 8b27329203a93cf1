//! Configuration system
//!
//! TOML file at `<data dir>/config.toml`, declared with `config_struct!`
//! so every field carries its default next to its type.

mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{
    get_config_clone, load_config, load_config_from_path, parse_config, read_config_file,
    with_config, CONFIG,
};

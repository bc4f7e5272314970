pub mod toml_loader;

pub use toml_loader::{load_question_seed, parse_question_seed};

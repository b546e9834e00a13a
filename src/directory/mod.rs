mod languages;
mod missing;

pub use languages::{all_languages, language_name, primary_code};
pub use missing::{check_missing, MissingPodcast};

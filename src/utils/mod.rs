pub mod constants;
pub mod html_text;

pub use constants::*;
pub use html_text::{escape_attr, escape_text, strip_tags, truncate_for_log};

//! Output rendering: HTML post descriptions and RSS 2.0 serialization.

mod description;
mod rss;

pub use description::render_description;
pub use rss::write_rss;

pub mod feed;
pub mod post;

pub use feed::{FeedEntry, FeedResult};
pub use post::{PostImage, PostItem, PostKind, ProfileMeta};

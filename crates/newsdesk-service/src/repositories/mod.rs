mod news;
mod posts;
mod traits;

pub use news::SqliteNewsRepository;
pub use posts::SqlitePostRepository;
pub use traits::{NewsRepository, PostRepository};

pub mod reddit;
pub mod twitter;
pub mod web;

pub use reddit::RedditClient;
pub use twitter::TwitterOEmbedClient;
pub use web::WebSource;

pub mod fetcher;
pub mod mojo;

pub use fetcher::ReqwestFetcher;
pub use mojo::{MojoParser, PageLayout};

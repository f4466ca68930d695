pub mod effects;
pub mod feed;
pub mod scene;
pub mod snapshot;

pub mod classifier;
pub mod cli;
pub mod feed;
pub mod feed_manager;
pub mod models;
pub mod render_engine;
pub mod scene_generator;
pub mod seeded_hash;
pub mod settings;
pub mod simulation;

pub use classifier::classify;
pub use cli::Args;
pub use feed::FeedController;
pub use feed_manager::FeedManager;
pub use render_engine::RenderEngine;
pub use scene_generator::generate;
pub use settings::Settings;
pub use simulation::ParticleSimulation;

pub mod config;
pub mod error;
pub mod inventory;
pub mod resolver;
pub mod settings;
pub mod utils;
pub mod vars;
pub mod wrappers;

pub use config::BastionConfig;
pub use error::Error;
pub use inventory::InventoryFetcher;
pub use resolver::BastionResolver;
pub use settings::Settings;

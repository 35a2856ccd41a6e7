pub mod config;
pub mod file_store;
pub mod memory_store;
pub mod mock_generator;
pub mod paths;

pub use config::AppConfig;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use mock_generator::MockReportGenerator;
pub use paths::ForgePaths;

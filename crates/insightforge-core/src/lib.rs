pub mod error;
pub mod generator;
pub mod report;
pub mod state;
pub mod store;
pub mod theme;
pub mod user;

// Re-export common types
pub use error::{ForgeError, Result};
pub use generator::ReportGenerator;
pub use report::{HistoryItem, Report, ResearchRequest};
pub use state::ViewState;
pub use store::{Store, StorageBackend};
pub use theme::ThemeMode;
pub use user::User;

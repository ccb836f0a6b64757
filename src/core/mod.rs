// Storage collaborator
// Trait consumed by the search orchestrator and its sea-orm implementation

pub mod store;
pub mod traits;

// Re-export commonly used items
pub use store::SeaOrmStore;
pub use traits::SearchStore;

pub mod region_flow;
pub mod region_store;
pub mod session;
pub mod suggestions;
pub mod viewport;

pub use region_flow::{pending_region, Committed, FlowStage, RegionCreationFlow};
pub use region_store::RegionStore;
pub use session::{LastAddress, SessionContext};
pub use suggestions::{SuggestionFeed, SuggestionState};
pub use viewport::{extent_points, CameraCommand, CameraLog, MapHandle, ViewportController};

pub mod app_state;
pub mod coordinate;
pub mod geometry;
pub mod place;
pub mod region;
pub mod region_record;
pub mod region_row;

pub use app_state::AppState;
pub use coordinate::{LatLon, Ring};
pub use geometry::{PlaceGeometry, Position};
pub use place::{Place, Suggestion};
pub use region::{Action, Coverage, NewRegion, Region};
pub use region_record::{NumberOrText, RegionRecord};
pub use region_row::RegionRow;

mod coordinate;
mod distance;
mod maps;

pub use coordinate::Coordinate;
pub use distance::{calculate_distance, format_distance};
pub use maps::{ExternalMapOpener, MapMode, MapOpenError, MapPlatform, open_external_map};

//! Domain types

mod ids;
mod playlist;
mod repeat;
mod settings;
mod track;

pub use ids::{PlaylistId, TrackId};
pub use playlist::{Playlist, PlaylistExport};
pub use repeat::RepeatMode;
pub use settings::PlayerSettings;
pub use track::{Track, UpdateTrack};

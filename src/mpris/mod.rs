//! MPRIS module: player discovery and volume control over D-Bus.

pub mod connection;
pub mod volume;

pub use connection::{MprisError, resolve_player};
pub use volume::{get_volume, set_volume};

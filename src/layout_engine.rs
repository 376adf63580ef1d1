pub mod column;
pub mod engine;
mod error;
pub mod graph;
mod host;
pub mod replay;

pub use column::{Column, FULL_SHARE};
pub use engine::{ColumnInfo, EventResponse, LayoutCommand, LayoutEvent, LayoutInfo, OmniLayout};
pub use error::LayoutError;
pub use graph::Direction;
pub use host::{HostRequest, LayoutHost, NoopHost, RecordingHost};

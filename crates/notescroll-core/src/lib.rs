pub mod app;
pub mod command;
pub mod projector;
pub mod sync;
pub mod tick_mapping;
pub mod wall_clock;

pub use app::*;
pub use command::*;
pub use projector::*;
pub use sync::*;
pub use tick_mapping::*;
pub use wall_clock::*;

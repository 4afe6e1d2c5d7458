pub mod audio;
pub mod player;
pub mod storage;
pub mod types;

pub use audio::*;
pub use player::*;
pub use storage::*;
pub use types::*;

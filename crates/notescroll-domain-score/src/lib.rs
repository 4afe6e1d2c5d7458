pub mod grouping;
pub mod keymap;
pub mod midi_import;
pub mod model;

pub use grouping::*;
pub use keymap::*;
pub use midi_import::*;
pub use model::*;

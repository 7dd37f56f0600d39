//! Local media folder scanning for `play all`.
//!
//! Lists the audio files of the cache folder in directory-listing order and
//! reads their tags for display.

mod model;
mod scan;

pub use model::*;
pub use scan::scan;

mod db_setup;
mod run;
mod segment;
#[cfg(test)]
mod tests;

pub use db_setup::count_rows;
pub use run::run;

use db_setup::*;
use segment::*;

// Shorter bodies are segmentation noise, not entries.
pub const DEFAULT_MIN_BODY_CHARS: usize = 30;

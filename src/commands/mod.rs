pub mod build;
pub mod clean;
pub mod extract;
pub mod pipeline;
pub mod status;

pub mod interaction;
pub mod project;

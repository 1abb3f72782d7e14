pub mod render;
pub mod run;
pub mod templates;

pub mod color;
pub mod config;
pub mod dataset;
pub mod export;
pub mod html;
pub mod human;
pub mod legend;
pub mod loader;
pub mod logging;
pub mod model;
pub mod page;
pub mod render;
pub mod search;
pub mod treemap;

pub use config::*;
pub use dataset::*;
pub use loader::*;
pub use model::*;
pub use page::*;
pub use render::*;

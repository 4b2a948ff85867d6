pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;
pub mod viewer;

pub use error::ViewerError;
pub use viewer::{ModelInfo, ViewerSession};

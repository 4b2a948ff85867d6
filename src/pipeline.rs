pub mod normalize;
pub mod palette;
pub mod postprocess;

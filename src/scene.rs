pub mod backend;
pub mod bounds;
pub mod camera;
pub mod controls;
pub mod environment;
pub mod light;
pub mod material;
pub mod node;
pub mod texture;

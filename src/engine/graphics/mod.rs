pub mod renderer;
pub mod texture;
pub mod vertex;

pub use renderer::Renderer;
pub use texture::Texture;
pub use vertex::{IconUniforms, Vertex};

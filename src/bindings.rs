/*! Texture resources and their bindings to texture units. */

pub mod binding_cache;
pub mod handle_pool;
pub mod manager;
pub mod parameters;
pub mod texture;

pub use binding_cache::BindingCache;
pub use handle_pool::HandlePool;
pub use manager::{Binding, ManagerConfig, TextureBinding, TextureManager};
pub use parameters::{Quality, TextureParameters};
pub use texture::{Texture, TextureKey, UploadedLayout};

pub mod camera;
pub mod gpu;
pub mod loader;
pub mod mesh;
pub mod pathway;
pub mod point_cloud;
pub mod scan;
pub mod scene;
pub mod scroll;
pub mod waitlist;

// Browser-only layers: the DOM glue and the wasm-bindgen API surface.
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

//! wasm-bindgen surface of the hero scene.
//!
//! `create_brain_scene` is the async constructor: it acquires a WebGPU
//! surface from the page's canvas and returns a handle the page (or the
//! built-in bootstrapper) drives once per animation frame. Every failure
//! path here degrades softly — the page keeps its markup even if the scene
//! never comes up.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::gpu::renderer::Renderer;
use crate::loader::{self, MeshReceiver};
use crate::scene::BrainScene;

#[wasm_bindgen]
#[derive(Clone)]
pub struct WasmBrainScene {
    inner: Rc<RefCell<SceneContext>>,
}

struct SceneContext {
    renderer: Renderer,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    scene: BrainScene,
    mesh_rx: Option<MeshReceiver>,
}

/// Install the panic hook and console logger.
///
/// `debug` opts into the diagnostic channel: mesh fetch/parse failures are
/// logged at debug level and stay silent otherwise.
#[wasm_bindgen]
pub fn init_panic_hook(debug: bool) {
    console_error_panic_hook::set_once();
    let level = if debug {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);
}

#[wasm_bindgen]
impl WasmBrainScene {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        panic!("Use create_brain_scene async constructor");
    }

    /// Dispatch the one-shot mesh fetch. The result is picked up by a later
    /// `render` call; on failure the placeholder stays up.
    pub fn load_mesh_from_url(&self, url: &str) {
        let (tx, rx) = loader::mesh_channel();
        self.inner.borrow_mut().mesh_rx = Some(rx);
        loader::spawn_fetch(url.to_string(), tx);
    }

    /// Parse OBJ text fetched on the JavaScript side and install it.
    /// Returns false (leaving the placeholder) if parsing fails.
    pub fn load_mesh_obj(&self, obj_text: &str) -> bool {
        match crate::mesh::parse_obj(obj_text) {
            Ok(mesh) => {
                self.inner.borrow_mut().scene.install_mesh(mesh);
                true
            }
            Err(e) => {
                log::debug!("mesh parse failed, keeping placeholder: {}", e);
                false
            }
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let mut inner = self.inner.borrow_mut();
        let ctx = &mut *inner;

        ctx.renderer.resize(width, height);
        ctx.config.width = width;
        ctx.config.height = height;

        ctx.surface.configure(ctx.renderer.device(), &ctx.config);
    }

    pub fn render(&self, dt: f32) {
        let mut inner = self.inner.borrow_mut();
        let ctx = &mut *inner;

        // One-shot mesh delivery: at most one result ever arrives.
        if let Some(rx) = ctx.mesh_rx.as_mut() {
            if let Some(result) = rx.try_take() {
                ctx.scene.apply_load_result(result);
                ctx.mesh_rx = None;
            }
        }

        ctx.scene.advance_frame(dt);

        match ctx.surface.get_current_texture() {
            Ok(output) => {
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                ctx.renderer.render(&view, &mut ctx.scene);
                output.present();
            }
            Err(wgpu::SurfaceError::Lost) => {
                ctx.renderer.resize(ctx.config.width, ctx.config.height);
                ctx.surface.configure(ctx.renderer.device(), &ctx.config);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().scene.is_running()
    }

    /// Stop the render loop. Exposed for testing; the page never calls it.
    pub fn stop(&self) {
        self.inner.borrow_mut().scene.stop();
    }

    /// Current scene state as JSON for the page's debug console.
    pub fn debug_state_json(&self) -> String {
        let inner = self.inner.borrow();
        serde_json::to_string(&inner.scene.debug_state()).unwrap_or_else(|_| "{}".to_string())
    }
}

#[wasm_bindgen]
pub async fn create_brain_scene(canvas: HtmlCanvasElement) -> Result<WasmBrainScene, JsValue> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        dx12_shader_compiler: Default::default(),
        flags: wgpu::InstanceFlags::default(),
        gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
    });

    let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
    let surface = instance
        .create_surface(target)
        .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::None,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| JsValue::from_str("Failed to find an appropriate adapter"))?;

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .copied()
        .find(|f: &wgpu::TextureFormat| f.is_srgb())
        .unwrap_or(surface_caps.formats[0]);

    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: canvas.width(),
        height: canvas.height(),
        present_mode: surface_caps.present_modes[0],
        alpha_mode: surface_caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    let renderer = Renderer::new(device, queue, config.format, config.width, config.height);
    let scene = BrainScene::new();

    Ok(WasmBrainScene {
        inner: Rc::new(RefCell::new(SceneContext {
            renderer,
            surface,
            config,
            scene,
            mesh_rx: None,
        })),
    })
}

use anyhow::{Context, Result};
use clap::Parser;
use ember_assets::{obj, MeshData};
use ember_input::{Action, InputState, Key};
use ember_render::Renderer;
use ember_render_wgpu::WgpuBackend;
use ember_scene::demo::{build_demo_scene, DemoScene, DEMO_BODY_START};
use ember_scene::{EngineConfig, Scene};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "ember-desktop", about = "Ember desktop demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine config (YAML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// OBJ model used for the falling body instead of the cube
    #[arg(long)]
    model: Option<PathBuf>,
}

/// Everything that exists once a window does.
struct Running {
    window: Arc<Window>,
    renderer: Renderer<WgpuBackend>,
    scene: Scene,
    demo: DemoScene,
}

struct App {
    config: EngineConfig,
    model: Option<MeshData>,
    input: InputState,
    running: Option<Running>,
    last_frame: Instant,
}

impl App {
    fn new(config: EngineConfig, model: Option<MeshData>) -> Self {
        Self {
            config,
            model,
            input: InputState::new(),
            running: None,
            last_frame: Instant::now(),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let attrs = Window::default_attributes()
            .with_title("Ember")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();

        let backend = WgpuBackend::new(window.clone(), size.width, size.height)?;
        let mut renderer = Renderer::new(backend, self.config.renderer)?;

        let mut scene = Scene::from_config(&self.config);
        let demo = build_demo_scene(&mut scene, &mut renderer, self.model.take())?;
        scene.on_start()?;

        Ok(Running {
            window,
            renderer,
            scene,
            demo,
        })
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) {
        let Some(key) = map_key(code) else {
            return;
        };
        self.input.set(key, pressed);

        let resets = self.input.bindings().keys(Action::ResetBodies).contains(&key);
        if pressed && !repeat && resets {
            if let Some(running) = &mut self.running {
                if let Err(e) = running.scene.reset_body(running.demo.body, DEMO_BODY_START) {
                    tracing::error!("reset failed: {e}");
                }
            }
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        let Some(running) = &mut self.running else {
            return;
        };
        match running.scene.update(dt, &self.input, &mut running.renderer) {
            Ok(stats) => tracing::trace!(frame = stats.frame, draws = stats.draws, "frame"),
            Err(e) => tracing::error!("frame failed: {e}"),
        }
        running.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                self.last_frame = Instant::now();
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(running) = &mut self.running {
                    running.renderer.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.input.clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                self.handle_key(code, state == ElementState::Pressed, repeat);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyR => Key::R,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        _ => return None,
    };
    Some(key)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("ember-desktop starting");

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let model = match &cli.model {
        Some(path) => {
            let model = obj::load(path)
                .with_context(|| format!("loading model {}", path.display()))?;
            tracing::info!(
                vertices = model.vertices.len(),
                triangles = model.triangle_count(),
                "loaded model"
            );
            Some(model.to_mesh_data())
        }
        None => None,
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, model);
    event_loop.run_app(&mut app)?;

    Ok(())
}

//! Wavescape - an animated wave hero scene with a works admin CLI.
//!
//! The default command opens a window and runs the scene; the `works`
//! subcommands drive the external portfolio backend.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use wavescape::cli::{Args, Command, WorksAction};
use wavescape::params::{CaptureConfig, SceneParams, WorksApiConfig};
use wavescape::rendering::RenderSystem;
use wavescape::scene::Scene;
use wavescape::works::{Work, WorkForm, WorksClient, WorksError};

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    scene: Scene,
    params: SceneParams,
    capture: Option<CaptureConfig>,
    /// Fixed clock step when capturing, measured delta otherwise
    fixed_step_s: Option<f32>,
    requested_size: (u32, u32),
    frame_num: usize,
    last_frame: Option<Instant>,
}

impl App {
    fn new(args: &Args) -> Self {
        let params = SceneParams::default();
        let capture = args.capture_config();
        let fixed_step_s = capture.as_ref().map(|c| c.step_s());

        Self {
            window: None,
            render_system: None,
            scene: Scene::new(&params),
            params,
            capture,
            fixed_step_s,
            requested_size: (args.width, args.height),
            frame_num: 0,
            last_frame: None,
        }
    }

    fn detach_and_exit(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        self.scene.detach();
        // Dropping the render system releases all GPU resources
        self.render_system = None;
        event_loop.exit();
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let Some(ref render_system) = self.render_system else {
            return;
        };
        if !self.scene.is_running() {
            return;
        }

        let now = Instant::now();
        let dt_s = match self.fixed_step_s {
            Some(step) => step,
            None => self
                .last_frame
                .map(|last| (now - last).as_secs_f32())
                .unwrap_or(0.0),
        };
        self.last_frame = Some(now);

        self.scene.tick(dt_s);
        render_system.upload(&mut self.scene);

        match render_system.render(self.frame_num) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let config = self.scene.render_config();
                let (width, height) = (config.width, config.height);
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(width, height);
                }
            }
            Err(e) => warn!("render error: {e:?}"),
        }
        self.frame_num += 1;

        let capture_done = self
            .capture
            .as_ref()
            .is_some_and(|capture| self.frame_num >= capture.total_frames());
        if capture_done {
            info!("capture finished: {} frames", self.frame_num);
            self.detach_and_exit(event_loop);
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let (width, height) = self.requested_size;
        let window_attributes = Window::default_attributes()
            .with_title("Wavescape")
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        if !self.scene.attach(size.width, size.height) {
            warn!("scene did not start; exiting");
            event_loop.exit();
            return;
        }

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.scene,
            self.params.surface.solid_color,
            self.capture.clone(),
        ));
        let render_system = match render_system {
            Ok(render_system) => render_system,
            Err(e) => {
                error!("graphics init failed: {e}");
                self.scene.detach();
                event_loop.exit();
                return;
            }
        };

        info!("wavescape running at {}x{}", size.width, size.height);

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.detach_and_exit(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.detach_and_exit(event_loop),
            WindowEvent::Resized(size) => {
                self.scene.resize(size.width, size.height);
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

fn print_work(work: &Work) {
    let star = if work.featured { "*" } else { " " };
    println!(
        "{star} {:<24} [{:<22}] {}  {}",
        work.id, work.category, work.title, work.link
    );
}

async fn run_works_action(client: &WorksClient, action: WorksAction) -> Result<(), WorksError> {
    match action {
        WorksAction::List => {
            let works = client.list().await?;
            for work in &works {
                print_work(work);
            }
            println!("{} work(s)", works.len());
        }
        WorksAction::Add {
            title,
            category,
            description,
            link,
            featured,
            image,
        } => {
            let form = WorkForm {
                title,
                category,
                description,
                link,
                featured,
                image,
            };
            client.create(&form).await?;
            println!("Work added");
        }
        WorksAction::Update {
            id,
            title,
            category,
            description,
            link,
            featured,
            image,
        } => {
            let form = WorkForm {
                title,
                category,
                description,
                link,
                featured,
                image,
            };
            client.update(&id, &form).await?;
            println!("Work updated");
        }
        WorksAction::Delete { id } => {
            client.delete(&id).await?;
            println!("Work deleted");
        }
        WorksAction::Feature { id } => {
            client.toggle_featured(&id).await?;
            println!("Featured status updated");
        }
    }
    Ok(())
}

/// Run one works admin operation; failures notify once, no retry
fn run_works(action: WorksAction, config: WorksApiConfig) -> i32 {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to start runtime: {e}");
            return 1;
        }
    };

    let client = WorksClient::new(config);
    match runtime.block_on(run_works_action(&client, action)) {
        Ok(()) => 0,
        Err(e) => {
            error!("works request failed: {e}");
            eprintln!("Operation failed: {e}");
            1
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = Args::parse();

    if let Some(Command::Works { action }) = args.command.take() {
        std::process::exit(run_works(action, args.works_config()));
    }

    let mut app = App::new(&args);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}

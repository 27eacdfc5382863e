use clap::Parser;
use glam::{Vec2, Vec3};
use interactive_parts::interaction::{InteractionEvents, InteractionManager};
use interactive_parts::model::{
    create_box_with_lid, create_drawer, BoxWithLidOptions, DrawerOptions, InteractiveModel,
    PrimitiveShapes,
};
use interactive_parts::viewport::{Camera, HeadlessScene, PointerEvent, PointerTracker};
use interactive_parts::ModelResult;
use std::error::Error;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

#[derive(Parser)]
#[command(name = "parts-demo")]
#[command(about = "Drive an articulated model with the pointer, or run a scripted lid drag")]
struct Args {
    /// Open a window instead of running the scripted session
    #[arg(long)]
    window: bool,
}

fn box_model() -> ModelResult<InteractiveModel> {
    create_box_with_lid(BoxWithLidOptions {
        spring_back: true,
        ..Default::default()
    })(&PrimitiveShapes::default())
}

fn drawer_model() -> ModelResult<InteractiveModel> {
    create_drawer(DrawerOptions::default())(&PrimitiveShapes::default())
}

fn logging_events() -> InteractionEvents {
    InteractionEvents::new()
        .on_select(|id| log::info!("selected {:?}", id))
        .on_drag_start(|id| log::info!("drag start '{}'", id))
        .on_drag_end(|id| log::info!("drag end '{}'", id))
        .on_transform_change(|id, _, value| log::debug!("'{}' -> {:.2}", id, value))
        .on_limit_reached(|id, limit| log::info!("'{}' hit {:?} limit", id, limit))
        .on_snap(|id, value| log::info!("'{}' snapped to {}", id, value))
        .on_state_change(|states| log::info!("state changed ({} parts)", states.len()))
}

fn new_manager(model: &InteractiveModel) -> InteractionManager<HeadlessScene> {
    let mut manager = InteractionManager::new(HeadlessScene::new());
    *manager.camera_mut() = Camera::looking_at(Vec3::new(3.0, 3.0, 4.0), Vec3::new(0.0, 0.8, 0.0));
    manager.set_viewport_size(VIEWPORT.x, VIEWPORT.y);
    manager.set_events(logging_events());
    manager.load_model(model);
    manager
}

/// Drags the lid open through the camera, releases it and lets it spring shut.
fn run_script() -> Result<(), Box<dyn Error>> {
    let model = box_model()?;
    let mut manager = new_manager(&model);

    let lid = manager.mesh_id("lid").ok_or("box model has no lid")?;
    let center = manager
        .scene()
        .mesh_center(lid)
        .ok_or("lid mesh is empty")?;
    let start = manager
        .camera()
        .world_to_pixel(center, VIEWPORT)
        .ok_or("lid is behind the camera")?;

    manager.handle_pointer(PointerEvent::moved(start.x, start.y));
    manager.handle_pointer(PointerEvent::down(start.x, start.y));
    for step in 1..=12 {
        let y = start.y - step as f32 * 15.0;
        manager.handle_pointer(PointerEvent::moved(start.x, y));
    }
    if let Some(state) = manager.part_state("lid") {
        println!("lid opened to {:.1} degrees", state.value);
    }
    println!("{}", manager.serialize_state().to_json_pretty()?);

    manager.handle_pointer(PointerEvent::up(start.x, start.y - 180.0));
    let mut frames = 0;
    while manager.has_active_animations() && frames < 600 {
        manager.tick(1000.0 / 60.0);
        frames += 1;
    }
    if let Some(state) = manager.part_state("lid") {
        println!("lid settled at {:.1} degrees after {} frames", state.value, frames);
    }

    manager.dispose();
    Ok(())
}

/// Routes window pointer input into the manager. Nothing is drawn; the
/// session is observed through the log.
struct App {
    window: Option<Arc<Window>>,
    manager: InteractionManager<HeadlessScene>,
    pointer: PointerTracker,
    last_frame: Instant,
}

impl App {
    fn new(model: &InteractiveModel) -> Self {
        Self {
            window: None,
            manager: new_manager(model),
            pointer: PointerTracker::new(),
            last_frame: Instant::now(),
        }
    }

    fn load(&mut self, model: ModelResult<InteractiveModel>) {
        match model {
            Ok(model) => self.manager.load_model(&model),
            Err(e) => log::error!("failed to build model: {}", e),
        }
    }

    fn dump_state(&self) {
        match self.manager.serialize_state().to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("failed to serialize state: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title("Interactive Parts Demo")
            .with_inner_size(winit::dpi::PhysicalSize::new(VIEWPORT.x as u32, VIEWPORT.y as u32));

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                let size = window.inner_size();
                self.manager
                    .set_viewport_size(size.width as f32, size.height as f32);
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pointer) = self.pointer.translate(&event) {
            self.manager.handle_pointer(pointer);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.manager.dispose();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        match code {
                            KeyCode::Escape => event_loop.exit(),
                            KeyCode::KeyR => self.manager.reset_all(),
                            KeyCode::KeyS => self.dump_state(),
                            KeyCode::KeyE => {
                                let enabled = !self.manager.is_enabled();
                                self.manager.set_enabled(enabled);
                            }
                            KeyCode::Digit1 => self.load(box_model()),
                            KeyCode::Digit2 => self.load(drawer_model()),
                            _ => {}
                        }
                    }
                }
            }
            WindowEvent::Resized(size) => {
                self.manager
                    .set_viewport_size(size.width as f32, size.height as f32);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt_ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
                self.last_frame = now;
                self.manager.tick(dt_ms);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    if !args.window {
        return run_script();
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&box_model()?);
    event_loop.run_app(&mut app)?;
    Ok(())
}

//! Walkthrough - First-Person Map Viewer
//!
//! Opens a saved floorplan scene and lets you walk through it.
//!
//! Run with: `cargo run --bin walkthrough -- <scene.json> [--config viewer.json]`
//!
//! Controls:
//! - Click: Capture the mouse for looking around
//! - ESC: Release the mouse (press again to exit)
//! - WASD / Arrow keys: Move
//! - Shift or right mouse: Sprint
//! - R: Reset view
//! - F: Toggle fog
//! - V: Toggle wireframe

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use map_walker_engine::input::{self, CursorAction};
use map_walker_engine::material::NoAssets;
use map_walker_engine::render::WgpuRenderer;
use map_walker_engine::{FrameStatus, SceneDriver, SceneError, ViewerConfig};

/// Fog colour and range used by the F toggle
const FOG: (u32, f32, f32) = (0x222222, 1.0, 40.0);

// ============================================================================
// ARGUMENTS
// ============================================================================

struct Args {
    scene: PathBuf,
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut scene = None;
        let mut config = None;
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().ok_or("--config needs a file path")?;
                    config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
                _ if scene.is_none() => scene = Some(PathBuf::from(&arg)),
                _ => return Err(format!("unexpected argument {arg}")),
            }
        }
        let scene = scene.ok_or("usage: walkthrough <scene.json> [--config viewer.json]")?;
        Ok(Self { scene, config })
    }
}

// ============================================================================
// APPLICATION
// ============================================================================

struct WalkthroughApp {
    window: Option<Arc<Window>>,
    driver: Option<SceneDriver>,
    config: ViewerConfig,
    scene_json: String,
    fog_on: bool,
    wireframe_on: bool,
    /// Set when startup failed so `main` can report it
    failure: Option<SceneError>,
}

impl WalkthroughApp {
    fn new(config: ViewerConfig, scene_json: String) -> Self {
        Self {
            window: None,
            driver: None,
            config,
            scene_json,
            fog_on: false,
            wireframe_on: false,
            failure: None,
        }
    }

    fn initialize(&mut self, window: Arc<Window>) -> Result<(), SceneError> {
        let renderer = WgpuRenderer::new(Arc::clone(&window))?;
        let mut driver = SceneDriver::new(self.config.clone(), Box::new(renderer), Box::new(NoAssets));
        let size = window.inner_size();
        driver.resize(size.width, size.height);
        driver.load_from_json(&self.scene_json)?;

        self.window = Some(window);
        self.driver = Some(driver);
        self.apply_cursor_state();
        Ok(())
    }

    /// Push the pointer lock state to the window after it changed.
    fn apply_cursor_state(&mut self) {
        let (Some(window), Some(driver)) = (&self.window, &mut self.driver) else {
            return;
        };
        let Some(navigation) = driver.navigation_mut() else {
            return;
        };
        let pointer = navigation.pointer_mut();
        if !pointer.is_dirty() {
            return;
        }

        if pointer.should_cursor_be_grabbed() {
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
                let _ = window.set_cursor_grab(CursorGrabMode::Confined);
            }
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
        }
        window.set_cursor_visible(pointer.should_cursor_be_visible());
        tracing::info!("[Walkthrough] {}", pointer.status_message());
        pointer.clear_dirty();
    }

    /// Returns true when the key should close the viewer.
    fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let Some(driver) = self.driver.as_mut() else {
            return false;
        };
        let engine_key = map_key(key);

        if pressed {
            let result = match engine_key {
                input::KeyCode::R => driver.reset_view(),
                input::KeyCode::F => {
                    self.fog_on = !self.fog_on;
                    if self.fog_on {
                        let (color, near, far) = FOG;
                        driver.set_fog(color, near, far)
                    } else {
                        driver.clear_fog();
                        Ok(())
                    }
                }
                input::KeyCode::V => {
                    self.wireframe_on = !self.wireframe_on;
                    driver.toggle_wireframe(self.wireframe_on)
                }
                _ => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!("[Walkthrough] {}", e);
            }
        }

        let Some(navigation) = driver.navigation_mut() else {
            return false;
        };
        // Escape with the cursor already free closes the viewer
        if engine_key == input::KeyCode::Escape && pressed && !navigation.pointer().is_locked() {
            return true;
        }
        if navigation.handle_key(engine_key, pressed) == CursorAction::ApplyState {
            self.apply_cursor_state();
        }
        false
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let Some(navigation) = self.driver.as_mut().and_then(|d| d.navigation_mut()) else {
            return;
        };
        if navigation.handle_mouse_button(map_button(button), pressed) == CursorAction::ApplyState {
            self.apply_cursor_state();
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.cleanup();
        }
        event_loop.exit();
    }
}

// ============================================================================
// INPUT MAPPING
// ============================================================================

fn map_key(key: KeyCode) -> input::KeyCode {
    match key {
        KeyCode::KeyW => input::KeyCode::W,
        KeyCode::KeyA => input::KeyCode::A,
        KeyCode::KeyS => input::KeyCode::S,
        KeyCode::KeyD => input::KeyCode::D,
        KeyCode::ShiftLeft => input::KeyCode::ShiftLeft,
        KeyCode::ShiftRight => input::KeyCode::ShiftRight,
        KeyCode::ArrowUp => input::KeyCode::ArrowUp,
        KeyCode::ArrowDown => input::KeyCode::ArrowDown,
        KeyCode::ArrowLeft => input::KeyCode::ArrowLeft,
        KeyCode::ArrowRight => input::KeyCode::ArrowRight,
        KeyCode::KeyF => input::KeyCode::F,
        KeyCode::KeyR => input::KeyCode::R,
        KeyCode::KeyV => input::KeyCode::V,
        KeyCode::Escape => input::KeyCode::Escape,
        _ => input::KeyCode::Unknown,
    }
}

fn map_button(button: MouseButton) -> input::MouseButton {
    match button {
        MouseButton::Left => input::MouseButton::Left,
        MouseButton::Middle => input::MouseButton::Middle,
        MouseButton::Right => input::MouseButton::Right,
        MouseButton::Back => input::MouseButton::Other(3),
        MouseButton::Forward => input::MouseButton::Other(4),
        MouseButton::Other(n) => input::MouseButton::Other(n),
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

impl ApplicationHandler for WalkthroughApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }
        let attrs = WindowAttributes::default()
            .with_title("Map Walker")
            .with_inner_size(PhysicalSize::new(1280, 800));
        let started = event_loop
            .create_window(attrs)
            .map_err(|e| SceneError::RendererInit(format!("window: {e}")))
            .and_then(|window| self.initialize(Arc::new(window)));
        if let Err(e) = started {
            tracing::error!("[Walkthrough] {}", e);
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    if self.handle_key(key, pressed) {
                        self.shutdown(event_loop);
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_mouse_button(button, state == ElementState::Pressed);
            }

            WindowEvent::Focused(focused) => {
                let action = self
                    .driver
                    .as_mut()
                    .and_then(|d| d.navigation_mut())
                    .map(|nav| nav.handle_focus(focused));
                if action == Some(CursorAction::ApplyState) {
                    self.apply_cursor_state();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(driver) = self.driver.as_mut() {
                    driver.resize(new_size.width, new_size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(driver) = self.driver.as_mut() else {
                    return;
                };
                match driver.frame() {
                    Ok(FrameStatus::Continue) => {}
                    Ok(FrameStatus::Stopped) => event_loop.exit(),
                    Err(e) => {
                        tracing::error!("[Walkthrough] Render failed: {}", e);
                        self.shutdown(event_loop);
                    }
                }
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(navigation) = self.driver.as_mut().and_then(|d| d.navigation_mut()) {
                navigation.handle_mouse_motion(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.cleanup();
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<ViewerConfig, SceneError> {
    match path {
        Some(path) => ViewerConfig::load(path),
        None => Ok(ViewerConfig::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not read config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let scene_json = match std::fs::read_to_string(&args.scene) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Could not read {}: {e}", args.scene.display());
            return ExitCode::FAILURE;
        }
    };

    println!("===========================================");
    println!("   Map Walker - {}", args.scene.display());
    println!("===========================================");
    println!();
    println!("Controls:");
    println!("  Click: Capture mouse");
    println!("  ESC: Release mouse / exit");
    println!("  WASD / Arrows: Move");
    println!("  Shift or right mouse: Sprint");
    println!("  R: Reset view, F: Fog, V: Wireframe");
    println!();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            eprintln!("Could not create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = WalkthroughApp::new(config, scene_json);
    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Event loop error: {e}");
        return ExitCode::FAILURE;
    }
    match app.failure {
        Some(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

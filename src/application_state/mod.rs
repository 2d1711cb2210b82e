//! # Application State Management
//!
//! This module adapts the winit event loop to the engine, including:
//! - Window creation from the configured title and size
//! - Input handling and cursor capture
//! - Application lifecycle events
//! - Driving one engine frame per redraw

pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use input_manager::InputManager;
use log::{error, info, warn};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::EventLoopError,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    config::{ConfigError, EngineConfig},
    engine_state::{
        rendering::{texture::AtlasImage, FrameStatsRenderer, GpuRenderer, Renderer},
        EngineState,
    },
};

/// Errors that end the application before or during the event loop.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
}

/// The main application state container that manages the application's lifecycle.
///
/// The engine is created on the first `resumed` call, once a window exists.
pub struct ApplicationState {
    /// Settings for the window and the engine
    pub config: EngineConfig,

    /// Block atlas handed to the renderer at startup, if it could be loaded
    pub atlas: Option<AtlasImage>,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The simulation context
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Back-end receiving each frame's draw calls
    pub renderer: Box<dyn Renderer>,

    /// Whether the cursor is captured for mouse look
    pub cursor_grabbed: bool,
}

impl ApplicationState {
    /// Creates the application state; nothing is initialized until the event loop resumes.
    pub fn new(config: EngineConfig, atlas: Option<AtlasImage>) -> Self {
        Self {
            config,
            atlas,
            state: None,
        }
    }

    /// Creates the window, the engine and the renderer.
    fn initialize_application_state(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };
        info!("Window created");

        let mut renderer: Box<dyn Renderer> = match GpuRenderer::new(window.clone()) {
            Ok(renderer) => Box::new(renderer),
            Err(err) => {
                warn!("GPU unavailable, running without drawing: {}", err);
                Box::new(FrameStatsRenderer::new())
            }
        };
        if let Some(atlas) = &self.atlas {
            renderer.upload_atlas(atlas);
        }

        let mut state = InitializedApplicationState {
            engine_state: EngineState::new(&self.config),
            window,
            input_manager: InputManager::new(),
            renderer,
            cursor_grabbed: false,
        };
        state.set_cursor_grab(true);
        self.state = Some(state);
    }
}

impl InitializedApplicationState {
    /// Captures or releases the cursor for mouse look.
    fn set_cursor_grab(&mut self, grab: bool) {
        let result = if grab {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };

        match result {
            Ok(()) => {
                self.window.set_cursor_visible(!grab);
                self.cursor_grabbed = grab;
            }
            Err(err) => warn!("Could not change cursor grab: {}", err),
        }
    }

    /// Hands the input gathered since the last frame to the engine, simulates and draws.
    fn redraw(&mut self) {
        let processed_input = self.input_manager.get_and_reset_processed_input();
        self.engine_state.set_input_commands(processed_input);
        self.engine_state.frame();
        self.engine_state.render(self.renderer.as_mut());
    }
}

impl ApplicationHandler for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                info!("Exit requested");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::KeyC),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let grab = !state.cursor_grabbed;
                state.set_cursor_grab(grab);
            }
            WindowEvent::Resized(size) => {
                state.engine_state.resize(size.width, size.height);
                state.renderer.resize(size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                state.input_manager.release_all();
            }
            WindowEvent::RedrawRequested => {
                state.redraw();
            }
            other => state.input_manager.intake_input(&other),
        }
    }

    /// Handles device-level input events such as mouse motion.
    ///
    /// Motion only turns the head while the cursor is captured.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                if state.cursor_grabbed {
                    state.input_manager.intake_mouse_motion(delta);
                }
            }
        }
    }

    /// Called when the application is resumed; creates everything on the first call.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            self.initialize_application_state(event_loop);
        }
    }

    /// Called before the event loop goes to sleep; keeps frames coming.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

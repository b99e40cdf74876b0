//! The Last Orchard: window, event loop and frame driver.
//!
//! winit drives the loop through `ApplicationHandler`. Each `RedrawRequested`
//! measures the wall-clock delta, lets `scene::frame` run the fixed steps it
//! pays for, then rebuilds one colored quad batch and draws it.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use orchard_core::render::render_at;
use orchard_core::scene::{self, SceneError, SceneState};
use orchard_core::{load_config_from_path, GameConfig, InputState, Key, Region};
use orchard_platform::{create_window, PlatformConfig};
use orchard_render::{
    Camera2D, GpuContext, GpuError, QuadBatch, QuadMesh, QuadPipeline, RegionStyle,
};

const WINDOW_TITLE: &str = "The Last Orchard";
const CONFIG_PATH: &str = "assets/config/game.json";
const MAP_PATH: &str = "assets/maps/farm.json";
const DEBUG_ENV_VAR: &str = "ORCHARD_DEBUG";
const FPS_LOG_INTERVAL: u64 = 600;
const GROUND_COLOR: [f32; 4] = [0.33, 0.55, 0.27, 1.0];
const ACTOR_COLOR: [f32; 4] = [0.93, 0.78, 0.42, 1.0];
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.08,
    a: 1.0,
};

struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    pipeline: QuadPipeline,
    mesh: QuadMesh,
    batch: QuadBatch,
    camera: Camera2D,
    input: InputState,
    config: GameConfig,
    scene: SceneState,
}

impl EngineState {
    fn new(window: Arc<Window>, config: GameConfig, scene: SceneState) -> Result<Self, GpuError> {
        let gpu = GpuContext::new(window.clone())?;
        let pipeline = QuadPipeline::new(&gpu.device, gpu.surface_format);
        let camera = Camera2D::new(scene.camera_focus());
        let mesh = QuadMesh::new(&gpu.device, &pipeline, camera.build_uniform());

        let mut batch = QuadBatch::new(1.0);
        batch.set_region_style(
            Region::ActorIdle,
            RegionStyle {
                size: scene.body.visual_size,
                color: ACTOR_COLOR,
            },
        );

        let mut state = Self {
            window,
            gpu,
            pipeline,
            mesh,
            batch,
            camera,
            input: InputState::new(),
            config,
            scene,
        };
        let (w, h) = state.gpu.size;
        state.resize_viewport(w, h);
        Ok(state)
    }

    /// Window pixels to world units, then reclamp the camera.
    fn resize_viewport(&mut self, width: u32, height: u32) {
        let zoom = self.config.viewport.zoom;
        scene::resize(
            &mut self.scene,
            width as f32 / zoom,
            height as f32 / zoom,
        );
    }

    fn toggle_debug(&mut self) {
        let debug = &mut self.config.debug;
        debug.draw_collision_boxes = !debug.draw_collision_boxes;
        log::info!(
            "Collision debug: {}",
            if debug.draw_collision_boxes { "ON" } else { "OFF" }
        );
    }

    fn interpolation_alpha(&self) -> f32 {
        self.scene.scheduler.interpolation_alpha as f32
    }

    fn rebuild_batch(&mut self) {
        let actor = self.scene.interpolated_position(self.interpolation_alpha());
        self.batch.clear();
        self.batch
            .push_quad(Vec2::ZERO, self.scene.bounds.size(), GROUND_COLOR);
        render_at(&self.scene, actor, &mut self.batch, &self.config.debug);
        self.mesh
            .upload(&self.gpu.device, &self.gpu.queue, &self.batch);
    }

    fn draw(&mut self) {
        self.camera
            .set_focus(self.scene.interpolated_focus(self.interpolation_alpha()));
        self.mesh
            .update_camera(&self.gpu.queue, self.camera.build_uniform());

        let Some(frame) = self.gpu.acquire_frame() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            self.mesh.draw(&mut render_pass, &self.pipeline);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

struct App {
    state: Option<EngineState>,
    failed: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: None,
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, context: &str, error: impl std::fmt::Display) {
        log::error!("{}: {}", context, error);
        self.failed = true;
        event_loop.exit();
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            scene::teardown(state.scene);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let (config, scene) = match load_game() {
            Ok(loaded) => loaded,
            Err(e) => return self.fail(event_loop, "Failed to set up scene", e),
        };

        let viewport = config.viewport;
        let platform = PlatformConfig::for_viewport(
            WINDOW_TITLE,
            viewport.width,
            viewport.height,
            viewport.zoom,
        );
        let window = match create_window(event_loop, &platform) {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, "Failed to create window", e),
        };
        match EngineState::new(window, config, scene) {
            Ok(state) => self.state = Some(state),
            Err(e) => self.fail(event_loop, "Failed to initialize GPU", e),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.resize_viewport(w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(key),
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                if state.input.is_just_pressed(Key::Escape) {
                    log::info!("Escape pressed, exiting.");
                    self.shutdown(event_loop);
                    return;
                }
                if state.input.is_just_pressed(Key::F4) {
                    state.toggle_debug();
                }

                let frame_dt = state.scene.scheduler.measure_frame();
                scene::frame(&mut state.scene, frame_dt, &state.input);
                state.input.end_frame();

                let scheduler = &state.scene.scheduler;
                if scheduler.frame_count % FPS_LOG_INTERVAL == 0 {
                    log::debug!(
                        "{:.0} fps ({:.2} ms/frame), {} fixed steps",
                        scheduler.smoothed_fps,
                        scheduler.smoothed_frame_time_ms,
                        scheduler.fixed_step_count
                    );
                }

                state.rebuild_batch();
                state.draw();
            }

            _ => {}
        }
    }
}

fn load_game() -> Result<(GameConfig, SceneState), SceneError> {
    let config_path = Path::new(CONFIG_PATH);
    let mut config = if config_path.exists() {
        load_config_from_path(config_path)?
    } else {
        log::warn!("No config at {}, using defaults", CONFIG_PATH);
        GameConfig::default()
    };

    if debug_requested_by_env() {
        config.debug.draw_collision_boxes = true;
        log::info!("Collision debug enabled by {}", DEBUG_ENV_VAR);
    }

    let scene = scene::load_scene(Path::new(MAP_PATH), &config)?;
    Ok((config, scene))
}

fn debug_requested_by_env() -> bool {
    std::env::var(DEBUG_ENV_VAR)
        .map(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F4 => Some(Key::F4),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("The Last Orchard starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");

    if app.failed {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_are_mapped() {
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
        assert_eq!(map_key(KeyCode::F4), Some(Key::F4));
        assert_eq!(map_key(KeyCode::Space), None);
    }
}

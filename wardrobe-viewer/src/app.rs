//! Desktop application loop
//!
//! Wires a winit window, the wgpu stage renderer and a tokio runtime to a
//! [`CarouselController`]. Controls:
//! - Left/Right arrows: previous/next item
//! - Left drag: orbit, wheel: zoom, click: add hovered item to cart
//! - V: enter/leave the immersive session (controller input)
//! - WASD: move the rig, Space/Enter: controller select (immersive only)
//! - R: reset camera

use std::sync::Arc;

use nalgebra::Vector2;
use wardrobe_core::{Error, Result, SurfaceSize};
use wardrobe_gpu::{StageRenderConfig, StageRenderer};
use wardrobe_io::{AssetFetcher, CatalogSource};
use winit::{
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use crate::camera::OrbitControls;
use crate::carousel::Direction;
use crate::cart::CartSink;
use crate::config::ViewerConfig;
use crate::controller::CarouselController;
use crate::interaction::{InputMode, InteractionRouter, SessionEvent};
use crate::scene::SceneRuntime;

/// Pixels the pointer may travel between press and release for a click
const CLICK_SLOP: f64 = 4.0;

#[derive(Debug, Default)]
struct Movement {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
}

impl Movement {
    fn set(&mut self, key: &str, pressed: bool) -> bool {
        match key {
            "w" | "W" => self.forward = pressed,
            "s" | "S" => self.back = pressed,
            "a" | "A" => self.left = pressed,
            "d" | "D" => self.right = pressed,
            _ => return false,
        }
        true
    }

    fn axes(&self) -> Vector2<f32> {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        Vector2::new(axis(self.right, self.left), axis(self.forward, self.back))
    }
}

/// Open the viewer window and run until it is closed
pub fn run<S>(config: ViewerConfig, source: Arc<S>, cart: Box<dyn CartSink>) -> Result<()>
where
    S: AssetFetcher + CatalogSource,
{
    log::info!("starting {}", config.window_title);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    let event_loop =
        EventLoop::new().map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window_size[0] as f64,
                config.window_size[1] as f64,
            ))
            .build(&event_loop)
            .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
    );

    let renderer = pollster::block_on(StageRenderer::new(
        Arc::clone(&window),
        StageRenderConfig {
            enable_multisampling: config.enable_multisampling,
            vsync: config.vsync,
        },
    ))?;

    let size = window.inner_size();
    let scene = SceneRuntime::mount(renderer, SurfaceSize::new(size.width, size.height), config.scene.clone())?;
    let mut controller =
        CarouselController::new(scene, Arc::clone(&source), runtime.handle().clone(), config.cache.clone())
            .with_cart(cart);
    controller.request_catalog(source);

    let mut router = InteractionRouter::new(config.controller_speed);
    let mut orbit = OrbitControls::default();
    orbit.rotate_speed = config.rotate_speed;
    orbit.zoom_speed = config.zoom_speed;

    let mut surface = size;
    let mut cursor: Option<winit::dpi::PhysicalPosition<f64>> = None;
    let mut pressed = false;
    let mut dragged = 0.0f64;
    let mut movement = Movement::default();
    let mut frame: u64 = 0;
    let mut shown_title = String::new();

    event_loop
        .run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            match event {
                WindowEvent::CloseRequested => {
                    let report = controller.unmount();
                    log::info!(
                        "closed: {} objects disposed, {} dynamic and {} stage resources released",
                        report.objects_disposed,
                        report.dynamic.total(),
                        report.stage.total()
                    );
                    target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    surface = new_size;
                    controller
                        .scene_mut()
                        .resize(SurfaceSize::new(new_size.width, new_size.height));
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => {
                        pressed = true;
                        dragged = 0.0;
                    }
                    ElementState::Released => {
                        pressed = false;
                        if dragged < CLICK_SLOP {
                            if let Some(event) = router.click() {
                                controller.activate(event);
                            }
                        }
                    }
                },
                WindowEvent::CursorMoved { position, .. } => {
                    if let Some(last) = cursor {
                        let (dx, dy) = (position.x - last.x, position.y - last.y);
                        if pressed {
                            dragged += dx.abs() + dy.abs();
                            orbit.rotate(controller.scene_mut().camera_mut(), dx as f32, dy as f32);
                        }
                    }
                    cursor = Some(position);

                    let width = surface.width.max(1) as f64;
                    let height = surface.height.max(1) as f64;
                    router.pointer_moved(Vector2::new(
                        (2.0 * position.x / width - 1.0) as f32,
                        (1.0 - 2.0 * position.y / height) as f32,
                    ));
                }
                WindowEvent::CursorLeft { .. } => {
                    cursor = None;
                    router.pointer_left();
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                    };
                    orbit.zoom(controller.scene_mut().camera_mut(), scroll);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let down = event.state == ElementState::Pressed;
                    match &event.logical_key {
                        Key::Character(c) => {
                            if movement.set(c.as_str(), down) {
                                router.set_axes(movement.axes());
                            } else if down && !event.repeat {
                                match c.as_str() {
                                    "v" | "V" => {
                                        let session = match router.mode() {
                                            InputMode::Pointer => SessionEvent::Started,
                                            InputMode::Controller => SessionEvent::Ended,
                                        };
                                        router.transition(session, &mut orbit, controller.scene_mut());
                                    }
                                    "r" | "R" => controller.scene_mut().camera_mut().reset(),
                                    _ => {}
                                }
                            }
                        }
                        Key::Named(named) if down => {
                            let result = match named {
                                NamedKey::ArrowRight => controller.advance(Direction::Forward),
                                NamedKey::ArrowLeft => controller.retreat(),
                                NamedKey::Space | NamedKey::Enter => {
                                    if let Some(event) = router.select(controller.scene()) {
                                        controller.activate(event);
                                    }
                                    Ok(())
                                }
                                _ => Ok(()),
                            };
                            if let Err(e) = result {
                                log::error!("carousel update failed: {}", e);
                            }
                        }
                        _ => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    controller.poll();

                    frame += 1;
                    router.update(frame, controller.scene_mut());
                    match controller.scene_mut().render_frame() {
                        Ok(true) => {}
                        Ok(false) => return,
                        Err(e) => log::error!("render failed: {}", e),
                    }

                    let title = if controller.is_loading() {
                        format!("{} (loading...)", config.window_title)
                    } else if controller.catalog_error().is_some() {
                        format!("{} (catalog unavailable)", config.window_title)
                    } else {
                        config.window_title.clone()
                    };
                    if title != shown_title {
                        window.set_title(&title);
                        shown_title = title;
                    }

                    window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;

    drop(runtime);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_axes() {
        let mut movement = Movement::default();
        assert!(movement.set("w", true));
        assert!(movement.set("D", true));
        assert_eq!(movement.axes(), Vector2::new(1.0, 1.0));

        movement.set("w", false);
        movement.set("s", true);
        assert_eq!(movement.axes(), Vector2::new(1.0, -1.0));

        assert!(!movement.set("q", true));
    }
}

//! Pointer and controller input routing
//!
//! The router turns input into rays, rays into a hovered item, and clicks or
//! controller selects into activations. Hover is recomputed at most once per
//! frame.

use std::sync::Arc;

use nalgebra::{Isometry3, Vector2, Vector3};
use wardrobe_core::{CatalogItem, Ray, RenderBackend};

use crate::camera::{Camera, OrbitControls};
use crate::scene::{Listener, PickHit, PresentationMode, SceneRuntime, Selection};

/// Which input device drives picking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Pointer,
    Controller,
}

/// Immersive session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Ended,
}

/// The item currently under the pointer or controller ray
#[derive(Debug, Clone)]
pub struct Hover {
    pub slot: usize,
    pub part: usize,
    pub distance: f32,
    pub item: Arc<CatalogItem>,
}

impl From<PickHit> for Hover {
    fn from(hit: PickHit) -> Self {
        Self {
            slot: hit.slot,
            part: hit.part,
            distance: hit.distance,
            item: hit.item,
        }
    }
}

#[derive(Debug, Clone)]
pub enum InteractionEvent {
    ItemActivated(Arc<CatalogItem>),
}

pub struct InteractionRouter {
    mode: InputMode,
    pointer: Option<Vector2<f32>>,
    controller_pose: Option<Isometry3<f32>>,
    axes: Vector2<f32>,
    /// World units per frame at full axis deflection
    controller_speed: f32,
    hovered: Option<Hover>,
    last_frame: Option<u64>,
}

impl InteractionRouter {
    pub fn new(controller_speed: f32) -> Self {
        Self {
            mode: InputMode::Pointer,
            pointer: None,
            controller_pose: None,
            axes: Vector2::zeros(),
            controller_speed,
            hovered: None,
            last_frame: None,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn hovered(&self) -> Option<&Hover> {
        self.hovered.as_ref()
    }

    /// The only place the input mode changes. Entering an immersive session
    /// suspends orbit controls and switches the scene to direct presentation;
    /// leaving restores both.
    pub fn transition<B: RenderBackend>(
        &mut self,
        event: SessionEvent,
        orbit: &mut OrbitControls,
        scene: &mut SceneRuntime<B>,
    ) -> InputMode {
        let next = match event {
            SessionEvent::Started => InputMode::Controller,
            SessionEvent::Ended => InputMode::Pointer,
        };
        if next == self.mode {
            return self.mode;
        }

        match next {
            InputMode::Controller => {
                orbit.suspend();
                scene.set_presentation(PresentationMode::Immersive);
            }
            InputMode::Pointer => {
                orbit.resume();
                scene.set_presentation(PresentationMode::Desktop);
            }
        }
        log::info!("input mode {:?} -> {:?}", self.mode, next);
        self.mode = next;
        self.hovered = None;
        self.axes = Vector2::zeros();
        scene.set_selection(None);
        self.mode
    }

    /// Pointer position in normalized device coordinates
    pub fn pointer_moved(&mut self, ndc: Vector2<f32>) {
        if self.mode == InputMode::Pointer {
            self.pointer = Some(ndc);
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    pub fn set_controller_pose(&mut self, pose: Isometry3<f32>) {
        self.controller_pose = Some(pose);
    }

    /// Thumbstick deflection: x strafes, y moves forward
    pub fn set_axes(&mut self, axes: Vector2<f32>) {
        self.axes = axes;
    }

    fn controller_ray(&self, camera: &Camera) -> Option<Ray> {
        let pose = self.controller_pose.unwrap_or_else(|| camera.pose());
        let origin = pose.translation.vector.into();
        Ray::new(origin, pose.rotation * -Vector3::z())
    }

    /// Per-frame update: move the controller rig, then recompute hover and
    /// push it to the scene selection. Repeated calls within one frame are
    /// ignored.
    pub fn update<B: RenderBackend>(&mut self, frame: u64, scene: &mut SceneRuntime<B>) -> Option<&Hover> {
        if self.last_frame == Some(frame) {
            return self.hovered.as_ref();
        }
        self.last_frame = Some(frame);

        let ray = match self.mode {
            InputMode::Pointer if scene.is_listening(Listener::Pointer) => {
                self.pointer.and_then(|ndc| scene.camera().ray_from_ndc(ndc))
            }
            InputMode::Pointer => None,
            InputMode::Controller => {
                if self.axes != Vector2::zeros() {
                    let step = Vector3::new(self.axes.x, 0.0, -self.axes.y) * self.controller_speed;
                    scene.camera_mut().translate_rig(step);
                }
                self.controller_ray(scene.camera())
            }
        };

        self.hovered = ray.and_then(|ray| scene.pick(&ray)).map(Hover::from);
        scene.set_selection(self.hovered.as_ref().map(|h| Selection { slot: h.slot, part: h.part }));
        self.hovered.as_ref()
    }

    /// Pointer click: activates the hovered item, if any
    pub fn click(&self) -> Option<InteractionEvent> {
        if self.mode != InputMode::Pointer {
            return None;
        }
        self.hovered
            .as_ref()
            .map(|h| InteractionEvent::ItemActivated(Arc::clone(&h.item)))
    }

    /// Controller select: casts along the controller's forward axis now
    pub fn select<B: RenderBackend>(&self, scene: &SceneRuntime<B>) -> Option<InteractionEvent> {
        if self.mode != InputMode::Controller {
            return None;
        }
        let ray = self.controller_ray(scene.camera())?;
        scene
            .pick(&ray)
            .map(|hit| InteractionEvent::ItemActivated(hit.item))
    }
}

impl Default for InteractionRouter {
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneConfig, VisibleEntry};
    use nalgebra::{Point3, UnitQuaternion};
    use wardrobe_core::{HeadlessBackend, Material, MeshPart, Model, Point3f, SurfaceSize, TriangleMesh};

    fn scene_with_item(id: u64) -> SceneRuntime<HeadlessBackend> {
        let mut scene =
            SceneRuntime::mount(HeadlessBackend::new(), SurfaceSize::new(1000, 1000), SceneConfig::default()).unwrap();
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(-2.0, 0.0, 0.0),
                Point3f::new(2.0, 0.0, 0.0),
                Point3f::new(2.0, 8.0, 0.0),
                Point3f::new(-2.0, 8.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        let item = Arc::new(wardrobe_core::CatalogItem {
            id: Some(id.into()),
            kind: "coat".to_string(),
            size: None,
            color: None,
            photo_filename: "coat".to_string(),
            price: 80.0,
        });
        let model = Model::new(vec![MeshPart::new("coat", mesh, Material::default())]);
        scene
            .attach(VisibleEntry {
                slot: 1,
                catalog_index: 0,
                model: model.instantiate(&item),
                item,
            })
            .unwrap();
        scene
    }

    /// NDC of a world point as seen by the scene camera
    fn ndc_of(scene: &SceneRuntime<HeadlessBackend>, point: Point3<f32>) -> Vector2<f32> {
        let camera = scene.camera();
        let clip = camera.projection_matrix() * camera.view_matrix() * point.to_homogeneous();
        Vector2::new(clip.x / clip.w, clip.y / clip.w)
    }

    fn slot_centre(scene: &SceneRuntime<HeadlessBackend>, slot: usize) -> Point3<f32> {
        let slot = scene.layout().slot_for(slot).unwrap();
        slot.position + Vector3::new(0.0, 4.0, 0.0)
    }

    #[test]
    fn test_pointer_hover_and_single_activation() {
        let mut scene = scene_with_item(7);
        let mut router = InteractionRouter::default();

        let target = slot_centre(&scene, 1);
        router.pointer_moved(ndc_of(&scene, target));
        let hover = router.update(1, &mut scene).unwrap();
        assert_eq!(hover.item.item_id().to_string(), "7");
        assert_eq!(scene.selection(), Some(Selection { slot: 1, part: 0 }));

        let events: Vec<InteractionEvent> = router.click().into_iter().collect();
        assert_eq!(events.len(), 1);
        let InteractionEvent::ItemActivated(item) = &events[0];
        assert_eq!(item.item_id().to_string(), "7");
    }

    #[test]
    fn test_hover_clears_over_stage() {
        let mut scene = scene_with_item(7);
        let mut router = InteractionRouter::default();

        // Floor and back wall only
        router.pointer_moved(Vector2::new(0.95, -0.9));
        assert!(router.update(1, &mut scene).is_none());
        assert!(router.click().is_none());
        assert_eq!(scene.selection(), None);
    }

    #[test]
    fn test_hover_is_computed_once_per_frame() {
        let mut scene = scene_with_item(7);
        let mut router = InteractionRouter::default();
        let target = slot_centre(&scene, 1);
        router.pointer_moved(ndc_of(&scene, target));
        assert!(router.update(3, &mut scene).is_some());

        router.pointer_moved(Vector2::new(0.95, 0.95));
        assert!(router.update(3, &mut scene).is_some());
        assert!(router.update(4, &mut scene).is_none());
    }

    #[test]
    fn test_empty_scene_has_no_hover() {
        let mut scene =
            SceneRuntime::mount(HeadlessBackend::new(), SurfaceSize::new(640, 480), SceneConfig::default()).unwrap();
        let mut router = InteractionRouter::default();
        router.pointer_moved(Vector2::zeros());
        assert!(router.update(1, &mut scene).is_none());
    }

    #[test]
    fn test_session_transition_toggles_orbit_and_presentation() {
        let mut scene = scene_with_item(7);
        let mut orbit = OrbitControls::default();
        let mut router = InteractionRouter::default();

        assert_eq!(router.transition(SessionEvent::Started, &mut orbit, &mut scene), InputMode::Controller);
        assert!(!orbit.is_enabled());
        assert_eq!(scene.presentation(), PresentationMode::Immersive);
        // Pointer input is ignored while immersive
        assert!(router.click().is_none());

        assert_eq!(router.transition(SessionEvent::Ended, &mut orbit, &mut scene), InputMode::Pointer);
        assert!(orbit.is_enabled());
        assert_eq!(scene.presentation(), PresentationMode::Desktop);
    }

    #[test]
    fn test_controller_select_casts_along_forward_axis() {
        let mut scene = scene_with_item(9);
        let mut orbit = OrbitControls::default();
        let mut router = InteractionRouter::default();
        router.transition(SessionEvent::Started, &mut orbit, &mut scene);

        let target = slot_centre(&scene, 1);
        let eye = Point3::new(target.x, target.y, 10.0);
        router.set_controller_pose(Isometry3::from_parts(eye.coords.into(), UnitQuaternion::identity()));
        let Some(InteractionEvent::ItemActivated(item)) = router.select(&scene) else {
            panic!("controller ray should hit the coat");
        };
        assert_eq!(item.item_id().to_string(), "9");

        // Facing away: nothing
        let away = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::PI);
        router.set_controller_pose(Isometry3::from_parts(eye.coords.into(), away));
        assert!(router.select(&scene).is_none());
    }

    #[test]
    fn test_controller_axes_move_the_rig() {
        let mut scene = scene_with_item(1);
        let mut orbit = OrbitControls::default();
        let mut router = InteractionRouter::new(0.5);
        router.transition(SessionEvent::Started, &mut orbit, &mut scene);

        router.set_axes(Vector2::new(0.0, 1.0));
        router.update(1, &mut scene);
        router.update(2, &mut scene);
        assert_eq!(scene.camera().rig_offset, Vector3::new(0.0, 0.0, -1.0));
    }
}

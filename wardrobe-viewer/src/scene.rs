//! Scene runtime: stage, visible group, selection and teardown
//!
//! The runtime owns a [`RenderBackend`] and everything uploaded through it.
//! Every GPU resource is recorded in a [`ResourceRegistry`] under the object
//! that owns it, and disposal is simply "release everything in the registry".

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wardrobe_core::{
    CatalogItem, Composite, DrawItem, Error, FrameDesc, GeometryHandle, GpuResource, HighlightStyle, LightRig,
    Material, MaterialHandle, ModelInstance, Ray, RenderBackend, Result, SurfaceSize, TriangleMesh,
};

use crate::camera::Camera;
use crate::stage::{stage_props, StageLayout, StageLayoutConfig};

/// An occupant of a display slot
#[derive(Debug, Clone)]
pub struct VisibleEntry {
    pub slot: usize,
    pub catalog_index: usize,
    pub item: Arc<CatalogItem>,
    pub model: ModelInstance,
}

/// Where frames are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Desktop window: composite pipeline with the highlight pass
    Desktop,
    /// Immersive session: base pass straight to the display
    Immersive,
}

/// Callbacks the runtime has registered with its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Frame,
    Resize,
    Pointer,
}

#[derive(Debug, Default)]
struct ListenerSet {
    frame: bool,
    resize: bool,
    pointer: bool,
}

impl ListenerSet {
    fn slot(&mut self, listener: Listener) -> &mut bool {
        match listener {
            Listener::Frame => &mut self.frame,
            Listener::Resize => &mut self.resize,
            Listener::Pointer => &mut self.pointer,
        }
    }

    fn set(&mut self, listener: Listener, registered: bool) {
        *self.slot(listener) = registered;
    }

    fn contains(&self, listener: Listener) -> bool {
        match listener {
            Listener::Frame => self.frame,
            Listener::Resize => self.resize,
            Listener::Pointer => self.pointer,
        }
    }
}

/// Owner of a group of registered resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    Stage,
    Object(u64),
}

/// Every GPU resource the scene has created and not yet released
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    owners: HashMap<RegistryKey, Vec<GpuResource>>,
}

impl ResourceRegistry {
    pub fn register(&mut self, owner: RegistryKey, resource: GpuResource) {
        self.owners.entry(owner).or_default().push(resource);
    }

    pub fn take(&mut self, owner: RegistryKey) -> Vec<GpuResource> {
        self.owners.remove(&owner).unwrap_or_default()
    }

    pub fn drain(&mut self) -> Vec<(RegistryKey, Vec<GpuResource>)> {
        self.owners.drain().collect()
    }

    /// Live resources across all owners
    pub fn len(&self) -> usize {
        self.owners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Release tallies by resource kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseCounts {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
}

impl ReleaseCounts {
    fn record(&mut self, resource: GpuResource) {
        match resource {
            GpuResource::Geometry(_) => self.geometries += 1,
            GpuResource::Material(_) => self.materials += 1,
            GpuResource::Texture(_) => self.textures += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.textures
    }
}

/// What the scene released over its lifetime, returned by `unmount`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposalReport {
    /// Objects ever attached to the dynamic group
    pub objects_added: usize,
    /// Objects whose resources were released, on eviction or at unmount
    pub objects_disposed: usize,
    pub dynamic: ReleaseCounts,
    pub stage: ReleaseCounts,
    /// Releases the backend rejected
    pub failures: usize,
}

/// The mesh part drawn with the highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub slot: usize,
    pub part: usize,
}

/// Nearest pickable object under a ray
#[derive(Debug, Clone)]
pub struct PickHit {
    pub slot: usize,
    pub part: usize,
    pub distance: f32,
    pub item: Arc<CatalogItem>,
}

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub layout: StageLayoutConfig,
    pub lights: LightRig,
    pub highlight: HighlightStyle,
    pub clear_color: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            layout: StageLayoutConfig::default(),
            lights: LightRig {
                ambient_intensity: 3.0,
                directional_intensity: 3.8,
                ..LightRig::default()
            },
            highlight: HighlightStyle::default(),
            clear_color: Material::hex(0xD2B48C),
        }
    }
}

struct PartDraw {
    part: usize,
    geometry: GeometryHandle,
    material: MaterialHandle,
}

struct SceneObject {
    id: u64,
    entry: VisibleEntry,
    draws: Vec<PartDraw>,
}

/// The live scene of one mounted viewer
pub struct SceneRuntime<B: RenderBackend> {
    backend: B,
    camera: Camera,
    config: SceneConfig,
    layout: StageLayout,
    stage_draws: Vec<DrawItem>,
    objects: Vec<Option<SceneObject>>,
    selection: Option<Selection>,
    presentation: PresentationMode,
    listeners: ListenerSet,
    registry: ResourceRegistry,
    next_object: u64,
    report: DisposalReport,
    mounted: bool,
}

impl<B: RenderBackend> SceneRuntime<B> {
    /// Size the surface, build camera, lights and stage, and register the
    /// frame, resize and pointer listeners
    pub fn mount(mut backend: B, container: SurfaceSize, config: SceneConfig) -> Result<Self> {
        backend.resize(container);

        let mut camera = Camera::default();
        camera.aspect_ratio = container.aspect_ratio();

        let layout = StageLayout::row(&config.layout);
        let mut scene = Self {
            backend,
            camera,
            objects: (0..layout.capacity()).map(|_| None).collect(),
            layout,
            config,
            stage_draws: Vec::new(),
            selection: None,
            presentation: PresentationMode::Desktop,
            listeners: ListenerSet::default(),
            registry: ResourceRegistry::default(),
            next_object: 0,
            report: DisposalReport::default(),
            mounted: true,
        };

        for prop in stage_props(scene.config.layout.height) {
            let (geometry, material) = scene.upload_part(RegistryKey::Stage, &prop.mesh, &prop.material)?;
            scene.stage_draws.push(DrawItem {
                geometry,
                material,
                model: prop.pose.to_transform().matrix,
                highlighted: false,
            });
        }

        for listener in [Listener::Frame, Listener::Resize, Listener::Pointer] {
            scene.listeners.set(listener, true);
        }
        log::debug!(
            "scene mounted at {}x{} with {} slots",
            container.width,
            container.height,
            scene.layout.capacity()
        );
        Ok(scene)
    }

    fn upload_part(
        &mut self,
        owner: RegistryKey,
        mesh: &TriangleMesh,
        material: &Material,
    ) -> Result<(GeometryHandle, MaterialHandle)> {
        let texture = match &material.map {
            Some(map) => {
                let handle = self.backend.create_texture(map)?;
                self.registry.register(owner, GpuResource::Texture(handle));
                Some(handle)
            }
            None => None,
        };
        let material = self.backend.create_material(material, texture)?;
        self.registry.register(owner, GpuResource::Material(material));
        let geometry = self.backend.create_geometry(mesh)?;
        self.registry.register(owner, GpuResource::Geometry(geometry));
        Ok((geometry, material))
    }

    fn release_owner(&mut self, owner: RegistryKey) {
        for resource in self.registry.take(owner) {
            self.release(owner, resource);
        }
    }

    fn release(&mut self, owner: RegistryKey, resource: GpuResource) {
        match self.backend.release(resource) {
            Ok(()) => match owner {
                RegistryKey::Stage => self.report.stage.record(resource),
                RegistryKey::Object(_) => self.report.dynamic.record(resource),
            },
            Err(e) => {
                log::warn!("failed to release {:?}: {}", resource, e);
                self.report.failures += 1;
            }
        }
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(Error::Visualization("scene is unmounted".to_string()))
        }
    }

    /// Re-synchronize camera aspect and surface size with the container
    pub fn resize(&mut self, container: SurfaceSize) -> bool {
        if !self.listeners.contains(Listener::Resize) || container.is_empty() {
            return false;
        }
        self.camera.aspect_ratio = container.aspect_ratio();
        self.backend.resize(container);
        true
    }

    /// Place `entry` at its slot, uploading its geometry
    pub fn attach(&mut self, mut entry: VisibleEntry) -> Result<()> {
        self.ensure_mounted()?;
        let slot = entry.slot;
        let pose = self
            .layout
            .transform_for(slot)
            .ok_or_else(|| Error::InvalidWindowState(format!("slot {} out of range", slot)))?;
        if self.objects[slot].is_some() {
            return Err(Error::InvalidWindowState(format!("slot {} already occupied", slot)));
        }

        self.next_object += 1;
        let id = self.next_object;
        let owner = RegistryKey::Object(id);
        entry.model.pose = pose;

        let mut draws = Vec::with_capacity(entry.model.parts.len());
        for (index, part) in entry.model.parts.iter().enumerate().filter(|(_, p)| !p.mesh.is_empty()) {
            match self.upload_part(owner, &part.mesh, &part.material) {
                Ok((geometry, material)) => draws.push(PartDraw {
                    part: index,
                    geometry,
                    material,
                }),
                Err(e) => {
                    self.release_owner(owner);
                    return Err(e);
                }
            }
        }

        log::debug!(
            "slot {} <- catalog #{} '{}'",
            slot,
            entry.catalog_index,
            entry.item.photo_filename
        );
        self.report.objects_added += 1;
        self.objects[slot] = Some(SceneObject { id, entry, draws });
        Ok(())
    }

    /// Remove the occupant of `slot`, releasing its resources
    pub fn detach(&mut self, slot: usize) -> Option<VisibleEntry> {
        let object = self.objects.get_mut(slot)?.take()?;
        self.release_owner(RegistryKey::Object(object.id));
        self.report.objects_disposed += 1;
        if self.selection.is_some_and(|s| s.slot == slot) {
            self.selection = None;
        }
        log::debug!("slot {} evicted catalog #{}", slot, object.entry.catalog_index);
        Some(object.entry)
    }

    /// Move the occupant of `from` to the empty slot `to` without reloading
    pub fn relocate(&mut self, from: usize, to: usize) -> Result<()> {
        self.relocate_many(&[(from, to)])
    }

    /// Move several occupants at once. Sources are lifted out before any
    /// target is checked, so moves may chain along the row.
    pub fn relocate_many(&mut self, moves: &[(usize, usize)]) -> Result<()> {
        let capacity = self.layout.capacity();
        for (i, &(from, to)) in moves.iter().enumerate() {
            if from >= capacity || to >= capacity {
                return Err(Error::InvalidWindowState(format!("relocation {} -> {} out of range", from, to)));
            }
            if self.objects[from].is_none() {
                return Err(Error::InvalidWindowState(format!("slot {} is empty", from)));
            }
            let vacated = moves.iter().any(|&(f, _)| f == to);
            let claimed = moves[..i].iter().any(|&(_, t)| t == to);
            if claimed || (self.objects[to].is_some() && !vacated) {
                return Err(Error::InvalidWindowState(format!("slot {} already occupied", to)));
            }
        }

        let selected = self.selection.take();
        let lifted: Vec<(usize, usize, SceneObject)> = moves
            .iter()
            .filter_map(|&(from, to)| self.objects[from].take().map(|object| (from, to, object)))
            .collect();

        for (from, to, mut object) in lifted {
            if let Some(pose) = self.layout.transform_for(to) {
                object.entry.model.pose = pose;
            }
            object.entry.slot = to;
            if let Some(selection) = selected.filter(|s| s.slot == from) {
                self.selection = Some(Selection { slot: to, ..selection });
            }
            self.objects[to] = Some(object);
        }
        Ok(())
    }

    /// Replace the whole dynamic group. An entry that fails to attach leaves
    /// its slot empty without affecting the others; the failures are returned
    /// per slot.
    pub fn set_visible_group(&mut self, entries: Vec<VisibleEntry>) -> Vec<(usize, Error)> {
        for slot in 0..self.objects.len() {
            self.detach(slot);
        }
        let mut failures = Vec::new();
        for entry in entries {
            let slot = entry.slot;
            if let Err(e) = self.attach(entry) {
                log::warn!("slot {} stays empty: {}", slot, e);
                failures.push((slot, e));
            }
        }
        failures
    }

    pub fn occupant(&self, slot: usize) -> Option<&VisibleEntry> {
        self.objects.get(slot)?.as_ref().map(|o| &o.entry)
    }

    pub fn occupied_slots(&self) -> Vec<usize> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(slot, o)| o.as_ref().map(|_| slot))
            .collect()
    }

    /// Part drawn with the highlight; ignored unless the slot holds that part
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection.filter(|s| self.occupant(s.slot).is_some_and(|e| s.part < e.model.parts.len()));
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_presentation(&mut self, mode: PresentationMode) {
        if self.presentation != mode {
            log::debug!("presentation {:?} -> {:?}", self.presentation, mode);
        }
        self.presentation = mode;
    }

    pub fn presentation(&self) -> PresentationMode {
        self.presentation
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn layout(&self) -> &StageLayout {
        &self.layout
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_listening(&self, listener: Listener) -> bool {
        self.listeners.contains(listener)
    }

    /// Nearest hit among the visible group; stage geometry is never picked
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(slot, object)| {
                let object = object.as_ref()?;
                let hit = object.entry.model.intersect(ray)?;
                let item = object.entry.model.parts[hit.part].owner.clone()?;
                Some(PickHit {
                    slot,
                    part: hit.part,
                    distance: hit.distance,
                    item,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Draw one frame. Returns `Ok(false)` once the frame callback is gone.
    pub fn render_frame(&mut self) -> Result<bool> {
        if !self.listeners.contains(Listener::Frame) {
            return Ok(false);
        }

        let mut draws = self.stage_draws.clone();
        for (slot, object) in self.objects.iter().enumerate() {
            let Some(object) = object else { continue };
            let model = object.entry.model.pose.to_transform().matrix;
            draws.extend(object.draws.iter().map(|d| DrawItem {
                geometry: d.geometry,
                material: d.material,
                model,
                highlighted: self.selection == Some(Selection { slot, part: d.part }),
            }));
        }

        let composite = match self.presentation {
            PresentationMode::Desktop => Composite::Highlighted(self.config.highlight),
            PresentationMode::Immersive => Composite::Direct,
        };
        let frame = FrameDesc {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            eye: self.camera.eye(),
            lights: self.config.lights,
            clear_color: self.config.clear_color,
            composite,
            draws: &draws,
        };
        self.backend.render(&frame)?;
        Ok(true)
    }

    /// Tear everything down. The frame callback goes first so no frame can
    /// observe a half-disposed scene. Calling again returns the same report.
    pub fn unmount(&mut self) -> DisposalReport {
        if !self.mounted {
            return self.report;
        }
        self.listeners.set(Listener::Frame, false);
        self.listeners.set(Listener::Resize, false);
        self.listeners.set(Listener::Pointer, false);

        for slot in 0..self.objects.len() {
            self.detach(slot);
        }
        for (owner, resources) in self.registry.drain() {
            for resource in resources {
                self.release(owner, resource);
            }
        }
        self.stage_draws.clear();
        self.backend.dispose();
        self.mounted = false;

        log::debug!(
            "scene unmounted: {} objects, {} dynamic and {} stage resources released",
            self.report.objects_disposed,
            self.report.dynamic.total(),
            self.report.stage.total()
        );
        self.report
    }
}

impl<B: RenderBackend> Drop for SceneRuntime<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Vector2, Vector3};
    use wardrobe_core::{HeadlessBackend, MeshPart, Model, Point3f};

    fn item(id: u64) -> Arc<CatalogItem> {
        Arc::new(CatalogItem {
            id: Some(id.into()),
            kind: "jacket".to_string(),
            size: Some("M".to_string()),
            color: None,
            photo_filename: format!("jacket_{}", id),
            price: 20.0,
        })
    }

    /// A 2x8 quad standing on y = 0, facing +Z
    fn entry(slot: usize, id: u64) -> VisibleEntry {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(-1.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 8.0, 0.0),
                Point3f::new(-1.0, 8.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        let model = Model::new(vec![MeshPart::new("body", mesh, Material::default())]);
        let item = item(id);
        VisibleEntry {
            slot,
            catalog_index: id as usize,
            model: model.instantiate(&item),
            item,
        }
    }

    fn mount() -> SceneRuntime<HeadlessBackend> {
        SceneRuntime::mount(HeadlessBackend::new(), SurfaceSize::new(800, 600), SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_mount_builds_stage() {
        let scene = mount();
        // floor: texture + material + geometry; wall and rail: material + geometry
        assert_eq!(scene.backend().live_resources(), 7);
        assert_eq!(scene.registry().len(), 7);
        assert_relative_eq!(scene.camera().aspect_ratio, 800.0 / 600.0);
        assert!(scene.is_listening(Listener::Frame));
    }

    #[test]
    fn test_attach_to_occupied_slot_is_rejected() {
        let mut scene = mount();
        scene.attach(entry(1, 10)).unwrap();
        let err = scene.attach(entry(1, 11)).unwrap_err();
        assert!(matches!(err, Error::InvalidWindowState(_)));
        assert_eq!(scene.occupant(1).unwrap().catalog_index, 10);
    }

    #[test]
    fn test_attach_places_entry_at_slot_pose() {
        let mut scene = mount();
        scene.attach(entry(2, 3)).unwrap();
        let slot = *scene.layout().slot_for(2).unwrap();
        let pose = scene.occupant(2).unwrap().model.pose;
        assert_eq!(pose.translation, slot.position.coords);
    }

    #[test]
    fn test_set_visible_group_releases_previous_objects() {
        let mut scene = mount();
        assert!(scene.set_visible_group(vec![entry(0, 1), entry(1, 2)]).is_empty());
        let with_two = scene.backend().live_resources();

        assert!(scene.set_visible_group(vec![entry(3, 4)]).is_empty());
        assert_eq!(scene.occupied_slots(), vec![3]);
        assert_eq!(scene.backend().live_resources(), with_two - 2);
    }

    #[test]
    fn test_relocate_moves_without_reupload() {
        let mut scene = mount();
        scene.attach(entry(1, 5)).unwrap();
        scene.attach(entry(2, 6)).unwrap();
        let created = scene.backend().created;

        scene.relocate_many(&[(1, 0), (2, 1)]).unwrap();
        assert_eq!(scene.occupant(0).unwrap().catalog_index, 5);
        assert_eq!(scene.occupant(1).unwrap().catalog_index, 6);
        assert!(scene.occupant(2).is_none());
        assert_eq!(scene.backend().created, created);

        assert!(scene.relocate(0, 1).is_err());
    }

    #[test]
    fn test_pick_ignores_stage_and_empty_slots() {
        let mut scene = mount();
        scene.attach(entry(0, 7)).unwrap();

        let slot = *scene.layout().slot_for(0).unwrap();
        let origin = Point3f::new(slot.position.x, slot.position.y + 4.0, 10.0);
        let hit = scene.pick(&Ray::new(origin, -Vector3::z()).unwrap()).unwrap();
        assert_eq!(hit.slot, 0);
        assert_eq!(hit.item.item_id().to_string(), "7");

        // Straight at the back wall through an empty slot
        let empty = *scene.layout().slot_for(2).unwrap();
        let origin = Point3f::new(empty.position.x, empty.position.y + 4.0, 10.0);
        assert!(scene.pick(&Ray::new(origin, -Vector3::z()).unwrap()).is_none());

        // Camera ray into empty air
        let ray = scene.camera().ray_from_ndc(Vector2::new(0.0, 0.9)).unwrap();
        assert!(scene.pick(&ray).is_none());
    }

    #[test]
    fn test_render_composites_only_on_desktop() {
        let mut scene = mount();
        scene.attach(entry(0, 1)).unwrap();
        let body = Selection { slot: 0, part: 0 };
        scene.set_selection(Some(Selection { slot: 3, part: 0 }));
        assert_eq!(scene.selection(), None);
        scene.set_selection(Some(Selection { slot: 0, part: 1 }));
        assert_eq!(scene.selection(), None);

        scene.set_selection(Some(body));
        assert!(scene.render_frame().unwrap());
        scene.set_presentation(PresentationMode::Immersive);
        assert!(scene.render_frame().unwrap());

        let frames = &scene.backend().frames;
        assert_eq!(frames[0].draws, 4);
        assert_eq!(frames[0].highlighted, 1);
        assert!(frames[0].composited);
        assert!(!frames[1].composited);
    }

    #[test]
    fn test_highlight_covers_only_the_selected_part() {
        let mut scene = mount();
        let mut two_parts = entry(1, 4);
        let sleeve = two_parts.model.parts[0].clone();
        two_parts.model.parts.push(MeshPart { name: "sleeve".to_string(), ..sleeve });
        scene.attach(two_parts).unwrap();

        scene.set_selection(Some(Selection { slot: 1, part: 1 }));
        scene.render_frame().unwrap();
        assert_eq!(scene.backend().frames[0].highlighted, 1);

        scene.relocate(1, 2).unwrap();
        assert_eq!(scene.selection(), Some(Selection { slot: 2, part: 1 }));
    }

    #[test]
    fn test_visible_group_keeps_going_past_a_bad_entry() {
        let mut scene = mount();
        let failures = scene.set_visible_group(vec![entry(0, 1), entry(9, 2), entry(0, 3), entry(2, 3)]);

        let slots: Vec<usize> = failures.iter().map(|(slot, _)| *slot).collect();
        assert_eq!(slots, vec![9, 0]);
        assert!(matches!(failures[0].1, Error::InvalidWindowState(_)));
        assert_eq!(scene.occupied_slots(), vec![0, 2]);
    }

    #[test]
    fn test_unmount_releases_everything_once() {
        let mut scene = mount();
        scene.set_visible_group(vec![entry(0, 1), entry(1, 2)]);
        scene.detach(0);
        scene.attach(entry(0, 3)).unwrap();

        let report = scene.unmount();
        assert_eq!(report.objects_added, 3);
        assert_eq!(report.objects_disposed, 3);
        assert_eq!(report.dynamic.geometries, 3);
        assert_eq!(report.dynamic.materials, 3);
        assert_eq!(report.stage.textures, 1);
        assert_eq!(report.failures, 0);
        assert_eq!(scene.backend().live_resources(), 0);
        assert!(scene.backend().disposed);

        assert!(!scene.render_frame().unwrap());
        assert!(!scene.resize(SurfaceSize::new(10, 10)));
        assert_eq!(scene.unmount(), report);
        assert!(scene.attach(entry(2, 9)).is_err());
    }
}

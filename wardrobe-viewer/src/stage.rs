//! Display slots and the static stage set

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use wardrobe_core::{Material, Point3f, Pose, TextureData, TriangleMesh};

/// A fixed display position on the stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSlot {
    pub position: Point3f,
    pub orientation: UnitQuaternion<f32>,
}

impl StageSlot {
    pub fn pose(&self) -> Pose {
        Pose::new(self.position.coords, self.orientation)
    }
}

/// Parameters of an evenly spaced row of slots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageLayoutConfig {
    pub slots: usize,
    pub spacing: f32,
    pub height: f32,
    pub depth: f32,
    /// Rotation about +Y applied to every occupant, radians
    pub yaw: f32,
}

impl Default for StageLayoutConfig {
    fn default() -> Self {
        Self {
            slots: 4,
            spacing: 5.0,
            height: -5.0,
            depth: -4.0,
            yaw: -std::f32::consts::FRAC_PI_4,
        }
    }
}

/// The ordered set of display slots. Slots never move; only occupants change.
#[derive(Debug, Clone, PartialEq)]
pub struct StageLayout {
    slots: Vec<StageSlot>,
}

impl StageLayout {
    pub fn new(slots: Vec<StageSlot>) -> Self {
        Self { slots }
    }

    /// A row along X centred on the origin
    pub fn row(config: &StageLayoutConfig) -> Self {
        let orientation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), config.yaw);
        let centre = (config.slots.saturating_sub(1)) as f32 / 2.0;
        let slots = (0..config.slots)
            .map(|i| StageSlot {
                position: Point3f::new((i as f32 - centre) * config.spacing, config.height, config.depth),
                orientation,
            })
            .collect();
        Self::new(slots)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_for(&self, local_index: usize) -> Option<&StageSlot> {
        self.slots.get(local_index)
    }

    pub fn transform_for(&self, local_index: usize) -> Option<Pose> {
        self.slot_for(local_index).map(StageSlot::pose)
    }

    pub fn slots(&self) -> &[StageSlot] {
        &self.slots
    }
}

impl Default for StageLayout {
    fn default() -> Self {
        Self::row(&StageLayoutConfig::default())
    }
}

/// One piece of static stage geometry
#[derive(Debug, Clone)]
pub struct StageProp {
    pub name: &'static str,
    pub mesh: TriangleMesh,
    pub material: Material,
    pub pose: Pose,
}

/// Floor, back wall and the horizontal rail the garments hang under
pub fn stage_props(floor_height: f32) -> Vec<StageProp> {
    let checker = TextureData::checker(256, 8, [205, 180, 140], [165, 135, 95]);
    let floor = StageProp {
        name: "floor",
        mesh: TriangleMesh::plane(60.0, 40.0, 10.0),
        material: Material {
            roughness: 0.9,
            map: Some(Arc::new(checker)),
            ..Material::with_color([1.0, 1.0, 1.0])
        },
        pose: Pose::new(Vector3::new(0.0, floor_height, 0.0), UnitQuaternion::identity()),
    };

    let wall = StageProp {
        name: "back_wall",
        mesh: TriangleMesh::plane(60.0, 30.0, 1.0),
        material: Material {
            roughness: 1.0,
            ..Material::with_color(Material::hex(0xC4A57A))
        },
        pose: Pose::new(
            Vector3::new(0.0, floor_height + 15.0, -15.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2),
        ),
    };

    let rail = StageProp {
        name: "rail",
        mesh: TriangleMesh::cylinder(0.2, 60.0, 32),
        material: Material {
            metalness: 0.5,
            roughness: 0.5,
            ..Material::with_color(Material::hex(0x888888))
        },
        pose: Pose::new(
            Vector3::new(0.0, 5.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
        ),
    };

    vec![floor, wall, rail]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_row_matches_storefront_rail() {
        let layout = StageLayout::default();
        assert_eq!(layout.capacity(), 4);

        let xs: Vec<f32> = layout.slots().iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![-7.5, -2.5, 2.5, 7.5]);
        assert!(layout.slots().iter().all(|s| s.position.y == -5.0 && s.position.z == -4.0));
        assert!(layout.slot_for(4).is_none());
    }

    #[test]
    fn test_hand_placed_slots_keep_their_order() {
        let turned = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.5);
        let layout = StageLayout::new(vec![
            StageSlot {
                position: Point3f::new(3.0, 0.0, -2.0),
                orientation: turned,
            },
            StageSlot {
                position: Point3f::new(-3.0, 1.0, -2.0),
                orientation: UnitQuaternion::identity(),
            },
        ]);

        assert_eq!(layout.capacity(), 2);
        assert_eq!(layout.slot_for(1).unwrap().position, Point3f::new(-3.0, 1.0, -2.0));
        assert_eq!(layout.transform_for(0), Some(layout.slots()[0].pose()));
        assert!(layout.transform_for(2).is_none());
    }

    #[test]
    fn test_rail_lies_along_x() {
        let props = stage_props(-5.0);
        let rail = props.iter().find(|p| p.name == "rail").unwrap();
        let axis = rail.pose.rotation * Vector3::y();
        assert_relative_eq!(axis.x.abs(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(rail.pose.translation.y, 5.0);
    }

    #[test]
    fn test_wall_faces_the_camera() {
        let props = stage_props(-5.0);
        let wall = props.iter().find(|p| p.name == "back_wall").unwrap();
        let normal = wall.pose.rotation * Vector3::y();
        assert_relative_eq!(normal, Vector3::z(), epsilon = 1e-6);
    }
}

//! Camera projection and bounding-volume classification backed by `glam`.

use std::{error::Error, fmt};

use glam::{Mat4, Vec3, Vec4};
use outbreak_core::{
    BoundingBox, BoundingSphere, Heading, PlayerSnapshot, Ray, Relation, SpatialQuery,
    WorldPosition,
};

const DEFAULT_FOV_DEGREES: f32 = 75.0;
const DEFAULT_ASPECT: f32 = 4.0 / 3.0;
const DEFAULT_NEAR: f32 = 0.1;
const DEFAULT_FAR: f32 = 2_750.0;

/// Perspective projection parameters of the first-person camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    fov_y_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Projection {
    /// Creates a validated perspective projection.
    pub fn new(
        fov_y_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, RenderingError> {
        if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
            return Err(RenderingError::InvalidFieldOfView { fov_y_degrees });
        }
        if !(aspect > 0.0) || !aspect.is_finite() {
            return Err(RenderingError::InvalidAspectRatio { aspect });
        }
        if !(near > 0.0 && far > near) || !far.is_finite() {
            return Err(RenderingError::InvalidClipRange { near, far });
        }
        Ok(Self {
            fov_y_degrees,
            aspect,
            near,
            far,
        })
    }

    fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: DEFAULT_FOV_DEGREES,
            aspect: DEFAULT_ASPECT,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

/// Spatial query that classifies volumes against the player's view frustum.
#[derive(Clone, Copy, Debug)]
pub struct FrustumSpatialQuery {
    planes: [Vec4; 6],
}

impl FrustumSpatialQuery {
    /// Builds the frustum seen from the provided eye position and heading.
    #[must_use]
    pub fn new(projection: Projection, eye: WorldPosition, heading: Heading) -> Self {
        let direction = direction_or_forward(heading);
        let up = if direction.abs_diff_eq(Vec3::Y, 1e-4) || direction.abs_diff_eq(-Vec3::Y, 1e-4)
        {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_to_rh(vec3(eye), direction, up);
        let clip = projection.matrix() * view;

        let row0 = clip.row(0);
        let row1 = clip.row(1);
        let row2 = clip.row(2);
        let row3 = clip.row(3);
        let planes = [
            row3 + row0,
            row3 - row0,
            row3 + row1,
            row3 - row1,
            row2,
            row3 - row2,
        ]
        .map(normalize_plane);

        Self { planes }
    }

    /// Builds the frustum seen by the player.
    #[must_use]
    pub fn from_player(projection: Projection, player: &PlayerSnapshot) -> Self {
        Self::new(projection, player.position, player.heading)
    }

    fn classify_sphere(&self, center: Vec3, radius: f32) -> Relation {
        let mut relation = Relation::Inside;
        for plane in &self.planes {
            let distance = plane.truncate().dot(center) + plane.w;
            if distance < -radius {
                return Relation::Outside;
            }
            if distance < radius {
                relation = Relation::Intersecting;
            }
        }
        relation
    }
}

impl SpatialQuery for FrustumSpatialQuery {
    fn ray_vs_sphere(&self, ray: &Ray, sphere: &BoundingSphere) -> Relation {
        ray_vs_sphere(ray, sphere)
    }

    fn sphere_vs_frustum(&self, sphere: &BoundingSphere) -> Relation {
        self.classify_sphere(vec3(sphere.center), sphere.radius)
    }

    fn box_vs_frustum(&self, bounds: &BoundingBox, offset: WorldPosition) -> Relation {
        let offset = vec3(offset);
        let min = vec3(bounds.min) + offset;
        let max = vec3(bounds.max) + offset;

        let mut relation = Relation::Inside;
        for plane in &self.planes {
            let normal = plane.truncate();
            let positive = Vec3::select(normal.cmpge(Vec3::ZERO), max, min);
            let negative = Vec3::select(normal.cmpge(Vec3::ZERO), min, max);
            if normal.dot(positive) + plane.w < 0.0 {
                return Relation::Outside;
            }
            if normal.dot(negative) + plane.w < 0.0 {
                relation = Relation::Intersecting;
            }
        }
        relation
    }
}

/// Classifies a half-line against a sphere.
///
/// A ray starting inside the sphere is [`Relation::Inside`]; a ray that reaches
/// the sphere at a non-negative parameter is [`Relation::Intersecting`].
#[must_use]
pub fn ray_vs_sphere(ray: &Ray, sphere: &BoundingSphere) -> Relation {
    let origin = vec3(ray.origin);
    let to_center = vec3(sphere.center) - origin;
    let radius_sq = sphere.radius * sphere.radius;
    let center_distance_sq = to_center.length_squared();

    if center_distance_sq <= radius_sq {
        return Relation::Inside;
    }

    let Some(direction) = heading_vec(ray.direction).try_normalize() else {
        return Relation::Outside;
    };

    let along = to_center.dot(direction);
    if along < 0.0 {
        return Relation::Outside;
    }

    let closest_sq = center_distance_sq - along * along;
    if closest_sq <= radius_sq {
        Relation::Intersecting
    } else {
        Relation::Outside
    }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
    let length = plane.truncate().length();
    if length > f32::EPSILON {
        plane / length
    } else {
        plane
    }
}

fn direction_or_forward(heading: Heading) -> Vec3 {
    heading_vec(heading)
        .try_normalize()
        .unwrap_or(Vec3::Z)
}

pub(crate) fn vec3(position: WorldPosition) -> Vec3 {
    Vec3::new(position.x(), position.y(), position.z())
}

pub(crate) fn heading_vec(heading: Heading) -> Vec3 {
    Vec3::new(heading.x(), heading.y(), heading.z())
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Vertical field of view must lie strictly between 0 and 180 degrees.
    InvalidFieldOfView {
        /// Provided field of view that failed validation.
        fov_y_degrees: f32,
    },
    /// Aspect ratio must be positive and finite.
    InvalidAspectRatio {
        /// Provided aspect ratio that failed validation.
        aspect: f32,
    },
    /// Clip planes must satisfy `0 < near < far`.
    InvalidClipRange {
        /// Provided near plane distance.
        near: f32,
        /// Provided far plane distance.
        far: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFieldOfView { fov_y_degrees } => {
                write!(
                    f,
                    "field of view must lie in (0, 180) degrees (received {fov_y_degrees})"
                )
            }
            Self::InvalidAspectRatio { aspect } => {
                write!(f, "aspect ratio must be positive (received {aspect})")
            }
            Self::InvalidClipRange { near, far } => {
                write!(f, "clip range must satisfy 0 < near < far (received {near}..{far})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(x: f32, y: f32, z: f32, radius: f32) -> BoundingSphere {
        BoundingSphere::new(WorldPosition::new(x, y, z), radius)
    }

    fn eye_ray() -> Ray {
        Ray {
            origin: WorldPosition::new(0.0, 6.0, 0.0),
            direction: Heading::FORWARD,
        }
    }

    #[test]
    fn ray_through_center_intersects() {
        assert_eq!(
            ray_vs_sphere(&eye_ray(), &sphere(0.0, 6.0, 50.0, 5.0)),
            Relation::Intersecting
        );
    }

    #[test]
    fn ray_grazing_beyond_radius_misses() {
        assert_eq!(
            ray_vs_sphere(&eye_ray(), &sphere(5.5, 6.0, 50.0, 5.0)),
            Relation::Outside
        );
    }

    #[test]
    fn sphere_behind_ray_misses() {
        assert_eq!(
            ray_vs_sphere(&eye_ray(), &sphere(0.0, 6.0, -50.0, 5.0)),
            Relation::Outside
        );
    }

    #[test]
    fn origin_inside_sphere_reports_inside() {
        assert_eq!(
            ray_vs_sphere(&eye_ray(), &sphere(0.0, 7.0, 1.0, 5.0)),
            Relation::Inside
        );
    }

    #[test]
    fn frustum_separates_front_from_back() {
        let frustum = FrustumSpatialQuery::new(
            Projection::default(),
            WorldPosition::new(0.0, 6.0, 0.0),
            Heading::FORWARD,
        );

        assert_eq!(
            frustum.sphere_vs_frustum(&sphere(0.0, 6.0, 100.0, 5.0)),
            Relation::Inside
        );
        assert_eq!(
            frustum.sphere_vs_frustum(&sphere(0.0, 6.0, -100.0, 5.0)),
            Relation::Outside
        );
        assert_eq!(
            frustum.sphere_vs_frustum(&sphere(0.0, 6.0, 3_000.0, 5.0)),
            Relation::Outside
        );
    }

    #[test]
    fn box_straddling_side_plane_intersects() {
        let frustum = FrustumSpatialQuery::new(
            Projection::default(),
            WorldPosition::new(0.0, 6.0, 0.0),
            Heading::FORWARD,
        );
        let bounds = BoundingBox {
            min: WorldPosition::new(-1.0, 0.0, -1.0),
            max: WorldPosition::new(1.0, 2.0, 1.0),
        };

        assert_eq!(
            frustum.box_vs_frustum(&bounds, WorldPosition::new(0.0, 6.0, 50.0)),
            Relation::Inside
        );
        assert_eq!(
            frustum.box_vs_frustum(&bounds, WorldPosition::new(0.0, 6.0, -50.0)),
            Relation::Outside
        );
        assert_eq!(
            frustum.box_vs_frustum(&bounds, WorldPosition::new(0.0, 6.0, 0.5)),
            Relation::Intersecting
        );
    }

    #[test]
    fn projection_rejects_inverted_clip_range() {
        assert_eq!(
            Projection::new(75.0, 1.0, 10.0, 1.0),
            Err(RenderingError::InvalidClipRange {
                near: 10.0,
                far: 1.0
            })
        );
    }
}

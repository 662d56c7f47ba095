use serde::{Deserialize, Serialize};

/// A point in 3D model space. Coordinates are millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const ORIGIN: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn translated(&self, offset: Vec3) -> Point3 {
        Point3::new(self.x + offset.x, self.y + offset.y, self.z + offset.z)
    }

    pub fn distance_to(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn midpoint(&self, other: &Point3) -> Point3 {
        Point3::new(
            (self.x + other.x) * 0.5,
            (self.y + other.y) * 0.5,
            (self.z + other.z) * 0.5,
        )
    }
}

/// A displacement in 3D model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn scaled(&self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Normalizes to unit length; `None` for a degenerate vector.
    pub fn direction(&self) -> Option<Direction3> {
        Direction3::try_from_vec(*self)
    }
}

/// A unit-length direction. Construction normalizes, so downstream code can
/// rely on `|v| == 1` without re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Direction3 {
    pub const POS_X: Direction3 = Direction3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const POS_Y: Direction3 = Direction3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const POS_Z: Direction3 = Direction3 {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };
    pub const NEG_Z: Direction3 = Direction3 {
        x: 0.0,
        y: 0.0,
        z: -1.0,
    };

    pub fn try_from_vec(v: Vec3) -> Option<Direction3> {
        let n = v.norm();
        if n < 1e-12 {
            return None;
        }
        Some(Direction3 {
            x: v.x / n,
            y: v.y / n,
            z: v.z / n,
        })
    }

    pub fn as_vec(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn reversed(&self) -> Direction3 {
        Direction3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// An orthonormal placement frame: origin plus two in-plane axes.
/// The frame normal is `dir_x × dir_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Point3,
    pub dir_x: Direction3,
    pub dir_y: Direction3,
}

impl Frame {
    pub fn new(origin: Point3, dir_x: Direction3, dir_y: Direction3) -> Self {
        Self {
            origin,
            dir_x,
            dir_y,
        }
    }

    /// The XY plane at the given height, axes aligned with world X/Y.
    pub fn xy_at(z: f64) -> Frame {
        Frame::new(
            Point3::new(0.0, 0.0, z),
            Direction3::POS_X,
            Direction3::POS_Y,
        )
    }

    /// The YZ plane through the origin (normal +X).
    pub fn yz() -> Frame {
        Frame::new(Point3::ORIGIN, Direction3::POS_Y, Direction3::POS_Z)
    }

    /// The ZX plane through the origin (normal +Y).
    pub fn zx() -> Frame {
        Frame::new(Point3::ORIGIN, Direction3::POS_Z, Direction3::POS_X)
    }

    pub fn normal(&self) -> Direction3 {
        let n = self.dir_x.as_vec().cross(&self.dir_y.as_vec());
        // Cross of two unit orthogonal axes is unit length.
        Direction3::try_from_vec(n).unwrap_or(Direction3::POS_Z)
    }

    /// Maps in-plane (u, v) coordinates to model space.
    pub fn point_at(&self, u: f64, v: f64) -> Point3 {
        let d = self
            .dir_x
            .as_vec()
            .scaled(u)
            .translated_by(self.dir_y.as_vec().scaled(v));
        self.origin.translated(d)
    }

    /// Projects a model-space point onto in-plane (u, v) coordinates.
    pub fn project(&self, p: &Point3) -> (f64, f64) {
        let d = Vec3::new(
            p.x - self.origin.x,
            p.y - self.origin.y,
            p.z - self.origin.z,
        );
        (d.dot(&self.dir_x.as_vec()), d.dot(&self.dir_y.as_vec()))
    }
}

impl Vec3 {
    fn translated_by(&self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// An unbounded cutting plane, given by a point on it and its normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Direction3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Direction3) -> Self {
        Self { origin, normal }
    }

    /// Horizontal plane at the given height, normal +Z.
    pub fn z_at(z: f64) -> Plane {
        Plane::new(Point3::new(0.0, 0.0, z), Direction3::POS_Z)
    }

    /// The XZ plane through the origin (normal +Y).
    pub fn xz() -> Plane {
        Plane::new(Point3::ORIGIN, Direction3::POS_Y)
    }

    /// The YZ plane through the origin (normal +X).
    pub fn yz() -> Plane {
        Plane::new(Point3::ORIGIN, Direction3::POS_X)
    }

    /// Signed distance of `p` from the plane, positive on the normal side.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        let d = Vec3::new(
            p.x - self.origin.x,
            p.y - self.origin.y,
            p.z - self.origin.z,
        );
        d.dot(&self.normal.as_vec())
    }
}

/// An oriented axis line, used for revolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub origin: Point3,
    pub direction: Direction3,
}

impl Axis {
    pub fn new(origin: Point3, direction: Direction3) -> Self {
        Self { origin, direction }
    }

    /// The world Z axis through the origin.
    pub fn world_z() -> Axis {
        Axis::new(Point3::ORIGIN, Direction3::POS_Z)
    }
}

//! Small vector and matrix types shared by the mesh pipeline.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    /// Centre of the unit block cube; model rotations pivot here.
    pub const BLOCK_CENTER: Vec3 = Vec3::new(0.5, 0.5, 0.5);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Applies `m` to this vector as a point (w = 1).
    #[inline]
    pub fn apply(self, m: &Matrix4) -> Vec3 {
        m.transform_point(self)
    }

    /// Grid cell containing this point (floor on every axis).
    #[inline]
    pub fn floor_i32(self) -> (i32, i32, i32) {
        (
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The full unit block.
    pub const UNIT: Aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

/// Affine 4x4 matrix, column-major (`m[col * 4 + row]`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4 {
    pub m: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, v: f32) {
        self.m[col * 4 + row] = v;
    }

    /// Right-handed rotation about +X by `rad` radians.
    pub fn rotation_x(rad: f32) -> Self {
        let (s, c) = rad.sin_cos();
        let mut out = Self::IDENTITY;
        out.set(1, 1, c);
        out.set(1, 2, -s);
        out.set(2, 1, s);
        out.set(2, 2, c);
        out
    }

    /// Right-handed rotation about +Y by `rad` radians.
    pub fn rotation_y(rad: f32) -> Self {
        let (s, c) = rad.sin_cos();
        let mut out = Self::IDENTITY;
        out.set(0, 0, c);
        out.set(0, 2, s);
        out.set(2, 0, -s);
        out.set(2, 2, c);
        out
    }

    /// Right-handed rotation about +Z by `rad` radians.
    pub fn rotation_z(rad: f32) -> Self {
        let (s, c) = rad.sin_cos();
        let mut out = Self::IDENTITY;
        out.set(0, 0, c);
        out.set(0, 1, -s);
        out.set(1, 0, s);
        out.set(1, 1, c);
        out
    }

    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        Vec3 {
            x: self.get(0, 0) * p.x + self.get(0, 1) * p.y + self.get(0, 2) * p.z + self.get(0, 3),
            y: self.get(1, 0) * p.x + self.get(1, 1) * p.y + self.get(1, 2) * p.z + self.get(1, 3),
            z: self.get(2, 0) * p.x + self.get(2, 1) * p.y + self.get(2, 2) * p.z + self.get(2, 3),
        }
    }
}

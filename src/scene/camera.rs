//! 透视相机与视口

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::{LanyardError, Result};

/// 视口（像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(LanyardError::Viewport(format!("invalid size {}x{}", width, height)));
        }
        Ok(Self { width, height })
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// 像素坐标（左上角为原点）→ NDC（[-1, 1]，Y 向上）
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x / self.width * 2.0 - 1.0, -(y / self.height) * 2.0 + 1.0)
    }
}

/// 透视相机（看向原点方向由 target 决定）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// 垂直视场角（度）
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 13.0),
            target: Vec3::ZERO,
            fov: 25.0,
            near: 0.1,
            far: 1000.0,
            aspect: 1.0,
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// NDC 坐标（含深度）→ 世界坐标
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let inverse = (self.projection_matrix() * self.view_matrix()).inverse();
        let world = inverse * Vec4::new(ndc.x, ndc.y, ndc.z, 1.0);
        world.truncate() / world.w
    }

    /// 从相机出发穿过指针的射线（原点、单位方向）
    pub fn ray(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let through = self.unproject(ndc.extend(0.5));
        (self.position, (through - self.position).normalize_or_zero())
    }

    /// 拖拽目标点
    ///
    /// 先反投影到 NDC 深度 0.5 处，再沿视线前进"相机到原点的距离"。
    /// 只是近似落在过原点的平面附近，并非真正的深度拾取。
    pub fn drag_target(&self, ndc: Vec2) -> Vec3 {
        let point = self.unproject(ndc.extend(0.5));
        let dir = (point - self.position).normalize_or_zero();
        point + dir * self.position.length()
    }
}

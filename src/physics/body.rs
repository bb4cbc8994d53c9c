//! 挂绳刚体定义
//!
//! 七个刚体按固定拓扑顺序排列：锚点 → 三段绳节点 → 吊环 → 卡套 → 卡片。
//! 句柄保存在以 [`BodyRole`] 为下标的表中。

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use super::config::PhysicsConfig;

/// 整个挂绳组的世界原点
pub const BAND_ORIGIN: Vec3 = Vec3::new(3.0, 4.5, 0.0);

/// 刚体角色（固定枚举，兼作句柄表下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    Anchor,
    Link1,
    Link2,
    Link3,
    Ring,
    Holder,
    Card,
}

impl BodyRole {
    /// 按拓扑顺序排列的全部角色
    pub const ALL: [BodyRole; 7] = [
        BodyRole::Anchor,
        BodyRole::Link1,
        BodyRole::Link2,
        BodyRole::Link3,
        BodyRole::Ring,
        BodyRole::Holder,
        BodyRole::Card,
    ];

    /// 拖拽时需要唤醒的刚体
    pub const DRAG_WAKE: [BodyRole; 5] = [
        BodyRole::Card,
        BodyRole::Link1,
        BodyRole::Link2,
        BodyRole::Link3,
        BodyRole::Anchor,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// 刚体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// 固定，不参与模拟
    Fixed,
    /// 动态刚体，完全由物理驱动
    Dynamic,
    /// 运动学刚体，由外部设置下一帧位置
    KinematicPosition,
}

impl From<BodyKind> for RigidBodyType {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Fixed => RigidBodyType::Fixed,
            BodyKind::Dynamic => RigidBodyType::Dynamic,
            BodyKind::KinematicPosition => RigidBodyType::KinematicPositionBased,
        }
    }
}

/// 碰撞体形状（参数均为半尺寸）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// 沿局部 Y 轴
    Cylinder { half_height: f32, radius: f32 },
}

/// 碰撞体描述：形状 + 相对刚体的局部偏移
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderSpec {
    pub shape: ColliderShape,
    pub offset: Vec3,
    /// 欧拉角 (XYZ, 弧度)
    pub rotation: Vec3,
}

impl ColliderSpec {
    pub fn ball(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Ball { radius },
            offset: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn cuboid(hx: f32, hy: f32, hz: f32, offset: Vec3) -> Self {
        Self {
            shape: ColliderShape::Cuboid { half_extents: Vec3::new(hx, hy, hz) },
            offset,
            rotation: Vec3::ZERO,
        }
    }

    pub fn cylinder(half_height: f32, radius: f32, offset: Vec3, rotation: Vec3) -> Self {
        Self {
            shape: ColliderShape::Cylinder { half_height, radius },
            offset,
            rotation,
        }
    }

    /// 创建 Rapier 碰撞体
    pub fn build_collider(&self) -> Collider {
        let builder = match self.shape {
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderShape::Cylinder { half_height, radius } => {
                ColliderBuilder::cylinder(half_height, radius)
            }
        };

        builder
            .position(Isometry::new(vec3_to_rapier(self.offset), vec3_to_rapier(self.rotation)))
            .build()
    }
}

/// 刚体描述
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub role: BodyRole,
    pub kind: BodyKind,
    /// 相对 [`BAND_ORIGIN`] 的初始位置
    pub position: Vec3,
    pub colliders: Vec<ColliderSpec>,
}

impl BodySpec {
    /// 创建 Rapier 刚体（阻尼与休眠取自配置）
    pub fn build_rigid_body(&self, origin: Vec3, config: &PhysicsConfig) -> RigidBody {
        RigidBodyBuilder::new(self.kind.into())
            .translation(vec3_to_rapier(origin + self.position))
            .linear_damping(config.linear_damping)
            .angular_damping(config.angular_damping)
            .can_sleep(config.can_sleep)
            .build()
    }
}

/// 挂绳七个刚体的描述表
pub fn lanyard_bodies() -> Vec<BodySpec> {
    let link = |role, x| BodySpec {
        role,
        kind: BodyKind::Dynamic,
        position: Vec3::new(x, 0.0, 0.0),
        colliders: vec![ColliderSpec::ball(0.1)],
    };

    vec![
        BodySpec {
            role: BodyRole::Anchor,
            kind: BodyKind::Fixed,
            position: Vec3::ZERO,
            colliders: vec![ColliderSpec::ball(0.1)],
        },
        link(BodyRole::Link1, 0.5),
        link(BodyRole::Link2, 1.0),
        link(BodyRole::Link3, 1.5),
        BodySpec {
            role: BodyRole::Ring,
            kind: BodyKind::Dynamic,
            position: Vec3::new(2.0, 1.74, 0.0),
            colliders: vec![ColliderSpec::cylinder(
                0.2,
                0.25,
                Vec3::new(0.0, -0.13, 0.0),
                Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            )],
        },
        BodySpec {
            role: BodyRole::Holder,
            kind: BodyKind::Dynamic,
            position: Vec3::new(2.0, 1.16, 0.0),
            colliders: vec![ColliderSpec::cuboid(0.12, 0.18, 0.5, Vec3::new(0.0, -0.02, 0.0))],
        },
        BodySpec {
            role: BodyRole::Card,
            kind: BodyKind::Dynamic,
            position: Vec3::new(2.0, 0.0, 0.0),
            colliders: vec![
                ColliderSpec::cuboid(0.8, 1.1, 0.02, Vec3::new(0.0, -0.25, 0.0)),
                ColliderSpec::cuboid(0.25, 0.11, 0.02, Vec3::new(-0.55, 1.0, 0.0)),
                ColliderSpec::cuboid(0.25, 0.11, 0.02, Vec3::new(0.55, 1.0, 0.0)),
            ],
        },
    ]
}

/// 刚体句柄表（以 [`BodyRole`] 为下标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandBodies {
    handles: [RigidBodyHandle; 7],
}

impl BandBodies {
    pub fn new(handles: [RigidBodyHandle; 7]) -> Self {
        Self { handles }
    }

    pub fn handle(&self, role: BodyRole) -> RigidBodyHandle {
        self.handles[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyRole, RigidBodyHandle)> + '_ {
        BodyRole::ALL.iter().map(move |&role| (role, self.handles[role.index()]))
    }
}

/// 将 glam Vec3 转换为 Rapier Vector
pub fn vec3_to_rapier(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

/// 将 glam Vec3 转换为 Rapier Point
pub fn vec3_to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

/// 将 Rapier Vector 转换为 glam Vec3
pub fn rapier_to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// 将 Rapier 旋转转换为 glam Quat
pub fn rapier_to_quat(r: &Rotation<Real>) -> Quat {
    let c = r.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_index_in_topological_order() {
        for (i, role) in BodyRole::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
        assert_eq!(BodyRole::Card.index(), 6);
    }

    #[test]
    fn test_lanyard_bodies_table() {
        let bodies = lanyard_bodies();
        assert_eq!(bodies.len(), 7);
        for (spec, role) in bodies.iter().zip(BodyRole::ALL) {
            assert_eq!(spec.role, role);
        }
        assert_eq!(bodies[0].kind, BodyKind::Fixed);
        assert!(bodies[1..].iter().all(|b| b.kind == BodyKind::Dynamic));
        assert_eq!(bodies[BodyRole::Card.index()].colliders.len(), 3);
    }

    #[test]
    fn test_build_rigid_body_applies_origin_and_damping() {
        let config = PhysicsConfig::default();
        let spec = &lanyard_bodies()[BodyRole::Link2.index()];
        let rb = spec.build_rigid_body(BAND_ORIGIN, &config);
        let t = rapier_to_vec3(rb.translation());
        assert!((t - Vec3::new(4.0, 4.5, 0.0)).length() < 1e-6);
        assert!((rb.linear_damping() - 2.0).abs() < 1e-6);
        assert!((rb.angular_damping() - 2.0).abs() < 1e-6);
        assert!(rb.is_dynamic());
    }

    #[test]
    fn test_quat_conversion_identity() {
        let q = rapier_to_quat(&Rotation::identity());
        assert!((q.w - 1.0).abs() < 1e-6);
        assert!(q.x.abs() < 1e-6 && q.y.abs() < 1e-6 && q.z.abs() < 1e-6);
    }
}

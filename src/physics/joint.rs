//! 挂绳关节（约束）定义
//!
//! 三种关节对应 Rapier 的内置关节：
//! | 关节 | Rapier | 自由度 |
//! |------|--------|--------|
//! | Rope | RopeJoint | 只限制最大距离 |
//! | Spherical | SphericalJoint | 锚点重合，旋转自由 |
//! | Revolute | RevoluteJoint | 锚点重合，绕共享轴 1 个旋转自由度 |

use glam::Vec3;
use rapier3d::prelude::*;

use super::body::{vec3_to_point, vec3_to_rapier, BodyRole};

/// 关节类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    Rope { max_distance: f32 },
    Spherical,
    Revolute { axis: Vec3 },
}

/// 两个刚体之间的关节描述
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSpec {
    pub body_a: BodyRole,
    pub body_b: BodyRole,
    /// 刚体 A 局部空间的锚点
    pub anchor_a: Vec3,
    /// 刚体 B 局部空间的锚点
    pub anchor_b: Vec3,
    pub kind: JointKind,
}

impl JointSpec {
    pub fn rope(body_a: BodyRole, body_b: BodyRole, max_distance: f32) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a: Vec3::ZERO,
            anchor_b: Vec3::ZERO,
            kind: JointKind::Rope { max_distance },
        }
    }

    pub fn spherical(body_a: BodyRole, body_b: BodyRole, anchor_a: Vec3, anchor_b: Vec3) -> Self {
        Self { body_a, body_b, anchor_a, anchor_b, kind: JointKind::Spherical }
    }

    pub fn revolute(
        body_a: BodyRole,
        body_b: BodyRole,
        anchor_a: Vec3,
        anchor_b: Vec3,
        axis: Vec3,
    ) -> Self {
        Self { body_a, body_b, anchor_a, anchor_b, kind: JointKind::Revolute { axis } }
    }

    /// 创建 Rapier 关节
    pub fn build_joint(&self) -> GenericJoint {
        let anchor1 = vec3_to_point(self.anchor_a);
        let anchor2 = vec3_to_point(self.anchor_b);

        match self.kind {
            JointKind::Rope { max_distance } => RopeJointBuilder::new(max_distance)
                .local_anchor1(anchor1)
                .local_anchor2(anchor2)
                .build()
                .into(),
            JointKind::Spherical => SphericalJointBuilder::new()
                .local_anchor1(anchor1)
                .local_anchor2(anchor2)
                .build()
                .into(),
            JointKind::Revolute { axis } => {
                RevoluteJointBuilder::new(UnitVector::new_normalize(vec3_to_rapier(axis)))
                    .local_anchor1(anchor1)
                    .local_anchor2(anchor2)
                    .build()
                    .into()
            }
        }
    }
}

/// 挂绳的关节接线表
///
/// 吊环和卡套之间同时挂了 revolute 和 spherical 两个约束，
/// 是有意的过约束，用来压住卡套的晃动。
pub fn lanyard_joints(rope_length: f32) -> Vec<JointSpec> {
    use BodyRole::*;

    vec![
        JointSpec::rope(Anchor, Link1, rope_length),
        JointSpec::rope(Link1, Link2, rope_length),
        JointSpec::rope(Link2, Link3, rope_length),
        JointSpec::spherical(Link3, Ring, Vec3::ZERO, Vec3::new(0.0, 0.23, 0.0)),
        JointSpec::revolute(
            Ring,
            Holder,
            Vec3::new(0.0, -0.45, 0.0),
            Vec3::new(0.0, 0.14, 0.0),
            Vec3::X,
        ),
        JointSpec::spherical(Ring, Holder, Vec3::new(0.0, -0.45, 0.0), Vec3::new(0.0, 0.14, 0.0)),
        JointSpec::revolute(
            Holder,
            Card,
            Vec3::new(0.0, -0.2, 0.0),
            Vec3::new(0.0, 0.96, 0.0),
            Vec3::Z,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(joints: &[JointSpec], pred: impl Fn(&JointKind) -> bool) -> usize {
        joints.iter().filter(|j| pred(&j.kind)).count()
    }

    #[test]
    fn test_joint_counts() {
        let joints = lanyard_joints(1.0);
        assert_eq!(joints.len(), 7);
        assert_eq!(count(&joints, |k| matches!(k, JointKind::Rope { .. })), 3);
        assert_eq!(count(&joints, |k| matches!(k, JointKind::Spherical)), 2);
        assert_eq!(count(&joints, |k| matches!(k, JointKind::Revolute { .. })), 2);
    }

    #[test]
    fn test_rope_segments_use_configured_length() {
        let joints = lanyard_joints(0.75);
        for joint in &joints[..3] {
            assert_eq!(joint.kind, JointKind::Rope { max_distance: 0.75 });
            assert_eq!(joint.anchor_a, Vec3::ZERO);
            assert_eq!(joint.anchor_b, Vec3::ZERO);
        }
    }

    #[test]
    fn test_ring_holder_is_double_constrained() {
        let joints = lanyard_joints(1.0);
        let pair: Vec<_> = joints
            .iter()
            .filter(|j| j.body_a == BodyRole::Ring && j.body_b == BodyRole::Holder)
            .collect();
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0].anchor_a, pair[1].anchor_a);
        assert_eq!(pair[0].anchor_b, pair[1].anchor_b);
    }

    #[test]
    fn test_revolute_axes_are_perpendicular() {
        let joints = lanyard_joints(1.0);
        let axes: Vec<Vec3> = joints
            .iter()
            .filter_map(|j| match j.kind {
                JointKind::Revolute { axis } => Some(axis),
                _ => None,
            })
            .collect();
        assert_eq!(axes.len(), 2);
        assert!(axes[0].dot(axes[1]).abs() < 1e-6);
    }
}

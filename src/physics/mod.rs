//! 挂绳物理系统模块
//!
//! 使用 Rapier3D 物理引擎实现，本模块只负责接线，积分与碰撞全部交给 Rapier。
//!
//! ## 对应关系
//! | 挂绳 | Rapier |
//! |------|--------|
//! | 物理世界 | PhysicsPipeline + RigidBodySet + ColliderSet + ImpulseJointSet |
//! | 锚点 | RigidBodyType::Fixed |
//! | 绳节点 / 吊环 / 卡套 / 卡片 | RigidBodyType::Dynamic |
//! | 拖拽中的卡片 | RigidBodyType::KinematicPositionBased |
//! | 绳段 | RopeJoint |
//! | 球铰 | SphericalJoint |
//! | 转轴 | RevoluteJoint |

mod body;
mod joint;
mod world;
pub mod config;

pub use body::{
    lanyard_bodies, rapier_to_quat, rapier_to_vec3, vec3_to_rapier, BandBodies, BodyKind,
    BodyRole, BodySpec, ColliderShape, ColliderSpec, BAND_ORIGIN,
};
pub use joint::{lanyard_joints, JointKind, JointSpec};
pub use world::PhysicsWorld;
pub use config::{PhysicsConfig, get_config, set_config, reset_config};

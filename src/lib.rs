//! Lanyard Engine - Rust 实现的挂绳工牌交互场景运行时
//!
//! 提供：
//! - Rapier3D 刚体链（锚点、三段绳、吊环、卡套、卡片）与关节装配
//! - 每帧绳带曲线平滑与 Catmull-Rom 采样
//! - 卡片扭转阻尼
//! - 指针拖拽（屏幕坐标 → 世界坐标）
//! - 场景描述（相机、灯光、网格节点）
//! - JNI 接口

pub mod band;
pub mod input;
pub mod jni_bridge;
pub mod physics;
pub mod scene;

pub use band::{Band, BandCurve, BandParams, CurveType, SmoothedPoint};
pub use input::{Cursor, DragController, DragState, PointerCapture, PointerEvent};
pub use physics::{BandBodies, BodyRole, JointSpec, PhysicsConfig, PhysicsWorld};
pub use scene::{Camera, FrameState, Scene, SceneDescription, Viewport};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LanyardError {
    #[error("Physics error: {0}")]
    Physics(String),

    #[error("Missing rigid body: {0:?}")]
    MissingBody(BodyRole),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Viewport error: {0}")]
    Viewport(String),

    #[error("JNI error: {0}")]
    Jni(String),
}

pub type Result<T> = std::result::Result<T, LanyardError>;

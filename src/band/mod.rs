//! 挂绳绳带适配层
//!
//! 每个物理 tick 之后：
//! 1. 平滑 Link1 / Link2 的位置
//! 2. 按 卡片端 → 锚点 的顺序写入四个控制点，重新采样绳带骨架
//! 3. 对卡片施加扭转阻尼，防止绕悬挂轴一直转

mod curve;
mod smoothing;

pub use curve::{BandCurve, CurveType};
pub use smoothing::{lerp_factor, speed_factor, SmoothedPoint};

use glam::Vec3;

use crate::physics::{BandBodies, BodyKind, BodyRole, PhysicsConfig, PhysicsWorld};
use crate::Result;

/// 绳带可调参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandParams {
    /// 平滑最低速度
    pub min_speed: f32,
    /// 平滑最高速度
    pub max_speed: f32,
    /// 距离夹取下限
    pub min_distance: f32,
    /// 距离夹取上限
    pub max_distance: f32,
    /// 曲线采样段数（输出 segments + 1 个点）
    pub curve_segments: usize,
    /// 扭转阻尼系数
    pub twist_damping: f32,
    pub curve_type: CurveType,
}

impl Default for BandParams {
    fn default() -> Self {
        Self {
            min_speed: 10.0,
            max_speed: 50.0,
            min_distance: 0.1,
            max_distance: 1.0,
            curve_segments: 20,
            twist_damping: 0.25,
            curve_type: CurveType::Chordal,
        }
    }
}

/// 扭转阻尼：角速度 Y 分量减去 `rotation_y * factor`，X/Z 不变
///
/// `rotation_y` 取卡片旋转四元数的 y 分量。
pub fn damp_twist(angvel: Vec3, rotation_y: f32, factor: f32) -> Vec3 {
    Vec3::new(angvel.x, angvel.y - rotation_y * factor, angvel.z)
}

/// 挂绳绳带
pub struct Band {
    bodies: BandBodies,
    params: BandParams,
    /// Link1、Link2 的平滑点
    smoothed: [SmoothedPoint; 2],
    curve: BandCurve,
    /// 采样后的绳带骨架（卡片端 → 锚点）
    points: Vec<Vec3>,
    dragging: bool,
}

impl Band {
    /// 在物理世界中创建刚体链与关节
    pub fn mount(world: &mut PhysicsWorld, config: &PhysicsConfig, params: BandParams) -> Self {
        let bodies = world.build_lanyard(config);
        Self {
            bodies,
            params,
            smoothed: [SmoothedPoint::new(); 2],
            curve: BandCurve::new(params.curve_type),
            points: Vec::with_capacity(params.curve_segments + 1),
            dragging: false,
        }
    }

    pub fn bodies(&self) -> &BandBodies {
        &self.bodies
    }

    pub fn params(&self) -> &BandParams {
        &self.params
    }

    /// 绳带骨架点
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn curve(&self) -> &BandCurve {
        &self.curve
    }

    /// 平滑点（Link1、Link2）
    pub fn smoothed(&self) -> [Option<Vec3>; 2] {
        [self.smoothed[0].get(), self.smoothed[1].get()]
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// 切换卡片拖拽状态：拖拽时卡片为运动学刚体，松开后恢复动态
    pub fn set_dragging(&mut self, world: &mut PhysicsWorld, dragging: bool) -> Result<()> {
        if self.dragging == dragging {
            return Ok(());
        }
        let kind = if dragging { BodyKind::KinematicPosition } else { BodyKind::Dynamic };
        world.set_body_kind(&self.bodies, BodyRole::Card, kind)?;
        self.dragging = dragging;
        Ok(())
    }

    /// 唤醒链条上会被拖动的刚体
    pub fn wake_chain(&self, world: &mut PhysicsWorld) -> Result<()> {
        world.wake_up(&self.bodies, &BodyRole::DRAG_WAKE)
    }

    /// 拖拽中：唤醒链条，把卡片的下一步位置设为 `target`
    pub fn drag_to(&self, world: &mut PhysicsWorld, target: Vec3) -> Result<()> {
        self.wake_chain(world)?;
        world.set_next_kinematic_translation(&self.bodies, BodyRole::Card, target)
    }

    /// 物理步进之后调用
    ///
    /// 绳带读取插值后的位置，扭转阻尼作用在真实角速度上。
    pub fn update(&mut self, world: &mut PhysicsWorld, delta_time: f32) -> Result<()> {
        let links = [BodyRole::Link1, BodyRole::Link2];
        let mut lerped = [Vec3::ZERO; 2];
        for (i, role) in links.into_iter().enumerate() {
            let target = world.interpolated_translation(&self.bodies, role)?;
            lerped[i] = self.smoothed[i].update(target, delta_time, &self.params);
        }

        self.curve.set_points([
            world.interpolated_translation(&self.bodies, BodyRole::Link3)?,
            lerped[1],
            lerped[0],
            world.interpolated_translation(&self.bodies, BodyRole::Anchor)?,
        ]);
        self.curve.sample_into(self.params.curve_segments, &mut self.points);

        let angvel = world.angvel(&self.bodies, BodyRole::Card)?;
        let rotation = world.rotation(&self.bodies, BodyRole::Card)?;
        world.set_angvel(
            &self.bodies,
            BodyRole::Card,
            damp_twist(angvel, rotation.y, self.params.twist_damping),
            false,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> (PhysicsWorld, Band) {
        let config = PhysicsConfig::default();
        let mut world = PhysicsWorld::with_config(&config).unwrap();
        let band = Band::mount(&mut world, &config, BandParams::default());
        (world, band)
    }

    #[test]
    fn test_damp_twist_example() {
        let out = damp_twist(Vec3::new(0.1, 2.0, -0.3), 4.0, 0.25);
        assert!((out - Vec3::new(0.1, 1.0, -0.3)).length() < 1e-6);
    }

    #[test]
    fn test_damp_twist_no_rotation_passthrough() {
        let v = Vec3::new(-1.0, 0.5, 2.0);
        assert_eq!(damp_twist(v, 0.0, 0.25), v);
    }

    #[test]
    fn test_first_update_initializes_smoothing() {
        let (mut world, mut band) = mounted();
        assert_eq!(band.smoothed(), [None, None]);
        band.update(&mut world, 1.0 / 60.0).unwrap();

        let link1 = world.translation(band.bodies(), BodyRole::Link1).unwrap();
        let link2 = world.translation(band.bodies(), BodyRole::Link2).unwrap();
        assert_eq!(band.smoothed(), [Some(link1), Some(link2)]);
    }

    #[test]
    fn test_curve_runs_from_card_side_to_anchor() {
        let (mut world, mut band) = mounted();
        for _ in 0..10 {
            world.step_once();
            band.update(&mut world, 1.0 / 60.0).unwrap();
        }

        let points = band.points();
        assert_eq!(points.len(), 21);
        let link3 = world.interpolated_translation(band.bodies(), BodyRole::Link3).unwrap();
        let anchor = world.interpolated_translation(band.bodies(), BodyRole::Anchor).unwrap();
        assert!(points[0].distance(link3) < 1e-4);
        assert!(points[20].distance(anchor) < 1e-4);
        assert!(points.iter().all(|p| p.is_finite()));

        let [s1, s2] = band.smoothed();
        assert_eq!(band.curve().points[1], s2.unwrap());
        assert_eq!(band.curve().points[2], s1.unwrap());
    }

    #[test]
    fn test_update_damps_card_twist() {
        let (mut world, mut band) = mounted();
        let bodies = *band.bodies();
        world.set_angvel(&bodies, BodyRole::Card, Vec3::new(0.1, 2.0, -0.3), true).unwrap();
        let rotation_y = world.rotation(&bodies, BodyRole::Card).unwrap().y;
        band.update(&mut world, 1.0 / 60.0).unwrap();

        let angvel = world.angvel(&bodies, BodyRole::Card).unwrap();
        assert!((angvel.y - (2.0 - rotation_y * 0.25)).abs() < 1e-5);
        assert!((angvel.x - 0.1).abs() < 1e-6);
        assert!((angvel.z + 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_set_dragging_switches_body_kind() {
        let (mut world, mut band) = mounted();
        let bodies = *band.bodies();

        band.set_dragging(&mut world, true).unwrap();
        assert!(world.body(&bodies, BodyRole::Card).unwrap().is_kinematic());
        assert!(band.is_dragging());

        band.set_dragging(&mut world, false).unwrap();
        assert!(world.body(&bodies, BodyRole::Card).unwrap().is_dynamic());
        assert!(!band.is_dragging());
    }
}

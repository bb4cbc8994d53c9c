//! 挂绳物理世界管理器
//!
//! 管理：
//! - Rapier PhysicsPipeline (物理流水线)
//! - RigidBodySet / ColliderSet (刚体与碰撞体集合)
//! - ImpulseJointSet (关节集合)
//! - QueryPipeline (指针拾取用的射线检测)

use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use std::num::NonZeroUsize;

use super::body::{
    lanyard_bodies, rapier_to_quat, rapier_to_vec3, vec3_to_point, vec3_to_rapier, BandBodies,
    BodyKind, BodyRole, BAND_ORIGIN,
};
use super::config::{get_config, PhysicsConfig};
use super::joint::{lanyard_joints, JointSpec};
use crate::{LanyardError, Result};

/// 物理世界
pub struct PhysicsWorld {
    /// 物理流水线
    pub physics_pipeline: PhysicsPipeline,
    /// 积分参数
    pub integration_parameters: IntegrationParameters,
    /// 岛管理器
    pub island_manager: IslandManager,
    /// 宽相检测
    pub broad_phase: DefaultBroadPhase,
    /// 窄相检测
    pub narrow_phase: NarrowPhase,
    /// 刚体集合
    pub rigid_body_set: RigidBodySet,
    /// 碰撞体集合
    pub collider_set: ColliderSet,
    /// 关节集合
    pub impulse_joint_set: ImpulseJointSet,
    /// 多体关节集合
    pub multibody_joint_set: MultibodyJointSet,
    /// CCD 求解器
    pub ccd_solver: CCDSolver,
    /// 射线查询
    pub query_pipeline: QueryPipeline,
    /// 重力向量
    pub gravity: Vector<Real>,
    /// 固定步长（秒）
    fixed_dt: f32,
    /// 每帧最大子步数
    max_substep_count: u32,
    /// 尚未消化的时间
    accumulator: f32,
    /// 是否在两次步进之间插值位姿
    interpolate: bool,
    /// 最近一次步进前的位姿
    previous_poses: Vec<(RigidBodyHandle, Isometry<Real>)>,
    /// 已创建的关节描述（与 impulse_joint_set 同序）
    joints: Vec<(JointSpec, ImpulseJointHandle)>,
    joints_enabled: bool,
    debug_log: bool,
}

impl PhysicsWorld {
    /// 使用全局配置创建物理世界
    pub fn new() -> Result<Self> {
        Self::with_config(&get_config())
    }

    /// 使用指定配置创建物理世界
    pub fn with_config(config: &PhysicsConfig) -> Result<Self> {
        config.validate()?;

        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.fixed_dt();
        if let Some(iterations) = NonZeroUsize::new(config.solver_iterations) {
            integration_parameters.num_solver_iterations = iterations;
        }
        integration_parameters.num_internal_pgs_iterations = config.pgs_iterations.max(1);

        if config.debug_log {
            log::info!(
                "[物理配置] FPS={}, 重力Y={}, 最大子步={}, 求解器迭代={}",
                config.physics_fps, config.gravity_y, config.max_substep_count, config.solver_iterations
            );
        }

        Ok(Self {
            physics_pipeline: PhysicsPipeline::new(),
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            gravity: vector![0.0, config.gravity_y, 0.0],
            fixed_dt: config.fixed_dt(),
            max_substep_count: config.max_substep_count,
            accumulator: 0.0,
            interpolate: config.interpolate,
            previous_poses: Vec::new(),
            joints: Vec::new(),
            joints_enabled: config.joints_enabled,
            debug_log: config.debug_log,
        })
    }

    /// 固定步长（秒）
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// 创建挂绳的七个刚体及其碰撞体，再按接线表挂上关节
    pub fn build_lanyard(&mut self, config: &PhysicsConfig) -> BandBodies {
        let mut handles = [RigidBodyHandle::invalid(); 7];

        for spec in lanyard_bodies() {
            let rb = spec.build_rigid_body(BAND_ORIGIN, config);
            let handle = self.rigid_body_set.insert(rb);
            for collider in &spec.colliders {
                self.collider_set.insert_with_parent(
                    collider.build_collider(),
                    handle,
                    &mut self.rigid_body_set,
                );
            }
            handles[spec.role.index()] = handle;
        }

        let bodies = BandBodies::new(handles);

        if self.joints_enabled {
            for spec in lanyard_joints(config.rope_length) {
                self.add_joint(&bodies, spec);
            }
        }

        // 让拾取在第一次 step 之前就可用
        self.query_pipeline.update(&self.collider_set);

        log::info!(
            "挂绳已创建: {} 个刚体, {} 个碰撞体, {} 个关节",
            self.rigid_body_set.len(),
            self.collider_set.len(),
            self.joints.len()
        );

        bodies
    }

    /// 添加一个关节
    pub fn add_joint(&mut self, bodies: &BandBodies, spec: JointSpec) -> ImpulseJointHandle {
        let handle = self.impulse_joint_set.insert(
            bodies.handle(spec.body_a),
            bodies.handle(spec.body_b),
            spec.build_joint(),
            true,
        );
        self.joints.push((spec, handle));
        handle
    }

    /// 已创建的关节
    pub fn joints(&self) -> impl Iterator<Item = &JointSpec> {
        self.joints.iter().map(|(spec, _)| spec)
    }

    /// 获取关节数量
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// 获取刚体数量
    pub fn rigid_body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// 推进物理模拟
    ///
    /// 固定步长累加器：每次消化一个 `fixed_dt`，
    /// 最多 `max_substep_count` 步，超出部分丢弃。
    ///
    /// 返回实际执行的步数。
    pub fn update(&mut self, delta_time: f32) -> u32 {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return 0;
        }

        self.accumulator += delta_time;
        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < self.max_substep_count {
            self.step_once();
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }

        if self.accumulator >= self.fixed_dt {
            if self.debug_log {
                log::debug!("物理步进落后，丢弃 {:.4}s", self.accumulator);
            }
            self.accumulator = 0.0;
        }

        steps
    }

    /// 插值系数：未消化时间占一个步长的比例
    pub fn interpolation_alpha(&self) -> f32 {
        if !self.interpolate {
            return 1.0;
        }
        (self.accumulator / self.fixed_dt).clamp(0.0, 1.0)
    }

    /// 执行一次物理步进
    pub fn step_once(&mut self) {
        self.previous_poses.clear();
        self.previous_poses
            .extend(self.rigid_body_set.iter().map(|(handle, rb)| (handle, *rb.position())));

        self.integration_parameters.dt = self.fixed_dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn body(&self, bodies: &BandBodies, role: BodyRole) -> Result<&RigidBody> {
        self.rigid_body_set
            .get(bodies.handle(role))
            .ok_or(LanyardError::MissingBody(role))
    }

    pub fn body_mut(&mut self, bodies: &BandBodies, role: BodyRole) -> Result<&mut RigidBody> {
        self.rigid_body_set
            .get_mut(bodies.handle(role))
            .ok_or(LanyardError::MissingBody(role))
    }

    /// 刚体当前位置
    pub fn translation(&self, bodies: &BandBodies, role: BodyRole) -> Result<Vec3> {
        Ok(rapier_to_vec3(self.body(bodies, role)?.translation()))
    }

    /// 刚体当前旋转
    pub fn rotation(&self, bodies: &BandBodies, role: BodyRole) -> Result<Quat> {
        Ok(rapier_to_quat(self.body(bodies, role)?.rotation()))
    }

    /// 刚体当前角速度
    pub fn angvel(&self, bodies: &BandBodies, role: BodyRole) -> Result<Vec3> {
        Ok(rapier_to_vec3(self.body(bodies, role)?.angvel()))
    }

    /// 插值后的位置（上一步位姿 → 当前位姿）
    pub fn interpolated_translation(&self, bodies: &BandBodies, role: BodyRole) -> Result<Vec3> {
        let current = self.translation(bodies, role)?;
        match self.previous_pose(bodies, role) {
            Some(prev) => Ok(rapier_to_vec3(&prev.translation.vector)
                .lerp(current, self.interpolation_alpha())),
            None => Ok(current),
        }
    }

    /// 插值后的旋转
    pub fn interpolated_rotation(&self, bodies: &BandBodies, role: BodyRole) -> Result<Quat> {
        let current = self.rotation(bodies, role)?;
        match self.previous_pose(bodies, role) {
            Some(prev) => Ok(rapier_to_quat(&prev.rotation)
                .slerp(current, self.interpolation_alpha())),
            None => Ok(current),
        }
    }

    fn previous_pose(&self, bodies: &BandBodies, role: BodyRole) -> Option<&Isometry<Real>> {
        if !self.interpolate {
            return None;
        }
        let target = bodies.handle(role);
        self.previous_poses
            .iter()
            .find(|(handle, _)| *handle == target)
            .map(|(_, pose)| pose)
    }

    /// 设置角速度
    ///
    /// `wake_up` 为 false 时不打断休眠，每帧写回阻尼时用这个。
    pub fn set_angvel(
        &mut self,
        bodies: &BandBodies,
        role: BodyRole,
        angvel: Vec3,
        wake_up: bool,
    ) -> Result<()> {
        self.body_mut(bodies, role)?.set_angvel(vec3_to_rapier(angvel), wake_up);
        Ok(())
    }

    /// 设置运动学刚体下一步的目标位置
    pub fn set_next_kinematic_translation(
        &mut self,
        bodies: &BandBodies,
        role: BodyRole,
        translation: Vec3,
    ) -> Result<()> {
        self.body_mut(bodies, role)?
            .set_next_kinematic_translation(vec3_to_rapier(translation));
        Ok(())
    }

    /// 切换刚体类型（仅在类型变化时生效）
    pub fn set_body_kind(&mut self, bodies: &BandBodies, role: BodyRole, kind: BodyKind) -> Result<()> {
        let body_type: RigidBodyType = kind.into();
        let rb = self.body_mut(bodies, role)?;
        if rb.body_type() != body_type {
            rb.set_body_type(body_type, true);
        }
        Ok(())
    }

    /// 唤醒刚体
    pub fn wake_up(&mut self, bodies: &BandBodies, roles: &[BodyRole]) -> Result<()> {
        for &role in roles {
            self.body_mut(bodies, role)?.wake_up(true);
        }
        Ok(())
    }

    /// 射线检测，只考虑挂在 `role` 刚体上的碰撞体
    ///
    /// 返回命中点（世界坐标）。
    pub fn cast_ray_at(
        &self,
        bodies: &BandBodies,
        role: BodyRole,
        origin: Vec3,
        direction: Vec3,
        max_toi: f32,
    ) -> Option<Vec3> {
        let target = bodies.handle(role);
        let predicate = |_handle: ColliderHandle, collider: &Collider| collider.parent() == Some(target);
        let filter = QueryFilter::default().predicate(&predicate);
        let ray = Ray::new(vec3_to_point(origin), vec3_to_rapier(direction));

        self.query_pipeline
            .cast_ray(&self.rigid_body_set, &self.collider_set, &ray, max_toi, true, filter)
            .map(|(_, toi)| origin + direction * toi)
    }
}

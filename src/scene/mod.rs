//! 场景组装与每帧驱动
//!
//! 宿主循环每帧调用一次 [`Scene::tick`]：
//! 1. 消化上一帧积累的指针状态（切换卡片刚体类型、设置拖拽目标）
//! 2. 物理步进
//! 3. 绳带更新
//! 4. 刷新给渲染端的平铺缓冲区

mod camera;
mod description;

pub use camera::{Camera, Viewport};
pub use description::{
    AssetManifest, BandLineStyle, Color, Light, MaterialOverride, MeshNode, SceneDescription,
    BAND_TEXTURE_URL, CARD_MODEL_PATH,
};

use glam::{Vec2, Vec3};

use crate::band::{Band, BandParams};
use crate::input::{Cursor, DragController, PointerCapture, PointerEvent};
use crate::physics::{get_config, BodyRole, PhysicsConfig, PhysicsWorld};
use crate::Result;

/// 每个刚体的变换占用的 float 数（xyz + 四元数 xyzw）
pub const BODY_TRANSFORM_FLOATS: usize = 7;

/// 每帧输出（JNI/渲染用平铺缓冲区）
#[derive(Debug, Clone, Default)]
pub struct FrameState {
    /// 绳带骨架，每点 xyz
    pub band_points_raw: Vec<f32>,
    /// 按 BodyRole 顺序，每个刚体 xyz + xyzw（两次步进之间插值）
    pub body_transforms_raw: Vec<f32>,
}

impl FrameState {
    fn refresh(&mut self, world: &PhysicsWorld, band: &Band) -> Result<()> {
        self.band_points_raw.clear();
        for p in band.points() {
            self.band_points_raw.extend_from_slice(&[p.x, p.y, p.z]);
        }

        self.body_transforms_raw.clear();
        for role in BodyRole::ALL {
            let t = world.interpolated_translation(band.bodies(), role)?;
            let r = world.interpolated_rotation(band.bodies(), role)?;
            self.body_transforms_raw.extend_from_slice(&[t.x, t.y, t.z, r.x, r.y, r.z, r.w]);
        }
        Ok(())
    }

    pub fn band_point_count(&self) -> usize {
        self.band_points_raw.len() / 3
    }
}

/// 本地记录的指针捕获状态，宿主按需查询
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureState {
    pub captured: Option<i32>,
}

impl PointerCapture for CaptureState {
    fn set_pointer_capture(&mut self, pointer_id: i32) {
        self.captured = Some(pointer_id);
    }

    fn release_pointer_capture(&mut self, pointer_id: i32) {
        if self.captured == Some(pointer_id) {
            self.captured = None;
        }
    }
}

/// 挂绳场景
pub struct Scene {
    description: SceneDescription,
    viewport: Viewport,
    world: PhysicsWorld,
    band: Band,
    controller: DragController,
    capture: CaptureState,
    frame: FrameState,
    debug_log: bool,
}

impl Scene {
    /// 使用全局物理配置与默认绳带参数创建场景
    pub fn new(width: f32, height: f32) -> Result<Self> {
        Self::with_config(&get_config(), BandParams::default(), Viewport::new(width, height)?)
    }

    pub fn with_config(config: &PhysicsConfig, params: BandParams, viewport: Viewport) -> Result<Self> {
        let mut world = PhysicsWorld::with_config(config)?;
        let band = Band::mount(&mut world, config, params);
        let mut scene = Self {
            description: SceneDescription::new(viewport),
            viewport,
            world,
            band,
            controller: DragController::new(),
            capture: CaptureState::default(),
            frame: FrameState::default(),
            debug_log: config.debug_log,
        };
        scene.frame.refresh(&scene.world, &scene.band)?;
        Ok(scene)
    }

    pub fn description(&self) -> &SceneDescription {
        &self.description
    }

    pub fn camera(&self) -> &Camera {
        &self.description.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn band(&self) -> &Band {
        &self.band
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    pub fn cursor(&self) -> Cursor {
        self.controller.cursor()
    }

    pub fn captured_pointer(&self) -> Option<i32> {
        self.capture.captured
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.viewport = Viewport::new(width, height)?;
        self.description.resize(self.viewport);
        Ok(())
    }

    pub fn pointer_over(&mut self) {
        self.controller.pointer_over();
    }

    pub fn pointer_out(&mut self) {
        self.controller.pointer_out();
    }

    /// 指针移动（NDC）
    pub fn pointer_move(&mut self, ndc: Vec2) {
        self.controller.pointer_move(ndc);
    }

    /// 指针移动（像素），同时用射线检测更新悬停状态
    pub fn pointer_move_px(&mut self, x: f32, y: f32) {
        let ndc = self.viewport.to_ndc(x, y);
        self.controller.pointer_move(ndc);
        if self.pick_card(ndc).is_some() {
            self.controller.pointer_over();
        } else {
            self.controller.pointer_out();
        }
    }

    /// 相机射线与卡片的命中点
    pub fn pick_card(&self, ndc: Vec2) -> Option<Vec3> {
        let camera = self.camera();
        let (origin, direction) = camera.ray(ndc);
        self.world
            .cast_ray_at(self.band.bodies(), BodyRole::Card, origin, direction, camera.far)
    }

    /// 在卡片上按下（命中点由宿主给出）
    ///
    /// 返回是否开始拖拽，已在拖拽中时忽略。
    pub fn pointer_down(&mut self, event: PointerEvent) -> Result<bool> {
        let card = self.world.translation(self.band.bodies(), BodyRole::Card)?;
        if !self.controller.pointer_down(event, card, &mut self.capture) {
            return Ok(false);
        }
        self.band.wake_chain(&mut self.world)?;

        if self.debug_log {
            log::debug!(
                "开始拖拽: pointer={}, offset={:?}",
                event.pointer_id,
                self.controller.state().offset()
            );
        }
        Ok(true)
    }

    /// 按下（像素），先做射线检测，没点中卡片则忽略
    ///
    /// 返回是否开始拖拽。
    pub fn pointer_down_px(&mut self, pointer_id: i32, x: f32, y: f32) -> Result<bool> {
        let ndc = self.viewport.to_ndc(x, y);
        self.controller.pointer_move(ndc);
        match self.pick_card(ndc) {
            Some(point) => {
                self.controller.pointer_over();
                self.pointer_down(PointerEvent { pointer_id, point })
            }
            None => Ok(false),
        }
    }

    pub fn pointer_up(&mut self, pointer_id: i32) {
        if self.debug_log && self.controller.is_dragging() {
            log::debug!("结束拖拽: pointer={}", pointer_id);
        }
        self.controller.pointer_up(pointer_id, &mut self.capture);
    }

    /// 推进一帧
    pub fn tick(&mut self, delta_time: f32) -> Result<()> {
        self.band.set_dragging(&mut self.world, self.controller.is_dragging())?;

        let pointer_world = self.camera().drag_target(self.controller.pointer());
        if let Some(target) = self.controller.card_target(pointer_world) {
            self.band.drag_to(&mut self.world, target)?;
        }

        self.world.update(delta_time);
        self.band.update(&mut self.world, delta_time)?;
        self.frame.refresh(&self.world, &self.band)
    }

    /// 卸载：释放捕获，光标复位
    pub fn unmount(&mut self) {
        self.controller.reset(&mut self.capture);
    }
}

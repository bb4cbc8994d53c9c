//! 场景描述
//!
//! 一次性构建，每帧连同 [`super::FrameState`] 交给渲染端。
//! 网格节点只引用模型文件里的节点名，几何与贴图加载由宿主负责。

use glam::{Vec2, Vec3};

use super::camera::{Camera, Viewport};
use crate::physics::BodyRole;

/// 模型文件
pub const CARD_MODEL_PATH: &str = "./cardtestglb.glb";

/// 绳带贴图（已声明，目前未绑定到材质）
pub const BAND_TEXTURE_URL: &str = "https://assets.vercel.com/image/upload/contentful/image/e5382hct74si/SOT1hmCesOHxEYxL7vkoZ/c57b29c85912047c414311723320c16b/band.jpg";

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32);

impl Color {
    pub const WHITE: Color = Color(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color(0.0, 0.0, 0.0);
}

/// 灯光
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { intensity: f32, color: Color },
    Directional { intensity: f32, color: Color, position: Vec3 },
}

/// 材质覆盖（在模型自带材质上修改）
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialOverride {
    /// 模型中的材质名
    pub material: &'static str,
    pub color: Option<Color>,
    pub roughness: f32,
    pub metalness: f32,
    /// 只借用材质的贴图，其余参数由本结构决定
    pub map_only: bool,
}

/// 网格节点：挂在某个刚体上
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub body: BodyRole,
    /// 模型中的几何节点名
    pub geometry: &'static str,
    pub material: MaterialOverride,
    /// 组变换（相对刚体）
    pub group_position: Vec3,
    pub group_scale: f32,
    /// 网格变换（相对组）
    pub position: Vec3,
    /// 欧拉角（弧度）
    pub rotation: Vec3,
}

/// 绳带线材质
#[derive(Debug, Clone, PartialEq)]
pub struct BandLineStyle {
    pub color: Color,
    pub depth_test: bool,
    /// 等于视口像素尺寸
    pub resolution: Vec2,
    pub repeat: Vec2,
    pub line_width: f32,
    /// 绑定的贴图（None = 纯色）
    pub texture: Option<&'static str>,
}

impl BandLineStyle {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            color: Color::BLACK,
            depth_test: false,
            resolution: Vec2::new(viewport.width, viewport.height),
            repeat: Vec2::new(-3.0, 1.0),
            line_width: 1.0,
            texture: None,
        }
    }
}

/// 外部资源清单
#[derive(Debug, Clone, PartialEq)]
pub struct AssetManifest {
    pub model: &'static str,
    /// 重复平铺的绳带贴图
    pub band_texture: &'static str,
}

/// 整个场景的静态描述
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub meshes: Vec<MeshNode>,
    pub band_line: BandLineStyle,
    pub assets: AssetManifest,
}

impl SceneDescription {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            camera: Camera { aspect: viewport.aspect(), ..Camera::default() },
            lights: default_lights(),
            meshes: lanyard_meshes(),
            band_line: BandLineStyle::new(viewport),
            assets: AssetManifest { model: CARD_MODEL_PATH, band_texture: BAND_TEXTURE_URL },
        }
    }

    /// 视口变化：更新相机宽高比和绳带分辨率
    pub fn resize(&mut self, viewport: Viewport) {
        self.camera.aspect = viewport.aspect();
        self.band_line.resolution = Vec2::new(viewport.width, viewport.height);
    }
}

fn default_lights() -> Vec<Light> {
    vec![
        Light::Ambient { intensity: std::f32::consts::PI, color: Color::WHITE },
        Light::Directional {
            intensity: 10.0,
            color: Color::WHITE,
            position: Vec3::new(-5.0, 0.0, 5.0),
        },
        Light::Directional {
            intensity: 10.0,
            color: Color::WHITE,
            position: Vec3::new(0.0, 1.0, 5.0),
        },
    ]
}

fn lanyard_meshes() -> Vec<MeshNode> {
    use std::f32::consts::FRAC_PI_2;

    let quarter_turn = Vec3::new(0.0, FRAC_PI_2, 0.0);

    vec![
        MeshNode {
            body: BodyRole::Ring,
            geometry: "RING",
            material: MaterialOverride {
                material: "ringMat",
                color: Some(Color::BLACK),
                roughness: 0.3,
                metalness: 0.9,
                map_only: false,
            },
            group_position: Vec3::ZERO,
            group_scale: 1.25,
            position: Vec3::ZERO,
            rotation: quarter_turn,
        },
        MeshNode {
            body: BodyRole::Holder,
            geometry: "CARDHOLDER",
            material: MaterialOverride {
                material: "cardholderMat",
                color: Some(Color::BLACK),
                roughness: 0.1,
                metalness: 1.0,
                map_only: false,
            },
            group_position: Vec3::ZERO,
            group_scale: 1.25,
            position: Vec3::ZERO,
            rotation: quarter_turn,
        },
        MeshNode {
            body: BodyRole::Holder,
            geometry: "SCREW",
            material: MaterialOverride {
                material: "screwMat",
                color: Some(Color::WHITE),
                roughness: 0.1,
                metalness: 1.0,
                map_only: false,
            },
            group_position: Vec3::ZERO,
            group_scale: 1.25,
            position: Vec3::new(0.0, -0.138, 0.0),
            rotation: quarter_turn,
        },
        MeshNode {
            body: BodyRole::Card,
            geometry: "CARD",
            material: MaterialOverride {
                material: "cardMat",
                color: None,
                roughness: 0.15,
                metalness: 0.3,
                map_only: true,
            },
            group_position: Vec3::new(0.0, -0.125, 0.0),
            group_scale: 1.25,
            position: Vec3::ZERO,
            rotation: Vec3::new(0.0, 3.0 * FRAC_PI_2, 0.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_description() {
        let viewport = Viewport::new(1280.0, 720.0).unwrap();
        let desc = SceneDescription::new(viewport);

        assert_eq!(desc.camera.position, Vec3::new(0.0, 0.0, 13.0));
        assert_eq!(desc.camera.fov, 25.0);
        assert!((desc.camera.aspect - 1280.0 / 720.0).abs() < 1e-6);

        assert_eq!(desc.lights.len(), 3);
        let directional = desc
            .lights
            .iter()
            .filter(|l| matches!(l, Light::Directional { .. }))
            .count();
        assert_eq!(directional, 2);

        let names: Vec<_> = desc.meshes.iter().map(|m| m.geometry).collect();
        assert_eq!(names, vec!["RING", "CARDHOLDER", "SCREW", "CARD"]);

        assert!(!desc.band_line.depth_test);
        assert_eq!(desc.band_line.repeat, Vec2::new(-3.0, 1.0));
        assert!(desc.band_line.texture.is_none());
    }

    #[test]
    fn test_resize_updates_camera_and_line() {
        let mut desc = SceneDescription::new(Viewport::new(800.0, 600.0).unwrap());
        desc.resize(Viewport::new(600.0, 600.0).unwrap());
        assert!((desc.camera.aspect - 1.0).abs() < 1e-6);
        assert_eq!(desc.band_line.resolution, Vec2::new(600.0, 600.0));
    }
}

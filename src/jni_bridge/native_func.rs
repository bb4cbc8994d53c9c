//! JNI 原生函数实现
//!
//! 使用标准 jni 0.21 API。坐标参数均为像素，左上角为原点。

use jni::objects::{JByteBuffer, JClass};
use jni::sys::{jboolean, jfloat, jint, jlong, jstring, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use std::ptr;

use glam::Vec3;

use crate::input::PointerEvent;
use crate::scene::Scene;

use super::{register_scene, unregister_scene, with_scene};

const VERSION: &str = "Rust-20261019";

// ============================================================================
// 基础函数
// ============================================================================

/// 获取版本号
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_GetVersion(
    env: JNIEnv,
    _class: JClass,
) -> jstring {
    match env.new_string(VERSION) {
        Ok(s) => s.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// 把 f32 数组复制到 direct ByteBuffer，返回写入的 float 数
fn copy_floats_to_buffer(env: &JNIEnv, buffer: &JByteBuffer, data: &[f32]) -> jint {
    if data.is_empty() {
        return 0;
    }

    let required = data.len() * std::mem::size_of::<f32>();
    match env.get_direct_buffer_capacity(buffer) {
        Ok(capacity) if capacity >= required => {}
        Ok(capacity) => {
            log::warn!("缓冲区容量不足: {} < {}", capacity, required);
            return 0;
        }
        Err(e) => {
            log::error!("Failed to query buffer capacity: {}", e);
            return 0;
        }
    }

    match env.get_direct_buffer_address(buffer) {
        Ok(dst) => {
            unsafe {
                ptr::copy_nonoverlapping(data.as_ptr() as *const u8, dst, required);
            }
            data.len() as jint
        }
        Err(e) => {
            log::error!("Failed to get buffer address: {}", e);
            0
        }
    }
}

fn to_jboolean(value: bool) -> jboolean {
    if value {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

// ============================================================================
// 场景生命周期
// ============================================================================

/// 创建场景，失败返回 0
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_CreateScene(
    _env: JNIEnv,
    _class: JClass,
    width: jfloat,
    height: jfloat,
) -> jlong {
    match Scene::new(width, height) {
        Ok(scene) => register_scene(scene),
        Err(e) => {
            log::error!("Failed to create scene: {}", e);
            0
        }
    }
}

/// 删除场景（先卸载，复位光标与指针捕获）
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_DeleteScene(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
) {
    if with_scene(scene, |s| s.unmount()).is_ok() {
        unregister_scene(scene);
    }
}

/// 视口尺寸变化
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_Resize(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
    width: jfloat,
    height: jfloat,
) -> jboolean {
    match with_scene(scene, |s| s.resize(width, height)) {
        Ok(Ok(())) => JNI_TRUE,
        Ok(Err(e)) | Err(e) => {
            log::error!("Failed to resize scene: {}", e);
            JNI_FALSE
        }
    }
}

/// 推进一帧
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_Tick(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
    delta_time: jfloat,
) -> jboolean {
    match with_scene(scene, |s| s.tick(delta_time)) {
        Ok(Ok(())) => JNI_TRUE,
        Ok(Err(e)) | Err(e) => {
            log::error!("Failed to tick scene: {}", e);
            JNI_FALSE
        }
    }
}

// ============================================================================
// 指针事件
// ============================================================================

/// 指针进入卡片
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_PointerOver(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
) {
    let _ = with_scene(scene, |s| s.pointer_over());
}

/// 指针离开卡片
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_PointerOut(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
) {
    let _ = with_scene(scene, |s| s.pointer_out());
}

/// 指针移动（同时更新悬停状态）
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_PointerMove(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
    x: jfloat,
    y: jfloat,
) {
    let _ = with_scene(scene, |s| s.pointer_move_px(x, y));
}

/// 按下：由本地射线检测判断是否点中卡片
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_PointerDown(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
    pointer_id: jint,
    x: jfloat,
    y: jfloat,
) -> jboolean {
    match with_scene(scene, |s| s.pointer_down_px(pointer_id, x, y)) {
        Ok(Ok(started)) => to_jboolean(started),
        Ok(Err(e)) | Err(e) => {
            log::error!("Failed to handle pointer down: {}", e);
            JNI_FALSE
        }
    }
}

/// 按下：命中点由宿主的射线检测给出（世界坐标）
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_PointerDownAt(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
    pointer_id: jint,
    hit_x: jfloat,
    hit_y: jfloat,
    hit_z: jfloat,
) -> jboolean {
    let event = PointerEvent { pointer_id, point: Vec3::new(hit_x, hit_y, hit_z) };
    match with_scene(scene, |s| s.pointer_down(event)) {
        Ok(Ok(started)) => to_jboolean(started),
        Ok(Err(e)) | Err(e) => {
            log::error!("Failed to handle pointer down: {}", e);
            JNI_FALSE
        }
    }
}

/// 松开
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_PointerUp(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
    pointer_id: jint,
) {
    let _ = with_scene(scene, |s| s.pointer_up(pointer_id));
}

/// 光标提示：0 = auto, 1 = grab, 2 = grabbing
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_GetCursor(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
) -> jint {
    with_scene(scene, |s| s.cursor().code()).unwrap_or(0)
}

/// 当前被捕获的指针 ID，没有则返回 -1
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_GetCapturedPointer(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
) -> jint {
    with_scene(scene, |s| s.captured_pointer().unwrap_or(-1)).unwrap_or(-1)
}

// ============================================================================
// 帧数据
// ============================================================================

/// 绳带骨架点数
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_GetBandPointCount(
    _env: JNIEnv,
    _class: JClass,
    scene: jlong,
) -> jint {
    with_scene(scene, |s| s.frame().band_point_count() as jint).unwrap_or(0)
}

/// 复制绳带骨架到 ByteBuffer（每点 xyz），返回 float 数
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_CopyBandPointsToBuffer(
    env: JNIEnv,
    _class: JClass,
    scene: jlong,
    buffer: JByteBuffer,
) -> jint {
    with_scene(scene, |s| copy_floats_to_buffer(&env, &buffer, &s.frame().band_points_raw))
        .unwrap_or(0)
}

/// 复制刚体变换到 ByteBuffer（每个刚体 xyz + 四元数 xyzw），返回 float 数
#[no_mangle]
pub extern "system" fn Java_com_shiroha_lanyard_NativeFunc_CopyBodyTransformsToBuffer(
    env: JNIEnv,
    _class: JClass,
    scene: jlong,
    buffer: JByteBuffer,
) -> jint {
    with_scene(scene, |s| copy_floats_to_buffer(&env, &buffer, &s.frame().body_transforms_raw))
        .unwrap_or(0)
}

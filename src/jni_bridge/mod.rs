//! JNI 绑定层 - 与 Java 代码交互

mod native_func;

pub use native_func::*;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use once_cell::sync::Lazy;

use crate::scene::Scene;
use crate::{LanyardError, Result};

/// 全局场景存储
pub static SCENES: Lazy<RwLock<HashMap<i64, Arc<Mutex<Scene>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 生成唯一句柄 ID
fn next_handle_id() -> i64 {
    use std::sync::atomic::{AtomicI64, Ordering};
    static COUNTER: AtomicI64 = AtomicI64::new(1);
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// 注册场景并返回句柄
pub fn register_scene(scene: Scene) -> i64 {
    let id = next_handle_id();
    let mut scenes = SCENES.write().unwrap_or_else(|e| e.into_inner());
    scenes.insert(id, Arc::new(Mutex::new(scene)));
    id
}

/// 移除场景，返回是否存在
pub fn unregister_scene(id: i64) -> bool {
    let mut scenes = SCENES.write().unwrap_or_else(|e| e.into_inner());
    scenes.remove(&id).is_some()
}

/// 在句柄对应的场景上执行操作
pub fn with_scene<R>(id: i64, f: impl FnOnce(&mut Scene) -> R) -> Result<R> {
    let scene = {
        let scenes = SCENES.read().unwrap_or_else(|e| e.into_inner());
        scenes
            .get(&id)
            .cloned()
            .ok_or_else(|| LanyardError::Jni(format!("unknown scene handle {}", id)))?
    };
    let mut guard = scene.lock().unwrap_or_else(|e| e.into_inner());
    Ok(f(&mut guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_remove() {
        let scene = Scene::new(640.0, 480.0).unwrap();
        let id = register_scene(scene);
        assert!(id > 0);

        let count = with_scene(id, |scene| {
            scene.tick(1.0 / 60.0).unwrap();
            scene.frame().band_point_count()
        })
        .unwrap();
        assert_eq!(count, 21);

        assert!(unregister_scene(id));
        assert!(!unregister_scene(id));
        assert!(matches!(with_scene(id, |_| ()), Err(LanyardError::Jni(_))));
    }
}

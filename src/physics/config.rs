//! 挂绳物理配置
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。

use once_cell::sync::Lazy;
use std::sync::RwLock;

use crate::{LanyardError, Result};

/// 物理配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    // ========== 重力 ==========
    /// 重力 Y 分量（负数向下），默认 -40.0
    pub gravity_y: f32,

    // ========== 模拟参数 ==========
    /// 物理 FPS（固定步长 = 1 / physics_fps），默认 60.0
    pub physics_fps: f32,
    /// 每帧最大子步数，默认 4
    pub max_substep_count: u32,
    /// 求解器迭代次数，默认 4
    pub solver_iterations: usize,
    /// 内部 PGS 迭代次数，默认 1
    pub pgs_iterations: usize,
    /// 输出位姿是否在两次步进之间插值，默认 true
    pub interpolate: bool,

    // ========== 刚体 ==========
    /// 链上所有刚体的线性阻尼，默认 2.0
    pub linear_damping: f32,
    /// 链上所有刚体的角阻尼，默认 2.0
    pub angular_damping: f32,
    /// 是否允许休眠，默认 true
    pub can_sleep: bool,

    // ========== 绳段 ==========
    /// 绳索关节的最大长度，默认 1.0
    pub rope_length: f32,

    // ========== 调试 ==========
    /// 是否启用关节，默认 true
    pub joints_enabled: bool,
    /// 是否输出调试日志，默认 false
    pub debug_log: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            // ====== 重力 ======
            // 比真实重力大很多，卡片下落更"干脆"
            gravity_y: -40.0,

            // ====== 模拟参数 ======
            physics_fps: 60.0,
            // 掉帧时最多补几步，超出部分直接丢弃
            max_substep_count: 4,
            solver_iterations: 4,
            pgs_iterations: 1,
            // 宿主帧率与物理帧率不一致时避免画面卡顿
            interpolate: true,

            // ====== 刚体 ======
            linear_damping: 2.0,
            angular_damping: 2.0,
            can_sleep: true,

            // ====== 绳段 ======
            rope_length: 1.0,

            // ====== 调试 ======
            // 关闭后链条会散开（用于调试）
            joints_enabled: true,
            debug_log: false,
        }
    }
}

impl PhysicsConfig {
    /// 固定时间步长（秒）
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.physics_fps
    }

    /// 检查配置是否可用于构建物理世界
    pub fn validate(&self) -> Result<()> {
        if !self.physics_fps.is_finite() || self.physics_fps <= 0.0 {
            return Err(LanyardError::Config(format!(
                "physics_fps must be positive, got {}",
                self.physics_fps
            )));
        }
        if self.max_substep_count == 0 {
            return Err(LanyardError::Config("max_substep_count must be at least 1".into()));
        }
        if !self.rope_length.is_finite() || self.rope_length <= 0.0 {
            return Err(LanyardError::Config(format!(
                "rope_length must be positive, got {}",
                self.rope_length
            )));
        }
        Ok(())
    }
}

/// 全局配置实例
static PHYSICS_CONFIG: Lazy<RwLock<PhysicsConfig>> = Lazy::new(|| {
    RwLock::new(PhysicsConfig::default())
});

/// 获取当前配置（只读）
pub fn get_config() -> PhysicsConfig {
    match PHYSICS_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// 手动设置配置（用于运行时调试）
pub fn set_config(config: PhysicsConfig) {
    match PHYSICS_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// 重置为默认配置
pub fn reset_config() {
    set_config(PhysicsConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.fixed_dt() - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(config.gravity_y, -40.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PhysicsConfig::default();
        config.physics_fps = 0.0;
        assert!(matches!(config.validate(), Err(LanyardError::Config(_))));

        let mut config = PhysicsConfig::default();
        config.max_substep_count = 0;
        assert!(config.validate().is_err());

        let mut config = PhysicsConfig::default();
        config.rope_length = -1.0;
        assert!(config.validate().is_err());
    }
}

//! 绳节点位置平滑
//!
//! 物理求解器给出的节点位置会抖动，绳带直接用它会闪。
//! 这里对每个节点维护一个平滑点，按距离自适应地向真实位置插值：
//! 距离越大插值越快，距离很小时保持最低速度。

use glam::Vec3;

use super::BandParams;

/// 把平滑点与真实位置的距离夹到 `[min_distance, max_distance]`
pub fn speed_factor(distance: f32, params: &BandParams) -> f32 {
    distance.max(params.min_distance).min(params.max_distance)
}

/// 本帧的插值系数：`dt * (min_speed + clamped * (max_speed - min_speed))`
pub fn lerp_factor(distance: f32, delta_time: f32, params: &BandParams) -> f32 {
    let clamped = speed_factor(distance, params);
    delta_time * (params.min_speed + clamped * (params.max_speed - params.min_speed))
}

/// 单个节点的平滑点（首次更新时惰性创建）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothedPoint {
    position: Option<Vec3>,
}

impl SmoothedPoint {
    pub fn new() -> Self {
        Self { position: None }
    }

    /// 当前平滑位置（尚未初始化时为 None）
    pub fn get(&self) -> Option<Vec3> {
        self.position
    }

    /// 向真实位置推进一帧，返回新的平滑位置
    pub fn update(&mut self, target: Vec3, delta_time: f32, params: &BandParams) -> Vec3 {
        let current = *self.position.get_or_insert(target);
        let t = lerp_factor(current.distance(target), delta_time.max(0.0), params);
        let next = current.lerp(target, t);
        self.position = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_speed_factor_clamps() {
        let params = BandParams::default();
        assert!((speed_factor(0.0, &params) - 0.1).abs() < EPS);
        assert!((speed_factor(0.05, &params) - 0.1).abs() < EPS);
        assert!((speed_factor(0.5, &params) - 0.5).abs() < EPS);
        assert!((speed_factor(1.0, &params) - 1.0).abs() < EPS);
        assert!((speed_factor(5.0, &params) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_lerp_factor_bounds() {
        let params = BandParams::default();
        let dt = 1.0 / 60.0;
        // 下限 10 + 0.1 * 40 = 14，上限 50
        assert!((lerp_factor(0.0, dt, &params) - 14.0 * dt).abs() < EPS);
        assert!((lerp_factor(100.0, dt, &params) - 50.0 * dt).abs() < EPS);
        for d in [0.0, 0.05, 0.3, 1.0, 5.0] {
            let t = lerp_factor(d, dt, &params);
            assert!(t >= 10.0 * dt - EPS && t <= 50.0 * dt + EPS);
        }
    }

    #[test]
    fn test_first_update_snaps_to_target() {
        let params = BandParams::default();
        let mut point = SmoothedPoint::new();
        assert!(point.get().is_none());
        let target = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(point.update(target, 1.0 / 60.0, &params), target);
        assert_eq!(point.get(), Some(target));
    }

    #[test]
    fn test_moves_toward_target_without_overshoot() {
        let params = BandParams::default();
        let mut point = SmoothedPoint::new();
        point.update(Vec3::ZERO, 1.0 / 60.0, &params);

        let target = Vec3::new(3.0, -1.0, 0.5);
        let mut last_distance = target.length();
        for _ in 0..120 {
            let p = point.update(target, 1.0 / 60.0, &params);
            let distance = p.distance(target);
            assert!(distance <= last_distance + EPS);
            // 始终在起点与目标之间的线段上
            assert!(p.dot(target) >= -EPS && p.length() <= target.length() + EPS);
            last_distance = distance;
        }
        assert!(last_distance < 1e-3);
    }

    #[test]
    fn test_zero_dt_holds_position() {
        let params = BandParams::default();
        let mut point = SmoothedPoint::new();
        point.update(Vec3::ZERO, 0.0, &params);
        let p = point.update(Vec3::ONE, 0.0, &params);
        assert_eq!(p, Vec3::ZERO);
    }
}

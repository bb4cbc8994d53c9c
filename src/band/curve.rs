//! Catmull-Rom 样条（绳带骨架）
//!
//! 非闭合曲线，首尾各外插一个虚拟控制点。
//! 参数化方式：
//! - Chordal：段长 = 弦长
//! - Centripetal：段长 = 弦长的平方根
//! - Uniform：均匀参数 + 张力

use glam::Vec3;

/// 样条参数化类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveType {
    Chordal,
    Centripetal,
    Uniform { tension: f32 },
}

impl CurveType {
    /// 作用在距离平方上的指数
    fn exponent(self) -> Option<f32> {
        match self {
            CurveType::Chordal => Some(0.5),
            CurveType::Centripetal => Some(0.25),
            CurveType::Uniform { .. } => None,
        }
    }
}

/// 三次多项式 c0 + c1 t + c2 t² + c3 t³（Hermite 形式）
#[derive(Debug, Clone, Copy)]
struct Cubic {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Cubic {
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, tension: f32) -> Self {
        Self::hermite(p1, p2, tension * (p2 - p0), tension * (p3 - p1))
    }

    /// 非均匀 Catmull-Rom，切线按段长重新缩放到 [0, 1]
    fn nonuniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;
        Self::hermite(p1, p2, t1, t2)
    }

    fn eval(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }
}

/// 绳带曲线：固定四个控制点，每帧覆盖写入
#[derive(Debug, Clone, PartialEq)]
pub struct BandCurve {
    pub points: [Vec3; 4],
    pub curve_type: CurveType,
}

impl BandCurve {
    pub fn new(curve_type: CurveType) -> Self {
        Self { points: [Vec3::ZERO; 4], curve_type }
    }

    /// 覆盖全部控制点
    pub fn set_points(&mut self, points: [Vec3; 4]) {
        self.points = points;
    }

    /// 在参数 t ∈ [0, 1] 处求值
    pub fn point_at(&self, t: f32) -> Vec3 {
        let points = &self.points;
        let l = points.len();

        let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f32;

        if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.0;
        }

        let p1 = points[int_point];
        let p2 = points[int_point + 1];
        let p0 = if int_point > 0 {
            points[int_point - 1]
        } else {
            // 外插首点
            2.0 * points[0] - points[1]
        };
        let p3 = if int_point + 2 < l {
            points[int_point + 2]
        } else {
            // 外插尾点
            2.0 * points[l - 1] - points[l - 2]
        };

        let cubic = match self.curve_type.exponent() {
            Some(pow) => {
                let mut dt0 = p0.distance_squared(p1).powf(pow);
                let mut dt1 = p1.distance_squared(p2).powf(pow);
                let mut dt2 = p2.distance_squared(p3).powf(pow);

                // 重合点
                if dt1 < 1e-4 {
                    dt1 = 1.0;
                }
                if dt0 < 1e-4 {
                    dt0 = dt1;
                }
                if dt2 < 1e-4 {
                    dt2 = dt1;
                }

                Cubic::nonuniform(p0, p1, p2, p3, dt0, dt1, dt2)
            }
            None => {
                let tension = match self.curve_type {
                    CurveType::Uniform { tension } => tension,
                    _ => 0.5,
                };
                Cubic::uniform(p0, p1, p2, p3, tension)
            }
        };

        cubic.eval(weight)
    }

    /// 均匀参数采样：`segments` 段，返回 `segments + 1` 个点（含首尾）
    pub fn sample(&self, segments: usize) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(segments + 1);
        self.sample_into(segments, &mut out);
        out
    }

    /// 采样到已有缓冲区（复用内存）
    pub fn sample_into(&self, segments: usize, out: &mut Vec<Vec3>) {
        out.clear();
        let segments = segments.max(1);
        for d in 0..=segments {
            out.push(self.point_at(d as f32 / segments as f32));
        }
    }
}

impl Default for BandCurve {
    fn default() -> Self {
        Self::new(CurveType::Chordal)
    }
}

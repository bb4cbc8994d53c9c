//! 指针拖拽状态机
//!
//! Idle → (按下卡片) → Dragging → (松开) → Idle，
//! 悬停状态独立记录，只用于光标提示。
//!
//! 事件只修改状态，真正作用到刚体在下一个 tick 开始时进行。

use glam::{Vec2, Vec3};

/// 光标提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Auto,
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn as_str(self) -> &'static str {
        match self {
            Cursor::Auto => "auto",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }

    /// JNI 侧使用的编号
    pub fn code(self) -> i32 {
        match self {
            Cursor::Auto => 0,
            Cursor::Grab => 1,
            Cursor::Grabbing => 2,
        }
    }
}

/// 指针事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i32,
    /// 命中点（世界坐标）
    pub point: Vec3,
}

/// 指针捕获（由宿主实现）
pub trait PointerCapture {
    fn set_pointer_capture(&mut self, pointer_id: i32);
    fn release_pointer_capture(&mut self, pointer_id: i32);
}

/// 拖拽状态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// offset = 按下时的命中点 - 卡片位置
    Dragging { pointer_id: i32, offset: Vec3 },
}

impl DragState {
    pub fn offset(&self) -> Option<Vec3> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { offset, .. } => Some(*offset),
        }
    }
}

/// 拖拽控制器
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    hovered: bool,
    /// 最近一次指针位置（NDC）
    pointer: Vec2,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_over(&mut self) {
        self.hovered = true;
    }

    pub fn pointer_out(&mut self) {
        self.hovered = false;
    }

    pub fn pointer_move(&mut self, ndc: Vec2) {
        self.pointer = ndc;
    }

    /// 按下卡片：捕获指针，记录抓取偏移
    ///
    /// 拖拽中其它指针的按下被忽略，返回是否开始拖拽。
    pub fn pointer_down(
        &mut self,
        event: PointerEvent,
        card_translation: Vec3,
        capture: &mut dyn PointerCapture,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }
        capture.set_pointer_capture(event.pointer_id);
        self.state = DragState::Dragging {
            pointer_id: event.pointer_id,
            offset: event.point - card_translation,
        };
        true
    }

    /// 松开：释放指针，回到 Idle
    ///
    /// 只有正在拖拽的那个指针松开才生效。
    pub fn pointer_up(&mut self, pointer_id: i32, capture: &mut dyn PointerCapture) {
        if let DragState::Dragging { pointer_id: active, .. } = self.state {
            if active == pointer_id {
                capture.release_pointer_capture(pointer_id);
                self.state = DragState::Idle;
            }
        }
    }

    /// 由拖拽目标点得到卡片位置
    pub fn card_target(&self, pointer_world: Vec3) -> Option<Vec3> {
        self.state.offset().map(|offset| pointer_world - offset)
    }

    /// 当前光标提示
    pub fn cursor(&self) -> Cursor {
        match (self.hovered, self.is_dragging()) {
            (true, true) => Cursor::Grabbing,
            (true, false) => Cursor::Grab,
            (false, _) => Cursor::Auto,
        }
    }

    /// 卸载：释放捕获，清空所有状态，光标回到 auto
    pub fn reset(&mut self, capture: &mut dyn PointerCapture) {
        if let DragState::Dragging { pointer_id, .. } = self.state {
            capture.release_pointer_capture(pointer_id);
        }
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingCapture {
        captured: Option<i32>,
        calls: Vec<(&'static str, i32)>,
    }

    impl PointerCapture for RecordingCapture {
        fn set_pointer_capture(&mut self, pointer_id: i32) {
            self.captured = Some(pointer_id);
            self.calls.push(("set", pointer_id));
        }

        fn release_pointer_capture(&mut self, pointer_id: i32) {
            self.captured = None;
            self.calls.push(("release", pointer_id));
        }
    }

    fn down(controller: &mut DragController, capture: &mut RecordingCapture) -> bool {
        controller.pointer_down(
            PointerEvent { pointer_id: 7, point: Vec3::new(5.5, 4.0, 0.02) },
            Vec3::new(5.0, 4.5, 0.0),
            capture,
        )
    }

    #[test]
    fn test_idle_dragging_idle_cycle() {
        let mut controller = DragController::new();
        let mut capture = RecordingCapture::default();
        assert_eq!(controller.state(), DragState::Idle);

        assert!(down(&mut controller, &mut capture));
        assert!(controller.is_dragging());
        assert_eq!(capture.captured, Some(7));
        let offset = controller.state().offset().unwrap();
        assert!((offset - Vec3::new(0.5, -0.5, 0.02)).length() < 1e-6);

        controller.pointer_up(7, &mut capture);
        assert_eq!(controller.state(), DragState::Idle);
        assert_eq!(capture.captured, None);
        assert_eq!(capture.calls, vec![("set", 7), ("release", 7)]);
    }

    #[test]
    fn test_offset_is_constant_across_targets() {
        let mut controller = DragController::new();
        let mut capture = RecordingCapture::default();
        down(&mut controller, &mut capture);
        let d = controller.state().offset().unwrap();

        for p in [Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 1.0)] {
            let target = controller.card_target(p).unwrap();
            assert!((target - (p - d)).length() < 1e-6);
        }

        controller.pointer_up(7, &mut capture);
        assert!(controller.card_target(Vec3::ONE).is_none());
    }

    #[test]
    fn test_cursor_hints() {
        let mut controller = DragController::new();
        let mut capture = RecordingCapture::default();
        assert_eq!(controller.cursor(), Cursor::Auto);

        controller.pointer_over();
        assert_eq!(controller.cursor(), Cursor::Grab);

        down(&mut controller, &mut capture);
        assert_eq!(controller.cursor(), Cursor::Grabbing);

        controller.pointer_out();
        assert_eq!(controller.cursor(), Cursor::Auto);
        assert_eq!(Cursor::Grabbing.as_str(), "grabbing");
    }

    #[test]
    fn test_reset_releases_capture() {
        let mut controller = DragController::new();
        let mut capture = RecordingCapture::default();
        controller.pointer_over();
        down(&mut controller, &mut capture);

        controller.reset(&mut capture);
        assert_eq!(controller.cursor(), Cursor::Auto);
        assert!(!controller.is_dragging());
        assert_eq!(capture.captured, None);
    }

    #[test]
    fn test_second_pointer_cannot_steal_drag() {
        let mut controller = DragController::new();
        let mut capture = RecordingCapture::default();
        down(&mut controller, &mut capture);
        let offset = controller.state().offset();

        let started = controller.pointer_down(
            PointerEvent { pointer_id: 9, point: Vec3::ZERO },
            Vec3::new(5.0, 4.5, 0.0),
            &mut capture,
        );
        assert!(!started);
        assert_eq!(capture.captured, Some(7));
        assert_eq!(controller.state().offset(), offset);

        // 另一个指针松开不结束拖拽
        controller.pointer_up(9, &mut capture);
        assert!(controller.is_dragging());
        assert_eq!(capture.captured, Some(7));

        controller.pointer_up(7, &mut capture);
        assert!(!controller.is_dragging());
        assert_eq!(capture.calls, vec![("set", 7), ("release", 7)]);
    }
}

#![no_std]

pub mod channel;
pub mod config;
mod decode;
mod dispatch;
pub mod error;
pub mod gpio;
mod handle;
pub mod info;

pub use config::*;
pub use decode::Sample;
pub use error::Error;
pub use handle::{ButtonHandle, DEFAULT_SAMPLE_CAPACITY};
pub use info::{info, ButtonInfo};

use embassy_time::Instant;

/// 解码引擎产生的手势事件。
///
/// 事件是值，在一次解码调用中产生、分发并丢弃。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
    Release,
    SingleClick,
    DoubleClick,
    TripleClick,
    /// 超过三次的连击，`count` 为本轮累计的点击次数。
    RepeatClick { count: u16 },
    ShortPressStart,
    ShortPressEnd,
    LongPressStart,
    LongPressHold,
    LongPressEnd,
}

impl ButtonEvent {
    /// 位标志形式的状态码，每种事件占一位。
    pub const fn code(&self) -> u16 {
        match self {
            ButtonEvent::Press => 1 << 0,
            ButtonEvent::Release => 1 << 1,
            ButtonEvent::SingleClick => 1 << 2,
            ButtonEvent::DoubleClick => 1 << 3,
            ButtonEvent::TripleClick => 1 << 4,
            ButtonEvent::RepeatClick { .. } => 1 << 5,
            ButtonEvent::ShortPressStart => 1 << 6,
            ButtonEvent::ShortPressEnd => 1 << 7,
            ButtonEvent::LongPressStart => 1 << 8,
            ButtonEvent::LongPressHold => 1 << 9,
            ButtonEvent::LongPressEnd => 1 << 10,
        }
    }

    /// 点击类事件携带的点击次数，其余事件为 0。
    pub const fn times(&self) -> u16 {
        match self {
            ButtonEvent::SingleClick => 1,
            ButtonEvent::DoubleClick => 2,
            ButtonEvent::TripleClick => 3,
            ButtonEvent::RepeatClick { count } => *count,
            _ => 0,
        }
    }
}

/// 解码器依赖的外部能力：电平读取、时钟、事件回调和可选的调试输出。
///
/// 接口通过 [`ButtonHandle::link`] 交给句柄，解码器只依赖这个 trait，
/// 因此可以用模拟时钟和脚本化的电平序列做确定性测试。
pub trait ButtonInterface {
    /// 当前电平，`true` 表示按下。
    fn read_level(&mut self) -> bool;

    /// 单调时钟。
    fn now(&mut self) -> Instant;

    /// 每个事件按产生顺序同步调用一次。
    ///
    /// 回调运行在调用者的上下文中，不得重入同一个句柄。
    fn on_event(&mut self, event: ButtonEvent);

    /// 人类可读的诊断信息，默认丢弃。
    fn on_debug(&mut self, _msg: &str) {}
}

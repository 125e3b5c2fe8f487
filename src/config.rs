use embassy_time::Duration;

use crate::error::Error;

/// 定义手势解码所用的五个时间阈值。
///
/// 所有阈值都必须为正（非零 tick），否则会被 [`ButtonConfig::validate`] 拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// 消抖间隔。
    ///
    /// 距上一次被接受的电平跳变不足该时长的跳变会被视为抖动直接丢弃，
    /// 不改变状态也不产生事件。
    pub interval: Duration,

    /// 短按阈值。
    ///
    /// 按住时间达到该值（且尚未达到 `long_time`）时触发 `ShortPressStart`。
    pub short_time: Duration,

    /// 长按阈值。
    ///
    /// 按住时间达到该值时触发 `LongPressStart`，此后的释放不计入点击次数。
    pub long_time: Duration,

    /// 长按状态下重复触发 `LongPressHold` 的周期。
    pub repeat_time: Duration,

    /// 释放后等待下一次按下的最长时间。
    ///
    /// 超过该时间仍未按下，则根据累计次数给出单击/双击/三击/连击事件。
    pub timeout: Duration,
}

impl ButtonConfig {
    /// 默认配置，可在 `const` 上下文中使用。
    pub const fn new() -> Self {
        Self {
            interval: Duration::from_millis(5),
            short_time: Duration::from_millis(1000),
            long_time: Duration::from_millis(3000),
            repeat_time: Duration::from_millis(200),
            timeout: Duration::from_millis(1000),
        }
    }

    /// 检查所有阈值是否为正。
    pub fn validate(&self) -> Result<(), Error> {
        let thresholds = [
            self.interval,
            self.short_time,
            self.long_time,
            self.repeat_time,
            self.timeout,
        ];
        if thresholds.iter().any(|t| !is_positive(*t)) {
            return Err(Error::InvalidThreshold);
        }
        Ok(())
    }
}

impl Default for ButtonConfig {
    /// 提供一套合理的默认配置。
    ///
    /// - 消抖: 5ms
    /// - 短按: 1s
    /// - 长按: 3s
    /// - 长按连发周期: 200ms
    /// - 多击等待: 1s
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn is_positive(value: Duration) -> bool {
    value.as_ticks() > 0
}

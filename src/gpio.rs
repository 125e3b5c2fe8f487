use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::{ButtonEvent, ButtonHandle, ButtonInterface, Error};

/// 定义GPIO按钮的有效电平。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveLevel {
    /// 低电平有效（例如，使用上拉电阻，按下时引脚接地）。
    Low,
    /// 高电平有效（例如，使用下拉电阻，按下时引脚接VCC）。
    High,
}

/// 事件的最终接收者。
///
/// 对所有 `FnMut(ButtonEvent)` 闭包都已实现。
pub trait EventHandler {
    fn handle(&mut self, event: ButtonEvent);
}

impl<F: FnMut(ButtonEvent)> EventHandler for F {
    fn handle(&mut self, event: ButtonEvent) {
        (*self)(event)
    }
}

/// 一个直接由GPIO输入引脚驱动的按钮接口。
///
/// 它封装了一个 `InputPin`，时钟使用 `embassy_time::Instant::now()`，
/// 事件交给 `handler`。读取引脚出错时视为未按下。
pub struct GpioButton<P: InputPin, H: EventHandler> {
    pin: P,
    active_level: ActiveLevel,
    handler: H,
}

impl<P: InputPin, H: EventHandler> GpioButton<P, H> {
    /// 创建一个新的GPIO按钮接口。
    ///
    /// # 参数
    /// * `pin`: 一个实现了 `InputPin` 的GPIO引脚。需要使用 [`ButtonHandle::run`]
    ///   时，引脚还必须实现 `embedded_hal_async::digital::Wait`。
    /// * `active_level`: 定义了按钮按下时的有效电平。
    /// * `handler`: 接收手势事件。
    pub fn new(pin: P, active_level: ActiveLevel, handler: H) -> Self {
        Self {
            pin,
            active_level,
            handler,
        }
    }

    pub fn is_pressed(&mut self) -> bool {
        match self.active_level {
            ActiveLevel::Low => self.pin.is_low().unwrap_or(false),
            ActiveLevel::High => self.pin.is_high().unwrap_or(false),
        }
    }

    /// 获取事件处理器的可变引用
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// 拆出引脚和事件处理器
    pub fn release(self) -> (P, H) {
        (self.pin, self.handler)
    }
}

impl<P: InputPin + Wait, H: EventHandler> GpioButton<P, H> {
    /// 等待引脚到达给定的按键状态，返回等待结束后实际读到的状态。
    async fn wait_for(&mut self, pressed: bool) -> bool {
        let high = match self.active_level {
            ActiveLevel::Low => !pressed,
            ActiveLevel::High => pressed,
        };
        if high {
            self.pin.wait_for_high().await.unwrap_or_default();
        } else {
            self.pin.wait_for_low().await.unwrap_or_default();
        }
        self.is_pressed()
    }
}

impl<P: InputPin, H: EventHandler> ButtonInterface for GpioButton<P, H> {
    fn read_level(&mut self) -> bool {
        self.is_pressed()
    }

    fn now(&mut self) -> Instant {
        Instant::now()
    }

    fn on_event(&mut self, event: ButtonEvent) {
        self.handler.handle(event);
    }
}

impl<P, H, const N: usize> ButtonHandle<GpioButton<P, H>, N>
where
    P: InputPin + Wait,
    H: EventHandler,
{
    /// 在异步任务中持续驱动解码器。
    ///
    /// 引脚到达相反电平时走边沿入口，`tick` 到期时走周期入口，
    /// 因此长按和多击超时即使没有新的跳变也能被及时判定。
    /// `tick` 应不大于最小的阈值；`tick` 远大于 `repeat_time` 时，
    /// 每个 tick 会一次补发多个 `LongPressHold`。
    ///
    /// 只有句柄未初始化时才会返回。
    pub async fn run(&mut self, tick: Duration) -> Error {
        loop {
            if !self.is_initialized() {
                return Error::NotInitialized;
            }
            let Some(button) = self.interface_mut() else {
                return Error::MissingInterface;
            };

            let pressed = button.is_pressed();
            let edge = select(button.wait_for(!pressed), Timer::after(tick)).await;
            let result = match edge {
                Either::First(level) => self.irq_handler(level, Instant::now()),
                Either::Second(_) => self.period_handler(Instant::now()),
            };
            if let Err(err) = result {
                return err;
            }
        }
    }
}

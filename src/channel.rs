use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};

use crate::{gpio::EventHandler, ButtonEvent};

pub type ButtonEventChannel<const CAP: usize> =
    Channel<CriticalSectionRawMutex, ButtonEvent, CAP>;
pub type ButtonEventSender<'a, const CAP: usize> =
    Sender<'a, CriticalSectionRawMutex, ButtonEvent, CAP>;
pub type ButtonEventReceiver<'a, const CAP: usize> =
    Receiver<'a, CriticalSectionRawMutex, ButtonEvent, CAP>;

/// 把事件转发到通道的处理器。
///
/// 适合在中断或定时器上下文中驱动句柄、在任务中消费事件的场景。
/// 投递使用 `try_send`，从不阻塞；通道已满时事件被丢弃并计数。
pub struct ChannelForwarder<'a, const CAP: usize> {
    sender: ButtonEventSender<'a, CAP>,
    dropped: u32,
}

impl<'a, const CAP: usize> ChannelForwarder<'a, CAP> {
    pub fn new(channel: &'a ButtonEventChannel<CAP>) -> Self {
        Self {
            sender: channel.sender(),
            dropped: 0,
        }
    }

    /// 因通道已满而丢弃的事件数。
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const CAP: usize> EventHandler for ChannelForwarder<'_, CAP> {
    fn handle(&mut self, event: ButtonEvent) {
        if self.sender.try_send(event).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("button: event channel full, dropped {}", event);
        }
    }
}

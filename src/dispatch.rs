use crate::{ButtonEvent, ButtonInterface};

/// 把解码器产生的事件逐个同步转交给接口，不缓冲也不合并。
pub(crate) struct Dispatcher<'a, I: ButtonInterface> {
    interface: &'a mut I,
}

impl<'a, I: ButtonInterface> Dispatcher<'a, I> {
    pub(crate) fn new(interface: &'a mut I) -> Self {
        Self { interface }
    }

    pub(crate) fn emit(&mut self, event: ButtonEvent) {
        #[cfg(feature = "defmt")]
        defmt::trace!("button: {}", event);
        self.interface.on_event(event);
    }

    pub(crate) fn debug(&mut self, msg: &str) {
        #[cfg(feature = "defmt")]
        defmt::debug!("{=str}", msg);
        self.interface.on_debug(msg);
    }
}

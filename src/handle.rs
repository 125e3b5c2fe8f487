use embassy_time::{Duration, Instant};

use crate::{
    config::{is_positive, ButtonConfig},
    decode::{Decoder, Sample},
    dispatch::Dispatcher,
    error::Error,
    ButtonInterface,
};

/// 采样环形缓冲区的默认容量。
pub const DEFAULT_SAMPLE_CAPACITY: usize = 16;

/// 单个按键的持久状态，由应用分配和持有。
///
/// 典型流程：
///
/// 1. [`ButtonHandle::new`] 创建未初始化的句柄（可放在 `static` 中）；
/// 2. [`ButtonHandle::link`] 提供接口；
/// 3. [`ButtonHandle::init`] 初始化；
/// 4. 周期性调用 [`ButtonHandle::period_handler`]，或在 GPIO 中断中调用
///    [`ButtonHandle::irq_handler`]；
/// 5. [`ButtonHandle::deinit`] 结束跟踪。
///
/// 驱动只在每次调用期间借用句柄，不在调用之间保留任何引用。
/// 句柄本身不加锁：如果定时器和中断都会驱动同一个句柄，调用者必须自行串行化。
pub struct ButtonHandle<I: ButtonInterface, const N: usize = DEFAULT_SAMPLE_CAPACITY> {
    interface: Option<I>,
    config: ButtonConfig,
    inited: bool,
    decoder: Decoder<N>,
}

impl<I: ButtonInterface, const N: usize> ButtonHandle<I, N> {
    /// 创建一个未初始化、未连接接口的句柄，阈值为默认值。
    pub const fn new() -> Self {
        Self {
            interface: None,
            config: ButtonConfig::new(),
            inited: false,
            decoder: Decoder::new(),
        }
    }

    /// 连接接口，已有的接口会被替换。
    ///
    /// 句柄已初始化时返回 [`Error::AlreadyInitialized`]，原接口保持不变。
    pub fn link(&mut self, interface: I) -> Result<(), Error> {
        if self.inited {
            return Err(Error::AlreadyInitialized);
        }
        self.interface = Some(interface);
        Ok(())
    }

    /// 取回接口，只能在未初始化时进行。
    pub fn unlink(&mut self) -> Result<I, Error> {
        if self.inited {
            return Err(Error::AlreadyInitialized);
        }
        self.interface.take().ok_or(Error::MissingInterface)
    }

    /// 初始化句柄：清空解码状态、保存阈值并读取当前电平。
    ///
    /// 初始化时已经按住的按键不会产生 `Press`，其释放也不会产生事件。
    pub fn init(&mut self, config: ButtonConfig) -> Result<(), Error> {
        if self.inited {
            return Err(Error::AlreadyInitialized);
        }
        config.validate()?;
        let interface = self.interface.as_mut().ok_or(Error::MissingInterface)?;

        let pressed = interface.read_level();
        self.decoder.reset(pressed);
        self.config = config;
        self.inited = true;

        if pressed {
            Dispatcher::new(interface).debug("button: pressed at init.");
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("button: init with {}", self.config);
        Ok(())
    }

    /// 结束跟踪。阈值保持不变，接口仍然连接。
    pub fn deinit(&mut self) -> Result<(), Error> {
        self.ensure_initialized()?;
        self.inited = false;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.inited
    }

    /// 周期入口：通过接口读取电平后交给解码器。
    ///
    /// 两次调用相隔较久时，错过的每一次 `LongPressHold` 都会在本次调用中补发，
    /// 回调次数约为间隔除以 `repeat_time`。`repeat_time` 很小时应保证调用足够频繁。
    pub fn period_handler(&mut self, now: Instant) -> Result<(), Error> {
        self.ensure_initialized()?;
        let interface = self.interface.as_mut().ok_or(Error::MissingInterface)?;
        let pressed = interface.read_level();
        self.decoder
            .step(&self.config, &mut Dispatcher::new(interface), pressed, now);
        Ok(())
    }

    /// 边沿中断入口：电平由调用者直接给出，不再重复采样。
    pub fn irq_handler(&mut self, pressed: bool, now: Instant) -> Result<(), Error> {
        self.ensure_initialized()?;
        let interface = self.interface.as_mut().ok_or(Error::MissingInterface)?;
        self.decoder
            .step(&self.config, &mut Dispatcher::new(interface), pressed, now);
        Ok(())
    }

    /// 电平和时间都从接口读取的周期入口。
    pub fn poll(&mut self) -> Result<(), Error> {
        self.ensure_initialized()?;
        let now = match self.interface.as_mut() {
            Some(interface) => interface.now(),
            None => return Err(Error::MissingInterface),
        };
        self.period_handler(now)
    }

    /// 丢弃当前的按下和点击进度，回到空闲状态，阈值不变。
    pub fn reset(&mut self) -> Result<(), Error> {
        self.ensure_initialized()?;
        let interface = self.interface.as_mut().ok_or(Error::MissingInterface)?;
        let pressed = interface.read_level();
        self.decoder.reset(pressed);
        Ok(())
    }

    /// 解码器记录的当前电平。
    pub fn is_pressed(&self) -> Result<bool, Error> {
        self.ensure_initialized()?;
        Ok(self.decoder.is_pressed())
    }

    /// 本轮尚未结算的点击次数。
    pub fn pending_clicks(&self) -> Result<u16, Error> {
        self.ensure_initialized()?;
        Ok(self.decoder.pending_clicks())
    }

    /// 最近被接受的跳变，按时间从旧到新，最多 `N` 个。
    pub fn samples(&self) -> Result<impl Iterator<Item = Sample> + '_, Error> {
        self.ensure_initialized()?;
        Ok(self.decoder.samples())
    }

    /// 获取接口的不可变引用
    pub fn interface(&self) -> Option<&I> {
        self.interface.as_ref()
    }

    /// 获取接口的可变引用
    pub fn interface_mut(&mut self) -> Option<&mut I> {
        self.interface.as_mut()
    }

    pub fn config(&self) -> Result<ButtonConfig, Error> {
        self.ensure_initialized()?;
        Ok(self.config)
    }

    /// 整体替换阈值，对后续调用立即生效。
    pub fn set_config(&mut self, config: ButtonConfig) -> Result<(), Error> {
        self.ensure_initialized()?;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn interval(&self) -> Result<Duration, Error> {
        self.ensure_initialized()?;
        Ok(self.config.interval)
    }

    pub fn set_interval(&mut self, interval: Duration) -> Result<(), Error> {
        self.check_threshold(interval)?;
        self.config.interval = interval;
        Ok(())
    }

    pub fn short_time(&self) -> Result<Duration, Error> {
        self.ensure_initialized()?;
        Ok(self.config.short_time)
    }

    pub fn set_short_time(&mut self, short_time: Duration) -> Result<(), Error> {
        self.check_threshold(short_time)?;
        self.config.short_time = short_time;
        Ok(())
    }

    pub fn long_time(&self) -> Result<Duration, Error> {
        self.ensure_initialized()?;
        Ok(self.config.long_time)
    }

    pub fn set_long_time(&mut self, long_time: Duration) -> Result<(), Error> {
        self.check_threshold(long_time)?;
        self.config.long_time = long_time;
        Ok(())
    }

    pub fn repeat_time(&self) -> Result<Duration, Error> {
        self.ensure_initialized()?;
        Ok(self.config.repeat_time)
    }

    pub fn set_repeat_time(&mut self, repeat_time: Duration) -> Result<(), Error> {
        self.check_threshold(repeat_time)?;
        self.config.repeat_time = repeat_time;
        Ok(())
    }

    pub fn timeout(&self) -> Result<Duration, Error> {
        self.ensure_initialized()?;
        Ok(self.config.timeout)
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> Result<(), Error> {
        self.check_threshold(timeout)?;
        self.config.timeout = timeout;
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), Error> {
        if self.inited {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn check_threshold(&self, value: Duration) -> Result<(), Error> {
        self.ensure_initialized()?;
        if !is_positive(value) {
            return Err(Error::InvalidThreshold);
        }
        Ok(())
    }
}

impl<I: ButtonInterface, const N: usize> Default for ButtonHandle<I, N> {
    fn default() -> Self {
        Self::new()
    }
}

use embassy_time::{Duration, Instant};
use heapless::HistoryBuffer;

use crate::{config::ButtonConfig, dispatch::Dispatcher, ButtonEvent, ButtonInterface};

/// 一次被接受的电平跳变。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// 跳变后的电平，`true` 表示按下。
    pub pressed: bool,
    /// 跳变被接受的时间。
    pub at: Instant,
    /// 距上一次被接受的跳变的时长，第一次跳变为零。
    pub since_previous: Duration,
}

/// 按下期间所处的阶段，取代 short/long 两个触发标志。
///
/// 时间点超出 `Instant` 的表示范围时记为 `None`，表示永不到期。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Tap,
    Short,
    Long { next_hold: Option<Instant> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pressed { since: Instant, phase: Phase },
    WaitingForNextClick { deadline: Option<Instant> },
}

/// 手势解码状态机。
///
/// 每次调用都只根据传入的电平和时间戳推进，从不等待；
/// 期限和阈值的判断先于同一次调用中的新跳变。
pub(crate) struct Decoder<const N: usize> {
    state: State,
    clicks: u16,
    pressed: bool,
    last_edge: Option<Instant>,
    samples: HistoryBuffer<Sample, N>,
}

impl<const N: usize> Decoder<N> {
    pub(crate) const fn new() -> Self {
        Self {
            state: State::Idle,
            clicks: 0,
            pressed: false,
            last_edge: None,
            samples: HistoryBuffer::new(),
        }
    }

    /// 回到空闲状态，`pressed` 为当前的物理电平。
    pub(crate) fn reset(&mut self, pressed: bool) {
        self.state = State::Idle;
        self.clicks = 0;
        self.pressed = pressed;
        self.last_edge = None;
        self.samples.clear();
    }

    pub(crate) fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub(crate) fn pending_clicks(&self) -> u16 {
        self.clicks
    }

    pub(crate) fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.samples.oldest_ordered().copied()
    }

    pub(crate) fn step<I: ButtonInterface>(
        &mut self,
        config: &ButtonConfig,
        out: &mut Dispatcher<'_, I>,
        pressed: bool,
        now: Instant,
    ) {
        self.advance(config, out, now);
        if pressed != self.pressed {
            self.edge(config, out, pressed, now);
        }
    }

    /// 处理与电平无关、只由时间推动的转换。
    fn advance<I: ButtonInterface>(
        &mut self,
        config: &ButtonConfig,
        out: &mut Dispatcher<'_, I>,
        now: Instant,
    ) {
        match self.state {
            State::Idle => {}
            State::WaitingForNextClick { deadline } => {
                if deadline.is_some_and(|deadline| now >= deadline) {
                    self.finish_sequence(out);
                }
            }
            State::Pressed { since, mut phase } => {
                let held = now.saturating_duration_since(since);

                // 稀疏调用时按顺序补发错过的阶段事件，与密集轮询得到的序列一致
                if phase == Phase::Tap
                    && config.short_time < config.long_time
                    && held >= config.short_time
                {
                    out.emit(ButtonEvent::ShortPressStart);
                    phase = Phase::Short;
                }
                if !matches!(phase, Phase::Long { .. }) && held >= config.long_time {
                    out.emit(ButtonEvent::LongPressStart);
                    phase = Phase::Long {
                        next_hold: since
                            .checked_add(config.long_time)
                            .and_then(|start| start.checked_add(config.repeat_time)),
                    };
                }
                if let Phase::Long { mut next_hold } = phase {
                    while let Some(due) = next_hold.filter(|due| now >= *due) {
                        out.emit(ButtonEvent::LongPressHold);
                        next_hold = due.checked_add(config.repeat_time);
                    }
                    phase = Phase::Long { next_hold };
                }

                self.state = State::Pressed { since, phase };
            }
        }
    }

    fn edge<I: ButtonInterface>(
        &mut self,
        config: &ButtonConfig,
        out: &mut Dispatcher<'_, I>,
        pressed: bool,
        now: Instant,
    ) {
        let since_previous = match self.last_edge {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::from_ticks(0),
        };
        if self.last_edge.is_some() && since_previous < config.interval {
            out.debug(if pressed {
                "button: press too fast."
            } else {
                "button: release too fast."
            });
            return;
        }

        self.samples.write(Sample {
            pressed,
            at: now,
            since_previous,
        });
        self.last_edge = Some(now);
        self.pressed = pressed;

        if pressed {
            self.on_press(out, now);
        } else {
            self.on_release(config, out, now);
        }
    }

    fn on_press<I: ButtonInterface>(&mut self, out: &mut Dispatcher<'_, I>, now: Instant) {
        match self.state {
            State::Idle | State::WaitingForNextClick { .. } => {
                out.emit(ButtonEvent::Press);
                self.state = State::Pressed {
                    since: now,
                    phase: Phase::Tap,
                };
            }
            // pressed 标志与 Pressed 状态同步，不会出现
            State::Pressed { .. } => {}
        }
    }

    fn on_release<I: ButtonInterface>(
        &mut self,
        config: &ButtonConfig,
        out: &mut Dispatcher<'_, I>,
        now: Instant,
    ) {
        let State::Pressed { phase, .. } = self.state else {
            // 初始化时已经按住的按键，只记录电平
            out.debug("button: release without press.");
            return;
        };

        out.emit(ButtonEvent::Release);
        match phase {
            Phase::Long { .. } => {
                // 长按优先于点击计数，本轮累计的点击一并放弃
                out.emit(ButtonEvent::LongPressEnd);
                self.clicks = 0;
                self.state = State::Idle;
                return;
            }
            Phase::Short => out.emit(ButtonEvent::ShortPressEnd),
            Phase::Tap => {}
        }
        self.clicks = self.clicks.saturating_add(1);
        self.state = State::WaitingForNextClick {
            deadline: now.checked_add(config.timeout),
        };
    }

    fn finish_sequence<I: ButtonInterface>(&mut self, out: &mut Dispatcher<'_, I>) {
        let event = match self.clicks {
            0 => None,
            1 => Some(ButtonEvent::SingleClick),
            2 => Some(ButtonEvent::DoubleClick),
            3 => Some(ButtonEvent::TripleClick),
            count => Some(ButtonEvent::RepeatClick { count }),
        };
        match event {
            Some(event) => out.emit(event),
            None => out.debug("button: reset checking."),
        }
        self.clicks = 0;
        self.state = State::Idle;
    }
}

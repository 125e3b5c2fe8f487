use embassy_gesture_button::{ButtonConfig, ButtonEvent, ButtonHandle, ButtonInterface};
use embassy_time::{Duration, Instant};

use ButtonEvent::*;

// --- Mock interface (脚本化的电平和时钟) ---

#[derive(Default)]
struct Recorder {
    level: bool,
    clock_ms: u64,
    events: Vec<ButtonEvent>,
    debug: Vec<String>,
}

impl ButtonInterface for Recorder {
    fn read_level(&mut self) -> bool {
        self.level
    }

    fn now(&mut self) -> Instant {
        Instant::from_millis(self.clock_ms)
    }

    fn on_event(&mut self, event: ButtonEvent) {
        self.events.push(event);
    }

    fn on_debug(&mut self, msg: &str) {
        self.debug.push(msg.to_string());
    }
}

fn config() -> ButtonConfig {
    ButtonConfig {
        interval: Duration::from_millis(20),
        short_time: Duration::from_millis(300),
        long_time: Duration::from_millis(1000),
        repeat_time: Duration::from_millis(200),
        timeout: Duration::from_millis(250),
    }
}

fn setup<const N: usize>(config: ButtonConfig) -> ButtonHandle<Recorder, N> {
    let mut handle = ButtonHandle::new();
    handle.link(Recorder::default()).unwrap();
    handle.init(config).unwrap();
    handle
}

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

fn irq<const N: usize>(handle: &mut ButtonHandle<Recorder, N>, pressed: bool, ms: u64) {
    set_level(handle, pressed);
    handle.irq_handler(pressed, at(ms)).unwrap();
}

fn tick<const N: usize>(handle: &mut ButtonHandle<Recorder, N>, ms: u64) {
    handle.period_handler(at(ms)).unwrap();
}

fn set_level<const N: usize>(handle: &mut ButtonHandle<Recorder, N>, pressed: bool) {
    handle.interface_mut().unwrap().level = pressed;
}

fn drain<const N: usize>(handle: &mut ButtonHandle<Recorder, N>) -> Vec<ButtonEvent> {
    std::mem::take(&mut handle.interface_mut().unwrap().events)
}

fn clicks<const N: usize>(handle: &mut ButtonHandle<Recorder, N>, starts: &[u64]) {
    for &t in starts {
        irq(handle, true, t);
        irq(handle, false, t + 50);
    }
}

#[test]
fn single_click() {
    let mut handle = setup::<16>(config());
    irq(&mut handle, true, 0);
    irq(&mut handle, false, 50);

    tick(&mut handle, 299);
    assert_eq!(drain(&mut handle), [Press, Release]);
    assert_eq!(handle.pending_clicks(), Ok(1));

    tick(&mut handle, 300);
    assert_eq!(drain(&mut handle), [SingleClick]);
    assert_eq!(handle.pending_clicks(), Ok(0));

    tick(&mut handle, 2000);
    assert!(drain(&mut handle).is_empty());
}

#[test]
fn double_click() {
    let mut handle = setup::<16>(config());
    irq(&mut handle, true, 0);
    irq(&mut handle, false, 50);
    irq(&mut handle, true, 150);
    irq(&mut handle, false, 200);
    tick(&mut handle, 449);
    tick(&mut handle, 450);

    assert_eq!(
        drain(&mut handle),
        [Press, Release, Press, Release, DoubleClick]
    );
}

#[test]
fn triple_click() {
    let mut handle = setup::<16>(config());
    clicks(&mut handle, &[0, 100, 200]);
    tick(&mut handle, 500);

    let events = drain(&mut handle);
    assert_eq!(events.len(), 7);
    assert_eq!(events.last(), Some(&TripleClick));
    assert_eq!(events.iter().filter(|e| **e == Press).count(), 3);
}

#[test]
fn repeat_click_carries_count_and_recurs() {
    let mut handle = setup::<16>(config());
    clicks(&mut handle, &[0, 100, 200, 300, 400]);
    tick(&mut handle, 700);

    let events = drain(&mut handle);
    assert_eq!(events.last(), Some(&RepeatClick { count: 5 }));
    assert_eq!(events.last().map(|e| e.times()), Some(5));

    clicks(&mut handle, &[1000, 1100, 1200, 1300]);
    tick(&mut handle, 1600);
    let events = drain(&mut handle);
    assert_eq!(events.last(), Some(&RepeatClick { count: 4 }));
    let completions = events.iter().filter(|e| e.times() > 0).count();
    assert_eq!(completions, 1);
}

#[test]
fn edges_inside_interval_are_discarded() {
    let mut handle = setup::<16>(config());
    irq(&mut handle, true, 100);
    assert_eq!(drain(&mut handle), [Press]);

    // 抖动：10ms 后的释放被丢弃，状态不变
    irq(&mut handle, false, 110);
    assert!(drain(&mut handle).is_empty());
    assert_eq!(handle.is_pressed(), Ok(true));
    assert_eq!(handle.samples().unwrap().count(), 1);
    assert!(handle
        .interface()
        .unwrap()
        .debug
        .iter()
        .any(|m| m == "button: release too fast."));

    irq(&mut handle, false, 150);
    assert_eq!(drain(&mut handle), [Release]);
}

#[test]
fn bounced_press_while_waiting_is_discarded() {
    let mut handle = setup::<16>(config());
    irq(&mut handle, true, 0);
    irq(&mut handle, false, 50);

    irq(&mut handle, true, 60);
    assert_eq!(drain(&mut handle), [Press, Release]);
    assert_eq!(handle.pending_clicks(), Ok(1));
    assert_eq!(handle.is_pressed(), Ok(false));
    assert_eq!(handle.samples().unwrap().count(), 2);
    assert!(handle
        .interface()
        .unwrap()
        .debug
        .iter()
        .any(|m| m == "button: press too fast."));

    set_level(&mut handle, false);
    tick(&mut handle, 300);
    assert_eq!(drain(&mut handle), [SingleClick]);
}

#[test]
fn edge_exactly_one_interval_later_is_accepted() {
    let mut handle = setup::<16>(config());
    irq(&mut handle, true, 0);
    irq(&mut handle, false, 20);
    irq(&mut handle, true, 40);

    assert_eq!(drain(&mut handle), [Press, Release, Press]);
    let deltas: Vec<_> = handle
        .samples()
        .unwrap()
        .map(|s| s.since_previous.as_millis())
        .collect();
    assert_eq!(deltas, [0, 20, 20]);
}

#[test]
fn polled_level_settles_after_interval() {
    let mut handle = setup::<16>(config());
    set_level(&mut handle, true);
    tick(&mut handle, 0);
    set_level(&mut handle, false);
    tick(&mut handle, 5);
    tick(&mut handle, 15);
    assert_eq!(drain(&mut handle), [Press]);

    tick(&mut handle, 25);
    assert_eq!(drain(&mut handle), [Release]);
    assert_eq!(handle.samples().unwrap().last().map(|s| s.at), Some(at(25)));
}

fn polled_long_press<const N: usize>(handle: &mut ButtonHandle<Recorder, N>) {
    set_level(handle, true);
    for t in (0..1500).step_by(50) {
        tick(handle, t);
    }
    set_level(handle, false);
    tick(handle, 1500);
    for t in (1550..3000).step_by(50) {
        tick(handle, t);
    }
}

#[test]
fn long_press_phases() {
    let mut handle = setup::<16>(config());
    polled_long_press(&mut handle);

    assert_eq!(
        drain(&mut handle),
        [
            Press,
            ShortPressStart,
            LongPressStart,
            LongPressHold,
            LongPressHold,
            Release,
            LongPressEnd,
        ]
    );
    assert_eq!(handle.pending_clicks(), Ok(0));
}

#[test]
fn sparse_calls_produce_the_same_sequence() {
    let mut polled = setup::<16>(config());
    polled_long_press(&mut polled);

    let mut sparse = setup::<16>(config());
    irq(&mut sparse, true, 0);
    irq(&mut sparse, false, 1500);
    tick(&mut sparse, 3000);

    assert_eq!(drain(&mut polled), drain(&mut sparse));
}

#[test]
fn long_press_without_short_phase() {
    let mut handle = setup::<16>(ButtonConfig {
        short_time: Duration::from_millis(1000),
        ..config()
    });
    irq(&mut handle, true, 0);
    tick(&mut handle, 1000);
    tick(&mut handle, 1200);
    tick(&mut handle, 1400);
    irq(&mut handle, false, 1450);
    tick(&mut handle, 5000);

    assert_eq!(
        drain(&mut handle),
        [
            Press,
            LongPressStart,
            LongPressHold,
            LongPressHold,
            Release,
            LongPressEnd,
        ]
    );
}

#[test]
fn unreachable_first_hold_never_fires() {
    let mut handle = setup::<16>(config());
    handle.set_repeat_time(Duration::MAX).unwrap();
    irq(&mut handle, true, 0);
    tick(&mut handle, 3000);
    tick(&mut handle, 60_000);
    irq(&mut handle, false, 60_050);

    assert_eq!(
        drain(&mut handle),
        [Press, ShortPressStart, LongPressStart, Release, LongPressEnd]
    );
}

#[test]
fn hold_schedule_stops_at_end_of_time() {
    let mut handle = setup::<16>(config());
    let repeat = Duration::from_ticks(u64::MAX / 2);
    handle.set_repeat_time(repeat).unwrap();
    let first_hold = Instant::from_ticks(config().long_time.as_ticks() + repeat.as_ticks());

    set_level(&mut handle, true);
    handle.irq_handler(true, Instant::from_ticks(0)).unwrap();
    handle.period_handler(first_hold).unwrap();
    handle.period_handler(Instant::MAX).unwrap();
    set_level(&mut handle, false);
    handle.irq_handler(false, Instant::MAX).unwrap();

    assert_eq!(
        drain(&mut handle),
        [
            Press,
            ShortPressStart,
            LongPressStart,
            LongPressHold,
            Release,
            LongPressEnd,
        ]
    );
}

#[test]
fn unreachable_timeout_keeps_sequence_open() {
    let mut handle = setup::<16>(config());
    handle.set_timeout(Duration::MAX).unwrap();
    irq(&mut handle, true, 0);
    irq(&mut handle, false, 50);
    handle.period_handler(Instant::MAX).unwrap();

    assert_eq!(drain(&mut handle), [Press, Release]);
    assert_eq!(handle.pending_clicks(), Ok(1));
}

#[test]
fn short_press_still_counts_as_click() {
    let mut handle = setup::<16>(config());
    irq(&mut handle, true, 0);
    tick(&mut handle, 300);
    irq(&mut handle, false, 500);
    tick(&mut handle, 750);

    assert_eq!(
        drain(&mut handle),
        [Press, ShortPressStart, Release, ShortPressEnd, SingleClick]
    );
}

#[test]
fn long_press_discards_pending_clicks() {
    let mut handle = setup::<16>(config());
    clicks(&mut handle, &[0]);
    irq(&mut handle, true, 150);
    tick(&mut handle, 1150);
    irq(&mut handle, false, 1300);
    tick(&mut handle, 5000);

    let events = drain(&mut handle);
    assert_eq!(events.last(), Some(&LongPressEnd));
    assert!(events.iter().all(|e| e.times() == 0));
}

#[test]
fn timeout_is_settled_before_press_at_deadline() {
    let mut handle = setup::<16>(config());
    clicks(&mut handle, &[0]);
    irq(&mut handle, true, 300);
    irq(&mut handle, false, 350);
    tick(&mut handle, 600);

    assert_eq!(
        drain(&mut handle),
        [Press, Release, SingleClick, Press, Release, SingleClick]
    );
}

#[test]
fn threshold_changes_are_not_retroactive() {
    let mut handle = setup::<16>(config());
    clicks(&mut handle, &[0]);
    handle.set_timeout(Duration::from_millis(1000)).unwrap();
    tick(&mut handle, 300);
    assert_eq!(drain(&mut handle), [Press, Release, SingleClick]);

    // 新的超时对下一轮生效
    clicks(&mut handle, &[500]);
    tick(&mut handle, 1000);
    assert_eq!(drain(&mut handle), [Press, Release]);
    tick(&mut handle, 1550);
    assert_eq!(drain(&mut handle), [SingleClick]);
}

#[test]
fn samples_record_accepted_transitions() {
    let mut handle = setup::<16>(config());
    clicks(&mut handle, &[0, 150]);

    let samples: Vec<_> = handle.samples().unwrap().collect();
    let levels: Vec<_> = samples.iter().map(|s| s.pressed).collect();
    let deltas: Vec<_> = samples
        .iter()
        .map(|s| s.since_previous.as_millis())
        .collect();
    assert_eq!(levels, [true, false, true, false]);
    assert_eq!(deltas, [0, 50, 100, 50]);
}

#[test]
fn sample_ring_keeps_only_latest() {
    let mut handle = setup::<4>(config());
    clicks(&mut handle, &[0, 100, 200]);

    let samples: Vec<_> = handle.samples().unwrap().collect();
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0].at, at(100));
    assert_eq!(samples[3].at, at(250));
}

#[test]
fn press_held_at_init_is_ignored() {
    let mut handle: ButtonHandle<Recorder> = ButtonHandle::new();
    handle
        .link(Recorder {
            level: true,
            ..Default::default()
        })
        .unwrap();
    handle.init(config()).unwrap();
    assert_eq!(handle.is_pressed(), Ok(true));

    set_level(&mut handle, false);
    tick(&mut handle, 100);
    tick(&mut handle, 1000);
    assert!(drain(&mut handle).is_empty());

    set_level(&mut handle, true);
    tick(&mut handle, 1100);
    assert_eq!(drain(&mut handle), [Press]);
}

#[test]
fn poll_reads_interface_clock() {
    let mut handle = setup::<16>(config());
    set_level(&mut handle, true);
    handle.poll().unwrap();
    handle.interface_mut().unwrap().clock_ms = 60;
    set_level(&mut handle, false);
    handle.poll().unwrap();
    handle.interface_mut().unwrap().clock_ms = 310;
    handle.poll().unwrap();

    assert_eq!(drain(&mut handle), [Press, Release, SingleClick]);
}

#[test]
fn reset_drops_progress() {
    let mut handle = setup::<16>(config());
    clicks(&mut handle, &[0, 100]);
    assert_eq!(handle.pending_clicks(), Ok(2));

    handle.reset().unwrap();
    assert_eq!(handle.pending_clicks(), Ok(0));
    assert_eq!(handle.samples().unwrap().count(), 0);
    tick(&mut handle, 1000);
    assert_eq!(drain(&mut handle), [Press, Release, Press, Release]);
}

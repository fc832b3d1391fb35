//! Integration tests for cascade-core.
//!
//! These tests exercise the public API end-to-end: state updates feeding the
//! scheduler, listener guards, theme loading and canvas recording.

use cascade_core::{
    AnimatedValue, Canvas, Color, Command, CoreError, Easing, ListenerKind, ListenerRegistry,
    Point, RecordingCanvas, Rect, Scheduler, State, Theme, Transform2D, Transition, WidgetId,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// State + Scheduler Integration Tests
// =============================================================================

#[derive(Clone, Default, Serialize, Deserialize)]
struct Toast {
    shown: bool,
    fading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToastMsg {
    Show,
    Fade,
    Hide,
}

impl State for Toast {
    type Message = ToastMsg;

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
        match msg {
            ToastMsg::Show => {
                self.shown = true;
                Command::batch([
                    Command::delay(1000, ToastMsg::Fade),
                    Command::delay(1200, ToastMsg::Hide),
                ])
            }
            ToastMsg::Fade => {
                self.fading = true;
                Command::None
            }
            ToastMsg::Hide => {
                self.shown = false;
                self.fading = false;
                Command::None
            }
        }
    }
}

fn run(state: &mut Toast, timers: &mut Scheduler<ToastMsg>, delta_ms: u64) {
    for msg in timers.advance(delta_ms) {
        let cmd = state.update(msg);
        timers.enqueue(cmd);
    }
}

#[test]
fn test_state_commands_drive_scheduler() {
    let mut toast = Toast::default();
    let mut timers = Scheduler::new();

    let cmd = toast.update(ToastMsg::Show);
    timers.enqueue(cmd);
    assert_eq!(timers.pending_count(), 2);

    run(&mut toast, &mut timers, 999);
    assert!(toast.shown && !toast.fading);

    run(&mut toast, &mut timers, 1);
    assert!(toast.fading);

    run(&mut toast, &mut timers, 200);
    assert!(!toast.shown);
    assert!(timers.is_idle());
}

#[test]
fn test_cancelled_timers_never_mutate_state() {
    let mut toast = Toast::default();
    let mut timers = Scheduler::new();
    timers.enqueue(toast.update(ToastMsg::Show));
    timers.cancel_all();
    run(&mut toast, &mut timers, 5000);
    assert!(toast.shown);
    assert!(!toast.fading);
}

// =============================================================================
// Listener Registry Integration Tests
// =============================================================================

#[test]
fn test_listener_guards_scoped_to_owner() {
    let registry = ListenerRegistry::new();
    let widget = WidgetId::new(99);

    struct Owner {
        _modality: cascade_core::ListenerGuard,
        outside: Option<cascade_core::ListenerGuard>,
    }

    let mut owner = Owner {
        _modality: registry.acquire(widget, ListenerKind::ModalityTracking),
        outside: None,
    };
    owner.outside = Some(registry.acquire(widget, ListenerKind::PointerDownOutside));
    assert_eq!(registry.total(), 2);

    owner.outside = None;
    assert_eq!(registry.count(ListenerKind::PointerDownOutside), 0);
    assert_eq!(registry.count(ListenerKind::ModalityTracking), 1);

    drop(owner);
    assert_eq!(registry.total(), 0);
}

// =============================================================================
// Theme Integration Tests
// =============================================================================

#[test]
fn test_theme_yaml_override_end_to_end() {
    let yaml = r##"
height: 52
colors:
  accent: "#22C55E"
transitions:
  chevron:
    duration_ms: 300
    easing: "ease-in-out"
motion:
  row_stagger_ms: 45
"##;
    let theme = Theme::from_yaml(yaml).expect("valid override");
    assert_eq!(theme.height, 52.0);
    assert_eq!(theme.row_pitch(), 64.0);
    assert_eq!(theme.colors.accent, Color::from_hex("#22C55E").expect("hex"));
    assert_eq!(theme.transitions.chevron.duration_ms, 300);
    assert_eq!(theme.transitions.chevron.easing, Easing::CSS_EASE_IN_OUT);
    assert_eq!(theme.motion.row_stagger_ms, 45);
}

#[test]
fn test_theme_yaml_error_reports_field() {
    let err = Theme::from_yaml("border: \"#12\"\n").expect_err("short hex");
    match err {
        CoreError::Color { field, .. } => assert_eq!(field, "border"),
        other => panic!("unexpected error {other:?}"),
    }
}

// =============================================================================
// Animation + Canvas Integration Tests
// =============================================================================

#[test]
fn test_animated_transform_recorded_on_canvas() {
    let mut offset = AnimatedValue::new(0.0f32);
    offset.retarget(
        -60.0,
        Transition::new(300, Easing::CubicBezier(0.23, 1.0, 0.32, 1.0)).with_delay(60),
    );

    let mut canvas = RecordingCanvas::new();
    for _ in 0..4 {
        offset.advance(120.0);
        canvas.push_transform(Transform2D::translate(0.0, offset.value()));
        canvas.fill_rect(Rect::new(0.0, 0.0, 336.0, 48.0), 12.0, Color::BLACK);
        canvas.pop_transform();
    }

    let ys: Vec<f32> = canvas
        .ops()
        .iter()
        .map(|op| op.transform.apply(Point::ORIGIN).y)
        .collect();
    assert_eq!(ys.len(), 4);
    assert!(ys.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(*ys.last().expect("four frames"), -60.0);
}

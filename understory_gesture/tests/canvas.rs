// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas-level scenarios for `understory_gesture`: pan, pinch, momentum,
//! scroll, taps, the watchdog and the pointer profile.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use understory_coordinate::Coordinate;
use understory_gesture::{
    CanvasDelegate, CanvasSession, CanvasSettings, InputProfile, InteractionId, InteractionInfo,
    Modifiers, MoveSource, PinchInteraction, PointerButton, TapEvent,
};

#[derive(Clone, Debug, PartialEq)]
enum Event {
    MoveStarted(MoveSource),
    MoveUpdated(MoveSource),
    MoveEnded(MoveSource),
    Tap(u32, Option<PointerButton>),
    SelectionStarted(Rect),
    SelectionChanged(Rect),
    SelectionEnded(Rect),
    Button(PointerButton),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn count(&self, event: &Event) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    fn taps(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Tap(count, _) => Some(*count),
                _ => None,
            })
            .collect()
    }
}

impl CanvasDelegate for Recorder {
    fn move_started(&mut self, source: MoveSource, _: &Coordinate) {
        self.events.push(Event::MoveStarted(source));
    }

    fn move_updated(&mut self, source: MoveSource, _: &Coordinate) {
        self.events.push(Event::MoveUpdated(source));
    }

    fn move_ended(&mut self, source: MoveSource, _: &Coordinate) {
        self.events.push(Event::MoveEnded(source));
    }

    fn tap(&mut self, tap: &TapEvent) {
        self.events.push(Event::Tap(tap.count, tap.button));
    }

    fn selection_started(&mut self, rect: Rect, _: Modifiers) {
        self.events.push(Event::SelectionStarted(rect));
    }

    fn selection_changed(&mut self, rect: Rect, _: Modifiers) {
        self.events.push(Event::SelectionChanged(rect));
    }

    fn selection_ended(&mut self, rect: Rect, _: Modifiers) {
        self.events.push(Event::SelectionEnded(rect));
    }

    fn pointer_button_pressed(&mut self, button: PointerButton, _: Point, _: Modifiers) {
        self.events.push(Event::Button(button));
    }
}

fn session(settings: CanvasSettings) -> (CanvasSession, Rc<RefCell<Recorder>>) {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let mut session = CanvasSession::with_settings(Size::new(800.0, 600.0), settings);
    session.set_delegate(&recorder);
    (session, recorder)
}

fn near(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

fn rect_near(a: Rect, b: Rect) -> bool {
    near(a.origin(), b.origin()) && near(Point::new(a.x1, a.y1), Point::new(b.x1, b.y1))
}

const A: InteractionId = InteractionId(1);
const B: InteractionId = InteractionId(2);
const C: InteractionId = InteractionId(3);

fn touch() -> InteractionInfo {
    InteractionInfo::touch()
}

#[test]
fn pan_without_physics_moves_by_total_delta() {
    let (mut session, recorder) = session(CanvasSettings::default().with_physics(false));
    session.pointer_down(A, Point::ZERO, touch(), 0);
    for k in 1..=10_u32 {
        session.pointer_move(A, Point::new(5.0 * f64::from(k), 0.0), u64::from(k) * 16);
    }
    session.pointer_up(A, 160);

    assert_eq!(session.coordinate().offset(), Vec2::new(50.0, 0.0));
    assert!(session.interactions().is_empty());
    assert_eq!(session.pan_interaction(), None);

    let recorder = recorder.borrow();
    assert_eq!(recorder.events.first(), Some(&Event::MoveStarted(MoveSource::Pointer)));
    assert_eq!(recorder.count(&Event::MoveUpdated(MoveSource::Pointer)), 10);
    assert_eq!(recorder.events.last(), Some(&Event::MoveEnded(MoveSource::Pointer)));
    assert!(recorder.taps().is_empty());
}

#[test]
fn released_pan_coasts_with_decaying_velocity() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::ZERO, touch(), 0);
    session.pointer_move(A, Point::new(10.0, 0.0), 16);
    session.pointer_move(A, Point::new(20.0, 0.0), 32);
    session.pointer_up(A, 32);

    let coasting = session.interaction(A).expect("interaction kept for momentum");
    assert!(coasting.is_auto());
    assert!(session.needs_frame());

    let mut now = 32;
    let mut ticks = 0;
    while session.needs_frame() {
        now += 16;
        ticks += 1;
        session.frame(now);
        assert!(ticks <= 308, "momentum should stop within 308 ticks");
    }
    assert_eq!(ticks, 308);

    let coasted = session.coordinate().offset().x - 20.0;
    assert!((coasted - 490.0).abs() < 1.5, "coasted {coasted}");
    assert!(session.interactions().is_empty());
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Pointer)), 1);
}

#[test]
fn resting_before_release_cancels_momentum() {
    let (mut session, _) = session(CanvasSettings::default());
    session.pointer_down(A, Point::ZERO, touch(), 0);
    session.pointer_move(A, Point::new(30.0, 0.0), 16);
    session.pointer_up(A, 400);
    assert!(session.interactions().is_empty());
    assert!(!session.needs_frame());
}

#[test]
fn touching_the_canvas_stops_momentum() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::ZERO, touch(), 0);
    session.pointer_move(A, Point::new(20.0, 0.0), 16);
    session.pointer_up(A, 16);
    session.frame(32);
    assert!(session.needs_frame());

    session.pointer_down(B, Point::new(200.0, 200.0), touch(), 40);
    assert!(session.interaction(A).is_none());
    assert_eq!(session.pan_interaction(), Some(B));
    assert!(!session.needs_frame());
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Pointer)), 1);
}

#[test]
fn pinch_zooms_about_the_midpoint() {
    let (mut session, _) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(300.0, 300.0), touch(), 0);
    session.pointer_down(B, Point::new(500.0, 300.0), touch(), 0);
    assert_eq!(session.pinch_interaction(), Some(PinchInteraction { first: A, second: B }));
    assert_eq!(session.pan_interaction(), None);

    let before = session.coordinate().position_at(Point::new(400.0, 300.0));
    session.pointer_move(B, Point::new(700.0, 300.0), 16);

    let coordinate = session.coordinate();
    assert!((coordinate.scale() - 2.0).abs() < 1e-12);
    assert_eq!(coordinate.angle(), 0.0);
    assert!(near(coordinate.position_at(Point::new(500.0, 300.0)), before));
}

#[test]
fn third_pointer_waits_for_a_pinch_slot() {
    let (mut session, _) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(100.0, 100.0), touch(), 0);
    session.pointer_down(B, Point::new(300.0, 100.0), touch(), 0);
    session.pointer_down(C, Point::new(200.0, 300.0), touch(), 0);
    assert_eq!(session.pinch_interaction(), Some(PinchInteraction { first: A, second: B }));

    let coordinate = session.coordinate();
    session.pointer_move(C, Point::new(260.0, 340.0), 16);
    assert_eq!(session.coordinate(), coordinate);

    session.pointer_up(A, 32);
    assert_eq!(session.pinch_interaction(), Some(PinchInteraction { first: B, second: C }));
    assert_eq!(session.pan_interaction(), None);
}

#[test]
fn pinch_rotation_is_held_back_then_caught_up() {
    let (mut session, _) = session(CanvasSettings::default());
    let pivot = Point::new(300.0, 300.0);
    let at = |degrees: f64| pivot + Vec2::from_angle(degrees.to_radians()) * 200.0;
    session.pointer_down(A, pivot, touch(), 0);
    session.pointer_down(B, at(0.0), touch(), 0);

    session.pointer_move(B, at(5.0), 16);
    assert_eq!(session.coordinate().angle(), 0.0);
    assert!(!session.interaction(A).unwrap().initial_rotation_threshold_reached());

    session.pointer_move(B, at(12.0), 32);
    assert!(session.interaction(A).unwrap().initial_rotation_threshold_reached());
    assert!(session.needs_frame());

    session.frame(300);
    assert!((session.coordinate().degrees() - 12.0).abs() < 1e-6);

    session.pointer_move(B, at(20.0), 320);
    assert!((session.coordinate().degrees() - 20.0).abs() < 1e-6);
}

#[test]
fn coincident_pinch_pointers_only_translate() {
    let (mut session, _) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(200.0, 200.0), touch(), 0);
    session.pointer_down(B, Point::new(200.0, 200.0), touch(), 0);
    session.pointer_move(B, Point::new(250.0, 200.0), 16);

    let coordinate = session.coordinate();
    assert!(coordinate.is_finite());
    assert_eq!(coordinate.scale(), 1.0);
    assert_eq!(coordinate.angle(), 0.0);
    assert_eq!(coordinate.offset(), Vec2::new(25.0, 0.0));
}

#[test]
fn magnify_in_place_scales_about_the_viewport_center() {
    let settings = CanvasSettings::default().with_magnify_in_place(true);
    let (mut session, _) = session(settings);
    session.pointer_down(A, Point::new(300.0, 300.0), touch(), 0);
    session.pointer_down(B, Point::new(500.0, 300.0), touch(), 0);
    session.pointer_move(B, Point::new(700.0, 330.0), 16);

    let coordinate = session.coordinate();
    assert_eq!(coordinate.angle(), 0.0);
    let center = Point::new(400.0, 300.0);
    assert!(near(coordinate.position_at(center), center));
    assert!(coordinate.scale() > 2.0);
}

#[test]
fn option_scroll_rotates_then_snaps_to_angle() {
    let settings = CanvasSettings::default().with_snap_angle(Some(45.0));
    let (mut session, recorder) = session(settings);
    let mouse = Point::new(400.0, 300.0);
    session.hover(mouse);
    session.set_modifiers(Modifiers::OPTION);

    session.scroll(Vec2::new(0.0, 172.0), 0);
    assert!((session.coordinate().degrees() - 43.0).abs() < 1e-9);
    assert!(near(session.coordinate().position_at(mouse), mouse));

    session.frame(100);
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Scroll)), 0);

    // Scroll end fires at 200 and starts a 300 ms snap.
    session.frame(200);
    assert!(session.needs_frame());
    session.frame(350);
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Scroll)), 0);
    session.frame(500);

    assert!((session.coordinate().degrees() - 45.0).abs() < 1e-9);
    assert!(near(session.coordinate().position_at(mouse), mouse));
    let recorder = recorder.borrow();
    assert_eq!(recorder.count(&Event::MoveStarted(MoveSource::Scroll)), 1);
    assert_eq!(recorder.count(&Event::MoveEnded(MoveSource::Scroll)), 1);
    assert_eq!(recorder.events.last(), Some(&Event::MoveEnded(MoveSource::Scroll)));
}

#[test]
fn scroll_pans_or_zooms_by_modifiers() {
    let (mut session, recorder) = session(CanvasSettings::default());
    let mouse = Point::new(200.0, 100.0);
    session.hover(mouse);

    session.scroll(Vec2::new(-12.0, 8.0), 0);
    assert_eq!(session.coordinate().offset(), Vec2::new(-12.0, 8.0));

    session.set_modifiers(Modifiers::COMMAND);
    let under_mouse = session.coordinate().position_at(mouse);
    session.scroll(Vec2::new(0.0, -250.0), 16);
    assert!((session.coordinate().scale() - 1.5).abs() < 1e-12);
    assert!(near(session.coordinate().position_at(mouse), under_mouse));

    session.gesture_ended(32);
    assert_eq!(recorder.borrow().count(&Event::MoveStarted(MoveSource::Scroll)), 1);
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Scroll)), 1);
    session.frame(1_000);
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Scroll)), 1);
}

#[test]
fn late_scroll_without_a_frame_starts_a_new_move() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.scroll(Vec2::new(5.0, 0.0), 0);
    session.scroll(Vec2::new(5.0, 0.0), 1_000);
    assert_eq!(session.coordinate().offset(), Vec2::new(10.0, 0.0));
    assert_eq!(
        recorder.borrow().events,
        [
            Event::MoveStarted(MoveSource::Scroll),
            Event::MoveUpdated(MoveSource::Scroll),
            Event::MoveEnded(MoveSource::Scroll),
            Event::MoveStarted(MoveSource::Scroll),
            Event::MoveUpdated(MoveSource::Scroll),
        ]
    );

    session.frame(1_200);
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Scroll)), 2);
}

#[test]
fn scroll_zooms_when_trackpad_is_disabled() {
    let (mut session, _) = session(CanvasSettings::default().with_trackpad(false));
    session.scroll(Vec2::new(30.0, 250.0), 0);
    assert!((session.coordinate().scale() - 0.5).abs() < 1e-12);
}

#[test]
fn magnify_is_clamped_to_scale_limits() {
    let (mut session, _) = session(CanvasSettings::default());
    for k in 0..20 {
        session.magnify(1.0, Point::new(10.0, 10.0), k * 10);
    }
    assert_eq!(session.coordinate().scale(), 100.0);
    session.magnify(-1.0, Point::new(10.0, 10.0), 300);
    assert_eq!(session.coordinate().scale(), 100.0);
}

#[test]
fn single_tap_is_delivered_when_the_window_closes() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(50.0, 50.0), touch(), 0);
    session.pointer_up(A, 100);
    assert!(recorder.borrow().taps().is_empty());
    assert_eq!(session.next_deadline(), Some(400));

    session.frame(399);
    assert!(recorder.borrow().taps().is_empty());
    session.frame(400);
    assert_eq!(recorder.borrow().taps(), [1]);
}

#[test]
fn double_tap_is_delivered_at_once() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(50.0, 50.0), touch(), 0);
    session.pointer_up(A, 50);
    session.pointer_down(A, Point::new(54.0, 52.0), touch(), 150);
    session.pointer_up(A, 200);
    assert_eq!(recorder.borrow().taps(), [2]);
    session.frame(1_000);
    assert_eq!(recorder.borrow().taps(), [2]);
}

#[test]
fn quick_tap_that_coasts_is_still_a_tap() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(50.0, 50.0), touch(), 0);
    session.pointer_move(A, Point::new(53.0, 50.0), 40);
    session.pointer_up(A, 60);
    assert!(session.interaction(A).is_some_and(|i| i.is_auto()));

    let mut now = 60;
    while now < 1_000 || session.needs_frame() {
        now += 16;
        session.frame(now);
    }
    assert!(session.coordinate().offset().x > 3.0);
    assert_eq!(recorder.borrow().taps(), [1]);
}

#[test]
fn taps_after_the_window_without_a_frame_stay_single() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(50.0, 50.0), touch(), 0);
    session.pointer_up(A, 50);
    session.pointer_down(A, Point::new(50.0, 50.0), touch(), 1_000);
    session.pointer_up(A, 1_050);
    assert_eq!(recorder.borrow().taps(), [1]);

    session.frame(5_000);
    assert_eq!(recorder.borrow().taps(), [1, 1]);
}

#[test]
fn long_press_is_not_a_tap() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(50.0, 50.0), touch(), 0);
    session.pointer_up(A, 500);
    session.frame(2_000);
    assert!(recorder.borrow().taps().is_empty());
}

#[test]
fn watchdog_drops_a_silent_interaction() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::new(50.0, 50.0), touch(), 0);
    session.frame(9_999);
    assert!(session.interaction(A).is_some());

    session.frame(10_000);
    assert!(session.interaction(A).is_none());
    assert_eq!(session.pan_interaction(), None);
    session.frame(20_000);
    assert!(recorder.borrow().taps().is_empty());

    // Late events for the dropped pointer are ignored.
    session.pointer_move(A, Point::new(90.0, 90.0), 20_016);
    session.pointer_up(A, 20_032);
    assert_eq!(session.coordinate(), Coordinate::IDENTITY);
}

#[test]
fn cancelled_pointer_neither_coasts_nor_taps() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::ZERO, touch(), 0);
    session.pointer_move(A, Point::new(20.0, 0.0), 16);
    session.pointer_cancel(A, 16);
    assert!(session.interactions().is_empty());
    assert!(!session.needs_frame());
    session.frame(1_000);
    assert!(recorder.borrow().taps().is_empty());
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Pointer)), 1);
}

#[test]
fn gestures_work_without_a_delegate() {
    let (mut session, recorder) = session(CanvasSettings::default().with_physics(false));
    drop(recorder);
    session.pointer_down(A, Point::ZERO, touch(), 0);
    session.pointer_move(A, Point::new(7.0, 3.0), 16);
    session.pointer_up(A, 32);
    assert_eq!(session.coordinate().offset(), Vec2::new(7.0, 3.0));
}

#[test]
fn reset_ends_every_role() {
    let (mut session, recorder) = session(CanvasSettings::default());
    session.pointer_down(A, Point::ZERO, touch(), 0);
    session.pointer_move(A, Point::new(20.0, 0.0), 16);
    session.reset();
    assert!(session.interactions().is_empty());
    assert_eq!(session.pan_interaction(), None);
    assert_eq!(session.next_deadline(), None);
    assert_eq!(recorder.borrow().count(&Event::MoveEnded(MoveSource::Pointer)), 1);
}

#[test]
fn pointer_profile_left_button_selects() {
    let settings = CanvasSettings::default().with_profile(InputProfile::Pointer);
    let (mut session, recorder) = session(settings);
    let left = InteractionInfo::mouse(PointerButton::Left);
    session.pointer_down(A, Point::new(10.0, 10.0), left, 0);
    assert!(session.is_selecting());
    session.pointer_move(A, Point::new(15.0, 10.0), 16);
    session.pointer_move(A, Point::new(40.0, 30.0), 32);
    session.pointer_move(A, Point::new(60.0, 30.0), 48);
    session.pointer_up(A, 64);

    assert_eq!(session.coordinate(), Coordinate::IDENTITY);
    assert!(!session.is_selecting());
    assert!(!session.needs_frame());
    let recorder = recorder.borrow();
    let [
        Event::SelectionStarted(started),
        Event::SelectionChanged(changed),
        Event::SelectionEnded(ended),
    ] = recorder.events.as_slice()
    else {
        panic!("unexpected events {:?}", recorder.events);
    };
    assert!(rect_near(*started, Rect::new(10.0, 10.0, 40.0, 30.0)));
    assert!(rect_near(*changed, Rect::new(10.0, 10.0, 60.0, 30.0)));
    assert!(rect_near(*ended, *changed));
}

#[test]
fn pointer_profile_click_is_a_tap_with_button() {
    let settings = CanvasSettings::default().with_profile(InputProfile::Pointer);
    let (mut session, recorder) = session(settings);
    let left = InteractionInfo::mouse(PointerButton::Left);
    session.pointer_down(A, Point::new(10.0, 10.0), left, 0);
    session.pointer_up(A, 80);
    session.frame(500);
    assert_eq!(
        recorder.borrow().events,
        [Event::Tap(1, Some(PointerButton::Left))]
    );
}

#[test]
fn pointer_profile_secondary_buttons_pan_and_extra_buttons_report() {
    let settings = CanvasSettings::default()
        .with_profile(InputProfile::Pointer)
        .with_physics(false);
    let (mut session, recorder) = session(settings);
    session.pointer_down(A, Point::ZERO, InteractionInfo::mouse(PointerButton::Right), 0);
    session.pointer_move(A, Point::new(30.0, 5.0), 16);
    session.pointer_up(A, 32);
    assert_eq!(session.coordinate().offset(), Vec2::new(30.0, 5.0));
    assert_eq!(session.mouse_location(), Some(Point::new(30.0, 5.0)));

    session.pointer_down(B, Point::new(1.0, 1.0), InteractionInfo::mouse(PointerButton::Other(4)), 40);
    assert!(session.interactions().is_empty());
    assert_eq!(recorder.borrow().count(&Event::Button(PointerButton::Other(4))), 1);
}

/// Keyboard/mouse input boundary
///
/// Raw terminal events are reduced to an abstract `InputEvent`, which a
/// single routine translates into zero-or-one operation submissions. The
/// animator never sees the input layer's internals.
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use graph3d_core::Operation;

/// Degrees per rotation gesture.
pub const ROTATE_STEP: f64 = 25.0;
/// Uniform factor per zoom-in gesture (zoom-out uses its inverse).
pub const ZOOM_STEP: f64 = 1.25;
/// Milliseconds each gesture animates over.
const DURATION_MS: u32 = 50;
/// Increments each gesture is broken into.
const STEPS: u32 = 12;

/// An abstract user gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
    RotateUpLeft,
    RotateUpRight,
    RotateDownLeft,
    RotateDownRight,
    RollLeft,
    RollRight,
    ZoomIn,
    ZoomOut,
    Quit,
}

/// Maps the arrow, WASD, and numpad keys the reference grapher responds to.
pub fn event_for_key(key: &KeyEvent) -> Option<InputEvent> {
    Some(match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('4') => {
            InputEvent::RotateLeft
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('6') => {
            InputEvent::RotateRight
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('8') => {
            InputEvent::RotateUp
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('2') => {
            InputEvent::RotateDown
        }
        KeyCode::Home | KeyCode::Char('7') => InputEvent::RotateUpLeft,
        KeyCode::PageUp | KeyCode::Char('9') => InputEvent::RotateUpRight,
        KeyCode::End | KeyCode::Char('1') => InputEvent::RotateDownLeft,
        KeyCode::PageDown | KeyCode::Char('3') => InputEvent::RotateDownRight,
        KeyCode::Char('-') => InputEvent::RollLeft,
        KeyCode::Char('+') => InputEvent::RollRight,
        KeyCode::Char('z') => InputEvent::ZoomIn,
        KeyCode::Char('x') => InputEvent::ZoomOut,
        KeyCode::Char('q') | KeyCode::Esc => InputEvent::Quit,
        _ => return None,
    })
}

/// Mouse wheel zoom, standing in for the reference's wheel handler.
pub fn event_for_mouse(mouse: &MouseEvent) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(InputEvent::ZoomIn),
        MouseEventKind::ScrollDown => Some(InputEvent::ZoomOut),
        _ => None,
    }
}

/// Translates a gesture into the operation it requests, if any.
pub fn operation_for(event: InputEvent) -> Option<Operation> {
    let s = ROTATE_STEP;
    Some(match event {
        InputEvent::RotateLeft => Operation::rotate(DURATION_MS, STEPS, 0.0, -s, 0.0),
        InputEvent::RotateRight => Operation::rotate(DURATION_MS, STEPS, 0.0, s, 0.0),
        InputEvent::RotateUp => Operation::rotate(DURATION_MS, STEPS, -s, 0.0, 0.0),
        InputEvent::RotateDown => Operation::rotate(DURATION_MS, STEPS, s, 0.0, 0.0),
        InputEvent::RotateUpLeft => Operation::rotate(DURATION_MS, STEPS, -s, -s, 0.0),
        InputEvent::RotateUpRight => Operation::rotate(DURATION_MS, STEPS, -s, s, 0.0),
        InputEvent::RotateDownLeft => Operation::rotate(DURATION_MS, STEPS, s, -s, 0.0),
        InputEvent::RotateDownRight => Operation::rotate(DURATION_MS, STEPS, s, s, 0.0),
        InputEvent::RollLeft => Operation::rotate(DURATION_MS, STEPS, 0.0, 0.0, -s),
        InputEvent::RollRight => Operation::rotate(DURATION_MS, STEPS, 0.0, 0.0, s),
        InputEvent::ZoomIn => {
            Operation::scale(DURATION_MS, STEPS, ZOOM_STEP, ZOOM_STEP, ZOOM_STEP)
        }
        InputEvent::ZoomOut => Operation::scale(
            DURATION_MS,
            STEPS,
            1.0 / ZOOM_STEP,
            1.0 / ZOOM_STEP,
            1.0 / ZOOM_STEP,
        ),
        InputEvent::Quit => return None,
    })
}

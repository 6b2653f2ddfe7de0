//! W3C pointer actions for touch gestures.
//!
//! Every gesture is composed from four primitives: move, press (down),
//! pause and release (up). The builders here produce [`ActionSequence`]s that
//! serialize to the `pointer` input source of the W3C Actions API:
//!
//! - [`tap`]: move, down, up
//! - [`long_press`]: move, down, pause, up
//! - [`swipe`]: move, down, move over a duration, up

use std::time::Duration;

use serde_json::{json, Value};

use crate::wire::{millis, ELEMENT_KEY};

/// Pointer id used for single-finger gestures.
pub const FINGER: &str = "finger";

/// Pointer id used for mouse-style actions in web contexts.
pub const MOUSE: &str = "mouse";

/// Coordinate space of a pointer move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Absolute screen coordinates.
    Viewport,
    /// Offsets from the centre of an element, by element id.
    Element(String),
}

impl Origin {
    fn to_json(&self) -> Value {
        match self {
            Origin::Viewport => json!("viewport"),
            Origin::Element(id) => json!({ ELEMENT_KEY: id }),
        }
    }
}

/// Kind of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Touch,
    Mouse,
}

impl PointerKind {
    fn as_str(self) -> &'static str {
        match self {
            PointerKind::Touch => "touch",
            PointerKind::Mouse => "mouse",
        }
    }
}

/// One step of a pointer sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerAction {
    /// Move the pointer to `(x, y)` relative to `origin` over `duration`.
    Move {
        duration: Duration,
        origin: Origin,
        x: i32,
        y: i32,
    },
    /// Press the primary button / put the finger down.
    Down,
    /// Hold the current state.
    Pause(Duration),
    /// Release the primary button / lift the finger.
    Up,
}

impl PointerAction {
    fn to_json(&self) -> Value {
        match self {
            PointerAction::Move {
                duration,
                origin,
                x,
                y,
            } => json!({
                "type": "pointerMove",
                "duration": millis(*duration),
                "origin": origin.to_json(),
                "x": x,
                "y": y,
            }),
            PointerAction::Down => json!({"type": "pointerDown", "button": 0}),
            PointerAction::Pause(duration) => {
                json!({"type": "pause", "duration": millis(*duration)})
            }
            PointerAction::Up => json!({"type": "pointerUp", "button": 0}),
        }
    }
}

/// A sequence of actions for one pointer input source.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSequence {
    pub id: String,
    pub kind: PointerKind,
    pub actions: Vec<PointerAction>,
}

impl ActionSequence {
    /// Starts an empty touch sequence for the default finger.
    pub fn finger() -> Self {
        Self {
            id: FINGER.to_string(),
            kind: PointerKind::Touch,
            actions: Vec::new(),
        }
    }

    /// Starts an empty mouse sequence.
    pub fn mouse() -> Self {
        Self {
            id: MOUSE.to_string(),
            kind: PointerKind::Mouse,
            actions: Vec::new(),
        }
    }

    pub fn move_to(mut self, origin: Origin, x: i32, y: i32, duration: Duration) -> Self {
        self.actions.push(PointerAction::Move {
            duration,
            origin,
            x,
            y,
        });
        self
    }

    pub fn down(mut self) -> Self {
        self.actions.push(PointerAction::Down);
        self
    }

    pub fn pause(mut self, duration: Duration) -> Self {
        self.actions.push(PointerAction::Pause(duration));
        self
    }

    pub fn up(mut self) -> Self {
        self.actions.push(PointerAction::Up);
        self
    }

    /// Serializes to a W3C input source object.
    pub fn to_json(&self) -> Value {
        json!({
            "type": "pointer",
            "id": self.id,
            "parameters": {"pointerType": self.kind.as_str()},
            "actions": self.actions.iter().map(PointerAction::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Builds the body of `POST /session/{id}/actions`.
pub fn actions_request(sequences: &[ActionSequence]) -> Value {
    json!({"actions": sequences.iter().map(ActionSequence::to_json).collect::<Vec<_>>()})
}

// ---------------------------------------------------------------------------
// Gesture builders
// ---------------------------------------------------------------------------

/// A single tap at `(x, y)` relative to `origin`.
pub fn tap(origin: Origin, x: i32, y: i32) -> ActionSequence {
    ActionSequence::finger()
        .move_to(origin, x, y, Duration::ZERO)
        .down()
        .up()
}

/// A press held for `hold` at `(x, y)` relative to `origin`.
pub fn long_press(origin: Origin, x: i32, y: i32, hold: Duration) -> ActionSequence {
    ActionSequence::finger()
        .move_to(origin, x, y, Duration::ZERO)
        .down()
        .pause(hold)
        .up()
}

/// A swipe between two viewport points taking `duration`.
pub fn swipe(from: (i32, i32), to: (i32, i32), duration: Duration) -> ActionSequence {
    ActionSequence::finger()
        .move_to(Origin::Viewport, from.0, from.1, Duration::ZERO)
        .down()
        .move_to(Origin::Viewport, to.0, to.1, duration)
        .up()
}

/// A mouse hover over an element with an offset from its centre.
pub fn hover(element_id: &str, dx: i32, dy: i32) -> ActionSequence {
    ActionSequence::mouse().move_to(Origin::Element(element_id.to_string()), dx, dy, Duration::ZERO)
}

/// A mouse double click on the centre of an element.
pub fn double_click(element_id: &str) -> ActionSequence {
    ActionSequence::mouse()
        .move_to(Origin::Element(element_id.to_string()), 0, 0, Duration::ZERO)
        .down()
        .up()
        .down()
        .up()
}

//! Input adapters for the puzzle.
//!
//! Mouse and touch input are collected by different backends but both come
//! out as the same [`GestureCommand`]s, so the puzzle itself never knows
//! which device is driving it.

use core::time::Duration;

use bevy::input::touch::{Touch, Touches};
use bevy::prelude::*;
use card_helpers::input::{cursor_world_position, screen_to_world};
use strum::Display;

/// Which device drives drags for this puzzle visit. Picked once when the puzzle mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InputBackend {
    Pointer,
    Touch,
}

impl InputBackend {
    pub fn select(forced: Option<Self>, touch_capable: bool) -> Self {
        match forced {
            Some(backend) => backend,
            None if touch_capable => Self::Touch,
            None => Self::Pointer,
        }
    }

    pub fn gesture(self, config: &crate::config::PuzzleConfig) -> Box<dyn GestureBackend> {
        match self {
            Self::Pointer => Box::new(PointerGesture::default()),
            Self::Touch => Box::new(TouchGesture::new(
                config.touch_start_delay,
                config.touch_slop,
            )),
        }
    }
}

/// Device input for one frame, already converted to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    Pressed(Vec2),
    Moved(Vec2),
    Released(Vec2),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureCommand {
    /// Pick up whatever is under `origin`; the pointer is already at `pointer`
    Start { origin: Vec2, pointer: Vec2 },
    Track(Vec2),
    Drop(Vec2),
    Cancel,
}

pub trait GestureBackend: Send + Sync {
    fn translate(&mut self, input: RawInput, now: Duration) -> Option<GestureCommand>;
}

/// Mouse drags start on press.
#[derive(Debug, Default)]
pub struct PointerGesture {
    dragging: bool,
}

impl GestureBackend for PointerGesture {
    fn translate(&mut self, input: RawInput, _now: Duration) -> Option<GestureCommand> {
        match input {
            RawInput::Pressed(position) => {
                self.dragging = true;
                Some(GestureCommand::Start {
                    origin: position,
                    pointer: position,
                })
            }
            RawInput::Moved(position) => self.dragging.then_some(GestureCommand::Track(position)),
            RawInput::Released(position) => {
                let was_dragging = core::mem::take(&mut self.dragging);
                was_dragging.then_some(GestureCommand::Drop(position))
            }
            RawInput::Cancelled => {
                let was_dragging = core::mem::take(&mut self.dragging);
                was_dragging.then_some(GestureCommand::Cancel)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTouch {
    origin: Vec2,
    pressed_at: Duration,
}

/// Touch drags start only once the finger has been held for `delay` and has
/// moved at least `slop` pixels, so taps and scroll flicks are not drags.
#[derive(Debug)]
pub struct TouchGesture {
    delay: Duration,
    slop: f32,
    pending: Option<PendingTouch>,
    dragging: bool,
}

impl TouchGesture {
    pub const fn new(delay: Duration, slop: f32) -> Self {
        Self {
            delay,
            slop,
            pending: None,
            dragging: false,
        }
    }

    fn reset(&mut self) -> bool {
        self.pending = None;
        core::mem::take(&mut self.dragging)
    }
}

impl GestureBackend for TouchGesture {
    fn translate(&mut self, input: RawInput, now: Duration) -> Option<GestureCommand> {
        match input {
            // A press while a touch is already being followed belongs to someone else.
            RawInput::Pressed(_) if self.dragging || self.pending.is_some() => None,
            RawInput::Pressed(position) => {
                self.pending = Some(PendingTouch {
                    origin: position,
                    pressed_at: now,
                });
                None
            }
            RawInput::Moved(position) => {
                if self.dragging {
                    return Some(GestureCommand::Track(position));
                }
                let pending = self.pending?;
                let held = now.saturating_sub(pending.pressed_at) >= self.delay;
                let moved = pending.origin.distance(position) >= self.slop;
                if !(held && moved) {
                    return None;
                }
                self.pending = None;
                self.dragging = true;
                Some(GestureCommand::Start {
                    origin: pending.origin,
                    pointer: position,
                })
            }
            RawInput::Released(position) => {
                self.reset().then_some(GestureCommand::Drop(position))
            }
            RawInput::Cancelled => self.reset().then_some(GestureCommand::Cancel),
        }
    }
}

/// What produced a [`RawInput`]: the mouse, or one finger by its touch id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Mouse,
    Finger(u64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInput {
    pub contact: Contact,
    pub input: RawInput,
}

impl ContactInput {
    pub const fn new(contact: Contact, input: RawInput) -> Self {
        Self { contact, input }
    }
}

/// Lets one contact own the gesture from press to release. Input from every
/// other finger, or from the mouse while a finger owns it, is dropped.
#[derive(Debug, Default)]
pub struct ContactFilter {
    owner: Option<Contact>,
}

impl ContactFilter {
    pub const fn owner(&self) -> Option<Contact> {
        self.owner
    }

    pub fn admit(&mut self, inputs: impl IntoIterator<Item = ContactInput>) -> Vec<RawInput> {
        let mut admitted = Vec::new();
        for ContactInput { contact, input } in inputs {
            match (self.owner, input) {
                (None, RawInput::Pressed(_)) => {
                    self.owner = Some(contact);
                    admitted.push(input);
                }
                (Some(owner), RawInput::Released(_) | RawInput::Cancelled) if owner == contact => {
                    self.owner = None;
                    admitted.push(input);
                }
                (Some(owner), _) if owner == contact => admitted.push(input),
                _ => {}
            }
        }
        admitted
    }
}

/// Active backend for the current puzzle visit.
#[derive(Resource)]
pub struct PuzzleInput {
    pub backend: InputBackend,
    pub contacts: ContactFilter,
    pub gesture: Box<dyn GestureBackend>,
}

impl PuzzleInput {
    pub fn new(backend: InputBackend, config: &crate::config::PuzzleConfig) -> Self {
        Self {
            backend,
            contacts: ContactFilter::default(),
            gesture: backend.gesture(config),
        }
    }

    /// The touch backend also listens to the mouse, so touch-capable laptops
    /// can still be used with a mouse.
    pub const fn reads_touches(&self) -> bool {
        matches!(self.backend, InputBackend::Touch)
    }

    pub fn commands(
        &mut self,
        inputs: impl IntoIterator<Item = ContactInput>,
        now: Duration,
    ) -> Vec<GestureCommand> {
        self.contacts
            .admit(inputs)
            .into_iter()
            .filter_map(|input| self.gesture.translate(input, now))
            .collect()
    }
}

pub fn mouse_contact_inputs(
    buttons: &ButtonInput<MouseButton>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Vec<ContactInput> {
    let Some(position) = cursor_world_position(windows, camera) else {
        // Cursor left the window: a drag cannot finish anywhere meaningful.
        return if buttons.just_released(MouseButton::Left) {
            vec![ContactInput::new(Contact::Mouse, RawInput::Cancelled)]
        } else {
            Vec::new()
        };
    };

    let mut inputs = Vec::with_capacity(2);
    if buttons.just_pressed(MouseButton::Left) {
        inputs.push(RawInput::Pressed(position));
    }
    if buttons.pressed(MouseButton::Left) {
        inputs.push(RawInput::Moved(position));
    }
    if buttons.just_released(MouseButton::Left) {
        inputs.push(RawInput::Released(position));
    }
    inputs
        .into_iter()
        .map(|input| ContactInput::new(Contact::Mouse, input))
        .collect()
}

/// Every finger's input for this frame, tagged with its touch id.
pub fn touch_contact_inputs(
    touches: &Touches,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Vec<ContactInput> {
    let mut inputs = Vec::new();
    let mut push = |touch: &Touch, input: fn(Vec2) -> RawInput| {
        if let Some(position) = screen_to_world(camera, touch.position()) {
            inputs.push(ContactInput::new(Contact::Finger(touch.id()), input(position)));
        }
    };
    for touch in touches.iter_just_pressed() {
        push(touch, RawInput::Pressed);
    }
    for touch in touches.iter() {
        push(touch, RawInput::Moved);
    }
    for touch in touches.iter_just_released() {
        push(touch, RawInput::Released);
    }
    inputs.extend(
        touches
            .iter_just_canceled()
            .map(|touch| ContactInput::new(Contact::Finger(touch.id()), RawInput::Cancelled)),
    );
    inputs
}

//! Player input
//!
//! Input sources (keyboard/pointer handlers, the autopilot, tests) push
//! [`InputEvent`]s through a bounded lock-free channel. The simulation drains
//! the channel once per tick and folds the events into an [`InputState`].

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::util::vec2::Vec2;

/// Logical keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Run,
    Flashlight,
    Interact,
    Restart,
}

/// Raw input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer moved to this playfield position
    PointerMoved(Vec2),
}

/// Key state as seen by one tick.
///
/// Movement and run are level-triggered (held). Flashlight, interact and
/// restart are edge-triggered: a key-down latches a press that the tick
/// consumes exactly once.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    run: bool,
    flashlight_pressed: bool,
    interact_pressed: bool,
    restart_pressed: bool,
    pointer: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.set_key(key, true),
            InputEvent::KeyUp(key) => self.set_key(key, false),
            InputEvent::PointerMoved(pos) => self.pointer = Some(pos),
        }
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Up => self.up = down,
            Key::Down => self.down = down,
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Run => self.run = down,
            Key::Flashlight => self.flashlight_pressed |= down,
            Key::Interact => self.interact_pressed |= down,
            Key::Restart => self.restart_pressed |= down,
        }
    }

    /// Raw movement axes in {-1, 0, 1}, y pointing down
    pub fn movement(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }

    pub fn is_running(&self) -> bool {
        self.run
    }

    pub fn take_flashlight_toggle(&mut self) -> bool {
        std::mem::take(&mut self.flashlight_pressed)
    }

    pub fn take_interact(&mut self) -> bool {
        std::mem::take(&mut self.interact_pressed)
    }

    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart_pressed)
    }

    /// Pointer position reported since the last tick, if any
    pub fn take_pointer(&mut self) -> Option<Vec2> {
        self.pointer.take()
    }

    /// Release everything (used on restart)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Lock-free input buffer using a bounded channel
///
/// Any number of sources can submit events without blocking; the game loop
/// drains all pending events at the start of each tick.
pub struct InputBuffer {
    /// Sender side - cloned to each input source
    sender: Sender<InputEvent>,
    /// Receiver side - used by the game loop
    receiver: Receiver<InputEvent>,
}

impl InputBuffer {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Create a new sender handle for an input source
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Try to submit an event (non-blocking). Returns false if the buffer is full.
    #[inline]
    pub fn try_submit(&self, event: InputEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    /// Fold every pending event into `state`, in submission order
    pub fn drain_into(&self, state: &mut InputState) -> usize {
        let mut count = 0;
        for event in self.receiver.try_iter() {
            state.apply(event);
            count += 1;
        }
        count
    }

    /// Discard pending events
    pub fn discard(&self) {
        for _ in self.receiver.try_iter() {}
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        // A frame rarely carries more than a handful of key transitions
        Self::new(256)
    }
}

/// Clonable sender handle for input sources
#[derive(Clone)]
pub struct InputSender {
    sender: Sender<InputEvent>,
}

impl InputSender {
    /// Submit an event (non-blocking)
    #[inline]
    pub fn try_send(&self, event: InputEvent) -> Result<(), InputBufferError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => InputBufferError::Full,
            TrySendError::Disconnected(_) => InputBufferError::Disconnected,
        })
    }
}

/// Input buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputBufferError {
    #[error("input buffer is full")]
    Full,
    #[error("input buffer disconnected")]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_axes() {
        let mut state = InputState::new();
        state.apply(InputEvent::KeyDown(Key::Right));
        state.apply(InputEvent::KeyDown(Key::Up));
        assert_eq!(state.movement(), Vec2::new(1.0, -1.0));

        state.apply(InputEvent::KeyDown(Key::Left));
        assert_eq!(state.movement(), Vec2::new(0.0, -1.0));

        state.apply(InputEvent::KeyUp(Key::Up));
        assert_eq!(state.movement(), Vec2::ZERO);
    }

    #[test]
    fn test_edge_triggered_keys_consumed_once() {
        let mut state = InputState::new();
        state.apply(InputEvent::KeyDown(Key::Interact));
        assert!(state.take_interact());
        assert!(!state.take_interact());

        // Releasing before the tick still counts as one press
        state.apply(InputEvent::KeyDown(Key::Flashlight));
        state.apply(InputEvent::KeyUp(Key::Flashlight));
        assert!(state.take_flashlight_toggle());
        assert!(!state.take_flashlight_toggle());
    }

    #[test]
    fn test_pointer_taken_once() {
        let mut state = InputState::new();
        state.apply(InputEvent::PointerMoved(Vec2::new(3.0, 4.0)));
        assert_eq!(state.take_pointer(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(state.take_pointer(), None);
    }

    #[test]
    fn test_buffer_drain_preserves_order() {
        let buffer = InputBuffer::new(10);
        assert!(buffer.try_submit(InputEvent::KeyDown(Key::Run)));
        assert!(buffer.try_submit(InputEvent::KeyUp(Key::Run)));

        let mut state = InputState::new();
        assert_eq!(buffer.drain_into(&mut state), 2);
        assert!(!state.is_running());
        assert_eq!(buffer.drain_into(&mut state), 0);
    }

    #[test]
    fn test_buffer_backpressure() {
        let buffer = InputBuffer::new(2);
        let sender = buffer.sender();
        assert!(sender.try_send(InputEvent::KeyDown(Key::Up)).is_ok());
        assert!(sender.try_send(InputEvent::KeyDown(Key::Down)).is_ok());
        assert_eq!(
            sender.try_send(InputEvent::KeyDown(Key::Left)),
            Err(InputBufferError::Full)
        );

        buffer.discard();
        assert!(sender.try_send(InputEvent::KeyDown(Key::Left)).is_ok());
    }

    #[test]
    fn test_buffer_default_capacity() {
        let buffer = InputBuffer::default();
        for _ in 0..256 {
            assert!(buffer.try_submit(InputEvent::KeyDown(Key::Run)));
        }
        assert!(!buffer.try_submit(InputEvent::KeyUp(Key::Run)));
    }
}

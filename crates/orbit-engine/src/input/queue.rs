/// Input event types the runtime understands.
/// Pointer coordinates are canvas pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A click/tap at (x, y).
    PointerClick { x: f32, y: f32 },
    /// The navigation menu selected an entry; `None` clears the selection.
    MenuSelect { id: Option<u32> },
    /// Step the focus to the next (or previous) entry.
    Cycle { backwards: bool },
    /// A key was pressed.
    KeyDown { key_code: u32 },
    /// The canvas was resized.
    Resize { width: f32, height: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerClick { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: 27 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn keeps_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::MenuSelect { id: Some(3) });
        q.push(InputEvent::MenuSelect { id: None });
        let events: Vec<_> = q.iter().copied().collect();
        assert_eq!(events[0], InputEvent::MenuSelect { id: Some(3) });
        assert_eq!(events[1], InputEvent::MenuSelect { id: None });
    }
}

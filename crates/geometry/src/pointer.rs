//! Pointer input as an injected capability.
//!
//! Drags subscribe to a [`PointerSource`] for the duration of a gesture only.
//! The subscription lives in a [`ListenerGuard`], so it is released however the
//! gesture ends: a normal release, an abandoned drag or the owner being dropped.

use crate::drag::{RotaryDrag, RotaryScale};
use crate::point::Point;
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    /// The gesture was abandoned, e.g. focus was lost mid-drag.
    Cancel,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Down(p) | Self::Move(p) | Self::Up(p) => Some(*p),
            Self::Cancel => None,
        }
    }

    pub fn ends_gesture(&self) -> bool {
        matches!(self, Self::Up(_) | Self::Cancel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub trait PointerSource {
    fn subscribe(&self) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);

    /// Registers a listener that is released when the guard is dropped.
    fn listen(&self) -> ListenerGuard<'_, Self>
    where
        Self: Sized,
    {
        ListenerGuard {
            id: self.subscribe(),
            source: self,
        }
    }
}

pub struct ListenerGuard<'a, S: PointerSource> {
    source: &'a S,
    id: ListenerId,
}

impl<S: PointerSource> ListenerGuard<'_, S> {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<S: PointerSource> Drop for ListenerGuard<'_, S> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
    }
}

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    listeners: Vec<ListenerId>,
}

/// In-process capture registry. It only records which listeners currently
/// hold pointer capture; the owner of the input surface keeps delivering
/// events to the active drag itself.
#[derive(Debug, Default)]
pub struct PointerHub {
    state: Mutex<HubState>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    pub fn is_capturing(&self) -> bool {
        self.listener_count() > 0
    }

    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.state.lock().listeners.contains(&id)
    }
}

impl PointerSource for PointerHub {
    fn subscribe(&self) -> ListenerId {
        let mut state = self.state.lock();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.push(id);
        log::trace!("pointer listener {:?} registered", id);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let mut state = self.state.lock();
        state.listeners.retain(|l| *l != id);
        log::trace!("pointer listener {:?} released", id);
    }
}

/// A rotary drag that holds global pointer capture while it is alive.
pub struct DragSession<'a, S: PointerSource> {
    drag: RotaryDrag,
    guard: ListenerGuard<'a, S>,
}

impl<'a, S: PointerSource> DragSession<'a, S> {
    pub fn start(
        source: &'a S,
        center: Point,
        pointer: Point,
        start_offset: f64,
        max_offset: f64,
        scale: RotaryScale,
    ) -> Self {
        let guard = source.listen();
        let drag = RotaryDrag::begin(center, pointer, start_offset, max_offset, scale);
        log::debug!("drag session started (listener {:?})", guard.id());
        Self { drag, guard }
    }

    /// Applies a pointer event. Returns the current offset.
    pub fn handle(&mut self, event: &PointerEvent) -> f64 {
        match event {
            PointerEvent::Move(p) | PointerEvent::Up(p) => self.drag.update(*p),
            PointerEvent::Down(_) | PointerEvent::Cancel => self.drag.offset(),
        }
    }

    pub fn offset(&self) -> f64 {
        self.drag.offset()
    }

    pub fn rotation(&self) -> f64 {
        self.drag.rotation()
    }

    pub fn listener(&self) -> ListenerId {
        self.guard.id()
    }

    /// Freezes the drag at its last offset and releases the listener.
    pub fn end(self) -> f64 {
        let Self { drag, guard } = self;
        drop(guard);
        let offset = drag.finish();
        log::debug!("drag session ended at offset {:.2}", offset);
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle;

    fn at(degrees: f64) -> Point {
        angle::angle_to_position(degrees, 40.0, Point::new(100.0, 100.0))
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let hub = PointerHub::new();
        {
            let guard = hub.listen();
            assert!(hub.is_listening(guard.id()));
            assert_eq!(hub.listener_count(), 1);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_listener_ids_are_unique() {
        let hub = PointerHub::new();
        let a = hub.listen();
        let b = hub.listen();
        assert_ne!(a.id(), b.id());
        drop(a);
        assert_eq!(hub.listener_count(), 1);
        assert!(hub.is_listening(b.id()));
    }

    #[test]
    fn test_session_end_releases_listener() {
        let hub = PointerHub::new();
        let mut session = DragSession::start(
            &hub,
            Point::new(100.0, 100.0),
            at(0.0),
            0.0,
            100.0,
            RotaryScale::default(),
        );
        assert!(hub.is_capturing());
        session.handle(&PointerEvent::Move(at(45.0)));
        let offset = session.end();
        assert!((offset - 25.0).abs() < 1e-9);
        assert!(!hub.is_capturing());
    }

    #[test]
    fn test_abandoned_session_releases_listener() {
        let hub = PointerHub::new();
        let session = DragSession::start(
            &hub,
            Point::new(100.0, 100.0),
            at(0.0),
            0.0,
            100.0,
            RotaryScale::default(),
        );
        assert_eq!(hub.listener_count(), 1);
        drop(session);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_cancel_keeps_last_offset() {
        let hub = PointerHub::new();
        let mut session = DragSession::start(
            &hub,
            Point::new(100.0, 100.0),
            at(0.0),
            0.0,
            100.0,
            RotaryScale::default(),
        );
        let moved = session.handle(&PointerEvent::Move(at(30.0)));
        assert_eq!(session.handle(&PointerEvent::Cancel), moved);
    }

    #[test]
    fn test_event_helpers() {
        assert!(PointerEvent::Cancel.ends_gesture());
        assert!(PointerEvent::Up(Point::default()).ends_gesture());
        assert!(!PointerEvent::Move(Point::default()).ends_gesture());
        assert_eq!(PointerEvent::Cancel.position(), None);
    }
}

use crate::config::{self, Config};
use crate::events::AppEvent;
use prometheus_geometry::Point;
use prometheus_geometry::drag::rotation_degrees;
use prometheus_geometry::pointer::{DragSession, PointerEvent, PointerHub};

/// Scroll state of the rotary template list after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub offset: f64,
    pub rotation: f64,
    pub dragging: bool,
}

/// Drives the rotary template list from pointer events.
///
/// The wheel sits at the viewport center. A press anywhere starts a drag that
/// holds pointer capture on the hub until release, cancel or end of input.
pub struct Session<'a> {
    hub: &'a PointerHub,
    config: Config,
    item_count: usize,
    center: Point,
    offset: f64,
    drag: Option<DragSession<'a, PointerHub>>,
}

impl<'a> Session<'a> {
    pub fn new(hub: &'a PointerHub, config: Config, item_count: usize) -> Self {
        let center = config.viewport.center();
        Self {
            hub,
            config,
            item_count,
            center,
            offset: 0.0,
            drag: None,
        }
    }

    pub fn max_offset(&self) -> f64 {
        self.config.drag.max_offset(self.item_count)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn frame(&self) -> Frame {
        let offset = self
            .drag
            .as_ref()
            .map_or(self.offset, |drag| drag.offset());
        Frame {
            offset,
            rotation: rotation_degrees(offset, self.max_offset()),
            dragging: self.is_dragging(),
        }
    }

    /// Applies one event; returns the new frame when the list moved or the
    /// gesture changed state.
    pub fn handle(&mut self, event: AppEvent) -> Option<Frame> {
        match event {
            AppEvent::Pointer(pointer) => self.handle_pointer(pointer),
            AppEvent::Scroll(delta) => {
                if self.is_dragging() || delta == 0.0 || !delta.is_finite() {
                    return None;
                }
                let step = self.config.drag.item_extent * delta.signum();
                self.offset = (self.offset + step).clamp(0.0, self.max_offset());
                Some(self.frame())
            }
            AppEvent::ConfigReload => {
                self.reload(config::load_or_default());
                Some(self.frame())
            }
            AppEvent::InputClosed => self.end_drag(),
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> Option<Frame> {
        match (&mut self.drag, event) {
            (None, PointerEvent::Down(p)) => {
                self.drag = Some(DragSession::start(
                    self.hub,
                    self.center,
                    p,
                    self.offset,
                    self.max_offset(),
                    self.config.drag.scale(),
                ));
                Some(self.frame())
            }
            (Some(drag), PointerEvent::Move(_)) => {
                let before = drag.offset();
                let after = drag.handle(&event);
                (after != before).then(|| self.frame())
            }
            (Some(drag), PointerEvent::Up(_)) => {
                drag.handle(&event);
                self.end_drag()
            }
            (Some(_), PointerEvent::Cancel) => self.end_drag(),
            // stray events outside a gesture
            _ => None,
        }
    }

    fn end_drag(&mut self) -> Option<Frame> {
        let drag = self.drag.take()?;
        self.offset = drag.end();
        Some(self.frame())
    }

    pub fn reload(&mut self, config: Config) {
        self.end_drag();
        self.config = config;
        self.center = self.config.viewport.center();
        self.offset = self.offset.clamp(0.0, self.max_offset());
        log::info!("Configuration reloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_geometry::angle::angle_to_position;

    fn config() -> Config {
        config::parse_config("").unwrap()
    }

    fn at(session: &Session<'_>, degrees: f64) -> Point {
        angle_to_position(degrees, 60.0, session.center)
    }

    #[test]
    fn test_drag_scrolls_and_releases_capture() {
        let hub = PointerHub::new();
        // 10 rows of 34 in a 170 window
        let mut session = Session::new(&hub, config(), 10);
        assert_eq!(session.max_offset(), 170.0);

        session.handle(AppEvent::Pointer(PointerEvent::Down(at(&session, 0.0))));
        assert!(hub.is_capturing());

        let frame = session
            .handle(AppEvent::Pointer(PointerEvent::Move(at(&session, 90.0))))
            .unwrap();
        assert!((frame.offset - 85.0).abs() < 1e-9);
        assert!((frame.rotation - 180.0).abs() < 1e-9);

        let frame = session
            .handle(AppEvent::Pointer(PointerEvent::Up(at(&session, 90.0))))
            .unwrap();
        assert!(!frame.dragging);
        assert!(!hub.is_capturing());
        assert!((session.frame().offset - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_keeps_offset_and_releases() {
        let hub = PointerHub::new();
        let mut session = Session::new(&hub, config(), 10);
        session.handle(AppEvent::Pointer(PointerEvent::Down(at(&session, 0.0))));
        session.handle(AppEvent::Pointer(PointerEvent::Move(at(&session, 45.0))));
        let frame = session
            .handle(AppEvent::Pointer(PointerEvent::Cancel))
            .unwrap();
        assert!((frame.offset - 42.5).abs() < 1e-9);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_input_closed_mid_drag_releases() {
        let hub = PointerHub::new();
        let mut session = Session::new(&hub, config(), 10);
        session.handle(AppEvent::Pointer(PointerEvent::Down(at(&session, 0.0))));
        session.handle(AppEvent::InputClosed);
        assert!(!hub.is_capturing());
    }

    #[test]
    fn test_dropping_session_releases() {
        let hub = PointerHub::new();
        {
            let mut session = Session::new(&hub, config(), 10);
            session.handle(AppEvent::Pointer(PointerEvent::Down(at(&session, 0.0))));
            assert!(hub.is_capturing());
        }
        assert!(!hub.is_capturing());
    }

    #[test]
    fn test_stray_events_are_ignored() {
        let hub = PointerHub::new();
        let mut session = Session::new(&hub, config(), 10);
        assert!(
            session
                .handle(AppEvent::Pointer(PointerEvent::Move(Point::new(1.0, 1.0))))
                .is_none()
        );
        assert!(session.handle(AppEvent::Pointer(PointerEvent::Cancel)).is_none());
    }

    #[test]
    fn test_scroll_moves_one_row() {
        let hub = PointerHub::new();
        let mut session = Session::new(&hub, config(), 10);
        let frame = session.handle(AppEvent::Scroll(3.0)).unwrap();
        assert_eq!(frame.offset, 34.0);
        let frame = session.handle(AppEvent::Scroll(-1.0)).unwrap();
        assert_eq!(frame.offset, 0.0);
        let frame = session.handle(AppEvent::Scroll(-1.0)).unwrap();
        assert_eq!(frame.offset, 0.0);
    }

    #[test]
    fn test_short_list_never_scrolls() {
        let hub = PointerHub::new();
        let mut session = Session::new(&hub, config(), 3);
        session.handle(AppEvent::Pointer(PointerEvent::Down(at(&session, 0.0))));
        let frame = session.handle(AppEvent::Pointer(PointerEvent::Move(at(&session, 90.0))));
        assert!(frame.is_none());
        assert_eq!(session.frame().rotation, 0.0);
    }

    #[test]
    fn test_reload_clamps_offset() {
        let hub = PointerHub::new();
        let mut session = Session::new(&hub, config(), 10);
        session.handle(AppEvent::Scroll(1.0));
        session.handle(AppEvent::Scroll(1.0));
        let mut smaller = config();
        smaller.drag.list_extent = 310.0;
        session.reload(smaller);
        assert_eq!(session.frame().offset, 30.0);
    }

    #[test]
    fn test_non_finite_scroll_is_ignored() {
        let hub = PointerHub::new();
        let mut session = Session::new(&hub, config(), 10);
        session.handle(AppEvent::Scroll(1.0));
        assert!(session.handle(AppEvent::Scroll(f64::NAN)).is_none());
        assert!(session.handle(AppEvent::Scroll(f64::NEG_INFINITY)).is_none());
        assert_eq!(session.frame().offset, 34.0);
    }
}

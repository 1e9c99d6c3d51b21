use prometheus_geometry::pointer::PointerEvent;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Pointer(PointerEvent),
    Scroll(f64),
    ConfigReload,
    InputClosed,
}

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::events::{EventHub, PointerEvent, PointerKind, Subscription};

pub const MIN_SIDEBAR_WIDTH: u32 = 300;
pub const MAX_SIDEBAR_WIDTH: u32 = 800;
pub const DEFAULT_SIDEBAR_WIDTH: u32 = 400;

/// Sidebar width implied by a pointer at `pointer_x`, kept within the allowed range.
pub fn clamp_width(window_width: u32, pointer_x: f64) -> u32 {
    let implied = f64::from(window_width) - pointer_x;
    if implied.is_nan() {
        return MIN_SIDEBAR_WIDTH;
    }
    implied
        .round()
        .clamp(f64::from(MIN_SIDEBAR_WIDTH), f64::from(MAX_SIDEBAR_WIDTH)) as u32
}

/// Drag-to-resize for the inspector panel.
///
/// Move and up listeners live in the active drag and are dropped when it
/// ends, so nothing stays attached to the document between gestures.
#[derive(Clone)]
pub struct SidebarResizer {
    inner: Arc<Inner>,
}

struct Inner {
    hub: EventHub,
    width: Mutex<u32>,
    window_width: Mutex<u32>,
    drag: Mutex<Option<Drag>>,
}

struct Drag {
    _moves: Subscription,
    _release: Subscription,
}

impl SidebarResizer {
    pub fn new(hub: EventHub, initial_width: u32, window_width: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                hub,
                width: Mutex::new(initial_width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)),
                window_width: Mutex::new(window_width),
                drag: Mutex::new(None),
            }),
        }
    }

    pub fn width(&self) -> u32 {
        *self.inner.width.lock()
    }

    pub fn set_window_width(&self, window_width: u32) {
        *self.inner.window_width.lock() = window_width;
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.drag.lock().is_some()
    }

    /// Pointer went down on the resize handle.
    pub fn begin_drag(&self) {
        let mut drag = self.inner.drag.lock();
        if drag.is_some() {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let moves = self.inner.hub.listen(PointerKind::Move, move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_move(event);
            }
        });
        let weak = Arc::downgrade(&self.inner);
        let release = self.inner.hub.listen(PointerKind::Up, move |_| {
            end(&weak);
        });

        tracing::debug!(width = *self.inner.width.lock(), "sidebar drag started");
        *drag = Some(Drag {
            _moves: moves,
            _release: release,
        });
    }

    /// End the gesture without a pointer-up (teardown, lost capture).
    pub fn end_drag(&self) {
        end(&Arc::downgrade(&self.inner));
    }
}

impl Inner {
    fn on_move(&self, event: &PointerEvent) {
        let window_width = *self.window_width.lock();
        *self.width.lock() = clamp_width(window_width, event.x);
    }
}

fn end(inner: &Weak<Inner>) {
    if let Some(inner) = inner.upgrade() {
        let drag = inner.drag.lock().take();
        if drag.is_some() {
            tracing::debug!(width = *inner.width.lock(), "sidebar drag ended");
        }
    }
}

impl std::fmt::Debug for SidebarResizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidebarResizer")
            .field("width", &self.width())
            .field("dragging", &self.is_dragging())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resizer(hub: &EventHub) -> SidebarResizer {
        SidebarResizer::new(hub.clone(), DEFAULT_SIDEBAR_WIDTH, 1000)
    }

    #[test]
    fn test_clamp_width_bounds() {
        assert_eq!(clamp_width(1000, 950.0), 300);
        assert_eq!(clamp_width(1000, -1000.0), 800);
        assert_eq!(clamp_width(1000, 450.0), 550);
    }

    #[test]
    fn test_clamp_width_non_finite_pointer() {
        assert_eq!(clamp_width(1000, f64::NAN), MIN_SIDEBAR_WIDTH);
        assert_eq!(clamp_width(1000, f64::INFINITY), MIN_SIDEBAR_WIDTH);
        assert_eq!(clamp_width(1000, f64::NEG_INFINITY), MAX_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_drag_to_narrow_clamps_to_minimum() {
        let hub = EventHub::new();
        let r = resizer(&hub);
        r.begin_drag();
        // 1000 - 950 = 50
        hub.dispatch(&PointerEvent::moved(950.0, 10.0));
        assert_eq!(r.width(), 300);
    }

    #[test]
    fn test_drag_to_wide_clamps_to_maximum() {
        let hub = EventHub::new();
        let r = resizer(&hub);
        r.set_window_width(2500);
        r.begin_drag();
        // 2500 - 500 = 2000
        hub.dispatch(&PointerEvent::moved(500.0, 10.0));
        assert_eq!(r.width(), 800);
    }

    #[test]
    fn test_width_tracks_moves_during_drag_only() {
        let hub = EventHub::new();
        let r = resizer(&hub);
        hub.dispatch(&PointerEvent::moved(400.0, 0.0));
        assert_eq!(r.width(), DEFAULT_SIDEBAR_WIDTH, "no drag, no resize");

        r.begin_drag();
        hub.dispatch(&PointerEvent::moved(400.0, 0.0));
        assert_eq!(r.width(), 600);
        hub.dispatch(&PointerEvent::up(400.0, 0.0));

        hub.dispatch(&PointerEvent::moved(700.0, 0.0));
        assert_eq!(r.width(), 600);
    }

    #[test]
    fn test_listeners_exist_only_during_drag() {
        let hub = EventHub::new();
        let r = resizer(&hub);
        assert_eq!(hub.total_listeners(), 0);

        r.begin_drag();
        r.begin_drag();
        assert!(r.is_dragging());
        assert_eq!(hub.listener_count(PointerKind::Move), 1);
        assert_eq!(hub.listener_count(PointerKind::Up), 1);

        hub.dispatch(&PointerEvent::up(0.0, 0.0));
        assert!(!r.is_dragging());
        assert_eq!(hub.total_listeners(), 0);
    }

    #[test]
    fn test_end_drag_and_drop_detach() {
        let hub = EventHub::new();
        let r = resizer(&hub);
        r.begin_drag();
        r.end_drag();
        assert_eq!(hub.total_listeners(), 0);

        r.begin_drag();
        drop(r);
        assert_eq!(hub.total_listeners(), 0);
    }

    #[test]
    fn test_initial_width_is_clamped() {
        let hub = EventHub::new();
        assert_eq!(SidebarResizer::new(hub.clone(), 100, 1000).width(), 300);
        assert_eq!(SidebarResizer::new(hub, 5000, 1000).width(), 800);
    }
}

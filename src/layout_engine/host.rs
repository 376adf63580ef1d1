use crate::model::WindowId;

/// Services the layout needs from the window manager hosting it.
///
/// The layout never renders or focuses anything itself. After a mutation it
/// asks the host to repaint and to move input focus.
pub trait LayoutHost {
    /// Recompute and redraw the geometry of every window in the layout.
    fn layout_all(&mut self);

    /// Move input focus to `wid`.
    fn focus_window(&mut self, wid: WindowId);

    /// The column at `index` was destroyed.
    fn column_removed(&mut self, _index: usize) {}
}

/// A host that ignores every request. Useful when only the arrangement
/// itself is of interest, e.g. when replaying an event log.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl LayoutHost for NoopHost {
    fn layout_all(&mut self) {}

    fn focus_window(&mut self, _wid: WindowId) {}
}

/// A host that records every request, in order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingHost {
    pub requests: Vec<HostRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    LayoutAll,
    Focus(WindowId),
    ColumnRemoved(usize),
}

impl RecordingHost {
    pub fn take(&mut self) -> Vec<HostRequest> { std::mem::take(&mut self.requests) }
}

impl LayoutHost for RecordingHost {
    fn layout_all(&mut self) { self.requests.push(HostRequest::LayoutAll); }

    fn focus_window(&mut self, wid: WindowId) { self.requests.push(HostRequest::Focus(wid)); }

    fn column_removed(&mut self, index: usize) {
        self.requests.push(HostRequest::ColumnRemoved(index));
    }
}

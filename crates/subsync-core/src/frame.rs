//! Frame source port.
//!
//! The scheduler asks for "the next frame" and the host decides when that is.
//! `FrameLoop` is the host-side pump: it hands out at most one pending frame
//! and reports it due on each pump iteration.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

pub trait FrameRequester {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    next_id: u64,
    pending: Option<FrameId>,
    scheduled: usize,
    cancelled: usize,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending frame, if any. The caller runs one tick for it.
    pub fn take_due(&mut self) -> Option<FrameId> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total frames ever requested.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl FrameRequester for FrameLoop {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending = Some(id);
        self.scheduled += 1;
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.pending == Some(id) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

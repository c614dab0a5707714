//! Change notification for camera consumers
//!
//! A renderer can either register an observer that is called synchronously
//! from inside every camera mutator, or poll the accumulated [`ChangeFlags`]
//! once per frame.

use std::fmt;

/// Which derived matrices a mutation invalidated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraChange {
    /// View, rotation or viewport matrices must be recomputed
    View,
    /// The projection matrix must be recomputed
    Projection,
}

/// Receives camera change notifications
pub trait CameraObserver {
    fn camera_changed(&mut self, change: CameraChange);
}

impl<F: FnMut(CameraChange)> CameraObserver for F {
    fn camera_changed(&mut self, change: CameraChange) {
        self(change)
    }
}

/// Dirty flags accumulated since the last [`ChangeFlags::take`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeFlags {
    pub view: bool,
    pub projection: bool,
}

impl ChangeFlags {
    pub fn is_empty(&self) -> bool {
        !self.view && !self.projection
    }

    fn mark(&mut self, change: CameraChange) {
        match change {
            CameraChange::View => self.view = true,
            CameraChange::Projection => self.projection = true,
        }
    }

    /// Return the current flags and reset them
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Observer registry plus dirty flags, owned by the camera
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    observers: Vec<Box<dyn CameraObserver>>,
    flags: ChangeFlags,
}

impl ChangeNotifier {
    pub(crate) fn add(&mut self, observer: Box<dyn CameraObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn notify(&mut self, change: CameraChange) {
        self.flags.mark(change);
        for observer in &mut self.observers {
            observer.camera_changed(change);
        }
    }

    pub(crate) fn flags(&self) -> ChangeFlags {
        self.flags
    }

    pub(crate) fn take(&mut self) -> ChangeFlags {
        self.flags.take()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .field("flags", &self.flags)
            .finish()
    }
}

use super::registry::{Focus, Registry};

/// An accepted focus transition. Built only by [`request_focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    focused: Focus,
    previous: Focus,
}

impl FocusChange {
    pub fn focused(&self) -> Focus {
        self.focused
    }

    pub fn previous(&self) -> Focus {
        self.previous
    }

    /// Whether `target` must receive this change.
    pub fn affects(&self, target: Focus) -> bool {
        self.focused == target || self.previous == target
    }

    pub fn is_focused(&self, target: Focus) -> bool {
        self.focused == target
    }
}

/// Checked constructor for [`FocusChange`]. Both pairs must be registered;
/// otherwise the request is dropped and only a warning is logged.
pub fn request_focus(registry: &Registry, new: Focus, old: Focus) -> Option<FocusChange> {
    if !registry.contains(new) {
        tracing::warn!(
            view = %new.view,
            pane = %new.pane,
            "rejected focus request: pane does not belong to view"
        );
        return None;
    }
    if !registry.contains(old) {
        tracing::warn!(
            view = %old.view,
            pane = %old.pane,
            "rejected focus request: previous focus is not registered"
        );
        return None;
    }

    Some(FocusChange {
        focused: new,
        previous: old,
    })
}

use super::document::{FormHost, NodeId};

/// A document pointer-down closes the list only when it lands outside both the form and the
/// detached suggestion surface. Suggestion rows handle their own press first, so by the time
/// a press on them reaches the document the commit has already happened.
pub fn is_outside(target: NodeId, host: &dyn FormHost) -> bool {
    !host.form_contains(target) && !host.surface_contains(target)
}

use crate::event::HookPoint;
use std::collections::HashMap;
use std::sync::RwLock;

/// Callback invoked with the entity being written
pub type HookCallback<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// Registered lifecycle callbacks for one entity type.
///
/// An empty set is a no-op at every point. Callbacks run synchronously in
/// registration order. A callback must not register further callbacks on the
/// set that is currently running it.
pub struct HookSet<T> {
    callbacks: RwLock<HashMap<HookPoint, Vec<HookCallback<T>>>>,
}

impl<T> std::fmt::Debug for HookSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookSet")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

impl<T> HookSet<T> {
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Builder form of [`add_callback`](Self::add_callback)
    pub fn on<F>(self, point: HookPoint, callback: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.add_callback(point, callback);
        self
    }

    pub fn before_insert<F>(self, callback: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.on(HookPoint::BeforeInsert, callback)
    }

    pub fn after_insert<F>(self, callback: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.on(HookPoint::AfterInsert, callback)
    }

    pub fn before_update<F>(self, callback: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.on(HookPoint::BeforeUpdate, callback)
    }

    pub fn after_update<F>(self, callback: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.on(HookPoint::AfterUpdate, callback)
    }

    pub fn before_delete<F>(self, callback: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.on(HookPoint::BeforeDelete, callback)
    }

    pub fn after_delete<F>(self, callback: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.on(HookPoint::AfterDelete, callback)
    }

    /// Add a callback for a hook point
    pub fn add_callback<F>(&self, point: HookPoint, callback: F)
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.entry(point).or_default().push(Box::new(callback));
        }
    }

    /// Run every callback registered for `point` against `target`
    pub fn run(&self, point: HookPoint, target: &mut T) {
        if let Ok(callbacks) = self.callbacks.read() {
            if let Some(registered) = callbacks.get(&point) {
                tracing::trace!("[HOOK] {} ({} callbacks)", point, registered.len());
                for callback in registered {
                    callback(target);
                }
            }
        }
    }

    /// Clear all callbacks
    pub fn clear_callbacks(&self) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.clear();
        }
    }

    /// Get number of registered callbacks across all points
    pub fn callback_count(&self) -> usize {
        self.callbacks
            .read()
            .map(|c| c.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Get number of callbacks registered for one point
    pub fn count_for(&self, point: HookPoint) -> usize {
        self.callbacks
            .read()
            .map(|c| c.get(&point).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl<T> Default for HookSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Note {
        body: String,
        trail: Vec<&'static str>,
    }

    #[test]
    fn test_empty_set_is_noop() {
        let hooks = HookSet::<Note>::new();
        let mut note = Note::default();
        for point in HookPoint::ALL {
            hooks.run(point, &mut note);
        }
        assert!(note.trail.is_empty());
        assert_eq!(hooks.callback_count(), 0);
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let hooks = HookSet::<Note>::new()
            .before_insert(|n| n.trail.push("first"))
            .before_insert(|n| n.trail.push("second"))
            .after_insert(|n| n.trail.push("after"));

        let mut note = Note::default();
        hooks.run(HookPoint::BeforeInsert, &mut note);
        assert_eq!(note.trail, vec!["first", "second"]);

        hooks.run(HookPoint::AfterInsert, &mut note);
        assert_eq!(note.trail, vec!["first", "second", "after"]);
    }

    #[test]
    fn test_callbacks_can_mutate_target() {
        let hooks = HookSet::<Note>::new().before_update(|n| n.body = n.body.trim().to_string());
        let mut note = Note {
            body: "  padded  ".to_string(),
            ..Default::default()
        };
        hooks.run(HookPoint::BeforeUpdate, &mut note);
        assert_eq!(note.body, "padded");
    }

    #[test]
    fn test_points_are_isolated() {
        let hooks = HookSet::<Note>::new().before_delete(|n| n.trail.push("delete"));
        let mut note = Note::default();
        hooks.run(HookPoint::BeforeInsert, &mut note);
        hooks.run(HookPoint::AfterDelete, &mut note);
        assert!(note.trail.is_empty());
        assert_eq!(hooks.count_for(HookPoint::BeforeDelete), 1);
        assert_eq!(hooks.count_for(HookPoint::AfterDelete), 0);
    }

    #[test]
    fn test_clear_callbacks() {
        let hooks = HookSet::<Note>::new()
            .after_update(|n| n.trail.push("x"))
            .after_delete(|n| n.trail.push("y"));
        assert_eq!(hooks.callback_count(), 2);
        hooks.clear_callbacks();
        assert_eq!(hooks.callback_count(), 0);
    }
}

use super::Identity;

/// Handle returned by [`SessionWatch::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

pub type SessionListener = Box<dyn FnMut(Option<&Identity>) + Send>;

/// Current-session cell with explicit change subscriptions.
///
/// A listener is invoked once at registration with the session as it stands,
/// then again on every change, with `None` meaning signed out. The top-level
/// screen choice hangs off this: no listener, no screen updates.
pub struct SessionWatch {
    current: Option<Identity>,
    listeners: Vec<(SubscriptionId, SessionListener)>,
    next_id: usize,
}

impl SessionWatch {
    pub fn new() -> Self {
        Self {
            current: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn subscribe(&mut self, mut listener: SessionListener) -> SubscriptionId {
        listener(self.current.as_ref());
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sub, _)| *sub != id);
    }

    /// Replace the session and notify every listener.
    pub fn set(&mut self, session: Option<Identity>) {
        self.current = session;
        for (_, listener) in &mut self.listeners {
            listener(self.current.as_ref());
        }
    }
}

impl Default for SessionWatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn identity(id: &str) -> Identity {
        Identity::new(id, "user@example.com", "token".to_string())
    }

    #[test]
    fn test_subscribe_fires_immediately_with_current() {
        let mut watch = SessionWatch::new();
        watch.set(Some(identity("Ada")));

        let (tx, rx) = mpsc::channel();
        watch.subscribe(Box::new(move |session| {
            let _ = tx.send(session.map(|s| s.user_id.clone()));
        }));

        assert_eq!(rx.try_recv().unwrap(), Some("ada".to_string()));
    }

    #[test]
    fn test_listeners_see_every_change() {
        let mut watch = SessionWatch::new();
        let (tx, rx) = mpsc::channel();
        watch.subscribe(Box::new(move |session| {
            let _ = tx.send(session.is_some());
        }));

        watch.set(Some(identity("ada")));
        watch.set(None);

        let seen: Vec<bool> = rx.try_iter().collect();
        assert_eq!(seen, vec![false, true, false]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut watch = SessionWatch::new();
        let (tx, rx) = mpsc::channel();
        let id = watch.subscribe(Box::new(move |_| {
            let _ = tx.send(());
        }));
        assert_eq!(rx.try_iter().count(), 1);

        watch.unsubscribe(id);
        watch.set(Some(identity("ada")));
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_user_id_is_lowercased() {
        assert_eq!(identity("Ada.Lovelace").user_id, "ada.lovelace");
    }
}

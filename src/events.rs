use crate::error::BridgeError;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const ERROR_EVENT: &str = "binderror";

/// The placeholder's public event-dispatch surface.
pub trait EventSink {
    fn dispatch(&self, name: &str, detail: Value);
}

/// Reports one failed bridge call on the placeholder's error channel.
pub fn surface_error(sink: &dyn EventSink, err: &BridgeError) {
    sink.dispatch(
        ERROR_EVENT,
        json!({ "code": err.code, "message": err.message }),
    );
}

/// Native code sometimes sends its payload as serialized JSON text.
pub fn normalize_payload(payload: Value) -> Value {
    match payload {
        Value::String(raw) => serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw)),
        other => other,
    }
}

pub type Route = Rc<dyn Fn(&str, Value)>;

/// Routes native-originated events to the placeholder that owns the
/// addressed overlay. Shared by every driver on a page.
#[derive(Clone, Default)]
pub struct EventRouter {
    routes: Rc<RefCell<HashMap<String, Route>>>,
}

impl EventRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, instance_id: &str, route: Route) {
        self.routes
            .borrow_mut()
            .insert(instance_id.to_string(), route);
    }

    pub fn unregister(&self, instance_id: &str) -> bool {
        self.routes.borrow_mut().remove(instance_id).is_some()
    }

    #[must_use]
    pub fn is_registered(&self, instance_id: &str) -> bool {
        self.routes.borrow().contains_key(instance_id)
    }

    /// Forwards `(action, payload)` to the route for `instance_id`. Events
    /// for unknown ids (late events after removal) are dropped.
    pub fn deliver(&self, instance_id: &str, action: &str, payload: Value) -> bool {
        let route = self.routes.borrow().get(instance_id).cloned();
        match route {
            Some(route) => {
                route(action, normalize_payload(payload));
                true
            }
            None => {
                tracing::trace!(instance_id, action, "dropping event for unrouted instance");
                false
            }
        }
    }
}

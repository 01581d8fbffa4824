use crate::bridge::Bridge;
use crate::config::SyncConfig;
use crate::descriptor::ShadowDescriptor;
use crate::error::BridgeError;
use crate::events::EventRouter;
use crate::protocol::{HostEnvelope, NativeEnvelope};
use crate::registry::CallbackRegistry;
use crate::snapshot::Snapshot;
use futures_channel::oneshot;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError};

/// [`Bridge`] over the framed envelope protocol.
///
/// Calls are queued on a bounded channel drained by [`writer_loop`]; their
/// futures settle when the matching `ack` or `error` envelope is passed to
/// [`ChannelBridge::dispatch`]. Inbound `event` envelopes go to the router.
///
/// [`writer_loop`]: crate::protocol::writer_loop
pub struct ChannelBridge {
    tx: SyncSender<HostEnvelope>,
    queue_capacity: usize,
    calls: CallbackRegistry<Result<(), BridgeError>>,
    router: EventRouter,
}

impl ChannelBridge {
    pub fn new(tx: SyncSender<HostEnvelope>, config: &SyncConfig, router: EventRouter) -> Self {
        Self {
            tx,
            queue_capacity: config.outbound_queue_cap,
            calls: CallbackRegistry::new("call-"),
            router,
        }
    }

    /// Settles the call or routes the event carried by `envelope`. Returns
    /// `false` for acks of unknown calls and events for unrouted instances.
    pub fn dispatch(&self, envelope: NativeEnvelope) -> bool {
        match envelope {
            NativeEnvelope::Ack { call } => self.settle(&call, Ok(())),
            NativeEnvelope::Error {
                call,
                code,
                message,
            } => self.settle(&call, Err(BridgeError { code, message })),
            NativeEnvelope::Event {
                instance_id,
                params,
            } => self.router.deliver(&instance_id, &params.action, params.e),
        }
    }

    /// Dispatches every envelope already waiting on `rx`.
    pub fn pump(&self, rx: &Receiver<NativeEnvelope>) -> usize {
        let mut dispatched = 0;
        while let Ok(envelope) = rx.try_recv() {
            self.dispatch(envelope);
            dispatched += 1;
        }
        dispatched
    }

    pub fn pending_calls(&self) -> usize {
        self.calls.len()
    }

    fn settle(&self, call: &str, result: Result<(), BridgeError>) -> bool {
        let settled = self.calls.invoke(call, result);
        if !settled {
            tracing::debug!(call, "reply for unknown bridge call");
        }
        settled
    }

    async fn call(
        &self,
        build: impl FnOnce(String) -> HostEnvelope,
    ) -> Result<(), BridgeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let call = self.calls.register(move |result| {
            let _ = reply_tx.send(result);
        });

        match self.tx.try_send(build(call.clone())) {
            Ok(()) => {}
            Err(TrySendError::Full(_envelope)) => {
                self.calls.cancel(&call);
                return Err(BridgeError::queue_full(self.queue_capacity));
            }
            Err(TrySendError::Disconnected(_envelope)) => {
                self.calls.cancel(&call);
                return Err(BridgeError::disconnected());
            }
        }

        reply_rx.await.unwrap_or_else(|_| Err(BridgeError::closed()))
    }
}

impl Bridge for ChannelBridge {
    async fn insert(
        &self,
        descriptor: &ShadowDescriptor,
        snapshot: &Snapshot,
    ) -> Result<(), BridgeError> {
        self.call(|call| HostEnvelope::Insert {
            call,
            descriptor: descriptor.clone(),
            params: snapshot.to_json(),
        })
        .await
    }

    async fn update(
        &self,
        descriptor: &ShadowDescriptor,
        snapshot: &Snapshot,
    ) -> Result<(), BridgeError> {
        self.call(|call| HostEnvelope::Update {
            call,
            descriptor: descriptor.clone(),
            params: snapshot.to_json(),
        })
        .await
    }

    async fn remove(&self, descriptor: &ShadowDescriptor) -> Result<(), BridgeError> {
        self.call(|call| HostEnvelope::Remove {
            call,
            descriptor: descriptor.clone(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::join;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;

    fn bridge(capacity: usize) -> (ChannelBridge, Receiver<HostEnvelope>, EventRouter) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        let router = EventRouter::new();
        let config = SyncConfig {
            outbound_queue_cap: capacity,
            ..SyncConfig::default()
        };
        (ChannelBridge::new(tx, &config, router.clone()), rx, router)
    }

    fn snapshot() -> Snapshot {
        [("top", 1.0), ("left", 2.0)].into_iter().collect()
    }

    #[test]
    fn ack_settles_the_matching_call() {
        let (bridge, host_rx, _router) = bridge(4);
        let descriptor = ShadowDescriptor::allocate("cover-view", "page");

        let (result, ()) = pollster::block_on(join(
            bridge.insert(&descriptor, &snapshot()),
            async {
                let envelope = host_rx.try_recv().expect("insert queued");
                assert!(matches!(envelope, HostEnvelope::Insert { .. }));
                assert!(bridge.dispatch(NativeEnvelope::Ack {
                    call: envelope.call().to_string(),
                }));
            },
        ));

        assert_eq!(result, Ok(()));
        assert_eq!(bridge.pending_calls(), 0);
    }

    #[test]
    fn error_reply_is_passed_through_verbatim() {
        let (bridge, host_rx, _router) = bridge(4);
        let descriptor = ShadowDescriptor::allocate("camera", "page");

        let (result, ()) = pollster::block_on(join(bridge.remove(&descriptor), async {
            let envelope = host_rx.try_recv().expect("remove queued");
            bridge.dispatch(NativeEnvelope::Error {
                call: envelope.call().to_string(),
                code: "2001".to_string(),
                message: "view not found".to_string(),
            });
        }));

        assert_eq!(result, Err(BridgeError::new("2001", "view not found")));
    }

    #[test]
    fn full_queue_fails_fast() {
        let (bridge, _host_rx, _router) = bridge(1);
        let descriptor = ShadowDescriptor::allocate("button", "page");

        bridge
            .tx
            .try_send(HostEnvelope::Remove {
                call: "seed".to_string(),
                descriptor: descriptor.clone(),
            })
            .expect("seed queue");

        let result = pollster::block_on(bridge.update(&descriptor, &snapshot()));
        assert_eq!(result.expect_err("queue full").code, "queue_full");
        assert_eq!(bridge.pending_calls(), 0);
    }

    #[test]
    fn disconnected_channel_is_reported() {
        let (bridge, host_rx, _router) = bridge(1);
        drop(host_rx);

        let descriptor = ShadowDescriptor::allocate("button", "page");
        let result = pollster::block_on(bridge.remove(&descriptor));
        assert_eq!(result.expect_err("disconnected").code, "bridge_disconnected");
    }

    #[test]
    fn events_are_routed_and_late_acks_ignored() {
        let (bridge, _host_rx, router) = bridge(1);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        router.register(
            "button-9",
            Rc::new(move |action: &str, payload: serde_json::Value| {
                sink.borrow_mut().push((action.to_string(), payload));
            }),
        );

        let (native_tx, native_rx) = mpsc::channel();
        native_tx
            .send(NativeEnvelope::Ack {
                call: "call-404".to_string(),
            })
            .expect("queue ack");
        native_tx
            .send(NativeEnvelope::Event {
                instance_id: "button-9".to_string(),
                params: crate::protocol::EventParams {
                    action: "tap".to_string(),
                    e: json!("{\"detail\":{\"x\":4}}"),
                },
            })
            .expect("queue event");

        assert_eq!(bridge.pump(&native_rx), 2);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "tap");
        assert_eq!(seen[0].1["detail"]["x"], 4);
    }
}

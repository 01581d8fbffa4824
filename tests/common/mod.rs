#![allow(dead_code)]

use futures_channel::oneshot;
use serde_json::Value;
use shadow_sync::{
    Bridge, BridgeError, EventRouter, EventSink, LifecycleDriver, ShadowAdapter,
    ShadowContext, ShadowDescriptor, Snapshot, SnapshotBuilder, SyncConfig, SyncPolicy,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Insert(String, Snapshot),
    Update(String, Snapshot),
    Remove(String),
}

enum Outcome {
    Fail(BridgeError),
    Gated(oneshot::Receiver<Result<(), BridgeError>>),
}

/// Bridge double that records every call. Calls succeed immediately unless an
/// outcome was scripted for them, in call order.
#[derive(Default)]
pub struct ScriptedBridge {
    calls: RefCell<Vec<Call>>,
    outcomes: RefCell<VecDeque<Option<Outcome>>>,
}

impl ScriptedBridge {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn succeed_next(&self) {
        self.outcomes.borrow_mut().push_back(None);
    }

    pub fn fail_next(&self, code: &str, message: &str) {
        self.outcomes
            .borrow_mut()
            .push_back(Some(Outcome::Fail(BridgeError::new(code, message))));
    }

    /// The next unscripted call stays pending until the returned sender fires.
    pub fn gate_next(&self) -> oneshot::Sender<Result<(), BridgeError>> {
        let (tx, rx) = oneshot::channel();
        self.outcomes
            .borrow_mut()
            .push_back(Some(Outcome::Gated(rx)));
        tx
    }

    async fn settle(&self) -> Result<(), BridgeError> {
        let outcome = self.outcomes.borrow_mut().pop_front().flatten();
        match outcome {
            None => Ok(()),
            Some(Outcome::Fail(err)) => Err(err),
            Some(Outcome::Gated(rx)) => rx.await.unwrap_or_else(|_| Err(BridgeError::closed())),
        }
    }
}

impl Bridge for ScriptedBridge {
    async fn insert(
        &self,
        descriptor: &ShadowDescriptor,
        snapshot: &Snapshot,
    ) -> Result<(), BridgeError> {
        self.calls.borrow_mut().push(Call::Insert(
            descriptor.instance_id.clone(),
            snapshot.clone(),
        ));
        self.settle().await
    }

    async fn update(
        &self,
        descriptor: &ShadowDescriptor,
        snapshot: &Snapshot,
    ) -> Result<(), BridgeError> {
        self.calls.borrow_mut().push(Call::Update(
            descriptor.instance_id.clone(),
            snapshot.clone(),
        ));
        self.settle().await
    }

    async fn remove(&self, descriptor: &ShadowDescriptor) -> Result<(), BridgeError> {
        self.calls
            .borrow_mut()
            .push(Call::Remove(descriptor.instance_id.clone()));
        self.settle().await
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<(String, Value)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.borrow().clone()
    }

    pub fn named(&self, name: &str) -> Vec<Value> {
        self.events
            .borrow()
            .iter()
            .filter(|(event, _)| event == name)
            .map(|(_, detail)| detail.clone())
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn dispatch(&self, name: &str, detail: Value) {
        self.events.borrow_mut().push((name.to_string(), detail));
    }
}

/// Minimal overlay whose policy is chosen per test.
pub struct Overlay {
    pub policy: SyncPolicy,
}

impl ShadowAdapter for Overlay {
    type Props = bool;

    fn kind(&self) -> &'static str {
        "overlay"
    }

    fn policy(&self) -> SyncPolicy {
        self.policy
    }

    fn write_fields(&self, hidden: &bool, snapshot: &mut SnapshotBuilder) {
        snapshot.field("hidden", *hidden);
    }

    fn event_name(&self, action: &str) -> Option<&'static str> {
        match action {
            "tap" => Some("bindtap"),
            "touchstart" => Some("bindtouchstart"),
            _ => None,
        }
    }
}

pub struct Harness<A: ShadowAdapter> {
    pub bridge: Rc<ScriptedBridge>,
    pub ctx: ShadowContext<ScriptedBridge>,
    pub sink: Rc<RecordingSink>,
    pub driver: LifecycleDriver<A, ScriptedBridge>,
}

pub fn context() -> ShadowContext<ScriptedBridge> {
    ShadowContext::new(
        Rc::new(ScriptedBridge::default()),
        EventRouter::new(),
        &SyncConfig::default(),
    )
}

pub fn harness<A: ShadowAdapter>(adapter: A) -> Harness<A> {
    harness_in(context(), adapter)
}

pub fn harness_in<A: ShadowAdapter>(ctx: ShadowContext<ScriptedBridge>, adapter: A) -> Harness<A> {
    let sink = Rc::new(RecordingSink::default());
    let driver = LifecycleDriver::new(&ctx, adapter, sink.clone());
    Harness {
        bridge: ctx.bridge.clone(),
        ctx,
        sink,
        driver,
    }
}

pub fn overlay(policy: SyncPolicy) -> Harness<Overlay> {
    harness(Overlay { policy })
}

pub fn snap(fields: &[(&str, f64)], hidden: bool) -> Snapshot {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), shadow_sync::SnapshotValue::Number(*value)))
        .chain([("hidden".to_string(), shadow_sync::SnapshotValue::Bool(hidden))])
        .collect()
}

pub fn at(top: f64) -> Snapshot {
    snap(&[("left", 0.0), ("top", top)], false)
}

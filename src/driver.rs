use crate::adapter::ShadowAdapter;
use crate::bridge::Bridge;
use crate::config::{SyncConfig, SyncPolicy};
use crate::descriptor::ShadowDescriptor;
use crate::error::{BridgeError, SnapshotError};
use crate::events::{EventRouter, EventSink, Route, surface_error};
use crate::registry::KindRegistry;
use crate::snapshot::{Geometry, Snapshot};
use futures_channel::oneshot;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Page-level collaborators shared by every driver on the page.
pub struct ShadowContext<B> {
    pub bridge: Rc<B>,
    pub router: EventRouter,
    pub singletons: KindRegistry,
    pub owner_id: String,
}

impl<B> Clone for ShadowContext<B> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
            router: self.router.clone(),
            singletons: self.singletons.clone(),
            owner_id: self.owner_id.clone(),
        }
    }
}

impl<B: Bridge> ShadowContext<B> {
    pub fn new(bridge: Rc<B>, router: EventRouter, config: &SyncConfig) -> Self {
        Self {
            bridge,
            router,
            singletons: KindRegistry::new(),
            owner_id: config.owner_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Absent,
    Inserting,
    Inserted,
    Removing,
}

enum Op {
    Insert(Snapshot),
    Sync(Snapshot),
    Remove,
}

/// Requests that arrived while a bridge call was in flight. A pending remove
/// runs before any desired snapshot; the snapshot slot keeps only the latest.
#[derive(Default)]
struct Pending {
    remove: bool,
    desired: Option<(Snapshot, bool)>,
}

impl Pending {
    fn push(&mut self, op: Op) {
        match op {
            Op::Remove => {
                self.remove = true;
                self.desired = None;
            }
            Op::Insert(snapshot) => self.desired = Some((snapshot, true)),
            Op::Sync(snapshot) => match self.desired.take() {
                Some((_, insert)) => self.desired = Some((snapshot, insert)),
                None if self.remove => {
                    tracing::trace!("dropping sync queued behind a remove");
                }
                None => self.desired = Some((snapshot, false)),
            },
        }
    }

    fn pop(&mut self) -> Option<Op> {
        if std::mem::take(&mut self.remove) {
            return Some(Op::Remove);
        }

        self.desired.take().map(|(snapshot, insert)| {
            if insert {
                Op::Insert(snapshot)
            } else {
                Op::Sync(snapshot)
            }
        })
    }
}

struct SyncState {
    phase: Phase,
    baseline: Option<Snapshot>,
    in_flight: bool,
    /// Set by `ensure_removed`, cleared only by `ensure_inserted`.
    detached: bool,
    pending: Pending,
    removal_waiters: Vec<oneshot::Sender<Result<(), BridgeError>>>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            phase: Phase::Absent,
            baseline: None,
            in_flight: false,
            detached: false,
            pending: Pending::default(),
            removal_waiters: Vec::new(),
        }
    }
}

/// Keeps one native overlay inserted, updated and removed in lockstep with
/// its placeholder.
///
/// At most one bridge call is in flight at a time. Requests made while a call
/// is in flight are coalesced and replayed by whichever caller owns the
/// in-flight call, once it settles. Bridge failures are reported once on the
/// placeholder's `binderror` channel and returned; they never panic.
pub struct LifecycleDriver<A: ShadowAdapter, B: Bridge> {
    descriptor: ShadowDescriptor,
    adapter: Rc<A>,
    policy: SyncPolicy,
    ctx: ShadowContext<B>,
    sink: Rc<dyn EventSink>,
    state: RefCell<SyncState>,
}

impl<A: ShadowAdapter, B: Bridge> LifecycleDriver<A, B> {
    pub fn new(ctx: &ShadowContext<B>, adapter: A, sink: Rc<dyn EventSink>) -> Self {
        let descriptor = ShadowDescriptor::allocate(adapter.kind(), ctx.owner_id.clone());
        let policy = adapter.policy();

        Self {
            descriptor,
            adapter: Rc::new(adapter),
            policy,
            ctx: ctx.clone(),
            sink,
            state: RefCell::new(SyncState::default()),
        }
    }

    pub fn descriptor(&self) -> &ShadowDescriptor {
        &self.descriptor
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn baseline(&self) -> Option<Snapshot> {
        self.state.borrow().baseline.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.borrow().in_flight
    }

    /// Placeholder attached: build the first snapshot and insert.
    pub async fn attach(
        &self,
        props: &A::Props,
        geometry: Option<Geometry>,
    ) -> Result<(), BridgeError> {
        match self.adapter.build_snapshot(props, geometry) {
            Ok(snapshot) => self.ensure_inserted(snapshot).await,
            Err(err) => {
                self.skip_for(err);
                Ok(())
            }
        }
    }

    /// Placeholder data or geometry changed.
    pub async fn sync(
        &self,
        props: &A::Props,
        geometry: Option<Geometry>,
    ) -> Result<(), BridgeError> {
        match self.adapter.build_snapshot(props, geometry) {
            Ok(snapshot) => self.ensure_synced(snapshot).await,
            Err(err) => {
                self.skip_for(err);
                Ok(())
            }
        }
    }

    pub async fn detach(&self) -> Result<(), BridgeError> {
        self.ensure_removed().await
    }

    pub async fn ensure_inserted(&self, snapshot: Snapshot) -> Result<(), BridgeError> {
        {
            let mut state = self.state.borrow_mut();
            let reattach = std::mem::take(&mut state.detached);
            let phase = state.phase;

            if state.in_flight && (reattach || matches!(phase, Phase::Absent | Phase::Removing)) {
                state.pending.push(Op::Insert(snapshot));
                return Ok(());
            }

            if state.in_flight || phase != Phase::Absent {
                tracing::debug!(
                    instance_id = %self.descriptor.instance_id,
                    "overlay already present; insert ignored"
                );
                return Ok(());
            }

            state.in_flight = true;
        }

        self.drive(Op::Insert(snapshot)).await
    }

    pub async fn ensure_synced(&self, snapshot: Snapshot) -> Result<(), BridgeError> {
        {
            let mut state = self.state.borrow_mut();
            if state.detached {
                tracing::debug!(
                    instance_id = %self.descriptor.instance_id,
                    "placeholder detached; sync ignored"
                );
                return Ok(());
            }

            if state.in_flight {
                state.pending.push(Op::Sync(snapshot));
                return Ok(());
            }

            if state.phase == Phase::Absent && !self.policy.auto_recover_insert {
                tracing::debug!(
                    instance_id = %self.descriptor.instance_id,
                    "overlay absent; sync ignored"
                );
                return Ok(());
            }

            state.in_flight = true;
        }

        self.drive(Op::Sync(snapshot)).await
    }

    pub async fn ensure_removed(&self) -> Result<(), BridgeError> {
        let waiter = {
            let mut state = self.state.borrow_mut();
            state.detached = true;

            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.removal_waiters.push(tx);
                if state.phase == Phase::Removing {
                    // Join the remove on the wire; a re-attach queued behind it is void.
                    state.pending.desired = None;
                } else {
                    state.pending.push(Op::Remove);
                }
                Some(rx)
            } else if state.phase == Phase::Inserted {
                state.in_flight = true;
                None
            } else {
                drop(state);
                self.ctx.router.unregister(&self.descriptor.instance_id);
                return Ok(());
            }
        };

        match waiter {
            Some(rx) => rx.await.unwrap_or(Ok(())),
            None => self.drive(Op::Remove).await,
        }
    }

    async fn drive(&self, op: Op) -> Result<(), BridgeError> {
        let result = self.apply(op).await;

        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                match state.pending.pop() {
                    Some(next) => next,
                    None => {
                        state.in_flight = false;
                        break;
                    }
                }
            };

            if let Err(err) = self.apply(next).await {
                tracing::trace!(
                    instance_id = %self.descriptor.instance_id,
                    code = %err.code,
                    "queued overlay call failed"
                );
            }
        }

        result
    }

    async fn apply(&self, op: Op) -> Result<(), BridgeError> {
        let phase = self.phase();

        match op {
            Op::Insert(snapshot) if phase == Phase::Inserted => self.update(snapshot).await,
            Op::Insert(snapshot) => self.insert(snapshot).await,
            Op::Sync(snapshot) => match phase {
                Phase::Inserted => self.update(snapshot).await,
                Phase::Absent if self.policy.auto_recover_insert => self.insert(snapshot).await,
                _ => Ok(()),
            },
            Op::Remove => {
                let result = if phase == Phase::Inserted {
                    self.remove().await
                } else {
                    self.ctx.router.unregister(&self.descriptor.instance_id);
                    Ok(())
                };

                let waiters = std::mem::take(&mut self.state.borrow_mut().removal_waiters);
                for waiter in waiters {
                    let _ = waiter.send(result.clone());
                }

                result
            }
        }
    }

    async fn insert(&self, snapshot: Snapshot) -> Result<(), BridgeError> {
        let kind = self.descriptor.kind.as_str();
        let instance_id = self.descriptor.instance_id.as_str();

        if self.policy.singleton {
            if let Err(holder) = self.ctx.singletons.claim(kind, instance_id) {
                let err = BridgeError::singleton_occupied(kind, &holder);
                self.report(&err);
                return Err(err);
            }
        }

        self.state.borrow_mut().phase = Phase::Inserting;
        let result = self.ctx.bridge.insert(&self.descriptor, &snapshot).await;

        match result {
            Ok(()) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.phase = Phase::Inserted;
                    state.baseline = Some(snapshot);
                }
                self.ctx.router.register(instance_id, self.route());
                tracing::debug!(kind, instance_id, "overlay inserted");
                Ok(())
            }
            Err(err) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.phase = Phase::Absent;
                    state.baseline = None;
                }
                self.ctx.singletons.release(kind, instance_id);
                self.report(&err);
                Err(err)
            }
        }
    }

    async fn update(&self, snapshot: Snapshot) -> Result<(), BridgeError> {
        let baseline = self.baseline();
        if let Some(baseline) = &baseline {
            if !self.adapter.differs(baseline, &snapshot) {
                return Ok(());
            }
            tracing::trace!(
                instance_id = %self.descriptor.instance_id,
                changed = ?baseline.changed_fields(&snapshot),
                "overlay snapshot changed"
            );
        }

        match self.ctx.bridge.update(&self.descriptor, &snapshot).await {
            Ok(()) => {
                self.state.borrow_mut().baseline = Some(snapshot);
                Ok(())
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    async fn remove(&self) -> Result<(), BridgeError> {
        let kind = self.descriptor.kind.as_str();
        let instance_id = self.descriptor.instance_id.as_str();

        let retained = {
            let mut state = self.state.borrow_mut();
            state.phase = Phase::Removing;
            state.baseline.take()
        };

        let result = self.ctx.bridge.remove(&self.descriptor).await;
        self.ctx.router.unregister(instance_id);

        match result {
            Ok(()) => {
                self.state.borrow_mut().phase = Phase::Absent;
                self.ctx.singletons.release(kind, instance_id);
                tracing::debug!(kind, instance_id, "overlay removed");
                Ok(())
            }
            Err(err) => {
                if self.policy.retain_on_remove_failure {
                    let mut state = self.state.borrow_mut();
                    state.phase = Phase::Inserted;
                    state.baseline = retained;
                } else {
                    self.state.borrow_mut().phase = Phase::Absent;
                    self.ctx.singletons.release(kind, instance_id);
                }
                self.report(&err);
                Err(err)
            }
        }
    }

    fn route(&self) -> Route {
        let adapter = self.adapter.clone();
        let sink = self.sink.clone();

        Rc::new(move |action: &str, payload: Value| match adapter.event_name(action) {
            Some(name) => sink.dispatch(name, payload),
            None => tracing::trace!(kind = adapter.kind(), action, "unmapped native action"),
        })
    }

    fn report(&self, err: &BridgeError) {
        tracing::warn!(
            kind = %self.descriptor.kind,
            instance_id = %self.descriptor.instance_id,
            code = %err.code,
            "native overlay call failed: {}",
            err.message
        );
        surface_error(self.sink.as_ref(), err);
    }

    fn skip_for(&self, err: SnapshotError) {
        tracing::debug!(
            instance_id = %self.descriptor.instance_id,
            "skipping overlay sync: {err}"
        );
    }
}

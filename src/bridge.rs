use crate::descriptor::ShadowDescriptor;
use crate::error::BridgeError;
use crate::snapshot::Snapshot;
use std::future::Future;

/// Asynchronous native-capability calls that create, reposition and destroy
/// native overlays. Implementations only report success or failure.
pub trait Bridge {
    fn insert(
        &self,
        descriptor: &ShadowDescriptor,
        snapshot: &Snapshot,
    ) -> impl Future<Output = Result<(), BridgeError>>;

    fn update(
        &self,
        descriptor: &ShadowDescriptor,
        snapshot: &Snapshot,
    ) -> impl Future<Output = Result<(), BridgeError>>;

    fn remove(&self, descriptor: &ShadowDescriptor) -> impl Future<Output = Result<(), BridgeError>>;
}

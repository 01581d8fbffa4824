use crate::config::SyncPolicy;
use crate::error::SnapshotError;
use crate::snapshot::{Geometry, Snapshot, SnapshotBuilder};

/// Component-specific half of the synchronizer: what goes into a snapshot,
/// which native actions map to which bindable events, and how failures are
/// treated.
pub trait ShadowAdapter: 'static {
    type Props;

    fn kind(&self) -> &'static str;

    fn policy(&self) -> SyncPolicy {
        SyncPolicy::default()
    }

    fn write_fields(&self, props: &Self::Props, snapshot: &mut SnapshotBuilder);

    /// Bindable event name for a native action, `None` to drop the action.
    fn event_name(&self, action: &str) -> Option<&'static str>;

    fn differs(&self, baseline: &Snapshot, next: &Snapshot) -> bool {
        baseline != next
    }

    fn build_snapshot(
        &self,
        props: &Self::Props,
        geometry: Option<Geometry>,
    ) -> Result<Snapshot, SnapshotError> {
        let mut builder = SnapshotBuilder::new(geometry)?;
        self.write_fields(props, &mut builder);
        Ok(builder.finish())
    }
}

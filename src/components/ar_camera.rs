use crate::adapter::ShadowAdapter;
use crate::config::SyncPolicy;
use crate::snapshot::SnapshotBuilder;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArCameraProps {
    pub hidden: bool,
    /// Key of the AR resource package to load.
    pub key: String,
    /// Resource type as declared by the package, e.g. `"2D"` or `"3D"`.
    pub ar_type: String,
}

/// `ar-camera`: shares the camera's one-per-page rule and failure handling.
#[derive(Debug, Default)]
pub struct ArCamera;

impl ShadowAdapter for ArCamera {
    type Props = ArCameraProps;

    fn kind(&self) -> &'static str {
        "ar-camera"
    }

    fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            auto_recover_insert: false,
            retain_on_remove_failure: true,
            singleton: true,
        }
    }

    fn write_fields(&self, props: &ArCameraProps, snapshot: &mut SnapshotBuilder) {
        snapshot
            .field("hidden", props.hidden)
            .field("key", props.key.as_str())
            .field("type", props.ar_type.as_str());
    }

    fn event_name(&self, action: &str) -> Option<&'static str> {
        match action {
            "error" => Some("binderror"),
            "init" => Some("bindinit"),
            "load" => Some("bindload"),
            "message" => Some("bindmessage"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Geometry, SnapshotValue};

    #[test]
    fn resource_key_is_part_of_the_snapshot() {
        let props = ArCameraProps {
            key: "10298".to_string(),
            ar_type: "3D".to_string(),
            ..ArCameraProps::default()
        };
        let snapshot = ArCamera
            .build_snapshot(&props, Some(Geometry::new(0.0, 0.0, 375.0, 600.0)))
            .expect("snapshot");

        assert_eq!(snapshot.get("key"), Some(&SnapshotValue::Text("10298".to_string())));
        assert_eq!(snapshot.get("type"), Some(&SnapshotValue::Text("3D".to_string())));
        assert_eq!(ArCamera.event_name("message"), Some("bindmessage"));
    }

    #[test]
    fn native_init_reaches_bindinit() {
        assert_eq!(ArCamera.event_name("init"), Some("bindinit"));
        assert_eq!(ArCamera.event_name("error"), Some("binderror"));
        assert_eq!(ArCamera.event_name("initdone"), None);
    }
}

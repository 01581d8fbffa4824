use crate::adapter::ShadowAdapter;
use crate::snapshot::SnapshotBuilder;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpenDataProps {
    pub hidden: bool,
    /// Which piece of user data to render, e.g. `"userNickName"`.
    pub data_type: String,
}

#[derive(Debug, Default)]
pub struct OpenData;

impl ShadowAdapter for OpenData {
    type Props = OpenDataProps;

    fn kind(&self) -> &'static str {
        "open-data"
    }

    fn write_fields(&self, props: &OpenDataProps, snapshot: &mut SnapshotBuilder) {
        snapshot
            .field("hidden", props.hidden)
            .field("type", props.data_type.as_str());
    }

    fn event_name(&self, action: &str) -> Option<&'static str> {
        (action == "error").then_some("binderror")
    }
}

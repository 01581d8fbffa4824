use crate::adapter::ShadowAdapter;
use crate::snapshot::SnapshotBuilder;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoverImageProps {
    pub hidden: bool,
    pub src: String,
    /// Keeps the overlay fixed to the viewport instead of the scroll content.
    pub fixed: bool,
}

#[derive(Debug, Default)]
pub struct CoverImage;

impl ShadowAdapter for CoverImage {
    type Props = CoverImageProps;

    fn kind(&self) -> &'static str {
        "cover-image"
    }

    fn write_fields(&self, props: &CoverImageProps, snapshot: &mut SnapshotBuilder) {
        snapshot
            .field("hidden", props.hidden)
            .field("src", props.src.as_str())
            .field("fixed", props.fixed);
    }

    fn event_name(&self, action: &str) -> Option<&'static str> {
        match action {
            "tap" => Some("bindtap"),
            "load" => Some("bindload"),
            "error" => Some("binderror"),
            _ => None,
        }
    }
}

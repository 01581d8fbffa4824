use crate::adapter::ShadowAdapter;
use crate::snapshot::SnapshotBuilder;

#[derive(Debug, Clone, PartialEq)]
pub struct CoverViewProps {
    pub hidden: bool,
    pub content: String,
    pub color: String,
    pub background_color: String,
    pub font_size: f64,
    pub opacity: f64,
    pub scroll_top: f64,
    pub fixed: bool,
}

impl Default for CoverViewProps {
    fn default() -> Self {
        Self {
            hidden: false,
            content: String::new(),
            color: "#000000".to_string(),
            background_color: "transparent".to_string(),
            font_size: 16.0,
            opacity: 1.0,
            scroll_top: 0.0,
            fixed: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct CoverView;

impl ShadowAdapter for CoverView {
    type Props = CoverViewProps;

    fn kind(&self) -> &'static str {
        "cover-view"
    }

    fn write_fields(&self, props: &CoverViewProps, snapshot: &mut SnapshotBuilder) {
        snapshot
            .field("hidden", props.hidden)
            .field("content", props.content.as_str())
            .field("color", props.color.as_str())
            .field("backgroundColor", props.background_color.as_str())
            .field("fontSize", props.font_size)
            .field("opacity", props.opacity)
            .field("scrollTop", props.scroll_top)
            .field("fixed", props.fixed);
    }

    fn event_name(&self, action: &str) -> Option<&'static str> {
        match action {
            "tap" => Some("bindtap"),
            "touchstart" => Some("bindtouchstart"),
            "touchmove" => Some("bindtouchmove"),
            "touchend" => Some("bindtouchend"),
            "touchcancel" => Some("bindtouchcancel"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Geometry, SnapshotValue};

    #[test]
    fn style_fields_use_native_names() {
        let snapshot = CoverView
            .build_snapshot(
                &CoverViewProps::default(),
                Some(Geometry::new(0.0, 0.0, 100.0, 30.0)),
            )
            .expect("snapshot");

        assert_eq!(snapshot.get("fontSize"), Some(&SnapshotValue::Number(16.0)));
        assert_eq!(
            snapshot.get("backgroundColor"),
            Some(&SnapshotValue::Text("transparent".to_string()))
        );
    }

    #[test]
    fn touch_actions_map_onto_bind_events() {
        for action in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let name = CoverView.event_name(action).expect("mapped");
            assert_eq!(name, format!("bind{action}"));
        }
    }
}

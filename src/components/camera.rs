use crate::adapter::ShadowAdapter;
use crate::config::SyncPolicy;
use crate::snapshot::SnapshotBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevicePosition {
    #[default]
    Back,
    Front,
}

impl DevicePosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Front => "front",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flash {
    #[default]
    Auto,
    On,
    Off,
    Torch,
}

impl Flash {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::On => "on",
            Self::Off => "off",
            Self::Torch => "torch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Normal,
    ScanCode,
}

impl CameraMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::ScanCode => "scanCode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraProps {
    pub hidden: bool,
    pub device_position: DevicePosition,
    pub flash: Flash,
    pub mode: CameraMode,
}

/// `camera`: one per page; a failed insert is retried only by a fresh attach.
#[derive(Debug, Default)]
pub struct Camera;

impl ShadowAdapter for Camera {
    type Props = CameraProps;

    fn kind(&self) -> &'static str {
        "camera"
    }

    fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            auto_recover_insert: false,
            retain_on_remove_failure: true,
            singleton: true,
        }
    }

    fn write_fields(&self, props: &CameraProps, snapshot: &mut SnapshotBuilder) {
        snapshot
            .field("hidden", props.hidden)
            .field("devicePosition", props.device_position.as_str())
            .field("flash", props.flash.as_str())
            .field("mode", props.mode.as_str());
    }

    fn event_name(&self, action: &str) -> Option<&'static str> {
        match action {
            "stop" => Some("bindstop"),
            "error" => Some("binderror"),
            "scancode" => Some("bindscancode"),
            "initdone" => Some("bindinitdone"),
            _ => None,
        }
    }
}

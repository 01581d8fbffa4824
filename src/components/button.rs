use crate::adapter::ShadowAdapter;
use crate::snapshot::SnapshotBuilder;

/// Platform capability a native button opens when tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenType {
    GetUserInfo,
    GetPhoneNumber,
    Contact,
    OpenSetting,
    Share,
}

impl OpenType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetUserInfo => "getUserInfo",
            Self::GetPhoneNumber => "getPhoneNumber",
            Self::Contact => "contact",
            Self::OpenSetting => "openSetting",
            Self::Share => "share",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ButtonProps {
    pub hidden: bool,
    pub text: String,
    pub open_type: Option<OpenType>,
    pub disabled: bool,
    pub loading: bool,
}

#[derive(Debug, Default)]
pub struct Button;

impl ShadowAdapter for Button {
    type Props = ButtonProps;

    fn kind(&self) -> &'static str {
        "button"
    }

    fn write_fields(&self, props: &ButtonProps, snapshot: &mut SnapshotBuilder) {
        snapshot
            .field("hidden", props.hidden)
            .field("text", props.text.as_str())
            .field("openType", props.open_type.map_or("", OpenType::as_str))
            .field("disabled", props.disabled)
            .field("loading", props.loading);
    }

    fn event_name(&self, action: &str) -> Option<&'static str> {
        match action {
            "tap" => Some("bindtap"),
            "getuserinfo" => Some("bindgetuserinfo"),
            "getphonenumber" => Some("bindgetphonenumber"),
            "contact" => Some("bindcontact"),
            "opensetting" => Some("bindopensetting"),
            _ => None,
        }
    }
}

//! Adapters for the built-in components that render through a native overlay.

mod ar_camera;
mod button;
mod camera;
mod cover_image;
mod cover_view;
mod open_data;

pub use ar_camera::{ArCamera, ArCameraProps};
pub use button::{Button, ButtonProps, OpenType};
pub use camera::{Camera, CameraMode, CameraProps, DevicePosition, Flash};
pub use cover_image::{CoverImage, CoverImageProps};
pub use cover_view::{CoverView, CoverViewProps};
pub use open_data::{OpenData, OpenDataProps};

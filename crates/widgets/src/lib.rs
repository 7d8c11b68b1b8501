pub mod curve;
pub mod mode;
pub mod profile;
pub mod reading;
pub mod sparkline;
pub mod status;
pub mod toast;

pub use curve::CurveWidget;
pub use mode::ModeWidget;
pub use profile::{ProfileChoice, ProfilePicker};
pub use reading::ReadingWidget;
pub use sparkline::SparklineChart;
pub use status::StatusWidget;
pub use toast::ToastWidget;

mod gauges;
mod status_bar;
mod trail;

pub use gauges::GaugesWidget;
pub use status_bar::StatusBarWidget;
pub use trail::TrailWidget;

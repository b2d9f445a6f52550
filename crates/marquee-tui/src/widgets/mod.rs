mod carousel;
mod status_bar;

pub use carousel::{CarouselWidget, StripView};
pub use status_bar::StatusBarWidget;

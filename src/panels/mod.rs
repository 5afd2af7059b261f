mod canvas_panel;
mod notices;
mod palette;
mod side_panel;
mod toolbar;

pub use canvas_panel::{canvas_panel, display_rect, to_canvas};
pub use notices::notices;
pub use palette::palette;
pub use side_panel::side_panel;
pub use toolbar::toolbar;

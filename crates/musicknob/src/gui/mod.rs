pub mod app;
pub mod knob;
pub mod seekbar;
pub mod theme;

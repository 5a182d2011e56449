pub mod app;
pub mod eraser_modal;
pub mod map_view;
pub mod settings_modal;

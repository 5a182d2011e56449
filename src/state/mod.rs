pub mod gesture;
pub mod markers;
pub mod view;

pub use gesture::GestureState;
pub use markers::MarkerStore;
pub use view::ViewTransform;

pub mod progress_bar;
pub mod summary;
pub mod typing_area;

pub mod drill;
pub mod input;
pub mod result;
pub mod unit_list;
pub mod view;

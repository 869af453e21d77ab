pub mod category;
pub mod categoryable;

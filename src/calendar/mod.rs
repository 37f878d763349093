pub mod cache;
pub mod event;
pub mod render;

pub use cache::CalendarCache;

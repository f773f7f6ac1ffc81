pub mod date;
pub mod image_url;
pub mod logs;

mod image_reference;
mod path_filter;

pub use image_reference::clean_image_reference;
pub use path_filter::PathFilter;

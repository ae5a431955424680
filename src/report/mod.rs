pub mod html;
pub mod template;
pub mod write;

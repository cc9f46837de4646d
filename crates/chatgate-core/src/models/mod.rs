pub mod message;
pub mod reply;
pub mod request;
pub mod ui_block;

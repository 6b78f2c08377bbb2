pub mod boll_error;
pub mod enums;

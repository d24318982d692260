pub mod homework;
pub mod response;

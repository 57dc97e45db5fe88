pub mod images;
pub mod multipart;

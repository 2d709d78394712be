pub mod albums;
pub mod people;

pub mod get;
pub mod media;
pub mod register;
pub mod update;

pub mod accounts;
pub mod auth;
pub mod clock;
pub mod media;
pub mod password;

pub mod file;
pub mod hash;
pub mod history;
pub mod key;
pub mod misc;
pub mod pgp;
pub mod text;
pub mod user;

pub mod comment;
pub mod membership;
pub mod project;
pub mod ticket;
pub mod user;

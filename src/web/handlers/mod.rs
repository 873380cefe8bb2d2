// Route handlers for the reference classifier service.

pub mod detect;
pub mod health;

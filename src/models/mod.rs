pub mod activity;
pub mod chat;
pub mod expense;
pub mod trip;

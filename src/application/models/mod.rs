pub mod athlete;
pub mod auth;
pub mod common;
pub mod matches;
pub mod notification;
pub mod statistics;
pub mod team;
pub mod user;

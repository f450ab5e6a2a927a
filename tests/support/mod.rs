#![allow(dead_code)]

pub mod fake_gateway;
pub mod redis_container;
pub mod scripted_gateway;

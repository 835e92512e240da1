#[path = "../common.rs"]
#[allow(dead_code)]
mod common;

mod dump;
mod schema;
mod stream;

pub mod decode;
pub mod record;
pub mod regdb;

pub mod key_value;
pub mod manager;

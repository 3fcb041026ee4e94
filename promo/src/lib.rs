pub mod coordinator;
pub mod domain;
pub mod events;
pub mod pipeline;
pub mod ports;
pub mod selector;
pub mod tokens;

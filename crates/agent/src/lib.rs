pub mod heartbeat;

pub use heartbeat::{heartbeat_loop, AgentRuntime};

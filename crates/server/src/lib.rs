pub mod channel;
pub mod handler;
pub mod registry;
pub mod remote;
pub mod session;

#[cfg(test)]
pub(crate) mod tests_common;

pub use channel::AgentChannel;
pub use handler::AgentHandler;
pub use registry::AgentRegistry;
pub use remote::{AgentLookupService, BuildRepositoryRemote};

mod chat;
mod registry;

pub use chat::{AzureOpenAiChatClient, ChatClient, ChatError, ChatMessage, ChatRole};
pub use registry::{Capability, RegistryBuilder, ServiceRegistry};

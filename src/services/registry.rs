use std::sync::Arc;

use serde::Serialize;

use crate::data::DataContextFactory;
use crate::error::StartupError;
use crate::services::ChatClient;

/// Capabilities the host registers during bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ChatClient,
    DataContextFactory,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChatClient => f.write_str("chat client"),
            Self::DataContextFactory => f.write_str("data context factory"),
        }
    }
}

/// Constructed dependencies, populated once by bootstrap and shared
/// read-only with every request handler.
pub struct ServiceRegistry {
    chat_client: Arc<dyn ChatClient>,
    data_context: Arc<DataContextFactory>,
    registered: Vec<Capability>,
}

impl ServiceRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn chat_client(&self) -> Arc<dyn ChatClient> {
        self.chat_client.clone()
    }

    pub fn data_context(&self) -> &DataContextFactory {
        &self.data_context
    }

    /// Registered capabilities, in registration order.
    pub fn capabilities(&self) -> Vec<Capability> {
        self.registered.clone()
    }
}

/// Write side of the registry. Each capability may be registered once;
/// `build` fails unless all of them were.
#[derive(Default)]
pub struct RegistryBuilder {
    chat_client: Option<Arc<dyn ChatClient>>,
    data_context: Option<Arc<DataContextFactory>>,
    registered: Vec<Capability>,
}

impl RegistryBuilder {
    pub fn register_chat_client(&mut self, client: Arc<dyn ChatClient>) -> Result<&mut Self, StartupError> {
        self.record(Capability::ChatClient)?;

        tracing::debug!(deployment = client.deployment(), "registered {}", Capability::ChatClient);
        self.chat_client = Some(client);
        Ok(self)
    }

    pub fn register_data_context(&mut self, factory: Arc<DataContextFactory>) -> Result<&mut Self, StartupError> {
        self.record(Capability::DataContextFactory)?;

        tracing::debug!(backend = ?factory.backend(), "registered {}", Capability::DataContextFactory);
        self.data_context = Some(factory);
        Ok(self)
    }

    pub fn build(self) -> Result<ServiceRegistry, StartupError> {
        let chat_client = self
            .chat_client
            .ok_or(StartupError::MissingService(Capability::ChatClient))?;
        let data_context = self
            .data_context
            .ok_or(StartupError::MissingService(Capability::DataContextFactory))?;

        Ok(ServiceRegistry {
            chat_client,
            data_context,
            registered: self.registered,
        })
    }

    fn record(&mut self, capability: Capability) -> Result<(), StartupError> {
        if self.registered.contains(&capability) {
            return Err(StartupError::DuplicateService(capability));
        }

        self.registered.push(capability);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::services::{ChatError, ChatMessage};

    struct EchoClient;

    #[async_trait]
    impl ChatClient for EchoClient {
        fn deployment(&self) -> &str {
            "echo"
        }

        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
            Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
        }
    }

    async fn memory_store() -> Arc<DataContextFactory> {
        Arc::new(DataContextFactory::connect("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn holds_one_entry_per_capability() {
        let mut builder = ServiceRegistry::builder();
        builder
            .register_chat_client(Arc::new(EchoClient))
            .unwrap()
            .register_data_context(memory_store().await)
            .unwrap();

        let registry = builder.build().unwrap();

        assert_eq!(
            registry.capabilities(),
            vec![Capability::ChatClient, Capability::DataContextFactory]
        );
        assert_eq!(registry.chat_client().deployment(), "echo");
    }

    #[tokio::test]
    async fn capabilities_follow_registration_order() {
        let mut builder = ServiceRegistry::builder();
        builder
            .register_data_context(memory_store().await)
            .unwrap()
            .register_chat_client(Arc::new(EchoClient))
            .unwrap();

        assert_eq!(
            builder.build().unwrap().capabilities(),
            vec![Capability::DataContextFactory, Capability::ChatClient]
        );
    }

    #[test]
    fn rejects_duplicates() {
        let mut builder = ServiceRegistry::builder();
        builder.register_chat_client(Arc::new(EchoClient)).unwrap();

        assert!(matches!(
            builder.register_chat_client(Arc::new(EchoClient)),
            Err(StartupError::DuplicateService(Capability::ChatClient))
        ));
        assert_eq!(builder.registered, vec![Capability::ChatClient]);
    }

    #[tokio::test]
    async fn incomplete_registration_fails_to_build() {
        let mut builder = ServiceRegistry::builder();
        builder.register_data_context(memory_store().await).unwrap();

        assert!(matches!(
            builder.build(),
            Err(StartupError::MissingService(Capability::ChatClient))
        ));
    }
}

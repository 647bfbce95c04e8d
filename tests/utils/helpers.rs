/// Test helper functions and service builders
use super::factories::BovineFactory;
use bovine_registry::modules::bovine::Bovine;
use bovine_registry::shared::application::AuthContext;
use bovine_registry::shared::infrastructure::InMemoryRegistryStore;
use bovine_registry::RegistryServices;
use std::sync::Arc;

pub struct TestServices {
    pub registry: RegistryServices,
    pub store: Arc<InMemoryRegistryStore>,
}

/// Build services over a fresh in-memory store
pub fn build_test_services() -> TestServices {
    let store = Arc::new(InMemoryRegistryStore::new());
    let registry = RegistryServices::new(store.clone(), store.clone(), 3);
    TestServices { registry, store }
}

/// Register each factory output as the owner of its establishment
pub async fn register_all(registry: &RegistryServices, factories: Vec<BovineFactory>) -> Vec<Bovine> {
    let mut registered = Vec::new();
    for factory in factories {
        let new_bovine = factory.build();
        let auth = AuthContext::user(new_bovine.establishment_cuig.clone());
        registered.push(
            registry
                .bovine_service
                .register(&auth, new_bovine)
                .await
                .expect("Failed to register test bovine"),
        );
    }
    registered
}

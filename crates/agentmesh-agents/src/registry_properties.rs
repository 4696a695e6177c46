//! Property-based tests for the capability registry
//!
//! Covers last-write-wins on duplicate keys and capability resolution
//! before and after removal.

#[cfg(test)]
mod tests {
    use crate::entries::{EntryType, ServiceEntry};
    use crate::error::Result;
    use crate::registry::CapabilityRegistry;
    use crate::runtime::{ServiceRequest, ServiceResponse};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    struct Stub {
        service_type: String,
        generation: usize,
        capabilities: Vec<String>,
    }

    #[async_trait]
    impl ServiceEntry for Stub {
        fn service_type(&self) -> &str {
            &self.service_type
        }

        fn name(&self) -> &str {
            &self.service_type
        }

        fn capabilities(&self) -> &[String] {
            &self.capabilities
        }

        fn is_initialized(&self) -> bool {
            false
        }

        async fn invoke(&self, _request: ServiceRequest) -> Result<ServiceResponse> {
            Ok(ServiceResponse::text(self.generation.to_string()))
        }
    }

    fn stub(service_type: &str, generation: usize, capabilities: &[String]) -> Arc<Stub> {
        Arc::new(Stub {
            service_type: service_type.to_string(),
            generation,
            capabilities: capabilities.to_vec(),
        })
    }

    fn capability_names() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[a-z]{1,8}", 1..6)
    }

    proptest! {
        /// Re-registering a key never errors and the newest entry wins
        #[test]
        fn property_last_write_wins(
            key in "[a-z]{1,10}",
            writes in 1usize..6,
            caps in capability_names(),
        ) {
            let registry = CapabilityRegistry::new();
            let caps: Vec<String> = caps.into_iter().collect();

            for generation in 0..writes {
                prop_assert!(registry.register_service(stub(&key, generation, &caps)).is_ok());
            }

            prop_assert_eq!(registry.stats().services, 1);
            prop_assert_eq!(registry.stats().capabilities, caps.len());
            let registered = registry.get_service(&key).unwrap();
            prop_assert_eq!(registered.service_type(), key.as_str());
        }

        /// Every declared capability resolves to its owner until the owner is removed
        #[test]
        fn property_capability_resolution_until_unregistered(
            key in "[a-z]{1,10}",
            caps in capability_names(),
        ) {
            let registry = CapabilityRegistry::new();
            let caps: Vec<String> = caps.into_iter().collect();
            registry.register_service(stub(&key, 0, &caps)).unwrap();

            for cap in &caps {
                let entry = registry.find_entry_by_capability(cap).unwrap();
                prop_assert_eq!(entry.entry_type(), EntryType::Service);
                prop_assert_eq!(entry.key(), key.as_str());
            }

            prop_assert!(registry.unregister_service(&key));
            for cap in &caps {
                prop_assert!(registry.find_entry_by_capability(cap).is_none());
            }
            prop_assert_eq!(registry.stats().capabilities, 0);
        }

        /// Removing one capability leaves the rest resolvable
        #[test]
        fn property_unregister_single_capability(
            key in "[a-z]{1,10}",
            caps in capability_names(),
            pick in any::<prop::sample::Index>(),
        ) {
            let registry = CapabilityRegistry::new();
            let caps: Vec<String> = caps.into_iter().collect();
            registry.register_service(stub(&key, 0, &caps)).unwrap();

            let removed = pick.get(&caps).clone();
            prop_assert!(registry.unregister_capability(&removed));

            for cap in &caps {
                let resolved = registry.get_service_by_capability(cap).is_some();
                prop_assert_eq!(resolved, cap != &removed);
            }
            prop_assert!(registry.get_service(&key).is_some());
        }
    }
}

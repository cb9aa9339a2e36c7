//! Operation dispatch
//!
//! Provider operations are invoked by name. [`Invoker`] is the seam between
//! the extraction engine and whatever actually performs calls;
//! [`OperationTable`] is a registered-function table keyed by service and
//! operation name.

use super::item::RawItem;
use super::registry::Params;
use crate::error::InvokeError;
use std::collections::HashMap;

/// Performs provider calls by operation name.
pub trait Invoker: Send + Sync {
    fn invoke(
        &self,
        service: &str,
        region: &str,
        operation: &str,
        params: &Params,
    ) -> Result<RawItem, InvokeError>;
}

type Handler = Box<dyn Fn(&str, &Params) -> Result<RawItem, InvokeError> + Send + Sync>;

/// Dispatch table of operation handlers keyed by `(service, operation)`.
///
/// Handlers receive the region and the call parameters.
#[derive(Default)]
pub struct OperationTable {
    handlers: HashMap<(String, String), Handler>,
}

impl OperationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `service`/`operation`, replacing any previous one.
    pub fn register<F>(&mut self, service: &str, operation: &str, handler: F) -> &mut Self
    where
        F: Fn(&str, &Params) -> Result<RawItem, InvokeError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            (service.to_string(), operation.to_string()),
            Box::new(handler),
        );
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<F>(mut self, service: &str, operation: &str, handler: F) -> Self
    where
        F: Fn(&str, &Params) -> Result<RawItem, InvokeError> + Send + Sync + 'static,
    {
        self.register(service, operation, handler);
        self
    }

    pub fn contains(&self, service: &str, operation: &str) -> bool {
        self.handlers
            .contains_key(&(service.to_string(), operation.to_string()))
    }
}

impl Invoker for OperationTable {
    fn invoke(
        &self,
        service: &str,
        region: &str,
        operation: &str,
        params: &Params,
    ) -> Result<RawItem, InvokeError> {
        tracing::debug!("dispatch: service={}, operation={}", service, operation);

        match self
            .handlers
            .get(&(service.to_string(), operation.to_string()))
        {
            Some(handler) => handler(region, params),
            None => Err(InvokeError::new(
                "UnknownOperation",
                format!("no handler for {}.{}", service, operation),
            )),
        }
    }
}

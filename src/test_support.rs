//! Host double used by unit tests across the crate.

use crate::context::RequestParams;
use crate::host::NonceHost;
use crate::life::NonceLife;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, RwLock};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Create { life: u64 },
    Verify { life: u64 },
}

/// Time-independent host: credentials are a plain hash of the hashed action.
/// Every create/verify call is recorded with the lifetime it observed.
pub(crate) struct RecordingHost {
    tenant: RwLock<String>,
    request: RwLock<RequestParams>,
    life: NonceLife,
    calls: Mutex<Vec<Call>>,
}

impl RecordingHost {
    pub(crate) fn new() -> Self {
        Self {
            tenant: RwLock::new("1".to_string()),
            request: RwLock::new(RequestParams::default()),
            life: NonceLife::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_tenant(&self, tenant: &str) {
        *self.tenant.write().unwrap() = tenant.to_string();
    }

    pub(crate) fn set_request(&self, request: RequestParams) {
        *self.request.write().unwrap() = request;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn verify_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Verify { .. }))
            .count()
    }
}

pub(crate) fn digest(input: &str) -> String {
    let mut hasher = DefaultHasher::new();
    input.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

impl NonceHost for RecordingHost {
    fn current_tenant_id(&self) -> String {
        self.tenant.read().unwrap().clone()
    }

    fn keyed_hash(&self, input: &str, scheme: &str) -> String {
        if scheme == "nonce" {
            digest(input)
        } else {
            String::new()
        }
    }

    fn create_credential(&self, hashed_action: &str) -> String {
        self.calls.lock().unwrap().push(Call::Create {
            life: self.life.current(),
        });
        digest(hashed_action)
    }

    fn verify_credential(&self, candidate: &str, hashed_action: &str) -> bool {
        self.calls.lock().unwrap().push(Call::Verify {
            life: self.life.current(),
        });
        digest(hashed_action) == candidate
    }

    fn nonce_life(&self) -> &NonceLife {
        &self.life
    }

    fn current_request(&self) -> RequestParams {
        self.request.read().unwrap().clone()
    }

    fn home_url(&self) -> String {
        "http://example.com/subdir".to_string()
    }
}

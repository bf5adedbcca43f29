use crate::core::api::{ProxyHostApi, WriteOutcome};
use crate::core::host::{HostFields, HostPatch, ProxyHost};
use crate::utils::{NpmError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Build a host from server-shaped JSON plus an id.
pub fn host(id: i64, mut body: Value) -> ProxyHost {
    if let Value::Object(map) = &mut body {
        map.insert("id".to_string(), Value::from(id));
    }
    serde_json::from_value(body).expect("test host JSON must be valid")
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List,
    Create { fields: HostFields },
    Update { id: i64, patch: Value },
    Remove { id: i64 },
}

#[derive(Default)]
struct Failures {
    list: Option<(u16, String)>,
    writes: Option<(u16, String)>,
    updates: HashMap<i64, (u16, String)>,
}

/// In-memory stand-in for an NPM session that records every call.
pub struct MockProxyHostApi {
    hosts: Vec<ProxyHost>,
    pub calls: Rc<RefCell<Vec<MockCall>>>,
    failures: RefCell<Failures>,
}

impl MockProxyHostApi {
    pub fn new(hosts: Vec<ProxyHost>) -> Self {
        Self {
            hosts,
            calls: Rc::new(RefCell::new(Vec::new())),
            failures: RefCell::new(Failures::default()),
        }
    }

    pub fn fail_list_with(&self, status: u16, body: &str) {
        self.failures.borrow_mut().list = Some((status, body.to_string()));
    }

    pub fn fail_writes_with(&self, status: u16, body: &str) {
        self.failures.borrow_mut().writes = Some((status, body.to_string()));
    }

    pub fn fail_updates_for(&self, id: i64, status: u16, body: &str) {
        self.failures
            .borrow_mut()
            .updates
            .insert(id, (status, body.to_string()));
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }

    pub fn created(&self) -> Vec<HostFields> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                MockCall::Create { fields } => Some(fields.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| !matches!(call, MockCall::List))
            .count()
    }

    fn write_result(&self, action: &str, id: Option<i64>, status: u16) -> Result<WriteOutcome> {
        let failures = self.failures.borrow();
        let failure = id
            .and_then(|id| failures.updates.get(&id))
            .or(failures.writes.as_ref());

        match failure {
            Some((status, body)) => Err(NpmError::write(action, *status, body.clone())),
            None => Ok(WriteOutcome {
                status,
                body: "{}".to_string(),
            }),
        }
    }
}

impl ProxyHostApi for MockProxyHostApi {
    fn list_hosts(&self) -> Result<Vec<ProxyHost>> {
        self.calls.borrow_mut().push(MockCall::List);
        if let Some((status, body)) = &self.failures.borrow().list {
            return Err(NpmError::fetch(*status, body.clone()));
        }
        Ok(self.hosts.clone())
    }

    fn create_host(&self, fields: &HostFields) -> Result<WriteOutcome> {
        self.calls.borrow_mut().push(MockCall::Create {
            fields: fields.clone(),
        });
        self.write_result("create", None, 201)
    }

    fn update_host(&self, id: i64, patch: &HostPatch) -> Result<WriteOutcome> {
        self.calls.borrow_mut().push(MockCall::Update {
            id,
            patch: Value::Object(patch.clone()),
        });
        self.write_result("update", Some(id), 200)
    }

    fn remove_host(&self, id: i64) -> Result<WriteOutcome> {
        self.calls.borrow_mut().push(MockCall::Remove { id });
        self.write_result("remove", None, 200)
    }
}

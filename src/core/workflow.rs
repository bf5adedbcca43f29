//! Template-driven host operations built on [`ProxyHostApi`].
//!
//! Every operation works on a host list fetched at the start of the call.

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::api::{ProxyHostApi, WriteOutcome};
use crate::core::host::{HostField, HostPatch, ProxyHost, Template};
use crate::utils::{NpmError, Result};

/// First host, in server order, whose domains include `sentinel`.
pub fn find_template(hosts: &[ProxyHost], sentinel: &str) -> Result<Template> {
    hosts
        .iter()
        .find(|host| host.contains_domain(sentinel))
        .map(Template::from_host)
        .ok_or_else(|| NpmError::template_not_found(sentinel))
}

pub fn fetch_template<A: ProxyHostApi + ?Sized>(api: &A, sentinel: &str) -> Result<Template> {
    let hosts = api.list_hosts()?;
    find_template(&hosts, sentinel)
}

/// Requested domains already present on some host, each listed once in
/// request order.
pub fn existing_domains(hosts: &[ProxyHost], domains: &[String]) -> Vec<String> {
    let mut existing: Vec<String> = Vec::new();
    for domain in domains {
        if existing.contains(domain) {
            continue;
        }
        if hosts.iter().any(|host| host.contains_domain(domain)) {
            existing.push(domain.clone());
        }
    }
    existing
}

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub template: String,
    pub domains: Vec<String>,
    pub forward_host: String,
    pub forward_port: u16,
    pub check_conflicts: bool,
}

impl CreateRequest {
    pub fn validate(&self) -> Result<()> {
        if self.domains.is_empty() {
            return Err(NpmError::invalid_args("at least one domain is required"));
        }
        if self.domains.iter().any(|d| d.trim().is_empty()) {
            return Err(NpmError::invalid_args("domain names cannot be empty"));
        }
        if self.forward_host.trim().is_empty() {
            return Err(NpmError::invalid_args("forward host cannot be empty"));
        }
        if self.forward_port == 0 {
            return Err(NpmError::invalid_args("forward port must be between 1 and 65535"));
        }
        Ok(())
    }
}

/// Clone the template, point it at the new target and submit it.
pub fn create_host<A: ProxyHostApi + ?Sized>(api: &A, request: &CreateRequest) -> Result<WriteOutcome> {
    request.validate()?;

    let hosts = api.list_hosts()?;
    let template = find_template(&hosts, &request.template)?;

    if request.check_conflicts {
        let conflicts = existing_domains(&hosts, &request.domains);
        if !conflicts.is_empty() {
            return Err(NpmError::conflict(conflicts));
        }
    }

    let fields = template.derive(
        request.domains.clone(),
        &request.forward_host,
        request.forward_port,
    );
    debug!(domains = ?request.domains, template = %request.template, "creating host");
    api.create_host(&fields)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The domain was the host's last one, so the host itself was deleted.
    Deleted { id: i64, outcome: WriteOutcome },
    /// The domain was dropped from a host that still serves `remaining`.
    Updated {
        id: i64,
        remaining: Vec<String>,
        outcome: WriteOutcome,
    },
}

pub fn remove_domain<A: ProxyHostApi + ?Sized>(api: &A, domain: &str) -> Result<RemoveOutcome> {
    let hosts = api.list_hosts()?;
    let host = hosts
        .iter()
        .find(|host| host.contains_domain(domain))
        .ok_or_else(|| NpmError::domain_not_found(domain))?;

    // Only the first copy goes; a host is never left without domains.
    let mut remaining = host.domains().to_vec();
    if let Some(index) = remaining.iter().position(|d| d == domain) {
        remaining.remove(index);
    }

    if remaining.is_empty() {
        debug!(id = host.id, domain, "removing host");
        let outcome = api.remove_host(host.id)?;
        return Ok(RemoveOutcome::Deleted {
            id: host.id,
            outcome,
        });
    }

    let mut patch = HostPatch::new();
    patch.insert(
        HostField::DomainNames.as_str().to_string(),
        Value::from(remaining.clone()),
    );

    debug!(id = host.id, domain, "removing domain from host");
    let outcome = api.update_host(host.id, &patch)?;
    Ok(RemoveOutcome::Updated {
        id: host.id,
        remaining,
        outcome,
    })
}

#[derive(Debug, Clone)]
pub struct BulkUpdateRequest {
    pub field: HostField,
    pub update_template: String,
    pub search_template: String,
    pub search_fields: Vec<HostField>,
}

impl BulkUpdateRequest {
    pub fn validate(&self) -> Result<()> {
        if self.field == HostField::Enabled {
            return Err(NpmError::invalid_args(
                "'enabled' cannot be updated from a template",
            ));
        }
        if self.search_fields.is_empty() {
            return Err(NpmError::invalid_args("at least one search field is required"));
        }
        if self.update_template == self.search_template {
            return Err(NpmError::invalid_args(
                "update and search templates must be different hosts",
            ));
        }
        Ok(())
    }
}

/// Result of updating one matching host.
#[derive(Debug)]
pub struct HostUpdateReport {
    pub id: i64,
    pub domains: Vec<String>,
    pub result: Result<WriteOutcome>,
}

impl HostUpdateReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Copy one field from the update template onto every host whose search
/// fields equal the search template's. Each host is updated independently;
/// a failed update is reported and the scan continues.
pub fn bulk_update<A: ProxyHostApi + ?Sized>(
    api: &A,
    request: &BulkUpdateRequest,
) -> Result<Vec<HostUpdateReport>> {
    request.validate()?;

    let hosts = api.list_hosts()?;
    let update_template = find_template(&hosts, &request.update_template)?;
    let search_template = find_template(&hosts, &request.search_template)?;

    let value = update_template.fields().value(request.field)?.ok_or_else(|| {
        NpmError::invalid_args(format!(
            "template '{}' has no value for '{}'",
            request.update_template, request.field
        ))
    })?;

    let mut patch = HostPatch::new();
    patch.insert(request.field.as_str().to_string(), value);

    let mut reports = Vec::new();
    for host in &hosts {
        if !host
            .fields
            .matches_on(search_template.fields(), &request.search_fields)?
        {
            continue;
        }

        let result = api.update_host(host.id, &patch);
        if let Err(e) = &result {
            warn!(id = host.id, error = %e, "host update failed");
        }
        reports.push(HostUpdateReport {
            id: host.id,
            domains: host.domains().to_vec(),
            result,
        });
    }

    Ok(reports)
}

use clap::ValueEnum;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::utils::Result;

/// Partial record sent with `PUT /api/nginx/proxy-hosts/{id}`.
pub type HostPatch = Map<String, Value>;

/// The proxy-host fields a template is allowed to hand down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HostField {
    DomainNames,
    ForwardScheme,
    ForwardHost,
    ForwardPort,
    CertificateId,
    SslForced,
    HstsEnabled,
    HstsSubdomains,
    Http2Support,
    BlockExploits,
    CachingEnabled,
    AllowWebsocketUpgrade,
    AccessListId,
    AdvancedConfig,
    Meta,
    Locations,
    Enabled,
}

impl HostField {
    pub const ALL: [HostField; 17] = [
        HostField::DomainNames,
        HostField::ForwardScheme,
        HostField::ForwardHost,
        HostField::ForwardPort,
        HostField::CertificateId,
        HostField::SslForced,
        HostField::HstsEnabled,
        HostField::HstsSubdomains,
        HostField::Http2Support,
        HostField::BlockExploits,
        HostField::CachingEnabled,
        HostField::AllowWebsocketUpgrade,
        HostField::AccessListId,
        HostField::AdvancedConfig,
        HostField::Meta,
        HostField::Locations,
        HostField::Enabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostField::DomainNames => "domain_names",
            HostField::ForwardScheme => "forward_scheme",
            HostField::ForwardHost => "forward_host",
            HostField::ForwardPort => "forward_port",
            HostField::CertificateId => "certificate_id",
            HostField::SslForced => "ssl_forced",
            HostField::HstsEnabled => "hsts_enabled",
            HostField::HstsSubdomains => "hsts_subdomains",
            HostField::Http2Support => "http2_support",
            HostField::BlockExploits => "block_exploits",
            HostField::CachingEnabled => "caching_enabled",
            HostField::AllowWebsocketUpgrade => "allow_websocket_upgrade",
            HostField::AccessListId => "access_list_id",
            HostField::AdvancedConfig => "advanced_config",
            HostField::Meta => "meta",
            HostField::Locations => "locations",
            HostField::Enabled => "enabled",
        }
    }
}

impl fmt::Display for HostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NPM has reported flags both as JSON booleans and as 0/1 integers.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(flag)),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|v| Some(v != 0))
            .ok_or_else(|| D::Error::custom(format!("invalid flag value: {}", n))),
        Some(other) => Err(D::Error::custom(format!("invalid flag value: {}", other))),
    }
}

/// Keeps an explicit JSON `null` as `Some(Value::Null)`; only a missing key
/// becomes `None`.
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// The allow-listed subset of a proxy host. Fields the server did not send
/// stay `None` and are left out when serialized. `certificate_id`, `meta` and
/// `locations` keep a server-sent `null`; the typed fields read it as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_port: Option<u16>,
    /// A certificate id, `0` for none, or `"new"` to request one.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_id: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub ssl_forced: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub hsts_enabled: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub hsts_subdomains: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub http2_support: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_exploits: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub caching_enabled: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub allow_websocket_upgrade: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_list_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_config: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub meta: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub locations: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled: Option<bool>,
}

impl HostFields {
    pub fn domains(&self) -> &[String] {
        self.domain_names.as_deref().unwrap_or(&[])
    }

    /// Exact membership in `domain_names`; no prefix or suffix matching.
    pub fn contains_domain(&self, domain: &str) -> bool {
        self.domains().iter().any(|d| d == domain)
    }

    /// The JSON value of `field`, `Value::Null` when absent.
    pub fn get(&self, field: HostField) -> Result<Value> {
        Ok(self.value(field)?.unwrap_or(Value::Null))
    }

    /// The JSON value of `field`, or `None` when the record does not carry it.
    /// An explicit `null` comes back as `Some(Value::Null)`.
    pub fn value(&self, field: HostField) -> Result<Option<Value>> {
        let mut map = self.to_map()?;
        Ok(map.remove(field.as_str()))
    }

    /// True when every field in `fields` holds the same value in both records.
    pub fn matches_on(&self, other: &HostFields, fields: &[HostField]) -> Result<bool> {
        for field in fields {
            if self.get(*field)? != other.get(*field)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// A proxy host as returned by `GET /api/nginx/proxy-hosts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyHost {
    pub id: i64,
    #[serde(flatten)]
    pub fields: HostFields,
    /// Server-side fields outside the allow-list (owner, timestamps, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProxyHost {
    pub fn domains(&self) -> &[String] {
        self.fields.domains()
    }

    pub fn contains_domain(&self, domain: &str) -> bool {
        self.fields.contains_domain(domain)
    }
}

/// Field-value source for derived hosts, picked by a sentinel domain name.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    fields: HostFields,
}

impl Template {
    pub fn from_host(host: &ProxyHost) -> Self {
        let mut fields = host.fields.clone();
        fields.enabled = Some(true);
        Self { fields }
    }

    pub fn fields(&self) -> &HostFields {
        &self.fields
    }

    pub fn get(&self, field: HostField) -> Result<Value> {
        self.fields.get(field)
    }

    /// A new record carrying every template field, with the routing overridden.
    pub fn derive(&self, domains: Vec<String>, forward_host: &str, forward_port: u16) -> HostFields {
        let mut fields = self.fields.clone();
        fields.domain_names = Some(domains);
        fields.forward_host = Some(forward_host.to_string());
        fields.forward_port = Some(forward_port);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server_host() -> Value {
        json!({
            "id": 7,
            "created_on": "2024-01-01 00:00:00",
            "modified_on": "2024-02-01 00:00:00",
            "owner_user_id": 1,
            "domain_names": ["template"],
            "forward_scheme": "http",
            "forward_host": "10.0.0.1",
            "forward_port": 8080,
            "certificate_id": 3,
            "ssl_forced": 1,
            "hsts_enabled": false,
            "hsts_subdomains": 0,
            "http2_support": true,
            "block_exploits": true,
            "caching_enabled": false,
            "allow_websocket_upgrade": true,
            "access_list_id": 0,
            "advanced_config": "proxy_read_timeout 90;",
            "enabled": false,
            "meta": {"letsencrypt_agree": false, "dns_challenge": false},
            "locations": [],
            "certificate": {"id": 3, "nice_name": "wildcard"}
        })
    }

    #[test]
    fn test_proxy_host_splits_allow_list_and_extra() {
        let host: ProxyHost = serde_json::from_value(server_host()).unwrap();

        assert_eq!(host.id, 7);
        assert_eq!(host.domains(), ["template".to_string()]);
        assert_eq!(host.fields.ssl_forced, Some(true));
        assert_eq!(host.fields.hsts_subdomains, Some(false));
        assert_eq!(host.fields.certificate_id, Some(json!(3)));
        assert!(host.extra.contains_key("created_on"));
        assert!(host.extra.contains_key("certificate"));
        assert!(!host.extra.contains_key("domain_names"));
        assert!(!host.extra.contains_key("id"));
    }

    #[test]
    fn test_proxy_host_round_trips_unknown_fields() {
        let host: ProxyHost = serde_json::from_value(server_host()).unwrap();
        let value = serde_json::to_value(&host).unwrap();

        assert_eq!(value["owner_user_id"], json!(1));
        assert_eq!(value["certificate"]["nice_name"], json!("wildcard"));
        assert_eq!(value["ssl_forced"], json!(true));
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        let result: std::result::Result<HostFields, _> =
            serde_json::from_value(json!({"ssl_forced": "yes"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_contains_domain_is_exact_membership() {
        let fields = HostFields {
            domain_names: Some(vec!["app.example.com".into(), "www.example.com".into()]),
            ..Default::default()
        };

        assert!(fields.contains_domain("app.example.com"));
        assert!(!fields.contains_domain("example.com"));
        assert!(!fields.contains_domain("app.example"));
        assert!(!HostFields::default().contains_domain("app.example.com"));
    }

    #[test]
    fn test_template_copies_allow_list_and_forces_enabled() {
        let host: ProxyHost = serde_json::from_value(server_host()).unwrap();
        let template = Template::from_host(&host);

        assert_eq!(template.fields().enabled, Some(true));
        let value = serde_json::to_value(template.fields()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for key in keys {
            assert!(
                HostField::ALL.iter().any(|f| f.as_str() == key),
                "{} leaked into template",
                key
            );
        }
        assert!(value.get("created_on").is_none());
        assert!(value.get("certificate").is_none());
    }

    #[test]
    fn test_derive_overrides_only_routing_fields() {
        let host: ProxyHost = serde_json::from_value(server_host()).unwrap();
        let template = Template::from_host(&host);

        let derived = template.derive(vec!["new.example.com".into()], "10.0.0.9", 3000);

        assert_eq!(derived.domains(), ["new.example.com".to_string()]);
        assert_eq!(derived.forward_host.as_deref(), Some("10.0.0.9"));
        assert_eq!(derived.forward_port, Some(3000));
        for field in HostField::ALL {
            if matches!(
                field,
                HostField::DomainNames | HostField::ForwardHost | HostField::ForwardPort
            ) {
                continue;
            }
            assert_eq!(
                derived.get(field).unwrap(),
                template.get(field).unwrap(),
                "{} changed",
                field
            );
        }
    }

    #[test]
    fn test_get_by_field() {
        let fields = HostFields {
            advanced_config: Some("client_max_body_size 0;".into()),
            forward_port: Some(9000),
            ..Default::default()
        };

        assert_eq!(
            fields.get(HostField::AdvancedConfig).unwrap(),
            json!("client_max_body_size 0;")
        );
        assert_eq!(fields.get(HostField::ForwardPort).unwrap(), json!(9000));
        assert_eq!(fields.get(HostField::Meta).unwrap(), Value::Null);
        assert_eq!(fields.value(HostField::Meta).unwrap(), None);
    }

    #[test]
    fn test_explicit_null_is_kept_apart_from_absent() {
        let host: ProxyHost = serde_json::from_value(json!({
            "id": 3,
            "domain_names": ["a"],
            "locations": null,
            "certificate_id": null
        }))
        .unwrap();

        assert_eq!(host.fields.locations, Some(Value::Null));
        assert_eq!(host.fields.value(HostField::Locations).unwrap(), Some(Value::Null));
        assert_eq!(host.fields.value(HostField::Meta).unwrap(), None);
        assert!(!host.extra.contains_key("locations"));

        let value = serde_json::to_value(&host).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("locations"), Some(&Value::Null));
        assert_eq!(object.get("certificate_id"), Some(&Value::Null));
        assert!(!object.contains_key("meta"));
    }

    #[test]
    fn test_matches_on_compares_each_field() {
        let a = HostFields {
            advanced_config: Some("a".into()),
            forward_host: Some("h".into()),
            ..Default::default()
        };
        let mut b = a.clone();

        assert!(a
            .matches_on(&b, &[HostField::AdvancedConfig, HostField::ForwardHost])
            .unwrap());

        b.forward_host = Some("other".into());
        assert!(a.matches_on(&b, &[HostField::AdvancedConfig]).unwrap());
        assert!(!a
            .matches_on(&b, &[HostField::AdvancedConfig, HostField::ForwardHost])
            .unwrap());
    }

    #[test]
    fn test_field_names_match_value_enum() {
        for field in HostField::ALL {
            let parsed = HostField::from_str(field.as_str(), false).unwrap();
            assert_eq!(parsed, field);
        }
    }
}

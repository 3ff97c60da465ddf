use crate::config::Credentials;
use crate::error::EtaError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Timeout for a single ETA call. There are no retries.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the `etaws` request envelope for an export operation.
///
/// Credentials are written first, then every extra parameter that has a
/// value, in the order given. Values go in verbatim; ETA does its own
/// unescaping and a repeated key is passed through as-is.
pub fn build_request_xml(
    opstype: &str,
    creds: &Credentials,
    extra_params: &[(&str, Option<&str>)],
) -> String {
    let extras = extra_params
        .iter()
        .filter_map(|(key, value)| value.map(|v| (*key, v)));

    let inner: String = creds
        .params()
        .into_iter()
        .chain(extras)
        .map(|(key, value)| format!("<{key}>{value}</{key}>"))
        .collect();

    format!(
        r#"<etaws><operation opstype="{opstype}">export</operation><parameters>{inner}</parameters></etaws>"#
    )
}

/// Something that can deliver an ETA request envelope and return the reply.
#[async_trait]
pub trait EtaTransport: Send + Sync {
    /// Sends `xml` to `base_url` and returns the trimmed response body.
    async fn fetch(&self, base_url: &str, xml: &str) -> Result<String, EtaError>;
}

/// reqwest-backed transport: GET with the envelope in the `xmldata` query parameter.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, EtaError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, EtaError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EtaError::network(format!("could not build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EtaTransport for HttpTransport {
    async fn fetch(&self, base_url: &str, xml: &str) -> Result<String, EtaError> {
        debug!("GET {} ({} byte envelope)", base_url, xml.len());

        let res = self
            .client
            .get(base_url)
            .query(&[("xmldata", xml)])
            .send()
            .await?;

        let status = res.status();
        let body = res.error_for_status()?.text().await?;

        debug!("ETA answered {} with {} bytes", status, body.len());
        Ok(body.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials {
            customer_code: "SIU".to_string(),
            access_code: "abc123".to_string(),
            username: "dispatch".to_string(),
        }
    }

    #[test]
    fn test_envelope_layout() {
        let xml = build_request_xml("aircraft", &creds(), &[("aircraftstatus", Some("Active"))]);
        assert_eq!(
            xml,
            "<etaws><operation opstype=\"aircraft\">export</operation><parameters>\
             <customercode>SIU</customercode><accesscode>abc123</accesscode>\
             <username>dispatch</username><aircraftstatus>Active</aircraftstatus>\
             </parameters></etaws>"
        );
    }

    #[test]
    fn test_absent_extras_are_omitted() {
        let xml = build_request_xml(
            "aircraft",
            &creds(),
            &[("location", None), ("aircraftstatus", Some("Active"))],
        );
        assert!(!xml.contains("location"));
        assert!(xml.contains("<aircraftstatus>Active</aircraftstatus>"));
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let xml = build_request_xml("aircraft", &creds(), &[("username", Some("override"))]);
        assert!(xml.contains(
            "<username>dispatch</username><username>override</username></parameters>"
        ));
    }

    #[test]
    fn test_values_are_not_escaped() {
        let mut c = creds();
        c.access_code = "a&b<c".to_string();
        let xml = build_request_xml("aircraft", &c, &[]);
        assert!(xml.contains("<accesscode>a&b<c</accesscode>"));
    }
}

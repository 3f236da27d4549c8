//! Request preparation.
//!
//! Every API call starts by turning a path template such as
//! `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}` plus a
//! set of parameters into a [`PreparedRequest`]. Preparation is purely local:
//! nothing is sent until [`ArmClient::send`](crate::client::ArmClient::send).

use bytes::Bytes;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::client::ArmClient;
use crate::error::{ArmError, ArmResult};

/// Characters left as-is inside an encoded path segment (RFC 3986 unreserved).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A single API operation: its name for diagnostics and the HTTP statuses
/// that count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub accepted: &'static [u16],
}

impl Operation {
    pub const fn new(name: &'static str, accepted: &'static [u16]) -> Self {
        Self { name, accepted }
    }

    /// Whether `status` is in this operation's accepted set.
    pub fn accepts(&self, status: u16) -> bool {
        self.accepted.contains(&status)
    }
}

/// A fully formed request, ready to be sent.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub(crate) operation: Operation,
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) body: Option<Bytes>,
}

impl PreparedRequest {
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The serialized JSON body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// First value of query parameter `name`.
    pub fn query_value(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Builder returned by [`ArmClient::request`].
///
/// Errors are deferred: the first invalid parameter is remembered and
/// reported by [`prepare`](Self::prepare).
#[derive(Debug)]
pub struct RequestPreparer<'a> {
    client: &'a ArmClient,
    operation: Operation,
    method: Method,
    template: &'a str,
    path_params: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
    api_version: Option<&'a str>,
    body: Option<Bytes>,
    error: Option<String>,
}

impl<'a> RequestPreparer<'a> {
    pub(crate) fn new(
        client: &'a ArmClient,
        operation: Operation,
        method: Method,
        template: &'a str,
    ) -> Self {
        Self {
            client,
            operation,
            method,
            template,
            path_params: Vec::new(),
            query: Vec::new(),
            api_version: None,
            body: None,
            error: None,
        }
    }

    /// Substitute `{name}` with the percent-encoded `value`.
    pub fn path_param(mut self, name: &'static str, value: &str) -> Self {
        if value.is_empty() {
            self.fail(format!("path parameter '{name}' cannot be empty"));
        } else if is_dot_segment(value) {
            self.fail(format!("path parameter '{name}' cannot be '{value}'"));
        } else {
            let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
            self.path_params.push((name, encoded));
        }
        self
    }

    /// Substitute `{name}` with `value` verbatim.
    ///
    /// Used for scopes and resource ids, which are themselves paths. A leading
    /// `/` is dropped since templates already provide one.
    pub fn raw_path_param(mut self, name: &'static str, value: &str) -> Self {
        let value = value.trim_start_matches('/');
        if value.is_empty() {
            self.fail(format!("path parameter '{name}' cannot be empty"));
        } else if value.split('/').any(is_dot_segment) {
            self.fail(format!(
                "path parameter '{name}' cannot contain '.' or '..' segments"
            ));
        } else {
            self.path_params.push((name, value.to_string()));
        }
        self
    }

    pub fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    pub fn optional_query<V: ToString>(self, name: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn api_version(mut self, version: &'a str) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Serialize `body` as the JSON request payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => self.body = Some(Bytes::from(bytes)),
            Err(e) => self.fail(format!("failed to serialize request body: {e}")),
        }
        self
    }

    /// Build the request.
    pub fn prepare(self) -> ArmResult<PreparedRequest> {
        let operation = self.operation.name;
        if let Some(message) = self.error {
            return Err(ArmError::preparation(operation, message));
        }
        let api_version = self
            .api_version
            .ok_or_else(|| ArmError::preparation(operation, "api-version is required"))?;

        let mut params = self.path_params;
        params.push((
            "subscriptionId",
            utf8_percent_encode(self.client.subscription_id(), PATH_SEGMENT).to_string(),
        ));
        let path = expand_template(self.template, &params)
            .map_err(|message| ArmError::preparation(operation, message))?;

        let mut url = self.client.url(&path).map_err(|e| {
            ArmError::preparation(operation, format!("invalid request URL '{path}': {e}"))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api-version", api_version);
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }

        tracing::trace!(operation, method = %self.method, url = %url, "request prepared");
        Ok(PreparedRequest {
            operation: self.operation,
            method: self.method,
            url,
            body: self.body,
        })
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }
}

/// `.` and `..` (in any percent-encoded spelling) are collapsed by URL
/// resolution and would retarget the request.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded == "." || decoded == ".."
}

/// Replace every `{name}` in `template` with its value from `params`.
///
/// Fails on any placeholder without a value, so a prepared path never
/// carries unsubstituted tokens.
fn expand_template(template: &str, params: &[(&str, String)]) -> Result<String, String> {
    let mut path = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        path.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| format!("unterminated placeholder in '{template}'"))?;
        let name = &after[..end];
        let value = params
            .iter()
            .find(|(param, _)| *param == name)
            .map(|(_, value)| value)
            .ok_or_else(|| format!("no value supplied for path parameter '{name}'"))?;
        path.push_str(value);
        rest = &after[end + 1..];
    }
    path.push_str(rest);
    Ok(path)
}

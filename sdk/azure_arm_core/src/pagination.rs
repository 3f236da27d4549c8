//! Continuation-link paging.
//!
//! List operations return a page of values and, when more are available, a
//! `nextLink` pointing at the next page. Any page type exposing that link
//! implements [`Pageable`], which knows how to turn it into the next request.

use futures::{Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::ArmClient;
use crate::error::{ArmError, ArmResult};
use crate::request::{Operation, PreparedRequest};

/// A page of results from a list operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    /// Opaque link to the next page, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            value: Vec::new(),
            next_link: None,
        }
    }
}

/// Capability of a result envelope that may continue on another page.
pub trait Pageable {
    fn next_link(&self) -> Option<&str>;

    /// Prepare the request for the next page, or `None` on the last page.
    fn next_page_request(
        &self,
        client: &ArmClient,
        operation: &Operation,
    ) -> ArmResult<Option<PreparedRequest>> {
        match self.next_link() {
            Some(link) if !link.is_empty() => client.request_from_link(operation, link).map(Some),
            _ => Ok(None),
        }
    }
}

impl<T> Pageable for ListResult<T> {
    fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }
}

/// Fetch the page following `last`.
///
/// Returns `Ok(None)` without issuing a request when `last` has no
/// continuation link.
pub async fn next_page<P>(client: &ArmClient, operation: &Operation, last: &P) -> ArmResult<Option<P>>
where
    P: Pageable + DeserializeOwned,
{
    let Some(request) = last.next_page_request(client, operation)? else {
        tracing::debug!(operation = operation.name, "no further pages");
        return Ok(None);
    };
    client.send(request).await?.json().await.map(Some)
}

enum PageState<T> {
    Ready(ListResult<T>),
    Fetch(String),
    Done,
}

fn state_after<T>(page: &ListResult<T>) -> PageState<T> {
    match page.next_link() {
        Some(link) if !link.is_empty() => PageState::Fetch(link.to_string()),
        _ => PageState::Done,
    }
}

/// Stream `first` and every page after it.
///
/// Each page is fetched lazily, only once the previous one was consumed.
pub fn pages<T>(
    client: &ArmClient,
    operation: Operation,
    first: ListResult<T>,
) -> impl Stream<Item = ArmResult<ListResult<T>>> + '_
where
    T: DeserializeOwned + 'static,
{
    futures::stream::try_unfold(PageState::Ready(first), move |state| async move {
        match state {
            PageState::Ready(page) => {
                let next = state_after(&page);
                Ok::<_, ArmError>(Some((page, next)))
            }
            PageState::Fetch(link) => {
                let request = client.request_from_link(&operation, &link)?;
                let page: ListResult<T> = client.send(request).await?.json().await?;
                let next = state_after(&page);
                Ok(Some((page, next)))
            }
            PageState::Done => Ok(None),
        }
    })
}

/// Follow continuation links from `first` and gather every value.
pub async fn collect_all<T>(
    client: &ArmClient,
    operation: Operation,
    first: ListResult<T>,
) -> ArmResult<Vec<T>>
where
    T: DeserializeOwned + 'static,
{
    pages(client, operation, first)
        .try_fold(Vec::new(), |mut all, page| async move {
            all.extend(page.value);
            Ok::<_, ArmError>(all)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ArmCredential;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIST: Operation = Operation::new("test/things/list", &[200]);

    async fn setup_mock_client(server: &MockServer) -> ArmClient {
        ArmClient::builder()
            .endpoint(server.uri())
            .subscription_id("sub-1")
            .credential(ArmCredential::access_token("test-token"))
            .build()
            .expect("should build client")
    }

    #[test]
    fn list_result_deserializes_next_link() {
        let page: ListResult<String> = serde_json::from_value(serde_json::json!({
            "value": ["a", "b"],
            "nextLink": "https://management.azure.com/next"
        }))
        .unwrap();
        assert_eq!(page.value, vec!["a", "b"]);
        assert_eq!(page.next_link(), Some("https://management.azure.com/next"));
    }

    #[test]
    fn list_result_without_value_is_empty() {
        let page: ListResult<String> = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link().is_none());
    }

    #[tokio::test]
    async fn last_page_yields_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let last = ListResult::<String>::default();

        assert!(last.next_page_request(&client, &LIST).unwrap().is_none());
        assert!(next_page(&client, &LIST, &last).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_next_link_is_treated_as_last_page() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;
        let last = ListResult::<String> {
            value: vec![],
            next_link: Some(String::new()),
        };
        assert!(last.next_page_request(&client, &LIST).unwrap().is_none());
    }

    #[tokio::test]
    async fn collect_all_follows_links() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/things"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": ["c"],
                "nextLink": format!("{}/things?page=3", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/things"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": ["d"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let first = ListResult {
            value: vec!["a".to_string(), "b".to_string()],
            next_link: Some(format!("{}/things?page=2", server.uri())),
        };

        let all = collect_all(&client, LIST, first).await.expect("should collect");
        assert_eq!(all, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn page_error_stops_the_stream() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let first = ListResult {
            value: vec!["a".to_string()],
            next_link: Some(format!("{}/things?page=2", server.uri())),
        };

        let err = collect_all(&client, LIST, first).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}

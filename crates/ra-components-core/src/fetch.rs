//! Asynchronous data sources behind the widgets.
//!
//! Widgets only ever return request values; these traits let a host plug in a real backend and
//! turn each request into the response type the widget expects. The futures are executor
//! agnostic; drive them with whatever runtime the application already has.

use crate::autocomplete::Item;
use crate::autocomplete::SearchRequest;
use crate::autocomplete::SearchResponse;
use crate::datatable::FetchRequest;
use crate::datatable::FetchResponse;
use crate::datatable::FetchReply;
use crate::error::FetchError;
use futures::future::BoxFuture;
use tracing::debug;

/// Looks up suggestions for an autocomplete.
///
/// An empty page tells the widget the query has no further results.
pub trait SearchSource: Send + Sync {
    fn search(&self, request: SearchRequest) -> BoxFuture<'_, Result<Vec<Item>, FetchError>>;
}

impl<F> SearchSource for F
where
    F: Fn(SearchRequest) -> BoxFuture<'static, Result<Vec<Item>, FetchError>> + Send + Sync,
{
    fn search(&self, request: SearchRequest) -> BoxFuture<'_, Result<Vec<Item>, FetchError>> {
        self(request)
    }
}

/// Loads one page of rows for a data table.
pub trait DataSource: Send + Sync {
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'_, Result<FetchResponse, FetchError>>;
}

impl<F> DataSource for F
where
    F: Fn(FetchRequest) -> BoxFuture<'static, Result<FetchResponse, FetchError>> + Send + Sync,
{
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'_, Result<FetchResponse, FetchError>> {
        self(request)
    }
}

/// Runs `request` against `source` and packages the answer for
/// [`Autocomplete::complete_search`](crate::autocomplete::Autocomplete::complete_search).
pub async fn resolve_search<S>(source: &S, request: SearchRequest) -> SearchResponse
where
    S: SearchSource + ?Sized,
{
    let token = request.token;
    debug!(query = %request.query, page = request.page, "resolving search");
    SearchResponse {
        token,
        result: source.search(request).await,
    }
}

/// Runs `request` against `source` and packages the answer for
/// [`DataTable::complete_fetch`](crate::datatable::DataTable::complete_fetch).
pub async fn resolve_fetch<S>(source: &S, request: FetchRequest) -> FetchReply
where
    S: DataSource + ?Sized,
{
    let token = request.token;
    debug!(page = request.page, "resolving fetch");
    FetchReply {
        token,
        result: source.fetch(request).await,
    }
}

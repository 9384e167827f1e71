//! News source client.
//!
//! Translates a [`Filter`](crate::store::Filter) and page number into one
//! request against a NewsAPI-compatible service and normalizes the response
//! into a [`Page`]:
//!
//! - **Endpoints**: `/everything` for searches, `/top-headlines` otherwise
//! - **Normalization**: removed or untitled articles never leave this module
//! - **Paging**: continuation computed from the upstream `totalResults`
//!
//! # Example
//!
//! ```ignore
//! let http = build_http_client(Duration::from_secs(30))?;
//! let client = NewsClient::new(http, api_key, DEFAULT_BASE_URL, "us");
//! let page = client.fetch_page(&Filter::Category(Category::Business), 1).await?;
//! ```

mod client;
mod page;

pub use client::{build_http_client, ErrorKind, NewsClient, NewsError, DEFAULT_BASE_URL};
pub use page::{next_page_token, Page, PAGE_SIZE};

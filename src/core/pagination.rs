use crate::domain::model::{Page, PageRequest};
use crate::utils::error::Result;
use std::future::Future;

/// Fetches pages starting at page 1 until the server stops advertising a
/// next page, concatenating the items in the order they were served.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut request = PageRequest::first();
    let mut items = Vec::new();

    loop {
        let page = fetch(request).await?;
        tracing::debug!(
            page = request.page,
            count = page.items.len(),
            next = ?page.next_page,
            "fetched page"
        );
        items.extend(page.items);

        match page.next_page {
            Some(next) if next > request.page => request = request.at(next),
            // A server pointing backwards would loop forever.
            Some(next) => {
                tracing::warn!(page = request.page, next, "ignoring non-advancing next page");
                break;
            }
            None => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::GhmError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_collects_until_no_next_page() {
        let calls = AtomicU32::new(0);
        let items = collect_pages(|req| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                assert_eq!(req.per_page, 100);
                Ok::<_, GhmError>(Page {
                    items: vec![req.page * 10, req.page * 10 + 1],
                    next_page: (req.page < 3).then_some(req.page + 1),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![10, 11, 20, 21, 30, 31]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stops_on_non_advancing_page() {
        let items = collect_pages(|req| async move {
            Ok::<_, GhmError>(Page {
                items: vec![req.page],
                next_page: Some(1),
            })
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1]);
    }

    #[tokio::test]
    async fn test_propagates_page_error() {
        let result: Result<Vec<u32>> = collect_pages(|req| async move {
            if req.page == 2 {
                Err(GhmError::remote("page 2", "boom"))
            } else {
                Ok(Page {
                    items: vec![1],
                    next_page: Some(2),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(GhmError::Remote { .. })));
    }
}

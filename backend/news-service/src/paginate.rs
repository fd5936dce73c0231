//! Page arithmetic for the post list endpoints
//!
//! Pages are 1-based and hold [`POSTS_PER_PAGE`] posts. The page count is
//! `total / POSTS_PER_PAGE + 1`, which reports one extra page when `total`
//! is an exact multiple of the page size. Clients depend on these numbers,
//! so the quirk is kept as is.

use std::future::Future;

use news_common::{Pagination, Post, PostPage};

use crate::error::{AppError, Result};

/// Fixed number of posts per page
pub const POSTS_PER_PAGE: u64 = 10;

/// Parse the `page` query parameter.
///
/// Anything that is not an integer `>= 1` is a client error.
pub fn parse_page(raw: Option<&str>) -> Result<u32> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .ok_or_else(|| AppError::InvalidInput("Invalid page number".to_string()))
}

/// Offset of the first post on `page`.
pub fn page_offset(page: u32) -> u64 {
    POSTS_PER_PAGE * (u64::from(page.max(1)) - 1)
}

/// Number of pages reported for `total` posts.
pub fn total_pages(total: u64) -> u32 {
    if total == 0 {
        return 1;
    }
    u32::try_from(total / POSTS_PER_PAGE + 1).unwrap_or(u32::MAX)
}

/// Metadata for `page` given the total count and how many posts the store
/// returned for that page.
///
/// `page` is not checked against the page count: a page past the end simply
/// reports `total % POSTS_PER_PAGE` posts.
pub fn pagination(total: u64, page: u32, fetched: usize) -> Pagination {
    if total == 0 {
        return Pagination {
            current_page: 1,
            total_pages: 1,
            number_of_posts: 0,
        };
    }

    let pages = total_pages(total);
    let number_of_posts = if page < pages {
        u32::try_from(fetched).unwrap_or(u32::MAX)
    } else {
        (total % POSTS_PER_PAGE) as u32
    };

    Pagination {
        current_page: page,
        total_pages: pages,
        number_of_posts,
    }
}

/// Build one page of posts.
///
/// `fetch` receives `(offset, limit)` and is skipped entirely when there are
/// no posts.
pub async fn paginate<F, Fut>(total: u64, page: u32, fetch: F) -> Result<PostPage>
where
    F: FnOnce(u64, u64) -> Fut,
    Fut: Future<Output = Result<Vec<Post>>>,
{
    if total == 0 {
        return Ok(PostPage {
            posts: Vec::new(),
            pagination: pagination(0, page, 0),
        });
    }

    let posts = fetch(page_offset(page), POSTS_PER_PAGE).await?;
    let meta = pagination(total, page, posts.len());

    Ok(PostPage {
        posts,
        pagination: meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts(n: usize) -> Vec<Post> {
        (0..n)
            .map(|i| Post {
                id: i as i64 + 1,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_parse_page_accepts_positive_integers() {
        assert_eq!(parse_page(Some("1")).unwrap(), 1);
        assert_eq!(parse_page(Some(" 42 ")).unwrap(), 42);
    }

    #[test]
    fn test_parse_page_rejects_invalid_input() {
        for raw in [None, Some(""), Some("0"), Some("-1"), Some("abc"), Some("1.5")] {
            let err = parse_page(raw).unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "input {:?}", raw);
        }
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), 10);
        assert_eq!(page_offset(7), 60);
    }

    #[test]
    fn test_zero_items_report_single_empty_page() {
        for page in [1, 2, 99] {
            let meta = pagination(0, page, 0);
            assert_eq!(
                meta,
                Pagination {
                    current_page: 1,
                    total_pages: 1,
                    number_of_posts: 0
                }
            );
        }
    }

    #[test]
    fn test_exact_multiple_reports_extra_page() {
        // Known quirk: 10 posts with page size 10 report 2 pages.
        assert_eq!(total_pages(10), 2);
        assert_eq!(total_pages(20), 3);

        let last = pagination(10, 2, 0);
        assert_eq!(last.total_pages, 2);
        assert_eq!(last.number_of_posts, 0);
    }

    #[test]
    fn test_partial_last_page() {
        assert_eq!(total_pages(25), 3);

        let first = pagination(25, 1, 10);
        assert_eq!(first.number_of_posts, 10);
        assert_eq!(first.total_pages, 3);

        let last = pagination(25, 3, 5);
        assert_eq!(last.current_page, 3);
        assert_eq!(last.number_of_posts, 5);
    }

    #[test]
    fn test_page_past_the_end_is_permissive() {
        let meta = pagination(25, 9, 0);
        assert_eq!(meta.current_page, 9);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.number_of_posts, 5);
    }

    #[tokio::test]
    async fn test_paginate_skips_fetch_when_empty() {
        let page = paginate(0, 3, |_, _| async {
            Err::<Vec<Post>, _>(AppError::Internal("must not be called".to_string()))
        })
        .await
        .unwrap();

        assert!(page.posts.is_empty());
        assert_eq!(page.pagination.current_page, 1);
    }

    #[tokio::test]
    async fn test_paginate_passes_offset_and_limit() {
        let page = paginate(25, 2, |offset, limit| async move {
            assert_eq!(offset, 10);
            assert_eq!(limit, POSTS_PER_PAGE);
            Ok(posts(10))
        })
        .await
        .unwrap();

        assert_eq!(page.posts.len(), 10);
        assert_eq!(page.pagination.number_of_posts, 10);
    }

    #[tokio::test]
    async fn test_paginate_propagates_fetch_error() {
        let result = paginate(5, 1, |_, _| async {
            Err::<Vec<Post>, _>(AppError::Database("connection reset".to_string()))
        })
        .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}

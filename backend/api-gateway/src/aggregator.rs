//! Request aggregation
//!
//! Two workflows live here:
//!
//! - [`Aggregator::detailed_post`] fetches a post and its comment forest
//!   concurrently and merges them. The fetches run as independent tasks that
//!   each put one message into a two-slot channel; the merge point reads
//!   until it has both parts or sees the first failure. A fetch that is still
//!   running when the other one fails is not cancelled; its result is simply
//!   never read. When both fail, whichever error reaches the channel first is
//!   reported.
//! - [`Aggregator::add_comment`] runs the moderation gate and, only after an
//!   accept verdict, the comment store. The two calls never overlap.

use news_common::http_client::RawResponse;
use news_common::{dismantle_forest, Comment, DetailedPost, Post};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::SendError};
use tracing::{debug, info, warn};

use crate::clients::{CommentsBackend, ModerationDecision, ModerationGate, NewsBackend};
use crate::error::{GatewayError, Result};
use crate::metrics;

/// One message into the merge point
enum FetchOutcome {
    Post(Post),
    CommentList(Vec<Comment>),
    Failure(GatewayError),
}

/// Release comment forests that will never be merged. Reply threads nest
/// without limit, so they are taken apart iteratively.
fn discard_pending(rx: &mut mpsc::Receiver<FetchOutcome>, forest: Option<Vec<Comment>>) {
    if let Some(list) = forest {
        dismantle_forest(list);
    }
    rx.close();
    while let Ok(outcome) = rx.try_recv() {
        if let FetchOutcome::CommentList(list) = outcome {
            dismantle_forest(list);
        }
    }
}

#[derive(Clone)]
pub struct Aggregator {
    news: Arc<dyn NewsBackend>,
    comments: Arc<dyn CommentsBackend>,
    gate: Arc<dyn ModerationGate>,
}

impl Aggregator {
    pub fn new(
        news: Arc<dyn NewsBackend>,
        comments: Arc<dyn CommentsBackend>,
        gate: Arc<dyn ModerationGate>,
    ) -> Self {
        Self {
            news,
            comments,
            gate,
        }
    }

    /// Post `post_id` with its comment forest attached.
    pub async fn detailed_post(&self, post_id: i64, request_id: &str) -> Result<DetailedPost> {
        let (tx, mut rx) = mpsc::channel::<FetchOutcome>(2);

        let news = Arc::clone(&self.news);
        let post_tx = tx.clone();
        let rid = request_id.to_string();
        tokio::spawn(async move {
            let outcome = match news.post_by_id(post_id, &rid).await {
                Ok(post) => FetchOutcome::Post(post),
                Err(e) => FetchOutcome::Failure(GatewayError::from_post_fetch(e)),
            };
            // The receiver is gone if the other fetch already failed.
            let _ = post_tx.send(outcome).await;
        });

        let comments = Arc::clone(&self.comments);
        let comments_tx = tx;
        let rid = request_id.to_string();
        tokio::spawn(async move {
            let outcome = match comments.comments(post_id, &rid).await {
                Ok(list) => FetchOutcome::CommentList(list),
                Err(e) => FetchOutcome::Failure(GatewayError::from(e)),
            };
            if let Err(SendError(FetchOutcome::CommentList(list))) = comments_tx.send(outcome).await {
                dismantle_forest(list);
            }
        });

        let mut post = None;
        let mut forest = None;

        while post.is_none() || forest.is_none() {
            match rx.recv().await {
                Some(FetchOutcome::Post(p)) => post = Some(p),
                Some(FetchOutcome::CommentList(c)) => forest = Some(c),
                Some(FetchOutcome::Failure(err)) => {
                    discard_pending(&mut rx, forest.take());
                    warn!(request_id, post_id, error = %err, "Post aggregation failed");
                    metrics::record_aggregation(if matches!(err, GatewayError::NotFound(_)) {
                        "not_found"
                    } else {
                        "failure"
                    });
                    return Err(err);
                }
                // Both senders dropped without a message: a fetch task panicked.
                None => {
                    metrics::record_aggregation("failure");
                    return Err(GatewayError::Internal(
                        "fetch task ended without a result".to_string(),
                    ));
                }
            }
        }

        match (post, forest) {
            (Some(post), Some(comments)) => {
                debug!(request_id, post_id, roots = comments.len(), "Post aggregated");
                metrics::record_aggregation("success");
                Ok(DetailedPost::new(post, comments))
            }
            _ => Err(GatewayError::Internal("incomplete aggregation".to_string())),
        }
    }

    /// Moderate `comment`, then store it. Returns the new comment id.
    pub async fn add_comment(&self, comment: Comment, request_id: &str) -> Result<i64> {
        let decision = self.gate.moderate(&comment, request_id).await.map_err(|e| {
            metrics::record_moderation("error");
            warn!(request_id, error = %e, "Moderation gate unreachable");
            GatewayError::Downstream(e.to_string())
        })?;

        if let ModerationDecision::Rejected { reason } = decision {
            metrics::record_moderation("rejected");
            info!(request_id, post_id = comment.post_id, "Comment rejected by moderation");
            return Err(GatewayError::ModerationRejected(reason));
        }
        metrics::record_moderation("accepted");

        let id = self
            .comments
            .store_comment(&comment, request_id)
            .await
            .map_err(|e| {
                metrics::record_comment_write("failed");
                warn!(request_id, error = %e, "Accepted comment could not be stored");
                GatewayError::Persistence(e.to_string())
            })?;

        metrics::record_comment_write("stored");
        info!(request_id, post_id = comment.post_id, comment_id = id, "Comment stored");
        Ok(id)
    }

    /// Page of posts as news-service returned it.
    pub async fn posts_page(&self, page: u32, request_id: &str) -> Result<RawResponse> {
        Ok(self.news.list_posts(page, request_id).await?)
    }

    /// Page of posts matching `query` as news-service returned it.
    pub async fn filtered_page(&self, query: &str, page: u32, request_id: &str) -> Result<RawResponse> {
        Ok(self.news.filter_posts(query, page, request_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{MockCommentsBackend, MockModerationGate, MockNewsBackend};
    use async_trait::async_trait;
    use news_common::ServiceError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn post(id: i64) -> Post {
        Post {
            id,
            title: "Title".into(),
            content: "Body".into(),
            pub_time: 1_700_000_000,
            link: format!("https://news.example/{}", id),
        }
    }

    fn comment(id: i64, parent_id: i64) -> Comment {
        Comment {
            id,
            post_id: 1,
            parent_id,
            content: format!("comment {}", id),
            ..Default::default()
        }
    }

    fn transport(service: &str) -> ServiceError {
        ServiceError::Transport {
            service: service.into(),
            message: "connection refused".into(),
        }
    }

    fn aggregator(
        news: MockNewsBackend,
        comments: MockCommentsBackend,
        gate: MockModerationGate,
    ) -> Aggregator {
        Aggregator::new(Arc::new(news), Arc::new(comments), Arc::new(gate))
    }

    #[tokio::test]
    async fn test_detailed_post_merges_both_results() {
        let mut news = MockNewsBackend::new();
        news.expect_post_by_id()
            .withf(|id, rid| *id == 1 && rid == "req-1")
            .times(1)
            .returning(|id, _| Ok(post(id)));

        let mut comments = MockCommentsBackend::new();
        comments
            .expect_comments()
            .withf(|id, rid| *id == 1 && rid == "req-1")
            .times(1)
            .returning(|_, _| {
                let mut root = comment(2, 0);
                root.replies = vec![comment(3, 2)];
                Ok(vec![root, comment(4, 0)])
            });

        let agg = aggregator(news, comments, MockModerationGate::new());
        let detailed = agg.detailed_post(1, "req-1").await.unwrap();

        assert_eq!(detailed.post.id, 1);
        assert_eq!(detailed.comments.len(), 2);
        assert_eq!(detailed.comments[0].replies[0].id, 3);
    }

    #[tokio::test]
    async fn test_post_failure_discards_comments() {
        let mut news = MockNewsBackend::new();
        news.expect_post_by_id()
            .returning(|_, _| Err(transport("news-service")));

        let mut comments = MockCommentsBackend::new();
        comments
            .expect_comments()
            .returning(|_, _| Ok(vec![comment(2, 0)]));

        let agg = aggregator(news, comments, MockModerationGate::new());
        let err = agg.detailed_post(1, "req").await.unwrap_err();

        assert!(matches!(err, GatewayError::Downstream(_)));
    }

    #[tokio::test]
    async fn test_post_failure_releases_deep_forest() {
        let mut news = MockNewsBackend::new();
        news.expect_post_by_id()
            .returning(|_, _| Err(transport("news-service")));

        let mut comments = MockCommentsBackend::new();
        comments.expect_comments().returning(|_, _| {
            let mut node = comment(20_000, 19_999);
            for id in (1..20_000).rev() {
                let mut parent = comment(id, id - 1);
                parent.replies = vec![node];
                node = parent;
            }
            Ok(vec![node])
        });

        let agg = aggregator(news, comments, MockModerationGate::new());
        let err = agg.detailed_post(1, "req").await.unwrap_err();
        assert!(matches!(err, GatewayError::Downstream(_)));

        // Let the comments task finish and hand its forest back.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_comments_failure_discards_post() {
        let mut news = MockNewsBackend::new();
        news.expect_post_by_id().returning(|id, _| Ok(post(id)));

        let mut comments = MockCommentsBackend::new();
        comments
            .expect_comments()
            .returning(|_, _| Err(transport("comments-service")));

        let agg = aggregator(news, comments, MockModerationGate::new());
        let err = agg.detailed_post(1, "req").await.unwrap_err();

        assert!(err.to_string().contains("comments-service"));
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let mut news = MockNewsBackend::new();
        news.expect_post_by_id().returning(|_, _| {
            Err(ServiceError::Status {
                service: "news-service".into(),
                status: 404,
                body: "Post not found".into(),
            })
        });

        let mut comments = MockCommentsBackend::new();
        comments.expect_comments().returning(|_, _| Ok(Vec::new()));

        let agg = aggregator(news, comments, MockModerationGate::new());
        let err = agg.detailed_post(9, "req").await.unwrap_err();

        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_double_failure_reports_whichever_arrives_first() {
        // Which error wins is decided by arrival order at the merge point and
        // is not deterministic. Only assert that one of the two is reported.
        let mut news = MockNewsBackend::new();
        news.expect_post_by_id()
            .returning(|_, _| Err(transport("news-service")));

        let mut comments = MockCommentsBackend::new();
        comments
            .expect_comments()
            .returning(|_, _| Err(transport("comments-service")));

        let agg = aggregator(news, comments, MockModerationGate::new());
        let message = agg.detailed_post(1, "req").await.unwrap_err().to_string();

        assert!(message.contains("news-service") || message.contains("comments-service"));
    }

    /// Both fetches wait on a shared barrier, so the aggregation only
    /// completes if they are in flight at the same time.
    struct BarrierBackend {
        barrier: Arc<Barrier>,
    }

    #[async_trait]
    impl NewsBackend for BarrierBackend {
        async fn post_by_id(&self, id: i64, _request_id: &str) -> news_common::Result<Post> {
            self.barrier.wait().await;
            Ok(post(id))
        }

        async fn list_posts(&self, _page: u32, _request_id: &str) -> news_common::Result<RawResponse> {
            unreachable!()
        }

        async fn filter_posts(
            &self,
            _query: &str,
            _page: u32,
            _request_id: &str,
        ) -> news_common::Result<RawResponse> {
            unreachable!()
        }
    }

    #[async_trait]
    impl CommentsBackend for BarrierBackend {
        async fn comments(&self, _post_id: i64, _request_id: &str) -> news_common::Result<Vec<Comment>> {
            self.barrier.wait().await;
            Ok(vec![comment(2, 0)])
        }

        async fn store_comment(&self, _comment: &Comment, _request_id: &str) -> news_common::Result<i64> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let agg = Aggregator::new(
            Arc::new(BarrierBackend {
                barrier: Arc::clone(&barrier),
            }),
            Arc::new(BarrierBackend { barrier }),
            Arc::new(MockModerationGate::new()),
        );

        let detailed = tokio::time::timeout(Duration::from_secs(5), agg.detailed_post(1, "req"))
            .await
            .expect("fetches were serialized")
            .unwrap();

        assert_eq!(detailed.comments.len(), 1);
    }

    struct SlowComments {
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CommentsBackend for SlowComments {
        async fn comments(&self, _post_id: i64, _request_id: &str) -> news_common::Result<Vec<Comment>> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn store_comment(&self, _comment: &Comment, _request_id: &str) -> news_common::Result<i64> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_sibling_fetch_is_not_cancelled() {
        let finished = Arc::new(AtomicBool::new(false));

        let mut news = MockNewsBackend::new();
        news.expect_post_by_id()
            .returning(|_, _| Err(transport("news-service")));

        let agg = Aggregator::new(
            Arc::new(news),
            Arc::new(SlowComments {
                finished: Arc::clone(&finished),
            }),
            Arc::new(MockModerationGate::new()),
        );

        assert!(agg.detailed_post(1, "req").await.is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_rejected_comment_is_never_stored() {
        let mut gate = MockModerationGate::new();
        gate.expect_moderate().times(1).returning(|_, _| {
            Ok(ModerationDecision::Rejected {
                reason: "banned word".into(),
            })
        });

        let mut comments = MockCommentsBackend::new();
        comments.expect_store_comment().never();

        let agg = aggregator(MockNewsBackend::new(), comments, gate);
        let err = agg.add_comment(comment(0, 0), "req").await.unwrap_err();

        assert!(matches!(err, GatewayError::ModerationRejected(_)));
    }

    #[tokio::test]
    async fn test_unreachable_gate_is_not_an_accept() {
        let mut gate = MockModerationGate::new();
        gate.expect_moderate()
            .returning(|_, _| Err(transport("censor-service")));

        let mut comments = MockCommentsBackend::new();
        comments.expect_store_comment().never();

        let agg = aggregator(MockNewsBackend::new(), comments, gate);
        let err = agg.add_comment(comment(0, 0), "req").await.unwrap_err();

        assert!(matches!(err, GatewayError::Downstream(_)));
    }

    #[tokio::test]
    async fn test_accepted_comment_is_stored_after_moderation() {
        let mut seq = mockall::Sequence::new();

        let mut gate = MockModerationGate::new();
        gate.expect_moderate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(ModerationDecision::Accepted));

        let mut comments = MockCommentsBackend::new();
        comments
            .expect_store_comment()
            .withf(|c, rid| c.content == "comment 0" && rid == "req-7")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(42));

        let agg = aggregator(MockNewsBackend::new(), comments, gate);
        assert_eq!(agg.add_comment(comment(0, 0), "req-7").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let mut gate = MockModerationGate::new();
        gate.expect_moderate()
            .returning(|_, _| Ok(ModerationDecision::Accepted));

        let mut comments = MockCommentsBackend::new();
        comments.expect_store_comment().returning(|_, _| {
            Err(ServiceError::Status {
                service: "comments-service".into(),
                status: 500,
                body: "db down".into(),
            })
        });

        let agg = aggregator(MockNewsBackend::new(), comments, gate);
        let err = agg.add_comment(comment(0, 0), "req").await.unwrap_err();

        assert!(matches!(err, GatewayError::Persistence(_)));
    }
}

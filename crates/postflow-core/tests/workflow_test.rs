//! End-to-end workflow tests
//!
//! Drive whole sessions through the public API with in-process executors.

use async_trait::async_trait;
use postflow_core::{
    Article, ArticleSearch, AuditEventType, ContentCrawler, Draft, DraftGenerator,
    EnrichedArticle, Error, ExecutorError, ExecutorResult, Orchestrator, OrchestratorConfig,
    PipelineStage, PublishResult, Publisher, Session, SessionId, WorkflowStage,
};
use postflow_replay::{AuditSink, MemoryAuditStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Calls {
    search: AtomicUsize,
    crawl: AtomicUsize,
    generate: AtomicUsize,
    publish: AtomicUsize,
}

struct FakeSearch(Arc<Calls>);

#[async_trait]
impl ArticleSearch for FakeSearch {
    async fn fetch_articles(
        &self,
        query: &str,
        _session_id: SessionId,
    ) -> ExecutorResult<Vec<Article>> {
        self.0.search.fetch_add(1, Ordering::SeqCst);
        if query.contains("fail") {
            return Err(ExecutorError::Provider("search backend unavailable".to_string()));
        }
        Ok(vec![
            Article::new("AI beats benchmark", "https://news.example/1"),
            Article::new("New AI regulation", "https://news.example/2"),
        ])
    }
}

struct FakeCrawler(Arc<Calls>);

#[async_trait]
impl ContentCrawler for FakeCrawler {
    async fn enrich(
        &self,
        articles: &[Article],
        _session_id: SessionId,
    ) -> ExecutorResult<Vec<EnrichedArticle>> {
        self.0.crawl.fetch_add(1, Ordering::SeqCst);
        Ok(articles
            .iter()
            .map(|a| EnrichedArticle::new(a.clone(), format!("Body of {}", a.title)))
            .collect())
    }
}

struct FakeGenerator(Arc<Calls>);

#[async_trait]
impl DraftGenerator for FakeGenerator {
    async fn generate(
        &self,
        articles: &[EnrichedArticle],
        _session_id: SessionId,
    ) -> ExecutorResult<Vec<Draft>> {
        self.0.generate.fetch_add(1, Ordering::SeqCst);
        Ok((1..=3)
            .map(|n| Draft::new(n, format!("Draft {} from {} sources", n, articles.len())))
            .collect())
    }
}

struct FakePublisher(Arc<Calls>);

#[async_trait]
impl Publisher for FakePublisher {
    async fn publish(&self, _text: &str, _session_id: SessionId) -> ExecutorResult<PublishResult> {
        self.0.publish.fetch_add(1, Ordering::SeqCst);
        Ok(PublishResult::published("12345"))
    }
}

fn orchestrator(
    publish_enabled: bool,
) -> (Orchestrator, Arc<Calls>, Arc<MemoryAuditStore>) {
    let calls = Arc::new(Calls::default());
    let store = Arc::new(MemoryAuditStore::new());
    let orchestrator = Orchestrator::new(
        Arc::new(FakeSearch(calls.clone())),
        Arc::new(FakeCrawler(calls.clone())),
        Arc::new(FakeGenerator(calls.clone())),
        store.clone(),
        OrchestratorConfig::new().with_publish_enabled(publish_enabled),
    )
    .with_publisher(Arc::new(FakePublisher(calls.clone())));

    (orchestrator, calls, store)
}

#[tokio::test]
async fn test_end_to_end_publish() {
    let (orchestrator, calls, store) = orchestrator(true);
    let mut session = Session::new();

    orchestrator
        .submit_input(&mut session, "Create a tweet about AI technology")
        .await
        .unwrap();
    orchestrator.run_pipeline(&mut session).await.unwrap();

    assert_eq!(session.articles().unwrap().len(), 2);
    assert_eq!(session.enriched_articles().unwrap().len(), 2);
    assert_eq!(session.drafts().unwrap().len(), 3);

    orchestrator.select_draft(&mut session, "2").await.unwrap();
    assert_eq!(session.stage(), WorkflowStage::DraftUnderReview);
    assert_eq!(session.selected_draft_number(), Some(2));

    orchestrator.request_publish(&mut session).await.unwrap();
    assert_eq!(session.stage(), WorkflowStage::Published);
    assert_eq!(
        session.publish_result(),
        Some(&PublishResult {
            success: true,
            external_id: "12345".to_string(),
        })
    );
    assert_eq!(calls.publish.load(Ordering::SeqCst), 1);

    // One event per stage change: input, 3 pipeline steps, selection,
    // publish requested, published
    let events = store.session_events(session.id().as_uuid()).await.unwrap();
    assert_eq!(events.len(), 7);
    assert!(events.iter().all(|e| !e.is_error()));
    assert_eq!(
        events.iter().map(|e| e.sequence_num).collect::<Vec<_>>(),
        (1..=7).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_end_to_end_publish_disabled() {
    let (orchestrator, calls, store) = orchestrator(false);
    let mut session = Session::new();

    orchestrator
        .submit_input(&mut session, "Create a tweet about AI technology")
        .await
        .unwrap();
    orchestrator.run_pipeline(&mut session).await.unwrap();
    orchestrator.select_draft(&mut session, "1").await.unwrap();
    let result = orchestrator.request_publish(&mut session).await.unwrap();

    assert!(result.is_none());
    assert_eq!(session.stage(), WorkflowStage::PublishSkipped);
    assert_eq!(calls.publish.load(Ordering::SeqCst), 0);

    let system = store
        .events_of_type(session.id().as_uuid(), AuditEventType::System)
        .await;
    assert_eq!(system.len(), 4);
    assert!(system.last().unwrap().content.contains("skipped"));
}

#[tokio::test]
async fn test_reselect_does_not_rerun_pipeline() {
    let (orchestrator, calls, _) = orchestrator(false);
    let mut session = Session::new();

    orchestrator
        .submit_input(&mut session, "Create a tweet about AI technology")
        .await
        .unwrap();
    orchestrator.run_pipeline(&mut session).await.unwrap();

    for choice in ["1", "3", "2"] {
        orchestrator.select_draft(&mut session, choice).await.unwrap();
        orchestrator.choose_different_draft(&mut session).await.unwrap();
    }
    orchestrator.select_draft(&mut session, "2").await.unwrap();

    assert_eq!(session.selected_draft().unwrap().number, 2);
    assert_eq!(calls.search.load(Ordering::SeqCst), 1);
    assert_eq!(calls.crawl.load(Ordering::SeqCst), 1);
    assert_eq!(calls.generate.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_session_recovers_with_new_request() {
    let (orchestrator, calls, store) = orchestrator(false);
    let mut session = Session::new();

    orchestrator
        .submit_input(&mut session, "this one will fail")
        .await
        .unwrap();
    let err = orchestrator.run_pipeline(&mut session).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Stage {
            stage: PipelineStage::Search,
            ..
        }
    ));
    assert_eq!(session.stage(), WorkflowStage::Failed(PipelineStage::Search));
    assert_eq!(calls.crawl.load(Ordering::SeqCst), 0);

    orchestrator
        .submit_input(&mut session, "Create a tweet about AI technology")
        .await
        .unwrap();
    orchestrator.run_pipeline(&mut session).await.unwrap();
    assert_eq!(session.stage(), WorkflowStage::DraftsGenerated);

    let errors = store
        .events_of_type(session.id().as_uuid(), AuditEventType::Error)
        .await;
    assert_eq!(errors.len(), 1);
}

#[tokio::test]
async fn test_concurrent_sessions_are_isolated() {
    let (orchestrator, calls, store) = orchestrator(true);
    let orchestrator = Arc::new(orchestrator);

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            let mut session = Session::new();
            orchestrator
                .submit_input(&mut session, &format!("Create tweet number {i}"))
                .await
                .unwrap();
            orchestrator.run_pipeline(&mut session).await.unwrap();
            let choice = (i % 3 + 1).to_string();
            orchestrator.select_draft(&mut session, &choice).await.unwrap();
            orchestrator.request_publish(&mut session).await.unwrap();
            session
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let session = handle.await.unwrap();
        assert_eq!(session.stage(), WorkflowStage::Published);
        assert_eq!(session.selected_draft_number(), Some(i as u8 % 3 + 1));

        let events = store.session_events(session.id().as_uuid()).await.unwrap();
        assert_eq!(events.len(), 7);
        assert!(events.iter().all(|e| e.session_id == session.id().as_uuid()));
    }

    assert_eq!(calls.publish.load(Ordering::SeqCst), 8);
    assert_eq!(store.len().await, 56);
}

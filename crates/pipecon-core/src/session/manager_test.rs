#[cfg(test)]
mod tests {
    use crate::audit::AuditEvent;
    use crate::pipeline::CrawlerBatch;
    use crate::audit::TraceId;
    use crate::session::manager::SessionManager;
    use std::sync::Arc;

    fn batch() -> CrawlerBatch {
        CrawlerBatch {
            trace_id: TraceId::generate("crawler"),
            urls: vec!["https://www.reddit.com/r/LocalLlama/new.json?limit=50".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_session_is_initialized_and_active() {
        let manager = SessionManager::new();
        let handle = manager.create_session("alice").await.unwrap();

        let state = handle.read().await;
        assert_eq!(state.present_slots().len(), 16);
        assert_eq!(manager.active_session_id().await.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_duplicate_and_empty_ids_rejected() {
        let manager = SessionManager::new();
        manager.create_session("alice").await.unwrap();

        assert!(manager.create_session("alice").await.unwrap_err().is_validation());
        assert!(manager.create_session("  ").await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let manager = SessionManager::new();
        manager.create_session("alice").await.unwrap();
        manager.create_session("bob").await.unwrap();

        manager
            .with_session("alice", |state| {
                state.crawler_batches_mut().push(batch());
                state.log_event(AuditEvent::new("crawler.urls_generated")).unwrap();
            })
            .await
            .unwrap();

        let (batches, logs) = manager
            .with_session("bob", |state| (state.crawler_batches().len(), state.logs().len()))
            .await
            .unwrap();
        assert_eq!(batches, 0);
        assert_eq!(logs, 0);

        let alice = manager.get_session("alice").await.unwrap();
        assert_eq!(alice.read().await.crawler_batches().len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_store() {
        let manager = SessionManager::new();
        let first = manager.get_or_create("carol").await;
        let second = manager.get_or_create("carol").await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.session_ids().await, vec!["carol".to_string()]);
        assert_eq!(manager.active_session_id().await, None);
    }

    #[tokio::test]
    async fn test_switch_and_remove() {
        let manager = SessionManager::new();
        manager.create_session("alice").await.unwrap();
        manager.create_session("bob").await.unwrap();
        assert_eq!(manager.active_session_id().await.as_deref(), Some("bob"));

        manager.switch_session("alice").await.unwrap();
        assert_eq!(manager.active_session_id().await.as_deref(), Some("alice"));
        assert!(manager.switch_session("nobody").await.unwrap_err().is_not_found());

        manager.remove_session("alice").await.unwrap();
        assert_eq!(manager.active_session_id().await, None);
        assert!(manager.active_session().await.is_none());
        assert!(manager.remove_session("alice").await.unwrap_err().is_not_found());
        assert_eq!(manager.session_ids().await, vec!["bob".to_string()]);
    }

    #[tokio::test]
    async fn test_with_session_unknown_id() {
        let manager = SessionManager::new();
        let err = manager.with_session("ghost", |_| ()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_all_kept() {
        let manager = Arc::new(SessionManager::new());
        manager.create_session("shared").await.unwrap();

        let mut tasks = Vec::new();
        for worker in 0..8 {
            let manager = manager.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..50 {
                    manager
                        .with_session("shared", |state| {
                            state
                                .log_event(AuditEvent::new(format!("worker.{worker}.{i}")))
                                .unwrap();
                        })
                        .await
                        .unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let logs = manager
            .with_session("shared", |state| state.logs().to_vec())
            .await
            .unwrap();
        assert_eq!(logs.len(), 400);

        // Each worker's own entries keep their call order.
        for worker in 0..8 {
            let prefix = format!("worker.{worker}.");
            let seq: Vec<usize> = logs
                .iter()
                .filter_map(|e| e.event.strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(seq, (0..50).collect::<Vec<_>>());
        }
    }
}

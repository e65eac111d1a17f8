use super::*;
use restock_watcher::models::NotificationKind;

#[tokio::test]
async fn test_threshold_and_restock_in_one_round() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);
    let (a, b) = (kabum_url(1), kabum_url(2));

    env.track(&session, &a, kabum_page("Monitor A", Some("100"), true), "90").await;
    env.track(&session, &b, kabum_page("Headset B", None, false), "50").await;

    env.fetcher.set_page(&a, kabum_page("Monitor A", Some("80"), true));
    env.fetcher.set_page(&b, kabum_page("Headset B", Some("60"), true));

    let report = env.monitor(&session).run_round().await;
    assert_eq!(report.checked, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.restocked, 1);
    assert_eq!(report.retired, 1);
    assert_eq!(report.notifications_sent, 2);

    let delivered = env.sink.delivered();
    assert_eq!(delivered.len(), 2);

    let (recipient, threshold) = &delivered[0];
    assert_eq!(recipient, "alice");
    assert_eq!(threshold.kind, NotificationKind::ThresholdMet);
    assert_eq!(threshold.name, "Monitor A");
    assert_eq!(threshold.price, price("80"));

    let (_, restock) = &delivered[1];
    assert_eq!(restock.kind, NotificationKind::Restock);
    assert_eq!(restock.name, "Headset B");
    assert_eq!(restock.price, price("60"));
    assert_eq!(restock.url, b);

    let remaining = session.snapshot().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].url, b);
    assert!(remaining[0].available);
    assert_eq!(remaining[0].price, price("60"));

    Ok(())
}

#[tokio::test]
async fn test_unchanged_round_is_silent() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);

    env.track(&session, &kabum_url(1), kabum_page("Mouse", Some("150"), true), "100").await;
    env.track(&session, &kabum_url(2), kabum_page("Cadeira", None, false), "900").await;
    env.track(&session, &kabum_url(3), kabum_page("Monitor", Some("1200"), true), "1000").await;

    let before = session.snapshot().await;
    let report = env.monitor(&session).run_round().await;
    let after = session.snapshot().await;

    assert_eq!(report.checked, 3);
    assert_eq!(report.notifications_sent, 0);
    assert!(env.sink.delivered().is_empty());

    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(after.iter()) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.name, new.name);
        assert_eq!(old.price, new.price);
        assert_eq!(old.available, new.available);
    }

    Ok(())
}

#[tokio::test]
async fn test_removals_keep_survivor_order() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);

    for id in 1..=5 {
        env.track(&session, &kabum_url(id), kabum_page(&format!("Item {}", id), Some("500"), true), "100")
            .await;
    }

    // Items 2 and 4 drop under their limit.
    env.fetcher.set_page(&kabum_url(2), kabum_page("Item 2", Some("99.90"), true));
    env.fetcher.set_page(&kabum_url(4), kabum_page("Item 4", Some("100"), true));

    let before = session.products().len().await;
    let report = env.monitor(&session).run_round().await;
    let names: Vec<String> = session.snapshot().await.into_iter().map(|p| p.name).collect();

    assert_eq!(report.retired, 2);
    assert_eq!(names.len(), before - report.retired);
    assert_eq!(names, vec!["Item 1", "Item 3", "Item 5"]);

    let kinds: Vec<NotificationKind> = env.sink.delivered().into_iter().map(|(_, n)| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::ThresholdMet, NotificationKind::ThresholdMet]);

    Ok(())
}

#[tokio::test]
async fn test_restock_under_threshold_sends_both_and_removes() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);
    let url = kabum_url(7);

    env.track(&session, &url, kabum_page("Placa de video", None, false), "2000").await;
    env.fetcher.set_page(&url, kabum_page("Placa de video", Some("1899.90"), true));

    let report = env.monitor(&session).run_round().await;

    let kinds: Vec<NotificationKind> = env.sink.delivered().into_iter().map(|(_, n)| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Restock, NotificationKind::ThresholdMet]);
    assert_eq!(report.retired, 1);
    assert!(session.products().is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_restock_notifies_once() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);
    let url = kabum_url(8);

    env.track(&session, &url, kabum_page("Notebook", None, false), "3000").await;
    env.fetcher.set_page(&url, kabum_page("Notebook", Some("3500"), true));

    let monitor = env.monitor(&session);
    monitor.run_round().await;
    monitor.run_round().await;

    assert_eq!(env.sink.delivered().len(), 1);
    assert_eq!(session.snapshot().await[0].price, price("3500"));

    Ok(())
}

#[tokio::test]
async fn test_failed_check_does_not_stop_the_round() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);

    env.track(&session, &kabum_url(1), kabum_page("First", Some("50"), true), "10").await;
    env.track(&session, &kabum_url(2), kabum_page("Second", Some("70"), true), "10").await;
    env.track(&session, &kabum_url(3), kabum_page("Third", None, false), "10").await;

    env.fetcher.set_failure(&kabum_url(2));
    env.fetcher.set_page(&kabum_url(3), kabum_page("Third", Some("40"), true));

    let report = env.monitor(&session).run_round().await;
    assert_eq!(report.checked, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.restocked, 1);

    // One attempt per round, then the round moves on. Creation fetched each page once.
    assert_eq!(env.fetcher.fetch_count(&kabum_url(2)), 2);
    assert_eq!(env.fetcher.fetch_count(&kabum_url(3)), 2);

    let products = session.snapshot().await;
    let second = &products[1];
    assert_eq!(second.name, "Second");
    assert_eq!(second.price, price("70"));
    assert!(second.available);
    assert_eq!(second.failure_count, 1);

    assert!(products[2].available);
    assert_eq!(products[2].price, price("40"));
    assert_eq!(products[2].failure_count, 0);

    Ok(())
}

#[tokio::test]
async fn test_unparseable_page_counts_as_failure() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);
    let url = kabum_url(1);

    env.track(&session, &url, kabum_page("Webcam", Some("300"), true), "100").await;
    env.fetcher.set_page(&url, "<html><body>Service unavailable</body></html>".to_string());

    let monitor = env.monitor(&session);
    monitor.run_round().await;
    monitor.run_round().await;

    let product = &session.snapshot().await[0];
    assert_eq!(product.failure_count, 2);
    assert_eq!(product.price, price("300"));

    Ok(())
}

#[tokio::test]
async fn test_failed_delivery_still_retires_item() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);
    let url = kabum_url(1);

    env.track(&session, &url, kabum_page("SSD", Some("400"), true), "350").await;
    env.fetcher.set_page(&url, kabum_page("SSD", Some("329.90"), true));
    env.sink.set_failing(true);

    let report = env.monitor(&session).run_round().await;

    assert_eq!(report.notifications_failed, 1);
    assert_eq!(report.notifications_sent, 0);
    assert_eq!(report.retired, 1);
    assert!(session.products().is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_name_kept_when_page_omits_it() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);
    let url = "https://www.fastshop.com.br/web/p/d/AB123";

    let page = r#"<html><body>
        <h1 class="title">Geladeira Frost Free</h1>
        <span class="price-fraction">4.299</span><span class="price-cents">,00</span>
    </body></html>"#;
    env.track(&session, url, page.to_string(), "3000").await;

    // Listing taken down: no title, no price.
    env.fetcher.set_page(url, "<html><body><p>Produto indisponivel</p></body></html>".to_string());
    let report = env.monitor(&session).run_round().await;

    assert_eq!(report.failed, 0);
    let product = &session.snapshot().await[0];
    assert_eq!(product.name, "Geladeira Frost Free");
    assert!(!product.available);

    Ok(())
}

#[tokio::test]
async fn test_monitor_loop_runs_rounds_on_its_own() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let config = MonitorConfig {
        round_interval_secs: 1,
        item_delay_ms: 10,
        max_items: 10,
    };
    let session = Session::start("bob", Arc::clone(&env.product_manager), env.sink(), config).await;
    let url = kabum_url(42);

    env.track(&session, &url, kabum_page("Console", Some("4000"), true), "3500").await;
    env.fetcher.set_page(&url, kabum_page("Console", Some("3499"), true));

    let products = session.products();
    let retired = wait_for_condition(|| async move { products.is_empty().await }, 10).await;
    assert!(retired, "monitor never retired the product");

    let delivered = env.sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "bob");
    assert_eq!(delivered[0].1.kind, NotificationKind::ThresholdMet);

    session.shutdown().await;
    assert!(!session.is_monitoring().await);

    Ok(())
}

#[tokio::test]
async fn test_cancel_between_items_still_retires_marked() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let session = env.session("alice", 10);

    for id in 1..=3 {
        env.track(&session, &kabum_url(id), kabum_page(&format!("I{}", id), Some("500"), true), "100")
            .await;
    }
    env.fetcher.set_page(&kabum_url(1), kabum_page("I1", Some("90"), true));
    env.fetcher.set_page(&kabum_url(3), kabum_page("I3", Some("90"), true));

    let config = MonitorConfig {
        round_interval_secs: 3600,
        item_delay_ms: 500,
        max_items: 10,
    };
    session.start_monitor(env.sink(), config).await;

    // Cancel while the round sleeps before its second item.
    tokio::time::sleep(Duration::from_millis(150)).await;
    tokio::time::timeout(Duration::from_secs(5), session.shutdown()).await?;

    let names: Vec<String> = session.snapshot().await.into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["I2", "I3"]);

    let kinds: Vec<NotificationKind> = env.sink.delivered().into_iter().map(|(_, n)| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::ThresholdMet]);

    // Creation fetched each page once; the round never reached the later items.
    assert_eq!(env.fetcher.fetch_count(&kabum_url(1)), 2);
    assert_eq!(env.fetcher.fetch_count(&kabum_url(2)), 1);
    assert_eq!(env.fetcher.fetch_count(&kabum_url(3)), 1);

    Ok(())
}

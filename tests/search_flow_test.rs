// End-to-end search flow tests against the fixture page.
// Tests that need a live WebDriver skip gracefully when none is installed.

mod common;

use serial_test::serial;

use webharness::{HarnessError, Locator, WAIT};

#[tokio::test]
#[serial]
async fn test_search_flow_end_to_end() {
    webharness::logging::init();
    let server = common::ensure_test_server().await;

    let Some(page) = common::open_fixture_page(&server.base_url).await else {
        return;
    };

    // Scenario A: the search flow returns the complementary result title
    let title = page.search_for("ducks").await;
    assert_eq!(title, "Duck");

    // Scenario B: the expected result link is present
    assert!(page.verify_result_link_with_text("Duck - Wikipedia").await);

    // Scenario C: an absent result link is reported as such, not as a crash
    assert!(
        !page
            .verify_result_link_with_text("Domestic duck - Wikipedia")
            .await
    );

    // Scenario D: the results carry at least six Wikipedia links
    assert!(page.count_wiki_links().await >= 6);

    page.close().await.expect("close should succeed");
}

#[tokio::test]
#[serial]
async fn test_sentinels_and_raises_on_missing_element() {
    webharness::logging::init();
    let server = common::ensure_test_server().await;

    let Some(page) = common::open_fixture_page(&server.base_url).await else {
        return;
    };
    let actions = page.actions();
    let missing = Locator::css("#does-not-exist");

    // Non-raising operations return their declared sentinels
    assert!(
        !actions
            .click(&missing, "MISSING", false)
            .await
            .expect("sentinel, not error")
    );
    assert!(
        actions
            .get_element(&missing, "MISSING", false, false)
            .await
            .expect("sentinel, not error")
            .is_none()
    );
    assert!(
        !actions
            .is_displayed(&missing, "MISSING", false, false)
            .await
            .expect("sentinel, not error")
    );
    assert!(
        actions
            .get_text(&missing, "MISSING", false, false)
            .await
            .expect("sentinel, not error")
            .is_none()
    );
    assert!(
        actions
            .get_elements(&missing, "MISSING", true, true)
            .await
            .expect("empty match is not a failure")
            .is_empty()
    );

    // The raising default propagates a categorized failure
    let err = actions
        .click(&missing, "MISSING", true)
        .await
        .expect_err("raise_on_failure should propagate");
    assert!(matches!(err, HarnessError::ElementNotFound { .. }));

    page.close().await.expect("close should succeed");
}

#[tokio::test]
#[serial]
async fn test_wait_until_gone_is_idempotent_for_absent_element() {
    webharness::logging::init();
    let server = common::ensure_test_server().await;

    let Some(page) = common::open_fixture_page(&server.base_url).await else {
        return;
    };
    let never_present = Locator::css("#never-present");

    let started = std::time::Instant::now();
    let gone = page
        .actions()
        .wait_until_gone(&never_present, "NEVER_PRESENT", WAIT)
        .await
        .expect("absent element is success");
    assert!(gone);
    // One presence check, no polling up to the 60s bound
    assert!(started.elapsed() < std::time::Duration::from_secs(10));

    page.close().await.expect("close should succeed");
}

#[tokio::test]
#[serial]
async fn test_wait_for_present_times_out() {
    webharness::logging::init();
    let server = common::ensure_test_server().await;

    let Some(page) = common::open_fixture_page(&server.base_url).await else {
        return;
    };

    let err = page
        .actions()
        .wait_for_present(&Locator::css("#never-present"), "NEVER_PRESENT", 1)
        .await
        .expect_err("wait should time out");
    assert!(matches!(err, HarnessError::Timeout { .. }));

    page.close().await.expect("close should succeed");
}

#[tokio::test]
#[serial]
async fn test_navigate_rejects_unconfigured_environment() {
    webharness::logging::init();
    let server = common::ensure_test_server().await;

    let Some(session) = common::open_fixture_session(&server.base_url).await else {
        return;
    };

    let err = session
        .navigate("http://unconfigured.example.com")
        .await
        .expect_err("off-allowlist URL must be rejected");
    assert!(matches!(err, HarnessError::UnsupportedTarget(_)));

    session.close().await.expect("close should succeed");
}

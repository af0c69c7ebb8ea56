// Common test utilities and fixtures

use std::net::SocketAddr;

use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tokio::sync::OnceCell;

use webharness::driver_manager::DriverManager;
use webharness::{ActionWrapper, BrowserKind, HarnessConfig, SearchPage, Session, search_locators};

/// Mock pages for testing
pub mod fixtures {
    /// A static stand-in for the search engine: the results section is
    /// hidden until ENTER is pressed in the search box, so the wait/type/
    /// press flow exercises the same steps as the live page.
    pub const SEARCH_PAGE: &str = r##"
    <!DOCTYPE html>
    <html>
    <head><title>Search Fixture</title></head>
    <body>
        <input name="q" autofocus>
        <div id="results" style="display:none">
            <div id="wp-tabs-container">
                <div data-attrid="title"><span>Duck</span></div>
                <h3>Description</h3><span><a href="#">Wikipedia</a></span>
            </div>
            <h1>Search Results</h1>
            <div>
                <a href="#"><h3><span>Duck - Wikipedia</span></h3></a>
                <a href="#"><h3><span>Duck (disambiguation)</span></h3></a>
                <a href="#"><h3><span>Mallard - Wikipedia</span></h3></a>
            </div>
            <ul>
                <li><a href="#">Wikipedia</a></li>
                <li><a href="#">Wikipedia</a></li>
                <li><a href="#">Wikipedia</a></li>
                <li><a href="#">Wikipedia</a></li>
                <li><a href="#">Wikipedia</a></li>
                <li><a href="#">Wikipedia</a></li>
            </ul>
        </div>
        <script>
            document.querySelector('input[name="q"]').addEventListener('keydown', function (e) {
                if (e.key === 'Enter') {
                    document.getElementById('results').style.display = 'block';
                }
            });
        </script>
    </body>
    </html>
    "##;
}

pub struct TestServerHandle {
    pub addr: SocketAddr,
    pub base_url: String,
}

static TEST_SERVER: OnceCell<TestServerHandle> = OnceCell::const_new();

fn create_app() -> Router {
    Router::new()
        .route("/", get(|| async { Html(fixtures::SEARCH_PAGE) }))
        .route(
            "/posts",
            get(|| async {
                Json(json!([
                    {
                        "userId": 1,
                        "id": 1,
                        "title": "sunt aut facere repellat",
                        "body": "quia et suscipit suscipit recusandae"
                    },
                    {
                        "userId": 1,
                        "id": 2,
                        "title": "qui est esse",
                        "body": "est rerum tempore vitae"
                    }
                ]))
            }),
        )
}

/// Start the loopback test server once for all tests in this binary
pub async fn ensure_test_server() -> &'static TestServerHandle {
    TEST_SERVER
        .get_or_init(|| async {
            let std_listener =
                std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
            let addr = std_listener.local_addr().unwrap();
            let base_url = format!("http://{}", addr);
            drop(std_listener);

            // Dedicated thread with its own runtime so the server outlives
            // any single #[tokio::test] runtime
            std::thread::spawn(move || {
                let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");
                runtime.block_on(async {
                    let listener = tokio::net::TcpListener::bind(addr)
                        .await
                        .expect("Failed to bind in thread");
                    axum::serve(listener, create_app())
                        .await
                        .expect("Test server failed");
                });
            });

            // Wait until the server answers
            for i in 0..30 {
                tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                if reqwest::get(&base_url).await.is_ok() {
                    eprintln!("Test server ready at {} after {} attempts", base_url, i + 1);
                    break;
                }
                if i == 29 {
                    panic!("Test server failed to start");
                }
            }

            TestServerHandle { addr, base_url }
        })
        .await
}

/// Open a session against the fixture page with whichever driver is
/// installed, or `None` when this machine has no WebDriver to test with.
#[allow(dead_code)]
pub async fn open_fixture_session(server_url: &str) -> Option<Session> {
    for browser in [BrowserKind::Chrome, BrowserKind::Firefox] {
        if DriverManager::resolve_executable(browser).is_err() {
            eprintln!("{:?} driver not available, trying next", browser);
            continue;
        }

        let config = HarnessConfig {
            browser,
            qa_url: server_url.to_string(),
            ..Default::default()
        };

        match Session::open(config).await {
            Ok(session) => return Some(session),
            Err(e) => eprintln!("Could not open {:?} session: {}", browser, e),
        }
    }

    eprintln!("WARNING: no WebDriver available, skipping browser test");
    None
}

/// Open the fixture page wrapped in a [`SearchPage`], or `None` when no
/// driver is installed.
#[allow(dead_code)]
pub async fn open_fixture_page(server_url: &str) -> Option<SearchPage> {
    let session = open_fixture_session(server_url).await?;
    session
        .navigate(server_url)
        .await
        .expect("fixture page should be reachable");
    Some(SearchPage::new(
        ActionWrapper::new(session),
        search_locators(),
    ))
}

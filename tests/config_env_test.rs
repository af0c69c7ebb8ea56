// Environment-variable override tests. These mutate process-wide state,
// so they are serialized.

use serial_test::serial;

use webharness::{BrowserKind, HarnessConfig, HarnessError, TestEnvironment};

fn clear_overrides() {
    for key in [
        "WEBHARNESS_BROWSER",
        "WEBHARNESS_ENVIRONMENT",
        "WEBHARNESS_QA_URL",
        "WEBHARNESS_STAGE_URL",
        "WEBHARNESS_DEV_URL",
        "WEBHARNESS_API_URI",
        "WEBHARNESS_HEADLESS",
        "WEBHARNESS_VIEWPORT",
    ] {
        unsafe { std::env::remove_var(key) };
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_overrides();

    let config = HarnessConfig::from_env().unwrap();
    assert_eq!(config.browser, BrowserKind::Chrome);
    assert_eq!(config.environment, TestEnvironment::Qa);
    assert_eq!(config.endpoint(), "http://www.google.com");
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_overrides();
    unsafe {
        std::env::set_var("WEBHARNESS_BROWSER", "FIREFOX");
        std::env::set_var("WEBHARNESS_ENVIRONMENT", "dev");
        std::env::set_var("WEBHARNESS_DEV_URL", "http://dev.example.com");
        std::env::set_var("WEBHARNESS_HEADLESS", "false");
        std::env::set_var("WEBHARNESS_VIEWPORT", "1280x720");
    }

    let config = HarnessConfig::from_env().unwrap();
    assert_eq!(config.browser, BrowserKind::Firefox);
    assert_eq!(config.environment, TestEnvironment::Dev);
    assert_eq!(config.endpoint(), "http://dev.example.com");
    assert!(!config.headless);
    assert_eq!(config.viewport.width, 1280);
    assert_eq!(config.viewport.height, 720);

    clear_overrides();
}

#[test]
#[serial]
fn test_from_env_rejects_malformed_endpoint() {
    clear_overrides();
    unsafe { std::env::set_var("WEBHARNESS_QA_URL", "not a url") };

    let err = HarnessConfig::from_env().unwrap_err();
    assert!(matches!(err, HarnessError::UnsupportedTarget(_)));

    clear_overrides();
}

#[test]
#[serial]
fn test_from_env_rejects_unsupported_browser() {
    clear_overrides();
    unsafe { std::env::set_var("WEBHARNESS_BROWSER", "safari") };

    let err = HarnessConfig::from_env().unwrap_err();
    assert!(matches!(err, HarnessError::UnsupportedTarget(_)));

    clear_overrides();
}

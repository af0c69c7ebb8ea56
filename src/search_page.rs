use tracing::{error, info};

use crate::actions::{ActionWrapper, WAIT};
use crate::errors::HarnessError;
use crate::locator::{Locator, LocatorRegistry};

/// Logical locator names used by the search flows
pub const SEARCH_BOX: &str = "SEARCH_BOX";
pub const COMPLEMENTARY_RESULT_TITLE: &str = "COMPLEMENTARY_RESULT_TITLE";
pub const WEBRESULTS_LINK: &str = "WEBRESULTS_LINK";
pub const WIKIPEDIA_LINK: &str = "WIKIPEDIA_LINK";
pub const WIKI_LINK: &str = "WIKI_LINK";

/// Locators for the search engine's results page
pub fn search_locators() -> LocatorRegistry {
    let mut registry = LocatorRegistry::new();
    registry.insert(SEARCH_BOX, Locator::css(r#"input[name="q"]"#));
    registry.insert(
        COMPLEMENTARY_RESULT_TITLE,
        Locator::xpath(r#"//div[@id="wp-tabs-container"]//*[@data-attrid="title"]/span"#),
    );
    registry.insert(
        WEBRESULTS_LINK,
        Locator::xpath(
            "//h1[contains(text(),'Search Results')]/following-sibling::div//h3/span[text()='<REPLACE>']",
        ),
    );
    registry.insert(
        WIKIPEDIA_LINK,
        Locator::xpath("//h3[text()='Description']/following-sibling::span/a[ text() = 'Wikipedia' ]"),
    );
    registry.insert(WIKI_LINK, Locator::xpath("//a[text()='Wikipedia']"));
    registry
}

/// Page helper for the search flow.
///
/// Each flow composes [`ActionWrapper`] operations into one domain-level
/// action and swallows every internal failure into a flow-level sentinel
/// after logging and screenshotting, so a failed step is recorded as a
/// failed assertion rather than a crashed test.
pub struct SearchPage {
    actions: ActionWrapper,
    locators: LocatorRegistry,
}

impl SearchPage {
    pub fn new(actions: ActionWrapper, locators: LocatorRegistry) -> Self {
        SearchPage { actions, locators }
    }

    pub fn actions(&self) -> &ActionWrapper {
        &self.actions
    }

    /// Close the underlying session
    pub async fn close(self) -> Result<(), HarnessError> {
        self.actions.close().await
    }

    /// Search for `query` and return the complementary result title.
    /// Sentinel: empty string.
    pub async fn search_for(&self, query: &str) -> String {
        info!("search_for '{}' started", query);

        match self.try_search_for(query).await {
            Ok(title) => {
                info!("search_for ends");
                title
            }
            Err(e) => {
                error!("search_for failed: {}", e);
                let _ = self.actions.screenshot("SearchPage", "search_for").await;
                String::new()
            }
        }
    }

    /// Verify the results contain a link with the given text, alongside the
    /// Wikipedia description link. Sentinel: `false`.
    pub async fn verify_result_link_with_text(&self, link_text: &str) -> bool {
        info!("verify_result_link_with_text '{}' started", link_text);

        match self.try_verify_result_link(link_text).await {
            Ok(()) => {
                info!("verify_result_link_with_text ends");
                true
            }
            Err(e) => {
                error!("verify_result_link_with_text failed: {}", e);
                let _ = self
                    .actions
                    .screenshot("SearchPage", "verify_result_link_with_text")
                    .await;
                false
            }
        }
    }

    /// Count result links matching the locator registered under `name`.
    /// Sentinel: 0.
    pub async fn count_result_links_of_type(&self, name: &str) -> usize {
        info!("count_result_links_of_type '{}' started", name);

        match self.try_count_links(name).await {
            Ok(count) => {
                info!("count_result_links_of_type '{}' counted {}", name, count);
                count
            }
            Err(e) => {
                error!("count_result_links_of_type '{}' failed: {}", name, e);
                let _ = self
                    .actions
                    .screenshot("SearchPage", "count_result_links_of_type")
                    .await;
                0
            }
        }
    }

    /// Count the Wikipedia links in the results. Sentinel: 0.
    pub async fn count_wiki_links(&self) -> usize {
        self.count_result_links_of_type(WIKI_LINK).await
    }

    async fn try_search_for(&self, query: &str) -> Result<String, HarnessError> {
        let search_box = self.locators.require(SEARCH_BOX)?;
        let result_title = self.locators.require(COMPLEMENTARY_RESULT_TITLE)?;

        self.actions
            .wait_for_present(search_box, SEARCH_BOX, WAIT)
            .await?;
        self.actions
            .is_displayed(search_box, SEARCH_BOX, true, true)
            .await?;
        self.actions
            .type_text(search_box, query, SEARCH_BOX, true)
            .await?;
        self.actions.press_enter(search_box, SEARCH_BOX, true).await?;
        self.actions
            .wait_until_visible(result_title, COMPLEMENTARY_RESULT_TITLE, WAIT)
            .await?;

        let title = self
            .actions
            .get_text(result_title, COMPLEMENTARY_RESULT_TITLE, true, true)
            .await?;
        Ok(title.unwrap_or_default())
    }

    async fn try_verify_result_link(&self, link_text: &str) -> Result<(), HarnessError> {
        let results_link = self
            .actions
            .bind_locator(self.locators.require(WEBRESULTS_LINK)?, link_text);
        let name = format!("{} '{}'", WEBRESULTS_LINK, link_text);

        self.actions
            .is_displayed(&results_link, &name, true, true)
            .await?;
        self.actions
            .is_displayed(
                self.locators.require(WIKIPEDIA_LINK)?,
                WIKIPEDIA_LINK,
                true,
                true,
            )
            .await?;
        Ok(())
    }

    async fn try_count_links(&self, name: &str) -> Result<usize, HarnessError> {
        let locator = self.locators.require(name)?;
        let links = self.actions.get_elements(locator, name, true, true).await?;
        Ok(links.len())
    }
}

//! # Bot
//!
//! Owns the configured behaviors, the platform client and the watermark store,
//! and runs the search-and-reply cycle.
//!
//! A cycle walks the behaviors in declared order. For each search term it fetches up to
//! [`SEARCH_PAGE_SIZE`] posts newer than the stored watermark, replies to every one with a
//! randomly chosen response, then records the id of the first (newest) post as the new
//! watermark. A failed reply only skips that post; a failed search only skips that term.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::store::{SEARCH_BUCKET, WatermarkStore};
use crate::domain::config::{BotConfig, Credentials};
use crate::domain::error::{ApiError, BotError};
use crate::domain::traits::{ApiFactory, SocialApi};
use crate::domain::types::{Behavior, BehaviorKind, CycleReport, TermReport};
use crate::strings::logs;

/// Number of results requested per search.
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// Lifecycle of the platform client.
enum ApiHandle {
    Unconfigured,
    Unauthenticated(Credentials),
    Authenticated(Arc<dyn SocialApi>),
}

pub struct Bot {
    name: String,
    handle: String,
    delay: Duration,
    behaviors: Vec<Behavior>,
    api: ApiHandle,
    factory: Arc<dyn ApiFactory>,
    store: WatermarkStore,
}

impl Bot {
    pub fn new(
        name: impl Into<String>,
        handle: impl Into<String>,
        delay: Duration,
        store: WatermarkStore,
        factory: Arc<dyn ApiFactory>,
    ) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            delay,
            behaviors: Vec::new(),
            api: ApiHandle::Unconfigured,
            factory,
            store,
        }
    }

    /// Builds a bot from its configuration document, opening the store and
    /// registering every search behavior.
    pub fn from_config(config: &BotConfig, factory: Arc<dyn ApiFactory>) -> anyhow::Result<Self> {
        let store = match config.store_path() {
            Some(path) => WatermarkStore::open([SEARCH_BUCKET], Some(path))?,
            None => WatermarkStore::in_memory([SEARCH_BUCKET]),
        };

        let mut bot = Self::new(
            config.name.clone(),
            config.username.clone(),
            config.delay_duration(),
            store,
            factory,
        );
        for behavior in config.search_behaviors()? {
            bot.add_search_behavior(behavior.term, behavior.responses);
        }
        Ok(bot)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    pub fn store(&self) -> &WatermarkStore {
        &self.store
    }

    pub fn add_search_behavior(&mut self, term: impl Into<String>, responses: Vec<String>) {
        self.behaviors.push(Behavior::search(term, responses));
    }

    /// Stores credentials. Any client built from earlier credentials is discarded and
    /// rebuilt on next use.
    pub fn set_auth_credentials(
        &mut self,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_key: impl Into<String>,
        access_secret: impl Into<String>,
    ) {
        if matches!(self.api, ApiHandle::Authenticated(_)) {
            debug!("{}", logs::CREDENTIALS_RESET);
        }
        self.api = ApiHandle::Unauthenticated(Credentials::new(
            consumer_key,
            consumer_secret,
            access_key,
            access_secret,
        ));
    }

    fn api(&mut self) -> Result<Arc<dyn SocialApi>, ApiError> {
        let api = match &self.api {
            ApiHandle::Authenticated(api) => return Ok(api.clone()),
            ApiHandle::Unconfigured => return Err(ApiError::MissingCredentials),
            ApiHandle::Unauthenticated(credentials) => self.factory.connect(credentials)?,
        };
        debug!("{}", logs::API_CONNECTED);
        self.api = ApiHandle::Authenticated(api.clone());
        Ok(api)
    }

    /// Runs exactly one poll-and-reply cycle over every behavior.
    pub async fn run_once(&mut self) -> Result<CycleReport, BotError> {
        let api = self.api()?;
        info!("{}", logs::CYCLE_START);

        let mut report = CycleReport::default();
        for behavior in &self.behaviors {
            let term_report = match behavior.kind {
                BehaviorKind::Search => run_search(api.as_ref(), &mut self.store, behavior).await?,
            };
            report.terms.push(term_report);
        }
        Ok(report)
    }

    /// Repeats [`Bot::run_once`] every `delay` until `cancel` fires.
    ///
    /// Cancellation is observed between cycles and during the wait.
    pub async fn run_forever(&mut self, cancel: CancellationToken) -> Result<(), BotError> {
        while !cancel.is_cancelled() {
            let report = self.run_once().await?;
            for term in &report.terms {
                debug!(
                    term = %term.term,
                    found = term.found,
                    replied = term.replied,
                    failed = term.failed,
                    search_failed = term.search_failed,
                    "Behavior finished"
                );
            }
            debug!("Cycle finished, {} replies sent", report.replied());

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.delay) => {}
            }
        }
        info!("{}", logs::SHUTDOWN);
        Ok(())
    }
}

async fn run_search(
    api: &dyn SocialApi,
    store: &mut WatermarkStore,
    behavior: &Behavior,
) -> Result<TermReport, BotError> {
    let term = behavior.term.as_str();
    let mut report = TermReport {
        term: term.to_string(),
        ..Default::default()
    };

    if behavior.responses.is_empty() {
        warn!("{}", logs::no_responses(term));
        return Ok(report);
    }

    let since = store.get(SEARCH_BUCKET, term).cloned();
    let results = match api.search(term, SEARCH_PAGE_SIZE, since.as_ref()).await {
        Ok(results) => results,
        Err(e) => {
            warn!("{}", logs::search_fail(term, &e.to_string()));
            report.search_failed = true;
            return Ok(report);
        }
    };
    report.found = results.len();
    info!("{}", logs::results_found(term, results.len()));

    for post in &results {
        debug!(author = %post.author, "Matched: {}", post.text);
        let text = format_reply(&post.author, pick_response(&behavior.responses));
        match api.post_reply(&text, &post.id).await {
            Ok(_) => {
                report.replied += 1;
                info!("{}", text);
            }
            Err(e) => {
                report.failed += 1;
                warn!(
                    code = ?e.platform_code(),
                    "{}",
                    logs::reply_fail(&post.id.to_string(), &e.to_string())
                );
            }
        }
    }

    // Assumes the platform returns the newest post first.
    if let Some(newest) = results.first() {
        store.set(SEARCH_BUCKET, term, newest.id.clone())?;
        debug!("{}", logs::watermark_updated(term, &newest.id.to_string()));
    }
    Ok(report)
}

/// Picks one response at random. `responses` must not be empty.
fn pick_response(responses: &[String]) -> &str {
    &responses[rand::rng().random_range(0..responses.len())]
}

fn format_reply(author: &str, response: &str) -> String {
    format!("@{author} {response}")
}

pub mod prompt;

use crate::domain::batch::BatchCount;
use crate::domain::catalog::{LUCKY_COLORS, LUCKY_NUMBER_COUNT, LUCKY_NUMBER_MAX, STYLES, THEMES};
use crate::domain::fortune::FortuneRecord;
use crate::llm::text::strip_quotes;
use crate::llm::TextGenerator;
use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds fortunes from a text generator and a random source.
///
/// One instance lives for the whole process and is shared by every request.
/// The RNG lock is only held while drawing, never across the generator call.
pub struct FortuneService {
    generator: Arc<dyn TextGenerator>,
    rng: Mutex<StdRng>,
    timeout: Duration,
}

impl FortuneService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_rng(generator, StdRng::from_entropy())
    }

    pub fn with_rng(generator: Arc<dyn TextGenerator>, rng: StdRng) -> Self {
        Self {
            generator,
            rng: Mutex::new(rng),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        // Drawing from a poisoned RNG is still fine.
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn draw_theme_and_style(&self) -> (&'static str, &'static str) {
        let mut rng = self.rng();
        let theme = THEMES[rng.gen_range(0..THEMES.len())];
        let style = STYLES[rng.gen_range(0..STYLES.len())];
        (theme, style)
    }

    async fn generate_text(&self, theme: &str, style: &str) -> anyhow::Result<String> {
        let req = prompt::fortune_request(theme, style);
        let raw = tokio::time::timeout(self.timeout, self.generator.complete(req))
            .await
            .with_context(|| {
                format!(
                    "fortune generation timed out after {}s",
                    self.timeout.as_secs_f32()
                )
            })??;

        let text = strip_quotes(&raw);
        anyhow::ensure!(!text.is_empty(), "generator returned an empty fortune");
        Ok(text.to_string())
    }

    /// Never fails: generation errors turn into the fallback record.
    pub async fn generate_fortune(&self) -> FortuneRecord {
        let (theme, style) = self.draw_theme_and_style();

        match self.generate_text(theme, style).await {
            Ok(fortune) => {
                tracing::debug!(theme, style, "fortune generated");
                FortuneRecord::generated(fortune, theme, style, chrono::Utc::now())
            }
            Err(err) => {
                tracing::warn!(
                    provider = ?self.generator.provider(),
                    theme,
                    style,
                    error = %format!("{err:#}"),
                    "fortune generation failed; serving fallback"
                );
                FortuneRecord::fallback(format!("{err:#}"), chrono::Utc::now())
            }
        }
    }

    pub async fn lucky_numbers(&self) -> FortuneRecord {
        let mut record = self.generate_fortune().await;

        let mut rng = self.rng();
        let numbers = rand::seq::index::sample(
            &mut *rng,
            LUCKY_NUMBER_MAX as usize,
            LUCKY_NUMBER_COUNT,
        )
        .into_iter()
        .map(|i| i as u32 + 1)
        .collect();
        let color = LUCKY_COLORS[rng.gen_range(0..LUCKY_COLORS.len())];

        record.lucky_numbers = Some(numbers);
        record.lucky_color = Some(color.to_string());
        record
    }

    /// Generates `count` fortunes one after another, in call order.
    pub async fn batch(&self, count: BatchCount) -> Vec<FortuneRecord> {
        let mut fortunes = Vec::with_capacity(count.get());
        for _ in 0..count.get() {
            fortunes.push(self.generate_fortune().await);
        }

        let failed = fortunes.iter().filter(|f| f.is_fallback()).count();
        tracing::info!(count = count.get(), failed, "fortune batch generated");
        fortunes
    }
}

//! Deterministic generator for offline runs
//!
//! Produces placeholder drafts without any network access, so a full
//! campaign can be exercised without an API key.

use crate::generator::Generator;
use async_trait::async_trait;
use maestro_core::Result;

/// Generator that drafts text from the prompt itself
#[derive(Debug, Clone, Default)]
pub struct OfflineGenerator;

impl OfflineGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// First non-empty line of a prompt, used as the draft headline
fn headline(prompt: &str) -> &str {
    prompt
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("untitled")
}

fn slug(text: &str) -> String {
    let slug: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    slug.split('-')
        .filter(|part| !part.is_empty())
        .take(8)
        .collect::<Vec<_>>()
        .join("-")
}

#[async_trait]
impl Generator for OfflineGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let head = headline(prompt);
        let bullets: Vec<&str> = prompt
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with("- "))
            .collect();

        let mut draft = format!("[offline draft] {}", head);
        for bullet in bullets {
            draft.push('\n');
            draft.push_str(bullet);
        }
        Ok(draft)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        Ok(format!("offline://images/{}.png", slug(headline(prompt))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_is_deterministic() {
        let prompt = "\n  You are a content specialist for Instagram.\n- **Hashtags:** [#a]\nbody";
        let g = OfflineGenerator::new();
        let first = g.generate_text(prompt).await.unwrap();
        assert_eq!(first, g.generate_text(prompt).await.unwrap());
        assert!(first.starts_with("[offline draft] You are a content specialist for Instagram."));
        assert!(first.ends_with("- **Hashtags:** [#a]"));
    }

    #[tokio::test]
    async fn test_image_reference() {
        let g = OfflineGenerator::new();
        let url = g.generate_image("Inspiring image: eco travel!").await.unwrap();
        assert_eq!(url, "offline://images/inspiring-image-eco-travel.png");
    }

    #[tokio::test]
    async fn test_empty_prompt() {
        let g = OfflineGenerator::new();
        assert_eq!(g.generate_text("").await.unwrap(), "[offline draft] untitled");
    }
}

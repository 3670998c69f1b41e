//! Prompt builders for generation-backed stages
//!
//! Each builder reads only what its stage is allowed to depend on, so a
//! prompt never leaks fields from later stages.

use maestro_core::{CampaignState, ContentTemplate, Publications};

fn brief_section(state: &CampaignState, prompt: &mut String) {
    prompt.push_str("## CAMPAIGN BRIEF\n\n");
    prompt.push_str(&format!("- **Objective:** {}\n", state.objective()));
    prompt.push_str(&format!("- **Audience:** {}\n", state.audience()));
    prompt.push_str(&format!("- **Channels:** {}\n", state.channels().join(", ")));
    prompt.push_str(&format!("- **Budget:** {:.2}\n\n", state.budget()));
}

/// Market research prompt
pub fn research_prompt(state: &CampaignState) -> String {
    let mut prompt =
        String::from("You are a digital marketing researcher preparing a campaign brief.\n\n");
    brief_section(state, &mut prompt);
    prompt.push_str("## TASK\n\n");
    prompt.push_str(
        "Summarize current trends, opportunities and risks for this audience \
         on the listed channels. Be specific and cite the kind of evidence \
         a marketer could verify.\n",
    );
    prompt
}

/// Campaign strategy prompt, built on the research
pub fn strategy_prompt(state: &CampaignState, research: &str) -> String {
    let mut prompt = String::from("You are a campaign strategist.\n\n");
    brief_section(state, &mut prompt);
    prompt.push_str("## RESEARCH\n\n");
    prompt.push_str(research);
    prompt.push_str("\n\n## TASK\n\n");
    prompt.push_str(
        "Define the campaign strategy: positioning, key messages, tone of voice, \
         budget split across the channels and the success metrics to track.\n",
    );
    prompt
}

/// Channel content prompt filling the channel template
pub fn content_prompt(label: &str, template: &ContentTemplate, strategy: &str) -> String {
    let mut prompt = format!("You are a content creation specialist for {}.\n\n", label);
    prompt.push_str("## CAMPAIGN STRATEGY\n\n");
    prompt.push_str(strategy);
    prompt.push_str("\n\n## TEMPLATE\n\n");
    prompt.push_str("Use this template to create optimized content:\n\n");
    prompt.push_str(&template.render());
    if let Some(limit) = template.char_limit {
        prompt.push_str(&format!("\nKeep the main text within {} characters.\n", limit));
    }
    prompt.push_str("\nFill in the template with relevant, persuasive content.\n");
    prompt
}

/// Prompt for the campaign key visual
pub fn image_prompt(state: &CampaignState) -> String {
    format!(
        "An inspiring marketing image for a campaign to {}, aimed at {}",
        state.objective(),
        state.audience()
    )
}

/// Optimization prompt over publication outcomes
pub fn optimization_prompt(state: &CampaignState, publications: &Publications) -> String {
    let mut prompt = String::from("You are a performance marketing analyst.\n\n");
    brief_section(state, &mut prompt);
    prompt.push_str("## PUBLICATION OUTCOMES\n\n");
    for (channel, status) in publications {
        prompt.push_str(&format!("- **{}:** {}\n", channel, status));
    }
    prompt.push_str("\n## TASK\n\n");
    prompt.push_str(
        "Recommend optimizations: budget reallocation, A/B tests to run, \
         posting cadence, and what to do about channels that were not \
         published.\n",
    );
    prompt
}

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::form::{ApiSettings, FormData};
use crate::settings::CustomApi;
use crate::wizard::{StepId, WizardController};

pub fn show_step(wizard: &WizardController, data: &FormData) {
    let step = wizard.current_step();
    let index = wizard.current_index();
    println!(
        "\n{}",
        format!("┏━━━━━━━━━━ Step {}/{}: {} ━━━━━━━━━━┓", index + 1, wizard.total_steps(), step.title()).bold()
    );

    let trail: Vec<String> = wizard
        .steps()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let label = format!("{}.{}", i + 1, s.as_str());
            if i == index {
                label.cyan().bold().to_string()
            } else if wizard.is_completed(i) {
                format!("{label}✓").green().to_string()
            } else {
                label.dimmed().to_string()
            }
        })
        .collect();
    println!("  {}", trail.join("  "));

    match step {
        StepId::Keyword => field("Focus keyword", &data.focus_keyword),
        StepId::Title => {
            field("Meta title", &data.meta_title);
            show_candidates(&data.generated_titles, &data.meta_title);
        }
        StepId::Description => {
            field("Meta description", &data.meta_description);
            show_candidates(&data.generated_descriptions, &data.meta_description);
        }
        StepId::Tags => field("Tags", &data.tags),
        StepId::Settings => {
            field("Niche", data.niche.label());
            field("SEO level", &format!("{:?}", data.seo_level));
            field("Tone", &data.tone.to_string());
            field("Article size", &format!("{:?} (~{} words)", data.article_size, data.article_size.word_target()));
            let e = &data.elements;
            let on: Vec<&str> = [
                ("bold", e.bold),
                ("h3", e.h3),
                ("lists", e.lists),
                ("tables", e.tables),
                ("internal-links", e.internal_links),
                ("external-links", e.external_links),
                ("faq", e.faq),
                ("key-takeaways", e.key_takeaways),
            ]
            .into_iter()
            .filter(|(_, v)| *v)
            .map(|(k, _)| k)
            .collect();
            field("Elements", &on.join(", "));
            field("Advanced", if data.advanced.enabled { "on" } else { "off" });
        }
        StepId::Advanced => {
            field("Internal link", &data.advanced.internal_link_url);
            field("External link", &data.advanced.external_link_url);
            field("Instructions", &data.advanced.custom_instructions);
        }
        StepId::Article => preview("Article", &data.generated_article),
        StepId::Schema => preview("Schema markup", &data.schema_markup),
        StepId::Prompt => preview("Prompt", &data.generated_prompt),
    }
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());
}

fn field(label: &str, value: &str) {
    let value = if value.trim().is_empty() { "(empty)".dimmed().to_string() } else { value.to_string() };
    println!("  {}: {}", label.bold(), value);
}

fn preview(label: &str, text: &str) {
    if text.trim().is_empty() {
        field(label, "");
        return;
    }
    let lines: Vec<&str> = text.lines().collect();
    println!("  {}:", label.bold());
    for l in lines.iter().take(12) {
        println!("    {l}");
    }
    if lines.len() > 12 {
        println!("    {}", format!("... {} more lines (`copy` to grab it all)", lines.len() - 12).dimmed());
    }
}

pub fn show_candidates(candidates: &[String], selected: &str) {
    for (i, c) in candidates.iter().enumerate() {
        let marker = if c == selected { "●".green().to_string() } else { " ".to_string() };
        println!("  {marker} {:>2}. {c} {}", i + 1, format!("({} chars)", c.chars().count()).dimmed());
    }
}

pub fn show_text(text: &str) {
    println!("\n{text}\n");
}

pub fn show_message(msg: &str) {
    println!("{}", msg.cyan());
}

pub fn show_error(err: &dyn std::fmt::Display) {
    eprintln!("{} {}", "error:".red().bold(), err);
}

pub fn show_finished(flow: &str) {
    println!("\n{}", format!("✔ {flow} wizard complete").green().bold());
}

pub fn show_providers(preferred: Option<&ApiSettings>, custom: Option<&CustomApi>, default: &ApiSettings) {
    println!("\n{}", "┏━━━━━━━━━━ Providers ━━━━━━━━━━┓".bold());
    match preferred {
        Some(p) => field("Preferred", &format!("{} ({})", p.provider, p.model)),
        None => field("Preferred", &format!("{} ({}) {}", default.provider, default.model, "[default]".dimmed())),
    }
    if let Some(c) = custom {
        field("Custom endpoint", &c.endpoint);
        field("Custom model", &c.model);
        field("Custom key", if c.api_key.is_empty() { "" } else { "********" });
        field("Verify TLS", if c.verify_ssl { "yes" } else { "no" });
    }
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());
}

pub fn prompt_marker(step: StepId) {
    print!("{} ", format!("[{}]>", step.as_str()).cyan().bold());
    let _ = io::stdout().flush();
}

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}

pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Print eligibility lines, coloured by the overall outcome
pub fn print_messages(messages: &[String], allowed: bool) {
    for message in messages {
        if allowed {
            println!("{}", message.green());
        } else {
            println!("{}", message.yellow());
        }
    }
}

/// Format timestamp in human-readable format
pub fn format_timestamp(timestamp: &chrono::DateTime<chrono::Local>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Lowercase ASCII alphanumerics, everything else collapsed to single underscores
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

/// Spinner shown while waiting on the platform
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Prompt user for yes/no confirmation
pub fn confirm_action(prompt: &str) -> std::io::Result<bool> {
    use std::io::{self, Write};

    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Heading, rule, and `label  value` lines padded to the widest label
pub fn format_summary(title: &str, fields: &[(&str, &str)]) -> Vec<String> {
    let label_width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let body: Vec<String> = fields
        .iter()
        .map(|(label, value)| format!("{:<width$}  {}", label, value, width = label_width))
        .collect();

    let rule_width = body.iter().map(String::len).chain([title.len()]).max().unwrap_or(0);
    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push(title.to_string());
    lines.push("=".repeat(rule_width));
    lines.extend(body);
    lines.push("=".repeat(rule_width));
    lines
}

pub fn print_summary(title: &str, fields: &[(&str, &str)]) {
    let mut lines = format_summary(title, fields).into_iter();
    if let Some(heading) = lines.next() {
        println!("\n{}", heading.cyan().bold());
    }
    for line in lines {
        println!("{}", line);
    }
    println!();
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdToken {
    Text(String),
    Number(serde_json::Number),
}

impl From<IdToken> for String {
    fn from(value: IdToken) -> Self {
        match value {
            IdToken::Text(text) => text,
            IdToken::Number(number) => number.to_string(),
        }
    }
}

/// Platform ids and hashes arrive as either JSON strings or numbers
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(IdToken::deserialize(deserializer)?.into())
}

pub fn string_or_number_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Vec::<IdToken>::deserialize(deserializer)?
        .into_iter()
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Ids {
        #[serde(deserialize_with = "string_or_number")]
        one: String,
        #[serde(deserialize_with = "string_or_number_seq")]
        many: Vec<String>,
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("RAAD2 First Team"), "raad2_first_team");
        assert_eq!(slugify("  --Odd__Name!! "), "odd_name");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_format_summary_aligns_values() {
        let lines = format_summary("Challenge Team", &[("Team", "RAAD2 First"), ("Prediction folder", "syn1234")]);
        let rule = "=".repeat(30);
        assert_eq!(
            lines,
            vec![
                "Challenge Team".to_string(),
                rule.clone(),
                "Team               RAAD2 First".to_string(),
                "Prediction folder  syn1234".to_string(),
                rule,
            ]
        );
    }

    #[test]
    fn test_mixed_ids() {
        let ids: Ids = serde_json::from_str(r#"{"one": 12, "many": [12345, "23456"]}"#).unwrap();
        assert_eq!(ids.one, "12");
        assert_eq!(ids.many, vec!["12345", "23456"]);
    }
}

use clap::Parser;
use rand::Rng;
use sglipa_brain::Brain;
use sglipa_core::{BotConfig, ChatMessage, SglipaConfig, Stats};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{parse_line, Input, HELP};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "sglipa.toml")]
    config: PathBuf,

    /// Path to the brain snapshot (overrides the config file)
    #[arg(short, long)]
    brain: Option<PathBuf>,

    /// Path to the settings file (overrides the config file)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Bot username; messages mentioning it always get an answer
    #[arg(short, long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut config = SglipaConfig::load_or_default(&args.config);
    if let Some(path) = args.brain {
        config.brain.brain_path = path;
    }
    if let Some(path) = args.settings {
        config.brain.settings_path = path;
    }
    if args.name.is_some() {
        config.bot.name = args.name;
    }

    info!("Loading brain from {}...", config.brain.brain_path.display());
    let brain = Brain::open(&config).await;

    println!("Sglipa is listening. Type /help for commands, 'quit' to exit.");
    println!("{}", format_stats(&brain.stats().await));
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // What the bot said last, so `^ text` can reply to it.
    let mut last_said: Option<String> = None;

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => println!("{}", HELP),
            Input::Say(seed) => match brain.say(seed).await {
                Some(text) => {
                    println!("{}", text);
                    last_said = Some(text);
                }
                None => println!("🤷 Haven't learned to talk yet..."),
            },
            Input::Stats => println!("{}", format_stats(&brain.stats().await)),
            Input::Chance(Some(percent)) => match brain.set_reply_chance_percent(percent).await {
                Ok(stored) => println!("✅ Reply chance: {}%", stored),
                Err(e) => error!("Failed to save settings: {}", e),
            },
            Input::Chance(None) => {
                let current = brain.settings().await.reply_chance_percent;
                println!("🎲 Current reply chance: {}%\n\nUsage: /chance 20", current);
            }
            Input::ToggleLearning => match brain.toggle_learning().await {
                Ok(enabled) => {
                    println!("📚 Learning {}", if enabled { "enabled" } else { "disabled" })
                }
                Err(e) => error!("Failed to save settings: {}", e),
            },
            Input::Reset => match brain.reset().await {
                Ok(()) => println!("🗑 Memory cleared"),
                Err(e) => error!("Memory cleared, but saving failed: {}", e),
            },
            Input::Reply { original, text } => {
                let msg = ChatMessage::new(text).replying_to(original, false);
                chat(&brain, &config.bot, &msg, &mut last_said).await;
            }
            Input::ReplyToBot(text) => {
                let msg = match &last_said {
                    Some(said) => ChatMessage::new(text).replying_to(said.clone(), true),
                    None => ChatMessage::new(text),
                };
                chat(&brain, &config.bot, &msg, &mut last_said).await;
            }
            Input::Chat(text) => {
                chat(&brain, &config.bot, &ChatMessage::new(text), &mut last_said).await;
            }
        }
        prompt()?;
    }

    info!("Shutting down, saving brain...");
    if let Err(e) = brain.save().await {
        error!("Final save failed: {}", e);
    }
    Ok(())
}

/// Feed one chat message to the brain and print its answer, if any, after a
/// short human-like pause.
async fn chat(brain: &Brain, bot: &BotConfig, msg: &ChatMessage, last_said: &mut Option<String>) {
    if let Some(reply) = brain.on_message(msg).await {
        tokio::time::sleep(reply_delay(bot)).await;
        println!("{}", reply);
        *last_said = Some(reply);
    }
}

fn reply_delay(bot: &BotConfig) -> Duration {
    let low = bot.reply_delay_min_ms.min(bot.reply_delay_max_ms);
    let high = bot.reply_delay_min_ms.max(bot.reply_delay_max_ms);
    Duration::from_millis(rand::thread_rng().gen_range(low..=high))
}

fn format_stats(stats: &Stats) -> String {
    format!(
        "📊 Stats:\n\n📝 Words: {}\n🔗 Chains: {}\n💬 Reply templates: {}\n🎲 Reply chance: {}%\n📚 Learning: {}",
        stats.vocabulary_size,
        stats.transition_key_count,
        stats.reply_key_count,
        stats.reply_chance_percent,
        if stats.learning_enabled { "✅" } else { "❌" }
    )
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_delay_within_bounds() {
        let bot = BotConfig {
            name: None,
            reply_delay_min_ms: 10,
            reply_delay_max_ms: 20,
        };
        for _ in 0..100 {
            let d = reply_delay(&bot);
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
        }
    }

    #[test]
    fn test_reply_delay_swapped_bounds() {
        let bot = BotConfig {
            name: None,
            reply_delay_min_ms: 5,
            reply_delay_max_ms: 0,
        };
        assert!(reply_delay(&bot) <= Duration::from_millis(5));
    }

    #[test]
    fn test_format_stats() {
        let stats = Stats {
            vocabulary_size: 12,
            transition_key_count: 7,
            reply_key_count: 2,
            reply_chance_percent: 15,
            learning_enabled: false,
        };
        let text = format_stats(&stats);
        assert!(text.contains("Words: 12"));
        assert!(text.contains("Chains: 7"));
        assert!(text.contains("Reply templates: 2"));
        assert!(text.contains("15%"));
        assert!(text.contains("❌"));
    }
}

//! The `framecap keyword` command: persist the activation keyword.

use std::path::{Path, PathBuf};

use clap::Args;
use console::Style;
use dialoguer::Input;
use framecap_core::config::LOCAL_CONFIG_FILE;
use framecap_core::Config;

use super::theme::{framecap_theme, handle_interrupt};

/// Arguments for the `keyword` command.
#[derive(Args, Debug)]
pub struct KeywordArgs {
    /// Activation keyword; prompted for when omitted
    pub keyword: Option<String>,
}

/// Execute the keyword command.
pub fn execute(args: KeywordArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let raw = match args.keyword {
        Some(keyword) => keyword,
        None => {
            let theme = framecap_theme();
            let Some(answer) = handle_interrupt(
                Input::<String>::with_theme(&theme)
                    .with_prompt("Activation keyword (e.g. trueroots-style)")
                    .allow_empty(true)
                    .interact_text(),
            )?
            else {
                return Ok(());
            };
            answer
        }
    };

    let keyword = raw.trim();
    if keyword.is_empty() {
        println!("No keyword provided; nothing changed.");
        return Ok(());
    }

    let path = target_path(config_path);
    save_keyword(&path, keyword)?;

    let dim = Style::new().for_stderr().dim();
    eprintln!("  {}", dim.apply_to(format!("Saved to {}", path.display())));
    println!("Saved activation keyword: {keyword}");
    Ok(())
}

/// The file the keyword is written to: the explicit `--config`, else the file
/// `Config::load` would read, else `./framecap.toml`.
fn target_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(Config::locate)
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
}

/// Set `musubi.caption_prefix` in TOML text, keeping everything else intact.
pub(crate) fn set_caption_prefix(content: &str, keyword: &str) -> anyhow::Result<String> {
    let mut doc: toml_edit::DocumentMut = content.parse()?;

    if !doc.contains_key("musubi") {
        doc["musubi"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["musubi"]["caption_prefix"] = toml_edit::value(keyword);

    Ok(doc.to_string())
}

/// Write the keyword into the config file, preserving existing comments.
fn save_keyword(path: &Path, keyword: &str) -> anyhow::Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };
    let updated = set_caption_prefix(&content, keyword)?;

    // Refuse to leave behind a file that no longer loads.
    if let Err(e) = Config::parse(&updated) {
        anyhow::bail!("Updated config would not load: {e}");
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, updated)?;
    tracing::info!("musubi.caption_prefix = {:?} in {}", keyword, path.display());
    Ok(())
}

//! CLI Tooling
//!
//! Command-line front end over the daily folder API. Each command runs one
//! operation and renders text or JSON; only store commands open the store.

use crate::api::DailyFolderApi;
use crate::config::{xdg, ConfigLoader, DailyFolderConfig};
use crate::error::ApiError;
use crate::existing::ExistingDateSet;
use crate::hierarchy::ResolvedChain;
use crate::navigator::MemoryTreeView;
use crate::path::{format_date, today};
use crate::store::{CollectionNode, CollectionStore, SledCollectionStore};
use crate::types::LibraryScope;
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use parking_lot::Mutex;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Daily Folder CLI - date-organized collections
#[derive(Parser)]
#[command(name = "daily-folder")]
#[command(about = "Find or create the Root/YYYY/YYYY-MM/YYYY-MM-DD folder for a date")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Collection store directory (overrides storage.store_path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Library scope (overrides default_scope)
    #[arg(long, global = true)]
    pub scope: Option<u64>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: String,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Go to today's folder, creating it if needed
    Today,
    /// Go to the folder for a date
    Goto {
        /// Date as YYYY-MM-DD
        date: String,
        /// Create missing folders
        #[arg(long)]
        create: bool,
    },
    /// Show the collection chain for a date without creating it
    Resolve {
        /// Date as YYYY-MM-DD
        date: String,
    },
    /// List dates that already have a folder
    Existing {
        /// Only dates in this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    /// Print the collection tree
    Tree,
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Persist the name of the top-level folder
    SetRootLabel {
        /// New root label
        label: String,
    },
}

/// CLI context holding the loaded configuration and open store
pub struct CliContext {
    config: DailyFolderConfig,
    config_path: Option<PathBuf>,
    store_path: Option<PathBuf>,
    store: Mutex<Option<Arc<dyn CollectionStore>>>,
    scope: LibraryScope,
    format: String,
}

impl CliContext {
    /// Create a context; the store named by `store_override` or the
    /// configuration is opened on first use, so config commands never touch it.
    pub fn new(
        config: DailyFolderConfig,
        config_path: Option<PathBuf>,
        store_override: Option<PathBuf>,
    ) -> Self {
        let scope = config.default_scope;
        Self {
            config,
            config_path,
            store_path: store_override,
            store: Mutex::new(None),
            scope,
            format: "text".to_string(),
        }
    }

    /// Build a context over an already open store.
    pub fn with_store(
        config: DailyFolderConfig,
        config_path: Option<PathBuf>,
        store: Arc<dyn CollectionStore>,
    ) -> Self {
        let context = Self::new(config, config_path, None);
        *context.store.lock() = Some(store);
        context
    }

    pub fn with_scope(mut self, scope: Option<u64>) -> Self {
        if let Some(scope) = scope {
            self.scope = LibraryScope(scope);
        }
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    fn store(&self) -> Result<Arc<dyn CollectionStore>, ApiError> {
        let mut slot = self.store.lock();
        if let Some(store) = slot.as_ref() {
            return Ok(store.clone());
        }
        let store_path = match &self.store_path {
            Some(path) => path.clone(),
            None => self.config.storage.resolve_store_path()?,
        };
        debug!(path = %store_path.display(), "Opening collection store");
        let store: Arc<dyn CollectionStore> = Arc::new(SledCollectionStore::new(&store_path)?);
        *slot = Some(store.clone());
        Ok(store)
    }

    /// API over the opened store.
    pub fn api(&self) -> Result<DailyFolderApi, ApiError> {
        Ok(DailyFolderApi::new(self.store()?, &self.config))
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        if self.format != "text" && self.format != "json" {
            return Err(ApiError::ConfigError(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                self.format
            )));
        }
        let started = Instant::now();
        let result = self.execute_inner(command).await;
        info!(
            command = command_name(command),
            scope = %self.scope,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        if let Commands::Config { command } = command {
            return self.handle_config_command(command);
        }
        let api = self.api()?;
        match command {
            Commands::Today => {
                let date = format_date(today());
                let mut view = self.load_view().await?;
                let node = api.goto_today(&mut view, self.scope).await;
                self.format_goto(&date, node, &view)
            }
            Commands::Goto { date, create } => {
                let mut view = self.load_view().await?;
                let node = api.goto_date(&mut view, date, self.scope, *create).await;
                self.format_goto(date, node, &view)
            }
            Commands::Resolve { date } => {
                let chain = api.resolve_date(date, self.scope).await?;
                self.format_chain(date, chain.as_ref())
            }
            Commands::Existing { month } => {
                let existing = api.refresh_existing(self.scope).await;
                let filter = month.as_deref().map(parse_month).transpose()?;
                self.format_existing(&existing, filter)
            }
            Commands::Tree => {
                let view = self.load_view().await?;
                let lines = view.render_lines();
                if self.format == "json" {
                    return to_json(&lines);
                }
                Ok(lines.join("\n"))
            }
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    async fn load_view(&self) -> Result<MemoryTreeView, ApiError> {
        Ok(MemoryTreeView::load(self.store()?, &[self.scope]).await?)
    }

    fn handle_config_command(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        match command {
            ConfigCommands::Show => {
                if self.format == "json" {
                    return to_json(&self.config);
                }
                toml::to_string_pretty(&self.config)
                    .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
            }
            ConfigCommands::SetRootLabel { label } => {
                let path = match &self.config_path {
                    Some(path) => path.clone(),
                    None => xdg::global_config_path()?,
                };
                let updated = ConfigLoader::set_root_label(&path, label)?;
                info!(root = updated.root_label(), path = %path.display(), "Root label saved");
                if self.format == "json" {
                    return to_json(&json!({
                        "root_label": updated.root_label(),
                        "path": path,
                    }));
                }
                Ok(format!(
                    "Root label set to '{}' in {}",
                    updated.root_label(),
                    path.display()
                ))
            }
        }
    }

    fn format_goto(
        &self,
        date: &str,
        node: Option<CollectionNode>,
        view: &MemoryTreeView,
    ) -> Result<String, ApiError> {
        if self.format == "json" {
            return to_json(&json!({
                "date": date,
                "selected": node,
            }));
        }
        match node {
            Some(node) => {
                let mut out = format!("Selected {} (id {})\n\n", node.name, node.id);
                out.push_str(&view.render_lines().join("\n"));
                Ok(out)
            }
            None => Ok(format!(
                "No folder selected for {} (missing, or see log for errors)",
                date
            )),
        }
    }

    fn format_chain(&self, date: &str, chain: Option<&ResolvedChain>) -> Result<String, ApiError> {
        if self.format == "json" {
            return to_json(&json!({
                "date": date,
                "chain": chain,
            }));
        }
        let Some(chain) = chain else {
            return Ok(format!("No folder exists for {}", date));
        };
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Level", "Name", "Id"]);
        for (level, node) in ["Root", "Year", "Month", "Day"].into_iter().zip(chain.nodes()) {
            table.add_row(vec![level.to_string(), node.name.clone(), node.id.to_string()]);
        }
        Ok(table.to_string())
    }

    fn format_existing(
        &self,
        existing: &ExistingDateSet,
        month: Option<(i32, u32)>,
    ) -> Result<String, ApiError> {
        let dates: Vec<&str> = match month {
            Some((year, month)) => existing.in_month(year, month),
            None => existing.iter().collect(),
        };
        if self.format == "json" {
            return to_json(&dates);
        }
        if dates.is_empty() {
            return Ok("No date folders found".to_string());
        }
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Date"]);
        for date in dates {
            table.add_row(vec![date]);
        }
        Ok(table.to_string())
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to render JSON: {}", e)))
}

/// Parse `YYYY-MM` into year and month.
fn parse_month(input: &str) -> Result<(i32, u32), ApiError> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", input), "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidDate(input.to_string()))?;
    Ok((date.year(), date.month()))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Today => "today",
        Commands::Goto { .. } => "goto",
        Commands::Resolve { .. } => "resolve",
        Commands::Existing { .. } => "existing",
        Commands::Tree => "tree",
        Commands::Config { command } => match command {
            ConfigCommands::Show => "config.show",
            ConfigCommands::SetRootLabel { .. } => "config.set_root_label",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(temp_dir: &TempDir) -> CliContext {
        let mut config = DailyFolderConfig::default();
        config.navigation.settle_delay_ms = 0;
        CliContext::new(
            config,
            Some(temp_dir.path().join("config.toml")),
            Some(temp_dir.path().join("store")),
        )
    }

    #[test]
    fn test_cli_parses_goto_with_globals() {
        let cli = Cli::parse_from([
            "daily-folder",
            "goto",
            "2025-03-07",
            "--create",
            "--scope",
            "3",
            "--format",
            "json",
        ]);
        assert_eq!(cli.scope, Some(3));
        assert_eq!(cli.format, "json");
        match cli.command {
            Commands::Goto { date, create } => {
                assert_eq!(date, "2025-03-07");
                assert!(create);
            }
            _ => panic!("expected goto"),
        }
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-03").unwrap(), (2025, 3));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("March").is_err());
    }

    #[tokio::test]
    async fn test_goto_then_resolve_and_existing() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);

        let out = ctx
            .execute(&Commands::Goto {
                date: "2025-03-07".to_string(),
                create: true,
            })
            .await
            .unwrap();
        assert!(out.starts_with("Selected 2025-03-07"));
        assert!(out
            .lines()
            .any(|line| line.starts_with('*') && line.ends_with("2025-03-07")));

        let out = ctx
            .execute(&Commands::Resolve {
                date: "2025-03-07".to_string(),
            })
            .await
            .unwrap();
        assert!(out.contains("Daily Folder"));
        assert!(out.contains("2025-03"));

        let out = ctx
            .execute(&Commands::Existing {
                month: Some("2025-03".to_string()),
            })
            .await
            .unwrap();
        assert!(out.contains("2025-03-07"));
    }

    #[tokio::test]
    async fn test_goto_without_create_reports_missing() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir).with_format("json");

        let out = ctx
            .execute(&Commands::Goto {
                date: "2025-03-07".to_string(),
                create: false,
            })
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["date"], "2025-03-07");
        assert!(value["selected"].is_null());
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_date() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);
        let result = ctx
            .execute(&Commands::Resolve {
                date: "07/03/2025".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApiError::InvalidDate(_))));
    }

    #[tokio::test]
    async fn test_unknown_format_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir).with_format("yaml");
        assert!(ctx.execute(&Commands::Tree).await.is_err());
    }

    #[tokio::test]
    async fn test_set_root_label_writes_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);

        let out = ctx
            .execute(&Commands::Config {
                command: ConfigCommands::SetRootLabel {
                    label: "Journal".to_string(),
                },
            })
            .await
            .unwrap();
        assert!(out.contains("Journal"));
        let saved = ConfigLoader::load_from_file(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.root_label(), "Journal");
    }

    #[tokio::test]
    async fn test_config_commands_do_not_open_store() {
        let temp_dir = TempDir::new().unwrap();
        // A plain file where the store directory should be cannot be opened.
        let blocked = temp_dir.path().join("blocked");
        std::fs::write(&blocked, b"not a store").unwrap();
        let mut config = DailyFolderConfig::default();
        config.navigation.settle_delay_ms = 0;
        let ctx = CliContext::new(config, Some(temp_dir.path().join("config.toml")), Some(blocked));

        let shown = ctx
            .execute(&Commands::Config {
                command: ConfigCommands::Show,
            })
            .await
            .unwrap();
        assert!(shown.contains("Daily Folder"));
        ctx.execute(&Commands::Config {
            command: ConfigCommands::SetRootLabel {
                label: "Journal".to_string(),
            },
        })
        .await
        .unwrap();

        assert!(ctx.execute(&Commands::Tree).await.is_err());
    }
}

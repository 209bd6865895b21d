use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use chrono::Local;
use dialoguer::Confirm;
use serde::Serialize;
use uuid::Uuid;

use super::{output, CliCommand, CliResult, ConfigAction};
use crate::{
    collaborators::{
        Advisor, CommandAdvisor, CommandExtractor, CommandLine, Extractor, UnavailableAdvisor,
    },
    config::{Config, ConfigManager},
    core::{
        services::{AdviceService, DebtStats, Distribution, SummaryService},
        utils::PathResolver,
        LedgerStore,
    },
    ledger::{AnalysisResult, DebtRecord},
    storage::JsonStorage,
};

/// Configuration plus a restored store, ready to serve one command.
pub struct Session {
    pub config: Config,
    pub settings: ConfigManager,
    pub store: LedgerStore,
}

impl Session {
    pub fn open() -> CliResult<Self> {
        Self::open_in(&PathResolver::base_dir())
    }

    pub fn open_in(base: &Path) -> CliResult<Self> {
        let settings = ConfigManager::with_base_dir(base)?;
        let config = settings.load()?;
        let storage = JsonStorage::new(Some(base.to_path_buf()), &config.snapshot_key)?;
        let (store, report) = LedgerStore::open(Box::new(storage));
        if report.recovered {
            eprintln!("Warning: saved debts could not be read; starting with an empty ledger.");
        }
        for warning in &report.warnings {
            tracing::debug!("{warning}");
        }
        Ok(Self {
            config,
            settings,
            store,
        })
    }
}

pub fn execute(session: &mut Session, command: CliCommand) -> CliResult<()> {
    match command {
        CliCommand::List => list(session),
        CliCommand::Add { text } => add(session, &text),
        CliCommand::Import { source } => import(session, &source),
        CliCommand::Pay { id } => pay(session, &id),
        CliCommand::Delete { id, assume_yes } => delete(session, &id, assume_yes),
        CliCommand::Stats { json } => stats(session, json),
        CliCommand::Config(ConfigAction::Show) => show_config(&session.config),
        CliCommand::Config(ConfigAction::Set { key, value }) => {
            set_config_value(session, &key, &value)
        }
        CliCommand::Help => Ok(()),
    }
}

fn list(session: &Session) -> CliResult<()> {
    let today = Local::now().date_naive();
    print!(
        "{}",
        output::render_list(session.store.list(), &session.config.currency_symbol, today)
    );
    if session.store.is_empty() {
        println!();
    }
    Ok(())
}

fn add(session: &mut Session, text: &str) -> CliResult<()> {
    let command = session.config.extract_command.as_deref().ok_or(
        "no extract_command configured; use `import` with an analysis result instead",
    )?;
    let extractor = CommandExtractor::parse(command)?;
    record(session, extractor.extract(text))
}

fn import(session: &mut Session, source: &str) -> CliResult<()> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(source)?
    };
    record(session, AnalysisResult::from_json(&raw))
}

fn record(session: &mut Session, candidate: Option<AnalysisResult>) -> CliResult<()> {
    let created = session.store.create(candidate)?;
    println!(
        "Recorded {} owing {} ({})",
        created.person_name,
        output::format_amount(&session.config.currency_symbol, created.amount),
        output::short_id(&created.id)
    );
    Ok(())
}

fn pay(session: &mut Session, raw_id: &str) -> CliResult<()> {
    let Some(target) = resolve(&session.store, raw_id)? else {
        println!("No debt matches `{raw_id}`; nothing changed.");
        return Ok(());
    };
    session.store.mark_paid(target.id)?;
    println!(
        "Marked {} ({}) as paid.",
        target.person_name,
        output::short_id(&target.id)
    );
    Ok(())
}

fn delete(session: &mut Session, raw_id: &str, assume_yes: bool) -> CliResult<()> {
    let Some(target) = resolve(&session.store, raw_id)? else {
        println!("No debt matches `{raw_id}`; nothing changed.");
        return Ok(());
    };
    if !assume_yes {
        let prompt = format!(
            "Delete the debt from {} ({})? This cannot be undone",
            target.person_name,
            output::format_amount(&session.config.currency_symbol, target.amount)
        );
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|err| format!("confirmation unavailable ({err}); re-run with --yes"))?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }
    session.store.delete(target.id)?;
    println!(
        "Deleted {} ({}).",
        target.person_name,
        output::short_id(&target.id)
    );
    Ok(())
}

#[derive(Serialize)]
struct StatsReport {
    stats: DebtStats,
    distribution: Distribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    advice: Option<String>,
}

fn stats(session: &Session, json: bool) -> CliResult<()> {
    let stats = session.store.stats();
    let distribution = SummaryService::distribution(&stats);
    let advice = session
        .config
        .advice_command
        .as_deref()
        .and_then(|command| AdviceService::advise(advisor_for(command).as_ref(), &stats));

    if json {
        let report = StatsReport {
            stats,
            distribution,
            advice,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!(
        "{}",
        output::render_stats(&stats, &distribution, &session.config.currency_symbol)
    );
    if let Some(tip) = advice {
        println!("Tip: {tip}");
    }
    Ok(())
}

fn show_config(config: &Config) -> CliResult<()> {
    println!("snapshot_key:    {}", config.snapshot_key);
    println!("currency_symbol: {}", config.currency_symbol);
    println!(
        "extract_command: {}",
        config.extract_command.as_deref().unwrap_or("(none)")
    );
    println!(
        "advice_command:  {}",
        config.advice_command.as_deref().unwrap_or("(none)")
    );
    Ok(())
}

fn set_config_value(session: &mut Session, key: &str, value: &str) -> CliResult<()> {
    let value = value.trim();
    let mut config = session.config.clone();
    match key.to_lowercase().as_str() {
        "snapshot_key" => config.snapshot_key = required(key, value)?,
        "currency_symbol" => config.currency_symbol = required(key, value)?,
        "extract_command" => config.extract_command = command_value(value)?,
        "advice_command" => config.advice_command = command_value(value)?,
        other => return Err(format!("unknown config key `{other}`").into()),
    }
    session.settings.save(&config)?;
    session.config = config;
    println!("Configuration updated.");
    Ok(())
}

fn required(key: &str, value: &str) -> CliResult<String> {
    if value.is_empty() {
        return Err(format!("{key} cannot be empty").into());
    }
    Ok(value.to_string())
}

/// `none` or an empty value clears the command; anything else must split
/// into a program and its arguments.
fn command_value(value: &str) -> CliResult<Option<String>> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    CommandLine::parse(value)?;
    Ok(Some(value.to_string()))
}

fn advisor_for(command: &str) -> Box<dyn Advisor> {
    match CommandAdvisor::parse(command) {
        Ok(advisor) => Box::new(advisor),
        Err(err) => {
            tracing::warn!(error = %err, "advice_command is unusable");
            Box::new(UnavailableAdvisor)
        }
    }
}

/// Accepts a full id or an unambiguous prefix of its hex digits.
fn resolve(store: &LedgerStore, raw: &str) -> CliResult<Option<DebtRecord>> {
    let raw = raw.trim();
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(store.find(id).ok().cloned());
    }
    let needle = raw.replace('-', "").to_ascii_lowercase();
    if needle.is_empty() {
        return Ok(None);
    }
    let mut matches = store
        .list()
        .iter()
        .filter(|record| record.id.simple().to_string().starts_with(&needle));
    let first = matches.next().cloned();
    if matches.next().is_some() {
        return Err(format!("`{raw}` matches more than one debt; use a longer id").into());
    }
    Ok(first)
}

pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod correlation;
pub mod database;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod http;
pub mod notify;
pub mod rate_limiter;
pub mod services;
pub mod stats;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;
use colored::Colorize;

use crate::api::BrawlStarsClient;
use crate::api::parsers::display_tag;
use crate::archive::ReportArchive;
use crate::cli::{Command, CommunityCommand};
use crate::config::{AppConfig, Emotes};
use crate::database::DbPool;
use crate::domain::ChannelRef;
use crate::notify::{LogNotifier, Notifier, WebhookNotifier};
use crate::services::{
    CommunityService, CycleReport, ReportService, ScanService, ServerService, WatchService,
};
use crate::stats::{render_compact, render_wide};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_watch(dry_run: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        if dry_run {
            watch(&config, LogNotifier, LogNotifier).await
        } else {
            let scan_notifier = WebhookNotifier::new(&config.api)?;
            let report_notifier = WebhookNotifier::new(&config.api)?;
            watch(&config, scan_notifier, report_notifier).await
        }
    })
}

pub fn handle_scan(dry_run: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        if dry_run {
            scan_once(&config, LogNotifier).await
        } else {
            scan_once(&config, WebhookNotifier::new(&config.api)?).await
        }
    })?;

    print_cycle_report(&report);
    Ok(())
}

pub fn handle_report(dry_run: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let runtime = tokio::runtime::Runtime::new()?;
    let reported = runtime.block_on(async {
        if dry_run {
            report_service(&config, LogNotifier)?.run().await
        } else {
            report_service(&config, WebhookNotifier::new(&config.api)?)?
                .run()
                .await
        }
    })?;

    println!("{} {reported} communities", "Reported".green());
    Ok(())
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_stats(community: &str, mode: &str, compact: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let service = community_service(&config)?;
    let emotes = Emotes::load(&config.storage.emotes_path)?;

    let snapshot = service.stats(community, mode)?;
    let text = if compact {
        let cap = service.compact_cap(service.top_n(community)?);
        render_compact(&snapshot, &emotes, cap)
    } else {
        render_wide(&snapshot, &emotes)
    };

    println!("{text}");
    Ok(())
}

pub fn handle_community(action: &CommunityCommand) -> Result<()> {
    let config = AppConfig::from_env();
    let service = community_service(&config)?;

    match action {
        CommunityCommand::AddPlayer { community, tag } => {
            let mut client = BrawlStarsClient::new(&config.api)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let player = runtime.block_on(service.add_player(&mut client, community, tag))?;
            println!(
                "{} {} ({})",
                "Tracking".green(),
                player.name.bold(),
                display_tag(&player.tag)
            );
        }
        CommunityCommand::RemovePlayer { community, tag } => {
            let player = service.remove_player(community, tag)?;
            println!("{} {}", "Stopped tracking".yellow(), player.name.bold());
        }
        CommunityCommand::Players { community } => {
            let players = service.players(community)?;
            if players.is_empty() {
                println!("{}", "No tracked players".dimmed());
            }
            for player in players {
                println!("{}: {}", player.name.bold(), display_tag(&player.tag).dimmed());
            }
        }
        CommunityCommand::SetRoom { community, channel } => {
            service.set_notify_channel(community, channel.clone().map(ChannelRef))?;
            println!("{}", "Scrim channel updated".green());
        }
        CommunityCommand::SetStatsRoom { community, channel } => {
            service.set_stats_channel(community, channel.clone().map(ChannelRef))?;
            println!("{}", "Stats channel updated".green());
        }
        CommunityCommand::SetStatsCount { community, count } => {
            service.set_top_n(community, *count)?;
            println!("{} {count} brawlers", "Stats will show".green());
        }
    }
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

// --- Wiring ---

fn open_pool(config: &AppConfig) -> Result<DbPool> {
    database::open_database(&config.storage.database_path)
}

fn community_service(config: &AppConfig) -> Result<CommunityService> {
    Ok(CommunityService::new(open_pool(config)?, config.stats.clone()))
}

fn scan_service<N: Notifier>(
    config: &AppConfig,
    notifier: N,
) -> Result<ScanService<BrawlStarsClient, N>> {
    let source = BrawlStarsClient::new(&config.api)?;
    let emotes = Emotes::load(&config.storage.emotes_path)?;
    Ok(ScanService::new(open_pool(config)?, source, notifier, emotes, config))
}

fn report_service<N: Notifier>(config: &AppConfig, notifier: N) -> Result<ReportService<N>> {
    Ok(ReportService::new(
        open_pool(config)?,
        notifier,
        Emotes::load(&config.storage.emotes_path)?,
        ReportArchive::new(&config.storage.report_archive_dir)?,
        config.stats.clone(),
    ))
}

async fn scan_once<N: Notifier>(config: &AppConfig, notifier: N) -> Result<CycleReport> {
    scan_service(config, notifier)?.run_cycle().await
}

async fn watch<N: Notifier, R: Notifier>(config: &AppConfig, scans: N, reports: R) -> Result<()> {
    let mut service = WatchService::new(
        scan_service(config, scans)?,
        report_service(config, reports)?,
        config.scan.interval,
        config.scan.report_interval,
    );
    service.run().await
}

fn print_cycle_report(report: &CycleReport) {
    println!(
        "{} {} players ({} skipped)",
        "Scanned".green(),
        report.players_scanned,
        report.players_skipped
    );
    println!(
        "Matches admitted: {}, sessions started: {}, completed: {}, discarded: {}, duplicates: {}",
        report.matches_admitted,
        report.sessions_started,
        report.sessions_completed,
        report.sessions_discarded,
        report.duplicates
    );
    if report.communities_skipped > 0 {
        println!(
            "{} {} communities skipped, see the log",
            "Warning:".yellow(),
            report.communities_skipped
        );
    }
    if report.notifications_failed > 0 {
        println!(
            "{} {} notifications failed",
            "Warning:".yellow(),
            report.notifications_failed
        );
    }
}

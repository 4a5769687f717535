// src/main.rs
mod aggregator;
mod cli;
mod config;
mod file_utils;
mod metric_extractor;
mod models;
mod report;

use std::path::Path;
use anyhow::Result;
use clap::Parser;
use cli::Args;
use config::{DEFAULT_CONFIG_FILE, create_default_config, load_config};
use aggregator::{analyze_directory, analyze_multiple_directories, existing_directories};
use report::{render_directory_report, render_multi_report};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    let args = Args::parse();

    // 生成默认配置文件后直接退出
    if args.init_config {
        let path = args.config.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        match create_default_config(path) {
            Ok(()) => println!("Created default config file at {}", path.display()),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    init_logging(&args);
    debug!("Arguments: {:?}", args);

    match run(&args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// 日志输出到stderr，报告输出到stdout；设置了RUST_LOG时以其为准
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(args.log_level()).into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// 返回进程退出码：有结果时为0，没有任何有效结果时为1
fn run(args: &Args) -> Result<i32> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    debug!("Effective config: {:?}", config);

    if !args.is_multi() {
        let Some(root) = args.dirs.first() else {
            anyhow::bail!("No directory provided.");
        };
        info!("Analyzing directory: {}", root.display());
        let summary = analyze_directory(root, &config)?;
        print!("{}", render_directory_report(summary.as_ref(), &config));
        return Ok(if summary.is_some() { 0 } else { 1 });
    }

    let roots = existing_directories(&args.dirs);
    if roots.is_empty() {
        anyhow::bail!("No valid directories provided.");
    }

    let summary = analyze_multiple_directories(&roots, &config);
    print!("{}", render_multi_report(summary.as_ref(), &config));
    Ok(if summary.is_some() { 0 } else { 1 })
}

//! 命令调度模块：
//! - 接收解析好的 CLI 参数，结合环境变量计算“有效参数”
//! - 决定显示帮助还是执行按主题构建

use anyhow::{Context, Result};
use clap::CommandFactory;
use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};
use tracing::{debug, info, warn};

use crate::{
    build::{dispatch, BuildOptions, TailwindCli, DEFAULT_BIN, DEFAULT_CWD},
    cli::Cli,
    error::ThemeError,
    help::{self, options_from_command, set_default, HelpRequest},
    theme::{generate_args, read_themes, ThemeSource},
    utils::{env_bool_truthy, env_opt_path, env_opt_string},
};

const MAIN_USAGE: &str =
    "tailwind-theme [--input themes.json] [--output dist] [--watch] [options\u{2026}]";
const SHORT_USAGE: &str = "tailwind-theme [options]";

/// 运行隐式的 build 命令
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    let mut options = options_from_command(&Cli::command());
    set_default(&mut options, "--cwd", DEFAULT_CWD);
    set_default(&mut options, "--bin", DEFAULT_BIN);

    // 当前不支持任何子命令，出现位置参数时提示并退出
    if let Some(command) = cli.command.first() {
        help::print(&HelpRequest {
            invalid: Some(command.as_str()),
            usage: &[SHORT_USAGE],
            options: &options,
        });
        return Ok(ExitCode::from(1));
    }

    // 环境变量覆盖（若 CLI 未指定）
    let effective_input = cli.input.or_else(|| env_opt_string("TAILWIND_THEME_INPUT"));
    let effective_output = cli.output.or_else(|| env_opt_path("TAILWIND_THEME_OUTPUT"));
    let effective_cwd = cli.cwd.or_else(|| env_opt_path("TAILWIND_THEME_CWD"));
    let effective_bin = cli
        .bin
        .or_else(|| env_opt_string("TAILWIND_THEME_BIN"))
        .unwrap_or_else(|| DEFAULT_BIN.to_string());
    let effective_watch = cli.watch || env_bool_truthy("TAILWIND_THEME_WATCH").unwrap_or(false);
    let effective_minify = cli.minify || env_bool_truthy("TAILWIND_THEME_MINIFY").unwrap_or(false);

    // 直接在终端运行且未指定输出时，显示帮助而不是构建
    if cli.help || (io::stdout().is_terminal() && effective_output.is_none()) {
        help::print(&HelpRequest {
            invalid: None,
            usage: &[MAIN_USAGE],
            options: &options,
        });
        return Ok(ExitCode::SUCCESS);
    }

    let source = ThemeSource::from_arg(effective_input.as_deref());
    debug!(source = %source.describe(), "loading themes");
    let themes = match read_themes(&source) {
        Ok(themes) => themes,
        Err(err @ ThemeError::MissingThemes) => {
            eprintln!("{err}");
            return Ok(ExitCode::from(1));
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to load themes from {}", source.describe()))
        }
    };

    let base = BuildOptions {
        input: None,
        output: effective_output,
        watch: effective_watch,
        minify: effective_minify,
        optimize: cli.optimize,
        map: cli.map,
        cwd: effective_cwd,
    };
    let all = generate_args(&themes, &base);
    info!(themes = all.len(), command = %effective_bin, "dispatching css builds");

    let builder = TailwindCli::new(&effective_bin)?;
    if let Err(err) = builder.stop_on_interrupt() {
        warn!("{err:#}");
    }
    dispatch(&builder, &all)?;
    Ok(ExitCode::SUCCESS)
}

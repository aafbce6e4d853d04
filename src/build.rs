//! 构建模块：
//! - `BuildOptions`：一次 CSS 构建的参数
//! - `Builder`：实际构建的抽象，默认实现为调用外部 tailwindcss 命令
//! - `dispatch`：按主题并发执行构建，任一失败即整体失败

use anyhow::{bail, Context, Result};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    process::{Child, Command},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc, Mutex, MutexGuard,
    },
    thread,
    time::Duration,
};
use tracing::{debug, warn};

use crate::disposables::Disposables;

/// 默认调用的构建命令
pub(crate) const DEFAULT_BIN: &str = "tailwindcss";
/// 默认工作目录
pub(crate) const DEFAULT_CWD: &str = ".";

// 子进程状态轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 一次构建的参数。按主题展开时只覆盖 `input` 与 `output`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BuildOptions {
    pub(crate) input: Option<PathBuf>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) watch: bool,
    pub(crate) minify: bool,
    pub(crate) optimize: bool,
    pub(crate) map: bool,
    pub(crate) cwd: Option<PathBuf>,
}

impl BuildOptions {
    /// 转换为外部构建命令的参数列表
    pub(crate) fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if let Some(input) = &self.input {
            args.push("--input".into());
            args.push(input.into());
        }
        if let Some(output) = &self.output {
            args.push("--output".into());
            args.push(output.into());
        }
        if self.watch {
            args.push("--watch".into());
        }
        if self.minify {
            args.push("--minify".into());
        }
        if self.optimize {
            args.push("--optimize".into());
        }
        if self.map {
            args.push("--map".into());
        }
        if let Some(cwd) = &self.cwd {
            args.push("--cwd".into());
            args.push(cwd.into());
        }
        args
    }

    fn input_label(&self) -> String {
        self.input
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// 实际执行一次 CSS 构建
pub(crate) trait Builder: Sync {
    /// 阻塞直到构建结束；watch 模式下通常不会返回
    fn build(&self, options: &BuildOptions) -> Result<()>;

    /// 终止仍在进行的构建。某个主题构建失败后调用。
    fn abort(&self) {}
}

/// 通过外部命令（默认 `tailwindcss`）执行构建
pub(crate) struct TailwindCli {
    program: String,
    leading_args: Vec<String>,
    children: Arc<Disposables>,
    aborted: Arc<AtomicBool>,
}

impl TailwindCli {
    /// `command` 允许带前置参数，例如 `npx @tailwindcss/cli`
    pub(crate) fn new(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("build command is empty");
        };
        Ok(Self {
            program,
            leading_args: parts.collect(),
            children: Arc::new(Disposables::new()),
            aborted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Ctrl-C 时终止全部构建再退出。
    ///
    /// 子进程各自位于独立进程组，终端发出的 SIGINT 只会到达本进程。
    pub(crate) fn stop_on_interrupt(&self) -> Result<()> {
        let children = Arc::clone(&self.children);
        let aborted = Arc::clone(&self.aborted);
        ctrlc::set_handler(move || {
            aborted.store(true, Ordering::SeqCst);
            children.dispose();
            std::process::exit(130);
        })
        .context("failed to install Ctrl-C handler")
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.leading_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn lock_child(child: &Mutex<Child>) -> MutexGuard<'_, Child> {
    child.lock().unwrap_or_else(|e| e.into_inner())
}

/// 在独立进程组中启动，便于连同其派生的进程一起终止
#[cfg(unix)]
fn own_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_command: &mut Command) {}

/// 终止子进程及其整个进程组（npx → node 之类的包装命令）
#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    // 进程组 id 即子进程 pid；子进程未被回收前该 id 不会被复用
    let pgid = Pid::from_raw(child.id() as i32);
    if let Err(err) = killpg(pgid, Signal::SIGKILL) {
        debug!(%err, "killpg failed, killing direct child only");
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
}

impl Builder for TailwindCli {
    fn build(&self, options: &BuildOptions) -> Result<()> {
        if self.aborted.load(Ordering::SeqCst) {
            bail!("build of {} aborted", options.input_label());
        }

        // 确保输出目录存在
        if let Some(parent) = options.output.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create output directory {}", parent.display()))?;
            }
        }

        let args = options.to_args();
        debug!(command = %self.command_line(), ?args, "spawning css build");
        let mut command = Command::new(&self.program);
        command.args(&self.leading_args).args(&args);
        own_process_group(&mut command);
        let child = command
            .spawn()
            .with_context(|| format!("failed to start `{}`", self.command_line()))?;
        let child = Arc::new(Mutex::new(child));

        let key = {
            let child = child.clone();
            self.children.add(move || {
                kill_tree(&mut lock_child(&child));
            })
        };
        // abort 可能恰好发生在 spawn 与登记之间
        if self.aborted.load(Ordering::SeqCst) {
            self.children.dispose();
        }

        let status = loop {
            let polled = lock_child(&child).try_wait();
            match polled {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    self.children.forget(key);
                    return Err(err).with_context(|| {
                        format!("failed to wait for `{}`", self.command_line())
                    });
                }
            }
        };
        self.children.forget(key);

        if !status.success() {
            bail!(
                "`{}` exited with {} while building {}",
                self.command_line(),
                status,
                options.input_label()
            );
        }
        Ok(())
    }

    fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        let running = self.children.len();
        if running > 0 {
            warn!(running, "stopping remaining css builds");
        }
        self.children.dispose();
    }
}

/// 并发执行全部构建并等待结束。
///
/// 每次构建前向 stderr 打印进度；任一构建失败时终止其余构建并返回第一个错误。
pub(crate) fn dispatch<B: Builder + ?Sized>(builder: &B, all: &[BuildOptions]) -> Result<()> {
    if all.is_empty() {
        debug!("no themes to build");
        return Ok(());
    }

    let (tx, rx) = mpsc::channel::<Result<()>>();
    thread::scope(|s| {
        for options in all {
            let tx = tx.clone();
            s.spawn(move || {
                eprintln!("building {} file...", options.input_label());
                let _ = tx.send(builder.build(options));
            });
        }
        drop(tx);

        let mut first_err: Option<anyhow::Error> = None;
        for res in rx {
            if let Err(err) = res {
                if first_err.is_none() {
                    builder.abort();
                    first_err = Some(err);
                } else {
                    debug!(error = %err, "additional build failure");
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })
}

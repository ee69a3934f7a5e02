mod command;

use anyhow::Result;
use chronometer::format::format_elapsed_with;
use chronometer::prelude::*;
use chronometer::{CRATE_NAME, VERSION as LIB_VERSION};
use colored::Colorize;
use command::ShellCommand;
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct MyHighlighter;

impl Highlighter for MyHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{}", "  chronoshell :: named stopwatches".cyan().bold());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    println!("{}", "-----------------------------------------------------------------------------------------------".dimmed());

    let license_blurb = "
    This software is provided 'as is', without warranty of any kind.
    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.
    ";

    println!("{}", version_string);
    println!("{}", license_blurb.dimmed());

    println!("{}", "-----------------------------------------------------------------------------------------------".dimmed());
}

fn print_help() {
    println!("Available commands:");
    println!("  create <T> [--paused] [--lowres] - Creates task T (started unless --paused).");
    println!("  start|resume|pause|stop <T>      - Drives task T through its states.");
    println!("  lap <T> <LABEL>                  - Records a lap on a running task.");
    println!("  read <T>                         - Shows the current reading of T.");
    println!("  total <T>                        - Shows the total (frozen once stopped).");
    println!("  laps <T> [asc|desc]              - Lists the laps recorded on T.");
    println!("  list                             - Shows every task and its state.");
    println!("  sleep <MS>                       - Waits MS milliseconds.");
    println!("  exit                             - Quits the shell.");
}

/// Holds the registry and display settings for one shell session.
struct Session {
    tasks: TaskRegistry<String>,
    precision: usize,
    lap_order: SortOrder,
}

impl Session {
    fn new(config: ChronoConfig) -> Self {
        Self {
            tasks: TaskRegistry::with_defaults(config.tasks),
            precision: config.display.precision,
            lap_order: config.display.lap_order,
        }
    }

    fn show(&self, seconds: f64) -> String {
        format_elapsed_with(seconds, self.precision)
    }

    fn report(transition: Transition, task: &str, verb: &str) {
        match transition {
            Transition::Applied => println!("--> Task '{}' {}.", task, verb),
            Transition::Ignored => println!("--> Task '{}' was not {} (ignored in its current state).", task, verb),
        }
    }

    /// Executes a command. Returns `false` when the shell should exit.
    async fn execute(&mut self, command: ShellCommand) -> Result<bool, RegistryError> {
        match command {
            ShellCommand::Create {
                task,
                high_resolution,
                auto_start,
            } => {
                let defaults = self.tasks.defaults();
                let chrono = self.tasks.create_task_with(
                    task.clone(),
                    high_resolution.unwrap_or(defaults.high_resolution),
                    auto_start.unwrap_or(defaults.auto_start),
                )?;
                println!("--> Created task '{}' ({:?}).", task, chrono.state());
            }
            ShellCommand::Start(task) => {
                let transition = self.tasks.get_task_mut(&task)?.start();
                Self::report(transition, &task, "started");
            }
            ShellCommand::Resume(task) => {
                let transition = self.tasks.resume_task(&task)?;
                Self::report(transition, &task, "resumed");
            }
            ShellCommand::Pause(task) => {
                let reading = self.tasks.pause_task(&task)?;
                println!("--> '{}' at {}", task, self.show(reading));
            }
            ShellCommand::Stop(task) => {
                let reading = self.tasks.stop_task(&task)?;
                println!("--> '{}' stopped at {}", task, self.show(reading));
            }
            ShellCommand::Lap { task, label } => {
                let lap = self.tasks.add_lap_time(&task, label.clone())?.map(|lap| lap.read());
                match lap {
                    Some(seconds) => println!("--> Lap '{}' on '{}': {}", label, task, self.show(seconds)),
                    None => println!("--> Task '{}' is not running; no lap recorded.", task),
                }
            }
            ShellCommand::Read(task) => {
                let reading = self.tasks.read_task(&task)?;
                println!("{}", self.show(reading));
            }
            ShellCommand::Total(task) => {
                let reading = self.tasks.read_total_task(&task)?;
                println!("{}", self.show(reading));
            }
            ShellCommand::Laps { task, order } => {
                let chrono = self.tasks.get_task(&task)?;
                if chrono.lap_count() == 0 {
                    println!("No laps recorded on '{}'.", task);
                }
                for (label, lap) in chrono.entries(order.unwrap_or(self.lap_order)) {
                    println!("  {:<16} {}", label, self.show(lap.read()));
                }
            }
            ShellCommand::List => {
                println!("Tasks:");
                for (task, chrono) in self.tasks.iter() {
                    println!(
                        "  {:<16} {:<8} {}  laps: {}",
                        task,
                        format!("{:?}", chrono.state()),
                        self.show(chrono.read_total_time()),
                        chrono.lap_count()
                    );
                }
            }
            ShellCommand::Sleep(ms) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            ShellCommand::Help => print_help(),
            ShellCommand::Exit => return Ok(false),
            ShellCommand::Empty => {}
        }
        Ok(true)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = ChronoConfig::load(config_path.as_deref())?;
    info!("Loaded configuration: {:?}", config);

    let mut session = Session::new(config);

    let mut rl = Editor::new()?;
    let helper = MyHighlighter {};
    rl.set_helper(Some(helper));

    println!("{} shell is ready. Type 'help' for commands or 'exit' to quit.", CRATE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        let readline = rl.readline(&prompt);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match command::parse(&line) {
                    Ok(command) => match session.execute(command).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(message) => println!("{}", message),
                }
            }
            Err(_) => {
                println!("Exiting chronoshell...");
                break;
            }
        }
    }

    Ok(())
}

//! Parses shell input lines into commands.

use chronometer::common::SortOrder;

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Create {
        task: String,
        high_resolution: Option<bool>,
        auto_start: Option<bool>,
    },
    Start(String),
    Resume(String),
    Pause(String),
    Stop(String),
    Lap { task: String, label: String },
    Read(String),
    Total(String),
    Laps { task: String, order: Option<SortOrder> },
    List,
    Sleep(u64),
    Help,
    Exit,
    Empty,
}

/// Parses `line`, returning a usage message when it is malformed.
pub fn parse(line: &str) -> Result<ShellCommand, String> {
    let args = line.split_whitespace().collect::<Vec<_>>();
    let Some(command) = args.first() else {
        return Ok(ShellCommand::Empty);
    };

    let task = |usage: &str| -> Result<String, String> {
        args.get(1)
            .map(|task| task.to_string())
            .ok_or_else(|| format!("Usage: {}", usage))
    };

    match *command {
        "create" => {
            let task = task("create <TASK> [--paused] [--lowres]")?;
            let mut high_resolution = None;
            let mut auto_start = None;
            for flag in &args[2..] {
                match *flag {
                    "--paused" => auto_start = Some(false),
                    "--lowres" => high_resolution = Some(false),
                    other => return Err(format!("Unknown flag for 'create': '{}'", other)),
                }
            }
            Ok(ShellCommand::Create {
                task,
                high_resolution,
                auto_start,
            })
        }
        "start" => Ok(ShellCommand::Start(task("start <TASK>")?)),
        "resume" => Ok(ShellCommand::Resume(task("resume <TASK>")?)),
        "pause" => Ok(ShellCommand::Pause(task("pause <TASK>")?)),
        "stop" => Ok(ShellCommand::Stop(task("stop <TASK>")?)),
        "read" => Ok(ShellCommand::Read(task("read <TASK>")?)),
        "total" => Ok(ShellCommand::Total(task("total <TASK>")?)),
        "lap" => {
            let task = task("lap <TASK> <LABEL>")?;
            let label = args
                .get(2..)
                .filter(|rest| !rest.is_empty())
                .map(|rest| rest.join(" "))
                .ok_or_else(|| "Usage: lap <TASK> <LABEL>".to_string())?;
            Ok(ShellCommand::Lap { task, label })
        }
        "laps" => {
            let task = task("laps <TASK> [asc|desc]")?;
            let order = match args.get(2) {
                None => None,
                Some(&"asc") => Some(SortOrder::Ascending),
                Some(&"desc") => Some(SortOrder::Descending),
                Some(other) => return Err(format!("Unknown order '{}'. Use 'asc' or 'desc'.", other)),
            };
            Ok(ShellCommand::Laps { task, order })
        }
        "list" => Ok(ShellCommand::List),
        "sleep" => match args.get(1).map(|ms| ms.parse::<u64>()) {
            Some(Ok(ms)) => Ok(ShellCommand::Sleep(ms)),
            Some(Err(_)) => Err(format!("Error: '{}' is not a valid number of milliseconds.", args[1])),
            None => Err("Usage: sleep <MILLISECONDS>".to_string()),
        },
        "help" => Ok(ShellCommand::Help),
        "exit" | "quit" => Ok(ShellCommand::Exit),
        _ => Err(format!("Unknown command: '{}'. Type 'help'.", line.trim())),
    }
}

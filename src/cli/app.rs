//! The `cmdtree` command tree.
//!
//! Every handler parses its own flags through the flag set attached to its
//! command and writes through the sinks its command resolves.

use crate::cli::output::{summarize, OutputWriter, SinkWriter};
use crate::core::command::Command;
use crate::core::stream::Streams;
use crate::domain::config::{CmdTreeConfig, OutputFormat};
use crate::domain::error::{CmdTreeError, CmdTreeResult};
use crate::infrastructure::config::ConfigManager;
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

/// Command type used by the binary
pub type App = Command<CmdTreeError>;

/// Shared state captured by handlers
struct Context {
    config: CmdTreeConfig,
    manager: ConfigManager,
}

/// Build the full command tree rooted at `cmdtree`
pub fn build_app(config: CmdTreeConfig, manager: ConfigManager, streams: Streams) -> App {
    let ctx = Rc::new(Context { config, manager });

    let root = App::with_streams("cmdtree", list_children, streams).with_flags(|flags| {
        routing_flags(flags)
            .about("Command tree dispatcher")
            .version(env!("CARGO_PKG_VERSION"))
    });
    root.add_command(App::new("version", version));
    root.add_command(echo_command());
    root.add_command(tree_command(&ctx));
    root.add_command(config_command(&ctx));
    root
}

/// Parse flags, writing help and version requests to the output sink.
///
/// Returns `None` when clap handled the request itself.
fn parse(cmd: &App, args: &[String]) -> CmdTreeResult<Option<ArgMatches>> {
    match cmd.parse_flags(args) {
        Ok(matches) => Ok(Some(matches)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            SinkWriter::for_command(cmd, OutputFormat::Text).write_message(&e.render().to_string())?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn format_flag() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .value_parser(value_parser!(OutputFormat))
        .help("Output format")
}

/// Flag set of a routing-only node: a hidden catch-all for words that
/// matched no child
fn routing_flags(flags: clap::Command) -> clap::Command {
    flags.arg(
        Arg::new("command")
            .num_args(0..)
            .trailing_var_arg(true)
            .hide(true),
    )
}

/// Handler for routing-only nodes: rejects unknown words, otherwise lists children
fn list_children(cmd: &App, args: &[String]) -> CmdTreeResult<()> {
    let Some(matches) = parse(cmd, args)? else {
        return Ok(());
    };
    if let Some(word) = matches
        .get_many::<String>("command")
        .and_then(|mut words| words.next())
    {
        return Err(CmdTreeError::UnknownCommand(format!("{} {}", cmd.path(), word)));
    }

    let mut usage = format!("Usage: {} <command>\n\nCommands:\n", cmd.path());
    for child in cmd.children() {
        usage.push_str(&format!("  {}\n", child.name()));
    }
    SinkWriter::for_command(cmd, OutputFormat::Text).write_error(&usage)?;
    Ok(())
}

fn version(cmd: &App, _args: &[String]) -> CmdTreeResult<()> {
    SinkWriter::for_command(cmd, OutputFormat::Text)
        .write_message(&format!("cmdtree {}", env!("CARGO_PKG_VERSION")))?;
    Ok(())
}

fn echo_command() -> App {
    App::new("echo", echo).with_flags(|flags| {
        flags
            .about("Print words to the output stream")
            .arg(
                Arg::new("upper")
                    .long("upper")
                    .action(ArgAction::SetTrue)
                    .help("Uppercase the output"),
            )
            .arg(
                Arg::new("no-newline")
                    .short('n')
                    .action(ArgAction::SetTrue)
                    .help("Do not print the trailing newline"),
            )
            .arg(Arg::new("words").num_args(0..).trailing_var_arg(true))
    })
}

fn echo(cmd: &App, args: &[String]) -> CmdTreeResult<()> {
    let Some(matches) = parse(cmd, args)? else {
        return Ok(());
    };

    let mut text = matches
        .get_many::<String>("words")
        .map(|words| words.cloned().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if matches.get_flag("upper") {
        text = text.to_uppercase();
    }
    if !matches.get_flag("no-newline") {
        text.push('\n');
    }

    let out = cmd.output_stream();
    let mut writer = out.borrow_mut();
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn tree_command(ctx: &Rc<Context>) -> App {
    let ctx = Rc::clone(ctx);
    App::new("tree", move |cmd: &App, args: &[String]| {
        let Some(matches) = parse(cmd, args)? else {
            return Ok(());
        };
        let format = matches
            .get_one::<OutputFormat>("format")
            .copied()
            .unwrap_or(ctx.config.global.output_format);

        let mut root = cmd.clone();
        while let Some(parent) = root.parent() {
            root = parent;
        }

        SinkWriter::for_command(cmd, format).write_commands(&summarize(&root))?;
        Ok(())
    })
    .with_flags(|flags| flags.about("List the command tree").arg(format_flag()))
}

fn config_command(ctx: &Rc<Context>) -> App {
    let show_ctx = Rc::clone(ctx);
    let show = App::new("show", move |cmd: &App, args: &[String]| {
        let Some(matches) = parse(cmd, args)? else {
            return Ok(());
        };
        let format = matches
            .get_one::<OutputFormat>("format")
            .copied()
            .unwrap_or(show_ctx.config.global.output_format);

        SinkWriter::for_command(cmd, format).write_config(&show_ctx.config)?;
        Ok(())
    })
    .with_flags(|flags| flags.about("Print the effective configuration").arg(format_flag()));

    let path_ctx = Rc::clone(ctx);
    let path = App::new("path", move |cmd: &App, args: &[String]| {
        let Some(_) = parse(cmd, args)? else {
            return Ok(());
        };
        let writer = SinkWriter::for_command(cmd, OutputFormat::Text);
        writer.write_message(&format!(
            "global: {}",
            path_ctx.manager.get_global_config_path_ref().display()
        ))?;
        let project = path_ctx
            .manager
            .get_project_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        writer.write_message(&format!("project: {}", project))?;
        Ok(())
    })
    .with_flags(|flags| flags.about("Print configuration file locations"));

    let init_ctx = Rc::clone(ctx);
    let init = App::new("init", move |cmd: &App, args: &[String]| {
        let Some(matches) = parse(cmd, args)? else {
            return Ok(());
        };
        let dir = matches
            .get_one::<PathBuf>("dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("."));
        let written = init_ctx
            .manager
            .init_project_config(&dir, matches.get_flag("force"))?;

        SinkWriter::for_command(cmd, OutputFormat::Text)
            .write_message(&format!("Wrote {}", written.display()))?;
        Ok(())
    })
    .with_flags(|flags| {
        flags
            .about("Create a project configuration file")
            .arg(
                Arg::new("dir")
                    .long("dir")
                    .value_parser(value_parser!(PathBuf))
                    .help("Directory to create .cmdtree/config.toml in"),
            )
            .arg(
                Arg::new("force")
                    .long("force")
                    .action(ArgAction::SetTrue)
                    .help("Overwrite an existing file"),
            )
    });

    App::new("config", list_children)
        .with_flags(|flags| routing_flags(flags).about("Inspect and create configuration files"))
        .subcommand(show)
        .subcommand(path)
        .subcommand(init)
}

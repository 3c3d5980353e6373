//! Command implementations for all tadist commands

use crate::cli::commands::roster::{BlacklistCommands, GroupCommands, StudentCommands};
use crate::cli::commands::sheets::SheetsCommands;
use crate::cli::Commands;
use crate::commands::{self as cmds};
use tadist_core::error::Result;

use super::command::{Command, CommandContext};
use super::macros::trace_command;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        if let Commands::Init(args) = self {
            return cmds::init::execute(ctx.cli, ctx.root, args.course.as_deref());
        }

        let store = ctx.discover_or_open_store()?;
        let cli = ctx.cli;

        match self {
            Commands::Init(_) => Ok(()),
            Commands::Tas => cmds::roster::list_tas(cli, &store),
            Commands::Student(args) => match &args.command {
                StudentCommands::Add { login, name } => {
                    cmds::roster::add_student(cli, &store, login, name)
                }
                StudentCommands::List => cmds::roster::list_students(cli, &store),
                StudentCommands::Disable { login } => {
                    cmds::roster::set_student_enabled(cli, &store, login, false)
                }
                StudentCommands::Enable { login } => {
                    cmds::roster::set_student_enabled(cli, &store, login, true)
                }
            },
            Commands::Group(args) => match &args.command {
                GroupCommands::Add {
                    assignment,
                    name,
                    members,
                } => cmds::roster::add_group(cli, &store, assignment, name, members),
                GroupCommands::List { assignment } => {
                    cmds::roster::list_groups(cli, &store, assignment)
                }
            },
            Commands::Blacklist(args) => match &args.command {
                BlacklistCommands::Add { ta, student } => {
                    cmds::roster::add_blacklist(cli, &store, ta, student)
                }
                BlacklistCommands::Remove { ta, student } => {
                    cmds::roster::remove_blacklist(cli, &store, ta, student)
                }
                BlacklistCommands::List { ta } => {
                    cmds::roster::list_blacklist(cli, &store, ta.as_deref())
                }
            },
            Commands::Distribute(args) => cmds::distribute::execute(cli, &store, args),
            Commands::Show(args) => {
                cmds::show::execute(cli, &store, &args.assignment, args.part.as_deref())
            }
            Commands::Move(args) => cmds::moves::execute_move(cli, &store, args),
            Commands::MoveRandom(args) => cmds::moves::execute_move_random(cli, &store, args),
            Commands::Sheets(args) => match &args.command {
                SheetsCommands::Generate {
                    assignment,
                    leniency,
                } => cmds::sheets::generate(cli, &store, assignment, *leniency),
                SheetsCommands::Check { assignment, fix } => {
                    cmds::sheets::check(cli, &store, assignment, *fix)
                }
            },
        }?;

        trace_command!(cli, ctx.start, "execute_command");
        Ok(())
    }
}

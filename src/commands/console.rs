//! Interactive operator console behind `repo-steward console`.
//!
//! The console has a single waiting state. Each menu key maps to one
//! [`ConsoleCommand`], every command except [`ConsoleCommand::Exit`] runs one
//! repository operation and returns to the menu, and Exit (or end of input)
//! ends the loop.

use crate::core::{
    config::Config,
    error::{Result, StewardError, WorkflowStep},
    git::{truncate_chars, GitRepo},
    output::{print_error, print_section_header, print_step, print_step_ok, print_success},
};
use colored::*;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

const HISTORY_LIMIT: usize = 5;
const HISTORY_MESSAGE_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleCommand {
    Status,
    History,
    Add,
    Commit,
    Push,
    Pull,
    CreateBranch,
    SwitchBranch,
    CreateTag,
    ListBranches,
    CompleteWorkflow,
    Exit,
}

impl ConsoleCommand {
    /// Menu order
    pub const ALL: [ConsoleCommand; 12] = [
        ConsoleCommand::Status,
        ConsoleCommand::History,
        ConsoleCommand::Add,
        ConsoleCommand::Commit,
        ConsoleCommand::Push,
        ConsoleCommand::Pull,
        ConsoleCommand::CreateBranch,
        ConsoleCommand::SwitchBranch,
        ConsoleCommand::CreateTag,
        ConsoleCommand::ListBranches,
        ConsoleCommand::CompleteWorkflow,
        ConsoleCommand::Exit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ConsoleCommand::Status => "1",
            ConsoleCommand::History => "2",
            ConsoleCommand::Add => "3",
            ConsoleCommand::Commit => "4",
            ConsoleCommand::Push => "5",
            ConsoleCommand::Pull => "6",
            ConsoleCommand::CreateBranch => "7",
            ConsoleCommand::SwitchBranch => "8",
            ConsoleCommand::CreateTag => "9",
            ConsoleCommand::ListBranches => "10",
            ConsoleCommand::CompleteWorkflow => "11",
            ConsoleCommand::Exit => "0",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConsoleCommand::Status => "View Status",
            ConsoleCommand::History => "View History",
            ConsoleCommand::Add => "Add Files",
            ConsoleCommand::Commit => "Commit",
            ConsoleCommand::Push => "Push",
            ConsoleCommand::Pull => "Pull",
            ConsoleCommand::CreateBranch => "Create Branch",
            ConsoleCommand::SwitchBranch => "Switch Branch",
            ConsoleCommand::CreateTag => "Create Tag",
            ConsoleCommand::ListBranches => "List Branches",
            ConsoleCommand::CompleteWorkflow => "Complete Workflow",
            ConsoleCommand::Exit => "Exit",
        }
    }

    pub fn from_key(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|command| command.key() == input)
    }
}

/// Result of handling one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    AwaitCommand,
    Exit,
}

type Handler<'a, R> = fn(&mut Console<'a, R>) -> Result<()>;

pub struct Console<'a, R: BufRead> {
    repo: &'a GitRepo,
    config: &'a Config,
    input: R,
    handlers: HashMap<ConsoleCommand, Handler<'a, R>>,
}

impl<'a, R: BufRead> Console<'a, R> {
    pub fn new(repo: &'a GitRepo, config: &'a Config, input: R) -> Self {
        let mut handlers: HashMap<ConsoleCommand, Handler<'a, R>> = HashMap::new();
        handlers.insert(ConsoleCommand::Status, Self::view_status);
        handlers.insert(ConsoleCommand::History, Self::view_history);
        handlers.insert(ConsoleCommand::Add, Self::add_files);
        handlers.insert(ConsoleCommand::Commit, Self::commit_changes);
        handlers.insert(ConsoleCommand::Push, Self::push_changes);
        handlers.insert(ConsoleCommand::Pull, Self::pull_changes);
        handlers.insert(ConsoleCommand::CreateBranch, Self::create_branch);
        handlers.insert(ConsoleCommand::SwitchBranch, Self::switch_branch);
        handlers.insert(ConsoleCommand::CreateTag, Self::create_tag);
        handlers.insert(ConsoleCommand::ListBranches, Self::list_branches);
        handlers.insert(ConsoleCommand::CompleteWorkflow, Self::complete_workflow);

        Self {
            repo,
            config,
            input,
            handlers,
        }
    }

    /// Menu loop; returns when the operator picks Exit or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            print_menu();
            let Some(choice) = self.prompt("Option")? else {
                log::debug!("Console input closed");
                return Ok(());
            };

            match ConsoleCommand::from_key(&choice) {
                Some(command) => {
                    if self.execute(command)? == Transition::Exit {
                        return Ok(());
                    }
                }
                None => print_error("Invalid option"),
            }

            if self.prompt("Press Enter to continue...")?.is_none() {
                return Ok(());
            }
        }
    }

    /// Handle one command. Operation failures are reported on the console
    /// and leave the console waiting for the next command; only I/O errors
    /// on the console itself are returned.
    pub fn execute(&mut self, command: ConsoleCommand) -> Result<Transition> {
        if command == ConsoleCommand::Exit {
            return Ok(Transition::Exit);
        }
        if let Err(e) = self.dispatch(command) {
            print_error(&e.to_string());
        }
        Ok(Transition::AwaitCommand)
    }

    /// Run the handler for `command` and return its result unchanged
    pub fn dispatch(&mut self, command: ConsoleCommand) -> Result<()> {
        match self.handlers.get(&command).copied() {
            Some(handler) => handler(self),
            None => Ok(()),
        }
    }

    /// Print `label: ` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for text that must not be empty
    fn prompt_required(&mut self, label: &str) -> Result<String> {
        match self.prompt(label)? {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(StewardError::empty_input(label)),
        }
    }

    fn view_status(&mut self) -> Result<()> {
        print_section_header("Status");
        println!("Branch: {}", self.repo.current_branch()?.blue());
        println!("Dirty: {}", self.repo.is_dirty()?);
        println!("Untracked: {}", self.repo.untracked_files()?.len());
        Ok(())
    }

    fn view_history(&mut self) -> Result<()> {
        print_section_header("Commit History");
        let commits = self.repo.recent_commits(HISTORY_LIMIT)?;
        if commits.is_empty() {
            println!("- no commits yet -");
        }
        for (i, commit) in commits.iter().enumerate() {
            println!(
                "{}. {} - {}",
                i + 1,
                commit.hash.yellow(),
                truncate_chars(&commit.message, HISTORY_MESSAGE_CHARS)
            );
        }
        Ok(())
    }

    fn add_files(&mut self) -> Result<()> {
        self.repo.add_all()?;
        print_success("Files added");
        Ok(())
    }

    fn commit_changes(&mut self) -> Result<()> {
        let message = self.prompt_required("Commit message")?;
        self.repo.commit(&message)?;
        print_success("Committed");
        Ok(())
    }

    fn push_changes(&mut self) -> Result<()> {
        self.repo.push(&self.config.remote, &self.config.branch)?;
        print_success("Pushed");
        Ok(())
    }

    fn pull_changes(&mut self) -> Result<()> {
        self.repo.pull(&self.config.remote, &self.config.branch)?;
        print_success("Pulled");
        Ok(())
    }

    fn create_branch(&mut self) -> Result<()> {
        let name = self.prompt_required("Branch name")?;
        self.repo.create_branch(&name)?;
        print_success(&format!("Branch created: {name}"));
        Ok(())
    }

    fn switch_branch(&mut self) -> Result<()> {
        let name = self.prompt_required("Branch name")?;
        self.repo.checkout_branch(&name)?;
        print_success(&format!("Switched to {name}"));
        Ok(())
    }

    fn create_tag(&mut self) -> Result<()> {
        let name = self.prompt_required("Tag name")?;
        self.repo.create_tag(&name)?;
        print_success(&format!("Tag created: {name}"));

        let answer = self.prompt("Push tag? (y/n)")?.unwrap_or_default();
        if answer.eq_ignore_ascii_case("y") {
            self.repo.push(&self.config.remote, &name)?;
            print_success("Tag pushed");
        }
        Ok(())
    }

    fn list_branches(&mut self) -> Result<()> {
        print_section_header("Branches");
        for branch in self.repo.branches()? {
            if branch.is_current {
                println!("  {} {}", branch.name.blue(), "(current)".bright_black());
            } else {
                println!("  {}", branch.name);
            }
        }
        Ok(())
    }

    fn complete_workflow(&mut self) -> Result<()> {
        print_section_header("Complete Workflow");
        let message = self.prompt_required("Commit message")?;
        run_workflow(self.repo, self.config, &message)?;
        print_success("Workflow complete!");
        Ok(())
    }
}

fn print_menu() {
    let rule = "=".repeat(60);
    println!("\n{}", rule.bright_black());
    println!("{}", "Repository Manager".blue().bold());
    println!("{}\n", rule.bright_black());
    for command in ConsoleCommand::ALL {
        println!("{}. {}", command.key().white(), command.label());
    }
}

/// Add everything, commit with `message`, push the configured branch.
///
/// Stops at the first failing step; the returned error names that step and
/// no later step is attempted.
pub fn run_workflow(repo: &GitRepo, config: &Config, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(StewardError::empty_input("Commit message"));
    }

    print_step("1. Adding files...");
    repo.add_all()
        .map_err(|e| StewardError::workflow(WorkflowStep::Add, e))?;
    print_step_ok("Added");

    print_step("2. Committing...");
    repo.commit(message)
        .map_err(|e| StewardError::workflow(WorkflowStep::Commit, e))?;
    print_step_ok("Committed");

    print_step("3. Pushing...");
    repo.push(&config.remote, &config.branch)
        .map_err(|e| StewardError::workflow(WorkflowStep::Push, e))?;
    print_step_ok("Pushed");

    Ok(())
}

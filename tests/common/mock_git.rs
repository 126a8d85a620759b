//! Scripted git clones for testing
//!
//! Every clone handed out by [`MockGit`] shares one script and one command
//! log, so a test can assert on the full sequence of git commands across
//! nested invocations (e.g. a restart from finalize).

#![allow(dead_code)]

use merge_bot::error::{Error, Result};
use merge_bot::git::{CloneProvider, CommandExit, GitRepo, command_line};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Call record for `clone_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneCall {
    pub org: String,
    pub repo: String,
    pub branch: String,
}

#[derive(Debug, Clone)]
enum Scripted {
    Stdout(String),
    Fail(String),
}

#[derive(Default)]
struct Script {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    exit_codes: Mutex<HashMap<String, CommandExit>>,
    missing_branches: Mutex<HashSet<String>>,
    commands: Mutex<Vec<String>>,
    clones: Mutex<Vec<CloneCall>>,
}

impl Script {
    fn push(&self, command: &str, response: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(response);
    }

    /// Next scripted response; the last one repeats forever
    fn next(&self, command: &str) -> Option<Scripted> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(command)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

/// Clone provider whose clones replay a script
#[derive(Clone, Default)]
pub struct MockGit {
    script: Arc<Script>,
}

impl MockGit {
    /// Create an empty script: every command succeeds with empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue stdout for `command` (as printed, e.g. `git rev-parse HEAD`)
    pub fn respond(&self, command: &str, stdout: &str) {
        self.script.push(command, Scripted::Stdout(stdout.to_string()));
    }

    /// Queue a failure of `command` with `output`
    pub fn fail(&self, command: &str, output: &str) {
        self.script.push(command, Scripted::Fail(output.to_string()));
    }

    /// Set the exit code and output reported by `run_unchecked` for `command`
    pub fn set_exit(&self, command: &str, code: i32, output: &str) {
        self.script.exit_codes.lock().unwrap().insert(
            command.to_string(),
            CommandExit {
                code: Some(code),
                output: output.to_string(),
            },
        );
    }

    /// Make cloning `branch` fail as if the remote had no such branch
    pub fn missing_branch(&self, branch: &str) {
        self.script
            .missing_branches
            .lock()
            .unwrap()
            .insert(branch.to_string());
    }

    /// A standalone clone sharing this script
    pub fn repo(&self) -> MockRepo {
        MockRepo {
            script: Arc::clone(&self.script),
            path: PathBuf::from("/nonexistent/mock-clone"),
        }
    }

    // === Call verification methods ===

    /// All commands run so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.script.commands.lock().unwrap().clone()
    }

    /// All `clone_branch` calls
    pub fn clone_calls(&self) -> Vec<CloneCall> {
        self.script.clones.lock().unwrap().clone()
    }

    /// Number of times `command` ran
    pub fn count(&self, command: &str) -> usize {
        self.commands().iter().filter(|c| *c == command).count()
    }

    /// Number of commands starting with `prefix`
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.commands()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Assert `command` ran at least once
    pub fn assert_ran(&self, command: &str) {
        let commands = self.commands();
        assert!(
            commands.iter().any(|c| c == command),
            "Expected {command:?} but got: {commands:#?}"
        );
    }

    /// Assert no command starting with `prefix` ran
    pub fn assert_not_ran_prefix(&self, prefix: &str) {
        let commands = self.commands();
        assert!(
            !commands.iter().any(|c| c.starts_with(prefix)),
            "Expected no {prefix:?} command but got: {commands:#?}"
        );
    }

    /// Position of the first occurrence of `command`
    pub fn position(&self, command: &str) -> usize {
        let commands = self.commands();
        commands
            .iter()
            .position(|c| c == command)
            .unwrap_or_else(|| panic!("Expected {command:?} but got: {commands:#?}"))
    }
}

impl CloneProvider for MockGit {
    fn clone_branch(&self, org: &str, repo: &str, branch: &str) -> Result<Box<dyn GitRepo>> {
        self.script.clones.lock().unwrap().push(CloneCall {
            org: org.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        });

        if self.script.missing_branches.lock().unwrap().contains(branch) {
            return Err(Error::BranchNotFound(branch.to_string()));
        }
        Ok(Box::new(self.repo()))
    }
}

/// One scripted working copy
pub struct MockRepo {
    script: Arc<Script>,
    path: PathBuf,
}

impl GitRepo for MockRepo {
    fn path(&self) -> &Path {
        &self.path
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let command = command_line(args);
        self.script.commands.lock().unwrap().push(command.clone());
        match self.script.next(&command) {
            None => Ok(String::new()),
            Some(Scripted::Stdout(stdout)) => Ok(stdout),
            Some(Scripted::Fail(output)) => Err(Error::CommandFailed { command, output }),
        }
    }

    fn run_unchecked(&self, args: &[&str]) -> Result<CommandExit> {
        let command = command_line(args);
        self.script.commands.lock().unwrap().push(command.clone());
        Ok(self
            .script
            .exit_codes
            .lock()
            .unwrap()
            .get(&command)
            .cloned()
            .unwrap_or(CommandExit {
                code: Some(0),
                output: String::new(),
            }))
    }
}

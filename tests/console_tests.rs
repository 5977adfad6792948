use repo_steward::commands::{run_workflow, Console, ConsoleCommand, Transition};
use repo_steward::core::error::{StewardError, WorkflowStep};
use repo_steward::core::{Config, GitRepo};
use std::fs;
use tempfile::TempDir;

mod common;
use common::repository::*;

/// Run a whole console session over `script`
fn run_session(repo: &TestRepo, script: &str) -> anyhow::Result<()> {
    let git_repo = GitRepo::open(&repo.path)?;
    let config = Config::for_repo(&repo.path);
    Console::new(&git_repo, &config, script.as_bytes()).run()?;
    Ok(())
}

fn workflow_step(err: &StewardError) -> Option<WorkflowStep> {
    match err {
        StewardError::Workflow { step, .. } => Some(*step),
        _ => None,
    }
}

#[cfg(test)]
mod console_session_tests {
    use super::*;

    #[test]
    fn test_create_branch_then_exit() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        run_session(&repo, "7\nfeature\n\n0\n")?;

        assert!(has_ref(&repo.path, "refs/heads/feature"));
        // Creating a branch does not switch to it
        assert_eq!(git(&repo.path, &["branch", "--show-current"])?, "main");
        Ok(())
    }

    #[test]
    fn test_end_of_input_ends_session() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        run_session(&repo, "")?;
        run_session(&repo, "1\n")?;
        Ok(())
    }

    #[test]
    fn test_invalid_option_keeps_waiting() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "notes.txt", "scratch\n")?;

        run_session(&repo, "99\n\n3\n\n0\n")?;

        // The add after the invalid option still ran
        let staged = git(&repo.path, &["diff", "--cached", "--name-only"])?;
        assert_eq!(staged, "notes.txt");
        Ok(())
    }

    #[test]
    fn test_failed_operation_returns_to_menu() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        // Switch to a missing branch, then create one
        run_session(&repo, "8\nmissing\n\n7\nrelease\n\n0\n")?;

        assert_eq!(git(&repo.path, &["branch", "--show-current"])?, "main");
        assert!(has_ref(&repo.path, "refs/heads/release"));
        Ok(())
    }

    #[test]
    fn test_add_then_commit() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "docs/intro.tex", "\\section{Intro}\n")?;

        run_session(&repo, "3\n\n4\nAdd intro\n\n0\n")?;

        assert_eq!(commit_count(&repo.path)?, 2);
        assert_eq!(head_message(&repo.path)?, "Add intro");
        Ok(())
    }

    #[test]
    fn test_switch_branch() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        git(&repo.path, &["branch", "drafts"])?;

        run_session(&repo, "8\ndrafts\n\n0\n")?;

        assert_eq!(git(&repo.path, &["branch", "--show-current"])?, "drafts");
        Ok(())
    }

    #[test]
    fn test_complete_workflow_from_menu() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let remote = add_bare_remote(&repo)?;
        create_file(&repo.path, "docs/intro.tex", "\\section{Intro}\n")?;

        run_session(&repo, "11\nDocs update\n\n0\n")?;

        assert_eq!(head_message(&repo.path)?, "Docs update");
        assert_eq!(
            rev_parse(&remote.path, "refs/heads/main")?,
            rev_parse(&repo.path, "HEAD")?
        );
        Ok(())
    }
}

#[cfg(test)]
mod console_command_tests {
    use super::*;

    #[test]
    fn test_exit_transition() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);
        let mut console = Console::new(&git_repo, &config, "".as_bytes());

        assert_eq!(console.execute(ConsoleCommand::Exit)?, Transition::Exit);
        assert_eq!(console.execute(ConsoleCommand::Status)?, Transition::AwaitCommand);
        Ok(())
    }

    #[test]
    fn test_empty_commit_message_rejected() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "notes.txt", "scratch\n")?;
        git_add(&repo.path, "notes.txt")?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);
        let mut console = Console::new(&git_repo, &config, "   \n".as_bytes());

        let err = console
            .dispatch(ConsoleCommand::Commit)
            .expect_err("empty message must be rejected");
        assert!(matches!(err, StewardError::EmptyInput { .. }));
        assert_eq!(err.to_string(), "Commit message cannot be empty");
        assert_eq!(commit_count(&repo.path)?, 1);
        Ok(())
    }

    #[test]
    fn test_empty_branch_name_rejected() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);
        let mut console = Console::new(&git_repo, &config, "\n".as_bytes());

        let err = console
            .dispatch(ConsoleCommand::CreateBranch)
            .expect_err("empty name must be rejected");
        assert!(matches!(err, StewardError::EmptyInput { .. }));
        Ok(())
    }

    #[test]
    fn test_switch_to_unknown_branch_fails() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);
        let mut console = Console::new(&git_repo, &config, "nope\n".as_bytes());

        let err = console
            .dispatch(ConsoleCommand::SwitchBranch)
            .expect_err("checkout of unknown branch must fail");
        assert!(err.to_string().starts_with("git checkout failed"));
        Ok(())
    }

    #[test]
    fn test_create_and_push_tag() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let remote = add_bare_remote(&repo)?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);
        let mut console = Console::new(&git_repo, &config, "v1.0\ny\n".as_bytes());

        console.dispatch(ConsoleCommand::CreateTag)?;

        assert!(has_ref(&repo.path, "refs/tags/v1.0"));
        assert!(has_ref(&remote.path, "refs/tags/v1.0"));
        Ok(())
    }

    #[test]
    fn test_create_tag_without_push() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let remote = add_bare_remote(&repo)?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);
        let mut console = Console::new(&git_repo, &config, "v1.0\nn\n".as_bytes());

        console.dispatch(ConsoleCommand::CreateTag)?;

        assert!(has_ref(&repo.path, "refs/tags/v1.0"));
        assert!(!has_ref(&remote.path, "refs/tags/v1.0"));
        Ok(())
    }

    #[test]
    fn test_pull_fetches_remote_commits() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let remote = add_bare_remote(&repo)?;
        git(&repo.path, &["push", "origin", "main"])?;

        // Another clone publishes a commit
        let other = TempDir::new()?;
        let remote_url = remote.path.to_string_lossy().into_owned();
        git(other.path(), &["clone", &remote_url, "work"])?;
        let work = other.path().join("work");
        git(&work, &["config", "user.name", "Other User"])?;
        git(&work, &["config", "user.email", "other@example.com"])?;
        git(&work, &["config", "commit.gpgsign", "false"])?;
        fs::write(work.join("chapter.tex"), "text\n")?;
        git(&work, &["add", "chapter.tex"])?;
        git(&work, &["commit", "-m", "Add chapter"])?;
        git(&work, &["push", "origin", "main"])?;

        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);
        let mut console = Console::new(&git_repo, &config, "".as_bytes());
        console.dispatch(ConsoleCommand::Pull)?;

        assert_eq!(commit_count(&repo.path)?, 2);
        assert_eq!(head_message(&repo.path)?, "Add chapter");
        Ok(())
    }

    #[test]
    fn test_push_without_remote_fails() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);
        let mut console = Console::new(&git_repo, &config, "".as_bytes());

        let err = console
            .dispatch(ConsoleCommand::Push)
            .expect_err("push without origin must fail");
        assert!(matches!(err, StewardError::GitOperation { .. }));
        Ok(())
    }
}

#[cfg(test)]
mod workflow_tests {
    use super::*;

    #[test]
    fn test_workflow_adds_commits_and_pushes() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let remote = add_bare_remote(&repo)?;
        create_file(&repo.path, "docs/intro.tex", "\\section{Intro}\n")?;
        fs::remove_file(repo.path.join("README.md"))?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);

        run_workflow(&git_repo, &config, "Restructure docs")?;

        assert_eq!(head_message(&repo.path)?, "Restructure docs");
        let tracked = files_in_head(&repo.path)?;
        assert_eq!(tracked, vec!["docs/intro.tex".to_string()]);
        assert_eq!(
            rev_parse(&remote.path, "refs/heads/main")?,
            rev_parse(&repo.path, "HEAD")?
        );
        Ok(())
    }

    #[test]
    fn test_workflow_rejects_empty_message() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "notes.txt", "scratch\n")?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);

        let err = run_workflow(&git_repo, &config, "  ").expect_err("empty message");
        assert!(matches!(err, StewardError::EmptyInput { .. }));
        // Nothing was staged
        assert_eq!(git(&repo.path, &["diff", "--cached", "--name-only"])?, "");
        Ok(())
    }

    #[test]
    fn test_workflow_stops_at_commit_when_nothing_changed() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let remote = add_bare_remote(&repo)?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);

        let err = run_workflow(&git_repo, &config, "No-op").expect_err("nothing to commit");
        assert_eq!(workflow_step(&err), Some(WorkflowStep::Commit));
        assert!(err.to_string().starts_with("Workflow aborted at commit step"));
        // Push was never attempted
        assert!(!has_ref(&remote.path, "refs/heads/main"));
        Ok(())
    }

    #[test]
    fn test_workflow_push_failure_keeps_commit() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "notes.txt", "scratch\n")?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);

        let err = run_workflow(&git_repo, &config, "Add notes").expect_err("no origin");
        assert_eq!(workflow_step(&err), Some(WorkflowStep::Push));
        assert_eq!(commit_count(&repo.path)?, 2);
        assert_eq!(head_message(&repo.path)?, "Add notes");
        Ok(())
    }

    #[test]
    fn test_workflow_stops_at_add_when_index_locked() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let remote = add_bare_remote(&repo)?;
        create_file(&repo.path, "notes.txt", "scratch\n")?;
        fs::write(repo.path.join(".git").join("index.lock"), "")?;
        let git_repo = GitRepo::open(&repo.path)?;
        let config = Config::for_repo(&repo.path);

        let err = run_workflow(&git_repo, &config, "Add notes").expect_err("index locked");
        assert_eq!(workflow_step(&err), Some(WorkflowStep::Add));

        fs::remove_file(repo.path.join(".git").join("index.lock"))?;
        assert_eq!(commit_count(&repo.path)?, 1);
        assert!(!has_ref(&remote.path, "refs/heads/main"));
        Ok(())
    }
}

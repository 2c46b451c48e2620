//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use vsh::effect::Effect;
use vsh::result::{ErrorKind, ExecOutcome};
use vsh::Shell;

fn shell() -> Shell {
    Shell::new()
}

fn root_shell() -> Shell {
    let mut shell = Shell::new();
    shell.push_session("root");
    shell
}

/// Executes one submission, applying directory-change effects the way the
/// interactive host does.
fn run(shell: &mut Shell, input: &str) -> ExecOutcome {
    let outcome = shell.execute(input);
    for effect in &outcome.effects {
        if let Effect::ChangeDirectory { path } = effect {
            shell.set_cwd(path).unwrap();
        }
    }
    outcome
}

fn run_ok(shell: &mut Shell, input: &str) -> String {
    let outcome = run(shell, input);
    assert!(
        outcome.success,
        "expected success for {input:?}, got {:?}",
        outcome.error
    );
    outcome.output
}

mod pipelines {
    use super::*;

    #[test]
    fn echo_through_tr_uppercases() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "echo hello | tr a-z A-Z"), "HELLO");
    }

    #[test]
    fn pipe_is_equivalent_to_redirect_then_inject() {
        let mut shell = shell();
        let piped = run_ok(&mut shell, "echo abc def | wc -w");
        run_ok(&mut shell, "echo abc def > /tmp/t");
        let via_file = run_ok(&mut shell, "cat /tmp/t | wc -w");
        assert_eq!(piped, via_file);
    }

    #[test]
    fn failing_segment_stops_the_pipeline() {
        let mut shell = shell();
        let outcome = run(&mut shell, "cat /nope | wc -l");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::NotFound));
    }

    #[test]
    fn multiple_pipelines_accumulate_output() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "echo a; echo b"), "a\nb");
    }
}

mod conditionals {
    use super::*;

    #[test]
    fn false_skips_and_chain_until_semicolon() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "false && echo skipped; echo ran"), "ran");
        assert_eq!(
            run_ok(&mut shell, "false && echo a && echo b; echo c"),
            "c"
        );
    }

    #[test]
    fn or_runs_only_after_failure() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "false || echo rescued"), "rescued");
        assert_eq!(run_ok(&mut shell, "true || echo skipped; echo end"), "end");
    }

    #[test]
    fn and_runs_after_success() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "true && echo yes"), "yes");
    }
}

mod redirection {
    use super::*;

    #[test]
    fn overwrite_append_then_cat() {
        let mut shell = shell();
        run_ok(&mut shell, "echo one > f");
        run_ok(&mut shell, "echo two >> f");
        assert_eq!(run_ok(&mut shell, "cat f"), "one\ntwo");
    }

    #[test]
    fn redirected_pipeline_returns_no_output() {
        let mut shell = shell();
        let outcome = run(&mut shell, "echo data > out");
        assert!(outcome.success);
        assert_eq!(outcome.output, "");
        assert_eq!(run_ok(&mut shell, "cat out"), "data");
    }

    #[test]
    fn redirection_into_unwritable_file_fails() {
        let mut shell = root_shell();
        run_ok(&mut shell, "touch /tmp/locked");
        run_ok(&mut shell, "chmod 000 /tmp/locked");
        shell.pop_session();
        let outcome = run(&mut shell, "echo x > /tmp/locked");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::PermissionDenied));
    }
}

mod filesystem {
    use super::*;

    #[test]
    fn mkdir_p_builds_the_hierarchy() {
        let mut shell = root_shell();
        run_ok(&mut shell, "mkdir -p /x/y/z");
        assert!(shell.vfs.get_node("/x/y/z").unwrap().is_directory());
        assert!(shell.vfs.get_node("/x/y").unwrap().is_directory());
        assert!(shell.vfs.get_node("/x/y/z/none").is_none());
    }

    #[test]
    fn recursive_rm_without_permission_leaves_tree_intact() {
        let mut root = root_shell();
        run_ok(&mut root, "mkdir -p /a/b");
        run_ok(&mut root, "echo secret > /a/b/f");
        run_ok(&mut root, "chmod 755 /a");
        root.pop_session();
        // as the plain user: no write permission anywhere under /a
        let outcome = run(&mut root, "rm -rf /a");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::PermissionDenied));
        assert!(root.vfs.get_node("/a/b/f").is_some());
    }

    #[test]
    fn rm_directory_asks_for_confirmation_first() {
        let mut shell = shell();
        run_ok(&mut shell, "mkdir docs");
        run_ok(&mut shell, "touch docs/f");
        let outcome = run(&mut shell, "rm -r docs");
        assert!(outcome.success);
        let confirm = outcome
            .effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Confirm {
                    on_confirm_command, ..
                } => Some(on_confirm_command.clone()),
                _ => None,
            })
            .expect("rm -r on a directory must ask first");
        assert!(shell.vfs.get_node("/home/user/docs").is_some());
        // the confirmation command carries the marker and really deletes
        run_ok(&mut shell, &confirm);
        assert!(shell.vfs.get_node("/home/user/docs").is_none());
    }

    #[test]
    fn cp_and_mv_between_directories() {
        let mut shell = shell();
        run_ok(&mut shell, "echo payload > a.txt");
        run_ok(&mut shell, "mkdir sub");
        run_ok(&mut shell, "cp a.txt sub");
        assert_eq!(run_ok(&mut shell, "cat sub/a.txt"), "payload");
        run_ok(&mut shell, "mv a.txt renamed.txt");
        assert!(shell.vfs.get_node("/home/user/a.txt").is_none());
        assert_eq!(run_ok(&mut shell, "cat renamed.txt"), "payload");
    }

    #[test]
    fn ls_sorts_and_hides_dotfiles() {
        let mut shell = shell();
        run_ok(&mut shell, "touch b.txt a.txt .hidden");
        assert_eq!(run_ok(&mut shell, "ls"), "a.txt\nb.txt");
        assert_eq!(run_ok(&mut shell, "ls -a"), ".hidden\na.txt\nb.txt");
    }

    #[test]
    fn du_and_find_walk_the_tree() {
        let mut shell = shell();
        run_ok(&mut shell, "mkdir -p proj/src");
        run_ok(&mut shell, "echo fn main > proj/src/main.rs");
        run_ok(&mut shell, "echo notes > proj/README");
        let found = run_ok(&mut shell, "find proj -name *.rs");
        assert_eq!(found, "/home/user/proj/src/main.rs");
        let by_type = run_ok(&mut shell, "find proj -type d");
        assert_eq!(by_type, "/home/user/proj\n/home/user/proj/src");
        let du = run_ok(&mut shell, "du -s proj");
        assert!(du.starts_with(&shell.vfs.calculate_node_size("/home/user/proj").to_string()));
    }
}

mod parsing {
    use super::*;

    #[test]
    fn empty_input_is_a_successful_no_op() {
        let mut shell = shell();
        let outcome = run(&mut shell, "");
        assert!(outcome.success);
        assert_eq!(outcome.output, "");
        assert!(outcome.effects.is_empty());
        let outcome = run(&mut shell, "   ");
        assert!(outcome.success);
    }

    #[test]
    fn unterminated_quote_is_a_syntax_error() {
        let mut shell = shell();
        let outcome = run(&mut shell, "echo 'oops");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::SyntaxError));
    }

    #[test]
    fn quoting_groups_arguments() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "echo 'a  b'  c"), "a  b c");
        assert_eq!(run_ok(&mut shell, "echo \"x | y\""), "x | y");
    }

    #[test]
    fn variable_expansion_uses_the_active_scope() {
        let mut shell = shell();
        run_ok(&mut shell, "set GREETING=hello");
        assert_eq!(run_ok(&mut shell, "echo $GREETING world"), "hello world");
        assert_eq!(run_ok(&mut shell, "echo '$GREETING'"), "$GREETING");
        // unset variables expand to nothing
        assert_eq!(run_ok(&mut shell, "echo [$MISSING]"), "[]");
    }

    #[test]
    fn command_substitution_splices_stdout() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "echo $(echo inner)!"), "inner!");
        assert_eq!(run_ok(&mut shell, "echo $(echo a | tr a-z A-Z)"), "A");
    }

    #[test]
    fn unknown_command_reports_with_suggestion() {
        let mut shell = shell();
        let outcome = run(&mut shell, "lls");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::CommandNotFound));
        let error = outcome.error.unwrap();
        assert!(error.suggestion.unwrap().contains("ls"));
    }
}

mod flags {
    use super::*;

    #[test]
    fn bundled_short_flags_split_into_booleans() {
        let mut shell = shell();
        run_ok(&mut shell, "touch .dot plain");
        let long_all = run_ok(&mut shell, "ls -la");
        assert!(long_all.contains(".dot"));
        assert!(long_all.lines().all(|l| l.starts_with('-') || l.starts_with('d')));
    }

    #[test]
    fn value_flag_without_argument_fails() {
        let mut shell = shell();
        run_ok(&mut shell, "touch f");
        let outcome = run(&mut shell, "head -n");
        assert!(!outcome.success);
        assert_eq!(
            outcome.error_kind(),
            Some(ErrorKind::FlagRequiresArgument)
        );
    }

    #[test]
    fn unrecognized_flags_become_arguments() {
        let mut shell = shell();
        // echo has no -x flag, so it is printed verbatim
        assert_eq!(run_ok(&mut shell, "echo -x y"), "-x y");
    }
}

mod aliases {
    use super::*;

    #[test]
    fn alias_expands_at_segment_head_only() {
        let mut shell = shell();
        run_ok(&mut shell, "alias greet='echo hi'");
        assert_eq!(run_ok(&mut shell, "greet there"), "hi there");
        assert_eq!(run_ok(&mut shell, "echo greet"), "greet");
    }

    #[test]
    fn self_referential_alias_terminates() {
        let mut shell = shell();
        run_ok(&mut shell, "alias x='x y'");
        let outcome = run(&mut shell, "x");
        // 'x y' resolves once; 'x' is not a real command, so this fails
        // without looping forever
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::CommandNotFound));
    }

    #[test]
    fn unalias_removes_the_definition() {
        let mut shell = shell();
        run_ok(&mut shell, "alias ll='ls -l'");
        run_ok(&mut shell, "unalias ll");
        let outcome = run(&mut shell, "ll");
        assert_eq!(outcome.error_kind(), Some(ErrorKind::CommandNotFound));
    }
}

mod sessions {
    use super::*;

    #[test]
    fn whoami_tracks_the_session_stack() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "whoami"), "user");
        shell.push_session("root");
        assert_eq!(run_ok(&mut shell, "whoami"), "root");
        shell.pop_session();
        assert_eq!(run_ok(&mut shell, "whoami"), "user");
    }

    #[test]
    fn sudo_returns_an_elevation_effect() {
        let mut shell = shell();
        let outcome = run(&mut shell, "sudo cat /etc/sudoers");
        assert!(outcome.success);
        match &outcome.effects[..] {
            [Effect::Su { username, command }] => {
                assert_eq!(username, "root");
                assert_eq!(command.as_deref(), Some("cat /etc/sudoers"));
            }
            other => panic!("expected one Su effect, got {other:?}"),
        }
    }

    #[test]
    fn root_only_commands_refuse_plain_users() {
        let mut shell = shell();
        let outcome = run(&mut shell, "useradd alice");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::PermissionDenied));
    }

    #[test]
    fn password_round_trip_through_the_manager() {
        let mut shell = shell();
        shell.users.register("alice", Some("pw"), "alice").unwrap();
        assert!(shell.users.verify_password("alice", "pw"));
        assert!(!shell.users.verify_password("alice", "PW"));
        shell.users.change_password("alice", Some("pw2")).unwrap();
        assert!(!shell.users.verify_password("alice", "pw"));
        assert!(shell.users.verify_password("alice", "pw2"));
    }

    #[test]
    fn cd_effect_updates_the_working_directory() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "pwd"), "/home/user");
        run_ok(&mut shell, "cd /tmp");
        assert_eq!(run_ok(&mut shell, "pwd"), "/tmp");
        let outcome = run(&mut shell, "cd /etc/motd");
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::WrongType));
    }

    #[test]
    fn history_suppresses_immediate_duplicates() {
        let mut shell = shell();
        run_ok(&mut shell, "pwd");
        run_ok(&mut shell, "pwd");
        run_ok(&mut shell, "whoami");
        let history: Vec<&str> = shell.history.get_all().collect();
        assert_eq!(history, vec!["pwd", "whoami"]);
    }

    #[test]
    fn history_command_lists_numbered_entries() {
        let mut shell = shell();
        run_ok(&mut shell, "pwd");
        let listing = run_ok(&mut shell, "history");
        assert!(listing.contains("1  pwd"));
        run_ok(&mut shell, "history -c");
        assert!(shell.history.is_empty());
    }
}

mod jobs {
    use super::*;
    use vsh::JobSignal;
    use vsh::session::JobStatus;

    #[test]
    fn kill_emits_a_signal_effect_and_the_table_applies_it() {
        let mut shell = shell();
        let id = shell.jobs.add("sleep 100");
        let outcome = run(&mut shell, &format!("kill -STOP {id}"));
        assert!(outcome.success);
        match &outcome.effects[..] {
            [Effect::SignalJob { job_id, signal }] => {
                assert_eq!(*job_id, id);
                assert_eq!(*signal, JobSignal::Stop);
            }
            other => panic!("expected one SignalJob effect, got {other:?}"),
        }
        // the host delivers the signal
        shell.jobs.signal(id, JobSignal::Stop).unwrap();
        assert_eq!(shell.jobs.get(id).unwrap().status, JobStatus::Paused);
        shell.jobs.signal(id, JobSignal::Cont).unwrap();
        assert_eq!(shell.jobs.get(id).unwrap().status, JobStatus::Running);
        shell.jobs.signal(id, JobSignal::Term).unwrap();
        assert_eq!(shell.jobs.get(id).unwrap().status, JobStatus::Done);
    }

    #[test]
    fn kill_unknown_job_fails() {
        let mut shell = shell();
        let outcome = run(&mut shell, "kill 42");
        assert!(!outcome.success);
    }

    #[test]
    fn jobs_lists_the_table() {
        let mut shell = shell();
        shell.jobs.add("du /");
        let listing = run_ok(&mut shell, "jobs");
        assert!(listing.contains("[1]"));
        assert!(listing.contains("du /"));
    }
}

mod effects {
    use super::*;

    #[test]
    fn clear_and_sleep_emit_host_directives() {
        let mut shell = shell();
        let outcome = run(&mut shell, "clear");
        assert_eq!(outcome.effects, vec![Effect::ClearScreen]);
        let outcome = run(&mut shell, "sleep 2");
        assert_eq!(
            outcome.effects,
            vec![Effect::Delay { milliseconds: 2000 }]
        );
    }

    #[test]
    fn effects_from_intermediate_segments_propagate() {
        let mut shell = shell();
        let outcome = run(&mut shell, "clear | echo done");
        assert!(outcome.success);
        assert_eq!(outcome.output, "done");
        assert!(outcome.effects.contains(&Effect::ClearScreen));
    }

    #[test]
    fn run_emits_a_script_effect() {
        let mut shell = shell();
        run_ok(&mut shell, "echo whoami > job.vsh");
        run_ok(&mut shell, "chmod u+x job.vsh");
        let outcome = run(&mut shell, "run job.vsh one two");
        assert!(outcome.success);
        match &outcome.effects[..] {
            [Effect::ExecuteScript { lines, args }] => {
                assert_eq!(lines, &vec!["whoami".to_string()]);
                assert_eq!(args, &vec!["one".to_string(), "two".to_string()]);
            }
            other => panic!("expected one ExecuteScript effect, got {other:?}"),
        }
    }
}

mod text_tools {
    use super::*;

    #[test]
    fn grep_matches_and_counts() {
        let mut shell = shell();
        run_ok(&mut shell, "printf 'alpha\\nbeta\\nalpine\\n' > words");
        assert_eq!(run_ok(&mut shell, "grep alp words"), "alpha\nalpine");
        assert_eq!(run_ok(&mut shell, "grep -c alp words"), "2");
        assert_eq!(run_ok(&mut shell, "grep -n beta words"), "2:beta");
        let outcome = run(&mut shell, "grep zeta words");
        assert!(!outcome.success);
        assert_eq!(outcome.error.unwrap().message, "");
    }

    #[test]
    fn sort_uniq_head_tail_compose() {
        let mut shell = shell();
        run_ok(&mut shell, "printf 'b\\na\\nb\\nc\\n' > data");
        assert_eq!(run_ok(&mut shell, "sort data"), "a\nb\nb\nc");
        assert_eq!(run_ok(&mut shell, "sort -u data"), "a\nb\nc");
        assert_eq!(run_ok(&mut shell, "sort data | uniq -d"), "b");
        assert_eq!(run_ok(&mut shell, "sort data | head -n 2"), "a\nb");
        assert_eq!(run_ok(&mut shell, "sort data | tail -n 1"), "c");
    }

    #[test]
    fn wc_counts_lines_words_bytes() {
        let mut shell = shell();
        assert_eq!(run_ok(&mut shell, "echo one two | wc -w"), "      2");
        assert_eq!(run_ok(&mut shell, "echo one two | wc -l"), "      1");
    }

    #[test]
    fn diff_reports_changed_lines() {
        let mut shell = shell();
        run_ok(&mut shell, "printf 'a\\nx\\nc\\n' > left");
        run_ok(&mut shell, "printf 'a\\ny\\nc\\n' > right");
        assert_eq!(run_ok(&mut shell, "diff left right"), "< x\n> y");
        run_ok(&mut shell, "cp left same");
        assert_eq!(run_ok(&mut shell, "diff left same"), "");
    }
}

mod idempotence {
    use super::*;

    #[test]
    fn reading_commands_leave_state_untouched() {
        let mut shell = shell();
        run_ok(&mut shell, "echo seed > f");
        let before = shell.vfs.save_state();
        run_ok(&mut shell, "cat f | wc -c");
        run_ok(&mut shell, "ls /");
        run_ok(&mut shell, "find / -name f");
        let after = shell.vfs.save_state();
        assert_eq!(before, after);
    }
}

//! Command classification and removal-impact assessment.
//!
//! The advisor never runs the command it is given. It only decides which
//! kind of warning applies and, for recursive removals, scans each target.

#![allow(missing_docs)]

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::core::config::RuleConfig;
use crate::core::errors::{AdvisorError, Result};
use crate::scanner::{ScanResult, TreeScanner};

pub const POWER_WARNING: &str =
    "Warning: All running applications will be closed, and unsaved work may be lost.";
pub const REMOVE_WARNING: &str = "Warning: This operation is irreversible. All contents in the specified folder would be permanently deleted.";
pub const UNRECOGNIZED_NOTICE: &str = "Command not recognized or not supported for analysis.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Reboot,
    Shutdown,
    Poweroff,
    Halt,
}

impl PowerAction {
    fn from_program(program: &str) -> Option<Self> {
        match program {
            "reboot" => Some(Self::Reboot),
            "shutdown" => Some(Self::Shutdown),
            "poweroff" => Some(Self::Poweroff),
            "halt" => Some(Self::Halt),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reboot => "reboot",
            Self::Shutdown => "shutdown",
            Self::Poweroff => "poweroff",
            Self::Halt => "halt",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub name: String,
    pub pattern: Regex,
    pub warning: String,
}

impl CompiledRule {
    pub fn compile(rule: &RuleConfig) -> Result<Self> {
        Ok(Self {
            name: rule.name.clone(),
            pattern: Regex::new(&rule.pattern)?,
            warning: rule.warning.clone(),
        })
    }

    pub fn compile_all(rules: &[RuleConfig]) -> Result<Vec<Self>> {
        rules.iter().map(Self::compile).collect()
    }
}

/// Which warning applies to a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    Power { action: PowerAction },
    RecursiveRemove { targets: Vec<PathBuf>, force: bool },
    CustomRule { name: String, warning: String },
    Unrecognized,
}

impl Advisory {
    /// Classify `argv` (the dangerous command, program first).
    ///
    /// A leading `sudo` is looked through. Rules are consulted only when the
    /// command is not one of the built-in kinds, first match wins.
    pub fn classify(argv: &[String], rules: &[CompiledRule]) -> Result<Self> {
        let args = strip_sudo(argv);
        let Some((program, rest)) = args.split_first() else {
            return Err(AdvisorError::MissingCommand);
        };
        let program_name = Path::new(program)
            .file_name()
            .map_or_else(|| program.clone(), |name| name.to_string_lossy().into_owned());

        if let Some(action) = PowerAction::from_program(&program_name) {
            return Ok(Self::Power { action });
        }

        if program_name == "rm" {
            let flags = parse_rm(rest);
            if flags.recursive {
                if flags.targets.is_empty() {
                    return Err(AdvisorError::MissingArgument {
                        command: program.clone(),
                        argument: "<path>",
                    });
                }
                return Ok(Self::RecursiveRemove {
                    targets: flags.targets,
                    force: flags.force,
                });
            }
        }

        let command_line = argv.join(" ");
        if let Some(rule) = rules.iter().find(|rule| rule.pattern.is_match(&command_line)) {
            debug!(rule = %rule.name, "custom rule matched");
            return Ok(Self::CustomRule {
                name: rule.name.clone(),
                warning: rule.warning.clone(),
            });
        }

        Ok(Self::Unrecognized)
    }

    /// Stable snake_case label used in JSON output and the journal.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Power { .. } => "power",
            Self::RecursiveRemove { .. } => "recursive_remove",
            Self::CustomRule { .. } => "custom_rule",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// The warning line shown for this advisory.
    #[must_use]
    pub fn warning(&self) -> &str {
        match self {
            Self::Power { .. } => POWER_WARNING,
            Self::RecursiveRemove { .. } => REMOVE_WARNING,
            Self::CustomRule { warning, .. } => warning,
            Self::Unrecognized => UNRECOGNIZED_NOTICE,
        }
    }
}

/// Impact of removing one target: its scan, or why it could not be analyzed.
#[derive(Debug)]
pub struct TargetImpact {
    pub path: PathBuf,
    pub outcome: Result<ScanResult>,
}

/// Everything needed to render one advisory.
#[derive(Debug)]
pub struct Assessment {
    pub command_line: String,
    pub advisory: Advisory,
    pub targets: Vec<TargetImpact>,
}

impl Assessment {
    /// Classify `argv` and scan every removal target.
    ///
    /// Scan failures are kept per target; only classification errors are returned.
    pub fn evaluate(argv: &[String], rules: &[CompiledRule], scanner: &TreeScanner) -> Result<Self> {
        let advisory = Advisory::classify(argv, rules)?;
        let targets = match &advisory {
            Advisory::RecursiveRemove { targets, .. } => targets
                .iter()
                .map(|path| TargetImpact {
                    path: path.clone(),
                    outcome: scanner.scan(path),
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(Self {
            command_line: argv.join(" "),
            advisory,
            targets,
        })
    }
}

fn strip_sudo(argv: &[String]) -> &[String] {
    let mut args = argv;
    while let Some((first, rest)) = args.split_first() {
        if first != "sudo" {
            break;
        }
        args = rest;
    }
    args
}

#[derive(Debug, Default)]
struct RmFlags {
    recursive: bool,
    force: bool,
    targets: Vec<PathBuf>,
}

fn parse_rm(args: &[String]) -> RmFlags {
    let mut flags = RmFlags::default();
    let mut operands_only = false;
    for arg in args {
        if operands_only || arg == "-" || !arg.starts_with('-') {
            flags.targets.push(PathBuf::from(arg));
        } else if arg == "--" {
            operands_only = true;
        } else if let Some(long) = arg.strip_prefix("--") {
            match long {
                "recursive" => flags.recursive = true,
                "force" => flags.force = true,
                _ => {}
            }
        } else {
            flags.recursive |= arg.contains(['r', 'R']);
            flags.force |= arg.contains('f');
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::{Advisory, Assessment, CompiledRule, PowerAction};
    use crate::core::config::RuleConfig;
    use crate::core::errors::AdvisorError;
    use crate::scanner::TreeScanner;
    use std::path::PathBuf;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| (*part).to_string()).collect()
    }

    fn force_push_rule() -> Vec<CompiledRule> {
        CompiledRule::compile_all(&[RuleConfig {
            name: "force-push".to_string(),
            pattern: r"^git\s+push\s+.*--force".to_string(),
            warning: "Remote history will be overwritten.".to_string(),
        }])
        .expect("rule compiles")
    }

    #[test]
    fn power_commands_classify() {
        for (program, action) in [
            ("reboot", PowerAction::Reboot),
            ("shutdown", PowerAction::Shutdown),
            ("/sbin/poweroff", PowerAction::Poweroff),
            ("halt", PowerAction::Halt),
        ] {
            let advisory = Advisory::classify(&argv(&[program, "now"]), &[]).expect("classifies");
            assert_eq!(advisory, Advisory::Power { action });
        }
    }

    #[test]
    fn rm_flag_spellings_are_recursive() {
        for flag_set in [
            &["-rf"][..],
            &["-fr"][..],
            &["-Rf"][..],
            &["-r", "-f"][..],
            &["--recursive", "--force"][..],
        ] {
            let mut parts = vec!["rm"];
            parts.extend_from_slice(flag_set);
            parts.push("build");
            let advisory = Advisory::classify(&argv(&parts), &[]).expect("classifies");
            assert_eq!(
                advisory,
                Advisory::RecursiveRemove {
                    targets: vec![PathBuf::from("build")],
                    force: true,
                },
                "flags {flag_set:?}"
            );
        }
    }

    #[test]
    fn rm_collects_every_target_and_honors_double_dash() {
        let advisory =
            Advisory::classify(&argv(&["sudo", "rm", "-r", "a", "--", "-weird"]), &[]).expect("ok");
        assert_eq!(
            advisory,
            Advisory::RecursiveRemove {
                targets: vec![PathBuf::from("a"), PathBuf::from("-weird")],
                force: false,
            }
        );
    }

    #[test]
    fn rm_without_target_is_a_usage_error() {
        let err = Advisory::classify(&argv(&["rm", "-rf"]), &[]).unwrap_err();
        assert!(matches!(err, AdvisorError::MissingArgument { .. }), "{err}");
        assert!(err.is_usage());
    }

    #[test]
    fn plain_rm_is_not_analyzed() {
        let advisory = Advisory::classify(&argv(&["rm", "notes.txt"]), &[]).expect("ok");
        assert_eq!(advisory, Advisory::Unrecognized);
    }

    #[test]
    fn empty_command_is_a_usage_error() {
        let err = Advisory::classify(&[], &[]).unwrap_err();
        assert!(matches!(err, AdvisorError::MissingCommand));
        let err = Advisory::classify(&argv(&["sudo"]), &[]).unwrap_err();
        assert!(matches!(err, AdvisorError::MissingCommand));
    }

    #[test]
    fn custom_rules_match_the_joined_command_line() {
        let rules = force_push_rule();
        let advisory =
            Advisory::classify(&argv(&["git", "push", "origin", "--force"]), &rules).expect("ok");
        assert_eq!(advisory.kind(), "custom_rule");
        assert_eq!(advisory.warning(), "Remote history will be overwritten.");

        let advisory = Advisory::classify(&argv(&["git", "push"]), &rules).expect("ok");
        assert_eq!(advisory, Advisory::Unrecognized);
    }

    #[test]
    fn builtin_kinds_take_precedence_over_rules() {
        let rules = CompiledRule::compile_all(&[RuleConfig {
            name: "everything".to_string(),
            pattern: ".*".to_string(),
            warning: "catch-all".to_string(),
        }])
        .expect("rule compiles");
        let advisory = Advisory::classify(&argv(&["reboot"]), &rules).expect("ok");
        assert_eq!(advisory.kind(), "power");
    }

    #[test]
    fn assessment_scans_each_target_independently() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("kept.txt"), b"12345").expect("write");
        let present = dir.path().to_string_lossy().into_owned();
        let missing = dir.path().join("absent").to_string_lossy().into_owned();

        let assessment = Assessment::evaluate(
            &argv(&["rm", "-rf", &present, &missing]),
            &[],
            &TreeScanner::default(),
        )
        .expect("evaluates");

        assert_eq!(assessment.targets.len(), 2);
        let first = assessment.targets[0].outcome.as_ref().expect("first scans");
        assert_eq!(first.total_files(), 1);
        assert_eq!(first.total_size(), 5);
        assert!(matches!(
            assessment.targets[1].outcome,
            Err(AdvisorError::PathNotFound { .. })
        ));
    }

    #[test]
    fn non_removal_assessment_has_no_targets() {
        let assessment =
            Assessment::evaluate(&argv(&["shutdown", "-h", "now"]), &[], &TreeScanner::default())
                .expect("evaluates");
        assert!(assessment.targets.is_empty());
        assert_eq!(assessment.command_line, "shutdown -h now");
    }
}

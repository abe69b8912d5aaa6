//! Colored terminal rendering of an [`Assessment`].

use std::io::{self, Write};

use colored::Colorize;

use super::format_bytes;
use crate::advisor::{Advisory, Assessment, TargetImpact};
use crate::scanner::ScanResult;
use crate::scanner::extensions::top_extensions;

/// Write the advisory. Analysis failures go to `err`, everything else to `out`.
pub fn write_assessment(
    assessment: &Assessment,
    top: usize,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    match &assessment.advisory {
        Advisory::Power { action } => {
            writeln!(out, "You are requesting to {} your computer.", action.as_str().bold())?;
            writeln!(out, "{}", assessment.advisory.warning().yellow().bold())?;
        }
        Advisory::RecursiveRemove { .. } => {
            for target in &assessment.targets {
                write_target(target, top, out, err)?;
            }
            writeln!(out, "{}", assessment.advisory.warning().red().bold())?;
        }
        Advisory::CustomRule { name, warning } => {
            writeln!(
                out,
                "You are requesting to run \"{}\" (matched rule {}).",
                assessment.command_line,
                name.cyan()
            )?;
            writeln!(out, "{}", warning.yellow().bold())?;
        }
        Advisory::Unrecognized => {
            writeln!(out, "{}", assessment.advisory.warning())?;
        }
    }
    Ok(())
}

fn write_target(
    target: &TargetImpact,
    top: usize,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    writeln!(
        out,
        "You are requesting to recursively remove the contents of \"{}\".",
        target.path.display()
    )?;
    match &target.outcome {
        Ok(scan) => write_scan(scan, top, out),
        Err(e) => {
            writeln!(err, "{} {e}", "error:".red().bold())?;
            writeln!(
                out,
                "Unable to analyze \"{}\"; the removal would still proceed.",
                target.path.display()
            )
        }
    }
}

fn write_scan(scan: &ScanResult, top: usize, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "This action would delete {} {} and {} {}, freeing {}.",
        scan.total_files().to_string().bold(),
        plural(scan.total_files(), "file", "files"),
        scan.total_directories().to_string().bold(),
        plural(scan.total_directories(), "directory", "directories"),
        format_bytes(scan.total_size()).bold()
    )?;
    if let Some(path) = scan.largest_file_path() {
        writeln!(
            out,
            "  Largest file: {} ({})",
            path.display(),
            format_bytes(scan.largest_file_size())
        )?;
    }

    let ranked = top_extensions(scan.file_types(), top);
    if !ranked.is_empty() {
        writeln!(out, "  File types:")?;
        let width = ranked.iter().map(|(ext, _)| ext.len()).max().unwrap_or(0);
        for (extension, count) in ranked {
            writeln!(out, "    {extension:<width$}  {count:>8}")?;
        }
        let shown = top.min(scan.file_types().len());
        if scan.file_types().len() > shown {
            writeln!(
                out,
                "    ... and {} more",
                scan.file_types().len() - shown
            )?;
        }
    }

    if scan.is_partial() {
        writeln!(
            out,
            "  {} {} unreadable, {} unmeasured; totals are a lower bound.",
            "Note:".yellow(),
            scan.skipped_entries(),
            scan.unmeasured_files()
        )?;
    }
    Ok(())
}

const fn plural(count: u64, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

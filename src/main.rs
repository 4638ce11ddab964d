use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;

use vite_envsubst::cli::{self, Command};
use vite_envsubst::config::AppConfig;
use vite_envsubst::files;
use vite_envsubst::ui::{self, Reporter};
use vite_envsubst::BuildSession;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::parse();
    let reporter = Reporter::new(cli.quiet);

    let root = std::fs::canonicalize(&cli.root)
        .with_context(|| format!("Failed to resolve project root {}", cli.root.display()))?;
    let mut cfg = AppConfig::load(&root)?;
    cli.apply_overrides(&mut cfg);

    let resolve = || -> Result<BuildSession> {
        let session = BuildSession::resolve(cfg.session_options(&root)?);
        if let Some(reason) = session.disabled_reason() {
            reporter.disabled(reason);
        }
        Ok(session)
    };

    match cli.command {
        Command::Config => print!("{}", cfg.to_toml()?),
        Command::Scan { json } => {
            let session = resolve()?;
            if json {
                let out = serde_json::to_string_pretty(session.variables())
                    .context("Failed to serialize variables")?;
                println!("{out}");
            } else {
                for name in session.variables() {
                    println!("{name}");
                }
            }
        }
        Command::Script => {
            if let Some(script) = resolve()?.script() {
                println!("{script}");
            }
        }
        Command::Transform {
            paths,
            write,
            out_dir,
        } => {
            let session = resolve()?;
            transform(&session, &root, &paths, write, out_dir.as_deref(), reporter)?;
        }
        Command::Html { file, write } => {
            let session = resolve()?;
            match files::inject_html_file(&session, &file)? {
                Some(html) if write => {
                    files::write_file(&file, html.as_bytes())?;
                    reporter.done(&format!("injected env script into {}", file.display()));
                }
                Some(html) => print!("{html}"),
                None if write => {}
                None => {
                    let html = std::fs::read_to_string(&file)
                        .with_context(|| format!("Failed to read {}", file.display()))?;
                    print!("{html}");
                }
            }
        }
    }

    Ok(())
}

fn transform(
    session: &BuildSession,
    root: &Path,
    paths: &[PathBuf],
    write: bool,
    out_dir: Option<&Path>,
    reporter: Reporter,
) -> Result<()> {
    let inputs = files::collect_files(paths)?;
    if !write && out_dir.is_none() && inputs.len() > 1 {
        bail!(
            "{} matched; pass {} or {}",
            ui::count(inputs.len(), "file"),
            "--write".yellow(),
            "--out-dir".yellow()
        );
    }

    let mut rewritten = 0;
    let mut references = 0;
    for path in &inputs {
        let result = files::transform_file(session, path)?;
        if let Some(rewrite) = &result {
            rewritten += 1;
            references += rewrite.edits.len();
        }

        match (out_dir, result) {
            (Some(dir), Some(rewrite)) => {
                let target = files::output_path(root, dir, path)?;
                files::write_file(&target, rewrite.code.as_bytes())?;
            }
            (Some(dir), None) => {
                let target = files::output_path(root, dir, path)?;
                let bytes = std::fs::read(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                files::write_file(&target, &bytes)?;
            }
            (None, Some(rewrite)) if write => files::write_file(path, rewrite.code.as_bytes())?,
            (None, None) if write => {}
            (None, Some(rewrite)) => print!("{}", rewrite.code),
            (None, None) => {
                let code = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                print!("{code}");
            }
        }
    }

    if session.is_active() && (write || out_dir.is_some()) {
        reporter.done(&format!(
            "rewrote {} in {} of {}",
            ui::count(references, "reference"),
            rewritten,
            ui::count(inputs.len(), "file")
        ));
    }
    Ok(())
}

use std::process::ExitCode;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod output;

use cli::{Cli, GlobalOptions};

/// Module targets enabled by each `--trace` class.
fn trace_targets(class: &str) -> Option<&'static [&'static str]> {
    let targets: &'static [&'static str] = match &class.to_ascii_uppercase()[..] {
        "BASE" => &["ddcci::delay", "ddcci::retry", "ddcci::thread_data", "ddcci::stats"],
        "I2C" => &["ddcci::i2c", "ddcci::transport"],
        "DDC" => &["ddcci::packet", "ddcci::commands", "ddcci::multi_part", "ddcci::retry"],
        "VCP" => &["ddcci::vcp", "ddcci::features", "ddcci::caps", "ddcci::dumpload"],
        "TOP" => &["ddcci::app"],
        "ENV" => &["ddcci::registry", "ddcci::enumerate", "ddcci::edid"],
        "USB" => &["ddcci::sim"],
        "ALL" => &["ddcci"],
        _ => return None,
    };
    Some(targets)
}

fn filter_directives(options: &GlobalOptions) -> Vec<String> {
    let mut directives = vec![if options.verbose { "info" } else { "warn" }.to_string()];

    if options.ddc {
        directives.push("ddcci::retry=debug".into());
    }
    for class in &options.trace {
        match trace_targets(class) {
            Some(targets) => directives.extend(targets.iter().map(|t| format!("{}=trace", t))),
            None => eprintln!("Unrecognized trace class: {}", class),
        }
    }
    for name in &options.trcfunc {
        directives.push(format!("[{}]=trace", name));
    }
    for file in &options.trcfile {
        let stem = std::path::Path::new(file).file_stem().and_then(|s| s.to_str()).unwrap_or(file);
        directives.push(format!("ddcci::{}=trace", stem));
    }

    directives
}

fn init_logging(options: &GlobalOptions) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => {
            let directives = filter_directives(options).join(",");
            EnvFilter::try_new(&directives).unwrap_or_else(|e| {
                eprintln!("Invalid trace options {:?}: {}", directives, e);
                EnvFilter::new("warn")
            })
        },
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if options.timestamp {
        builder.with_timer(tracing_subscriber::fmt::time::uptime()).init();
    } else {
        builder.without_time().init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.options);
    debug!(command = ?cli.command, "starting");

    let mut app = match app::App::new(&cli) {
        Ok(app) => app,
        Err(e) => {
            output::report_error(&e, None, false);
            return ExitCode::FAILURE
        },
    };

    let result = app.run(&cli.command);
    app.report_stats();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::report_error(&e, app.current_display(), cli.options.verbose);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_options_become_directives() {
        let options = GlobalOptions {
            verbose: true,
            ddc: true,
            trace: vec!["ddc".into(), "bogus".into()],
            trcfunc: vec!["get_vcp_reply".into()],
            trcfile: vec!["src/multi_part.rs".into()],
            ..Default::default()
        };
        let directives = filter_directives(&options);
        assert_eq!(directives[0], "info");
        assert!(directives.contains(&"ddcci::retry=debug".to_string()));
        assert!(directives.contains(&"ddcci::packet=trace".to_string()));
        assert!(directives.contains(&"[get_vcp_reply]=trace".to_string()));
        assert!(directives.contains(&"ddcci::multi_part=trace".to_string()));
        assert!(EnvFilter::try_new(directives.join(",")).is_ok());
    }

    #[test]
    fn unknown_trace_class() {
        assert!(trace_targets("nope").is_none());
        assert_eq!(trace_targets("all"), Some(&["ddcci"][..]));
    }
}

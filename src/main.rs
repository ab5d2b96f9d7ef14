use clap::Parser;
use flagtag::application::{list_tags, EvaluateTagService};
use flagtag::cli::{format_outcome, format_tag_list, format_warning_report, Cli, Commands};
use flagtag::domain::tags::TagContext;
use flagtag::domain::{Clock, FlagHolder, SystemClock, WarningRegistry};
use flagtag::error::FlagTagError;
use flagtag::infrastructure::{load_fixture, logging, Settings};
use std::sync::Arc;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), FlagTagError> {
    match cli.command {
        Commands::Eval {
            tags,
            flags,
            config,
            script,
            warnings,
        } => {
            let settings = Settings::resolve(config.as_deref())?;
            let clock: Arc<dyn Clock> = Arc::new(SystemClock);
            let registry = Arc::new(WarningRegistry::new(settings.warnings, clock.clone()));

            // Without a fixture, evaluate against an object with no flags
            let holder = match flags {
                Some(path) => load_fixture(&path, clock.clone())?,
                None => FlagHolder::new("fixture", clock.clone()),
            };

            let mut context = TagContext::new(registry.clone(), clock);
            if let Some(script) = script {
                context = context.with_script(script);
            }
            let service = EvaluateTagService::new(context);

            for tag in &tags {
                let outcome = service.execute(&holder, tag)?;
                println!("{}", format_outcome(&outcome));
                for diagnostic in &outcome.diagnostics {
                    eprintln!("Error: {}", diagnostic);
                }
            }

            if warnings {
                eprint!("{}", format_warning_report(&registry.report()));
            }
            Ok(())
        }
        Commands::Tags => {
            print!("{}", format_tag_list(&list_tags::<FlagHolder>()));
            Ok(())
        }
    }
}

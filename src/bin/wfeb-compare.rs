use std::env;
use std::process::ExitCode;

use wfeb::cli::{self, CompareArgs};
use wfeb::compare::compare_documents;
use wfeb::{logging, ui};

fn main() -> ExitCode {
    let args = match cli::parse_from::<CompareArgs, _, _>(env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    logging::init(args.verbosity.verbose, args.verbosity.quiet);

    let rendered = compare_documents(&args.first, &args.second).and_then(|report| {
        if args.json {
            ui::render_report_json(&report)
        } else {
            ui::render_report(&report);
            Ok(())
        }
    });

    match rendered {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            ui::render_error(&error);
            ExitCode::from(1)
        }
    }
}

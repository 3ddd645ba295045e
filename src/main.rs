use std::env;
use std::process::ExitCode;

use wfeb::cli::{self, UnlockArgs};
use wfeb::document::unlock_document;
use wfeb::{logging, ui};

fn main() -> ExitCode {
    let args = match cli::parse_from::<UnlockArgs, _, _>(env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    logging::init(args.verbosity.verbose, args.verbosity.quiet);

    match unlock_document(&args.document, &args.options(), |event| {
        ui::render_unlock_event(&event)
    }) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            ui::render_error(&error);
            ExitCode::from(1)
        }
    }
}

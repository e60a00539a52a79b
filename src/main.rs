use clap::{App, AppSettings};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = App::new("scroogecoin")
        .about("ScroogeCoin toy-ledger CLI tools.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(scroogecoin_lib::commands::demo_command())
        .get_matches();

    if let Some(ref matches) = matches.subcommand_matches("demo") {
        scroogecoin_lib::commands::run_demo_command(&matches)
    } else {
        panic!("Should report help.");
    }
}

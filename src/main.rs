use clap::{App, Arg};
use std::path::Path;
use std::process::exit;
use stele::build::build_site;
use stele::config::Config;

fn main() {
    let matches = App::new("stele")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds the site from a project directory")
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .help("The project directory (or any directory beneath it)")
                .takes_value(true)
                .default_value("."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .help("The directory into which the site is written")
                .takes_value(true)
                .required(true),
        )
        .get_matches();

    // both args always have values: one is required, one has a default
    let project = Path::new(matches.value_of("project").unwrap());
    let output = Path::new(matches.value_of("output").unwrap());

    let config = match Config::from_directory(project) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    if let Err(e) = build_site(&config, output) {
        eprintln!("{}", e);
        exit(1);
    }
}

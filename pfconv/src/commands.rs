use crate::CLAP_STYLING;
use clap::{arg, command};
use pfconv_core::LookupPolicy;
use pfconv_esi::{DEFAULT_DATASOURCE, DEFAULT_ESI_URL};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("pfconv")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pfconv")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner, progress and summary output").required(false))
        .arg(arg!(-v --"verbose" "Log every ESI lookup").required(false))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("init")
                .about("Creates the directory dotlan SVGs are read from")
                .arg(
                    arg!([DIR])
                        .required(false)
                        .help("Location of the SVG directory")
                        .default_value("SVG"),
                ),
        )
        .subcommand(
            command!("convert")
                .about(
                    "Converts a dotlan region SVG into a Pathfinder map import, resolving \
                systems and stargates through ESI.",
                )
                .arg(
                    arg!(-s --"svg" <NAME>)
                        .required(false)
                        .help("Name of the SVG file, without the .svg extension (prompted if missing)"),
                )
                .arg(
                    arg!(-r --"region" <NAME>)
                        .required(false)
                        .help("Name of the region; also names the output file (prompted if missing)"),
                )
                .arg(
                    arg!(--"svg-dir" <DIR>)
                        .required(false)
                        .help("Directory the SVG is read from")
                        .default_value("SVG"),
                )
                .arg(
                    arg!(-o --"output-dir" <DIR>)
                        .required(false)
                        .help("Directory <region>.json is written to")
                        .default_value("."),
                )
                .arg(
                    arg!(--"esi-url" <URL>)
                        .required(false)
                        .help("Base URL of the ESI service")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_ESI_URL),
                )
                .arg(
                    arg!(--"datasource" <NAME>)
                        .required(false)
                        .help("ESI datasource")
                        .default_value(DEFAULT_DATASOURCE),
                )
                .arg(
                    arg!(--"on-lookup-failure" <POLICY>)
                        .required(false)
                        .help("What to do when ESI has no answer: skip, abort or retry-<n>")
                        .value_parser(clap::value_parser!(LookupPolicy))
                        .default_value("skip"),
                )
                .arg(
                    arg!(--"append")
                        .required(false)
                        .help("Append to an existing output file instead of overwriting it")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

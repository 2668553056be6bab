use crate::CLAP_STYLING;
use clap::{Arg, ArgGroup, arg, command};
use phishscan_scanner::registration::DEFAULT_RDAP_ENDPOINT;
use phishscan_scanner::search::DEFAULT_SEARCH_ENDPOINT;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("phishscan")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("phishscan")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(true)
        .subcommand(
            command!("analyze")
                .about(
                    "Extract the 30 heuristic features of one or more URLs and classify them \
                with a trained model.",
                )
                .args(target_args())
                .arg(
                    arg!(-m --"model" <PATH>)
                        .required(true)
                        .help("Path to a JSON model file ({\"weights\": [...30], \"bias\": b})"),
                )
                .args(resolver_args())
                .group(target_group()),
        )
        .subcommand(
            command!("features")
                .about("Resolve one or more URLs and print their feature vectors. No model needed.")
                .args(target_args())
                .args(resolver_args())
                .group(target_group()),
        )
}

fn target_group() -> ArgGroup {
    ArgGroup::new("target")
        .args(["url", "hosts-file"])
        .required(true)
}

fn target_args() -> Vec<Arg> {
    vec![
        arg!(-u --"url" <URL>)
            .required(false)
            .help("The URL to analyze")
            .conflicts_with("hosts-file"),
        arg!(-H --"hosts-file" <PATH>)
            .required(false)
            .help("Path to a newline-delimited file of URLs to analyze")
            .value_parser(clap::value_parser!(std::path::PathBuf))
            .conflicts_with("url"),
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Output format: text, json")
            .value_parser(["text", "json"])
            .default_value("text"),
    ]
}

fn resolver_args() -> Vec<Arg> {
    vec![
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Page fetch timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("5"),
        arg!(--"registration-timeout" <SECONDS>)
            .required(false)
            .help("Registration (RDAP) lookup timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("10"),
        arg!(--"rdap-endpoint" <URL>)
            .required(false)
            .help("Base URL of the RDAP service used for registration lookups")
            .default_value(DEFAULT_RDAP_ENDPOINT),
        arg!(--"search-endpoint" <URL>)
            .required(false)
            .help("Search engine endpoint used for the index-presence check")
            .default_value(DEFAULT_SEARCH_ENDPOINT),
        arg!(--"no-search")
            .required(false)
            .help("Skip the search index lookup (the feature falls back to its default)")
            .action(clap::ArgAction::SetTrue),
    ]
}

//! country-prep: GeoJSON → country centroid index tool.
//!
//! Usage:
//!   country-prep build --geojson countries.geojson --output countries.json
//!   country-prep lookup --index countries.json --name "usa"

use std::path::{Path, PathBuf};
use std::process;

use warglobe_geo::CountryIndex;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "build" => cmd_build(&args[2..]),
        "lookup" => cmd_lookup(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "country-prep: WARGLOBE country data preprocessing tool\n\
         \n\
         Commands:\n\
         \n\
         build     Reduce a GeoJSON boundary file to a centroid index\n\
         \n\
           --geojson <path>   GeoJSON FeatureCollection of country polygons\n\
           --output <path>    Output JSON file path\n\
         \n\
         lookup    Resolve a country name against an index\n\
         \n\
           --index <path>     Centroid index or GeoJSON file\n\
           --name <query>     Country name, alias or fragment\n\
         \n\
         Examples:\n\
         \n\
           country-prep build --geojson countries.geojson --output public/countries.json\n\
           country-prep lookup --index public/countries.json --name uk\n"
    );
}

/// Value following `flag`, if present.
fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn require_flag<'a>(args: &'a [String], flag: &str) -> &'a str {
    match parse_flag(args, flag) {
        Some(value) => value,
        None => {
            eprintln!("Error: {flag} is required");
            process::exit(1);
        }
    }
}

fn load_index(path: &Path) -> CountryIndex {
    match CountryIndex::load(path) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error: {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn cmd_build(args: &[String]) {
    let input = PathBuf::from(require_flag(args, "--geojson"));
    let output = PathBuf::from(require_flag(args, "--output"));

    eprintln!("Reading {}...", input.display());
    let index = load_index(&input);
    if index.is_empty() {
        eprintln!("Error: no named polygon features in {}", input.display());
        process::exit(1);
    }

    let json = match serde_json::to_string_pretty(&index.records()) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: failed to encode index: {e}");
            process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(&output, json) {
        eprintln!("Error: failed to write {}: {e}", output.display());
        process::exit(1);
    }

    eprintln!("Wrote {} countries to {}", index.len(), output.display());
}

fn cmd_lookup(args: &[String]) {
    let path = PathBuf::from(require_flag(args, "--index"));
    let name = require_flag(args, "--name");

    let index = load_index(&path);
    match index.resolve(name) {
        Some(country) => {
            let p = country.position;
            println!(
                "{}\tlat {:.4}\tlon {:.4}\tglobe ({:.3}, {:.3}, {:.3})",
                country.id, country.centroid.lat, country.centroid.lon, p.x, p.y, p.z
            );
        }
        None => {
            eprintln!("No country matches \"{name}\"");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flag() {
        let a = args(&["--geojson", "in.geojson", "--output", "out.json"]);
        assert_eq!(parse_flag(&a, "--geojson"), Some("in.geojson"));
        assert_eq!(parse_flag(&a, "--output"), Some("out.json"));
        assert_eq!(parse_flag(&a, "--name"), None);
    }

    #[test]
    fn test_flag_without_value() {
        let a = args(&["--output"]);
        assert_eq!(parse_flag(&a, "--output"), None);
    }
}
